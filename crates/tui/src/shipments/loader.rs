use api_types::shipment::{PageQuery, Shipment};

use super::controller::{LoadRequest, LoadedPage};
use crate::client::{Client, ClientError};

/// Runs a [`LoadRequest`]: the displayed page and the stats walk go out
/// together and the load fails as a whole if either does.
pub async fn fetch(client: &Client, request: &LoadRequest) -> Result<LoadedPage, ClientError> {
    let page = async {
        match &request.filter {
            Some(filter) => client.filter_shipments(&request.query, filter).await,
            None => client.list_shipments(&request.query).await,
        }
    };
    let (page, all_shipments) = tokio::try_join!(page, fetch_all(client, request.stats_page_size))?;

    tracing::debug!(
        generation = request.generation,
        rows = page.content.len(),
        total = page.total_elements,
        "shipments page loaded"
    );
    Ok(LoadedPage {
        page,
        all_shipments,
    })
}

/// Walks every page of the unfiltered listing.
pub async fn fetch_all(client: &Client, page_size: u32) -> Result<Vec<Shipment>, ClientError> {
    let mut all = Vec::new();
    let mut page = 0;
    loop {
        let result = client
            .list_shipments(&PageQuery::newest_first(page, page_size))
            .await?;
        let fetched = result.content.len();
        all.extend(result.content);
        page += 1;
        if fetched == 0 || page >= result.total_pages {
            break;
        }
    }
    Ok(all)
}
