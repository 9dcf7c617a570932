use api_types::shipment::ShipmentRequest;

use super::controller::{ListController, LoadRequest, Mutation};
use crate::client::{Client, ClientError};

/// One create, update or delete call, ready to be sent.
#[derive(Debug, Clone, PartialEq)]
pub enum MutationJob {
    Create(ShipmentRequest),
    Update { id: i64, payload: ShipmentRequest },
    Delete(i64),
}

impl MutationJob {
    pub fn kind(&self) -> Mutation {
        match self {
            Self::Create(_) => Mutation::Created,
            Self::Update { .. } => Mutation::Updated,
            Self::Delete(_) => Mutation::Deleted,
        }
    }

    pub async fn run(self, client: &Client) -> Result<Mutation, ClientError> {
        let kind = self.kind();
        match self {
            Self::Create(payload) => {
                let created = client.create_shipment(&payload).await?;
                tracing::info!(id = created.id, "shipment created");
            }
            Self::Update { id, payload } => {
                client.update_shipment(id, &payload).await?;
                tracing::info!(id, "shipment updated");
            }
            Self::Delete(id) => {
                client.delete_shipment(id).await?;
                tracing::info!(id, "shipment deleted");
            }
        }
        Ok(kind)
    }
}

fn success_message(kind: Mutation) -> &'static str {
    match kind {
        Mutation::Created => "Shipment added successfully",
        Mutation::Updated => "Shipment updated successfully",
        Mutation::Deleted => "Shipment deleted successfully",
    }
}

fn failure_message(kind: Mutation) -> &'static str {
    match kind {
        Mutation::Created | Mutation::Updated => "Failed to save shipment",
        Mutation::Deleted => "Failed to delete shipment",
    }
}

#[derive(Debug)]
pub enum Completed {
    /// Succeeded; the list must be reloaded with `request`.
    Refresh {
        message: &'static str,
        request: LoadRequest,
    },
    Failed {
        kind: Mutation,
        message: String,
        error: ClientError,
    },
}

/// Hands out at most one write at a time and owns the delete confirmation.
#[derive(Debug, Default)]
pub struct MutationGateway {
    pending_delete: Option<i64>,
    busy: bool,
}

impl MutationGateway {
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn pending_delete(&self) -> Option<i64> {
        self.pending_delete
    }

    /// Asks for confirmation first, nothing is sent yet.
    pub fn request_delete(&mut self, id: i64) {
        self.pending_delete = Some(id);
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    pub fn confirm_delete(&mut self) -> Option<MutationJob> {
        if self.busy {
            return None;
        }
        let id = self.pending_delete.take()?;
        self.busy = true;
        Some(MutationJob::Delete(id))
    }

    pub fn create(&mut self, payload: ShipmentRequest) -> Option<MutationJob> {
        self.start(MutationJob::Create(payload))
    }

    pub fn update(&mut self, id: i64, payload: ShipmentRequest) -> Option<MutationJob> {
        self.start(MutationJob::Update { id, payload })
    }

    fn start(&mut self, job: MutationJob) -> Option<MutationJob> {
        if self.busy {
            return None;
        }
        self.busy = true;
        Some(job)
    }

    /// Settles a finished job. Success reloads the list; failure leaves it
    /// alone.
    pub fn complete(
        &mut self,
        kind: Mutation,
        outcome: Result<Mutation, ClientError>,
        list: &mut ListController,
    ) -> Completed {
        self.busy = false;
        match outcome {
            Ok(done) => Completed::Refresh {
                message: success_message(done),
                request: list.refresh_after_mutation(done),
            },
            Err(error) => {
                tracing::warn!(?kind, %error, "shipment mutation failed");
                Completed::Failed {
                    kind,
                    message: error.user_message(failure_message(kind)),
                    error,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use api_types::shipment::ShipmentType;
    use chrono::NaiveDate;

    use super::*;
    use crate::{
        shipments::{controller::Applied, loader},
        test_support::{FakeBackend, REJECTED_TITLE, sample_shipment},
    };

    fn payload(title: &str) -> ShipmentRequest {
        ShipmentRequest {
            shipment_title: title.to_string(),
            shipment_description: String::new(),
            shipment_type: ShipmentType::Road,
            is_delivered: false,
            cost: 150.5,
            shipment_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
        }
    }

    async fn load(client: &Client, list: &mut ListController, request: LoadRequest) {
        let outcome = loader::fetch(client, &request).await;
        match list.apply(request.generation, outcome) {
            Applied::Loaded => {}
            Applied::Retarget(next) => Box::pin(load(client, list, next)).await,
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn delete_waits_for_confirmation() {
        let mut gateway = MutationGateway::default();
        assert!(gateway.confirm_delete().is_none());

        gateway.request_delete(7);
        assert_eq!(gateway.pending_delete(), Some(7));
        gateway.cancel_delete();
        assert!(gateway.confirm_delete().is_none());

        gateway.request_delete(7);
        assert_eq!(gateway.confirm_delete(), Some(MutationJob::Delete(7)));
        assert_eq!(gateway.pending_delete(), None);
        assert!(gateway.is_busy());
    }

    #[test]
    fn only_one_write_at_a_time() {
        let mut gateway = MutationGateway::default();
        assert!(gateway.create(payload("a")).is_some());
        assert!(gateway.update(1, payload("b")).is_none());

        let mut list = ListController::new(6, 1000);
        gateway.complete(Mutation::Created, Err(ClientError::NotFound), &mut list);
        assert!(!gateway.is_busy());
        assert!(gateway.update(1, payload("b")).is_some());
    }

    #[tokio::test]
    async fn create_then_refresh_lands_on_first_page() {
        let backend = FakeBackend::with_shipments((1..=14).map(sample_shipment).collect());
        let client = Client::new(&backend.spawn().await).unwrap();
        let mut list = ListController::new(6, 1000);
        let mut gateway = MutationGateway::default();

        let request = list.load_page(2, None);
        load(&client, &mut list, request).await;
        assert_eq!(list.page().current_page, 2);

        let job = gateway.create(payload("Pallet A")).unwrap();
        let outcome = job.run(&client).await;
        let Completed::Refresh { message, request } =
            gateway.complete(Mutation::Created, outcome, &mut list)
        else {
            panic!("create failed");
        };
        assert_eq!(message, "Shipment added successfully");
        load(&client, &mut list, request).await;

        assert_eq!(list.page().current_page, 0);
        assert_eq!(list.page().total_elements, 15);
        // Dated 2026, so it sorts first.
        assert_eq!(list.shipments()[0].shipment_title, "Pallet A");
        assert_eq!(list.stats().total_shipments, 15);
    }

    #[tokio::test]
    async fn deleting_only_row_of_last_page_moves_back() {
        let backend = FakeBackend::with_shipments((1..=13).map(sample_shipment).collect());
        let client = Client::new(&backend.spawn().await).unwrap();
        let mut list = ListController::new(6, 1000);
        let mut gateway = MutationGateway::default();

        let request = list.load_page(2, None);
        load(&client, &mut list, request).await;
        assert_eq!(list.shipments().len(), 1);
        let id = list.shipments()[0].id;

        gateway.request_delete(id);
        let job = gateway.confirm_delete().unwrap();
        let outcome = job.run(&client).await;
        let Completed::Refresh { message, request } =
            gateway.complete(Mutation::Deleted, outcome, &mut list)
        else {
            panic!("delete failed");
        };
        assert_eq!(message, "Shipment deleted successfully");
        load(&client, &mut list, request).await;

        assert_eq!(list.page().current_page, 1);
        assert_eq!(list.page().total_pages, 2);
        assert_eq!(list.shipments().len(), 6);
    }

    #[tokio::test]
    async fn rows_removed_elsewhere_retarget_to_last_page() {
        let backend = FakeBackend::with_shipments((1..=14).map(sample_shipment).collect());
        let client = Client::new(&backend.spawn().await).unwrap();
        let mut list = ListController::new(6, 1000);

        let request = list.load_page(2, None);
        load(&client, &mut list, request).await;
        backend.remove_shipment(1);
        backend.remove_shipment(2);

        let request = list.reload();
        load(&client, &mut list, request).await;

        assert_eq!(list.page().current_page, 1);
        assert_eq!(list.shipments().len(), 6);
    }

    #[tokio::test]
    async fn rejected_create_keeps_list_and_reports_server_message() {
        let backend = FakeBackend::with_shipments((1..=3).map(sample_shipment).collect());
        let client = Client::new(&backend.spawn().await).unwrap();
        let mut list = ListController::new(6, 1000);
        let mut gateway = MutationGateway::default();

        let request = list.load_page(0, None);
        load(&client, &mut list, request).await;
        let before = list.shipments().to_vec();

        let job = gateway.create(payload(REJECTED_TITLE)).unwrap();
        let outcome = job.run(&client).await;
        match gateway.complete(Mutation::Created, outcome, &mut list) {
            Completed::Failed { message, .. } => {
                assert_eq!(message, "Shipment could not be created. Try later")
            }
            other => panic!("expected failure, got {other:?}"),
        }
        assert_eq!(list.shipments(), before.as_slice());
        assert!(!list.is_loading());
    }

    #[tokio::test]
    async fn failed_delete_uses_fallback_message() {
        let backend = FakeBackend::default();
        let client = Client::new(&backend.spawn().await).unwrap();
        let mut list = ListController::new(6, 1000);
        let mut gateway = MutationGateway::default();

        gateway.request_delete(99);
        let outcome = gateway.confirm_delete().unwrap().run(&client).await;
        match gateway.complete(Mutation::Deleted, outcome, &mut list) {
            Completed::Failed { message, .. } => assert_eq!(message, "Failed to delete shipment"),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn update_refreshes_same_page() {
        let backend = FakeBackend::with_shipments((1..=10).map(sample_shipment).collect());
        let client = Client::new(&backend.spawn().await).unwrap();
        let mut list = ListController::new(6, 1000);
        let mut gateway = MutationGateway::default();

        let request = list.load_page(1, None);
        load(&client, &mut list, request).await;
        let target = list.shipments()[0].clone();

        let mut edited = payload("Renamed");
        edited.shipment_date = target.shipment_date;
        let outcome = gateway
            .update(target.id, edited)
            .unwrap()
            .run(&client)
            .await;
        let Completed::Refresh { request, .. } =
            gateway.complete(Mutation::Updated, outcome, &mut list)
        else {
            panic!("update failed");
        };
        load(&client, &mut list, request).await;

        assert_eq!(list.page().current_page, 1);
        assert_eq!(list.shipments()[0].shipment_title, "Renamed");
    }
}
