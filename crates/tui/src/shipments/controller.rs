//! Source of truth for "which page of which view is on screen".
//!
//! The controller never talks to the network. Every operation that needs
//! data returns a [`LoadRequest`]; the caller executes it (see
//! [`super::loader::fetch`]) and hands the outcome back to
//! [`ListController::apply`]. Each request carries a generation number and
//! only the latest one is ever applied, so a slow response cannot overwrite
//! the result of a newer page or filter change.

use api_types::shipment::{PageQuery, PageResult, Shipment, ShipmentFilter};

use super::{
    filters::{FilterError, FilterField, FilterState},
    page::PageState,
    stats::ShipmentStats,
};
use crate::client::ClientError;

#[derive(Debug, Clone, PartialEq)]
pub struct LoadRequest {
    pub generation: u64,
    pub query: PageQuery,
    /// `None` selects the plain listing endpoint, `Some` the filter one.
    pub filter: Option<ShipmentFilter>,
    /// Page size used to walk the unfiltered collection for stats.
    pub stats_page_size: u32,
}

/// Both halves of a load: the displayed page and the whole unfiltered
/// collection used for aggregate stats.
#[derive(Debug, Clone, Default)]
pub struct LoadedPage {
    pub page: PageResult<Shipment>,
    pub all_shipments: Vec<Shipment>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Created,
    Updated,
    Deleted,
}

#[derive(Debug)]
pub enum Applied {
    Loaded,
    /// Superseded by a newer request, dropped.
    Stale,
    /// Nothing was changed.
    Failed(ClientError),
    /// The requested page came back empty past the end of the collection;
    /// this request targets the last existing page instead.
    Retarget(LoadRequest),
}

/// What the screen currently shows, restored when a load fails.
#[derive(Debug, Clone, Default)]
struct Shown {
    page: u32,
    filter: Option<ShipmentFilter>,
}

#[derive(Debug)]
pub struct ListController {
    shipments: Vec<Shipment>,
    all_shipments: Vec<Shipment>,
    filters: FilterState,
    active: Option<ShipmentFilter>,
    page: PageState,
    shown: Shown,
    stats_page_size: u32,
    generation: u64,
    loading: bool,
    selected: usize,
}

impl ListController {
    pub fn new(page_size: u32, stats_page_size: u32) -> Self {
        Self {
            shipments: Vec::new(),
            all_shipments: Vec::new(),
            filters: FilterState::default(),
            active: None,
            page: PageState::new(page_size),
            shown: Shown::default(),
            stats_page_size: stats_page_size.max(1),
            generation: 0,
            loading: false,
            selected: 0,
        }
    }

    pub fn shipments(&self) -> &[Shipment] {
        &self.shipments
    }

    pub fn all_shipments(&self) -> &[Shipment] {
        &self.all_shipments
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn active_filter(&self) -> Option<&ShipmentFilter> {
        self.active.as_ref()
    }

    pub fn is_filtering(&self) -> bool {
        self.active.is_some()
    }

    pub fn page(&self) -> &PageState {
        &self.page
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn stats(&self) -> ShipmentStats {
        ShipmentStats::from_shipments(&self.all_shipments)
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_shipment(&self) -> Option<&Shipment> {
        self.shipments.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if self.shipments.is_empty() {
            return;
        }
        self.selected = (self.selected + 1).min(self.shipments.len() - 1);
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Targets `page` of the view described by `filter`. An empty filter is
    /// the same as no filter.
    pub fn load_page(&mut self, page: u32, filter: Option<ShipmentFilter>) -> LoadRequest {
        let filter = filter.filter(|f| !f.is_empty());
        self.generation += 1;
        self.loading = true;
        self.page.current_page = page;
        self.active = filter.clone();

        tracing::debug!(
            generation = self.generation,
            page,
            filtered = filter.is_some(),
            "loading shipments page"
        );

        LoadRequest {
            generation: self.generation,
            query: self.page.query(page),
            filter,
            stats_page_size: self.stats_page_size,
        }
    }

    /// Re-issues the current page and filter.
    pub fn reload(&mut self) -> LoadRequest {
        self.load_page(self.page.current_page, self.active.clone())
    }

    /// Changes one filter field and restarts from page 0.
    ///
    /// A value that does not normalize is rejected: filters, page and the
    /// active view are left alone.
    pub fn set_filter(
        &mut self,
        field: FilterField,
        value: impl Into<String>,
    ) -> Result<LoadRequest, FilterError> {
        let mut next = self.filters.clone();
        next.set(field, value);
        self.replace_filters(next)
    }

    /// Moves a selector field (type, delivery status) to its next option.
    pub fn cycle_filter(&mut self, field: FilterField) -> Result<LoadRequest, FilterError> {
        let mut next = self.filters.clone();
        next.cycle(field);
        self.set_filter(field, next.get(field).to_string())
    }

    /// Replaces the whole filter form, e.g. after editing it in a dialog.
    pub fn replace_filters(&mut self, filters: FilterState) -> Result<LoadRequest, FilterError> {
        let cleaned = filters.normalize()?;
        self.filters = filters;
        Ok(self.load_page(0, cleaned))
    }

    /// Forgets everything shown. The generation keeps counting so a
    /// response still in flight from before can never be applied.
    pub fn reset(&mut self) {
        *self = Self {
            generation: self.generation + 1,
            ..Self::new(self.page.page_size, self.stats_page_size)
        };
    }

    pub fn clear_filters(&mut self) -> LoadRequest {
        self.filters = FilterState::default();
        self.load_page(0, None)
    }

    /// `None` (and no state change) when `page` is out of range.
    pub fn change_page(&mut self, page: i64) -> Option<LoadRequest> {
        if !self.page.contains(page) {
            return None;
        }
        let page = u32::try_from(page).ok()?;
        Some(self.load_page(page, self.active.clone()))
    }

    /// Reloads from the server after a successful create, update or delete.
    ///
    /// A new record sends the user back to page 0. Deleting the only row of
    /// a later page steps back one page.
    pub fn refresh_after_mutation(&mut self, mutation: Mutation) -> LoadRequest {
        let current = self.page.current_page;
        let page = match mutation {
            Mutation::Created => 0,
            Mutation::Updated => current,
            Mutation::Deleted if self.shipments.len() <= 1 && current > 0 => current - 1,
            Mutation::Deleted => current,
        };
        self.load_page(page, self.active.clone())
    }

    pub fn apply(
        &mut self,
        generation: u64,
        outcome: Result<LoadedPage, ClientError>,
    ) -> Applied {
        if generation != self.generation {
            tracing::debug!(
                generation,
                latest = self.generation,
                "dropping stale shipments response"
            );
            return Applied::Stale;
        }
        self.loading = false;

        let loaded = match outcome {
            Ok(loaded) => loaded,
            Err(err) => {
                self.page.current_page = self.shown.page;
                self.active = self.shown.filter.clone();
                return Applied::Failed(err);
            }
        };

        let current = self.page.current_page;
        if loaded.page.content.is_empty() && current > 0 {
            let last = loaded.page.total_pages.saturating_sub(1);
            if last < current {
                return Applied::Retarget(self.load_page(last, self.active.clone()));
            }
        }

        self.shipments = loaded.page.content;
        self.all_shipments = loaded.all_shipments;
        self.page.total_pages = loaded.page.total_pages;
        self.page.total_elements = loaded.page.total_elements;
        self.shown = Shown {
            page: current,
            filter: self.active.clone(),
        };
        self.selected = self.selected.min(self.shipments.len().saturating_sub(1));
        Applied::Loaded
    }
}
