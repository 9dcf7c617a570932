//! Shipment list state: filters, pagination, the list controller and the
//! write path.

pub mod controller;
pub mod filters;
pub mod form;
pub mod loader;
pub mod mutation;
pub mod page;
pub mod stats;

pub use controller::{Applied, ListController, LoadRequest, LoadedPage, Mutation};
pub use filters::{FilterError, FilterField, FilterState};
pub use form::{FormField, FormPhase, ShipmentForm};
pub use mutation::{Completed, MutationGateway, MutationJob};
