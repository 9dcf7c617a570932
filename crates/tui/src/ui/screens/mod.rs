pub mod login;
pub mod reset;
pub mod shipments;
pub mod verify;
