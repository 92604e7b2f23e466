pub mod pricing;
pub mod store;

pub use store::{FlightInventory, InventoryError};
