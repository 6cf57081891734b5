// src/services/mod.rs

//! Service layer for the inventory core.
//!
//! - `InventoryService`: runs inventory queries and shapes the results
//! - `InventoryTransport`: where queries are sent (HTTP, cached, or stubbed)

pub mod inventory;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use inventory::InventoryService;
pub use transport::{CachedTransport, HttpTransport, InventoryTransport, create_client};
