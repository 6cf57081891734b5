// src/models/mod.rs

//! Domain models for the inventory core.
//!
//! API records and response envelopes, the filter state driving queries,
//! and application configuration.

mod config;
pub mod de;
mod filter;
mod response;
mod unit;

// Re-export all public types
pub use config::{ApiConfig, Config, ENV_BASE_URL, ENV_COMPANY_ID, LoggingConfig, StorageConfig};
pub use filter::{Bounds, DEFAULT_PAGE_SIZE, FilterParams, SortKey};
pub use response::{AvailableFilters, FilterOptions, FilterRange, InventoryPage, Pagination};
pub use unit::{
    Classification, CompanyLocation, Condition, InventoryUnit, MediaItem, NamedRef, Tagline,
    UnitAttribute, UnitDescription, UnitOption, UnitUrls, WebSettings,
};
