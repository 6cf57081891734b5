// src/models/response.rs

//! Inventory API response envelope.

use serde::{Deserialize, Serialize};

use super::de;
use super::unit::InventoryUnit;

/// One page of inventory results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InventoryPage {
    /// Ids of every matching unit across all pages, when the API sends them
    #[serde(default, deserialize_with = "de::vec_or_empty")]
    pub ids: Vec<u64>,

    /// Units on this page
    #[serde(default, deserialize_with = "de::vec_or_empty")]
    pub data: Vec<InventoryUnit>,

    #[serde(default)]
    pub pagination: Pagination,

    /// Value ranges the API reports for the current result set
    #[serde(default)]
    pub available_filters: Option<AvailableFilters>,
}

impl InventoryPage {
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Pagination metadata. Zero means the API omitted the field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default, deserialize_with = "de::u64_or_zero")]
    pub total: u64,
    #[serde(default, deserialize_with = "de::u64_or_zero")]
    pub per_page: u64,
    #[serde(default, deserialize_with = "de::u64_or_zero")]
    pub current_page: u64,
    #[serde(default, deserialize_with = "de::u64_or_zero")]
    pub last_page: u64,
}

impl Pagination {
    pub fn has_next(&self) -> bool {
        self.current_page < self.last_page
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }
}

/// A server-reported `{min, max}` pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterRange {
    #[serde(default, deserialize_with = "de::opt_f64")]
    pub min: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    pub max: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AvailableFilters {
    #[serde(default)]
    pub year: Option<FilterRange>,
    #[serde(default)]
    pub price_current: Option<FilterRange>,
    #[serde(default)]
    pub price_msrp: Option<FilterRange>,
    #[serde(default)]
    pub vehicle_body_length: Option<FilterRange>,
    #[serde(default)]
    pub dry_weight: Option<FilterRange>,
    #[serde(default)]
    pub gvwr: Option<FilterRange>,
    #[serde(default)]
    pub max_sleeping_count: Option<FilterRange>,
    #[serde(default)]
    pub number_of_slideouts: Option<FilterRange>,
}

/// Choices offered by the inventory filter panel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub makes: Vec<String>,
    pub types: Vec<String>,
    pub conditions: Vec<String>,
    pub slideout_options: Vec<u32>,
}
