// src/services/inventory.rs

//! Inventory lookups against the remote API.
//!
//! Builds queries with [`crate::query`] and runs them through an
//! [`InventoryTransport`]. No retries happen here; callers decide what to do
//! with a failed or stale result.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::time::Duration;

use crate::error::Result;
use crate::models::{ApiConfig, FilterOptions, FilterParams, InventoryPage, InventoryUnit};
use crate::query;
use crate::services::{CachedTransport, HttpTransport, InventoryTransport};

/// Page size used when collecting filter choices from live inventory.
const OPTIONS_SAMPLE_SIZE: u32 = 200;

/// Service for querying dealership inventory.
#[derive(Clone)]
pub struct InventoryService {
    transport: Arc<dyn InventoryTransport>,
    company_id: u64,
}

impl InventoryService {
    pub fn new(transport: Arc<dyn InventoryTransport>, company_id: u64) -> Self {
        Self {
            transport,
            company_id,
        }
    }

    /// HTTP transport with response caching, both configured from `config`.
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        let http = HttpTransport::from_config(config)?;
        let cached = CachedTransport::new(http, Duration::from_secs(config.cache_ttl_secs));
        Ok(Self::new(Arc::new(cached), config.company_id))
    }

    pub fn company_id(&self) -> u64 {
        self.company_id
    }

    /// One page of publicly visible inventory matching `params`.
    pub async fn fetch_inventory(&self, params: &FilterParams) -> Result<InventoryPage> {
        let query = query::inventory_query(params, self.company_id);
        self.transport.get_page(&query).await
    }

    /// A single unit, or `None` if the API does not know the id.
    pub async fn fetch_unit(&self, id: u64) -> Result<Option<InventoryUnit>> {
        let page = self
            .transport
            .get_page(&query::unit_query(id, self.company_id))
            .await?;
        Ok(page.data.into_iter().find(|unit| unit.id == id))
    }

    /// Units for a saved id list, in the order the ids were given.
    ///
    /// Ids the API no longer returns are dropped silently. An empty list
    /// returns immediately without a request.
    pub async fn fetch_units_by_ids(&self, ids: &[u64]) -> Result<Vec<InventoryUnit>> {
        let mut seen = BTreeSet::new();
        let unique: Vec<u64> = ids.iter().copied().filter(|id| seen.insert(*id)).collect();

        let Some(query) = query::units_by_ids_query(&unique, self.company_id) else {
            return Ok(Vec::new());
        };

        let page = self.transport.get_page(&query).await?;
        let units = order_by_ids(&unique, page.data);

        if units.len() < unique.len() {
            log::debug!(
                "{} of {} requested units are no longer listed",
                unique.len() - units.len(),
                unique.len()
            );
        }
        Ok(units)
    }

    /// Featured units for the homepage.
    ///
    /// Falls back to the first page of regular inventory when the featured
    /// query fails or nothing is flagged.
    pub async fn fetch_featured(&self) -> Result<Vec<InventoryUnit>> {
        let query = query::featured_query(self.company_id, query::FEATURED_PAGE_SIZE);

        match self.transport.get_page(&query).await {
            Ok(page) if !page.is_empty() => return Ok(page.data),
            Ok(_) => log::info!("No featured units, falling back to regular inventory"),
            Err(e) => log::warn!("Featured lookup failed ({}), falling back to regular inventory", e),
        }

        let fallback = FilterParams {
            page_size: query::FEATURED_PAGE_SIZE,
            ..FilterParams::default()
        };
        Ok(self.fetch_inventory(&fallback).await?.data)
    }

    /// Distinct make names in current inventory, sorted.
    pub async fn fetch_makes(&self) -> Result<Vec<String>> {
        let units = self.sample().await?;
        Ok(distinct(units.iter().filter_map(InventoryUnit::make_name)))
    }

    /// Distinct classification names in current inventory, sorted.
    pub async fn fetch_types(&self) -> Result<Vec<String>> {
        let units = self.sample().await?;
        Ok(distinct(
            units.iter().filter_map(InventoryUnit::classification_name),
        ))
    }

    /// Every filter-panel choice, gathered from one inventory sample.
    pub async fn fetch_filter_options(&self) -> Result<FilterOptions> {
        let units = self.sample().await?;

        let slideouts: BTreeSet<u32> = units.iter().filter_map(|u| u.number_of_slideouts).collect();

        Ok(FilterOptions {
            makes: distinct(units.iter().filter_map(InventoryUnit::make_name)),
            types: distinct(units.iter().filter_map(InventoryUnit::classification_name)),
            conditions: distinct(units.iter().filter_map(InventoryUnit::condition_name)),
            slideout_options: slideouts.into_iter().collect(),
        })
    }

    async fn sample(&self) -> Result<Vec<InventoryUnit>> {
        let params = FilterParams {
            page_size: OPTIONS_SAMPLE_SIZE,
            ..FilterParams::default()
        };
        Ok(self.fetch_inventory(&params).await?.data)
    }
}

/// Arrange `units` to follow `ids`, dropping anything not requested.
fn order_by_ids(ids: &[u64], units: Vec<InventoryUnit>) -> Vec<InventoryUnit> {
    let mut by_id: HashMap<u64, InventoryUnit> =
        units.into_iter().map(|unit| (unit.id, unit)).collect();
    ids.iter().filter_map(|id| by_id.remove(id)).collect()
}

fn distinct<'a>(names: impl Iterator<Item = &'a str>) -> Vec<String> {
    names
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::{Classification, Condition, SortKey};
    use crate::services::testing::{StubTransport, named, page, unit};

    fn service(stub: StubTransport) -> (InventoryService, Arc<StubTransport>) {
        let stub = Arc::new(stub);
        (InventoryService::new(stub.clone(), 43), stub)
    }

    #[tokio::test]
    async fn test_fetch_inventory_sends_built_query() {
        let (svc, stub) = service(StubTransport::with_units(&[1, 2, 3]));
        let params = FilterParams {
            types: vec!["Fifth Wheel".to_string()],
            sort: Some(SortKey::YearDesc),
            ..FilterParams::default()
        };

        let page = svc.fetch_inventory(&params).await.unwrap();
        assert_eq!(page.data.len(), 3);
        assert_eq!(stub.queries(), vec![query::inventory_query(&params, 43)]);
    }

    #[tokio::test]
    async fn test_upstream_error_propagates_with_status() {
        let (svc, _) = service(StubTransport::failing(500));
        let err = svc.fetch_inventory(&FilterParams::default()).await.unwrap_err();
        assert!(matches!(err, AppError::Upstream { status: 500 }));
    }

    #[tokio::test]
    async fn test_empty_id_list_makes_no_request() {
        let (svc, stub) = service(StubTransport::with_units(&[1]));
        let units = svc.fetch_units_by_ids(&[]).await.unwrap();
        assert!(units.is_empty());
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_ids_are_dropped() {
        let (svc, _) = service(StubTransport::catalog(vec![unit(5), unit(6)]));
        let units = svc.fetch_units_by_ids(&[5, 999]).await.unwrap();
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].id, 5);
    }

    #[tokio::test]
    async fn test_results_follow_requested_order() {
        let (svc, stub) = service(StubTransport::catalog(vec![unit(1), unit(2), unit(3)]));
        let units = svc.fetch_units_by_ids(&[3, 1, 3, 2]).await.unwrap();

        assert_eq!(units.iter().map(|u| u.id).collect::<Vec<_>>(), vec![3, 1, 2]);
        assert!(stub.queries()[0].ends_with("pageSize=3"));
    }

    #[tokio::test]
    async fn test_fetch_unit() {
        let (svc, stub) = service(StubTransport::catalog(vec![unit(5), unit(6)]));

        assert_eq!(svc.fetch_unit(6).await.unwrap().map(|u| u.id), Some(6));
        assert!(svc.fetch_unit(7).await.unwrap().is_none());
        assert_eq!(stub.queries()[0], query::unit_query(6, 43));
    }

    #[tokio::test]
    async fn test_featured_units_returned_when_present() {
        let (svc, stub) = service(StubTransport::with_units(&[8, 9]));
        let units = svc.fetch_featured().await.unwrap();

        assert_eq!(units.len(), 2);
        assert_eq!(stub.calls(), 1);
    }

    #[tokio::test]
    async fn test_featured_falls_back_when_empty() {
        let (svc, stub) = service(StubTransport::new(|query| {
            if query.contains("[featured]") {
                Ok(page(Vec::new()))
            } else {
                Ok(page(vec![unit(1), unit(2)]))
            }
        }));

        let units = svc.fetch_featured().await.unwrap();
        assert_eq!(units.len(), 2);

        let queries = stub.queries();
        assert_eq!(queries.len(), 2);
        assert!(queries[1].ends_with("&page=1&pageSize=12"));
    }

    #[tokio::test]
    async fn test_featured_falls_back_on_error() {
        let (svc, _) = service(StubTransport::new(|query| {
            if query.contains("[featured]") {
                Err(AppError::upstream(503))
            } else {
                Ok(page(vec![unit(4)]))
            }
        }));

        let units = svc.fetch_featured().await.unwrap();
        assert_eq!(units[0].id, 4);
    }

    #[tokio::test]
    async fn test_featured_fallback_error_propagates() {
        let (svc, _) = service(StubTransport::failing(500));
        assert!(svc.fetch_featured().await.is_err());
    }

    #[tokio::test]
    async fn test_filter_options_are_distinct_and_sorted() {
        let mut a = unit(1);
        a.unit_make = named("Keystone");
        a.unit_classification = Some(Classification {
            name: Some("Travel Trailer".to_string()),
            ..Classification::default()
        });
        a.condition = Some(Condition::Text("New".to_string()));
        a.number_of_slideouts = Some(3);

        let mut b = unit(2);
        b.unit_make = named("Grand Design");
        b.condition = Some(Condition::Named {
            name: Some("Used".to_string()),
        });
        b.number_of_slideouts = Some(1);

        let mut c = unit(3);
        c.unit_make = named("Keystone");
        c.number_of_slideouts = Some(3);

        let (svc, stub) = service(StubTransport::catalog(vec![a, b, c]));

        let options = svc.fetch_filter_options().await.unwrap();
        assert_eq!(options.makes, vec!["Grand Design", "Keystone"]);
        assert_eq!(options.types, vec!["Travel Trailer"]);
        assert_eq!(options.conditions, vec!["New", "Used"]);
        assert_eq!(options.slideout_options, vec![1, 3]);
        assert!(stub.queries()[0].ends_with("pageSize=200"));

        assert_eq!(svc.fetch_makes().await.unwrap(), vec!["Grand Design", "Keystone"]);
        assert_eq!(svc.fetch_types().await.unwrap(), vec!["Travel Trailer"]);
    }
}
