//! In-memory transport used by service tests.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::models::{InventoryPage, InventoryUnit, NamedRef, Pagination};
use crate::services::InventoryTransport;

type Responder = Box<dyn Fn(&str) -> Result<InventoryPage> + Send + Sync>;

/// Records every query and answers with a canned responder.
pub struct StubTransport {
    respond: Responder,
    queries: Mutex<Vec<String>>,
}

impl StubTransport {
    pub fn new(respond: impl Fn(&str) -> Result<InventoryPage> + Send + Sync + 'static) -> Self {
        Self {
            respond: Box::new(respond),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Answers every query with the same units.
    pub fn with_units(ids: &[u64]) -> Self {
        let units: Vec<InventoryUnit> = ids.iter().copied().map(unit).collect();
        Self::new(move |_| Ok(page(units.clone())))
    }

    /// Behaves like the API over a fixed catalog: id lookups return only
    /// the ids that exist, any other query returns the whole catalog.
    pub fn catalog(units: Vec<InventoryUnit>) -> Self {
        Self::new(move |query| {
            let wanted = requested_ids(query);
            if wanted.is_empty() {
                return Ok(page(units.clone()));
            }
            // The API does not promise any particular order
            let found = units
                .iter()
                .rev()
                .filter(|u| wanted.contains(&u.id))
                .cloned()
                .collect();
            Ok(page(found))
        })
    }

    /// Fails every query with the given HTTP status.
    pub fn failing(status: u16) -> Self {
        Self::new(move |_| Err(AppError::upstream(status)))
    }

    pub fn calls(&self) -> usize {
        self.queries.lock().unwrap().len()
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl InventoryTransport for StubTransport {
    async fn get_page(&self, query: &str) -> Result<InventoryPage> {
        self.queries.lock().unwrap().push(query.to_string());
        (self.respond)(query)
    }
}

fn requested_ids(query: &str) -> Vec<u64> {
    query
        .split('&')
        .filter_map(|part| part.split_once("[id][$eq]="))
        .filter_map(|(_, id)| id.parse().ok())
        .collect()
}

pub fn unit(id: u64) -> InventoryUnit {
    InventoryUnit {
        id,
        ..InventoryUnit::default()
    }
}

pub fn named(name: &str) -> Option<NamedRef> {
    Some(NamedRef {
        id: None,
        name: Some(name.to_string()),
    })
}

pub fn page(units: Vec<InventoryUnit>) -> InventoryPage {
    let total = units.len() as u64;
    InventoryPage {
        ids: units.iter().map(|u| u.id).collect(),
        data: units,
        pagination: Pagination {
            total,
            per_page: 12,
            current_page: 1,
            last_page: 1,
        },
        available_filters: None,
    }
}
