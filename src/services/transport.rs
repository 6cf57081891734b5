// src/services/transport.rs

//! Transports that turn an inventory query string into a parsed page.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;

use crate::error::{AppError, Result};
use crate::models::{ApiConfig, InventoryPage};

/// Executes inventory queries.
#[async_trait]
pub trait InventoryTransport: Send + Sync {
    /// Fetch `/inventory/?{query}` and parse the response envelope.
    ///
    /// Non-2xx responses fail with [`AppError::Upstream`].
    async fn get_page(&self, query: &str) -> Result<InventoryPage>;
}

/// Create a configured asynchronous HTTP client.
pub fn create_client(config: &ApiConfig) -> Result<Client> {
    let client = Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

/// Transport backed by the live inventory API.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        Ok(Self::new(create_client(config)?, &config.base_url))
    }

    /// Full request URL for a query.
    pub fn url_for(&self, query: &str) -> String {
        format!("{}/inventory/?{}", self.base_url, query)
    }
}

#[async_trait]
impl InventoryTransport for HttpTransport {
    async fn get_page(&self, query: &str) -> Result<InventoryPage> {
        let url = self.url_for(query);
        log::debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            log::warn!("Inventory API returned {} for {}", status, url);
            return Err(AppError::upstream(status.as_u16()));
        }

        let body = response.text().await?;
        let page: InventoryPage = serde_json::from_str(&body)?;
        log::debug!(
            "Received {} units (page {}/{}, {} total)",
            page.data.len(),
            page.pagination.current_page,
            page.pagination.last_page,
            page.pagination.total
        );
        Ok(page)
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    fetched_at: DateTime<Utc>,
    page: InventoryPage,
}

/// Reuses successful responses for a fixed time window.
///
/// Errors are never cached. A zero TTL turns the cache off.
pub struct CachedTransport<T> {
    inner: T,
    ttl: chrono::Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl<T: InventoryTransport> CachedTransport<T> {
    pub fn new(inner: T, ttl: Duration) -> Self {
        Self {
            inner,
            ttl: chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX),
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }

    fn is_enabled(&self) -> bool {
        self.ttl > chrono::Duration::zero()
    }

    fn is_fresh(&self, entry: &CacheEntry, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(entry.fetched_at) < self.ttl
    }

    fn lookup(&self, query: &str) -> Option<InventoryPage> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries
            .get(query)
            .filter(|entry| self.is_fresh(entry, Utc::now()))
            .map(|entry| entry.page.clone())
    }

    fn store(&self, query: &str, page: &InventoryPage) {
        let now = Utc::now();
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.retain(|_, entry| self.is_fresh(entry, now));
        entries.insert(
            query.to_string(),
            CacheEntry {
                fetched_at: now,
                page: page.clone(),
            },
        );
    }

    /// Drop every cached page.
    pub fn invalidate(&self) {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }
}

#[async_trait]
impl<T: InventoryTransport> InventoryTransport for CachedTransport<T> {
    async fn get_page(&self, query: &str) -> Result<InventoryPage> {
        if !self.is_enabled() {
            return self.inner.get_page(query).await;
        }

        if let Some(page) = self.lookup(query) {
            log::debug!("Cache hit for {}", query);
            return Ok(page);
        }

        let page = self.inner.get_page(query).await?;
        self.store(query, &page);
        Ok(page)
    }
}
