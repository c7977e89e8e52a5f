//! Keyed view cache with last-request-wins completion.
//!
//! Each record family gets its own [`ResourceCache`], keyed by the query
//! parameters that produced the records. Every fetch takes a ticket before
//! it starts; a completion is only applied if its ticket is still the
//! newest one issued for that key. A slow response for an old filter
//! selection therefore never overwrites a newer one, though the caller that
//! issued it still gets its own records when nothing newer has landed.

use crate::models::{
    Customer, DashboardSummary, Invoice, InvoiceDetail, PipelineRun, PricingRecord, UsageRecord,
};
use crate::services::api_client::{ApiError, InvoiceQuery, UsageQuery};
use crate::services::metrics::CACHE_EVENTS_TOTAL;
use dashmap::DashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// What a view sees for one key after a load.
///
/// `data` survives a failed refetch so a panel can keep showing the last
/// good records next to the error.
#[derive(Debug)]
pub struct Snapshot<T> {
    pub data: Option<Arc<T>>,
    pub error: Option<ApiError>,
}

impl<T> Snapshot<T> {
    fn from_result(result: Result<T, ApiError>) -> Self {
        match result {
            Ok(data) => Snapshot {
                data: Some(Arc::new(data)),
                error: None,
            },
            Err(error) => Snapshot {
                data: None,
                error: Some(error),
            },
        }
    }
}

impl<T> Clone for Snapshot<T> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            error: self.error.clone(),
        }
    }
}

/// Ticket handed out when a fetch starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

struct Slot<T> {
    latest: Ticket,
    data: Option<Arc<T>>,
    fetched_at: Option<Instant>,
    error: Option<ApiError>,
    /// Last time a fetch started or completed for this key.
    touched: Instant,
}

impl<T> Slot<T> {
    fn snapshot(&self) -> Snapshot<T> {
        Snapshot {
            data: self.data.clone(),
            error: self.error.clone(),
        }
    }
}

pub struct ResourceCache<K, T> {
    resource: &'static str,
    entries: DashMap<K, Slot<T>>,
    stale_after: Option<Duration>,
    next_ticket: AtomicU64,
}

impl<K, T> ResourceCache<K, T>
where
    K: Eq + Hash + Clone,
{
    pub fn new(resource: &'static str, stale_after: Option<Duration>) -> Self {
        Self {
            resource,
            entries: DashMap::new(),
            stale_after,
            next_ticket: AtomicU64::new(1),
        }
    }

    fn issue(&self) -> Ticket {
        Ticket(self.next_ticket.fetch_add(1, Ordering::Relaxed))
    }

    fn record(&self, event: &str) {
        CACHE_EVENTS_TOTAL
            .with_label_values(&[self.resource, event])
            .inc();
    }

    /// Current state for `key` without fetching.
    pub fn peek(&self, key: &K) -> Option<Snapshot<T>> {
        self.entries.get(key).map(|slot| slot.snapshot())
    }

    /// Cached records that can be served without a fetch: present, not
    /// followed by a failure, and younger than `stale_after`.
    fn fresh(&self, key: &K) -> Option<Arc<T>> {
        let slot = self.entries.get(key)?;
        if slot.error.is_some() {
            return None;
        }
        let fetched_at = slot.fetched_at?;
        if let Some(max_age) = self.stale_after {
            if fetched_at.elapsed() >= max_age {
                return None;
            }
        }
        slot.data.clone()
    }

    /// Register a new fetch for `key`. Any fetch started earlier for the
    /// same key is superseded.
    pub fn begin(&self, key: &K) -> Ticket {
        let ticket = self.issue();
        self.entries
            .entry(key.clone())
            .and_modify(|slot| {
                slot.latest = ticket;
                slot.touched = Instant::now();
            })
            .or_insert_with(|| Slot {
                latest: ticket,
                data: None,
                fetched_at: None,
                error: None,
                touched: Instant::now(),
            });
        ticket
    }

    /// Apply the outcome of the fetch holding `ticket`.
    ///
    /// Superseded completions are never stored. Their caller gets the
    /// stored records when there are any and its own result otherwise. A
    /// success replaces the records and clears any previous error; a failure
    /// keeps the previous records.
    pub fn complete(&self, key: &K, ticket: Ticket, result: Result<T, ApiError>) -> Snapshot<T> {
        let Some(mut slot) = self.entries.get_mut(key) else {
            self.record("stale_discarded");
            return Snapshot::from_result(result);
        };

        if slot.latest != ticket {
            tracing::debug!(
                resource = self.resource,
                "Discarding superseded fetch result"
            );
            self.record("stale_discarded");
            if slot.data.is_some() {
                return slot.snapshot();
            }
            return Snapshot::from_result(result);
        }

        slot.touched = Instant::now();

        match result {
            Ok(data) => {
                slot.data = Some(Arc::new(data));
                slot.fetched_at = Some(Instant::now());
                slot.error = None;
            }
            Err(error) => {
                tracing::warn!(resource = self.resource, error = %error, "Fetch failed");
                self.record("failure");
                slot.error = Some(error);
            }
        }

        slot.snapshot()
    }

    /// Serve cached records when fresh, otherwise fetch.
    pub async fn get_or_fetch<F, Fut>(&self, key: K, fetch: F) -> Snapshot<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        if let Some(data) = self.fresh(&key) {
            self.record("hit");
            return Snapshot {
                data: Some(data),
                error: None,
            };
        }

        self.record("miss");
        self.evict_expired();
        self.fetch_into(key, fetch).await
    }

    /// Fetch regardless of freshness. Previous records stay visible if the
    /// refetch fails.
    pub async fn refetch<F, Fut>(&self, key: K, fetch: F) -> Snapshot<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        self.record("refetch");
        self.fetch_into(key, fetch).await
    }

    /// `refetch` when `refresh` is set, `get_or_fetch` otherwise.
    pub async fn load<F, Fut>(&self, key: K, refresh: bool, fetch: F) -> Snapshot<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        if refresh {
            self.refetch(key, fetch).await
        } else {
            self.get_or_fetch(key, fetch).await
        }
    }

    async fn fetch_into<F, Fut>(&self, key: K, fetch: F) -> Snapshot<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let ticket = self.begin(&key);
        let result = fetch().await;
        self.complete(&key, ticket, result)
    }

    /// Drop keys nobody has fetched for longer than `stale_after`. Their
    /// records would be refetched on the next read anyway.
    fn evict_expired(&self) {
        let Some(max_age) = self.stale_after else {
            return;
        };
        let before = self.entries.len();
        self.entries.retain(|_, slot| slot.touched.elapsed() < max_age);
        let evicted = before.saturating_sub(self.entries.len());
        if evicted > 0 {
            CACHE_EVENTS_TOTAL
                .with_label_values(&[self.resource, "evicted"])
                .inc_by(evicted as u64);
        }
    }

    /// Forget `key`. Fetches already in flight for it are not stored when
    /// they complete.
    pub fn invalidate(&self, key: &K) {
        if self.entries.remove(key).is_some() {
            self.record("invalidated");
        }
    }

    /// Forget every key.
    pub fn clear(&self) {
        self.entries.clear();
        self.record("cleared");
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One cache per record family.
pub struct DashboardCache {
    pub summary: ResourceCache<(), DashboardSummary>,
    pub customers: ResourceCache<(), Vec<Customer>>,
    pub customer_usage: ResourceCache<String, Vec<UsageRecord>>,
    pub invoices: ResourceCache<InvoiceQuery, Vec<Invoice>>,
    pub invoice_detail: ResourceCache<String, InvoiceDetail>,
    pub usage: ResourceCache<UsageQuery, Vec<UsageRecord>>,
    pub pricing: ResourceCache<(), Vec<PricingRecord>>,
    pub pipeline: ResourceCache<u32, Vec<PipelineRun>>,
}

impl DashboardCache {
    pub fn new(stale_after: Option<Duration>) -> Self {
        Self {
            summary: ResourceCache::new("dashboard_summary", stale_after),
            customers: ResourceCache::new("customers", stale_after),
            customer_usage: ResourceCache::new("customer_usage", stale_after),
            invoices: ResourceCache::new("invoices", stale_after),
            invoice_detail: ResourceCache::new("invoice_detail", stale_after),
            usage: ResourceCache::new("usage", stale_after),
            pricing: ResourceCache::new("pricing", stale_after),
            pipeline: ResourceCache::new("pipeline", stale_after),
        }
    }

    pub fn clear_all(&self) {
        self.summary.clear();
        self.customers.clear();
        self.customer_usage.clear();
        self.invoices.clear();
        self.invoice_detail.clear();
        self.usage.clear();
        self.pricing.clear();
        self.pipeline.clear();
    }
}
