//! The orchestrator behind the ingredient views: fetch both sources, build
//! the canonical merged set, and answer filtered/paginated queries.
//!
//! Fetching is all-or-nothing: if either source fails after the retry budget,
//! the whole operation fails. Partial data is never served as if complete.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

use dermabase_core::{
    merge, normalize_potency, normalize_regulatory, query, Categorizer, Filters, Ingredient,
    MergeOptions, PotencyRecord, QueryPage, RegulatoryRecord,
};
use supabase_client::StoreError;

use crate::error::{ServiceError, ServiceResult};
use crate::sequence::RequestSequencer;
use crate::store::{IngredientStore, DEFAULT_BATCH_SIZE};

const MAX_RETRIES: u32 = 2;
const RETRY_DELAY: Duration = Duration::from_millis(500);

/// Ingredient data service over any [`IngredientStore`].
pub struct IngredientService<S> {
    store: S,
    categorizer: Categorizer,
    merge_options: MergeOptions,
    batch_size: usize,
    cache: RwLock<Option<Arc<Vec<Ingredient>>>>,
    sequencer: RequestSequencer,
}

impl<S: IngredientStore> IngredientService<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            categorizer: Categorizer::new(),
            merge_options: MergeOptions::default(),
            batch_size: DEFAULT_BATCH_SIZE,
            cache: RwLock::new(None),
            sequencer: RequestSequencer::new(),
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn with_merge_options(mut self, merge_options: MergeOptions) -> Self {
        self.merge_options = merge_options;
        self
    }

    pub fn with_categorizer(mut self, categorizer: Categorizer) -> Self {
        self.categorizer = categorizer;
        self
    }

    /// One page of the canonical set under `filters`.
    pub async fn query(&self, filters: &Filters) -> ServiceResult<QueryPage> {
        let canonical = self.canonical().await?;
        Ok(query::run(&canonical, filters))
    }

    /// Like [`query`](Self::query), but tagged with a request ticket.
    /// Returns `Ok(None)` when a newer request's response already applied,
    /// so rapid filter changes never surface stale pages.
    pub async fn query_latest(&self, filters: &Filters) -> ServiceResult<Option<QueryPage>> {
        let ticket = self.sequencer.begin();
        let page = self.query(filters).await?;
        if self.sequencer.try_apply(ticket) {
            Ok(Some(page))
        } else {
            tracing::debug!(ticket, "Discarding superseded query response");
            Ok(None)
        }
    }

    /// Exact row count of the primary ingredient collection.
    pub async fn count(&self) -> ServiceResult<u64> {
        with_retries("count", || self.store.potency_count())
            .await
            .map_err(ServiceError::from)
    }

    /// Drop the cached canonical set. Callers mutating related collections
    /// (favorites, history) invoke this so the next query re-reads the store.
    pub async fn invalidate(&self) {
        *self.cache.write().await = None;
    }

    async fn canonical(&self) -> ServiceResult<Arc<Vec<Ingredient>>> {
        if let Some(cached) = self.cache.read().await.clone() {
            return Ok(cached);
        }

        let merged = Arc::new(self.load().await?);
        *self.cache.write().await = Some(merged.clone());
        Ok(merged)
    }

    /// Fetch both sources concurrently, then normalize and merge.
    async fn load(&self) -> ServiceResult<Vec<Ingredient>> {
        let (potency, regulatory) = tokio::join!(
            with_retries("potency", || self.fetch_all_potency()),
            with_retries("regulatory", || self.fetch_all_regulatory()),
        );
        let potency = potency?;
        let regulatory = regulatory?;
        tracing::info!(
            potency = potency.len(),
            regulatory = regulatory.len(),
            "Fetched source rows"
        );

        let fda: Vec<Ingredient> = potency
            .iter()
            .map(|record| normalize_potency(record, &self.categorizer))
            .collect();
        let cosing: Vec<Ingredient> = regulatory
            .iter()
            .map(|record| normalize_regulatory(record, &self.categorizer))
            .collect();

        let merged = merge(fda, cosing, &self.merge_options);
        tracing::info!(count = merged.len(), "Built canonical ingredient set");
        Ok(merged)
    }

    /// Pull fixed-size batches sequentially until a short batch signals
    /// end-of-data. Sequential on purpose: each range depends on knowing the
    /// previous batch was full.
    async fn fetch_all_potency(&self) -> supabase_client::Result<Vec<PotencyRecord>> {
        let mut all = Vec::new();
        let mut offset = 0;
        loop {
            let batch = self.store.potency_batch(offset, self.batch_size).await?;
            let fetched = batch.len();
            all.extend(batch);
            if fetched < self.batch_size {
                break;
            }
            offset += fetched;
        }
        Ok(all)
    }

    async fn fetch_all_regulatory(&self) -> supabase_client::Result<Vec<RegulatoryRecord>> {
        let mut all = Vec::new();
        let mut offset = 0;
        loop {
            let batch = self.store.regulatory_batch(offset, self.batch_size).await?;
            let fetched = batch.len();
            all.extend(batch);
            if fetched < self.batch_size {
                break;
            }
            offset += fetched;
        }
        Ok(all)
    }
}

/// Run `op`, retrying up to [`MAX_RETRIES`] times with a fixed delay. The
/// final error is surfaced unmodified.
async fn with_retries<T, F, Fut>(what: &str, mut op: F) -> Result<T, StoreError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, StoreError>>,
{
    let mut attempt = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(error) if attempt < MAX_RETRIES => {
                attempt += 1;
                tracing::warn!(what, attempt, error = %error, "Store fetch failed, retrying");
                tokio::time::sleep(RETRY_DELAY).await;
            }
            Err(error) => return Err(error),
        }
    }
}
