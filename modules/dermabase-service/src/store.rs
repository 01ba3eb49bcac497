//! The external store seam: the collection contract the ingredient layer
//! needs, plus the Supabase-backed implementation.

use async_trait::async_trait;
use dermabase_core::{PotencyRecord, RegulatoryRecord};
use supabase_client::{Direction, Result, SupabaseClient};

/// Default rows-per-batch for the full-table fetch loop. The hosted store
/// caps response size at this; a shorter batch signals end-of-data.
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Read access to the two source collections. Batches must come back in a
/// stable total order so sequential pagination never skips or repeats rows.
#[async_trait]
pub trait IngredientStore: Send + Sync {
    /// One batch of FDA potency rows, ordered by ingredient name.
    async fn potency_batch(&self, offset: usize, limit: usize) -> Result<Vec<PotencyRecord>>;

    /// One batch of CosIng regulatory rows, ordered by reference number.
    async fn regulatory_batch(&self, offset: usize, limit: usize)
        -> Result<Vec<RegulatoryRecord>>;

    /// Exact row count of the potency collection, without fetching rows.
    async fn potency_count(&self) -> Result<u64>;
}

#[async_trait]
impl<S: IngredientStore + ?Sized> IngredientStore for std::sync::Arc<S> {
    async fn potency_batch(&self, offset: usize, limit: usize) -> Result<Vec<PotencyRecord>> {
        (**self).potency_batch(offset, limit).await
    }

    async fn regulatory_batch(
        &self,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<RegulatoryRecord>> {
        (**self).regulatory_batch(offset, limit).await
    }

    async fn potency_count(&self) -> Result<u64> {
        (**self).potency_count().await
    }
}

/// Supabase-backed store.
#[derive(Debug, Clone)]
pub struct SupabaseStore {
    client: SupabaseClient,
    potency_table: String,
    regulatory_table: String,
}

impl SupabaseStore {
    pub fn new(client: SupabaseClient) -> Self {
        Self {
            client,
            potency_table: "ingredients".to_string(),
            regulatory_table: "cosing_ingredients".to_string(),
        }
    }

    pub fn with_tables(
        mut self,
        potency_table: impl Into<String>,
        regulatory_table: impl Into<String>,
    ) -> Self {
        self.potency_table = potency_table.into();
        self.regulatory_table = regulatory_table.into();
        self
    }
}

#[async_trait]
impl IngredientStore for SupabaseStore {
    async fn potency_batch(&self, offset: usize, limit: usize) -> Result<Vec<PotencyRecord>> {
        // Names repeat across routes and source databases, so name alone is
        // not a total order. Tiebreak on the rest of the row's natural key,
        // or offset pagination can skip or duplicate rows at batch edges.
        let rows = self
            .client
            .from(&self.potency_table)
            .order("INGREDIENT_NAME", Direction::Asc, true)
            .order("ROUTE", Direction::Asc, true)
            .order("database", Direction::Asc, true)
            .range(offset, limit)
            .fetch::<PotencyRecord>()
            .await?;
        Ok(rows.rows)
    }

    async fn regulatory_batch(
        &self,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<RegulatoryRecord>> {
        let rows = self
            .client
            .from(&self.regulatory_table)
            .order("ref_no", Direction::Asc, false)
            .range(offset, limit)
            .fetch::<RegulatoryRecord>()
            .await?;
        Ok(rows.rows)
    }

    async fn potency_count(&self) -> Result<u64> {
        self.client.from(&self.potency_table).count().await
    }
}
