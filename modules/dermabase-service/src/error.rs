//! Typed errors for the orchestration layer.

use thiserror::Error;

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

/// Errors surfaced to presentation code. Store errors pass through
/// unmodified after the retry budget is exhausted; nothing is swallowed.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Upstream store/network failure
    #[error("store error: {0}")]
    Store(#[from] supabase_client::StoreError),
}
