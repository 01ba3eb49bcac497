//! Orchestration layer: composes the store client with the core
//! reconciliation pipeline and exposes the query contract presentation code
//! consumes (`data`, `total_count`, `has_more`, error).

pub mod config;
pub mod error;
pub mod ingredients;
pub mod sequence;
pub mod store;

pub use config::AppConfig;
pub use error::{ServiceError, ServiceResult};
pub use ingredients::IngredientService;
pub use sequence::RequestSequencer;
pub use store::{IngredientStore, SupabaseStore, DEFAULT_BATCH_SIZE};
