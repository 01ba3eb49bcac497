//! Core ingredient reconciliation: categorization, source normalization,
//! identity merging, and the filter/sort/paginate query engine.
//!
//! Everything here is pure and synchronous; fetching lives in
//! `dermabase-service`.

pub mod category;
pub mod merge;
pub mod normalize;
pub mod query;
pub mod types;

pub use category::{Categorizer, CategoryProfile, CategoryRule};
pub use merge::{merge, MergeOptions};
pub use normalize::{normalize_potency, normalize_regulatory, UNKNOWN_NAME};
pub use query::{CategoryFilter, DataPresence, Filters, QueryPage, SortKey};
pub use types::{Category, Ingredient, PotencyRecord, Provenance, RegulatoryRecord};
