//! Filter/sort/paginate engine over a canonical ingredient set.
//!
//! Given identical inputs the output is byte-identical: filtering walks the
//! slice in order, sorts are stable, and no unordered container is iterated.

use std::cmp::Ordering;

use crate::merge::compare_names;
use crate::types::{Category, Ingredient};

/// Category filter: everything, or exactly one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl std::fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(category) => f.write_str(category.as_str()),
        }
    }
}

impl std::str::FromStr for CategoryFilter {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            other => Ok(Self::Only(other.parse()?)),
        }
    }
}

/// Keep only records where the named optional field is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataPresence {
    #[default]
    All,
    WithCas,
    WithPotency,
    WithExposure,
    WithProducts,
}

impl DataPresence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::WithCas => "with-cas",
            Self::WithPotency => "with-potency",
            Self::WithExposure => "with-exposure",
            Self::WithProducts => "with-products",
        }
    }
}

impl std::fmt::Display for DataPresence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DataPresence {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "with-cas" => Ok(Self::WithCas),
            "with-potency" => Ok(Self::WithPotency),
            "with-exposure" => Ok(Self::WithExposure),
            "with-products" => Ok(Self::WithProducts),
            _ => Err(anyhow::anyhow!("Unknown data filter: {}", s)),
        }
    }
}

/// Sort order for the filtered set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Name,
    NameDesc,
    Cas,
    Category,
    ProductCount,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::NameDesc => "name-desc",
            Self::Cas => "cas",
            Self::Category => "category",
            Self::ProductCount => "product-count",
        }
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SortKey {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(Self::Name),
            "name-desc" => Ok(Self::NameDesc),
            "cas" => Ok(Self::Cas),
            "category" => Ok(Self::Category),
            "product-count" => Ok(Self::ProductCount),
            _ => Err(anyhow::anyhow!("Unknown sort key: {}", s)),
        }
    }
}

/// One query's worth of search/filter/sort/pagination parameters.
#[derive(Debug, Clone)]
pub struct Filters {
    /// Case-insensitive substring over name, description, CAS number, and
    /// function labels. Empty matches everything.
    pub search: String,
    pub category: CategoryFilter,
    pub has_data: DataPresence,
    pub sort_by: SortKey,
    /// 1-based page number.
    pub page: usize,
    pub limit: usize,
}

impl Default for Filters {
    fn default() -> Self {
        Self {
            search: String::new(),
            category: CategoryFilter::All,
            has_data: DataPresence::All,
            sort_by: SortKey::Name,
            page: 1,
            limit: 10,
        }
    }
}

impl Filters {
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = CategoryFilter::Only(category);
        self
    }

    pub fn with_has_data(mut self, has_data: DataPresence) -> Self {
        self.has_data = has_data;
        self
    }

    pub fn with_sort(mut self, sort_by: SortKey) -> Self {
        self.sort_by = sort_by;
        self
    }

    pub fn with_page(mut self, page: usize, limit: usize) -> Self {
        self.page = page;
        self.limit = limit;
        self
    }
}

/// One page of query results plus the counts pagination needs.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryPage {
    pub data: Vec<Ingredient>,
    /// Count after search/category/data filtering, before pagination.
    pub total_count: usize,
    pub has_more: bool,
}

/// Filter, sort, and slice `items` according to `filters`.
///
/// Requesting a page past the end returns empty data with `has_more = false`,
/// not an error. `page`/`limit` of zero are clamped to 1.
pub fn run(items: &[Ingredient], filters: &Filters) -> QueryPage {
    let needle = filters.search.to_lowercase();
    let mut matched: Vec<&Ingredient> = items
        .iter()
        .filter(|ingredient| matches(ingredient, filters, &needle))
        .collect();

    // Base order is name-ascending so every sort key breaks ties the same
    // way regardless of input order.
    matched.sort_by(|a, b| compare_names(&a.name, &b.name));
    sort(&mut matched, filters.sort_by);

    let total_count = matched.len();
    let page = filters.page.max(1);
    let limit = filters.limit.max(1);
    let start = (page - 1).saturating_mul(limit);

    let data = if start >= total_count {
        Vec::new()
    } else {
        matched[start..(start + limit).min(total_count)]
            .iter()
            .map(|ingredient| (*ingredient).clone())
            .collect()
    };

    QueryPage {
        data,
        total_count,
        has_more: page.saturating_mul(limit) < total_count,
    }
}

fn matches(ingredient: &Ingredient, filters: &Filters, needle: &str) -> bool {
    if let CategoryFilter::Only(category) = filters.category {
        if ingredient.category != category {
            return false;
        }
    }

    let present = match filters.has_data {
        DataPresence::All => true,
        DataPresence::WithCas => ingredient.cas_number.is_some(),
        DataPresence::WithPotency => ingredient.potency.is_some(),
        DataPresence::WithExposure => ingredient.max_exposure.is_some(),
        DataPresence::WithProducts => ingredient.product_count.is_some_and(|count| count > 0),
    };
    if !present {
        return false;
    }

    if needle.is_empty() {
        return true;
    }

    ingredient.name.to_lowercase().contains(needle)
        || ingredient.description.to_lowercase().contains(needle)
        || ingredient
            .cas_number
            .as_deref()
            .is_some_and(|cas| cas.to_lowercase().contains(needle))
        || ingredient
            .functions
            .iter()
            .any(|function| function.to_lowercase().contains(needle))
}

fn sort(matched: &mut [&Ingredient], key: SortKey) {
    match key {
        SortKey::Name => {} // already in base order
        SortKey::NameDesc => {
            matched.sort_by(|a, b| compare_names(&b.name, &a.name));
        }
        SortKey::Cas => {
            matched.sort_by(|a, b| nulls_last(a.cas_number.as_deref(), b.cas_number.as_deref()));
        }
        SortKey::Category => {
            matched.sort_by(|a, b| a.category.as_str().cmp(b.category.as_str()));
        }
        SortKey::ProductCount => {
            // Most-used first; records without a count sort last.
            matched.sort_by(|a, b| match (a.product_count, b.product_count) {
                (Some(a), Some(b)) => b.cmp(&a),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            });
        }
    }
}

fn nulls_last(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
