//! Keyword-driven benefit categorization and the per-category profile tables.
//!
//! Matching is substring, case-insensitive, no tokenization: a name containing
//! an unrelated substring that happens to contain a keyword is deliberately
//! over-inclusive. That tradeoff is pinned by tests rather than "fixed".

use crate::types::Category;

/// One category's matching rule: substrings looked for in the ingredient name
/// and in the application route.
#[derive(Debug, Clone)]
pub struct CategoryRule {
    pub category: Category,
    pub name_keywords: Vec<&'static str>,
    pub route_keywords: Vec<&'static str>,
}

/// Built-in rule table. Order matches [`Category::ALL`]; the categorizer
/// returns the first rule that matches.
fn default_rules() -> Vec<CategoryRule> {
    vec![
        CategoryRule {
            category: Category::Hydrating,
            name_keywords: vec!["hyaluron", "glycerin", "sodium pca", "squalane", "urea"],
            route_keywords: vec![],
        },
        CategoryRule {
            category: Category::AntiAging,
            name_keywords: vec![
                "retinol",
                "retinyl",
                "vitamin a",
                "palmitate",
                "peptide",
                "bakuchiol",
            ],
            route_keywords: vec![],
        },
        CategoryRule {
            category: Category::AcneFighting,
            name_keywords: vec!["salicylic", "benzoyl", "azelaic", "sulfur"],
            route_keywords: vec!["acne"],
        },
        CategoryRule {
            category: Category::Brightening,
            name_keywords: vec![
                "vitamin c",
                "ascorbic",
                "ascorbyl",
                "kojic",
                "niacinamide",
                "arbutin",
            ],
            route_keywords: vec![],
        },
        CategoryRule {
            category: Category::Sensitive,
            name_keywords: vec![
                "ceramide",
                "allantoin",
                "panthenol",
                "bisabolol",
                "centella",
                "colloidal oat",
            ],
            route_keywords: vec![],
        },
    ]
}

/// Assigns a benefit category from an ingredient name and optional application
/// route. Pure: identical input always yields the identical category.
#[derive(Debug, Clone)]
pub struct Categorizer {
    rules: Vec<CategoryRule>,
}

impl Default for Categorizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Categorizer {
    /// Categorizer with the built-in keyword table.
    pub fn new() -> Self {
        Self {
            rules: default_rules(),
        }
    }

    /// Categorizer with a custom rule table. Rules are scanned in the given
    /// order; first match wins.
    pub fn with_rules(rules: Vec<CategoryRule>) -> Self {
        Self { rules }
    }

    /// First category whose name keywords match the lowercased name, or whose
    /// route keywords match the lowercased route. Falls back to
    /// [`Category::Hydrating`] when nothing matches (including empty names).
    pub fn categorize(&self, name: &str, route: Option<&str>) -> Category {
        let name = name.to_lowercase();
        let route = route.map(|r| r.to_lowercase());

        for rule in &self.rules {
            if rule.name_keywords.iter().any(|kw| name.contains(kw)) {
                return rule.category;
            }
            if let Some(ref route) = route {
                if rule.route_keywords.iter().any(|kw| route.contains(kw)) {
                    return rule.category;
                }
            }
        }

        Category::Hydrating
    }
}

/// Fixed benefit/skin-type/concern annotations for one category.
#[derive(Debug, Clone, Copy)]
pub struct CategoryProfile {
    pub benefits: &'static [&'static str],
    pub skin_types: &'static [&'static str],
    pub concerns: &'static [&'static str],
}

impl Category {
    /// Pure static lookup; never empty, no failure mode.
    pub fn profile(&self) -> CategoryProfile {
        match self {
            Self::Hydrating => CategoryProfile {
                benefits: &["Moisturizes skin", "Plumps appearance", "Smooth texture"],
                skin_types: &["All skin types"],
                concerns: &["Dryness", "Dehydration", "Fine lines"],
            },
            Self::AntiAging => CategoryProfile {
                benefits: &["Reduces fine lines", "Improves firmness", "Evens texture"],
                skin_types: &["Normal", "Dry", "Mature"],
                concerns: &["Wrinkles", "Loss of firmness", "Age spots"],
            },
            Self::AcneFighting => CategoryProfile {
                benefits: &["Clears pores", "Reduces breakouts", "Controls oil"],
                skin_types: &["Oily", "Acne-prone", "Combination"],
                concerns: &["Acne", "Blackheads", "Oily skin"],
            },
            Self::Brightening => CategoryProfile {
                benefits: &["Evens skin tone", "Reduces dark spots", "Adds glow"],
                skin_types: &["All skin types"],
                concerns: &["Dark spots", "Uneven tone", "Dullness"],
            },
            Self::Sensitive => CategoryProfile {
                benefits: &["Soothes irritation", "Strengthens barrier", "Calms redness"],
                skin_types: &["Sensitive", "Dry", "Irritated"],
                concerns: &["Irritation", "Redness", "Sensitivity"],
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categorize_is_deterministic() {
        let categorizer = Categorizer::new();
        let first = categorizer.categorize("Sodium Hyaluronate", Some("Topical"));
        for _ in 0..10 {
            assert_eq!(
                categorizer.categorize("Sodium Hyaluronate", Some("Topical")),
                first
            );
        }
        assert_eq!(first, Category::Hydrating);
    }

    #[test]
    fn earlier_category_wins_on_double_match() {
        let categorizer = Categorizer::new();
        // "palmitate" (anti-aging) and "ascorbyl" (brightening) both match;
        // anti-aging is declared earlier.
        assert_eq!(
            categorizer.categorize("Ascorbyl Palmitate", None),
            Category::AntiAging
        );
    }

    #[test]
    fn route_keywords_match_when_name_does_not() {
        let categorizer = Categorizer::new();
        assert_eq!(
            categorizer.categorize("Unremarkable Extract", Some("Topical; Acne")),
            Category::AcneFighting
        );
    }

    #[test]
    fn unmatched_and_empty_names_default_to_hydrating() {
        let categorizer = Categorizer::new();
        assert_eq!(categorizer.categorize("Petrolatum", None), Category::Hydrating);
        assert_eq!(categorizer.categorize("", None), Category::Hydrating);
    }

    #[test]
    fn substring_matching_is_over_inclusive_by_design() {
        let categorizer = Categorizer::new();
        // "Hydroxyurea" is not a moisturizer, but it contains "urea". The
        // heuristic accepts this kind of false positive.
        assert_eq!(
            categorizer.categorize("Hydroxyurea", None),
            Category::Hydrating
        );
    }

    #[test]
    fn matching_is_case_insensitive() {
        let categorizer = Categorizer::new();
        assert_eq!(
            categorizer.categorize("RETINOL", None),
            Category::AntiAging
        );
        assert_eq!(
            categorizer.categorize("retinol", None),
            Category::AntiAging
        );
    }

    #[test]
    fn custom_rules_replace_the_builtin_table() {
        let categorizer = Categorizer::with_rules(vec![CategoryRule {
            category: Category::Sensitive,
            name_keywords: vec!["water"],
            route_keywords: vec![],
        }]);
        assert_eq!(categorizer.categorize("Water", None), Category::Sensitive);
        // Built-in keywords are gone.
        assert_eq!(categorizer.categorize("Retinol", None), Category::Hydrating);
    }

    #[test]
    fn every_profile_is_non_empty() {
        for category in Category::ALL {
            let profile = category.profile();
            assert!(!profile.benefits.is_empty());
            assert!(!profile.skin_types.is_empty());
            assert!(!profile.concerns.is_empty());
        }
    }
}
