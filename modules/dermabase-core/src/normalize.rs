//! Source normalizers: raw FDA and CosIng rows into canonical [`Ingredient`]s.
//!
//! Normalization never fails. Malformed rows get explicit defaults (an
//! "Unknown" name, a fallback id) so the merge and query stages always
//! complete.

use std::fmt::Write as _;

use crate::category::Categorizer;
use crate::types::{Category, Ingredient, PotencyRecord, Provenance, RegulatoryRecord};

/// Name substituted when a source row carries no usable name.
pub const UNKNOWN_NAME: &str = "Unknown";

/// Normalize one FDA potency/exposure row.
pub fn normalize_potency(record: &PotencyRecord, categorizer: &Categorizer) -> Ingredient {
    let name = match non_empty(Some(record.ingredient_name.as_str())) {
        Some(name) => name,
        None => UNKNOWN_NAME.to_string(),
    };
    let route = non_empty(record.route.as_deref());
    let category = categorizer.categorize(&name, route.as_deref());

    let potency = unit_pair(
        record.potency_amount.as_deref(),
        record.potency_unit.as_deref(),
    );
    let max_exposure = unit_pair(
        record.max_daily_exposure.as_deref(),
        record.max_daily_exposure_unit.as_deref(),
    );

    let description = match non_empty(record.description.as_deref()) {
        Some(text) => text,
        None => generated_description(category, potency.as_deref(), route.as_deref()),
    };

    let cas_number = record.cas_number.as_deref().and_then(normalize_cas);
    let id = cas_number.clone().unwrap_or_else(|| name.clone());
    let profile = category.profile();

    Ingredient {
        id,
        name,
        category,
        description,
        benefits: owned(profile.benefits),
        skin_types: owned(profile.skin_types),
        concerns: owned(profile.concerns),
        cas_number,
        ec_number: None,
        route,
        potency,
        max_exposure,
        sources: vec![Provenance::Fda],
        functions: Vec::new(),
        restriction: None,
        product_count: None,
    }
}

/// Normalize one CosIng regulatory row.
pub fn normalize_regulatory(record: &RegulatoryRecord, categorizer: &Categorizer) -> Ingredient {
    // Source-defined name preference: INCI, then INN, then Ph. Eur.
    let name = non_empty(record.inci_name.as_deref())
        .or_else(|| non_empty(record.inn_name.as_deref()))
        .or_else(|| non_empty(record.ph_eur_name.as_deref()))
        .unwrap_or_else(|| UNKNOWN_NAME.to_string());

    // No application route in this dataset.
    let category = categorizer.categorize(&name, None);

    let cas_number = record.cas_no.as_deref().and_then(normalize_cas);
    let id = cas_number
        .clone()
        .unwrap_or_else(|| format!("cosing-{}", record.ref_no));

    let description = match non_empty(record.chem_iupac_name.as_deref()) {
        Some(text) => text,
        None => generated_description(category, None, None),
    };

    let profile = category.profile();

    Ingredient {
        id,
        name,
        category,
        description,
        benefits: owned(profile.benefits),
        skin_types: owned(profile.skin_types),
        concerns: owned(profile.concerns),
        cas_number,
        ec_number: non_empty(record.ec_no.as_deref()),
        route: None,
        potency: None,
        max_exposure: None,
        sources: vec![Provenance::Cosing],
        functions: parse_functions(record.function.as_deref()),
        restriction: non_empty(record.restriction.as_deref()),
        product_count: None,
    }
}

/// "amount unit" string, only when both halves are present.
fn unit_pair(amount: Option<&str>, unit: Option<&str>) -> Option<String> {
    match (non_empty(amount), non_empty(unit)) {
        (Some(amount), Some(unit)) => Some(format!("{amount} {unit}")),
        _ => None,
    }
}

/// Fallback description when a source carries no free text.
fn generated_description(
    category: Category,
    potency: Option<&str>,
    route: Option<&str>,
) -> String {
    let mut text = format!(
        "A scientifically-backed {} ingredient",
        category.adjective()
    );
    if let Some(potency) = potency {
        let _ = write!(text, " with {potency} potency");
    }
    if let Some(route) = route {
        let _ = write!(text, " for {} application", route.to_lowercase());
    }
    text.push('.');
    text
}

/// Strip all whitespace from a CAS string ("7732- 18-5" → "7732-18-5").
fn normalize_cas(raw: &str) -> Option<String> {
    let stripped: String = raw.split_whitespace().collect();
    if stripped.is_empty() {
        None
    } else {
        Some(stripped)
    }
}

/// Split the comma-separated CosIng function list, trim, drop empties,
/// title-case each word.
fn parse_functions(raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(title_case)
        .collect()
}

fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn potency_record(name: &str) -> PotencyRecord {
        PotencyRecord {
            ingredient_name: name.to_string(),
            cas_number: None,
            route: None,
            unii: None,
            potency_amount: None,
            potency_unit: None,
            max_daily_exposure: None,
            max_daily_exposure_unit: None,
            description: None,
            record_updated: None,
            database: None,
        }
    }

    fn regulatory_record(ref_no: i64) -> RegulatoryRecord {
        RegulatoryRecord {
            ref_no,
            inci_name: None,
            inn_name: None,
            ph_eur_name: None,
            cas_no: None,
            ec_no: None,
            chem_iupac_name: None,
            restriction: None,
            function: None,
        }
    }

    #[test]
    fn potency_string_requires_both_amount_and_unit() {
        let categorizer = Categorizer::new();

        let mut record = potency_record("Retinol");
        record.potency_amount = Some("0.3".into());
        assert!(normalize_potency(&record, &categorizer).potency.is_none());

        record.potency_unit = Some("%".into());
        assert_eq!(
            normalize_potency(&record, &categorizer).potency.as_deref(),
            Some("0.3 %")
        );
    }

    #[test]
    fn generated_description_includes_potency_and_route() {
        let categorizer = Categorizer::new();
        let mut record = potency_record("Retinol");
        record.route = Some("Topical".into());
        record.potency_amount = Some("0.3".into());
        record.potency_unit = Some("%".into());

        let ingredient = normalize_potency(&record, &categorizer);
        assert_eq!(
            ingredient.description,
            "A scientifically-backed anti-aging ingredient with 0.3 % potency for topical application."
        );
    }

    #[test]
    fn explicit_description_beats_the_generated_one() {
        let categorizer = Categorizer::new();
        let mut record = potency_record("Retinol");
        record.description = Some("Vitamin A derivative.".into());

        let ingredient = normalize_potency(&record, &categorizer);
        assert_eq!(ingredient.description, "Vitamin A derivative.");
    }

    #[test]
    fn potency_id_falls_back_to_name_without_cas() {
        let categorizer = Categorizer::new();
        let ingredient = normalize_potency(&potency_record("Glycerin"), &categorizer);
        assert_eq!(ingredient.id, "Glycerin");
        assert_eq!(ingredient.sources, vec![Provenance::Fda]);
        assert!(ingredient.functions.is_empty());
    }

    #[test]
    fn blank_name_becomes_unknown() {
        let categorizer = Categorizer::new();
        let ingredient = normalize_potency(&potency_record("   "), &categorizer);
        assert_eq!(ingredient.name, UNKNOWN_NAME);
        assert_eq!(ingredient.category, Category::Hydrating);
    }

    #[test]
    fn regulatory_name_preference_order() {
        let categorizer = Categorizer::new();

        let mut record = regulatory_record(1);
        record.inn_name = Some("tretinoin".into());
        record.ph_eur_name = Some("tretinoinum".into());
        assert_eq!(
            normalize_regulatory(&record, &categorizer).name,
            "tretinoin"
        );

        record.inci_name = Some("Retinoic Acid".into());
        assert_eq!(
            normalize_regulatory(&record, &categorizer).name,
            "Retinoic Acid"
        );

        let nameless = regulatory_record(2);
        assert_eq!(
            normalize_regulatory(&nameless, &categorizer).name,
            UNKNOWN_NAME
        );
    }

    #[test]
    fn cas_whitespace_is_stripped() {
        let categorizer = Categorizer::new();
        let mut record = regulatory_record(3);
        record.cas_no = Some("7732- 18 -5".into());

        let ingredient = normalize_regulatory(&record, &categorizer);
        assert_eq!(ingredient.cas_number.as_deref(), Some("7732-18-5"));
        assert_eq!(ingredient.id, "7732-18-5");
    }

    #[test]
    fn regulatory_id_falls_back_to_ref_no() {
        let categorizer = Categorizer::new();
        let ingredient = normalize_regulatory(&regulatory_record(4711), &categorizer);
        assert_eq!(ingredient.id, "cosing-4711");
    }

    #[test]
    fn function_list_is_split_trimmed_and_title_cased() {
        let categorizer = Categorizer::new();
        let mut record = regulatory_record(5);
        record.function = Some("skin conditioning , emollient,, VISCOSITY CONTROLLING".into());

        let ingredient = normalize_regulatory(&record, &categorizer);
        assert_eq!(
            ingredient.functions,
            vec!["Skin Conditioning", "Emollient", "Viscosity Controlling"]
        );
    }

    #[test]
    fn restriction_and_ec_number_are_trimmed_only() {
        let categorizer = Categorizer::new();
        let mut record = regulatory_record(6);
        record.ec_no = Some(" 231-791-2 ".into());
        record.restriction = Some(" III/12 ".into());

        let ingredient = normalize_regulatory(&record, &categorizer);
        assert_eq!(ingredient.ec_number.as_deref(), Some("231-791-2"));
        assert_eq!(ingredient.restriction.as_deref(), Some("III/12"));
    }

    #[test]
    fn derived_annotations_are_never_empty() {
        let categorizer = Categorizer::new();
        let ingredient = normalize_regulatory(&regulatory_record(7), &categorizer);
        assert!(!ingredient.benefits.is_empty());
        assert!(!ingredient.skin_types.is_empty());
        assert!(!ingredient.concerns.is_empty());
    }
}
