//! Identity merger: collapses normalized records from both sources into one
//! logical ingredient per chemical identity.
//!
//! The merge key is the CAS number when present, else the lowercased name.
//! FDA records are inserted first (last write wins on duplicate keys within
//! that list); CosIng records then either combine into an existing entry or
//! append a new one. Output is sorted ascending by name.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::Ingredient;

/// Merge behavior knobs.
///
/// The reference pipeline appends `sources` and `functions` on merge without
/// deduplicating, so a record normalized twice can list the same provenance
/// twice. That is kept as the default for compatibility; `dedupe_lists`
/// opts into collapsing duplicates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MergeOptions {
    pub dedupe_lists: bool,
}

impl MergeOptions {
    pub fn deduplicating() -> Self {
        Self { dedupe_lists: true }
    }
}

/// Merge FDA-normalized and CosIng-normalized ingredients. Never fails;
/// malformed inputs were already defaulted by the normalizers.
pub fn merge(
    fda: Vec<Ingredient>,
    cosing: Vec<Ingredient>,
    options: &MergeOptions,
) -> Vec<Ingredient> {
    let mut merged: Vec<Ingredient> = Vec::with_capacity(fda.len() + cosing.len());
    // Insertion-ordered accumulation: the HashMap only indexes into `merged`,
    // so output never depends on hash iteration order.
    let mut index: HashMap<String, usize> = HashMap::with_capacity(merged.capacity());

    for ingredient in fda {
        let key = ingredient.merge_key();
        match index.get(&key) {
            Some(&slot) => merged[slot] = ingredient,
            None => {
                index.insert(key, merged.len());
                merged.push(ingredient);
            }
        }
    }

    for ingredient in cosing {
        let key = ingredient.merge_key();
        match index.get(&key) {
            Some(&slot) => {
                let combined = combine(merged[slot].clone(), ingredient);
                merged[slot] = combined;
            }
            None => {
                index.insert(key, merged.len());
                merged.push(ingredient);
            }
        }
    }

    if options.dedupe_lists {
        for ingredient in &mut merged {
            dedupe_in_place(&mut ingredient.sources);
            dedupe_in_place(&mut ingredient.functions);
        }
    }

    merged.sort_by(|a, b| compare_names(&a.name, &b.name));
    tracing::debug!(count = merged.len(), "Merged canonical ingredient set");
    merged
}

/// Case-insensitive name ordering with the raw string as tiebreak, so equal
/// inputs always produce byte-identical output.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Combine an incoming record into an existing one sharing its identity key.
/// Produces a new record; neither input is mutated in place.
fn combine(existing: Ingredient, incoming: Ingredient) -> Ingredient {
    let mut merged = existing;

    merged.sources.extend(incoming.sources);
    merged.functions.extend(incoming.functions);

    // Longer text wins. Character length, not quality.
    if incoming.description.chars().count() > merged.description.chars().count() {
        merged.description = incoming.description;
    }

    merged.restriction = incoming.restriction.or(merged.restriction);
    merged.ec_number = incoming.ec_number.or(merged.ec_number);

    // Fields only one side carries pass through unchanged.
    merged.cas_number = merged.cas_number.or(incoming.cas_number);
    merged.route = merged.route.or(incoming.route);
    merged.potency = merged.potency.or(incoming.potency);
    merged.max_exposure = merged.max_exposure.or(incoming.max_exposure);
    merged.product_count = merged.product_count.or(incoming.product_count);

    merged
}

fn dedupe_in_place<T: PartialEq + Clone>(items: &mut Vec<T>) {
    let mut seen: Vec<T> = Vec::with_capacity(items.len());
    items.retain(|item| {
        if seen.contains(item) {
            false
        } else {
            seen.push(item.clone());
            true
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Categorizer;
    use crate::normalize::{normalize_potency, normalize_regulatory};
    use crate::types::{PotencyRecord, Provenance, RegulatoryRecord};

    fn fda_retinol() -> Ingredient {
        let record: PotencyRecord = serde_json::from_value(serde_json::json!({
            "INGREDIENT_NAME": "Retinol",
            "CAS_NUMBER": "302-79-4",
            "ROUTE": "Topical",
            "POTENCY_AMOUNT": "0.3",
            "POTENCY_UNIT": "%",
        }))
        .unwrap();
        normalize_potency(&record, &Categorizer::new())
    }

    fn cosing_retinol() -> Ingredient {
        let record = RegulatoryRecord {
            ref_no: 100,
            inci_name: Some("Retinol".into()),
            inn_name: None,
            ph_eur_name: None,
            cas_no: Some("302-79-4".into()),
            ec_no: Some("206-129-0".into()),
            chem_iupac_name: None,
            restriction: None,
            function: Some("skin conditioning, emollient".into()),
        };
        normalize_regulatory(&record, &Categorizer::new())
    }

    #[test]
    fn same_cas_collapses_to_one_record() {
        let merged = merge(
            vec![fda_retinol()],
            vec![cosing_retinol()],
            &MergeOptions::default(),
        );

        assert_eq!(merged.len(), 1);
        let retinol = &merged[0];
        assert_eq!(retinol.id, "302-79-4");
        assert_eq!(retinol.sources, vec![Provenance::Fda, Provenance::Cosing]);
        assert_eq!(retinol.functions, vec!["Skin Conditioning", "Emollient"]);
        assert_eq!(retinol.category, crate::types::Category::AntiAging);
        // FDA-only fields survive the combine.
        assert_eq!(retinol.potency.as_deref(), Some("0.3 %"));
        assert_eq!(retinol.ec_number.as_deref(), Some("206-129-0"));
    }

    #[test]
    fn merge_does_not_dedupe_lists_by_default() {
        // Merging a list against itself duplicates provenance and functions.
        let merged = merge(
            vec![cosing_retinol()],
            vec![cosing_retinol()],
            &MergeOptions::default(),
        );

        assert_eq!(merged.len(), 1);
        assert_eq!(
            merged[0].sources,
            vec![Provenance::Cosing, Provenance::Cosing]
        );
        assert_eq!(merged[0].functions.len(), 4);
    }

    #[test]
    fn dedupe_option_collapses_duplicate_lists() {
        let merged = merge(
            vec![cosing_retinol()],
            vec![cosing_retinol()],
            &MergeOptions::deduplicating(),
        );

        assert_eq!(merged[0].sources, vec![Provenance::Cosing]);
        assert_eq!(merged[0].functions, vec!["Skin Conditioning", "Emollient"]);
    }

    #[test]
    fn duplicate_keys_within_fda_list_are_last_write_wins() {
        let mut first = fda_retinol();
        first.description = "first".into();
        let mut second = fda_retinol();
        second.description = "second".into();

        let merged = merge(vec![first, second], vec![], &MergeOptions::default());
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].description, "second");
    }

    #[test]
    fn longer_description_wins() {
        let mut fda = fda_retinol();
        fda.description = "Short.".into();
        let mut cosing = cosing_retinol();
        cosing.description = "A much longer chemical description of retinol.".into();

        let merged = merge(vec![fda], vec![cosing], &MergeOptions::default());
        assert_eq!(
            merged[0].description,
            "A much longer chemical description of retinol."
        );

        // And the other way around: the existing longer text is kept.
        let mut fda = fda_retinol();
        fda.description = "A much longer chemical description of retinol.".into();
        let mut cosing = cosing_retinol();
        cosing.description = "Short.".into();

        let merged = merge(vec![fda], vec![cosing], &MergeOptions::default());
        assert_eq!(
            merged[0].description,
            "A much longer chemical description of retinol."
        );
    }

    #[test]
    fn name_key_merges_records_without_cas() {
        let categorizer = Categorizer::new();
        let fda: PotencyRecord = serde_json::from_value(serde_json::json!({
            "INGREDIENT_NAME": "Panthenol",
        }))
        .unwrap();
        let cosing = RegulatoryRecord {
            ref_no: 7,
            inci_name: Some("PANTHENOL".into()),
            inn_name: None,
            ph_eur_name: None,
            cas_no: None,
            ec_no: None,
            chem_iupac_name: None,
            restriction: None,
            function: None,
        };

        let merged = merge(
            vec![normalize_potency(&fda, &categorizer)],
            vec![normalize_regulatory(&cosing, &categorizer)],
            &MergeOptions::default(),
        );
        assert_eq!(merged.len(), 1);
    }

    #[test]
    fn output_is_sorted_by_name_case_insensitively() {
        let categorizer = Categorizer::new();
        let names = ["zinc oxide", "Allantoin", "glycerin", "Bisabolol"];
        let fda: Vec<Ingredient> = names
            .iter()
            .map(|name| {
                let record: PotencyRecord =
                    serde_json::from_value(serde_json::json!({ "INGREDIENT_NAME": name }))
                        .unwrap();
                normalize_potency(&record, &categorizer)
            })
            .collect();

        let merged = merge(fda, vec![], &MergeOptions::default());
        let ordered: Vec<&str> = merged.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(
            ordered,
            vec!["Allantoin", "Bisabolol", "glycerin", "zinc oxide"]
        );
    }

    #[test]
    fn merge_order_does_not_change_the_identity_set() {
        let a1 = fda_retinol();
        let mut a2 = fda_retinol();
        a2.cas_number = Some("50-81-7".into());
        a2.id = "50-81-7".into();
        a2.name = "Ascorbic Acid".into();

        let forward = merge(
            vec![a1.clone(), a2.clone()],
            vec![cosing_retinol()],
            &MergeOptions::default(),
        );
        let reordered = merge(
            vec![a2, a1],
            vec![cosing_retinol()],
            &MergeOptions::default(),
        );

        let mut forward_ids: Vec<String> = forward.iter().map(|i| i.id.clone()).collect();
        let mut reordered_ids: Vec<String> = reordered.iter().map(|i| i.id.clone()).collect();
        forward_ids.sort();
        reordered_ids.sort();
        assert_eq!(forward_ids, reordered_ids);
    }
}
