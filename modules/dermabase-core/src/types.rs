use serde::{Deserialize, Serialize};

/// The five skincare benefit classes every canonical ingredient is assigned to.
///
/// Declaration order is load-bearing: the categorizer scans categories in this
/// order and returns the first match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Hydrating,
    AntiAging,
    AcneFighting,
    Brightening,
    Sensitive,
}

impl Category {
    /// All categories, in categorizer precedence order.
    pub const ALL: [Category; 5] = [
        Category::Hydrating,
        Category::AntiAging,
        Category::AcneFighting,
        Category::Brightening,
        Category::Sensitive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hydrating => "hydrating",
            Self::AntiAging => "anti-aging",
            Self::AcneFighting => "acne-fighting",
            Self::Brightening => "brightening",
            Self::Sensitive => "sensitive",
        }
    }

    /// Adjective used when generating fallback descriptions.
    pub fn adjective(&self) -> &'static str {
        match self {
            Self::Hydrating => "hydrating",
            Self::AntiAging => "anti-aging",
            Self::AcneFighting => "acne-fighting",
            Self::Brightening => "brightening",
            Self::Sensitive => "gentle",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hydrating" => Ok(Self::Hydrating),
            "anti-aging" => Ok(Self::AntiAging),
            "acne-fighting" => Ok(Self::AcneFighting),
            "brightening" => Ok(Self::Brightening),
            "sensitive" => Ok(Self::Sensitive),
            _ => Err(anyhow::anyhow!("Unknown category: {}", s)),
        }
    }
}

/// Which upstream dataset contributed to a canonical record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    Fda,
    Cosing,
}

impl Provenance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fda => "FDA",
            Self::Cosing => "CosIng",
        }
    }
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw row from the FDA potency/exposure table.
///
/// One row per (ingredient, route, database) combination; ingredient names are
/// not unique. The CAS column is typed numerically in the hosted table but
/// arrives as either a JSON number or a string depending on the export, so it
/// gets a tolerant deserializer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PotencyRecord {
    #[serde(rename = "INGREDIENT_NAME")]
    pub ingredient_name: String,
    #[serde(rename = "CAS_NUMBER", default, deserialize_with = "de_string_or_number")]
    pub cas_number: Option<String>,
    #[serde(rename = "ROUTE", default)]
    pub route: Option<String>,
    #[serde(rename = "UNII", default)]
    pub unii: Option<String>,
    #[serde(rename = "POTENCY_AMOUNT", default)]
    pub potency_amount: Option<String>,
    #[serde(rename = "POTENCY_UNIT", default)]
    pub potency_unit: Option<String>,
    #[serde(rename = "MAXIMUM_DAILY_EXPOSURE", default)]
    pub max_daily_exposure: Option<String>,
    #[serde(rename = "MAXIMUM_DAILY_EXPOSURE_UNIT", default)]
    pub max_daily_exposure_unit: Option<String>,
    #[serde(rename = "DESCRIPTION", default)]
    pub description: Option<String>,
    #[serde(rename = "RECORD_UPDATED", default)]
    pub record_updated: Option<String>,
    #[serde(default)]
    pub database: Option<String>,
}

/// Raw row from the EU CosIng cosmetic-ingredient regulation table.
///
/// `ref_no` is the only required column. The CAS string may carry formatting
/// noise such as embedded spaces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegulatoryRecord {
    pub ref_no: i64,
    #[serde(default)]
    pub inci_name: Option<String>,
    #[serde(default)]
    pub inn_name: Option<String>,
    #[serde(default)]
    pub ph_eur_name: Option<String>,
    #[serde(default)]
    pub cas_no: Option<String>,
    #[serde(default)]
    pub ec_no: Option<String>,
    #[serde(default)]
    pub chem_iupac_name: Option<String>,
    #[serde(default)]
    pub restriction: Option<String>,
    #[serde(default)]
    pub function: Option<String>,
}

/// The canonical, source-merged ingredient record used by all downstream
/// consumers. Never mutated after construction; the merger produces a new
/// record when two source records collapse to one identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub description: String,
    pub benefits: Vec<String>,
    pub skin_types: Vec<String>,
    pub concerns: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cas_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ec_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub potency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_exposure: Option<String>,
    pub sources: Vec<Provenance>,
    pub functions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restriction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_count: Option<u32>,
}

impl Ingredient {
    /// Identity key used by the merger: CAS number when present, else the
    /// lowercased display name. Records sharing neither never merge.
    pub fn merge_key(&self) -> String {
        match &self.cas_number {
            Some(cas) => cas.clone(),
            None => self.name.to_lowercase(),
        }
    }
}

fn de_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    match value {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Ok(None)
            } else {
                Ok(Some(trimmed.to_string()))
            }
        }
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected string or number for CAS column, got {other}"
        ))),
    }
}
