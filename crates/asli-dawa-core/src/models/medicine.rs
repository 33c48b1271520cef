//! Medicine catalog models.

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// A single medicine record in the catalog.
///
/// Field names on the wire match the catalog's JSON format, so `id` is
/// serialized as `_id` and `medicine_type` as `type`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MedicineRecord {
    /// Opaque unique identifier, assigned at creation
    #[serde(rename = "_id")]
    pub id: String,
    /// Display name; the natural key for lookups
    pub name: String,
    /// Price, if known
    #[serde(default, deserialize_with = "deserialize_price")]
    pub price: Option<f64>,
    /// Discontinued records are reported as counterfeit
    #[serde(default)]
    pub is_discontinued: bool,
    #[serde(default)]
    pub manufacturer_name: Option<String>,
    /// Dosage form (e.g., "allopathy")
    #[serde(rename = "type", default)]
    pub medicine_type: Option<String>,
    /// Pack description (e.g., "strip of 10 tablets")
    #[serde(default)]
    pub pack_size_label: Option<String>,
    #[serde(default)]
    pub short_composition1: Option<String>,
    #[serde(default)]
    pub short_composition2: Option<String>,
    /// Illnesses and conditions this medicine treats
    #[serde(default, deserialize_with = "deserialize_list")]
    pub uses: Vec<String>,
    /// Listed side effects; the count drives search ranking
    #[serde(default, deserialize_with = "deserialize_list")]
    pub side_effects: Vec<String>,
    /// Names of substitute medicines
    #[serde(default, deserialize_with = "deserialize_list")]
    pub substitutes: Vec<String>,
    #[serde(default)]
    pub chemical_class: Option<String>,
    #[serde(default)]
    pub habit_forming: Option<String>,
    #[serde(default)]
    pub therapeutic_class: Option<String>,
    #[serde(default)]
    pub action_class: Option<String>,
}

impl MedicineRecord {
    /// Create a new record with a fresh identifier.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            price: None,
            is_discontinued: false,
            manufacturer_name: None,
            medicine_type: None,
            pack_size_label: None,
            short_composition1: None,
            short_composition2: None,
            uses: Vec::new(),
            side_effects: Vec::new(),
            substitutes: Vec::new(),
            chemical_class: None,
            habit_forming: None,
            therapeutic_class: None,
            action_class: None,
        }
    }

    /// Set uses from a list, trimming each entry.
    pub fn with_uses<I, S>(mut self, uses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.uses = trim_all(uses);
        self
    }

    /// Set side effects from a list, trimming each entry.
    pub fn with_side_effects<I, S>(mut self, side_effects: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.side_effects = trim_all(side_effects);
        self
    }

    /// Set substitutes from a list, trimming each entry.
    pub fn with_substitutes<I, S>(mut self, substitutes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.substitutes = trim_all(substitutes);
        self
    }

    /// Number of listed side effects.
    pub fn side_effect_count(&self) -> usize {
        self.side_effects.len()
    }

    /// Genuineness verdict for this record.
    pub fn verdict(&self) -> Verdict {
        if self.is_discontinued {
            Verdict::Counterfeit
        } else {
            Verdict::Genuine
        }
    }
}

/// Genuineness classification shown in a medicine report.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Genuine,
    /// Discontinued products still in circulation
    Counterfeit,
}

/// Verification report for a single medicine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenuinenessReport {
    pub medicine: MedicineRecord,
    pub verdict: Verdict,
}

impl From<MedicineRecord> for GenuinenessReport {
    fn from(medicine: MedicineRecord) -> Self {
        let verdict = medicine.verdict();
        Self { medicine, verdict }
    }
}

/// Catalog-wide counts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogStats {
    pub total_medicines: u64,
    pub total_counterfeit: u64,
}

/// Parse a price from free text.
///
/// Spaces and quote characters are stripped, then the leading decimal number
/// is read. Anything that does not start with a number yields `None`.
pub fn parse_price(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, ' ' | '\'' | '"'))
        .collect();

    let mut end = 0;
    let mut seen_dot = false;
    for (i, c) in cleaned.char_indices() {
        match c {
            '0'..='9' => end = i + 1,
            '.' if !seen_dot => seen_dot = true,
            '-' | '+' if i == 0 => {}
            _ => break,
        }
    }

    cleaned[..end].parse::<f64>().ok().filter(|p| p.is_finite())
}

fn trim_all<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    items
        .into_iter()
        .map(|s| s.as_ref().trim().to_string())
        .collect()
}

fn deserialize_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let items: Option<Vec<String>> = Option::deserialize(deserializer)?;
    Ok(items.map(trim_all).unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPrice {
    Number(f64),
    Text(String),
}

fn deserialize_price<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<RawPrice> = Option::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawPrice::Number(p)) if p.is_finite() => Some(p),
        Some(RawPrice::Text(s)) => parse_price(&s),
        _ => None,
    })
}
