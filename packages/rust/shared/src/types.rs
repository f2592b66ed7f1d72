//! Core domain types for pagegen: raw input, structured products, question
//! sets and comparison results.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{PageGenError, Result};

/// Version stamp carried by parsed products and assembled pages.
pub const CONTENT_VERSION: &str = "1.0";

// ---------------------------------------------------------------------------
// RawProductRecord
// ---------------------------------------------------------------------------

/// Free-form product record as supplied by the caller (usually a JSON file).
///
/// Values are JSON strings or lists of strings. The record is never mutated
/// once constructed; [`RawProductRecord::with`] consumes and returns `self`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawProductRecord(Map<String, Value>);

impl RawProductRecord {
    /// The eight fields every raw product must carry.
    pub const REQUIRED_FIELDS: [&'static str; 8] = [
        "product_name",
        "concentration",
        "skin_type",
        "key_ingredients",
        "benefits",
        "usage_instructions",
        "side_effects",
        "price",
    ];

    /// An empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from a JSON value, which must be an object.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(PageGenError::input(format!(
                "product data must be a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Parse a record from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| PageGenError::input(format!("invalid product JSON: {e}")))?;
        Self::from_value(value)
    }

    /// Return a copy of this record with `key` set to `value`.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Return a copy of this record without `key`.
    pub fn without(mut self, key: &str) -> Self {
        self.0.remove(key);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Required fields absent from this record, in declaration order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        Self::REQUIRED_FIELDS
            .iter()
            .copied()
            .filter(|field| !self.contains(field))
            .collect()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ---------------------------------------------------------------------------
// StructuredProduct
// ---------------------------------------------------------------------------

/// Canonical normalized product. Every sub-record is always present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredProduct {
    pub product_id: String,
    pub name: String,
    pub concentration: Concentration,
    pub skin_type: SkinType,
    pub ingredients: Ingredients,
    pub benefits: Benefits,
    pub usage: Usage,
    pub safety: Safety,
    pub pricing: Pricing,
    pub metadata: ProductOrigin,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Concentration {
    pub value: String,
    /// First number found in the source text, if any.
    pub percentage: Option<f64>,
    pub display: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkinType {
    pub primary: String,
    pub all_types: Vec<String>,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ingredients {
    pub list: Vec<String>,
    pub count: usize,
    pub primary: Option<String>,
    pub formatted: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Benefits {
    pub list: Vec<String>,
    pub count: usize,
    pub primary: Option<String>,
    pub categories: BenefitCategories,
}

/// Benefits bucketed by kind. Each benefit lands in exactly one bucket.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BenefitCategories {
    pub treatment: Vec<String>,
    pub prevention: Vec<String>,
    pub enhancement: Vec<String>,
    pub general: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Usage {
    pub full_instructions: String,
    pub steps: Vec<String>,
    pub step_count: usize,
    pub frequency: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Safety {
    pub side_effects: Vec<String>,
    pub count: usize,
    pub severity: Severity,
    pub warnings: Vec<String>,
}

/// Side-effect severity, lowest first.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Low,
    Moderate,
    High,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::High => "high",
        }
    }

    /// Capitalized label used in summaries ("Low", "Moderate", "High").
    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pricing {
    pub value: f64,
    pub currency: String,
    pub display: String,
    pub formatted: String,
}

/// Where a structured product came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductOrigin {
    /// Parsed from a raw record.
    Parsed {
        parsed_at: String,
        data_source: String,
        version: String,
    },
    /// Synthesized as a comparison variant of another product.
    Generated {
        generated: bool,
        based_on: String,
        variant_type: String,
    },
}

// ---------------------------------------------------------------------------
// QuestionSet
// ---------------------------------------------------------------------------

/// The five fixed question categories, in generation order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum QuestionCategory {
    Informational,
    Usage,
    Safety,
    Purchase,
    Comparison,
}

impl QuestionCategory {
    pub const ALL: [QuestionCategory; 5] = [
        Self::Informational,
        Self::Usage,
        Self::Safety,
        Self::Purchase,
        Self::Comparison,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Informational => "informational",
            Self::Usage => "usage",
            Self::Safety => "safety",
            Self::Purchase => "purchase",
            Self::Comparison => "comparison",
        }
    }
}

impl std::fmt::Display for QuestionCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single question tagged with its category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorizedQuestion {
    pub question: String,
    pub category: QuestionCategory,
}

/// Generated questions, grouped by category and flattened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionSet {
    pub questions_by_category: BTreeMap<QuestionCategory, Vec<String>>,
    pub all_questions: Vec<CategorizedQuestion>,
    pub total_count: usize,
    pub category_counts: BTreeMap<QuestionCategory, usize>,
}

impl QuestionSet {
    /// Build a set from per-category lists. The flattened list follows
    /// category order, then question order within each category.
    pub fn from_categories(groups: BTreeMap<QuestionCategory, Vec<String>>) -> Self {
        let all_questions: Vec<CategorizedQuestion> = groups
            .iter()
            .flat_map(|(category, questions)| {
                questions.iter().map(|q| CategorizedQuestion {
                    question: q.clone(),
                    category: *category,
                })
            })
            .collect();

        let category_counts = groups
            .iter()
            .map(|(category, questions)| (*category, questions.len()))
            .collect();

        Self {
            total_count: all_questions.len(),
            questions_by_category: groups,
            all_questions,
            category_counts,
        }
    }
}

// ---------------------------------------------------------------------------
// ComparisonResult
// ---------------------------------------------------------------------------

/// Product A, its synthesized variant B, and the matrix comparing them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub product_a: StructuredProduct,
    pub product_b: StructuredProduct,
    pub comparison: ComparisonMatrix,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonMatrix {
    pub basic_info: BasicInfo,
    pub concentration: ConcentrationComparison,
    pub ingredients: IngredientComparison,
    pub benefits: BenefitComparison,
    pub pricing: PricingComparison,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicInfo {
    pub product_a_name: String,
    pub product_b_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcentrationComparison {
    pub product_a: String,
    pub product_b: String,
    pub difference: String,
}

/// Ingredient lists and their case-insensitive set relations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientComparison {
    pub product_a: Vec<String>,
    pub product_b: Vec<String>,
    pub common: Vec<String>,
    pub unique_to_a: Vec<String>,
    pub unique_to_b: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenefitComparison {
    pub product_a: Vec<String>,
    pub product_b: Vec<String>,
    pub comparison: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingComparison {
    pub product_a: String,
    pub product_b: String,
    pub difference: String,
    pub value_assessment: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn raw_record_reports_missing_fields_in_order() {
        let record = RawProductRecord::new()
            .with("product_name", "Glow Serum")
            .with("benefits", "Brightens skin");

        let missing = record.missing_fields();
        assert_eq!(missing.len(), 6);
        assert_eq!(missing[0], "concentration");
        assert_eq!(*missing.last().unwrap(), "price");
    }

    #[test]
    fn raw_record_rejects_non_objects() {
        let err = RawProductRecord::from_value(json!(["a", "b"])).unwrap_err();
        assert!(err.to_string().contains("an array"));

        let err = RawProductRecord::from_json("{not json").unwrap_err();
        assert!(err.to_string().contains("invalid product JSON"));
    }

    #[test]
    fn question_set_flattens_in_category_order() {
        let mut groups = BTreeMap::new();
        groups.insert(QuestionCategory::Purchase, vec!["Cost?".to_string()]);
        groups.insert(
            QuestionCategory::Informational,
            vec!["What?".to_string(), "Why?".to_string()],
        );

        let set = QuestionSet::from_categories(groups);
        assert_eq!(set.total_count, 3);
        assert_eq!(set.all_questions[0].category, QuestionCategory::Informational);
        assert_eq!(set.all_questions[2].question, "Cost?");
        assert_eq!(set.category_counts[&QuestionCategory::Informational], 2);
    }

    #[test]
    fn categories_serialize_as_snake_case_keys() {
        let mut groups = BTreeMap::new();
        groups.insert(QuestionCategory::Comparison, vec!["Vs?".to_string()]);
        let set = QuestionSet::from_categories(groups);

        let json = serde_json::to_value(&set).expect("serialize");
        assert_eq!(json["questions_by_category"]["comparison"][0], "Vs?");
        assert_eq!(json["all_questions"][0]["category"], "comparison");
    }

    #[test]
    fn product_origin_untagged_roundtrip() {
        let generated = ProductOrigin::Generated {
            generated: true,
            based_on: "glow_serum".into(),
            variant_type: "comparison".into(),
        };
        let json = serde_json::to_string(&generated).expect("serialize");
        assert!(json.contains("\"generated\":true"));
        let parsed: ProductOrigin = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, generated);
    }

    #[test]
    fn severity_orders_low_to_high() {
        assert!(Severity::Low < Severity::Moderate);
        assert!(Severity::Moderate < Severity::High);
        assert_eq!(Severity::High.label(), "High");
        assert_eq!(serde_json::to_value(Severity::Moderate).unwrap(), "moderate");
    }
}
