//! Serialized shapes of the three generated pages.
//!
//! Field names and nesting here are the on-disk compatibility surface.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use pagegen_shared::{BenefitCategories, PageGenError, QuestionCategory};

/// Which page to assemble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageType {
    Faq,
    Product,
    Comparison,
}

impl PageType {
    pub const ALL: [PageType; 3] = [Self::Faq, Self::Product, Self::Comparison];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Faq => "faq",
            Self::Product => "product",
            Self::Comparison => "comparison",
        }
    }

    /// Artifact filename this page is persisted under.
    pub fn filename(self) -> &'static str {
        match self {
            Self::Faq => "faq.json",
            Self::Product => "product_page.json",
            Self::Comparison => "comparison_page.json",
        }
    }
}

impl FromStr for PageType {
    type Err = PageGenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "faq" => Ok(Self::Faq),
            "product" => Ok(Self::Product),
            "comparison" => Ok(Self::Comparison),
            other => Err(PageGenError::assembly(format!("Unknown page type: {other}"))),
        }
    }
}

impl std::fmt::Display for PageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One assembled page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Page {
    Faq(FaqPage),
    Product(ProductPage),
    Comparison(ComparisonPage),
}

impl Page {
    pub fn page_type(&self) -> PageType {
        match self {
            Self::Faq(_) => PageType::Faq,
            Self::Product(_) => PageType::Product,
            Self::Comparison(_) => PageType::Comparison,
        }
    }
}

// ---------------------------------------------------------------------------
// FAQ
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaqPage {
    pub page_type: PageType,
    pub product_name: String,
    pub title: String,
    pub total_questions: usize,
    pub faqs: Vec<FaqEntry>,
    pub faqs_by_category: BTreeMap<QuestionCategory, Vec<FaqPair>>,
    pub metadata: FaqMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaqEntry {
    pub question: String,
    pub answer: String,
    pub category: QuestionCategory,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaqPair {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaqMetadata {
    pub generated_at: String,
    pub version: String,
    pub categories: Vec<QuestionCategory>,
}

// ---------------------------------------------------------------------------
// Product
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPage {
    pub page_type: PageType,
    pub product_id: String,
    pub product_name: String,
    pub overview: OverviewSection,
    pub skin_type: SkinTypeSection,
    pub ingredients: IngredientsSection,
    pub benefits: BenefitsSection,
    pub usage: UsageSection,
    pub safety: SafetySection,
    pub pricing: PricingSection,
    pub metadata: ProductMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverviewSection {
    pub title: String,
    pub description: String,
    pub key_points: Vec<String>,
    pub concentration: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkinTypeSection {
    pub title: String,
    pub primary: String,
    pub all_types: Vec<String>,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientsSection {
    pub title: String,
    pub list: Vec<String>,
    pub primary_ingredient: Option<String>,
    pub total_count: usize,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenefitsSection {
    pub title: String,
    pub list: Vec<String>,
    pub categorized: BenefitCategories,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageSection {
    pub title: String,
    pub steps: Vec<String>,
    pub frequency: String,
    pub quick_guide: String,
    pub full_instructions: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafetySection {
    pub title: String,
    pub side_effects: Vec<String>,
    pub warnings: Vec<String>,
    /// Lowercase severity, empty when the safety block is unavailable.
    pub severity: String,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingSection {
    pub title: String,
    /// The raw display price, e.g. `"$25"`.
    pub price: String,
    /// Two-decimal rendering, e.g. `"$25.00"`.
    pub formatted_price: String,
    pub value_proposition: String,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductMetadata {
    pub generated_at: String,
    pub version: String,
    pub data_source: String,
}

// ---------------------------------------------------------------------------
// Comparison
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonPage {
    pub page_type: PageType,
    pub title: String,
    pub products: ProductPair,
    pub comparison: ComparisonSections,
    pub summary: String,
    pub recommendation: String,
    pub metadata: ComparisonMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPair {
    pub product_a: ProductHeadline,
    pub product_b: ProductHeadline,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductHeadline {
    pub name: String,
    pub id: String,
    pub concentration: String,
    pub price: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonSections {
    pub concentration: ConcentrationSection,
    pub ingredients: IngredientDiffSection,
    pub benefits: BenefitDiffSection,
    pub pricing: PricingDiffSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcentrationSection {
    pub product_a: String,
    pub product_b: String,
    pub analysis: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientDiffSection {
    pub product_a: Vec<String>,
    pub product_b: Vec<String>,
    pub common_ingredients: Vec<String>,
    pub unique_to_a: Vec<String>,
    pub unique_to_b: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenefitDiffSection {
    pub product_a: Vec<String>,
    pub product_b: Vec<String>,
    pub analysis: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingDiffSection {
    pub product_a: String,
    pub product_b: String,
    pub price_difference: String,
    pub value_assessment: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonMetadata {
    pub generated_at: String,
    pub version: String,
    pub comparison_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_type_parses_and_serializes_lowercase() {
        for page_type in PageType::ALL {
            assert_eq!(page_type.as_str().parse::<PageType>().unwrap(), page_type);
            assert_eq!(
                serde_json::to_value(page_type).unwrap(),
                serde_json::Value::String(page_type.as_str().into())
            );
        }
    }

    #[test]
    fn unknown_page_type_is_an_assembly_error() {
        let err = "landing".parse::<PageType>().unwrap_err();
        assert!(matches!(err, PageGenError::Assembly { .. }));
        assert!(err.to_string().contains("Unknown page type: landing"));
    }

    #[test]
    fn filenames_are_fixed() {
        assert_eq!(PageType::Faq.filename(), "faq.json");
        assert_eq!(PageType::Product.filename(), "product_page.json");
        assert_eq!(PageType::Comparison.filename(), "comparison_page.json");
    }
}
