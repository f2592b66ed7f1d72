//! The eight content blocks.
//!
//! Each block is a pure function from a product (or a comparison result) to a
//! formatted content fragment. Blocks do not depend on each other.

use serde::{Deserialize, Serialize};

use pagegen_shared::{
    BenefitCategories, BenefitComparison, ComparisonResult, ConcentrationComparison,
    IngredientComparison, PricingComparison, Severity, StructuredProduct,
};

const NOT_AVAILABLE: &str = "N/A";
const DEFAULT_SKIN_TYPE: &str = "All skin types";

// ---------------------------------------------------------------------------
// Overview
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverviewContent {
    pub title: String,
    pub product_name: String,
    pub concentration: String,
    pub primary_ingredient: Option<String>,
    pub overview_text: String,
    pub key_points: Vec<String>,
}

pub fn overview(product: &StructuredProduct) -> OverviewContent {
    let display = &product.concentration.display;
    let primary = product.ingredients.primary.as_deref();

    OverviewContent {
        title: "Product Overview".to_string(),
        product_name: product.name.clone(),
        concentration: display.clone(),
        primary_ingredient: primary.map(String::from),
        overview_text: format!(
            "{} is formulated with {} {} to deliver visible results.",
            product.name,
            display,
            primary.unwrap_or("active ingredients")
        ),
        key_points: vec![
            format!("Concentration: {}", or_na(display)),
            format!("Primary Ingredient: {}", primary.unwrap_or(NOT_AVAILABLE)),
            format!("Total Ingredients: {}", product.ingredients.count),
        ],
    }
}

// ---------------------------------------------------------------------------
// Skin type
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkinTypeContent {
    pub title: String,
    pub primary_skin_type: String,
    pub all_skin_types: Vec<String>,
    pub skin_type_count: usize,
    pub formatted_types: String,
    pub suitability_text: String,
}

pub fn skin_type(product: &StructuredProduct) -> SkinTypeContent {
    let all_types = if product.skin_type.all_types.is_empty() {
        vec![DEFAULT_SKIN_TYPE.to_string()]
    } else {
        product.skin_type.all_types.clone()
    };
    let formatted = all_types.join(", ");

    SkinTypeContent {
        title: "Suitable For".to_string(),
        primary_skin_type: product.skin_type.primary.clone(),
        skin_type_count: all_types.len(),
        suitability_text: format!("Suitable for {formatted}."),
        formatted_types: formatted,
        all_skin_types: all_types,
    }
}

// ---------------------------------------------------------------------------
// Ingredients
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientsContent {
    pub title: String,
    pub ingredients: Vec<String>,
    pub count: usize,
    pub primary_ingredient: Option<String>,
    pub concentration: String,
    pub formatted_list: Vec<String>,
    pub ingredient_summary: String,
}

pub fn ingredients(product: &StructuredProduct) -> IngredientsContent {
    let ingredients = &product.ingredients;
    let display = &product.concentration.display;
    let strength = if display.is_empty() { "optimal" } else { display.as_str() };

    IngredientsContent {
        title: "Key Ingredients".to_string(),
        ingredients: ingredients.list.clone(),
        count: ingredients.count,
        primary_ingredient: ingredients.primary.clone(),
        concentration: display.clone(),
        formatted_list: bullets("•", &ingredients.list),
        ingredient_summary: format!(
            "Contains {} active ingredients at {strength} concentration.",
            ingredients.count
        ),
    }
}

// ---------------------------------------------------------------------------
// Benefits
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenefitsContent {
    pub title: String,
    pub benefits: Vec<String>,
    pub categorized_benefits: BenefitCategories,
    pub formatted_list: Vec<String>,
    pub summary: String,
}

pub fn benefits(product: &StructuredProduct) -> BenefitsContent {
    let list = &product.benefits.list;
    BenefitsContent {
        title: "Key Benefits".to_string(),
        benefits: list.clone(),
        categorized_benefits: product.benefits.categories.clone(),
        formatted_list: bullets("•", list),
        summary: format!(
            "This product offers {} key benefits for your skin.",
            list.len()
        ),
    }
}

// ---------------------------------------------------------------------------
// Usage
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageContent {
    pub title: String,
    pub steps: Vec<String>,
    pub frequency: String,
    pub full_instructions: String,
    pub formatted_steps: Vec<String>,
    pub quick_guide: String,
}

pub fn usage(product: &StructuredProduct) -> UsageContent {
    let usage = &product.usage;
    UsageContent {
        title: "How to Use".to_string(),
        steps: usage.steps.clone(),
        frequency: usage.frequency.clone(),
        full_instructions: usage.full_instructions.clone(),
        formatted_steps: usage
            .steps
            .iter()
            .enumerate()
            .map(|(i, step)| format!("{}. {step}", i + 1))
            .collect(),
        quick_guide: format!("Apply {}", usage.frequency.to_lowercase()),
    }
}

// ---------------------------------------------------------------------------
// Safety
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafetyContent {
    pub title: String,
    pub side_effects: Vec<String>,
    pub warnings: Vec<String>,
    pub severity: Severity,
    pub formatted_side_effects: Vec<String>,
    pub formatted_warnings: Vec<String>,
    pub safety_summary: String,
}

pub fn safety(product: &StructuredProduct) -> SafetyContent {
    let safety = &product.safety;
    SafetyContent {
        title: "Safety Information".to_string(),
        side_effects: safety.side_effects.clone(),
        warnings: safety.warnings.clone(),
        severity: safety.severity,
        formatted_side_effects: bullets("•", &safety.side_effects),
        formatted_warnings: bullets("⚠", &safety.warnings),
        safety_summary: format!(
            "Severity: {}. Always perform a patch test before use.",
            safety.severity.label()
        ),
    }
}

// ---------------------------------------------------------------------------
// Pricing
// ---------------------------------------------------------------------------

/// Qualitative price tier, cheapest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PriceTier {
    Excellent,
    Good,
    Fair,
    Premium,
}

impl PriceTier {
    /// Tier boundaries sit at 20, 40 and 60, each exclusive on the upper side.
    pub fn for_price(value: f64) -> Self {
        if value < 20.0 {
            Self::Excellent
        } else if value < 40.0 {
            Self::Good
        } else if value < 60.0 {
            Self::Fair
        } else {
            Self::Premium
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Premium => "Premium",
        }
    }
}

impl std::fmt::Display for PriceTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingContent {
    pub title: String,
    pub price: String,
    pub currency: String,
    pub value: f64,
    pub display_price: String,
    pub value_proposition: PriceTier,
    pub pricing_summary: String,
}

pub fn pricing(product: &StructuredProduct) -> PricingContent {
    let pricing = &product.pricing;
    let tier = PriceTier::for_price(pricing.value);
    let price = if pricing.formatted.is_empty() {
        "Contact for pricing".to_string()
    } else {
        pricing.formatted.clone()
    };

    PricingContent {
        title: "Pricing".to_string(),
        pricing_summary: format!(
            "Priced at {}, offering {} value.",
            or_na(&pricing.formatted),
            tier.as_str().to_lowercase()
        ),
        price,
        currency: pricing.currency.clone(),
        value: pricing.value,
        display_price: pricing.display.clone(),
        value_proposition: tier,
    }
}

// ---------------------------------------------------------------------------
// Comparison
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonContent {
    pub title: String,
    pub product_a: String,
    pub product_b: String,
    pub concentration_comparison: ConcentrationComparison,
    pub ingredients_comparison: IngredientComparison,
    pub benefits_comparison: BenefitComparison,
    pub pricing_comparison: PricingComparison,
    pub summary: String,
    pub recommendation: String,
}

pub fn comparison(result: &ComparisonResult) -> ComparisonContent {
    let matrix = &result.comparison;
    ComparisonContent {
        title: "Product Comparison".to_string(),
        product_a: matrix.basic_info.product_a_name.clone(),
        product_b: matrix.basic_info.product_b_name.clone(),
        concentration_comparison: matrix.concentration.clone(),
        ingredients_comparison: matrix.ingredients.clone(),
        benefits_comparison: matrix.benefits.clone(),
        pricing_comparison: matrix.pricing.clone(),
        summary: result.summary.clone(),
        recommendation: recommend(&matrix.pricing.value_assessment).to_string(),
    }
}

/// Recommendation keyed on the pricing value assessment.
pub fn recommend(value_assessment: &str) -> &'static str {
    let lower = value_assessment.to_lowercase();
    if lower.contains("better value") {
        "Product A recommended for budget-conscious consumers"
    } else if lower.contains("premium") {
        "Product B recommended for those seeking premium formulation"
    } else {
        "Both products offer comparable value - choose based on specific needs"
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn bullets(marker: &str, items: &[String]) -> Vec<String> {
    items.iter().map(|item| format!("{marker} {item}")).collect()
}

fn or_na(text: &str) -> &str {
    if text.is_empty() { NOT_AVAILABLE } else { text }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_tier_boundaries() {
        assert_eq!(PriceTier::for_price(0.0), PriceTier::Excellent);
        assert_eq!(PriceTier::for_price(19.99), PriceTier::Excellent);
        assert_eq!(PriceTier::for_price(20.0), PriceTier::Good);
        assert_eq!(PriceTier::for_price(39.99), PriceTier::Good);
        assert_eq!(PriceTier::for_price(40.0), PriceTier::Fair);
        assert_eq!(PriceTier::for_price(60.0), PriceTier::Premium);
        assert_eq!(serde_json::to_value(PriceTier::Good).unwrap(), "Good");
    }

    #[test]
    fn recommendation_keywords() {
        assert!(recommend("Product A offers better value").starts_with("Product A"));
        assert!(recommend("Product B is premium priced").starts_with("Product B"));
        assert!(recommend("Similar value proposition").starts_with("Both"));
    }

    #[test]
    fn bullets_prefix_each_item() {
        let items = vec!["Zinc".to_string()];
        assert_eq!(bullets("•", &items), vec!["• Zinc"]);
        assert!(bullets("•", &[]).is_empty());
    }
}
