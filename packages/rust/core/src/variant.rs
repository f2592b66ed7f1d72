//! Variant stage: synthesize a comparison product B from A and compare them.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use tracing::debug;

use pagegen_normalize as normalize;
use pagegen_shared::{
    BasicInfo, BenefitComparison, Benefits, Clock, ComparisonMatrix, ComparisonResult,
    Concentration, ConcentrationComparison, IngredientComparison, Ingredients, PageGenError,
    PricingComparison, ProductOrigin, Result, StructuredProduct,
};

use crate::random::{RandomSource, pick};
use crate::stage::{Stage, StageStats, require_name};

const NAME_SUFFIXES: [&str; 5] = ["Plus", "Pro", "Ultra", "Advanced", "Premium"];
const CONCENTRATION_SHIFTS: [f64; 4] = [-0.3, -0.2, 0.2, 0.3];
const FALLBACK_PERCENTAGE: f64 = 10.0;

const KEEP_INGREDIENT_P: f64 = 0.6;
const BONUS_INGREDIENT_P: f64 = 0.4;
const KEEP_BENEFIT_P: f64 = 0.7;

/// Substitutes keyed by case-insensitive substring, checked top to bottom.
const SUBSTITUTES: [(&str, [&str; 3]); 5] = [
    ("niacinamide", ["Alpha Arbutin", "Kojic Acid", "Licorice Extract"]),
    ("salicylic acid", ["Glycolic Acid", "Lactic Acid", "Mandelic Acid"]),
    ("retinol", ["Bakuchiol", "Retinyl Palmitate", "Tretinoin"]),
    ("vitamin c", ["Vitamin E", "Ferulic Acid", "Resveratrol"]),
    ("hyaluronic acid", ["Glycerin", "Ceramides", "Squalane"]),
];
const GENERIC_SUBSTITUTES: [&str; 4] =
    ["Botanical Extract", "Active Complex", "Skin Enhancer", "Bio-Active"];
const BONUS_INGREDIENTS: [&str; 4] = ["Peptides", "Antioxidants", "Plant Extracts", "Moisturizers"];

const BENEFIT_MODIFIERS: [&str; 4] = ["Enhanced", "Improved", "Advanced", "Superior"];
const BONUS_BENEFITS: [&str; 4] = [
    "Enhanced absorption",
    "Long-lasting results",
    "Gentle formula",
    "Fast-acting",
];

const PRICE_SHIFT_LOW: f64 = -0.15;
const PRICE_SHIFT_HIGH: f64 = 0.30;

pub struct VariantStage {
    stats: StageStats,
    rng: Mutex<Box<dyn RandomSource>>,
}

impl VariantStage {
    pub fn new(clock: Arc<dyn Clock>, rng: Box<dyn RandomSource>) -> Self {
        Self {
            stats: StageStats::new("comparison_agent_001", "comparison", clock),
            rng: Mutex::new(rng),
        }
    }
}

impl Stage for VariantStage {
    type Input<'a> = StructuredProduct;
    type Output = ComparisonResult;

    fn stats(&self) -> &StageStats {
        &self.stats
    }

    fn validate(&self, product: &StructuredProduct) -> Result<()> {
        require_name(&product.name)
    }

    fn execute(&self, product_a: &StructuredProduct) -> Result<ComparisonResult> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| PageGenError::transformation("random source lock poisoned"))?;
        let result = build_comparison(product_a, &mut **rng);
        debug!(
            product_b = %result.product_b.name,
            difference = %result.comparison.pricing.difference,
            "comparison built"
        );
        Ok(result)
    }
}

/// Synthesize product B from A and compare the two.
pub fn build_comparison(
    product_a: &StructuredProduct,
    rng: &mut dyn RandomSource,
) -> ComparisonResult {
    let product_b = synthesize_variant(product_a, rng);
    let comparison = compare(product_a, &product_b);
    let summary = summarize(&comparison);
    ComparisonResult {
        product_a: product_a.clone(),
        product_b,
        comparison,
        summary,
    }
}

/// A fictional sibling product. Skin type, usage and safety carry over from A.
///
/// Draws are consumed in a fixed order: name suffix, concentration shift,
/// one keep draw per ingredient (plus a substitute pick when replaced), the
/// bonus ingredient draw and pick, one keep draw per benefit (plus a modifier
/// pick), the bonus benefit pick, then the price shift.
pub fn synthesize_variant(a: &StructuredProduct, rng: &mut dyn RandomSource) -> StructuredProduct {
    let base = a.name.split_whitespace().next().unwrap_or(&a.name);
    let name = format!("{base} {}", pick(rng, &NAME_SUFFIXES));

    let concentration = vary_concentration(a.concentration.percentage, rng);
    let ingredients = vary_ingredients(&a.ingredients, rng);
    let benefits = vary_benefits(&a.benefits, rng);

    let shift = rng.uniform(PRICE_SHIFT_LOW, PRICE_SHIFT_HIGH);
    let value = round_to(a.pricing.value * (1.0 + shift), 2);
    let currency = a.pricing.currency.as_str();
    let pricing =
        normalize::build_pricing(value, currency, format!("{currency}{}", decimal_text(value)));

    StructuredProduct {
        product_id: name.to_lowercase().replace(' ', "_"),
        concentration,
        skin_type: a.skin_type.clone(),
        ingredients,
        benefits,
        usage: a.usage.clone(),
        safety: a.safety.clone(),
        pricing,
        metadata: ProductOrigin::Generated {
            generated: true,
            based_on: a.product_id.clone(),
            variant_type: "comparison".to_string(),
        },
        name,
    }
}

fn vary_concentration(percentage: Option<f64>, rng: &mut dyn RandomSource) -> Concentration {
    let shift = *pick(rng, &CONCENTRATION_SHIFTS);
    let pct = round_to(percentage.unwrap_or(FALLBACK_PERCENTAGE) * (1.0 + shift), 1);
    let shown = format!("{pct:.1}%");
    Concentration {
        value: shown.clone(),
        percentage: Some(pct),
        display: shown,
    }
}

fn vary_ingredients(original: &Ingredients, rng: &mut dyn RandomSource) -> Ingredients {
    let mut list: Vec<String> = original
        .list
        .iter()
        .map(|ingredient| {
            if rng.next_f64() < KEEP_INGREDIENT_P {
                ingredient.clone()
            } else {
                substitute_ingredient(ingredient, rng).to_string()
            }
        })
        .collect();

    // An empty list always gets the bonus so B has at least one ingredient.
    if rng.next_f64() < BONUS_INGREDIENT_P || list.is_empty() {
        list.push(pick(rng, &BONUS_INGREDIENTS).to_string());
    }

    normalize::build_ingredients(list)
}

/// Replacement for one ingredient from the first matching substitute group.
pub fn substitute_ingredient(ingredient: &str, rng: &mut dyn RandomSource) -> &'static str {
    let lower = ingredient.to_lowercase();
    let pool: &[&'static str] = SUBSTITUTES
        .iter()
        .find(|(key, _)| lower.contains(*key))
        .map(|(_, alternatives)| alternatives.as_slice())
        .unwrap_or(&GENERIC_SUBSTITUTES);
    *pick(rng, pool)
}

fn vary_benefits(original: &Benefits, rng: &mut dyn RandomSource) -> Benefits {
    let mut list: Vec<String> = original
        .list
        .iter()
        .map(|benefit| {
            if rng.next_f64() < KEEP_BENEFIT_P {
                benefit.clone()
            } else {
                format!("{} {}", pick(rng, &BENEFIT_MODIFIERS), benefit.to_lowercase())
            }
        })
        .collect();
    list.push(pick(rng, &BONUS_BENEFITS).to_string());

    normalize::build_benefits(list)
}

/// Shortest decimal rendering, keeping at least one fractional digit (`21.0`, `21.25`).
fn decimal_text(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

// ---------------------------------------------------------------------------
// Comparison matrix
// ---------------------------------------------------------------------------

/// Four-dimension comparison of A against B.
pub fn compare(a: &StructuredProduct, b: &StructuredProduct) -> ComparisonMatrix {
    let set_a = lowercase_set(&a.ingredients.list);
    let set_b = lowercase_set(&b.ingredients.list);

    ComparisonMatrix {
        basic_info: BasicInfo {
            product_a_name: a.name.clone(),
            product_b_name: b.name.clone(),
        },
        concentration: ConcentrationComparison {
            product_a: a.concentration.display.clone(),
            product_b: b.concentration.display.clone(),
            difference: concentration_difference(
                a.concentration.percentage.unwrap_or(0.0),
                b.concentration.percentage.unwrap_or(0.0),
            ),
        },
        ingredients: IngredientComparison {
            product_a: a.ingredients.list.clone(),
            product_b: b.ingredients.list.clone(),
            common: set_a.intersection(&set_b).cloned().collect(),
            unique_to_a: set_a.difference(&set_b).cloned().collect(),
            unique_to_b: set_b.difference(&set_a).cloned().collect(),
        },
        benefits: BenefitComparison {
            product_a: a.benefits.list.clone(),
            product_b: b.benefits.list.clone(),
            comparison: benefit_difference(a.benefits.count, b.benefits.count),
        },
        pricing: PricingComparison {
            product_a: a.pricing.formatted.clone(),
            product_b: b.pricing.formatted.clone(),
            difference: price_difference(a.pricing.value, b.pricing.value, &a.pricing.currency),
            value_assessment: value_assessment(a.pricing.value, b.pricing.value).to_string(),
        },
    }
}

fn lowercase_set(items: &[String]) -> BTreeSet<String> {
    items.iter().map(|item| item.to_lowercase()).collect()
}

pub fn concentration_difference(a: f64, b: f64) -> String {
    if a > b {
        format!("Product A has higher concentration (+{:.1}%)", a - b)
    } else if b > a {
        format!("Product B has higher concentration (+{:.1}%)", b - a)
    } else {
        "Same concentration".to_string()
    }
}

pub fn benefit_difference(a: usize, b: usize) -> String {
    if a > b {
        format!("Product A offers more benefits ({a} vs {b})")
    } else if b > a {
        format!("Product B offers more benefits ({b} vs {a})")
    } else {
        "Similar number of benefits".to_string()
    }
}

pub fn price_difference(a: f64, b: f64, currency: &str) -> String {
    let diff = (a - b).abs();
    if a < b {
        format!("Product A is {currency}{diff:.2} cheaper")
    } else if b < a {
        format!("Product B is {currency}{diff:.2} cheaper")
    } else {
        "Same price".to_string()
    }
}

pub fn value_assessment(a: f64, b: f64) -> &'static str {
    if a < b {
        "Product A offers better value"
    } else if b < a {
        "Product B is premium priced"
    } else {
        "Similar value proposition"
    }
}

/// `"{A} vs {B}: {concentration}. {pricing}. {benefits}."`
pub fn summarize(matrix: &ComparisonMatrix) -> String {
    format!(
        "{} vs {}: {}. {}. {}.",
        matrix.basic_info.product_a_name,
        matrix.basic_info.product_b_name,
        matrix.concentration.difference,
        matrix.pricing.difference,
        matrix.benefits.comparison
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::SeededRandom;
    use crate::random::scripted::ScriptedRandom;
    use crate::testing::{fixed_clock, glow_serum};

    #[test]
    fn scripted_draws_drive_every_choice() {
        // suffix, concentration shift, 2 ingredients (keep, substitute + pick),
        // bonus skipped, 2 benefits (keep, modify + pick), bonus benefit, price.
        let mut rng = ScriptedRandom::new(&[
            0.25, // suffix index 1 → Pro
            0.99, // shift index 3 → +0.3
            0.10, // keep Niacinamide
            0.90, // substitute Zinc
            0.00, // generic pool → Botanical Extract
            0.90, // no bonus ingredient
            0.10, // keep "Reduces oil"
            0.95, // modify "Brightens skin"
            0.50, // modifier index 2 → Advanced
            0.00, // bonus benefit → Enhanced absorption
            0.00, // price shift → -0.15
        ]);
        let b = synthesize_variant(&glow_serum(), &mut rng);

        assert_eq!(b.name, "Glow Pro");
        assert_eq!(b.product_id, "glow_pro");
        assert_eq!(b.concentration.percentage, Some(13.0));
        assert_eq!(b.concentration.display, "13.0%");
        assert_eq!(b.ingredients.list, vec!["Niacinamide", "Botanical Extract"]);
        assert_eq!(
            b.benefits.list,
            vec!["Reduces oil", "Advanced brightens skin", "Enhanced absorption"]
        );
        assert_eq!(b.benefits.categories.treatment, vec!["Reduces oil"]);
        assert_eq!(b.pricing.value, 21.25);
        assert_eq!(b.pricing.formatted, "$21.25");
        assert_eq!(b.pricing.display, "$21.25");
        assert_eq!(
            b.metadata,
            ProductOrigin::Generated {
                generated: true,
                based_on: "glow_serum".into(),
                variant_type: "comparison".into(),
            }
        );
    }

    #[test]
    fn substitution_uses_first_matching_key() {
        let mut rng = ScriptedRandom::new(&[0.0]);
        assert_eq!(substitute_ingredient("5% Niacinamide", &mut rng), "Alpha Arbutin");
        assert_eq!(substitute_ingredient("VITAMIN C ester", &mut rng), "Vitamin E");
        assert_eq!(substitute_ingredient("Zinc", &mut rng), "Botanical Extract");
    }

    #[test]
    fn empty_ingredients_always_get_a_bonus() {
        let mut product = glow_serum();
        product.ingredients = normalize::build_ingredients(Vec::new());
        // 0.99 on every draw would skip the bonus for a non-empty list.
        let mut rng = ScriptedRandom::new(&[0.99]);
        let b = synthesize_variant(&product, &mut rng);
        assert_eq!(b.ingredients.count, 1);
        assert_eq!(b.ingredients.list, vec!["Moisturizers"]);
    }

    #[test]
    fn missing_percentage_uses_fallback_base() {
        let mut rng = ScriptedRandom::new(&[0.0]);
        let conc = vary_concentration(None, &mut rng);
        assert_eq!(conc.percentage, Some(7.0));
        assert_eq!(conc.value, "7.0%");
    }

    #[test]
    fn whole_numbers_keep_one_decimal() {
        assert_eq!(decimal_text(21.0), "21.0");
        assert_eq!(decimal_text(21.25), "21.25");
        assert_eq!(decimal_text(0.0), "0.0");

        let mut rng = ScriptedRandom::new(&[0.0]);
        assert_eq!(vary_concentration(Some(20.0), &mut rng).display, "14.0%");
    }

    #[test]
    fn single_word_name_keeps_whole_name() {
        let mut product = glow_serum();
        product.name = "Radiance".into();
        let b = synthesize_variant(&product, &mut ScriptedRandom::new(&[0.0]));
        assert_eq!(b.name, "Radiance Plus");
    }

    #[test]
    fn matrix_strings() {
        assert_eq!(
            concentration_difference(10.0, 13.0),
            "Product B has higher concentration (+3.0%)"
        );
        assert_eq!(concentration_difference(5.0, 5.0), "Same concentration");
        assert_eq!(benefit_difference(3, 2), "Product A offers more benefits (3 vs 2)");
        assert_eq!(benefit_difference(2, 2), "Similar number of benefits");
        assert_eq!(price_difference(25.0, 30.5, "$"), "Product A is $5.50 cheaper");
        assert_eq!(price_difference(30.0, 25.0, "₹"), "Product B is ₹5.00 cheaper");
        assert_eq!(price_difference(25.0, 25.0, "$"), "Same price");
        assert_eq!(value_assessment(25.0, 30.0), "Product A offers better value");
        assert_eq!(value_assessment(30.0, 25.0), "Product B is premium priced");
        assert_eq!(value_assessment(25.0, 25.0), "Similar value proposition");
    }

    #[test]
    fn ingredient_relations_are_case_insensitive_and_sorted() {
        let a = glow_serum();
        let mut b = glow_serum();
        b.ingredients = normalize::build_ingredients(vec!["ZINC".into(), "Peptides".into()]);
        let matrix = compare(&a, &b);
        assert_eq!(matrix.ingredients.common, vec!["zinc"]);
        assert_eq!(matrix.ingredients.unique_to_a, vec!["niacinamide"]);
        assert_eq!(matrix.ingredients.unique_to_b, vec!["peptides"]);
    }

    #[test]
    fn summary_joins_three_dimensions() {
        let a = glow_serum();
        let mut b = glow_serum();
        b.name = "Glow Plus".into();
        let matrix = compare(&a, &b);
        assert_eq!(
            summarize(&matrix),
            "Glow Serum vs Glow Plus: Same concentration. Same price. Similar number of benefits."
        );
    }

    #[test]
    fn seeded_stage_runs_are_identical() {
        let product = glow_serum();
        let first = VariantStage::new(fixed_clock(), Box::new(SeededRandom::new(9)))
            .run(&product)
            .into_result()
            .unwrap();
        let second = VariantStage::new(fixed_clock(), Box::new(SeededRandom::new(9)))
            .run(&product)
            .into_result()
            .unwrap();
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
