//! Reusable content blocks and the registry that dispatches them.
//!
//! This crate provides:
//! - [`content`]: The eight pure block functions and their output shapes
//! - [`BlockKind`]: Static name → block table
//! - [`process_blocks`]: Runs a list of block names with per-block failure isolation

pub mod content;
pub mod registry;

pub use content::{
    BenefitsContent, ComparisonContent, IngredientsContent, OverviewContent, PriceTier,
    PricingContent, SafetyContent, SkinTypeContent, UsageContent, recommend,
};
pub use registry::{
    BlockContent, BlockData, BlockEntry, BlockFailure, BlockKind, ProcessedBlocks, process_blocks,
};

#[cfg(test)]
mod tests {
    use super::*;
    use pagegen_shared::{
        BasicInfo, BenefitCategories, BenefitComparison, Benefits, ComparisonMatrix,
        ComparisonResult, Concentration, ConcentrationComparison, IngredientComparison,
        Ingredients, Pricing, PricingComparison, ProductOrigin, Safety, Severity, SkinType,
        StructuredProduct, Usage,
    };

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn glow_serum() -> StructuredProduct {
        StructuredProduct {
            product_id: "glow_serum".into(),
            name: "Glow Serum".into(),
            concentration: Concentration {
                value: "10% Vitamin C".into(),
                percentage: Some(10.0),
                display: "10% Vitamin C".into(),
            },
            skin_type: SkinType {
                primary: "Oily".into(),
                all_types: strings(&["Oily", "Combination"]),
                count: 2,
            },
            ingredients: Ingredients {
                list: strings(&["Vitamin C", "Hyaluronic Acid"]),
                count: 2,
                primary: Some("Vitamin C".into()),
                formatted: "Vitamin C, Hyaluronic Acid".into(),
            },
            benefits: Benefits {
                list: strings(&["Brightening", "Fades dark spots"]),
                count: 2,
                primary: Some("Brightening".into()),
                categories: BenefitCategories {
                    treatment: strings(&["Fades dark spots"]),
                    enhancement: strings(&["Brightening"]),
                    ..Default::default()
                },
            },
            usage: Usage {
                full_instructions: "Apply 2-3 drops in the morning before sunscreen".into(),
                steps: strings(&["Apply 2-3 drops in the morning before sunscreen"]),
                step_count: 1,
                frequency: "Twice daily".into(),
            },
            safety: Safety {
                side_effects: strings(&["Mild tingling for sensitive skin"]),
                count: 1,
                severity: Severity::Low,
                warnings: strings(&["For external use only"]),
            },
            pricing: Pricing {
                value: 699.0,
                currency: "₹".into(),
                display: "₹699".into(),
                formatted: "₹699.00".into(),
            },
            metadata: ProductOrigin::Parsed {
                parsed_at: "2025-01-01T00:00:00+00:00".into(),
                data_source: "raw_input".into(),
                version: "1.0".into(),
            },
        }
    }

    fn comparison_result() -> ComparisonResult {
        let a = glow_serum();
        let mut b = glow_serum();
        b.name = "Glow Pro".into();
        ComparisonResult {
            comparison: ComparisonMatrix {
                basic_info: BasicInfo {
                    product_a_name: a.name.clone(),
                    product_b_name: b.name.clone(),
                },
                concentration: ConcentrationComparison {
                    product_a: "10% Vitamin C".into(),
                    product_b: "12%".into(),
                    difference: "Product B has higher concentration (+2.0%)".into(),
                },
                ingredients: IngredientComparison {
                    product_a: a.ingredients.list.clone(),
                    product_b: b.ingredients.list.clone(),
                    common: strings(&["hyaluronic acid", "vitamin c"]),
                    unique_to_a: Vec::new(),
                    unique_to_b: Vec::new(),
                },
                benefits: BenefitComparison {
                    product_a: a.benefits.list.clone(),
                    product_b: b.benefits.list.clone(),
                    comparison: "Similar number of benefits".into(),
                },
                pricing: PricingComparison {
                    product_a: "₹699.00".into(),
                    product_b: "₹800.00".into(),
                    difference: "Product A is ₹101.00 cheaper".into(),
                    value_assessment: "Product A offers better value".into(),
                },
            },
            summary: "Glow Serum vs Glow Pro".into(),
            product_a: a,
            product_b: b,
        }
    }

    // -----------------------------------------------------------------------
    // Block formulas
    // -----------------------------------------------------------------------

    #[test]
    fn overview_text_mentions_concentration_and_primary() {
        let overview = content::overview(&glow_serum());
        assert_eq!(
            overview.overview_text,
            "Glow Serum is formulated with 10% Vitamin C Vitamin C to deliver visible results."
        );
        assert_eq!(overview.key_points[2], "Total Ingredients: 2");
    }

    #[test]
    fn skin_type_falls_back_when_empty() {
        let mut product = glow_serum();
        product.skin_type.all_types.clear();
        let block = content::skin_type(&product);
        assert_eq!(block.all_skin_types, vec!["All skin types"]);
        assert_eq!(block.suitability_text, "Suitable for All skin types.");
    }

    #[test]
    fn usage_numbers_steps_and_builds_quick_guide() {
        let usage = content::usage(&glow_serum());
        assert_eq!(
            usage.formatted_steps,
            vec!["1. Apply 2-3 drops in the morning before sunscreen"]
        );
        assert_eq!(usage.quick_guide, "Apply twice daily");
    }

    #[test]
    fn pricing_tier_and_summary() {
        let mut product = glow_serum();
        product.pricing.value = 25.0;
        product.pricing.formatted = "$25.00".into();
        let pricing = content::pricing(&product);
        assert_eq!(pricing.value_proposition, PriceTier::Good);
        assert_eq!(pricing.pricing_summary, "Priced at $25.00, offering good value.");
    }

    #[test]
    fn safety_summary_uses_severity_label() {
        let safety = content::safety(&glow_serum());
        assert_eq!(
            safety.safety_summary,
            "Severity: Low. Always perform a patch test before use."
        );
        assert_eq!(safety.formatted_warnings, vec!["⚠ For external use only"]);
    }

    #[test]
    fn comparison_block_recommends_from_value_assessment() {
        let block = content::comparison(&comparison_result());
        assert_eq!(block.product_b, "Glow Pro");
        assert_eq!(
            block.recommendation,
            "Product A recommended for budget-conscious consumers"
        );
    }

    // -----------------------------------------------------------------------
    // Registry dispatch
    // -----------------------------------------------------------------------

    #[test]
    fn product_page_blocks_all_succeed() {
        let product = glow_serum();
        let names: Vec<&str> = BlockKind::PRODUCT_PAGE.iter().map(|k| k.name()).collect();
        let processed = process_blocks(&names, BlockData::Product(&product));

        assert_eq!(processed.total_blocks, 7);
        assert_eq!(processed.successful_blocks, 7);
        assert_eq!(processed.overview().map(|o| o.title.as_str()), Some("Product Overview"));
        assert!(processed.pricing().is_some());
        assert!(processed.comparison().is_none());
    }

    #[test]
    fn unknown_block_is_isolated() {
        let product = glow_serum();
        let names = ["overview_block", "hero_block", "pricing_block"];
        let processed = process_blocks(&names, BlockData::Product(&product));

        assert_eq!(processed.total_blocks, 3);
        assert_eq!(processed.successful_blocks, 2);
        match processed.get("hero_block") {
            Some(BlockEntry::Failed(failure)) => {
                assert_eq!(failure.error, "Unknown block: hero_block");
                assert!(!failure.success);
            }
            other => panic!("expected failure entry, got {other:?}"),
        }
        assert!(processed.get("pricing_block").is_some_and(BlockEntry::is_success));
    }

    #[test]
    fn mismatched_data_fails_only_that_block() {
        let product = glow_serum();
        let processed = process_blocks(
            &["comparison_block", "usage_block"],
            BlockData::Product(&product),
        );
        assert_eq!(processed.successful_blocks, 1);
        assert!(matches!(
            processed.get("comparison_block"),
            Some(BlockEntry::Failed(_))
        ));
    }

    #[test]
    fn empty_request_yields_empty_result() {
        let product = glow_serum();
        let processed = process_blocks::<&str>(&[], BlockData::Product(&product));
        assert_eq!(processed, ProcessedBlocks::default());
    }

    #[test]
    fn merge_combines_product_and_comparison_runs() {
        let product = glow_serum();
        let result = comparison_result();
        let mut processed = process_blocks(&["overview_block"], BlockData::Product(&product));
        processed.merge(process_blocks(
            &["comparison_block"],
            BlockData::Comparison(&result),
        ));

        assert_eq!(processed.total_blocks, 2);
        assert_eq!(processed.successful_blocks, 2);
        assert!(processed.overview().is_some());
        assert!(processed.comparison().is_some());
    }

    #[test]
    fn processed_blocks_serialize_content_inline() {
        let product = glow_serum();
        let processed = process_blocks(&["pricing_block"], BlockData::Product(&product));
        let json = serde_json::to_value(&processed).unwrap();
        assert_eq!(
            json["processed_blocks"]["pricing_block"]["value_proposition"],
            "Premium"
        );
        assert_eq!(json["successful_blocks"], 1);
    }
}
