//! Parsing stage: raw record → [`StructuredProduct`].

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use pagegen_normalize as normalize;
use pagegen_shared::{
    CONTENT_VERSION, Clock, PageGenError, ProductOrigin, RawProductRecord, Result,
    StructuredProduct,
};

use crate::stage::{Stage, StageStats, require_none_missing};

/// Source label stamped on every parsed product.
pub const RAW_INPUT_SOURCE: &str = "raw_input";

pub struct ParseStage {
    stats: StageStats,
}

impl ParseStage {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            stats: StageStats::new("product_parser_001", "product_parser", clock),
        }
    }
}

impl Stage for ParseStage {
    type Input<'a> = RawProductRecord;
    type Output = StructuredProduct;

    fn stats(&self) -> &StageStats {
        &self.stats
    }

    fn validate(&self, raw: &RawProductRecord) -> Result<()> {
        require_none_missing("product record", &raw.missing_fields())
    }

    fn execute(&self, raw: &RawProductRecord) -> Result<StructuredProduct> {
        let field = |key| required(raw, key);

        let name = normalize::parse_name(field("product_name")?);
        let product = StructuredProduct {
            product_id: normalize::product_id(&name),
            concentration: normalize::parse_concentration(field("concentration")?),
            skin_type: normalize::parse_skin_type(field("skin_type")?),
            ingredients: normalize::parse_ingredients(field("key_ingredients")?),
            benefits: normalize::parse_benefits(field("benefits")?),
            usage: normalize::parse_usage(field("usage_instructions")?),
            safety: normalize::parse_safety(field("side_effects")?),
            pricing: normalize::parse_pricing(field("price")?),
            metadata: ProductOrigin::Parsed {
                parsed_at: self.stats.clock().timestamp(),
                data_source: RAW_INPUT_SOURCE.to_string(),
                version: CONTENT_VERSION.to_string(),
            },
            name,
        };

        debug!(
            product_id = %product.product_id,
            ingredients = product.ingredients.count,
            benefits = product.benefits.count,
            "product parsed"
        );
        Ok(product)
    }
}

fn required<'a>(raw: &'a RawProductRecord, key: &str) -> Result<&'a Value> {
    raw.get(key)
        .ok_or_else(|| PageGenError::transformation(format!("field vanished: {key}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fixed_clock, glow_serum_record};
    use pagegen_shared::Severity;

    #[test]
    fn parses_glow_serum() {
        let stage = ParseStage::new(fixed_clock());
        let product = stage.run(&glow_serum_record()).into_result().unwrap();

        assert_eq!(product.product_id, "glow_serum");
        assert_eq!(product.name, "Glow Serum");
        assert_eq!(product.concentration.percentage, Some(10.0));
        assert_eq!(product.skin_type.all_types, vec!["Oily", "Combination"]);
        assert_eq!(product.ingredients.list, vec!["Niacinamide", "Zinc"]);
        assert_eq!(product.benefits.categories.treatment, vec!["Reduces oil"]);
        assert_eq!(product.usage.frequency, "Once daily");
        assert_eq!(product.safety.severity, Severity::Moderate);
        assert_eq!(product.pricing.value, 25.0);
        assert_eq!(product.pricing.currency, "$");
        assert_eq!(
            product.metadata,
            ProductOrigin::Parsed {
                parsed_at: "2025-01-01T00:00:00+00:00".into(),
                data_source: "raw_input".into(),
                version: "1.0".into(),
            }
        );
    }

    #[test]
    fn missing_price_fails_validation() {
        let stage = ParseStage::new(fixed_clock());
        let outcome = stage.run(&glow_serum_record().without("price"));
        let err = outcome.into_result().unwrap_err();
        assert!(matches!(err, PageGenError::Validation { .. }));
        assert!(err.to_string().contains("price"));
    }

    #[test]
    fn every_missing_key_is_named() {
        let stage = ParseStage::new(fixed_clock());
        let raw = RawProductRecord::new().with("product_name", "Bare");
        let message = stage.run(&raw).into_result().unwrap_err().to_string();
        for key in &RawProductRecord::REQUIRED_FIELDS[1..] {
            assert!(message.contains(key), "{key} not named in {message}");
        }
        assert!(!message.contains("product_name"));
    }

    #[test]
    fn empty_field_values_still_parse() {
        let stage = ParseStage::new(fixed_clock());
        let raw = glow_serum_record()
            .with("key_ingredients", "")
            .with("price", "")
            .with("side_effects", Value::Array(Vec::new()));
        let product = stage.run(&raw).into_result().unwrap();
        assert_eq!(product.ingredients.count, 0);
        assert_eq!(product.pricing.value, 0.0);
        assert!(product.safety.side_effects.is_empty());
    }
}
