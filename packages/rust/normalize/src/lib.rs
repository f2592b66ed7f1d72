//! Field normalization for raw product records.
//!
//! Each `parse_*` function turns one raw JSON field (a string or a list of
//! strings) into a structured sub-record. None of them fail: empty input
//! yields empty lists, zero values and the lowest severity.

mod heuristics;
mod text;

use serde_json::Value;
use tracing::debug;

use pagegen_shared::{
    Benefits, Concentration, Ingredients, Pricing, Safety, SkinType, Usage,
};

pub use heuristics::{
    BenefitKind, assess_severity, benefit_kind, categorize_benefits, extract_steps,
    infer_frequency, safety_warnings,
};
pub use text::{field_items, field_text, first_number, split_commas};

/// Primary skin type reported when none is listed.
pub const DEFAULT_SKIN_TYPE: &str = "All skin types";

/// Currency symbol used unless the price mentions rupees.
pub const DEFAULT_CURRENCY: &str = "$";

const RUPEE: &str = "₹";

/// Stable identifier derived from a product name.
pub fn product_id(name: &str) -> String {
    name.to_lowercase().replace([' ', '-'], "_")
}

/// Product name as clean text. Lists are joined with commas.
pub fn parse_name(value: &Value) -> String {
    field_text(value, ", ")
}

pub fn parse_concentration(value: &Value) -> Concentration {
    let cleaned = field_text(value, ", ");
    Concentration {
        percentage: first_number(&cleaned),
        value: cleaned.clone(),
        display: cleaned,
    }
}

pub fn parse_skin_type(value: &Value) -> SkinType {
    let types = field_items(value);
    SkinType {
        primary: types
            .first()
            .cloned()
            .unwrap_or_else(|| DEFAULT_SKIN_TYPE.to_string()),
        count: types.len(),
        all_types: types,
    }
}

pub fn parse_ingredients(value: &Value) -> Ingredients {
    build_ingredients(field_items(value))
}

/// Ingredient record for an already-split list.
pub fn build_ingredients(list: Vec<String>) -> Ingredients {
    Ingredients {
        count: list.len(),
        primary: list.first().cloned(),
        formatted: list.join(", "),
        list,
    }
}

pub fn parse_benefits(value: &Value) -> Benefits {
    build_benefits(field_items(value))
}

/// Benefit record for an already-split list, with categories computed.
pub fn build_benefits(list: Vec<String>) -> Benefits {
    Benefits {
        count: list.len(),
        primary: list.first().cloned(),
        categories: categorize_benefits(&list),
        list,
    }
}

pub fn parse_usage(value: &Value) -> Usage {
    let instructions = field_text(value, " ");
    let steps = extract_steps(&instructions);
    Usage {
        step_count: steps.len(),
        steps,
        frequency: infer_frequency(&instructions).to_string(),
        full_instructions: instructions,
    }
}

pub fn parse_safety(value: &Value) -> Safety {
    let effects = field_items(value);
    let severity = assess_severity(&effects);
    Safety {
        count: effects.len(),
        warnings: safety_warnings(severity),
        severity,
        side_effects: effects,
    }
}

pub fn parse_pricing(value: &Value) -> Pricing {
    let raw_price = field_text(value, ", ");
    let amount = first_number(&raw_price).unwrap_or_else(|| {
        debug!(price = %raw_price, "no numeric price, defaulting to 0");
        0.0
    });
    let currency = if raw_price.contains(RUPEE) || raw_price.contains("INR") {
        RUPEE
    } else {
        DEFAULT_CURRENCY
    };
    build_pricing(amount, currency, raw_price)
}

/// Pricing record for a known amount and currency.
pub fn build_pricing(amount: f64, currency: &str, display: String) -> Pricing {
    Pricing {
        value: amount,
        currency: currency.to_string(),
        formatted: format_price(currency, amount),
        display,
    }
}

/// `"$25.00"`-style rendering with two decimals.
pub fn format_price(currency: &str, amount: f64) -> String {
    format!("{currency}{amount:.2}")
}
