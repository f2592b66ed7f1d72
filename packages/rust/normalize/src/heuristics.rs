//! Keyword heuristics: benefit categories, severity, usage steps and frequency.

use std::sync::LazyLock;

use regex::Regex;

use pagegen_shared::{BenefitCategories, Severity};

static NUMBERED_STEP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\.\s*([^\n\d]+)").unwrap());

const TREATMENT_KEYWORDS: &[&str] = &["treat", "reduce", "fade", "remove", "clear"];
const PREVENTION_KEYWORDS: &[&str] = &["prevent", "protect", "shield", "guard"];
const ENHANCEMENT_KEYWORDS: &[&str] = &["improve", "boost", "enhance", "brighten"];

const SEVERE_KEYWORDS: &[&str] = &["severe", "serious", "burn", "blister", "emergency"];
const MODERATE_KEYWORDS: &[&str] = &["irritation", "redness", "peeling", "dry"];

/// Benefit bucket selected by the categorizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BenefitKind {
    Treatment,
    Prevention,
    Enhancement,
    General,
}

fn contains_any(haystack: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| haystack.contains(kw))
}

/// Classify one benefit. Treatment, prevention and enhancement keywords are
/// checked in that order; the first hit wins.
pub fn benefit_kind(benefit: &str) -> BenefitKind {
    let lower = benefit.to_lowercase();
    if contains_any(&lower, TREATMENT_KEYWORDS) {
        BenefitKind::Treatment
    } else if contains_any(&lower, PREVENTION_KEYWORDS) {
        BenefitKind::Prevention
    } else if contains_any(&lower, ENHANCEMENT_KEYWORDS) {
        BenefitKind::Enhancement
    } else {
        BenefitKind::General
    }
}

/// Bucket every benefit into exactly one category.
pub fn categorize_benefits(benefits: &[String]) -> BenefitCategories {
    let mut categories = BenefitCategories::default();
    for benefit in benefits {
        let bucket = match benefit_kind(benefit) {
            BenefitKind::Treatment => &mut categories.treatment,
            BenefitKind::Prevention => &mut categories.prevention,
            BenefitKind::Enhancement => &mut categories.enhancement,
            BenefitKind::General => &mut categories.general,
        };
        bucket.push(benefit.clone());
    }
    categories
}

/// Severity over all side effects taken together.
pub fn assess_severity(effects: &[String]) -> Severity {
    let text = effects.join(" ").to_lowercase();
    if contains_any(&text, SEVERE_KEYWORDS) {
        Severity::High
    } else if contains_any(&text, MODERATE_KEYWORDS) {
        Severity::Moderate
    } else {
        Severity::Low
    }
}

/// Warnings for a severity level. "For external use only" is always last.
pub fn safety_warnings(severity: Severity) -> Vec<String> {
    let mut warnings = Vec::new();

    if severity == Severity::High {
        warnings.push("Discontinue use if severe reactions occur".to_string());
        warnings.push("Consult a healthcare professional".to_string());
    }

    if severity >= Severity::Moderate {
        warnings.push("Perform patch test before use".to_string());
        warnings.push("Avoid contact with eyes".to_string());
    }

    warnings.push("For external use only".to_string());
    warnings
}

/// Split instructions into steps.
///
/// Numbered steps ("1. Cleanse 2. Apply") are preferred; otherwise sentences
/// when there is more than one; otherwise the whole text as a single step.
pub fn extract_steps(text: &str) -> Vec<String> {
    let numbered: Vec<String> = NUMBERED_STEP_RE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    if !numbered.is_empty() {
        return numbered;
    }

    let sentences: Vec<String> = text
        .split('.')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();
    if sentences.len() > 1 {
        return sentences;
    }

    if text.is_empty() {
        Vec::new()
    } else {
        vec![text.to_string()]
    }
}

/// Infer how often the product is used from keywords in the instructions.
pub fn infer_frequency(text: &str) -> &'static str {
    let lower = text.to_lowercase();
    if lower.contains("twice") || lower.contains('2') {
        "Twice daily"
    } else if lower.contains("once") || lower.contains("daily") {
        "Once daily"
    } else if lower.contains("weekly") {
        "Weekly"
    } else {
        "As directed"
    }
}
