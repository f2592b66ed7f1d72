//! Shared types, error model, and configuration for pagegen.
//!
//! This crate is the foundation depended on by all other pagegen crates.
//! It provides:
//! - [`PageGenError`]: the unified error type
//! - Domain types ([`RawProductRecord`], [`StructuredProduct`], [`QuestionSet`],
//!   [`ComparisonResult`])
//! - The [`Clock`] timestamp source
//! - Configuration ([`AppConfig`], config loading)

pub mod clock;
pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{
    AppConfig, DefaultsConfig, GenerationConfig, config_dir, config_file_path, init_config,
    load_config, load_config_from,
};
pub use error::{PageGenError, Result};
pub use types::{
    BasicInfo, BenefitCategories, BenefitComparison, Benefits, CONTENT_VERSION,
    CategorizedQuestion, ComparisonMatrix, ComparisonResult, Concentration,
    ConcentrationComparison, IngredientComparison, Ingredients, Pricing, PricingComparison,
    ProductOrigin, QuestionCategory, QuestionSet, RawProductRecord, Safety, Severity, SkinType,
    StructuredProduct, Usage,
};
