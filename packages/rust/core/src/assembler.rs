//! Assembly stage: product data + block outputs → one [`Page`].

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use pagegen_blocks::{BlockData, ProcessedBlocks};
use pagegen_shared::{
    CONTENT_VERSION, Clock, ComparisonResult, PageGenError, QuestionCategory, QuestionSet,
    Result, StructuredProduct,
};

use crate::pages::*;
use crate::stage::{Stage, StageStats};

/// Default number of FAQ entries on a page.
pub const DEFAULT_FAQ_LIMIT: usize = 15;

const NOT_AVAILABLE: &str = "Information not available.";

/// Knobs the assembler reads from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblyOptions {
    pub faq_limit: usize,
    pub version: String,
}

impl Default for AssemblyOptions {
    fn default() -> Self {
        Self {
            faq_limit: DEFAULT_FAQ_LIMIT,
            version: CONTENT_VERSION.to_string(),
        }
    }
}

/// Everything one assembly needs.
#[derive(Debug, Clone, Copy)]
pub struct AssemblyRequest<'a> {
    pub page_type: PageType,
    pub data: BlockData<'a>,
    pub blocks: &'a ProcessedBlocks,
    pub questions: Option<&'a QuestionSet>,
}

pub struct AssemblyStage {
    stats: StageStats,
    options: AssemblyOptions,
}

impl AssemblyStage {
    pub fn new(clock: Arc<dyn Clock>, options: AssemblyOptions) -> Self {
        Self {
            stats: StageStats::new("page_assembly_001", "page_assembly", clock),
            options,
        }
    }

    fn generated_at(&self) -> String {
        self.stats.clock().timestamp()
    }
}

impl Stage for AssemblyStage {
    type Input<'a> = AssemblyRequest<'a>;
    type Output = Page;

    fn stats(&self) -> &StageStats {
        &self.stats
    }

    fn validate(&self, request: &AssemblyRequest<'_>) -> Result<()> {
        match (request.page_type, request.data) {
            (PageType::Faq, BlockData::Product(_)) if request.questions.is_none() => Err(
                PageGenError::assembly("faq page requires a question set"),
            ),
            (PageType::Faq | PageType::Product, BlockData::Product(_))
            | (PageType::Comparison, BlockData::Comparison(_)) => Ok(()),
            (page_type, _) => Err(PageGenError::assembly(format!(
                "{page_type} page given the wrong kind of data"
            ))),
        }
    }

    fn execute(&self, request: &AssemblyRequest<'_>) -> Result<Page> {
        let page = match (request.page_type, request.data, request.questions) {
            (PageType::Faq, BlockData::Product(product), Some(questions)) => {
                Page::Faq(self.faq_page(product, questions, request.blocks))
            }
            (PageType::Product, BlockData::Product(product), _) => {
                Page::Product(self.product_page(product, request.blocks))
            }
            (PageType::Comparison, BlockData::Comparison(result), _) => {
                Page::Comparison(self.comparison_page(result, request.blocks))
            }
            (page_type, ..) => {
                return Err(PageGenError::assembly(format!(
                    "cannot assemble {page_type} page from this request"
                )));
            }
        };
        debug!(page_type = %page.page_type(), "page assembled");
        Ok(page)
    }
}

// ---------------------------------------------------------------------------
// FAQ
// ---------------------------------------------------------------------------

impl AssemblyStage {
    fn faq_page(
        &self,
        product: &StructuredProduct,
        questions: &QuestionSet,
        blocks: &ProcessedBlocks,
    ) -> FaqPage {
        let faqs: Vec<FaqEntry> = questions
            .all_questions
            .iter()
            .take(self.options.faq_limit)
            .map(|item| FaqEntry {
                answer: answer_question(&item.question, item.category, &product.name, blocks),
                question: item.question.clone(),
                category: item.category,
            })
            .collect();

        let mut by_category: BTreeMap<QuestionCategory, Vec<FaqPair>> = BTreeMap::new();
        for faq in &faqs {
            by_category.entry(faq.category).or_default().push(FaqPair {
                question: faq.question.clone(),
                answer: faq.answer.clone(),
            });
        }

        FaqPage {
            page_type: PageType::Faq,
            product_name: product.name.clone(),
            title: format!("{} - Frequently Asked Questions", product.name),
            total_questions: faqs.len(),
            metadata: FaqMetadata {
                generated_at: self.generated_at(),
                version: self.options.version.clone(),
                categories: by_category.keys().copied().collect(),
            },
            faqs,
            faqs_by_category: by_category,
        }
    }
}

/// One keyword route: a predicate on the lowercased question and the answer
/// it produces. `None` from `answer` means "fall back to the category default".
struct Route {
    matches: fn(&str) -> bool,
    answer: fn(&str, &ProcessedBlocks) -> Option<String>,
}

/// Evaluated top to bottom; the first matching route decides.
const ROUTES: [Route; 5] = [
    Route {
        matches: |q| q.contains("what is") || q.contains("what are"),
        answer: answer_what,
    },
    Route {
        matches: |q| q.contains("how"),
        answer: answer_how,
    },
    Route {
        matches: |q| q.contains("price") || q.contains("cost"),
        answer: |_, blocks| {
            Some(blocks.pricing().map_or_else(
                || "Pricing information not available.".to_string(),
                |b| b.pricing_summary.clone(),
            ))
        },
    },
    Route {
        matches: |q| q.contains("side effect") || q.contains("safe"),
        answer: |_, blocks| {
            Some(blocks.safety().map_or_else(
                || "Consult product safety information.".to_string(),
                |b| b.safety_summary.clone(),
            ))
        },
    },
    Route {
        matches: |q| q.contains("skin type"),
        answer: |_, blocks| {
            Some(blocks.skin_type().map_or_else(
                || "Suitable for most skin types.".to_string(),
                |b| b.suitability_text.clone(),
            ))
        },
    },
];

fn answer_what(q: &str, blocks: &ProcessedBlocks) -> Option<String> {
    let answer = if q.contains("ingredient") {
        blocks.ingredients().map(|b| b.ingredient_summary.clone())
    } else if q.contains("benefit") {
        blocks.benefits().map(|b| b.summary.clone())
    } else {
        blocks.overview().map(|b| b.overview_text.clone())
    };
    Some(answer.unwrap_or_else(|| NOT_AVAILABLE.to_string()))
}

fn answer_how(q: &str, blocks: &ProcessedBlocks) -> Option<String> {
    if q.contains("use") || q.contains("apply") {
        Some(blocks.usage().map_or_else(
            || "Follow product instructions.".to_string(),
            |b| b.quick_guide.clone(),
        ))
    } else if q.contains("often") {
        let frequency = blocks.usage().map_or("as directed", |b| b.frequency.as_str());
        Some(format!("Use {frequency}."))
    } else {
        None
    }
}

/// Answer one question from the available blocks.
pub fn answer_question(
    question: &str,
    category: QuestionCategory,
    product_name: &str,
    blocks: &ProcessedBlocks,
) -> String {
    let lower = question.to_lowercase();
    ROUTES
        .iter()
        .find(|route| (route.matches)(&lower))
        .and_then(|route| (route.answer)(&lower, blocks))
        .unwrap_or_else(|| default_answer(category, product_name))
}

fn default_answer(category: QuestionCategory, name: &str) -> String {
    match category {
        QuestionCategory::Informational => {
            format!("{name} is a skin care product formulated with quality ingredients.")
        }
        QuestionCategory::Usage => {
            "Follow the usage instructions provided with the product.".to_string()
        }
        QuestionCategory::Safety => {
            "Perform a patch test before use and discontinue if irritation occurs.".to_string()
        }
        QuestionCategory::Purchase => {
            "Check the product pricing information for current costs.".to_string()
        }
        QuestionCategory::Comparison => {
            format!("{name} offers unique benefits compared to similar products.")
        }
    }
}

// ---------------------------------------------------------------------------
// Product
// ---------------------------------------------------------------------------

impl AssemblyStage {
    fn product_page(&self, product: &StructuredProduct, blocks: &ProcessedBlocks) -> ProductPage {
        let overview = blocks.overview().map_or_else(
            || OverviewSection {
                title: "Overview".into(),
                description: String::new(),
                key_points: Vec::new(),
                concentration: String::new(),
            },
            |b| OverviewSection {
                title: b.title.clone(),
                description: b.overview_text.clone(),
                key_points: b.key_points.clone(),
                concentration: b.concentration.clone(),
            },
        );

        let skin_type = blocks.skin_type().map_or_else(
            || SkinTypeSection {
                title: "Suitable For".into(),
                primary: String::new(),
                all_types: Vec::new(),
                description: String::new(),
            },
            |b| SkinTypeSection {
                title: b.title.clone(),
                primary: b.primary_skin_type.clone(),
                all_types: b.all_skin_types.clone(),
                description: b.suitability_text.clone(),
            },
        );

        let ingredients = blocks.ingredients().map_or_else(
            || IngredientsSection {
                title: "Key Ingredients".into(),
                list: Vec::new(),
                primary_ingredient: None,
                total_count: 0,
                summary: String::new(),
            },
            |b| IngredientsSection {
                title: b.title.clone(),
                list: b.ingredients.clone(),
                primary_ingredient: b.primary_ingredient.clone(),
                total_count: b.count,
                summary: b.ingredient_summary.clone(),
            },
        );

        let benefits = blocks.benefits().map_or_else(
            || BenefitsSection {
                title: "Benefits".into(),
                list: Vec::new(),
                categorized: Default::default(),
                summary: String::new(),
            },
            |b| BenefitsSection {
                title: b.title.clone(),
                list: b.benefits.clone(),
                categorized: b.categorized_benefits.clone(),
                summary: b.summary.clone(),
            },
        );

        let usage = blocks.usage().map_or_else(
            || UsageSection {
                title: "How to Use".into(),
                steps: Vec::new(),
                frequency: String::new(),
                quick_guide: String::new(),
                full_instructions: String::new(),
            },
            |b| UsageSection {
                title: b.title.clone(),
                steps: b.steps.clone(),
                frequency: b.frequency.clone(),
                quick_guide: b.quick_guide.clone(),
                full_instructions: b.full_instructions.clone(),
            },
        );

        let safety = blocks.safety().map_or_else(
            || SafetySection {
                title: "Safety Information".into(),
                side_effects: Vec::new(),
                warnings: Vec::new(),
                severity: String::new(),
                summary: String::new(),
            },
            |b| SafetySection {
                title: b.title.clone(),
                side_effects: b.side_effects.clone(),
                warnings: b.warnings.clone(),
                severity: b.severity.as_str().to_string(),
                summary: b.safety_summary.clone(),
            },
        );

        let pricing = blocks.pricing().map_or_else(
            || PricingSection {
                title: "Pricing".into(),
                price: String::new(),
                formatted_price: String::new(),
                value_proposition: String::new(),
                summary: String::new(),
            },
            |b| PricingSection {
                title: b.title.clone(),
                price: b.display_price.clone(),
                formatted_price: b.price.clone(),
                value_proposition: b.value_proposition.as_str().to_string(),
                summary: b.pricing_summary.clone(),
            },
        );

        ProductPage {
            page_type: PageType::Product,
            product_id: product.product_id.clone(),
            product_name: product.name.clone(),
            overview,
            skin_type,
            ingredients,
            benefits,
            usage,
            safety,
            pricing,
            metadata: ProductMetadata {
                generated_at: self.generated_at(),
                version: self.options.version.clone(),
                data_source: "product_parser".to_string(),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Comparison
// ---------------------------------------------------------------------------

impl AssemblyStage {
    fn comparison_page(
        &self,
        result: &ComparisonResult,
        blocks: &ProcessedBlocks,
    ) -> ComparisonPage {
        let matrix = &result.comparison;
        let a = &result.product_a;
        let b = &result.product_b;

        ComparisonPage {
            page_type: PageType::Comparison,
            title: format!("{} vs {}", a.name, b.name),
            products: ProductPair {
                product_a: headline(a),
                product_b: headline(b),
            },
            comparison: ComparisonSections {
                concentration: ConcentrationSection {
                    product_a: matrix.concentration.product_a.clone(),
                    product_b: matrix.concentration.product_b.clone(),
                    analysis: matrix.concentration.difference.clone(),
                },
                ingredients: IngredientDiffSection {
                    product_a: matrix.ingredients.product_a.clone(),
                    product_b: matrix.ingredients.product_b.clone(),
                    common_ingredients: matrix.ingredients.common.clone(),
                    unique_to_a: matrix.ingredients.unique_to_a.clone(),
                    unique_to_b: matrix.ingredients.unique_to_b.clone(),
                },
                benefits: BenefitDiffSection {
                    product_a: matrix.benefits.product_a.clone(),
                    product_b: matrix.benefits.product_b.clone(),
                    analysis: matrix.benefits.comparison.clone(),
                },
                pricing: PricingDiffSection {
                    product_a: matrix.pricing.product_a.clone(),
                    product_b: matrix.pricing.product_b.clone(),
                    price_difference: matrix.pricing.difference.clone(),
                    value_assessment: matrix.pricing.value_assessment.clone(),
                },
            },
            summary: result.summary.clone(),
            recommendation: blocks
                .comparison()
                .map(|c| c.recommendation.clone())
                .unwrap_or_default(),
            metadata: ComparisonMetadata {
                generated_at: self.generated_at(),
                version: self.options.version.clone(),
                comparison_type: "side_by_side".to_string(),
            },
        }
    }
}

fn headline(product: &StructuredProduct) -> ProductHeadline {
    ProductHeadline {
        name: product.name.clone(),
        id: product.product_id.clone(),
        concentration: product.concentration.display.clone(),
        price: product.pricing.formatted.clone(),
    }
}
