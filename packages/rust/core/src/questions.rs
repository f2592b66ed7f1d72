//! Question stage: five categories of templated questions per product.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use pagegen_shared::{Clock, QuestionCategory, QuestionSet, Result, StructuredProduct};

use crate::stage::{Stage, StageStats, require_name};

pub struct QuestionStage {
    stats: StageStats,
}

impl QuestionStage {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            stats: StageStats::new("question_generator_001", "question_generator", clock),
        }
    }
}

impl Stage for QuestionStage {
    type Input<'a> = StructuredProduct;
    type Output = QuestionSet;

    fn stats(&self) -> &StageStats {
        &self.stats
    }

    fn validate(&self, product: &StructuredProduct) -> Result<()> {
        require_name(&product.name)
    }

    fn execute(&self, product: &StructuredProduct) -> Result<QuestionSet> {
        let groups: BTreeMap<QuestionCategory, Vec<String>> = QuestionCategory::ALL
            .iter()
            .map(|&category| (category, questions_for(category, product)))
            .collect();
        let set = QuestionSet::from_categories(groups);
        debug!(total = set.total_count, "questions generated");
        Ok(set)
    }
}

/// Templated questions for one category, base questions first.
pub fn questions_for(category: QuestionCategory, product: &StructuredProduct) -> Vec<String> {
    match category {
        QuestionCategory::Informational => informational(product),
        QuestionCategory::Usage => usage(product),
        QuestionCategory::Safety => safety(product),
        QuestionCategory::Purchase => purchase(product),
        QuestionCategory::Comparison => comparison(product),
    }
}

fn informational(product: &StructuredProduct) -> Vec<String> {
    let name = &product.name;
    let mut questions = vec![
        format!("What is {name}?"),
        format!("What are the key ingredients in {name}?"),
    ];

    if let Some(first) = product.ingredients.list.first() {
        questions.push(format!("What is {first} and how does it work?"));
        questions.push(format!(
            "What does {} mean?",
            product.concentration.display
        ));
    }

    if !product.benefits.list.is_empty() {
        questions.push(format!("What are the main benefits of {name}?"));
        questions.push("How does this product improve skin health?".to_string());
    }

    questions
}

fn usage(product: &StructuredProduct) -> Vec<String> {
    let name = &product.name;
    let mut questions = vec![
        format!("How do I use {name}?"),
        "When should I apply this product?".to_string(),
        format!("How often should I use {name}?"),
    ];

    let types = &product.skin_type.all_types;
    match types.as_slice() {
        [] => {}
        [first, _, ..] => {
            questions.push(format!("Can I use this product if I have {first} skin?"));
        }
        [_] => questions.push("Is this suitable for all skin types?".to_string()),
    }

    questions.push("Should I use this in my morning or evening routine?".to_string());
    questions
}

fn safety(product: &StructuredProduct) -> Vec<String> {
    let mut questions = vec![
        format!("What are the side effects of {}?", product.name),
        "Is this product safe for sensitive skin?".to_string(),
        "Can I use this product during pregnancy?".to_string(),
    ];

    if !product.safety.side_effects.is_empty() {
        questions.push("What should I do if I experience irritation?".to_string());
        questions.push("Are there any precautions I should take?".to_string());
    }

    questions
}

fn purchase(product: &StructuredProduct) -> Vec<String> {
    let mut questions = vec![
        format!("How much does {} cost?", product.name),
        "What is the price of this product?".to_string(),
        "Is this product worth the price?".to_string(),
    ];

    if product.pricing.value > 0.0 {
        questions.push("How long will one bottle last?".to_string());
    }

    questions
}

fn comparison(product: &StructuredProduct) -> Vec<String> {
    let mut questions = vec![
        format!(
            "How is {} different from other similar products?",
            product.name
        ),
        "What makes this product unique?".to_string(),
    ];

    if let Some(primary) = &product.ingredients.primary {
        questions.push(format!(
            "Is {primary} better than other active ingredients?"
        ));
    }

    if product.concentration.percentage.is_some_and(|pct| pct > 0.0) {
        questions.push("Is a higher concentration always better?".to_string());
    }

    questions.push("Should I use this product alone or with other serums?".to_string());
    questions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fixed_clock, glow_serum};

    #[test]
    fn glow_serum_yields_twenty_five_questions() {
        let stage = QuestionStage::new(fixed_clock());
        let set = stage.run(&glow_serum()).into_result().unwrap();

        assert_eq!(set.questions_by_category.len(), 5);
        assert_eq!(set.total_count, 25);
        assert_eq!(set.category_counts[&QuestionCategory::Informational], 6);
        assert_eq!(set.category_counts[&QuestionCategory::Usage], 5);
        assert_eq!(set.category_counts[&QuestionCategory::Safety], 5);
        assert_eq!(set.category_counts[&QuestionCategory::Purchase], 4);
        assert_eq!(set.category_counts[&QuestionCategory::Comparison], 5);
        assert_eq!(set.all_questions.len(), set.total_count);
    }

    #[test]
    fn informational_extras_follow_ingredients() {
        let product = glow_serum();
        let questions = questions_for(QuestionCategory::Informational, &product);
        assert_eq!(questions[0], "What is Glow Serum?");
        assert_eq!(questions[2], "What is Niacinamide and how does it work?");
        assert_eq!(questions[3], "What does 10% mean?");
    }

    #[test]
    fn skin_type_question_depends_on_count() {
        let mut product = glow_serum();
        let many = questions_for(QuestionCategory::Usage, &product);
        assert!(many.contains(&"Can I use this product if I have Oily skin?".to_string()));

        product.skin_type.all_types = vec!["Dry".into()];
        let one = questions_for(QuestionCategory::Usage, &product);
        assert!(one.contains(&"Is this suitable for all skin types?".to_string()));

        product.skin_type.all_types.clear();
        assert_eq!(questions_for(QuestionCategory::Usage, &product).len(), 4);
    }

    #[test]
    fn sparse_product_still_covers_every_category() {
        let mut product = glow_serum();
        product.ingredients = pagegen_normalize::build_ingredients(Vec::new());
        product.benefits = pagegen_normalize::build_benefits(Vec::new());
        product.skin_type.all_types.clear();
        product.safety.side_effects.clear();
        product.pricing.value = 0.0;
        product.concentration.percentage = None;

        let set = QuestionStage::new(fixed_clock())
            .run(&product)
            .into_result()
            .unwrap();
        for category in QuestionCategory::ALL {
            assert!(set.category_counts[&category] >= 2, "{category} too small");
        }
        assert_eq!(set.total_count, 15);
    }

    #[test]
    fn blank_name_is_rejected() {
        let mut product = glow_serum();
        product.name = "   ".into();
        let outcome = QuestionStage::new(fixed_clock()).run(&product);
        assert!(!outcome.is_success());
    }
}
