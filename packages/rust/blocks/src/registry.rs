//! Static block registry and failure-isolating dispatcher.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, instrument, warn};

use pagegen_shared::{ComparisonResult, PageGenError, Result, StructuredProduct};

use crate::content::{
    self, BenefitsContent, ComparisonContent, IngredientsContent, OverviewContent,
    PricingContent, SafetyContent, SkinTypeContent, UsageContent,
};

// ---------------------------------------------------------------------------
// Block kinds
// ---------------------------------------------------------------------------

/// The closed set of content blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BlockKind {
    Overview,
    SkinType,
    Ingredients,
    Benefits,
    Usage,
    Safety,
    Pricing,
    Comparison,
}

/// Name → block table. Lookups go through this table only.
const BLOCK_TABLE: [(&str, BlockKind); 8] = [
    ("overview_block", BlockKind::Overview),
    ("skin_type_block", BlockKind::SkinType),
    ("ingredients_block", BlockKind::Ingredients),
    ("benefits_block", BlockKind::Benefits),
    ("usage_block", BlockKind::Usage),
    ("safety_block", BlockKind::Safety),
    ("pricing_block", BlockKind::Pricing),
    ("comparison_block", BlockKind::Comparison),
];

impl BlockKind {
    /// The seven blocks rendered from a single product, in page order.
    pub const PRODUCT_PAGE: [BlockKind; 7] = [
        Self::Overview,
        Self::SkinType,
        Self::Ingredients,
        Self::Benefits,
        Self::Usage,
        Self::Safety,
        Self::Pricing,
    ];

    /// Registered name, e.g. `"overview_block"`.
    pub fn name(self) -> &'static str {
        BLOCK_TABLE
            .iter()
            .find(|(_, kind)| *kind == self)
            .map(|(name, _)| *name)
            .unwrap_or("unknown_block")
    }

    /// Look a block up by its registered name.
    pub fn lookup(name: &str) -> Option<Self> {
        BLOCK_TABLE
            .iter()
            .find(|(registered, _)| *registered == name)
            .map(|(_, kind)| *kind)
    }

    /// Run this block against `data`.
    ///
    /// Product blocks need product data and the comparison block needs a
    /// comparison result; a mismatch is a transformation error for this
    /// block only.
    pub fn execute(self, data: BlockData<'_>) -> Result<BlockContent> {
        let content = match (self, data) {
            (Self::Comparison, BlockData::Comparison(result)) => {
                BlockContent::Comparison(content::comparison(result))
            }
            (Self::Comparison, BlockData::Product(_)) => {
                return Err(PageGenError::transformation(
                    "comparison_block requires comparison data",
                ));
            }
            (kind, BlockData::Comparison(_)) => {
                return Err(PageGenError::transformation(format!(
                    "{kind} requires product data"
                )));
            }
            (Self::Overview, BlockData::Product(p)) => BlockContent::Overview(content::overview(p)),
            (Self::SkinType, BlockData::Product(p)) => BlockContent::SkinType(content::skin_type(p)),
            (Self::Ingredients, BlockData::Product(p)) => {
                BlockContent::Ingredients(content::ingredients(p))
            }
            (Self::Benefits, BlockData::Product(p)) => BlockContent::Benefits(content::benefits(p)),
            (Self::Usage, BlockData::Product(p)) => BlockContent::Usage(content::usage(p)),
            (Self::Safety, BlockData::Product(p)) => BlockContent::Safety(content::safety(p)),
            (Self::Pricing, BlockData::Product(p)) => BlockContent::Pricing(content::pricing(p)),
        };
        Ok(content)
    }
}

impl std::fmt::Display for BlockKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// The shared record a set of blocks runs against.
#[derive(Debug, Clone, Copy)]
pub enum BlockData<'a> {
    Product(&'a StructuredProduct),
    Comparison(&'a ComparisonResult),
}

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

/// Output of one successful block.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BlockContent {
    Overview(OverviewContent),
    SkinType(SkinTypeContent),
    Ingredients(IngredientsContent),
    Benefits(BenefitsContent),
    Usage(UsageContent),
    Safety(SafetyContent),
    Pricing(PricingContent),
    Comparison(ComparisonContent),
}

impl BlockContent {
    pub fn title(&self) -> &str {
        match self {
            Self::Overview(c) => &c.title,
            Self::SkinType(c) => &c.title,
            Self::Ingredients(c) => &c.title,
            Self::Benefits(c) => &c.title,
            Self::Usage(c) => &c.title,
            Self::Safety(c) => &c.title,
            Self::Pricing(c) => &c.title,
            Self::Comparison(c) => &c.title,
        }
    }
}

/// Failure entry recorded in place of a block's content.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockFailure {
    pub error: String,
    pub success: bool,
}

impl BlockFailure {
    fn from_error(err: &PageGenError) -> Self {
        Self {
            error: err.to_string(),
            success: false,
        }
    }
}

/// Per-block result: content, or an isolated failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BlockEntry {
    Content(BlockContent),
    Failed(BlockFailure),
}

impl BlockEntry {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Content(_))
    }

    pub fn content(&self) -> Option<&BlockContent> {
        match self {
            Self::Content(content) => Some(content),
            Self::Failed(_) => None,
        }
    }
}

/// Outputs of one or more registry runs, keyed by block name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProcessedBlocks {
    pub processed_blocks: BTreeMap<String, BlockEntry>,
    pub total_blocks: usize,
    pub successful_blocks: usize,
}

impl ProcessedBlocks {
    pub fn get(&self, name: &str) -> Option<&BlockEntry> {
        self.processed_blocks.get(name)
    }

    /// Fold another run's outputs into this one. Later entries replace
    /// earlier entries of the same name.
    pub fn merge(&mut self, other: ProcessedBlocks) {
        self.total_blocks += other.total_blocks;
        self.processed_blocks.extend(other.processed_blocks);
        self.successful_blocks = self
            .processed_blocks
            .values()
            .filter(|entry| entry.is_success())
            .count();
    }

    fn content(&self, kind: BlockKind) -> Option<&BlockContent> {
        self.get(kind.name()).and_then(BlockEntry::content)
    }

    pub fn overview(&self) -> Option<&OverviewContent> {
        match self.content(BlockKind::Overview)? {
            BlockContent::Overview(c) => Some(c),
            _ => None,
        }
    }

    pub fn skin_type(&self) -> Option<&SkinTypeContent> {
        match self.content(BlockKind::SkinType)? {
            BlockContent::SkinType(c) => Some(c),
            _ => None,
        }
    }

    pub fn ingredients(&self) -> Option<&IngredientsContent> {
        match self.content(BlockKind::Ingredients)? {
            BlockContent::Ingredients(c) => Some(c),
            _ => None,
        }
    }

    pub fn benefits(&self) -> Option<&BenefitsContent> {
        match self.content(BlockKind::Benefits)? {
            BlockContent::Benefits(c) => Some(c),
            _ => None,
        }
    }

    pub fn usage(&self) -> Option<&UsageContent> {
        match self.content(BlockKind::Usage)? {
            BlockContent::Usage(c) => Some(c),
            _ => None,
        }
    }

    pub fn safety(&self) -> Option<&SafetyContent> {
        match self.content(BlockKind::Safety)? {
            BlockContent::Safety(c) => Some(c),
            _ => None,
        }
    }

    pub fn pricing(&self) -> Option<&PricingContent> {
        match self.content(BlockKind::Pricing)? {
            BlockContent::Pricing(c) => Some(c),
            _ => None,
        }
    }

    pub fn comparison(&self) -> Option<&ComparisonContent> {
        match self.content(BlockKind::Comparison)? {
            BlockContent::Comparison(c) => Some(c),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

/// Run the requested blocks, in order, against `data`.
///
/// Never fails as a whole: unknown names and block errors become
/// [`BlockEntry::Failed`] entries and the remaining blocks still run.
#[instrument(skip_all, fields(requested = names.len()))]
pub fn process_blocks<S: AsRef<str>>(names: &[S], data: BlockData<'_>) -> ProcessedBlocks {
    let mut processed = BTreeMap::new();

    for name in names {
        let name = name.as_ref();
        let outcome = BlockKind::lookup(name)
            .ok_or_else(|| PageGenError::unknown_block(name))
            .and_then(|kind| kind.execute(data));

        let entry = match outcome {
            Ok(content) => {
                debug!(block = name, title = content.title(), "block processed");
                BlockEntry::Content(content)
            }
            Err(e) => {
                warn!(block = name, error = %e, "block failed");
                BlockEntry::Failed(BlockFailure::from_error(&e))
            }
        };
        processed.insert(name.to_string(), entry);
    }

    let successful_blocks = processed.values().filter(|e| e.is_success()).count();

    ProcessedBlocks {
        processed_blocks: processed,
        total_blocks: names.len(),
        successful_blocks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_names_roundtrip() {
        for (name, kind) in BLOCK_TABLE {
            assert_eq!(kind.name(), name);
            assert_eq!(BlockKind::lookup(name), Some(kind));
        }
        assert_eq!(BlockKind::lookup("hero_block"), None);
    }

    #[test]
    fn product_page_blocks_exclude_comparison() {
        assert!(!BlockKind::PRODUCT_PAGE.contains(&BlockKind::Comparison));
        assert_eq!(BlockKind::PRODUCT_PAGE.len(), 7);
    }

    #[test]
    fn failure_entry_serializes_with_success_false() {
        let entry = BlockEntry::Failed(BlockFailure::from_error(&PageGenError::unknown_block(
            "hero_block",
        )));
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["error"], "Unknown block: hero_block");
        assert_eq!(json["success"], false);
    }
}
