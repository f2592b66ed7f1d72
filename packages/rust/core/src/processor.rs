//! Block stage: runs a set of registry blocks as one stage invocation.

use std::sync::Arc;

use tracing::debug;

use pagegen_blocks::{BlockData, ProcessedBlocks, process_blocks};
use pagegen_shared::{Clock, PageGenError, Result};

use crate::stage::{Stage, StageStats};

/// Block names plus the record they run against.
#[derive(Debug, Clone, Copy)]
pub struct BlockRequest<'a> {
    pub names: &'a [&'a str],
    pub data: BlockData<'a>,
}

pub struct BlockStage {
    stats: StageStats,
}

impl BlockStage {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            stats: StageStats::new("logic_blocks_processor_001", "logic_blocks_processor", clock),
        }
    }
}

impl Stage for BlockStage {
    type Input<'a> = BlockRequest<'a>;
    type Output = ProcessedBlocks;

    fn stats(&self) -> &StageStats {
        &self.stats
    }

    fn validate(&self, request: &BlockRequest<'_>) -> Result<()> {
        if request.names.is_empty() {
            return Err(PageGenError::validation("no blocks requested"));
        }
        Ok(())
    }

    fn execute(&self, request: &BlockRequest<'_>) -> Result<ProcessedBlocks> {
        let processed = process_blocks(request.names, request.data);
        debug!(
            total = processed.total_blocks,
            successful = processed.successful_blocks,
            "blocks processed"
        );
        Ok(processed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fixed_clock, glow_serum};
    use pagegen_blocks::BlockEntry;

    #[test]
    fn one_unknown_among_known_blocks() {
        let product = glow_serum();
        let names = [
            "overview_block",
            "usage_block",
            "testimonial_block",
            "pricing_block",
        ];
        let request = BlockRequest {
            names: &names,
            data: BlockData::Product(&product),
        };
        let processed = BlockStage::new(fixed_clock())
            .run(&request)
            .into_result()
            .unwrap();

        assert_eq!(processed.total_blocks, 4);
        assert_eq!(processed.successful_blocks, 3);
        let failures: Vec<_> = processed
            .processed_blocks
            .values()
            .filter(|entry| !entry.is_success())
            .collect();
        assert_eq!(failures.len(), 1);
        assert!(matches!(
            processed.get("testimonial_block"),
            Some(BlockEntry::Failed(f)) if f.error == "Unknown block: testimonial_block"
        ));
    }

    #[test]
    fn empty_request_is_rejected() {
        let product = glow_serum();
        let request = BlockRequest {
            names: &[],
            data: BlockData::Product(&product),
        };
        assert!(!BlockStage::new(fixed_clock()).run(&request).is_success());
    }
}
