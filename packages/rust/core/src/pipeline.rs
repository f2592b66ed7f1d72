//! End-to-end generation: raw record → parse → questions → comparison →
//! blocks → three pages → artifacts.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use pagegen_blocks::{BlockData, BlockKind, ProcessedBlocks};
use pagegen_shared::{
    AppConfig, Clock, ComparisonResult, PageGenError, QuestionSet, RawProductRecord, Result,
    StructuredProduct, SystemClock,
};

use crate::assembler::{AssemblyOptions, AssemblyRequest, AssemblyStage};
use crate::pages::{Page, PageType};
use crate::parser::ParseStage;
use crate::processor::{BlockRequest, BlockStage};
use crate::questions::QuestionStage;
use crate::random::{RandomSource, SeededRandom, ThreadRandom};
use crate::sink::{ArtifactMeta, ArtifactSink, FsSink};
use crate::stage::{Stage, StageInfo};
use crate::variant::VariantStage;

/// Configuration for one [`Pipeline`].
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directory the three page documents are written to.
    pub output_dir: PathBuf,
    /// FAQ limit and version stamp.
    pub assembly: AssemblyOptions,
    /// Seed for the variant random source. OS-seeded when `None`.
    pub seed: Option<u64>,
}

impl PipelineConfig {
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            output_dir: PathBuf::from(&config.defaults.output_dir),
            assembly: AssemblyOptions {
                faq_limit: config.generation.faq_limit,
                version: config.generation.version.clone(),
            },
            seed: config.generation.seed,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::from_app_config(&AppConfig::default())
    }
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called after each artifact is persisted.
    fn artifact_written(&self, meta: &ArtifactMeta, current: usize, total: usize);
    /// Called once the run finishes, successfully or not.
    fn done(&self, result: &GenerationResult);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn artifact_written(&self, _meta: &ArtifactMeta, _current: usize, _total: usize) {}
    fn done(&self, _result: &GenerationResult) {}
}

/// Locations of the persisted pages.
pub type OutputFiles = BTreeMap<String, PathBuf>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationStats {
    pub total_questions: usize,
    pub product_name: String,
    pub comparison_product: String,
}

/// Outcome of [`Pipeline::generate_all_pages`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_files: Option<OutputFiles>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub artifacts: Vec<ArtifactMeta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statistics: Option<GenerationStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub elapsed_ms: u64,
}

impl GenerationResult {
    fn failure(message: String, elapsed_ms: u64) -> Self {
        Self {
            success: false,
            output_files: None,
            artifacts: Vec::new(),
            statistics: None,
            error: Some(message),
            elapsed_ms,
        }
    }
}

/// Which intermediate results the most recent run produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct WorkflowStatus {
    pub product_parsed: bool,
    pub questions_generated: bool,
    pub comparison_created: bool,
    pub logic_blocks_processed: bool,
}

#[derive(Debug, Default)]
struct RunState {
    product: Option<StructuredProduct>,
    questions: Option<QuestionSet>,
    comparison: Option<ComparisonResult>,
    blocks: Option<ProcessedBlocks>,
}

struct Generated {
    output_files: OutputFiles,
    artifacts: Vec<ArtifactMeta>,
    statistics: GenerationStats,
}

/// Sequences the stages and persists the pages.
pub struct Pipeline {
    config: PipelineConfig,
    parser: ParseStage,
    questions: QuestionStage,
    variant: VariantStage,
    blocks: BlockStage,
    assembler: AssemblyStage,
    sink: Box<dyn ArtifactSink>,
    progress: Arc<dyn ProgressReporter>,
    state: RunState,
}

impl Pipeline {
    /// Pipeline with the wall clock, the filesystem sink and no progress output.
    pub fn new(config: PipelineConfig) -> Self {
        PipelineBuilder::new(config).build()
    }

    pub fn builder(config: PipelineConfig) -> PipelineBuilder {
        PipelineBuilder::new(config)
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn workflow_status(&self) -> WorkflowStatus {
        WorkflowStatus {
            product_parsed: self.state.product.is_some(),
            questions_generated: self.state.questions.is_some(),
            comparison_created: self.state.comparison.is_some(),
            logic_blocks_processed: self.state.blocks.is_some(),
        }
    }

    /// Counters for every stage, in pipeline order.
    pub fn stage_info(&self) -> [StageInfo; 5] {
        [
            self.parser.info(),
            self.questions.info(),
            self.variant.info(),
            self.blocks.info(),
            self.assembler.info(),
        ]
    }

    /// Results of the most recent run.
    pub fn parsed_product(&self) -> Option<&StructuredProduct> {
        self.state.product.as_ref()
    }

    pub fn question_set(&self) -> Option<&QuestionSet> {
        self.state.questions.as_ref()
    }

    pub fn comparison(&self) -> Option<&ComparisonResult> {
        self.state.comparison.as_ref()
    }

    pub fn processed_blocks(&self) -> Option<&ProcessedBlocks> {
        self.state.blocks.as_ref()
    }

    /// Run every stage once and persist `faq.json`, `product_page.json` and
    /// `comparison_page.json`.
    ///
    /// The first failing stage stops the run and nothing is written.
    #[instrument(skip_all, fields(run_id = %Uuid::now_v7()))]
    pub fn generate_all_pages(&mut self, raw: &RawProductRecord) -> GenerationResult {
        let start = Instant::now();
        self.state = RunState::default();
        info!(output_dir = %self.config.output_dir.display(), "starting generation pipeline");

        let outcome = self.run(raw);
        let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        let result = match outcome {
            Ok(generated) => {
                info!(
                    elapsed_ms,
                    questions = generated.statistics.total_questions,
                    "pipeline completed"
                );
                GenerationResult {
                    success: true,
                    output_files: Some(generated.output_files),
                    artifacts: generated.artifacts,
                    statistics: Some(generated.statistics),
                    error: None,
                    elapsed_ms,
                }
            }
            Err(message) => {
                error!(error = %message, "pipeline failed");
                GenerationResult::failure(message, elapsed_ms)
            }
        };

        self.progress.done(&result);
        result
    }

    fn run(&mut self, raw: &RawProductRecord) -> std::result::Result<Generated, String> {
        // --- Step 1: Parse ---
        self.progress.phase("Parsing product");
        let product = stage_step("Product parsing", self.parser.run(raw).into_result())?;
        info!(product = %product.name, "step 1: product parsed");
        self.state.product = Some(product.clone());

        // --- Step 2: Questions ---
        self.progress.phase("Generating questions");
        let questions =
            stage_step("Question generation", self.questions.run(&product).into_result())?;
        info!(total = questions.total_count, "step 2: questions generated");
        self.state.questions = Some(questions.clone());

        // --- Step 3: Comparison ---
        self.progress.phase("Creating comparison product");
        let comparison =
            stage_step("Comparison generation", self.variant.run(&product).into_result())?;
        info!(product_b = %comparison.product_b.name, "step 3: comparison created");
        self.state.comparison = Some(comparison.clone());

        // --- Step 4: Blocks ---
        self.progress.phase("Processing content blocks");
        let product_names: Vec<&str> = BlockKind::PRODUCT_PAGE.iter().map(|k| k.name()).collect();
        let mut blocks = stage_step(
            "Product block processing",
            self.blocks
                .run(&BlockRequest {
                    names: &product_names,
                    data: BlockData::Product(&product),
                })
                .into_result(),
        )?;
        let comparison_names = [BlockKind::Comparison.name()];
        blocks.merge(stage_step(
            "Comparison block processing",
            self.blocks
                .run(&BlockRequest {
                    names: &comparison_names,
                    data: BlockData::Comparison(&comparison),
                })
                .into_result(),
        )?);
        info!(
            total = blocks.total_blocks,
            successful = blocks.successful_blocks,
            "step 4: blocks processed"
        );

        // --- Step 5: Assemble ---
        self.progress.phase("Assembling pages");
        let mut pages = Vec::with_capacity(PageType::ALL.len());
        for page_type in PageType::ALL {
            let data = match page_type {
                PageType::Comparison => BlockData::Comparison(&comparison),
                PageType::Faq | PageType::Product => BlockData::Product(&product),
            };
            let request = AssemblyRequest {
                page_type,
                data,
                blocks: &blocks,
                questions: Some(&questions),
            };
            let page = stage_step(
                &format!("{page_type} page assembly"),
                self.assembler.run(&request).into_result(),
            )?;
            pages.push(page);
        }
        info!("step 5: pages assembled");

        let statistics = GenerationStats {
            total_questions: questions.total_count,
            product_name: product.name.clone(),
            comparison_product: comparison.product_b.name.clone(),
        };
        self.state.blocks = Some(blocks);

        // --- Step 6: Persist ---
        self.progress.phase("Writing artifacts");
        let (output_files, artifacts) =
            self.persist(&pages).map_err(|e| format!("Saving outputs failed: {e}"))?;
        info!(files = artifacts.len(), "step 6: outputs saved");

        Ok(Generated {
            output_files,
            artifacts,
            statistics,
        })
    }

    /// Serialize every page up front, then write them in order. A failed
    /// write removes the pages already written in this run.
    fn persist(&self, pages: &[Page]) -> Result<(OutputFiles, Vec<ArtifactMeta>)> {
        let rendered = pages
            .iter()
            .map(|page| -> Result<(PageType, String)> {
                Ok((page.page_type(), serde_json::to_string_pretty(page)?))
            })
            .collect::<Result<Vec<_>>>()?;

        let total = rendered.len();
        let mut written: Vec<PathBuf> = Vec::with_capacity(total);
        for (page_type, content) in &rendered {
            let path = self.config.output_dir.join(page_type.filename());
            if let Err(e) = self.sink.write(&path, content) {
                self.roll_back(&written);
                return Err(e);
            }
            written.push(path);
        }

        let mut output_files = OutputFiles::new();
        let mut artifacts = Vec::with_capacity(total);
        for (i, ((page_type, content), path)) in rendered.iter().zip(written).enumerate() {
            let meta = ArtifactMeta::for_content(page_type.filename(), content);
            self.progress.artifact_written(&meta, i + 1, total);
            output_files.insert(page_type.as_str().to_string(), path);
            artifacts.push(meta);
        }

        Ok((output_files, artifacts))
    }

    /// Remove pages persisted earlier in a run whose later write failed.
    fn roll_back(&self, written: &[PathBuf]) {
        for path in written {
            match self.sink.remove(path) {
                Ok(()) => debug!(path = %path.display(), "rolled back partial output"),
                Err(e) => warn!(path = %path.display(), error = %e, "rollback failed"),
            }
        }
    }
}

fn stage_step<T>(step: &str, result: Result<T>) -> std::result::Result<T, String> {
    result.map_err(|e: PageGenError| format!("{step} failed: {e}"))
}

/// Assembles a [`Pipeline`] from swappable collaborators.
pub struct PipelineBuilder {
    config: PipelineConfig,
    clock: Arc<dyn Clock>,
    random: Option<Box<dyn RandomSource>>,
    sink: Box<dyn ArtifactSink>,
    progress: Arc<dyn ProgressReporter>,
}

impl PipelineBuilder {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            clock: Arc::new(SystemClock),
            random: None,
            sink: Box::new(FsSink),
            progress: Arc::new(SilentProgress),
        }
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Override the random source. Takes precedence over `config.seed`.
    pub fn random(mut self, random: Box<dyn RandomSource>) -> Self {
        self.random = Some(random);
        self
    }

    pub fn sink(mut self, sink: Box<dyn ArtifactSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn progress(mut self, progress: Arc<dyn ProgressReporter>) -> Self {
        self.progress = progress;
        self
    }

    pub fn build(self) -> Pipeline {
        let random = self.random.unwrap_or_else(|| match self.config.seed {
            Some(seed) => Box::new(SeededRandom::new(seed)),
            None => Box::new(ThreadRandom),
        });
        let clock = self.clock;

        Pipeline {
            parser: ParseStage::new(Arc::clone(&clock)),
            questions: QuestionStage::new(Arc::clone(&clock)),
            variant: VariantStage::new(Arc::clone(&clock), random),
            blocks: BlockStage::new(Arc::clone(&clock)),
            assembler: AssemblyStage::new(clock, self.config.assembly.clone()),
            sink: self.sink,
            progress: self.progress,
            state: RunState::default(),
            config: self.config,
        }
    }
}
