//! Generation stages and pipeline orchestration for pagegen.
//!
//! This crate turns one raw product record into FAQ, product and comparison
//! pages by sequencing the parse, question, variant, block and assembly
//! stages, and persisting the results through an [`ArtifactSink`].

pub mod assembler;
pub mod pages;
pub mod parser;
pub mod pipeline;
pub mod processor;
pub mod questions;
pub mod random;
pub mod sink;
pub mod stage;
pub mod variant;

pub use assembler::{AssemblyOptions, AssemblyRequest, AssemblyStage, DEFAULT_FAQ_LIMIT};
pub use pages::{ComparisonPage, FaqPage, Page, PageType, ProductPage};
pub use parser::ParseStage;
pub use pipeline::{
    GenerationResult, GenerationStats, OutputFiles, Pipeline, PipelineBuilder, PipelineConfig,
    ProgressReporter, SilentProgress, WorkflowStatus,
};
pub use processor::{BlockRequest, BlockStage};
pub use questions::QuestionStage;
pub use random::{RandomSource, SeededRandom, ThreadRandom};
pub use sink::{ArtifactMeta, ArtifactSink, FsSink, MemorySink};
pub use stage::{Outcome, Stage, StageInfo, StageStats};
pub use variant::VariantStage;
