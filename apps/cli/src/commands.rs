//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use pagegen_core::{
    ArtifactMeta, GenerationResult, Pipeline, PipelineConfig, ProgressReporter,
};
use pagegen_shared::{AppConfig, RawProductRecord, init_config, load_config, load_config_from};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// pagegen: generate product content pages from a raw record.
#[derive(Parser)]
#[command(
    name = "pagegen",
    version,
    about = "Generate FAQ, product and comparison pages from a raw product record.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of ~/.pagegen/pagegen.toml.
    #[arg(long, env = "PAGEGEN_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Run the full pipeline and write the three page documents.
    Generate {
        /// Raw product JSON file (defaults to `defaults.input`).
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output directory (defaults to `defaults.output_dir`).
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Seed for the comparison variant, for reproducible output.
        #[arg(long)]
        seed: Option<u64>,

        /// Maximum number of FAQ entries.
        #[arg(long)]
        faq_limit: Option<usize>,

        /// Print the run result as JSON instead of a summary.
        #[arg(long)]
        json: bool,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "pagegen=info",
        1 => "pagegen=debug",
        _ => "pagegen=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();
    match cli.command {
        Command::Generate {
            input,
            output_dir,
            seed,
            faq_limit,
            json,
        } => {
            let mut config = resolve_config(config_path)?;
            if let Some(dir) = output_dir {
                config.defaults.output_dir = dir.to_string_lossy().into_owned();
            }
            if let Some(limit) = faq_limit {
                config.generation.faq_limit = limit;
            }
            if seed.is_some() {
                config.generation.seed = seed;
            }
            config.validate()?;

            let input = input.unwrap_or_else(|| PathBuf::from(&config.defaults.input));
            cmd_generate(&input, &config, json)
        }
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(config_path),
        },
    }
}

fn resolve_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = match path {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };
    Ok(config)
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_generate(input: &Path, config: &AppConfig, json: bool) -> Result<()> {
    let raw = read_record(input)?;
    let pipeline_config = PipelineConfig::from_app_config(config);

    info!(
        input = %input.display(),
        output_dir = %pipeline_config.output_dir.display(),
        seed = ?pipeline_config.seed,
        "generating pages"
    );

    let reporter: Arc<dyn ProgressReporter> = if json {
        Arc::new(pagegen_core::SilentProgress)
    } else {
        Arc::new(CliProgress::new()?)
    };
    let mut pipeline = Pipeline::builder(pipeline_config).progress(reporter).build();
    let result = pipeline.generate_all_pages(&raw);

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else if result.success {
        print_summary(&result);
    }

    if !result.success {
        let error = result.error.unwrap_or_default();
        return Err(eyre!("generation failed: {error}"));
    }
    Ok(())
}

fn read_record(path: &Path) -> Result<RawProductRecord> {
    if !path.exists() {
        return Err(eyre!("input file not found: {}", path.display()));
    }
    let text = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read {}", path.display()))?;
    RawProductRecord::from_json(&text).wrap_err_with(|| format!("invalid input {}", path.display()))
}

fn print_summary(result: &GenerationResult) {
    println!();
    println!("  Pages generated successfully!");
    if let Some(stats) = &result.statistics {
        println!("  Product:    {}", stats.product_name);
        println!("  Compared:   {}", stats.comparison_product);
        println!("  Questions:  {}", stats.total_questions);
    }
    if let Some(files) = &result.output_files {
        for (page, path) in files {
            println!("  {page:<11} {}", path.display());
        }
    }
    println!("  Time:       {:.1}s", result.elapsed_ms as f64 / 1000.0);
    println!();
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Result<Self> {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")?
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Ok(Self { spinner })
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn artifact_written(&self, meta: &ArtifactMeta, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Writing [{current}/{total}] {}", meta.filename));
    }

    fn done(&self, _result: &GenerationResult) {
        self.spinner.finish_and_clear();
    }
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(path: Option<&Path>) -> Result<()> {
    let config = resolve_config(path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}
