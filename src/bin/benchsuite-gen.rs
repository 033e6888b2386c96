//! benchsuite-gen: generate benchmark harness sources from a module description.
//!
//! The build tool dumps the compiled module's declaration tree as JSON and
//! invokes this binary with an output directory and a target platform:
//!
//! ```text
//! benchsuite-gen generate --module build/module.json --output build/generated --platform js
//! benchsuite-gen list --module build/module.json
//! ```

use anyhow::{Context, Result};
use benchsuite_gen::{GeneratorConfig, ModuleDescriptor, Platform, SuiteGenerator};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

// ============================================================================
// CLI Definition
// ============================================================================

#[derive(Debug, Parser)]
#[command(
    name = "benchsuite-gen",
    version,
    about = "Generate benchmark suite harness sources",
    long_about = "
benchsuite-gen scans a compiled module for classes annotated as benchmark
state, writes one <Name>_runner class per state class under
<package>.generated, and writes a BenchmarkSuite entry point that registers
every benchmark and runs the suite.

Example:
    benchsuite-gen generate -m module.json -o build/generated
    benchsuite-gen generate -m module.json -o build/generated --platform js
    benchsuite-gen list -m module.json --json
"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,

    /// Verbose output
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    /// Quiet mode (only errors)
    #[arg(long, short = 'q', global = true)]
    quiet: bool,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Write runner and entry-point sources
    Generate(GenerateArgs),
    /// Print discovered benchmarks without writing anything
    List(ListArgs),
}

#[derive(Debug, Args)]
struct ModuleArgs {
    /// JSON description of the module's declaration tree
    #[arg(long, short = 'm')]
    module: PathBuf,

    /// Fully qualified state annotation
    #[arg(long)]
    state_annotation: Option<String>,

    /// Fully qualified benchmark annotation
    #[arg(long)]
    benchmark_annotation: Option<String>,

    /// Fail on state classes without a zero-argument constructor,
    /// benchmarks with parameters, or duplicate class names
    #[arg(long)]
    strict: bool,
}

#[derive(Debug, Args)]
struct GenerateArgs {
    #[command(flatten)]
    module: ModuleArgs,

    /// Output directory for generated sources
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// Target platform
    #[arg(long, short = 'p', value_enum)]
    platform: Option<Platform>,

    /// Also write a JSON report of the run to this file
    #[arg(long)]
    report: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct ListArgs {
    #[command(flatten)]
    module: ModuleArgs,

    /// Print runners and labels as JSON
    #[arg(long)]
    json: bool,
}

// ============================================================================
// Verbosity Control
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verbosity {
    Quiet,
    Normal,
    Verbose,
}

impl Verbosity {
    fn from_cli(cli: &Cli) -> Self {
        if cli.quiet {
            Verbosity::Quiet
        } else if cli.verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        }
    }

    fn default_filter(self) -> &'static str {
        match self {
            Verbosity::Quiet => "error",
            Verbosity::Normal => "info",
            Verbosity::Verbose => "debug",
        }
    }
}

/// `RUST_LOG` wins over `-v`/`-q`.
fn init_logging(verbosity: Verbosity) {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(verbosity.default_filter()),
    )
    .format_timestamp(None)
    .format_target(false)
    .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(Verbosity::from_cli(&cli));

    match cli.cmd {
        Commands::Generate(args) => run_generate(args),
        Commands::List(args) => run_list(args),
    }
}

/// Environment first, then flags on top.
fn build_config(args: &ModuleArgs) -> GeneratorConfig {
    let mut config = GeneratorConfig::from_env();
    if let Some(ref fqn) = args.state_annotation {
        config = config.state_annotation(fqn.clone());
    }
    if let Some(ref fqn) = args.benchmark_annotation {
        config = config.benchmark_annotation(fqn.clone());
    }
    if args.strict {
        config = config.strict(true);
    }
    config
}

fn load_module(args: &ModuleArgs) -> Result<ModuleDescriptor> {
    ModuleDescriptor::load(&args.module)
        .with_context(|| format!("Failed to load module description {}", args.module.display()))
}

fn run_generate(args: GenerateArgs) -> Result<()> {
    let mut config = build_config(&args.module);
    if let Some(output) = args.output {
        config = config.output_dir(output);
    }
    if let Some(platform) = args.platform {
        config = config.platform(platform);
    }

    let module = load_module(&args.module)?;
    let report = SuiteGenerator::new(&module, config)
        .generate()
        .context("Suite generation failed")?;

    if let Some(path) = args.report {
        report
            .write_json(&path)
            .with_context(|| format!("Failed to write report {}", path.display()))?;
    }

    for file in &report.files {
        log::debug!("  {}", file.display());
    }
    Ok(())
}

fn run_list(args: ListArgs) -> Result<()> {
    let config = build_config(&args.module);
    let module = load_module(&args.module)?;
    let runners = SuiteGenerator::new(&module, config)
        .plan()
        .context("Benchmark discovery failed")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&runners)?);
        return Ok(());
    }

    if runners.is_empty() {
        log::warn!("No state classes found in module `{}`", module.name);
        return Ok(());
    }
    for runner in &runners {
        for bench in &runner.benchmarks {
            println!("{}", bench.label);
        }
    }
    Ok(())
}
