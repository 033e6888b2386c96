//! Configuration for a generation run.

use crate::names::PackagePath;
use crate::platform::Platform;
use std::path::PathBuf;

/// Annotation marking benchmark state holders.
pub const STATE_ANNOTATION: &str = "org.jetbrains.gradle.benchmarks.State";
/// Annotation marking benchmark methods inside a state class.
pub const BENCHMARK_ANNOTATION: &str = "org.jetbrains.gradle.benchmarks.Benchmark";
/// Package holding the generated suite entry point.
pub const MAIN_PACKAGE: &str = "org.jetbrains.gradle.benchmarks.generated";

/// Configuration for the suite generator.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Root directory generated sources are written under.
    pub output_dir: PathBuf,
    /// Entry-point shape to emit.
    pub platform: Platform,
    /// Fully qualified name of the state annotation.
    pub state_annotation: String,
    /// Fully qualified name of the benchmark annotation.
    pub benchmark_annotation: String,
    /// Package of the generated `BenchmarkSuite` entry point.
    pub main_package: PackagePath,
    /// Reject state classes that would not compile once wrapped.
    pub strict: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("build/benchmarks/generated"),
            platform: Platform::default(),
            state_annotation: STATE_ANNOTATION.to_string(),
            benchmark_annotation: BENCHMARK_ANNOTATION.to_string(),
            main_package: PackagePath::parse(MAIN_PACKAGE),
            strict: false,
        }
    }
}

impl GeneratorConfig {
    /// Create a new config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse config from environment variables.
    ///
    /// Supported variables:
    /// - `BENCHGEN_OUTPUT_DIR`: output directory
    /// - `BENCHGEN_PLATFORM`: `js` or `native` (default: native)
    /// - `BENCHGEN_STRICT`: enable contract checks (default: false)
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var("BENCHGEN_OUTPUT_DIR") {
            cfg.output_dir = PathBuf::from(v);
        }
        if let Ok(v) = std::env::var("BENCHGEN_PLATFORM") {
            match v.parse() {
                Ok(p) => cfg.platform = p,
                Err(e) => log::warn!("ignoring BENCHGEN_PLATFORM: {e}"),
            }
        }
        if let Ok(v) = std::env::var("BENCHGEN_STRICT") {
            cfg.strict = v == "1" || v.eq_ignore_ascii_case("true");
        }

        cfg
    }

    /// Set the output directory.
    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = path.into();
        self
    }

    /// Set the target platform.
    pub fn platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Override the state annotation identifier.
    pub fn state_annotation(mut self, fqn: impl Into<String>) -> Self {
        self.state_annotation = fqn.into();
        self
    }

    /// Override the benchmark annotation identifier.
    pub fn benchmark_annotation(mut self, fqn: impl Into<String>) -> Self {
        self.benchmark_annotation = fqn.into();
        self
    }

    pub fn main_package(mut self, package: PackagePath) -> Self {
        self.main_package = package;
        self
    }

    /// Enable or disable contract checks.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}
