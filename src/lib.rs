//! # benchsuite-gen
//!
//! Build-time generator for benchmark harness sources.
//!
//! Given a compiled module's declaration tree, it finds every class annotated
//! as benchmark state, wraps each one in a generated `<Name>_runner` class, and
//! emits a `BenchmarkSuite` entry point that registers every benchmark on a
//! platform suite and runs it. The output is Kotlin source meant to be
//! compiled by the downstream toolchain; nothing is executed here.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use benchsuite_gen::{generate, GeneratorConfig, ModuleDescriptor, Platform};
//!
//! let module = ModuleDescriptor::load("build/module.json")?;
//! let report = generate(
//!     &module,
//!     GeneratorConfig::new()
//!         .output_dir("build/generated")
//!         .platform(Platform::Js),
//! )?;
//! println!("{} benchmarks", report.benchmark_count());
//! # Ok::<(), benchsuite_gen::GenerateError>(())
//! ```
//!
//! ## Platforms
//!
//! - **`native`**: `main` builds the statically known in-process `Suite`.
//! - **`js`**: `main` loads the `benchmark` library through `require`, runs it,
//!   and prints the suite results as JSON on standard output.

mod config;
mod descriptor;
mod discovery;
mod emit;
mod entry;
mod error;
mod generator;
mod names;
mod platform;
mod report;
mod runner;

pub use config::{GeneratorConfig, BENCHMARK_ANNOTATION, MAIN_PACKAGE, STATE_ANNOTATION};
pub use descriptor::{
    ClassDescriptor, DeclarationTree, FunctionDescriptor, ModuleDescriptor, PackageFragment,
};
pub use discovery::{discover, AnnotationFilter, BenchmarkMethod, Discovery, StateClass};
pub use emit::{
    name_literal, CodeBlock, FileSpec, FunSpec, Modifier, PropertySpec, TypeName, TypeSpec,
};
pub use entry::{synthesize_entry_point, ENTRY_POINT_NAME};
pub use error::{GenerateError, Result};
pub use generator::{generate, SuiteGenerator};
pub use names::{PackagePath, QualifiedName};
pub use platform::Platform;
pub use report::GenerationReport;
pub use runner::{
    GeneratedRunner, RegisteredBenchmark, Roster, RunnerOutput, RunnerSynthesizer, ADD_TO_SUITE,
    RUNNER_SUFFIX,
};
