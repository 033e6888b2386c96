//! The three-phase generation pipeline: discover, synthesize runners, emit the
//! entry point. Each phase completes before the next one starts.

use crate::config::GeneratorConfig;
use crate::descriptor::DeclarationTree;
use crate::discovery::Discovery;
use crate::entry::{synthesize_entry_point, ENTRY_POINT_NAME};
use crate::error::Result;
use crate::names::QualifiedName;
use crate::report::GenerationReport;
use crate::runner::{GeneratedRunner, RunnerOutput, RunnerSynthesizer};

/// Generates runner and entry-point sources for one module.
///
/// # Example
///
/// ```rust,no_run
/// use benchsuite_gen::{GeneratorConfig, ModuleDescriptor, Platform, SuiteGenerator};
///
/// let module = ModuleDescriptor::load("build/module.json")?;
/// let config = GeneratorConfig::from_env()
///     .output_dir("build/generated")
///     .platform(Platform::Native);
///
/// let report = SuiteGenerator::new(&module, config).generate()?;
/// for label in report.labels() {
///     println!("{label}");
/// }
/// # Ok::<(), benchsuite_gen::GenerateError>(())
/// ```
pub struct SuiteGenerator<'m, T: DeclarationTree + ?Sized> {
    module: &'m T,
    config: GeneratorConfig,
}

impl<'m, T: DeclarationTree + ?Sized> SuiteGenerator<'m, T> {
    pub fn new(module: &'m T, config: GeneratorConfig) -> Self {
        Self { module, config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Discover benchmarks and name their runners without writing anything.
    pub fn plan(&self) -> Result<Vec<GeneratedRunner>> {
        let classes = Discovery::from_config(&self.config).run(self.module)?;
        Ok(classes.iter().map(GeneratedRunner::for_class).collect())
    }

    /// Run the full pipeline. Re-running against the same output directory
    /// overwrites earlier output.
    pub fn generate(&self) -> Result<GenerationReport> {
        let output = &self.config.output_dir;
        let platform = self.config.platform;

        let classes = Discovery::from_config(&self.config).run(self.module)?;

        let RunnerOutput {
            runners,
            roster,
            mut files,
        } = RunnerSynthesizer::new(platform.suite_type(), output).synthesize_all(&classes)?;

        let entry = synthesize_entry_point(platform, &self.config.main_package, &roster);
        files.push(entry.write_to(output)?);

        let report = GenerationReport {
            module: self.module.module_name().to_string(),
            platform,
            entry_point: QualifiedName::new(self.config.main_package.clone(), ENTRY_POINT_NAME),
            runners,
            files,
        };
        log::info!(
            "generated {} runner(s) with {} benchmark(s) for {} into {}",
            report.runners.len(),
            report.benchmark_count(),
            platform,
            output.display()
        );
        Ok(report)
    }
}

/// Generate harness sources for `module` with `config`.
pub fn generate<T: DeclarationTree + ?Sized>(
    module: &T,
    config: GeneratorConfig,
) -> Result<GenerationReport> {
    SuiteGenerator::new(module, config).generate()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BENCHMARK_ANNOTATION, STATE_ANNOTATION};
    use crate::descriptor::{ClassDescriptor, FunctionDescriptor, ModuleDescriptor, PackageFragment};
    use crate::error::GenerateError;
    use crate::names::PackagePath;

    fn module() -> ModuleDescriptor {
        ModuleDescriptor::new("app").fragment(
            PackageFragment::new(PackagePath::parse("pkg")).class(
                ClassDescriptor::new("pkg.Foo")
                    .annotated(STATE_ANNOTATION)
                    .function(FunctionDescriptor::new("bar").annotated(BENCHMARK_ANNOTATION)),
            ),
        )
    }

    #[test]
    fn should_plan_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        let module = module();
        let plan = SuiteGenerator::new(&module, GeneratorConfig::new().output_dir(&out))
            .plan()
            .unwrap();

        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].name.to_string(), "pkg.generated.Foo_runner");
        assert!(!out.exists());
    }

    #[test]
    fn should_write_entry_point_last() {
        let dir = tempfile::tempdir().unwrap();
        let report = generate(&module(), GeneratorConfig::new().output_dir(dir.path())).unwrap();

        assert_eq!(report.files.len(), 2);
        assert!(report.files[1].ends_with("BenchmarkSuite.kt"));
        assert_eq!(
            report.entry_point.to_string(),
            "org.jetbrains.gradle.benchmarks.generated.BenchmarkSuite"
        );
    }

    #[test]
    fn should_write_nothing_for_invalid_module() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        let err = generate(
            &ModuleDescriptor::new(""),
            GeneratorConfig::new().output_dir(&out),
        )
        .unwrap_err();

        assert!(matches!(err, GenerateError::InvalidModule(_)));
        assert!(!out.exists());
    }
}
