//! Per-class runner synthesis.
//!
//! Each state class gets a `<Name>_runner` class in `<package>.generated` that
//! owns one instance of the original, forwards every benchmark method, and
//! registers them on a suite handle.

use crate::discovery::StateClass;
use crate::emit::{
    name_literal, CodeBlock, FileSpec, FunSpec, Modifier, PropertySpec, TypeName, TypeSpec,
};
use crate::error::Result;
use crate::names::QualifiedName;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Suffix appended to a state class name to form its runner name.
pub const RUNNER_SUFFIX: &str = "_runner";
/// Registration method exposed by every runner.
pub const ADD_TO_SUITE: &str = "addBenchmarkToSuite";
const INSTANCE_FIELD: &str = "_instance";
const SUITE_PARAM: &str = "suite";

/// One benchmark as registered on the suite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisteredBenchmark {
    pub method: String,
    pub label: String,
}

/// The generated wrapper for one [`StateClass`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedRunner {
    pub name: QualifiedName,
    pub origin: QualifiedName,
    pub benchmarks: Vec<RegisteredBenchmark>,
}

impl GeneratedRunner {
    pub fn for_class(class: &StateClass) -> Self {
        let name = QualifiedName::new(
            class.name.package().generated(),
            format!("{}{RUNNER_SUFFIX}", class.name.simple_name()),
        );
        let benchmarks = class
            .methods
            .iter()
            .map(|m| RegisteredBenchmark {
                method: m.name.clone(),
                label: m.label(),
            })
            .collect();
        Self {
            name,
            origin: class.name.clone(),
            benchmarks,
        }
    }

    /// Source unit declaring this runner, with `suite` typed as `suite_type`.
    pub fn file_spec(&self, suite_type: &TypeName) -> FileSpec {
        let instance = PropertySpec::builder(INSTANCE_FIELD, TypeName::Class(self.origin.clone()))
            .modifier(Modifier::Private)
            .initializer(CodeBlock::new().type_ref(&self.origin).text("()"));

        let mut class = TypeSpec::class_builder(self.name.simple_name()).property(instance);

        for bench in &self.benchmarks {
            let method = name_literal(&bench.method);
            class = class.function(
                FunSpec::builder(&bench.method).statement(format!("{INSTANCE_FIELD}.{method}()")),
            );
        }

        let register = self.benchmarks.iter().fold(
            FunSpec::builder(ADD_TO_SUITE).parameter(SUITE_PARAM, suite_type.clone()),
            |f, bench| {
                f.statement(
                    CodeBlock::new()
                        .text(format!("{SUITE_PARAM}.add("))
                        .string(&bench.label)
                        .text(format!(") {{ {}() }}", name_literal(&bench.method))),
                )
            },
        );
        class = class.function(register);

        FileSpec::builder(self.name.package().clone(), self.name.simple_name()).add_type(class)
    }
}

/// Ordered runner names, in discovery order. Built once by runner synthesis
/// and read by the entry point.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Roster {
    runners: Vec<QualifiedName>,
}

impl Roster {
    pub fn iter(&self) -> impl Iterator<Item = &QualifiedName> {
        self.runners.iter()
    }

    pub fn len(&self) -> usize {
        self.runners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runners.is_empty()
    }
}

impl FromIterator<QualifiedName> for Roster {
    fn from_iter<I: IntoIterator<Item = QualifiedName>>(iter: I) -> Self {
        Self {
            runners: iter.into_iter().collect(),
        }
    }
}

/// Result of the runner synthesis phase.
#[derive(Debug, Clone, Default)]
pub struct RunnerOutput {
    pub runners: Vec<GeneratedRunner>,
    pub roster: Roster,
    pub files: Vec<PathBuf>,
}

/// Emits one runner source per state class.
#[derive(Debug, Clone)]
pub struct RunnerSynthesizer<'a> {
    suite_type: TypeName,
    output: &'a Path,
}

impl<'a> RunnerSynthesizer<'a> {
    pub fn new(suite_type: TypeName, output: &'a Path) -> Self {
        Self { suite_type, output }
    }

    /// Build and write the runner for `class`.
    pub fn synthesize(&self, class: &StateClass) -> Result<(GeneratedRunner, PathBuf)> {
        let runner = GeneratedRunner::for_class(class);
        let path = runner.file_spec(&self.suite_type).write_to(self.output)?;
        log::debug!(
            "runner {} registers {} benchmark(s)",
            runner.name,
            runner.benchmarks.len()
        );
        Ok((runner, path))
    }

    /// Synthesize runners in order. The first write failure aborts; files
    /// already written stay on disk.
    pub fn synthesize_all(&self, classes: &[StateClass]) -> Result<RunnerOutput> {
        let mut runners = Vec::with_capacity(classes.len());
        let mut files = Vec::with_capacity(classes.len());
        for class in classes {
            let (runner, path) = self.synthesize(class)?;
            runners.push(runner);
            files.push(path);
        }
        let roster = runners.iter().map(|r| r.name.clone()).collect();
        Ok(RunnerOutput {
            runners,
            roster,
            files,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::BenchmarkMethod;
    use crate::error::GenerateError;
    use crate::platform::Platform;

    fn class(name: &str, methods: &[&str]) -> StateClass {
        let name = QualifiedName::parse(name);
        StateClass {
            methods: methods
                .iter()
                .map(|m| BenchmarkMethod {
                    name: m.to_string(),
                    owner: name.clone(),
                })
                .collect(),
            name,
        }
    }

    #[test]
    fn should_name_runner_after_original_package() {
        let runner = GeneratedRunner::for_class(&class("a.b.Foo", &["x"]));
        assert_eq!(runner.name.to_string(), "a.b.generated.Foo_runner");
        assert_eq!(runner.origin.to_string(), "a.b.Foo");
        assert_eq!(runner.benchmarks[0].label, "a.b.Foo.x");
    }

    #[test]
    fn should_place_root_package_runner_in_generated() {
        let runner = GeneratedRunner::for_class(&class("Top", &["t"]));
        assert_eq!(runner.name.to_string(), "generated.Top_runner");
        assert_eq!(runner.benchmarks[0].label, "Top.t");
    }

    #[test]
    fn should_render_native_runner() {
        let runner = GeneratedRunner::for_class(&class("pkg.Foo", &["bar", "baz"]));
        let source = runner.file_spec(&Platform::Native.suite_type()).render();

        let expected = "\
package pkg.generated

import org.jetbrains.gradle.benchmarks.native.Suite
import pkg.Foo

class Foo_runner {
    private val _instance: Foo = Foo()

    fun bar() {
        _instance.bar()
    }

    fun baz() {
        _instance.baz()
    }

    fun addBenchmarkToSuite(suite: Suite) {
        suite.add(\"pkg.Foo.bar\") { bar() }
        suite.add(\"pkg.Foo.baz\") { baz() }
    }
}
";
        assert_eq!(source, expected);
    }

    #[test]
    fn should_quote_keyword_package_and_method_names() {
        let runner = GeneratedRunner::for_class(&class("my.object.S", &["in"]));
        let source = runner.file_spec(&Platform::Native.suite_type()).render();

        assert!(source.starts_with("package my.`object`.generated\n"));
        assert!(source.contains("import my.`object`.S\n"));
        assert!(source.contains("    fun `in`() {\n        _instance.`in`()\n    }"));
        assert!(source.contains("suite.add(\"my.object.S.in\") { `in`() }"));
    }

    #[test]
    fn should_import_root_package_class_into_generated_runner() {
        let runner = GeneratedRunner::for_class(&class("Top", &["noop"]));
        let source = runner.file_spec(&Platform::Native.suite_type()).render();
        assert!(source.starts_with("package generated\n\nimport Top\nimport "));
        assert!(source.contains("private val _instance: Top = Top()"));
    }

    #[test]
    fn should_type_suite_as_dynamic_on_js() {
        let runner = GeneratedRunner::for_class(&class("pkg.Foo", &["bar"]));
        let source = runner.file_spec(&Platform::Js.suite_type()).render();
        assert!(source.contains("fun addBenchmarkToSuite(suite: dynamic) {"));
        assert!(!source.contains("native.Suite"));
    }

    #[test]
    fn should_emit_empty_registration_for_class_without_benchmarks() {
        let runner = GeneratedRunner::for_class(&class("pkg.Empty", &[]));
        let source = runner.file_spec(&Platform::Native.suite_type()).render();
        assert!(source.contains("    fun addBenchmarkToSuite(suite: Suite) {\n    }\n"));
    }

    #[test]
    fn should_write_runners_in_discovery_order() {
        let dir = tempfile::tempdir().unwrap();
        let classes = vec![class("b.X", &["one"]), class("a.X", &["two"])];
        let output = RunnerSynthesizer::new(Platform::Native.suite_type(), dir.path())
            .synthesize_all(&classes)
            .unwrap();

        let roster: Vec<_> = output.roster.iter().map(|n| n.to_string()).collect();
        assert_eq!(roster, vec!["b.generated.X_runner", "a.generated.X_runner"]);
        assert!(dir.path().join("a/generated/X_runner.kt").is_file());
        assert!(dir.path().join("b/generated/X_runner.kt").is_file());
        assert_eq!(output.files.len(), 2);
    }

    #[test]
    fn should_abort_on_first_write_failure() {
        let dir = tempfile::tempdir().unwrap();
        // A regular file where the `bad` package directory would go.
        std::fs::write(dir.path().join("bad"), "").unwrap();
        let classes = vec![
            class("good.A", &["a"]),
            class("bad.B", &["b"]),
            class("late.C", &["c"]),
        ];

        let err = RunnerSynthesizer::new(Platform::Native.suite_type(), dir.path())
            .synthesize_all(&classes)
            .unwrap_err();

        assert!(matches!(err, GenerateError::Emit { .. }));
        assert!(dir.path().join("good/generated/A_runner.kt").is_file());
        assert!(!dir.path().join("late").exists());
    }
}
