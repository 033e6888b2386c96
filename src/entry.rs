//! Suite entry point synthesis.
//!
//! The only platform-dependent stage: the roster is turned into a single
//! `BenchmarkSuite` file whose `main` builds a suite, registers every runner in
//! roster order, and runs it.

use crate::emit::{CodeBlock, FileSpec, FunSpec, Modifier, TypeName};
use crate::names::{PackagePath, QualifiedName};
use crate::platform::{Platform, JS_BENCHMARK_MODULE, JS_SUITE_JSON, NATIVE_SUITE};
use crate::runner::{Roster, ADD_TO_SUITE};

/// Simple name of the generated entry-point file.
pub const ENTRY_POINT_NAME: &str = "BenchmarkSuite";

/// Build the entry-point source unit for `platform`.
pub fn synthesize_entry_point(
    platform: Platform,
    package: &PackagePath,
    roster: &Roster,
) -> FileSpec {
    let file = FileSpec::builder(package.clone(), ENTRY_POINT_NAME);
    match platform {
        Platform::Native => file.add_function(native_main(roster)),
        Platform::Js => {
            let require = FunSpec::builder("require")
                .modifier(Modifier::External)
                .parameter("module", TypeName::String)
                .returns(TypeName::Dynamic);
            file.add_import(QualifiedName::parse(JS_SUITE_JSON))
                .add_function(require)
                .add_function(js_main(roster))
        }
    }
}

fn native_main(roster: &Roster) -> FunSpec {
    let main = FunSpec::builder("main").statement(
        CodeBlock::new()
            .text("val suite = ")
            .type_ref(&QualifiedName::parse(NATIVE_SUITE))
            .text("()"),
    );
    register_all(main, roster).statement("suite.run()")
}

fn js_main(roster: &Roster) -> FunSpec {
    let serializer = QualifiedName::parse(JS_SUITE_JSON);
    let main = FunSpec::builder("main")
        .statement(
            CodeBlock::new()
                .text("val benchmarkjs = require(")
                .string(JS_BENCHMARK_MODULE)
                .text(")"),
        )
        .statement("val suite = benchmarkjs.Suite()");
    register_all(main, roster)
        .statement("suite.run()")
        .statement(format!("println({}(suite))", serializer.simple_name()))
}

fn register_all(main: FunSpec, roster: &Roster) -> FunSpec {
    roster.iter().fold(main, |f, runner| {
        f.statement(
            CodeBlock::new()
                .type_ref(runner)
                .text(format!("().{ADD_TO_SUITE}(suite)")),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MAIN_PACKAGE;

    fn roster(names: &[&str]) -> Roster {
        names.iter().map(|n| QualifiedName::parse(n)).collect()
    }

    fn main_package() -> PackagePath {
        PackagePath::parse(MAIN_PACKAGE)
    }

    #[test]
    fn should_render_native_main() {
        let file = synthesize_entry_point(
            Platform::Native,
            &main_package(),
            &roster(&["pkg.generated.Foo_runner"]),
        );
        let expected = "\
package org.jetbrains.gradle.benchmarks.generated

import org.jetbrains.gradle.benchmarks.native.Suite
import pkg.generated.Foo_runner

fun main() {
    val suite = Suite()
    Foo_runner().addBenchmarkToSuite(suite)
    suite.run()
}
";
        assert_eq!(file.render(), expected);
        assert_eq!(
            file.relative_path(),
            main_package().to_dir().join("BenchmarkSuite.kt")
        );
    }

    #[test]
    fn should_render_js_main_with_require_and_json_output() {
        let file = synthesize_entry_point(
            Platform::Js,
            &main_package(),
            &roster(&["pkg.generated.Foo_runner"]),
        );
        let expected = "\
package org.jetbrains.gradle.benchmarks.generated

import org.jetbrains.gradle.benchmarks.js.suiteJson
import pkg.generated.Foo_runner

external fun require(module: String): dynamic

fun main() {
    val benchmarkjs = require(\"benchmark\")
    val suite = benchmarkjs.Suite()
    Foo_runner().addBenchmarkToSuite(suite)
    suite.run()
    println(suiteJson(suite))
}
";
        assert_eq!(file.render(), expected);
    }

    #[test]
    fn should_register_runners_in_roster_order() {
        let file = synthesize_entry_point(
            Platform::Native,
            &main_package(),
            &roster(&["z.generated.Z_runner", "a.generated.A_runner", "m.generated.M_runner"]),
        );
        let source = file.render();
        let z = source.find("Z_runner()").unwrap();
        let a = source.find("A_runner()").unwrap();
        let m = source.find("M_runner()").unwrap();
        assert!(z < a && a < m);
    }

    #[test]
    fn should_run_empty_suite_when_roster_is_empty() {
        let source =
            synthesize_entry_point(Platform::Native, &main_package(), &Roster::default()).render();
        assert!(source.contains("fun main() {\n    val suite = Suite()\n    suite.run()\n}\n"));
        assert!(!source.contains(ADD_TO_SUITE));
    }

    #[test]
    fn should_qualify_runners_sharing_a_simple_name() {
        let source = synthesize_entry_point(
            Platform::Native,
            &main_package(),
            &roster(&["a.generated.X_runner", "b.generated.X_runner"]),
        )
        .render();
        assert!(source.contains("    a.generated.X_runner().addBenchmarkToSuite(suite)\n"));
        assert!(source.contains("    b.generated.X_runner().addBenchmarkToSuite(suite)\n"));
    }
}
