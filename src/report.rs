//! Summary of a generation run.

use crate::names::QualifiedName;
use crate::platform::Platform;
use crate::runner::GeneratedRunner;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// What a generation run produced.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    pub module: String,
    pub platform: Platform,
    pub entry_point: QualifiedName,
    /// In roster order.
    pub runners: Vec<GeneratedRunner>,
    /// Every file written, runners first, entry point last.
    pub files: Vec<PathBuf>,
}

impl GenerationReport {
    /// Registration labels in the order the suite will run them.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.runners
            .iter()
            .flat_map(|r| r.benchmarks.iter().map(|b| b.label.as_str()))
    }

    pub fn benchmark_count(&self) -> usize {
        self.runners.iter().map(|r| r.benchmarks.len()).sum()
    }

    /// Write the report as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let path = path.as_ref();
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)?;
        log::info!("report written to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::RegisteredBenchmark;

    fn report() -> GenerationReport {
        let runner = |name: &str, origin: &str, methods: &[&str]| GeneratedRunner {
            name: QualifiedName::parse(name),
            origin: QualifiedName::parse(origin),
            benchmarks: methods
                .iter()
                .map(|m| RegisteredBenchmark {
                    method: m.to_string(),
                    label: format!("{origin}.{m}"),
                })
                .collect(),
        };
        GenerationReport {
            module: "app".into(),
            platform: Platform::Js,
            entry_point: QualifiedName::parse("main.BenchmarkSuite"),
            runners: vec![
                runner("b.generated.B_runner", "b.B", &["one", "two"]),
                runner("a.generated.A_runner", "a.A", &["three"]),
            ],
            files: vec![],
        }
    }

    #[test]
    fn should_list_labels_in_roster_order() {
        let r = report();
        let labels: Vec<_> = r.labels().collect();
        assert_eq!(labels, vec!["b.B.one", "b.B.two", "a.A.three"]);
        assert_eq!(r.benchmark_count(), 3);
    }

    #[test]
    fn should_write_pretty_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("report.json");
        report().write_json(&path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["platform"], "js");
        assert_eq!(value["entry_point"], "main.BenchmarkSuite");
        assert_eq!(value["runners"][0]["name"], "b.generated.B_runner");
        assert_eq!(value["runners"][0]["benchmarks"][1]["label"], "b.B.two");
    }
}
