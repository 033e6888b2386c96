//! Target platforms for the generated suite entry point.

use crate::emit::TypeName;
use crate::names::QualifiedName;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Suite type used by the in-process native runtime.
pub const NATIVE_SUITE: &str = "org.jetbrains.gradle.benchmarks.native.Suite";

/// Module name passed to `require` on the JS host.
pub const JS_BENCHMARK_MODULE: &str = "benchmark";

/// Helper that turns a finished JS suite into a JSON document.
pub const JS_SUITE_JSON: &str = "org.jetbrains.gradle.benchmarks.js.suiteJson";

/// Which shape of `main` to emit. Fixed for a whole generation run.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Suite provided by an external benchmarking library loaded at runtime.
    Js,
    /// Statically known suite type, run in-process.
    #[default]
    Native,
}

impl Platform {
    /// Type of the `suite` parameter on generated `addBenchmarkToSuite` methods.
    pub fn suite_type(self) -> TypeName {
        match self {
            Platform::Js => TypeName::Dynamic,
            Platform::Native => TypeName::Class(QualifiedName::parse(NATIVE_SUITE)),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Js => "js",
            Platform::Native => "native",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "js" => Ok(Platform::Js),
            "native" => Ok(Platform::Native),
            other => Err(format!("unknown platform `{other}` (expected `js` or `native`)")),
        }
    }
}
