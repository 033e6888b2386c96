//! Dotted package paths and qualified declaration names.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Segment appended to a package to form the package of its generated runners.
pub const GENERATED_SEGMENT: &str = "generated";

/// An ordered sequence of package name segments. The root package is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct PackagePath {
    segments: Vec<String>,
}

impl PackagePath {
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse a dotted path. The empty string is the root package.
    pub fn parse(dotted: &str) -> Self {
        let segments = if dotted.is_empty() {
            Vec::new()
        } else {
            dotted.split('.').map(str::to_string).collect()
        };
        Self { segments }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of segments; zero for the root package.
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Self { segments }
    }

    pub fn parent(&self) -> Option<Self> {
        let (_, rest) = self.segments.split_last()?;
        Some(Self {
            segments: rest.to_vec(),
        })
    }

    /// `<self>.generated`; for the root package this is just `generated`.
    pub fn generated(&self) -> Self {
        self.child(GENERATED_SEGMENT)
    }

    /// True when `self` is `other` or nested somewhere below it.
    pub fn starts_with(&self, other: &PackagePath) -> bool {
        self.segments.starts_with(&other.segments)
    }

    /// Relative directory for sources in this package.
    pub fn to_dir(&self) -> PathBuf {
        self.segments.iter().collect()
    }
}

impl fmt::Display for PackagePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

impl From<String> for PackagePath {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<PackagePath> for String {
    fn from(p: PackagePath) -> Self {
        p.to_string()
    }
}

/// Package plus simple name, e.g. `pkg.Foo`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct QualifiedName {
    package: PackagePath,
    name: String,
}

impl QualifiedName {
    pub fn new(package: PackagePath, name: impl Into<String>) -> Self {
        Self {
            package,
            name: name.into(),
        }
    }

    /// Split on the last dot: everything before it is the package.
    pub fn parse(dotted: &str) -> Self {
        match dotted.rsplit_once('.') {
            Some((package, name)) => Self::new(PackagePath::parse(package), name),
            None => Self::new(PackagePath::root(), dotted),
        }
    }

    pub fn package(&self) -> &PackagePath {
        &self.package
    }

    pub fn simple_name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.package.is_root() {
            f.write_str(&self.name)
        } else {
            write!(f, "{}.{}", self.package, self.name)
        }
    }
}

impl From<String> for QualifiedName {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<QualifiedName> for String {
    fn from(q: QualifiedName) -> Self {
        q.to_string()
    }
}

/// Plain identifier: a letter or `_`, then letters, digits or `_`.
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}
