//! Read-only view of a compiled module's declaration tree.
//!
//! The generator only ever queries the tree through [`DeclarationTree`]. The
//! bundled [`ModuleDescriptor`] implements it over a JSON description emitted
//! by the compiler front-end:
//!
//! ```json
//! {
//!   "name": "app",
//!   "packages": [
//!     {
//!       "package": "pkg",
//!       "classes": [
//!         {
//!           "name": "pkg.Foo",
//!           "annotations": ["org.jetbrains.gradle.benchmarks.State"],
//!           "functions": [
//!             { "name": "bar", "annotations": ["org.jetbrains.gradle.benchmarks.Benchmark"] }
//!           ]
//!         }
//!       ]
//!     },
//!     { "package": "lib", "module": "dependency", "classes": [] }
//!   ]
//! }
//! ```

use crate::error::{GenerateError, Result};
use crate::names::{is_identifier, PackagePath, QualifiedName};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

/// Queries the generator needs from a module's declaration tree.
pub trait DeclarationTree {
    /// Name of the module being scanned.
    fn module_name(&self) -> &str;

    /// Fail with [`GenerateError::InvalidModule`] if the tree cannot be walked.
    fn validate(&self) -> Result<()>;

    /// Package fragments declaring members of `package`, including fragments
    /// contributed by other modules.
    fn fragments(&self, package: &PackagePath) -> Vec<&PackageFragment>;

    /// Direct sub-packages of `package`.
    fn sub_packages(&self, package: &PackagePath) -> Vec<PackagePath>;
}

/// Members of one package contributed by a single module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageFragment {
    #[serde(default)]
    pub package: PackagePath,
    /// Owning module. `None` means the module being described.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    #[serde(default)]
    pub classes: Vec<ClassDescriptor>,
}

impl PackageFragment {
    pub fn new(package: PackagePath) -> Self {
        Self {
            package,
            module: None,
            classes: Vec::new(),
        }
    }

    pub fn owned_by(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    pub fn class(mut self, class: ClassDescriptor) -> Self {
        self.classes.push(class);
        self
    }

    pub fn belongs_to(&self, module: &str) -> bool {
        self.module.as_deref().map_or(true, |m| m == module)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDescriptor {
    pub name: QualifiedName,
    /// Fully qualified annotation identifiers.
    #[serde(default)]
    pub annotations: Vec<String>,
    #[serde(default)]
    pub functions: Vec<FunctionDescriptor>,
    #[serde(default = "default_true")]
    pub has_no_arg_constructor: bool,
}

impl ClassDescriptor {
    pub fn new(name: &str) -> Self {
        Self {
            name: QualifiedName::parse(name),
            annotations: Vec::new(),
            functions: Vec::new(),
            has_no_arg_constructor: true,
        }
    }

    pub fn annotated(mut self, annotation: impl Into<String>) -> Self {
        self.annotations.push(annotation.into());
        self
    }

    pub fn function(mut self, function: FunctionDescriptor) -> Self {
        self.functions.push(function);
        self
    }

    pub fn without_no_arg_constructor(mut self) -> Self {
        self.has_no_arg_constructor = false;
        self
    }

    /// Exact identifier match, no subtyping.
    pub fn has_annotation(&self, fqn: &str) -> bool {
        self.annotations.iter().any(|a| a == fqn)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionDescriptor {
    pub name: String,
    #[serde(default)]
    pub annotations: Vec<String>,
    /// Number of declared value parameters.
    #[serde(default)]
    pub parameters: usize,
}

impl FunctionDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            annotations: Vec::new(),
            parameters: 0,
        }
    }

    pub fn annotated(mut self, annotation: impl Into<String>) -> Self {
        self.annotations.push(annotation.into());
        self
    }

    pub fn parameters(mut self, n: usize) -> Self {
        self.parameters = n;
        self
    }

    pub fn has_annotation(&self, fqn: &str) -> bool {
        self.annotations.iter().any(|a| a == fqn)
    }
}

fn default_true() -> bool {
    true
}

/// In-memory declaration tree, usually deserialized from JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleDescriptor {
    pub name: String,
    #[serde(default)]
    pub packages: Vec<PackageFragment>,
}

impl ModuleDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            packages: Vec::new(),
        }
    }

    pub fn fragment(mut self, fragment: PackageFragment) -> Self {
        self.packages.push(fragment);
        self
    }

    /// Load a module description from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| GenerateError::ModuleLoad {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl DeclarationTree for ModuleDescriptor {
    fn module_name(&self) -> &str {
        &self.name
    }

    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(GenerateError::InvalidModule("module name is empty".into()));
        }
        for fragment in &self.packages {
            if let Some(bad) = fragment.package.segments().iter().find(|s| !is_identifier(s)) {
                return Err(GenerateError::InvalidModule(format!(
                    "package `{}` has invalid segment `{}`",
                    fragment.package, bad
                )));
            }
            for class in &fragment.classes {
                if class.name.package() != &fragment.package {
                    return Err(GenerateError::InvalidModule(format!(
                        "class `{}` is listed under package `{}`",
                        class.name, fragment.package
                    )));
                }
                if !is_identifier(class.name.simple_name()) {
                    return Err(GenerateError::InvalidModule(format!(
                        "class `{}` has an invalid name",
                        class.name
                    )));
                }
            }
        }
        Ok(())
    }

    fn fragments(&self, package: &PackagePath) -> Vec<&PackageFragment> {
        self.packages
            .iter()
            .filter(|f| &f.package == package)
            .collect()
    }

    fn sub_packages(&self, package: &PackagePath) -> Vec<PackagePath> {
        // Intermediate packages with no fragment of their own still count.
        let children: BTreeSet<PackagePath> = self
            .packages
            .iter()
            .filter(|f| f.package.depth() > package.depth() && f.package.starts_with(package))
            .map(|f| package.child(f.package.segments()[package.depth()].clone()))
            .collect();
        children.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_derive_intermediate_sub_packages() {
        let module = ModuleDescriptor::new("m")
            .fragment(PackageFragment::new(PackagePath::parse("a.b.c")))
            .fragment(PackageFragment::new(PackagePath::parse("a.d")))
            .fragment(PackageFragment::new(PackagePath::parse("z")));

        let roots = module.sub_packages(&PackagePath::root());
        assert_eq!(roots, vec![PackagePath::parse("a"), PackagePath::parse("z")]);

        let under_a = module.sub_packages(&PackagePath::parse("a"));
        assert_eq!(under_a, vec![PackagePath::parse("a.b"), PackagePath::parse("a.d")]);

        assert!(module.sub_packages(&PackagePath::parse("a.b.c")).is_empty());
    }

    #[test]
    fn should_decode_json_with_defaults() {
        let json = r#"{
            "name": "app",
            "packages": [
                { "package": "pkg", "classes": [
                    { "name": "pkg.Foo", "functions": [ { "name": "bar" } ] }
                ]},
                { "package": "lib", "module": "dep" }
            ]
        }"#;
        let module = ModuleDescriptor::from_json(json).unwrap();
        assert_eq!(module.name, "app");
        let foo = &module.packages[0].classes[0];
        assert!(foo.has_no_arg_constructor);
        assert!(foo.annotations.is_empty());
        assert_eq!(foo.functions[0].parameters, 0);
        assert!(module.packages[0].belongs_to("app"));
        assert!(!module.packages[1].belongs_to("app"));
    }

    #[test]
    fn should_reject_malformed_json() {
        let err = ModuleDescriptor::from_json("{ not json").unwrap_err();
        assert!(matches!(err, GenerateError::ModuleDecode(_)));
    }

    #[test]
    fn should_reject_empty_module_name() {
        let err = ModuleDescriptor::new(" ").validate().unwrap_err();
        assert!(matches!(err, GenerateError::InvalidModule(_)));
    }

    #[test]
    fn should_reject_class_outside_its_fragment_package() {
        let module = ModuleDescriptor::new("m").fragment(
            PackageFragment::new(PackagePath::parse("a")).class(ClassDescriptor::new("b.Foo")),
        );
        let err = module.validate().unwrap_err();
        assert!(err.to_string().contains("b.Foo"));
    }

    #[test]
    fn should_reject_invalid_package_segment() {
        let module =
            ModuleDescriptor::new("m").fragment(PackageFragment::new(PackagePath::parse("a..b")));
        assert!(matches!(
            module.validate(),
            Err(GenerateError::InvalidModule(_))
        ));
    }

    #[test]
    fn should_accept_functions_with_quoted_names() {
        use crate::config::{BENCHMARK_ANNOTATION, STATE_ANNOTATION};

        let module = ModuleDescriptor::new("m").fragment(
            PackageFragment::new(PackagePath::parse("p"))
                .class(
                    ClassDescriptor::new("p.S")
                        .annotated(STATE_ANNOTATION)
                        .function(FunctionDescriptor::new("bar").annotated(BENCHMARK_ANNOTATION)),
                )
                .class(
                    ClassDescriptor::new("p.Tests")
                        .function(FunctionDescriptor::new("adds two numbers")),
                ),
        );
        module.validate().unwrap();

        let found = crate::discovery::discover(&module).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name.to_string(), "p.S");
        assert_eq!(found[0].methods[0].label(), "p.S.bar");
    }

    #[test]
    fn should_report_missing_file_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        let err = ModuleDescriptor::load(&missing).unwrap_err();
        match err {
            GenerateError::ModuleLoad { path, .. } => assert_eq!(path, missing),
            other => panic!("unexpected error: {other}"),
        }
    }
}
