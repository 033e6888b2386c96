//! Benchmark discovery over a module's declaration tree.

use crate::config::{GeneratorConfig, BENCHMARK_ANNOTATION, STATE_ANNOTATION};
use crate::descriptor::{ClassDescriptor, DeclarationTree, FunctionDescriptor};
use crate::error::{GenerateError, Result};
use crate::names::{PackagePath, QualifiedName};
use serde::Serialize;
use std::collections::HashSet;

/// Selects state classes and their benchmark methods by annotation identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationFilter {
    state: String,
    benchmark: String,
}

impl Default for AnnotationFilter {
    fn default() -> Self {
        Self::new(STATE_ANNOTATION, BENCHMARK_ANNOTATION)
    }
}

impl AnnotationFilter {
    pub fn new(state: impl Into<String>, benchmark: impl Into<String>) -> Self {
        Self {
            state: state.into(),
            benchmark: benchmark.into(),
        }
    }

    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self::new(&config.state_annotation, &config.benchmark_annotation)
    }

    pub fn is_state_class(&self, class: &ClassDescriptor) -> bool {
        class.has_annotation(&self.state)
    }

    pub fn is_benchmark(&self, function: &FunctionDescriptor) -> bool {
        function.has_annotation(&self.benchmark)
    }

    /// Benchmark methods of `class`, in declaration order.
    pub fn benchmark_methods<'c>(
        &'c self,
        class: &'c ClassDescriptor,
    ) -> impl Iterator<Item = &'c FunctionDescriptor> + 'c {
        class.functions.iter().filter(move |f| self.is_benchmark(f))
    }
}

/// A class carrying the state annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateClass {
    pub name: QualifiedName,
    pub methods: Vec<BenchmarkMethod>,
}

/// A benchmark method of a [`StateClass`]. Always invoked with no arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BenchmarkMethod {
    pub name: String,
    pub owner: QualifiedName,
}

impl BenchmarkMethod {
    /// Registration label: `<owner-qualified-name>.<method>`.
    pub fn label(&self) -> String {
        format!("{}.{}", self.owner, self.name)
    }
}

/// Walks every package of a module once and collects its state classes.
#[derive(Debug, Clone, Default)]
pub struct Discovery {
    filter: AnnotationFilter,
    strict: bool,
}

impl Discovery {
    pub fn new(filter: AnnotationFilter) -> Self {
        Self {
            filter,
            strict: false,
        }
    }

    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self::new(AnnotationFilter::from_config(config)).strict(config.strict)
    }

    /// Fail on state classes that cannot be wrapped as written.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Collect every state class of `tree`, each exactly once.
    ///
    /// The tree is validated first; an invalid module yields no partial result.
    pub fn run<T: DeclarationTree + ?Sized>(&self, tree: &T) -> Result<Vec<StateClass>> {
        tree.validate()?;

        let mut walk = Walk {
            tree,
            discovery: self,
            visited: HashSet::new(),
            seen: HashSet::new(),
            found: Vec::new(),
        };
        walk.visit(&PackagePath::root())?;

        log::info!(
            "discovered {} state class(es) in module `{}`",
            walk.found.len(),
            tree.module_name()
        );
        Ok(walk.found)
    }

    fn check_contract(&self, class: &ClassDescriptor) -> Result<()> {
        if !class.has_no_arg_constructor {
            return Err(GenerateError::ContractViolation(format!(
                "state class `{}` has no zero-argument constructor",
                class.name
            )));
        }
        if let Some(f) = self
            .filter
            .benchmark_methods(class)
            .find(|f| f.parameters > 0)
        {
            return Err(GenerateError::ContractViolation(format!(
                "benchmark `{}.{}` takes {} parameter(s)",
                class.name, f.name, f.parameters
            )));
        }
        Ok(())
    }
}

/// Discover state classes using the default annotations.
pub fn discover<T: DeclarationTree + ?Sized>(tree: &T) -> Result<Vec<StateClass>> {
    Discovery::default().run(tree)
}

struct Walk<'a, T: ?Sized> {
    tree: &'a T,
    discovery: &'a Discovery,
    visited: HashSet<PackagePath>,
    seen: HashSet<QualifiedName>,
    found: Vec<StateClass>,
}

impl<T: DeclarationTree + ?Sized> Walk<'_, T> {
    fn visit(&mut self, package: &PackagePath) -> Result<()> {
        if !self.visited.insert(package.clone()) {
            return Ok(());
        }

        let tree = self.tree;
        let module = tree.module_name();
        for fragment in tree.fragments(package) {
            if !fragment.belongs_to(module) {
                log::warn!(
                    "skipping fragment of `{}` owned by `{}`",
                    package,
                    fragment.module.as_deref().unwrap_or_default()
                );
                continue;
            }
            for class in &fragment.classes {
                if !self.discovery.filter.is_state_class(class) {
                    continue;
                }
                self.collect(class)?;
            }
        }

        for child in tree.sub_packages(package) {
            self.visit(&child)?;
        }
        Ok(())
    }

    fn collect(&mut self, class: &ClassDescriptor) -> Result<()> {
        if self.discovery.strict {
            self.discovery.check_contract(class)?;
        }
        if !self.seen.insert(class.name.clone()) && self.discovery.strict {
            return Err(GenerateError::ContractViolation(format!(
                "state class `{}` is declared more than once",
                class.name
            )));
        }

        let methods: Vec<BenchmarkMethod> = self
            .discovery
            .filter
            .benchmark_methods(class)
            .map(|f| BenchmarkMethod {
                name: f.name.clone(),
                owner: class.name.clone(),
            })
            .collect();
        log::debug!(
            "state class {} with {} benchmark(s)",
            class.name,
            methods.len()
        );
        self.found.push(StateClass {
            name: class.name.clone(),
            methods,
        });
        Ok(())
    }
}
