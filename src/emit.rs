//! Structured builder for Kotlin source files.
//!
//! Synthesizers describe a file as packages, imports, classes, properties and
//! functions; this module turns that description into source text. Type
//! references inside statements are kept symbolic until rendering so that
//! imports can be chosen for the file as a whole.

use crate::error::{GenerateError, Result};
use crate::names::{is_identifier, PackagePath, QualifiedName};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

const INDENT: &str = "    ";

/// File extension of emitted sources.
pub const SOURCE_EXTENSION: &str = "kt";

/// A type as it appears in a declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeName {
    Class(QualifiedName),
    /// Untyped value from the JS host.
    Dynamic,
    String,
}

impl TypeName {
    fn render(&self, imports: &Imports) -> String {
        match self {
            TypeName::Class(name) => imports.name_of(name),
            TypeName::Dynamic => "dynamic".to_string(),
            TypeName::String => "String".to_string(),
        }
    }

    fn collect(&self, out: &mut Vec<QualifiedName>) {
        if let TypeName::Class(name) = self {
            out.push(name.clone());
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    Private,
    External,
}

impl Modifier {
    fn keyword(self) -> &'static str {
        match self {
            Modifier::Private => "private",
            Modifier::External => "external",
        }
    }
}

fn render_modifiers(modifiers: &[Modifier]) -> String {
    modifiers
        .iter()
        .map(|m| format!("{} ", m.keyword()))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum CodePart {
    Text(String),
    Type(QualifiedName),
    Str(String),
}

/// One statement or expression, built from text, type references and string
/// literals.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeBlock {
    parts: Vec<CodePart>,
}

impl CodeBlock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.parts.push(CodePart::Text(text.into()));
        self
    }

    /// Reference to a class, rendered as an imported or fully qualified name.
    pub fn type_ref(mut self, name: &QualifiedName) -> Self {
        self.parts.push(CodePart::Type(name.clone()));
        self
    }

    /// Quoted and escaped string literal.
    pub fn string(mut self, value: impl Into<String>) -> Self {
        self.parts.push(CodePart::Str(value.into()));
        self
    }

    fn render(&self, imports: &Imports) -> String {
        let mut out = String::new();
        for part in &self.parts {
            match part {
                CodePart::Text(t) => out.push_str(t),
                CodePart::Type(name) => out.push_str(&imports.name_of(name)),
                CodePart::Str(s) => out.push_str(&string_literal(s)),
            }
        }
        out
    }

    fn collect(&self, out: &mut Vec<QualifiedName>) {
        for part in &self.parts {
            if let CodePart::Type(name) = part {
                out.push(name.clone());
            }
        }
    }
}

impl From<&str> for CodeBlock {
    fn from(text: &str) -> Self {
        CodeBlock::new().text(text)
    }
}

impl From<String> for CodeBlock {
    fn from(text: String) -> Self {
        CodeBlock::new().text(text)
    }
}

/// Kotlin hard keywords; these can only be used as names when backtick-quoted.
const HARD_KEYWORDS: &[&str] = &[
    "as", "break", "class", "continue", "do", "else", "false", "for", "fun", "if", "in",
    "interface", "is", "null", "object", "package", "return", "super", "this", "throw", "true",
    "try", "typealias", "typeof", "val", "var", "when", "while",
];

/// Name as written in source: backtick-quoted when it is a hard keyword or not
/// a plain identifier.
pub fn name_literal(name: &str) -> String {
    if HARD_KEYWORDS.contains(&name) || !is_identifier(name) {
        format!("`{name}`")
    } else {
        name.to_string()
    }
}

fn package_literal(package: &PackagePath) -> String {
    package
        .segments()
        .iter()
        .map(|s| name_literal(s))
        .collect::<Vec<_>>()
        .join(".")
}

fn qualified_literal(name: &QualifiedName) -> String {
    if name.package().is_root() {
        name_literal(name.simple_name())
    } else {
        format!(
            "{}.{}",
            package_literal(name.package()),
            name_literal(name.simple_name())
        )
    }
}

/// Quote `value` as a Kotlin string literal.
pub fn string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '$' => out.push_str("\\$"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertySpec {
    name: String,
    ty: TypeName,
    modifiers: Vec<Modifier>,
    initializer: Option<CodeBlock>,
}

impl PropertySpec {
    pub fn builder(name: impl Into<String>, ty: TypeName) -> Self {
        Self {
            name: name.into(),
            ty,
            modifiers: Vec::new(),
            initializer: None,
        }
    }

    pub fn modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.push(modifier);
        self
    }

    pub fn initializer(mut self, code: impl Into<CodeBlock>) -> Self {
        self.initializer = Some(code.into());
        self
    }

    fn render(&self, imports: &Imports, indent: &str) -> String {
        let mut line = format!(
            "{indent}{}val {}: {}",
            render_modifiers(&self.modifiers),
            name_literal(&self.name),
            self.ty.render(imports)
        );
        if let Some(init) = &self.initializer {
            line.push_str(" = ");
            line.push_str(&init.render(imports));
        }
        line
    }

    fn collect(&self, out: &mut Vec<QualifiedName>) {
        self.ty.collect(out);
        if let Some(init) = &self.initializer {
            init.collect(out);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunSpec {
    name: String,
    modifiers: Vec<Modifier>,
    parameters: Vec<(String, TypeName)>,
    returns: Option<TypeName>,
    body: Vec<CodeBlock>,
}

impl FunSpec {
    pub fn builder(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            modifiers: Vec::new(),
            parameters: Vec::new(),
            returns: None,
            body: Vec::new(),
        }
    }

    pub fn modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.push(modifier);
        self
    }

    pub fn parameter(mut self, name: impl Into<String>, ty: TypeName) -> Self {
        self.parameters.push((name.into(), ty));
        self
    }

    pub fn returns(mut self, ty: TypeName) -> Self {
        self.returns = Some(ty);
        self
    }

    pub fn statement(mut self, code: impl Into<CodeBlock>) -> Self {
        self.body.push(code.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn render(&self, imports: &Imports, indent: &str) -> String {
        let params = self
            .parameters
            .iter()
            .map(|(name, ty)| format!("{}: {}", name_literal(name), ty.render(imports)))
            .collect::<Vec<_>>()
            .join(", ");
        let mut out = format!(
            "{indent}{}fun {}({params})",
            render_modifiers(&self.modifiers),
            name_literal(&self.name)
        );
        if let Some(ret) = &self.returns {
            out.push_str(": ");
            out.push_str(&ret.render(imports));
        }
        // External declarations are satisfied by the host and have no body.
        if self.modifiers.contains(&Modifier::External) {
            return out;
        }
        out.push_str(" {\n");
        for stmt in &self.body {
            out.push_str(indent);
            out.push_str(INDENT);
            out.push_str(&stmt.render(imports));
            out.push('\n');
        }
        out.push_str(indent);
        out.push('}');
        out
    }

    fn collect(&self, out: &mut Vec<QualifiedName>) {
        for (_, ty) in &self.parameters {
            ty.collect(out);
        }
        if let Some(ret) = &self.returns {
            ret.collect(out);
        }
        for stmt in &self.body {
            stmt.collect(out);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSpec {
    name: String,
    properties: Vec<PropertySpec>,
    functions: Vec<FunSpec>,
}

impl TypeSpec {
    pub fn class_builder(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: Vec::new(),
            functions: Vec::new(),
        }
    }

    pub fn property(mut self, property: PropertySpec) -> Self {
        self.properties.push(property);
        self
    }

    pub fn function(mut self, function: FunSpec) -> Self {
        self.functions.push(function);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn functions(&self) -> &[FunSpec] {
        &self.functions
    }

    fn render(&self, imports: &Imports) -> String {
        let mut chunks = Vec::new();
        if !self.properties.is_empty() {
            chunks.push(
                self.properties
                    .iter()
                    .map(|p| p.render(imports, INDENT))
                    .collect::<Vec<_>>()
                    .join("\n"),
            );
        }
        chunks.extend(self.functions.iter().map(|f| f.render(imports, INDENT)));

        let name = name_literal(&self.name);
        if chunks.is_empty() {
            format!("class {name} {{\n}}")
        } else {
            format!("class {name} {{\n{}\n}}", chunks.join("\n\n"))
        }
    }

    fn collect(&self, out: &mut Vec<QualifiedName>) {
        for p in &self.properties {
            p.collect(out);
        }
        for f in &self.functions {
            f.collect(out);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Member {
    Function(FunSpec),
    Type(TypeSpec),
}

/// One generated source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSpec {
    package: PackagePath,
    name: String,
    imports: BTreeSet<QualifiedName>,
    members: Vec<Member>,
}

impl FileSpec {
    pub fn builder(package: PackagePath, name: impl Into<String>) -> Self {
        Self {
            package,
            name: name.into(),
            imports: BTreeSet::new(),
            members: Vec::new(),
        }
    }

    /// Import a top-level member that is only referenced from plain text.
    pub fn add_import(mut self, member: QualifiedName) -> Self {
        self.imports.insert(member);
        self
    }

    pub fn add_function(mut self, function: FunSpec) -> Self {
        self.members.push(Member::Function(function));
        self
    }

    pub fn add_type(mut self, ty: TypeSpec) -> Self {
        self.members.push(Member::Type(ty));
        self
    }

    pub fn package(&self) -> &PackagePath {
        &self.package
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Location relative to the output root.
    pub fn relative_path(&self) -> PathBuf {
        self.package
            .to_dir()
            .join(format!("{}.{SOURCE_EXTENSION}", self.name))
    }

    pub fn render(&self) -> String {
        let mut referenced = Vec::new();
        let mut declared = BTreeSet::new();
        for member in &self.members {
            match member {
                Member::Function(f) => f.collect(&mut referenced),
                Member::Type(t) => {
                    declared.insert(t.name.clone());
                    t.collect(&mut referenced);
                }
            }
        }
        let imports = Imports::resolve(&self.package, &self.imports, referenced, &declared);

        let mut sections = Vec::new();
        if !self.package.is_root() {
            sections.push(format!("package {}", package_literal(&self.package)));
        }
        if !imports.lines.is_empty() {
            sections.push(
                imports
                    .lines
                    .iter()
                    .map(|l| format!("import {l}"))
                    .collect::<Vec<_>>()
                    .join("\n"),
            );
        }
        for member in &self.members {
            sections.push(match member {
                Member::Function(f) => f.render(&imports, ""),
                Member::Type(t) => t.render(&imports),
            });
        }

        let mut out = sections.join("\n\n");
        out.push('\n');
        out
    }

    /// Write the file under `output`, creating package directories as needed.
    pub fn write_to(&self, output: &Path) -> Result<PathBuf> {
        let path = output.join(self.relative_path());
        let emit_error = |source| GenerateError::Emit {
            path: path.clone(),
            source,
        };
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(emit_error)?;
        }
        fs::write(&path, self.render()).map_err(emit_error)?;
        log::debug!("wrote {}", path.display());
        Ok(path)
    }
}

/// Import decisions for one file.
struct Imports {
    package: PackagePath,
    qualified: BTreeSet<QualifiedName>,
    lines: BTreeSet<String>,
}

impl Imports {
    fn resolve(
        package: &PackagePath,
        explicit: &BTreeSet<QualifiedName>,
        referenced: Vec<QualifiedName>,
        declared: &BTreeSet<String>,
    ) -> Self {
        let all: BTreeSet<QualifiedName> = referenced
            .into_iter()
            .chain(explicit.iter().cloned())
            .collect();

        let mut by_simple: BTreeMap<&str, usize> = BTreeMap::new();
        for name in &all {
            *by_simple.entry(name.simple_name()).or_default() += 1;
        }

        let mut qualified = BTreeSet::new();
        let mut lines = BTreeSet::new();
        for name in &all {
            if name.package() == package {
                continue;
            }
            let simple = name.simple_name();
            let clashes = by_simple[simple] > 1 || declared.contains(simple);
            if clashes && !explicit.contains(name) {
                qualified.insert(name.clone());
            } else {
                // Root-package names have no qualified form and are imported as-is.
                lines.insert(qualified_literal(name));
            }
        }

        Self {
            package: package.clone(),
            qualified,
            lines,
        }
    }

    fn name_of(&self, name: &QualifiedName) -> String {
        if name.package() != &self.package && self.qualified.contains(name) {
            qualified_literal(name)
        } else {
            name_literal(name.simple_name())
        }
    }
}
