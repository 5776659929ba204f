//! Import bookkeeping for generated modules
//!
//! Symbols are registered per package while a module is being generated and
//! flushed once into `from <package> import <symbols>` statements, grouped the
//! way isort lays them out: `__future__`, standard library, third party.

use std::collections::{BTreeMap, BTreeSet};

/// Forward-compatibility package, always grouped first
pub const FUTURE_PACKAGE: &str = "__future__";

/// Python standard library modules recognised by default
pub const DEFAULT_STDLIB_MODULES: &[&str] = &[
    "abc",
    "array",
    "asyncio",
    "base64",
    "collections",
    "contextlib",
    "copy",
    "dataclasses",
    "datetime",
    "decimal",
    "enum",
    "fractions",
    "functools",
    "ipaddress",
    "itertools",
    "json",
    "math",
    "numbers",
    "operator",
    "os",
    "pathlib",
    "re",
    "string",
    "sys",
    "time",
    "types",
    "typing",
    "uuid",
    "zoneinfo",
];

/// A `(package, symbol)` pair known at compile time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImportRef {
    pub package: &'static str,
    pub symbol: &'static str,
}

impl ImportRef {
    pub const fn new(package: &'static str, symbol: &'static str) -> Self {
        Self { package, symbol }
    }
}

pub const OPTIONAL: ImportRef = ImportRef::new("typing", "Optional");
pub const FIELD: ImportRef = ImportRef::new("pydantic", "Field");

/// Statement group a package is rendered in
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ImportGroup {
    Future,
    Stdlib,
    ThirdParty,
}

/// Per-run import registry
#[derive(Debug, Clone)]
pub struct ImportRegistry {
    imports: BTreeMap<String, BTreeSet<String>>,
    stdlib_modules: BTreeSet<String>,
}

impl ImportRegistry {
    /// Create a registry classifying packages against `stdlib_modules`
    pub fn new<I, S>(stdlib_modules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            imports: BTreeMap::new(),
            stdlib_modules: stdlib_modules.into_iter().map(Into::into).collect(),
        }
    }

    /// Add `symbol` to `package`. Builtins are never imported.
    pub fn register(&mut self, package: &str, symbol: &str) {
        if package.is_empty() || package == "builtins" {
            return;
        }
        self.imports
            .entry(package.to_string())
            .or_default()
            .insert(symbol.to_string());
    }

    pub fn register_ref(&mut self, import: ImportRef) {
        self.register(import.package, import.symbol);
    }

    pub fn contains(&self, package: &str, symbol: &str) -> bool {
        self.imports
            .get(package)
            .is_some_and(|symbols| symbols.contains(symbol))
    }

    pub fn is_empty(&self) -> bool {
        self.imports.is_empty()
    }

    /// Package that brings `symbol` into module scope, if any
    pub fn provider(&self, symbol: &str) -> Option<&str> {
        self.imports
            .iter()
            .find(|(_, symbols)| symbols.contains(symbol))
            .map(|(package, _)| package.as_str())
    }

    /// Group a package by its top-level module name
    pub fn classify(&self, package: &str) -> ImportGroup {
        if package == FUTURE_PACKAGE {
            return ImportGroup::Future;
        }
        let top_level = package.split('.').next().unwrap_or(package);
        if self.stdlib_modules.contains(top_level) {
            ImportGroup::Stdlib
        } else {
            ImportGroup::ThirdParty
        }
    }

    /// Consume the registry into non-empty statement groups, in
    /// future / stdlib / third-party order.
    pub fn flush(self) -> Vec<Vec<String>> {
        let mut future_imports = Vec::new();
        let mut stdlib_imports = Vec::new();
        let mut thirdparty_imports = Vec::new();

        for (package, symbols) in &self.imports {
            let names = symbols.iter().map(String::as_str).collect::<Vec<_>>().join(", ");
            let statement = format!("from {} import {}", package, names);
            match self.classify(package) {
                ImportGroup::Future => future_imports.push(statement),
                ImportGroup::Stdlib => stdlib_imports.push(statement),
                ImportGroup::ThirdParty => thirdparty_imports.push(statement),
            }
        }

        [future_imports, stdlib_imports, thirdparty_imports]
            .into_iter()
            .filter(|group| !group.is_empty())
            .collect()
    }

    /// Flush into a single block with one blank line between groups
    pub fn render(self) -> Option<String> {
        let groups = self.flush();
        if groups.is_empty() {
            return None;
        }
        Some(
            groups
                .iter()
                .map(|group| group.join("\n"))
                .collect::<Vec<_>>()
                .join("\n\n"),
        )
    }
}

impl Default for ImportRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_STDLIB_MODULES.iter().copied())
    }
}
