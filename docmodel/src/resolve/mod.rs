use std::fmt;

use crate::comment::DocLink;
use crate::package::{Package, PackageSet};

/// The category of a documented symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Const,
    Var,
    Func,
    Type,
}

impl SymbolKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolKind::Const => "const",
            SymbolKind::Var => "var",
            SymbolKind::Func => "func",
            SymbolKind::Type => "type",
        }
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a doc link points. An unresolved link has no kind and empty
/// path and anchor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub kind: Option<SymbolKind>,
    /// Import path relative to the module root; empty for the current package.
    pub path: String,
    /// `kind [recv] name`, space separated.
    pub anchor: String,
}

impl Resolution {
    pub fn unresolved() -> Self {
        Resolution::default()
    }

    pub fn is_resolved(&self) -> bool {
        self.kind.is_some()
    }
}

/// Resolves doc links found in comments of one package.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    current: &'a Package,
    packages: &'a PackageSet,
    module_root: &'a str,
}

impl<'a> Resolver<'a> {
    pub fn new(current: &'a Package, packages: &'a PackageSet, module_root: &'a str) -> Self {
        Resolver {
            current,
            packages,
            module_root,
        }
    }

    pub fn resolve(&self, link: &DocLink) -> Resolution {
        let local = link.import_path.is_empty();
        let kind = self
            .target_package(link)
            .and_then(|pkg| classify(pkg, &link.recv, &link.name));

        let Some(kind) = kind else {
            log::debug!(
                "unresolved doc link {:?} {:?} {:?}",
                link.import_path,
                link.recv,
                link.name
            );
            return Resolution::unresolved();
        };

        let path = if local {
            String::new()
        } else {
            strip_module_root(&link.import_path, self.module_root)
        };
        let resolution = Resolution {
            kind: Some(kind),
            path,
            anchor: anchor(kind, &link.recv, &link.name),
        };
        log::trace!("resolved doc link to {:?}", resolution);
        resolution
    }

    /// The package a link points into. Links without an import path stay in
    /// the current package. Otherwise the first package with the link's
    /// import path that actually declares the symbol wins.
    pub fn target_package(&self, link: &DocLink) -> Option<&'a Package> {
        if link.import_path.is_empty() {
            return Some(self.current);
        }
        self.packages
            .iter()
            .find(|pkg| pkg.import_path == link.import_path && pkg.has_symbol(&link.recv, &link.name))
    }
}

/// Kind of the symbol `name` (or method `recv.name`) in `pkg`.
/// Constants are checked first, then variables, functions and types.
pub fn classify(pkg: &Package, recv: &str, name: &str) -> Option<SymbolKind> {
    if pkg.has_const(name) {
        Some(SymbolKind::Const)
    } else if pkg.has_var(name) {
        Some(SymbolKind::Var)
    } else if pkg.has_func(recv, name) {
        Some(SymbolKind::Func)
    } else if pkg.has_type(name) {
        Some(SymbolKind::Type)
    } else {
        None
    }
}

pub fn anchor(kind: SymbolKind, recv: &str, name: &str) -> String {
    [kind.as_str(), recv, name]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Remove the first occurrence of `module_root` from `import_path`.
pub fn strip_module_root(import_path: &str, module_root: &str) -> String {
    if module_root.is_empty() {
        import_path.to_string()
    } else {
        import_path.replacen(module_root, "", 1)
    }
}
