pub mod error;

use serde::{Deserialize, Serialize};

use crate::comment::LinkLookup;

pub use error::MetadataError;

/// Symbol tables of one documented package.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    /// Short name used to qualify links (`[pkg.Name]`). Defaults to the
    /// last element of the import path.
    #[serde(default)]
    pub name: String,
    pub import_path: String,
    #[serde(default)]
    pub consts: Vec<ValueGroup>,
    #[serde(default)]
    pub vars: Vec<ValueGroup>,
    #[serde(default)]
    pub funcs: Vec<Func>,
    #[serde(default)]
    pub types: Vec<TypeDecl>,
}

/// One const or var declaration, possibly declaring several names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueGroup {
    pub names: Vec<String>,
}

/// A function, or a method when `recv` is set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Func {
    pub name: String,
    #[serde(default)]
    pub recv: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDecl {
    pub name: String,
}

impl ValueGroup {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ValueGroup {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn declares(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }
}

impl Func {
    pub fn new(recv: impl Into<String>, name: impl Into<String>) -> Self {
        Func {
            name: name.into(),
            recv: recv.into(),
        }
    }
}

impl TypeDecl {
    pub fn new(name: impl Into<String>) -> Self {
        TypeDecl { name: name.into() }
    }
}

impl Package {
    pub fn new(import_path: impl Into<String>) -> Self {
        Package {
            import_path: import_path.into(),
            ..Package::default()
        }
    }

    pub fn with_const<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.consts.push(ValueGroup::new(names));
        self
    }

    pub fn with_var<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.vars.push(ValueGroup::new(names));
        self
    }

    pub fn with_func(mut self, recv: impl Into<String>, name: impl Into<String>) -> Self {
        self.funcs.push(Func::new(recv, name));
        self
    }

    pub fn with_type(mut self, name: impl Into<String>) -> Self {
        self.types.push(TypeDecl::new(name));
        self
    }

    pub fn short_name(&self) -> &str {
        if self.name.is_empty() {
            self.import_path.rsplit('/').next().unwrap_or(&self.import_path)
        } else {
            &self.name
        }
    }

    pub fn has_const(&self, name: &str) -> bool {
        self.consts.iter().any(|group| group.declares(name))
    }

    pub fn has_var(&self, name: &str) -> bool {
        self.vars.iter().any(|group| group.declares(name))
    }

    pub fn has_func(&self, recv: &str, name: &str) -> bool {
        self.funcs.iter().any(|f| f.recv == recv && f.name == name)
    }

    pub fn has_type(&self, name: &str) -> bool {
        self.types.iter().any(|t| t.name == name)
    }

    /// Whether the package declares `name`, or the method `recv.name` when
    /// a receiver is given.
    pub fn has_symbol(&self, recv: &str, name: &str) -> bool {
        if recv.is_empty() {
            self.has_const(name)
                || self.has_var(name)
                || self.has_func("", name)
                || self.has_type(name)
        } else {
            self.has_func(recv, name)
        }
    }
}

/// Every package known to a documentation run. Loaded once, then only read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageSet {
    #[serde(rename = "package", default)]
    packages: Vec<Package>,
}

impl PackageSet {
    pub fn new(packages: Vec<Package>) -> Self {
        PackageSet { packages }
    }

    /// Load package metadata from TOML (`[[package]]` tables).
    /// `file_id` identifies the source for diagnostics.
    pub fn from_toml(source: &str, file_id: usize) -> Result<Self, MetadataError> {
        let set: PackageSet = toml::from_str(source).map_err(|e| {
            MetadataError::error(e.message(), e.span(), file_id)
                .with_note("expected [[package]] tables with an import_path")
        })?;

        if let Some(index) = set.packages.iter().position(|p| p.import_path.is_empty()) {
            return Err(MetadataError::error(
                format!("package #{} has an empty import_path", index + 1),
                None,
                file_id,
            ));
        }

        log::debug!("loaded metadata for {} package(s)", set.packages.len());
        Ok(set)
    }

    pub fn packages(&self) -> &[Package] {
        &self.packages
    }

    pub fn iter(&self) -> impl Iterator<Item = &Package> {
        self.packages.iter()
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// First package with this import path.
    pub fn get(&self, import_path: &str) -> Option<&Package> {
        self.packages.iter().find(|p| p.import_path == import_path)
    }

    /// First package known by this short name.
    pub fn by_name(&self, name: &str) -> Option<&Package> {
        self.packages.iter().find(|p| p.short_name() == name)
    }
}

/// The names visible from a comment of `current`: its own symbols and every
/// known package by short name.
#[derive(Debug, Clone, Copy)]
pub struct Scope<'a> {
    current: &'a Package,
    packages: &'a PackageSet,
}

impl<'a> Scope<'a> {
    pub fn new(current: &'a Package, packages: &'a PackageSet) -> Self {
        Scope { current, packages }
    }
}

impl LinkLookup for Scope<'_> {
    fn lookup_package(&self, name: &str) -> Option<&str> {
        if self.current.short_name() == name {
            return Some(&self.current.import_path);
        }
        self.packages.by_name(name).map(|p| p.import_path.as_str())
    }

    fn lookup_sym(&self, recv: &str, name: &str) -> bool {
        self.current.has_symbol(recv, name)
    }
}
