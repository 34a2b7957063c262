//! Property sources.
//!
//! A source is a named grouping unit whose members are zero-argument
//! definitions. Members whose names match the naming pattern are
//! candidates: calling the definition yields the generators and property
//! that make up a [`PropertyBinding`]. Module-like and class-like sources
//! are two variants of the same capability, [`PropertySource`].
//!
//! There is no global registry. Sources are built explicitly and handed
//! to the tester, either directly or through a [`Catalog`] that resolves
//! them by name.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use tracing::debug;

use crate::error::ConfigError;
use crate::generator::Generator;
use crate::pattern::NamePattern;
use crate::property::{Property, PropertyDef};

/// Which kind of grouping unit a source is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Module,
    Class,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Module => f.write_str("module"),
            Self::Class => f.write_str("class"),
        }
    }
}

/// A property paired with one generator per parameter.
#[derive(Debug)]
pub struct PropertyBinding {
    pub name: String,
    pub generators: Vec<Generator>,
    pub property: Property,
}

impl PropertyBinding {
    pub fn new(name: impl Into<String>, def: PropertyDef) -> Self {
        Self {
            name: name.into(),
            generators: def.generators,
            property: def.property,
        }
    }

    /// Declared parameter count of the property.
    pub fn arity(&self) -> usize {
        self.property.arity()
    }

    /// Whether the generator list lines up with the parameter list.
    pub fn is_well_formed(&self) -> bool {
        self.generators.len() == self.arity()
    }
}

/// Anything that can list its candidate property bindings.
pub trait PropertySource {
    /// Group name used in reports.
    fn name(&self) -> &str;

    fn kind(&self) -> SourceKind;

    /// Bindings for every member whose name matches `pattern`, in name order.
    fn list_bindings(&self, pattern: &NamePattern) -> Vec<PropertyBinding>;
}

type Define = Rc<dyn Fn() -> PropertyDef>;

#[derive(Clone, Default)]
struct Members {
    entries: BTreeMap<String, Define>,
}

impl Members {
    fn insert(&mut self, name: impl Into<String>, define: Define) {
        self.entries.insert(name.into(), define);
    }

    fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    fn bindings(&self, owner: &str, pattern: &NamePattern) -> Vec<PropertyBinding> {
        self.entries
            .iter()
            .filter(|(name, _)| {
                let matched = pattern.is_match(name);
                debug!(source = owner, member = %name, matched, "Scanned member");
                matched
            })
            .map(|(name, define)| PropertyBinding::new(name.clone(), define()))
            .collect()
    }
}

/// Module-like source: a named set of free functions.
#[derive(Clone)]
pub struct ModuleSource {
    name: String,
    members: Members,
}

impl ModuleSource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: Members::default(),
        }
    }

    /// Register a function. Re-registering a name replaces the earlier one.
    #[must_use]
    pub fn function<F>(mut self, name: impl Into<String>, define: F) -> Self
    where
        F: Fn() -> PropertyDef + 'static,
    {
        self.members.insert(name, Rc::new(define));
        self
    }

    /// Names of all registered functions, candidates or not.
    pub fn member_names(&self) -> impl Iterator<Item = &str> {
        self.members.names()
    }
}

impl PropertySource for ModuleSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Module
    }

    fn list_bindings(&self, pattern: &NamePattern) -> Vec<PropertyBinding> {
        self.members.bindings(&self.name, pattern)
    }
}

impl fmt::Debug for ModuleSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleSource")
            .field("name", &self.name)
            .field("members", &self.members.names().collect::<Vec<_>>())
            .finish()
    }
}

/// Class-like source: a named type whose associated functions are scanned.
#[derive(Clone)]
pub struct ClassSource {
    name: String,
    members: Members,
}

impl ClassSource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: Members::default(),
        }
    }

    /// Register a method. Re-registering a name replaces the earlier one.
    #[must_use]
    pub fn method<F>(mut self, name: impl Into<String>, define: F) -> Self
    where
        F: Fn() -> PropertyDef + 'static,
    {
        self.members.insert(name, Rc::new(define));
        self
    }

    pub fn member_names(&self) -> impl Iterator<Item = &str> {
        self.members.names()
    }
}

impl PropertySource for ClassSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Class
    }

    fn list_bindings(&self, pattern: &NamePattern) -> Vec<PropertyBinding> {
        self.members.bindings(&self.name, pattern)
    }
}

impl fmt::Debug for ClassSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassSource")
            .field("name", &self.name)
            .field("members", &self.members.names().collect::<Vec<_>>())
            .finish()
    }
}

/// The sources a tester scans: modules or classes, never both.
#[derive(Debug, Clone, Default)]
pub enum Sources {
    #[default]
    None,
    Modules(Vec<ModuleSource>),
    Classes(Vec<ClassSource>),
}

impl Sources {
    pub fn iter(&self) -> Box<dyn Iterator<Item = &dyn PropertySource> + '_> {
        match self {
            Self::None => Box::new(std::iter::empty()),
            Self::Modules(modules) => {
                Box::new(modules.iter().map(|m| m as &dyn PropertySource))
            }
            Self::Classes(classes) => {
                Box::new(classes.iter().map(|c| c as &dyn PropertySource))
            }
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::None => 0,
            Self::Modules(modules) => modules.len(),
            Self::Classes(classes) => classes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Explicit name -> source table used to resolve sources by name.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    modules: BTreeMap<String, ModuleSource>,
    classes: BTreeMap<String, ClassSource>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_module(mut self, module: ModuleSource) -> Self {
        self.modules.insert(module.name.clone(), module);
        self
    }

    #[must_use]
    pub fn with_class(mut self, class: ClassSource) -> Self {
        self.classes.insert(class.name.clone(), class);
        self
    }

    /// Resolve module sources by name; the first unknown name is an error.
    pub fn modules<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<ModuleSource>, ConfigError> {
        names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                self.modules
                    .get(name)
                    .cloned()
                    .ok_or_else(|| ConfigError::SourceNotFound(format!("module `{name}`")))
            })
            .collect()
    }

    /// Resolve class sources by name; the first unknown name is an error.
    pub fn classes<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<ClassSource>, ConfigError> {
        names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                self.classes
                    .get(name)
                    .cloned()
                    .ok_or_else(|| ConfigError::SourceNotFound(format!("class `{name}`")))
            })
            .collect()
    }

    pub fn module_names(&self) -> impl Iterator<Item = &str> {
        self.modules.keys().map(String::as_str)
    }

    pub fn class_names(&self) -> impl Iterator<Item = &str> {
        self.classes.keys().map(String::as_str)
    }

    pub fn all_modules(&self) -> Vec<ModuleSource> {
        self.modules.values().cloned().collect()
    }

    pub fn all_classes(&self) -> Vec<ClassSource> {
        self.classes.values().cloned().collect()
    }
}
