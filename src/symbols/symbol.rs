//! Symbol records and name decoration
//!
//! A [`Symbol`] is keyed in the table by its decorated name:
//!
//! ```text
//! _SIN_N{len}{segment}...E@{name}@{type decoration}
//! ```
//!
//! Two symbols collide only when their name, scope path and type decoration
//! all agree.

use crate::config::DECORATION_PREFIX;
use crate::types::DataType;
use std::fmt::Write as _;

/// What a symbol names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Variable,
    Function,
    Struct,
}

/// A declared or defined entity.
///
/// The name, scope and type make up the table key, so they are fixed at
/// construction. The status flags may be updated in place.
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    name: String,
    decorated: String,
    scope: Vec<String>,
    ty: DataType,
    pub kind: SymbolKind,
    pub is_parameter: bool,
    pub defined: bool,
    pub initialized: bool,
    pub line_defined: usize,
}

impl Symbol {
    pub fn new(
        name: impl Into<String>,
        scope: Vec<String>,
        ty: DataType,
        kind: SymbolKind,
        line_defined: usize,
    ) -> Self {
        let name = name.into();
        let decorated = decorate(&name, &scope, &ty);
        Symbol {
            name,
            decorated,
            scope,
            ty,
            kind,
            is_parameter: false,
            defined: false,
            initialized: false,
            line_defined,
        }
    }

    pub fn parameter(mut self) -> Self {
        self.is_parameter = true;
        self
    }

    pub fn defined(mut self) -> Self {
        self.defined = true;
        self
    }

    pub fn initialized(mut self, initialized: bool) -> Self {
        self.initialized = initialized;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn scope(&self) -> &[String] {
        &self.scope
    }

    pub fn ty(&self) -> &DataType {
        &self.ty
    }

    /// The table key, computed once at construction
    pub fn decorated_name(&self) -> &str {
        &self.decorated
    }

    /// True when this symbol's scope path is a prefix of `scope`
    pub fn is_accessible_from(&self, scope: &[String]) -> bool {
        scope.starts_with(&self.scope)
    }
}

/// Decorate a name for use as a symbol-table key
pub fn decorate(name: &str, scope: &[String], ty: &DataType) -> String {
    let mut decorated = String::from(DECORATION_PREFIX);
    decorated.push('N');
    for segment in scope {
        let _ = write!(decorated, "{}{}", segment.len(), segment);
    }
    let _ = write!(decorated, "E@{}@{}", name, ty.decorate());
    decorated
}
