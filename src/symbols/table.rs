//! Symbol table
//!
//! Symbols are owned by the table and keyed by decorated name. Each open scope
//! records the decorated names inserted while it was innermost; closing the
//! scope removes those symbols again, most recent first. Symbols inserted with
//! no scope open are global and live for the whole run.

use super::symbol::{decorate, Symbol};
use crate::errors::{CompileResult, ErrorKind};
use crate::types::DataType;
use rustc_hash::FxHashMap;

#[derive(Debug, Default)]
pub struct SymbolTable {
    symbols: FxHashMap<String, Symbol>,
    locals: Vec<Vec<String>>,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable {
            symbols: FxHashMap::default(),
            locals: Vec::new(),
        }
    }

    /// Add a symbol; fails if its decorated name is already present
    pub fn insert(&mut self, symbol: Symbol) -> CompileResult<()> {
        let decorated = symbol.decorated_name().to_string();
        if self.symbols.contains_key(&decorated) {
            return Err(ErrorKind::DuplicateSymbol {
                name: symbol.name().to_string(),
            }
            .at(symbol.line_defined));
        }

        if let Some(scope) = self.locals.last_mut() {
            scope.push(decorated.clone());
        }
        self.symbols.insert(decorated, symbol);
        Ok(())
    }

    pub fn contains(&self, name: &str, scope: &[String], ty: &DataType) -> bool {
        self.symbols.contains_key(&decorate(name, scope, ty))
    }

    pub fn get(&self, decorated: &str) -> Option<&Symbol> {
        self.symbols.get(decorated)
    }

    pub fn get_mut(&mut self, decorated: &str) -> Option<&mut Symbol> {
        self.symbols.get_mut(decorated)
    }

    /// Look up a simple name from `scope`, innermost scope first
    pub fn find(&self, name: &str, scope: &[String]) -> Option<&Symbol> {
        (0..=scope.len()).rev().find_map(|depth| {
            let prefix = &scope[..depth];
            self.symbols
                .values()
                .filter(|symbol| symbol.name() == name && symbol.scope() == prefix)
                .min_by_key(|symbol| symbol.line_defined)
        })
    }

    pub fn enter_scope(&mut self) {
        self.locals.push(Vec::new());
    }

    /// Close the innermost scope, returning its symbols in removal order
    pub fn exit_scope(&mut self) -> Vec<Symbol> {
        let Some(scope) = self.locals.pop() else {
            return Vec::new();
        };
        scope
            .into_iter()
            .rev()
            .filter_map(|decorated| self.symbols.remove(&decorated))
            .collect()
    }

    /// Number of open scopes
    pub fn depth(&self) -> usize {
        self.locals.len()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.values()
    }
}
