//! Symbol collection over a finished AST
//!
//! The collector walks a [`StatementBlock`] in source order and registers
//! every declared entity in a [`SymbolTable`]:
//!
//! - `decl` registers an undefined symbol
//! - `alloc` and `def` define one, completing an earlier `decl` of the same
//!   decorated name; defining it twice is a duplicate
//! - function bodies and struct bodies open a scope named after the entity
//! - scoped blocks and `if`/`while` branches open numbered anonymous scopes
//!
//! Assignments, movements and constructions mark their target initialized.
//! Errors are recorded per statement and collection carries on.

use super::symbol::{Symbol, SymbolKind};
use super::table::SymbolTable;
use crate::errors::{CompileError, CompileResult, ErrorKind};
use crate::parser::ast::{Expression, Statement, StatementBlock, StatementKind};
use crate::types::{DataType, Qualities};

pub struct SymbolCollector {
    table: SymbolTable,
    scope: Vec<String>,
    anonymous: usize,
    errors: Vec<CompileError>,
}

impl Default for SymbolCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolCollector {
    pub fn new() -> Self {
        SymbolCollector {
            table: SymbolTable::new(),
            scope: Vec::new(),
            anonymous: 0,
            errors: Vec::new(),
        }
    }

    /// Register every statement of `block` at the current scope
    pub fn collect(&mut self, block: &StatementBlock) {
        for statement in block {
            if let Err(err) = self.visit(statement) {
                tracing::error!(line = err.line, "{}", err);
                self.errors.push(err);
            }
        }
    }

    pub fn table(&self) -> &SymbolTable {
        &self.table
    }

    pub fn errors(&self) -> &[CompileError] {
        &self.errors
    }

    pub fn finish(self) -> (SymbolTable, Vec<CompileError>) {
        (self.table, self.errors)
    }

    fn visit(&mut self, statement: &Statement) -> CompileResult<()> {
        let line = statement.line;
        match &statement.kind {
            StatementKind::Declaration {
                ty,
                name,
                initial_value,
                is_function,
                is_struct,
                ..
            } => {
                let kind = if *is_struct {
                    SymbolKind::Struct
                } else if *is_function {
                    SymbolKind::Function
                } else {
                    SymbolKind::Variable
                };
                let symbol = Symbol::new(name.clone(), self.scope.clone(), ty.clone(), kind, line)
                    .initialized(initial_value.is_some());
                self.declare(symbol)
            }
            StatementKind::Allocation {
                ty,
                name,
                initial_value,
            } => {
                let symbol = Symbol::new(
                    name.clone(),
                    self.scope.clone(),
                    ty.clone(),
                    SymbolKind::Variable,
                    line,
                )
                .initialized(initial_value.is_some());
                self.define(symbol)
            }
            StatementKind::FunctionDefinition {
                name,
                return_type,
                params,
                body,
            } => {
                let symbol = Symbol::new(
                    name.clone(),
                    self.scope.clone(),
                    return_type.clone(),
                    SymbolKind::Function,
                    line,
                )
                .initialized(true);
                self.define(symbol)?;

                self.enter_scope(name.clone());
                let result = self.register_parameters(params);
                self.collect(body);
                self.exit_scope();
                result
            }
            StatementKind::StructDefinition { name, body } => {
                let symbol = Symbol::new(
                    name.clone(),
                    self.scope.clone(),
                    DataType::struct_named(name.clone(), Qualities::new()),
                    SymbolKind::Struct,
                    line,
                );
                self.define(symbol)?;

                self.enter_scope(name.clone());
                self.collect(body);
                self.exit_scope();
                Ok(())
            }
            StatementKind::ScopedBlock { block } => {
                self.enter_anonymous_scope();
                self.collect(block);
                self.exit_scope();
                Ok(())
            }
            StatementKind::IfElse {
                then_branch,
                else_branch,
                ..
            } => {
                self.visit_branch(then_branch);
                if let Some(else_branch) = else_branch {
                    self.visit_branch(else_branch);
                }
                Ok(())
            }
            StatementKind::While { branch, .. } => {
                self.visit_branch(branch);
                Ok(())
            }
            StatementKind::Assignment { lvalue, .. }
            | StatementKind::CompoundAssignment { lvalue, .. } => {
                self.mark_initialized(lvalue);
                Ok(())
            }
            StatementKind::Movement { destination, .. } => {
                self.mark_initialized(destination);
                Ok(())
            }
            StatementKind::Construction { target, .. } => {
                self.mark_initialized(target);
                Ok(())
            }
            StatementKind::Include { .. }
            | StatementKind::Return { .. }
            | StatementKind::Call { .. } => Ok(()),
        }
    }

    /// A branch always gets its own scope; a braced branch does not nest a second one
    fn visit_branch(&mut self, branch: &Statement) {
        self.enter_anonymous_scope();
        match &branch.kind {
            StatementKind::ScopedBlock { block } => self.collect(block),
            _ => {
                if let Err(err) = self.visit(branch) {
                    tracing::error!(line = err.line, "{}", err);
                    self.errors.push(err);
                }
            }
        }
        self.exit_scope();
    }

    fn register_parameters(&mut self, params: &[Statement]) -> CompileResult<()> {
        for param in params {
            if let StatementKind::Declaration { ty, name, .. } = &param.kind {
                let symbol = Symbol::new(
                    name.clone(),
                    self.scope.clone(),
                    ty.clone(),
                    SymbolKind::Variable,
                    param.line,
                )
                .parameter()
                .defined()
                .initialized(true);
                self.table.insert(symbol)?;
            }
        }
        Ok(())
    }

    /// Register without defining; repeating a declaration is harmless
    fn declare(&mut self, symbol: Symbol) -> CompileResult<()> {
        if self.table.get(symbol.decorated_name()).is_some() {
            return Ok(());
        }
        tracing::trace!(symbol = symbol.decorated_name(), "declared");
        self.table.insert(symbol)
    }

    /// Define a symbol, completing a prior declaration if there is one
    fn define(&mut self, symbol: Symbol) -> CompileResult<()> {
        match self.table.get_mut(symbol.decorated_name()) {
            Some(existing) if existing.defined => Err(ErrorKind::DuplicateSymbol {
                name: symbol.name().to_string(),
            }
            .at(symbol.line_defined)),
            Some(existing) => {
                existing.defined = true;
                existing.initialized |= symbol.initialized;
                existing.line_defined = symbol.line_defined;
                tracing::trace!(symbol = symbol.decorated_name(), "completed declaration");
                Ok(())
            }
            None => {
                tracing::trace!(symbol = symbol.decorated_name(), "defined");
                self.table.insert(symbol.defined())
            }
        }
    }

    fn mark_initialized(&mut self, target: &Expression) {
        let Expression::Identifier { name, .. } = target else {
            return;
        };
        let Some(decorated) = self
            .table
            .find(name, &self.scope)
            .map(|symbol| symbol.decorated_name().to_string())
        else {
            return;
        };
        if let Some(symbol) = self.table.get_mut(&decorated) {
            symbol.initialized = true;
        }
    }

    fn enter_scope(&mut self, name: String) {
        self.scope.push(name);
        self.table.enter_scope();
    }

    fn enter_anonymous_scope(&mut self) {
        let name = self.anonymous.to_string();
        self.anonymous += 1;
        self.enter_scope(name);
    }

    fn exit_scope(&mut self) {
        let released = self.table.exit_scope();
        tracing::trace!(scope = ?self.scope, released = released.len(), "scope closed");
        self.scope.pop();
    }
}
