//! Front-end driver
//!
//! [`Frontend::compile`] runs the whole front end over one source text:
//!
//! 1. Lex the source. A lexical error is fatal.
//! 2. Parse top-level statements one at a time. A failed statement is logged
//!    and recorded, and parsing resumes after it.
//! 3. Once the number of failed statements exceeds the error budget, the run
//!    is aborted.
//! 4. Walk the finished AST and register its symbols.
//!
//! The [`CompileOutput`] is what a code generator consumes: statements in
//! source order with their line numbers, plus the symbol table.

use crate::config::FrontendConfig;
use crate::errors::{CompileError, CompileResult, Diagnostic, ErrorKind};
use crate::parser::ast::StatementBlock;
use crate::parser::Parser;
use crate::symbols::{SymbolCollector, SymbolTable};

/// Everything produced by a completed run
#[derive(Debug)]
pub struct CompileOutput {
    pub ast: StatementBlock,
    pub symbols: SymbolTable,
    pub diagnostics: Vec<Diagnostic>,
    /// Statement and symbol errors that were recovered from
    pub errors: Vec<CompileError>,
}

impl CompileOutput {
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Frontend {
    config: FrontendConfig,
}

impl Frontend {
    pub fn new(config: FrontendConfig) -> Self {
        Frontend { config }
    }

    pub fn config(&self) -> &FrontendConfig {
        &self.config
    }

    pub fn compile(&self, source: &str) -> CompileResult<CompileOutput> {
        let mut parser = Parser::new(source)?;
        let mut ast = StatementBlock::new();
        let mut errors: Vec<CompileError> = Vec::new();
        let mut passes = Vec::new();

        while !parser.is_at_end() {
            match parser.parse_top_level_statement() {
                Ok(Some(statement)) => {
                    tracing::debug!(
                        line = statement.line,
                        kind = statement.kind.name(),
                        "parsed statement"
                    );
                    ast.push(statement);
                }
                Ok(None) => {
                    let previous = parser.previous();
                    if previous.is_keyword("pass") {
                        passes.push(previous.line);
                    }
                }
                Err(err) => {
                    tracing::error!(line = err.line, code = err.code(), "{}", err);
                    let line = err.line;
                    errors.push(err);
                    if errors.len() > self.config.error_budget {
                        tracing::error!(
                            errors = errors.len(),
                            budget = self.config.error_budget,
                            "error budget exceeded"
                        );
                        return Err(ErrorKind::ErrorBudgetExceeded {
                            errors: errors.len(),
                        }
                        .at(line));
                    }
                    parser.synchronize();
                }
            }
        }

        let mut diagnostics = parser.take_diagnostics();
        if !ast.is_empty() {
            for line in passes {
                let note = Diagnostic::note(
                    "'pass' has no effect in a block with other statements",
                    line,
                );
                note.emit();
                diagnostics.push(note);
            }
        }

        let symbols = if self.config.register_symbols {
            let mut collector = SymbolCollector::new();
            collector.collect(&ast);
            let (table, symbol_errors) = collector.finish();
            errors.extend(symbol_errors);
            table
        } else {
            SymbolTable::new()
        };

        tracing::info!(
            statements = ast.len(),
            symbols = symbols.len(),
            errors = errors.len(),
            diagnostics = diagnostics.len(),
            "front end finished"
        );

        Ok(CompileOutput {
            ast,
            symbols,
            diagnostics,
            errors,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_program() {
        let output = Frontend::default()
            .compile("alloc int x: 1;\nlet x = x + 1;")
            .unwrap();
        assert!(output.is_success());
        assert_eq!(output.ast.len(), 2);
        assert_eq!(output.ast.statements[1].line, 2);
        assert_eq!(output.symbols.len(), 1);
    }

    #[test]
    fn test_recovers_after_statement_error() {
        let output = Frontend::default()
            .compile("alloc int x: 1;\nlet = 3;\nalloc int y;")
            .unwrap();
        assert_eq!(output.errors.len(), 1);
        assert_eq!(output.errors[0].line, 2);
        assert_eq!(output.ast.len(), 2);
    }

    #[test]
    fn test_error_budget() {
        let config = FrontendConfig::default().with_error_budget(1);
        let err = Frontend::new(config)
            .compile("let = 1;\nlet = 2;\nalloc int z;")
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::ErrorBudgetExceeded { errors: 2 });
        assert_eq!(err.line, 2);
    }

    #[test]
    fn test_lexical_error_is_fatal() {
        let err = Frontend::default().compile("alloc int x: 1.2.3;").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::InvalidNumericLiteral { .. }));
    }

    #[test]
    fn test_symbols_can_be_skipped() {
        let config = FrontendConfig::default().without_symbols();
        let output = Frontend::new(config).compile("alloc int x;").unwrap();
        assert!(output.symbols.is_empty());
        assert_eq!(output.ast.len(), 1);
    }
}
