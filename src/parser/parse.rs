//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct, the token cursor helpers and the
//! block-level entry point [`Parser::create_ast`].
//!
//! # Parser Architecture
//!
//! The Parser uses a recursive descent approach with precedence climbing for
//! expressions:
//! - This module: Parser struct, helper methods, and coordination
//! - `statements`: statement dispatch and the simple statement forms
//! - `declarations`: `decl`, `alloc` and `def`
//! - `types`: types and qualities
//! - `construction`: construction bodies and the `construct` statement
//! - `expressions`: expressions with precedence climbing
//! - `control_flow`: the control-path-return check
//!
//! # Cursor convention
//!
//! `position` indexes the next unconsumed token. Every `parse_*` method starts
//! with the cursor on the first token of its construct and leaves it just past
//! the last one. Simple statements leave their terminating `;` for the
//! enclosing block to consume.

use crate::errors::{CompileResult, Diagnostic, ErrorKind};
use crate::parser::ast::StatementBlock;
use crate::parser::lexer::{Lexer, Token, TokenKind};

/// Recursive descent parser for SIN
pub struct Parser {
    pub(crate) tokens: Vec<Token>,
    pub(crate) position: usize,
    pub(crate) diagnostics: Vec<Diagnostic>,
    statement_start: usize,
}

impl Parser {
    pub fn new(source: &str) -> CompileResult<Self> {
        let mut lexer = Lexer::new(source);
        let tokens = lexer.tokenize()?;
        Ok(Self::from_tokens(tokens))
    }

    /// Build a parser over an existing token stream; an end-of-input token is
    /// appended if missing
    pub fn from_tokens(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|t| t.kind) != Some(TokenKind::Eof) {
            let line = tokens.last().map(|t| t.line).unwrap_or(1);
            tokens.push(Token::eof(line));
        }
        Self {
            tokens,
            position: 0,
            diagnostics: Vec::new(),
            statement_start: 0,
        }
    }

    /// Parse the entire program
    pub fn parse_program(&mut self) -> CompileResult<StatementBlock> {
        let program = self.create_ast()?;
        if !self.is_at_end() {
            return Err(ErrorKind::InvalidStatementStart {
                token: self.peek().text.clone(),
            }
            .at(self.current_line()));
        }
        Ok(program)
    }

    /// Parse statements until a closing brace or end of input.
    ///
    /// Stray semicolons between statements are skipped. The closing brace, if
    /// any, is left for the caller.
    pub fn create_ast(&mut self) -> CompileResult<StatementBlock> {
        let mut block = StatementBlock::new();
        let mut passes = Vec::new();

        loop {
            while self.match_punctuation(";") {}
            if self.is_at_end() || self.check_punctuation("}") {
                break;
            }

            let line = self.current_line();
            match self.parse_statement(false)? {
                Some(statement) => block.push(statement),
                None => passes.push(line),
            }
        }

        if !block.is_empty() {
            for line in passes {
                self.note("'pass' has no effect in a block with other statements", line);
            }
        }

        Ok(block)
    }

    /// Parse one top-level statement, for drivers that recover between statements.
    ///
    /// Returns `Ok(None)` at end of input and for `pass`.
    pub fn parse_top_level_statement(
        &mut self,
    ) -> CompileResult<Option<crate::parser::ast::Statement>> {
        while self.match_punctuation(";") {}
        if self.is_at_end() {
            return Ok(None);
        }
        self.statement_start = self.position;
        self.parse_statement(false)
    }

    /// Skip past the rest of the last top-level statement after it failed.
    ///
    /// Scanning restarts from the statement's first token and stops after the
    /// next `;` at brace depth 0, or after the `}` that closes a block opened
    /// within the statement.
    pub fn synchronize(&mut self) {
        self.position = self.statement_start;
        let mut depth = 0usize;
        while !self.is_at_end() {
            let token = self.advance();
            if token.is_punctuation("{") {
                depth += 1;
            } else if token.is_punctuation("}") {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    break;
                }
            } else if token.is_punctuation(";") && depth == 0 {
                break;
            }
        }
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    // ===== Diagnostics =====

    pub(crate) fn note(&mut self, message: impl Into<String>, line: usize) {
        let diagnostic = Diagnostic::note(message, line);
        diagnostic.emit();
        self.diagnostics.push(diagnostic);
    }

    pub(crate) fn warn(&mut self, message: impl Into<String>, line: usize, code: u32) {
        let diagnostic = Diagnostic::warning(message, line, code);
        diagnostic.emit();
        self.diagnostics.push(diagnostic);
    }

    // ===== Helper methods =====

    pub(crate) fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.position += 1;
        }
        self.previous()
    }

    /// Step back one token
    pub(crate) fn retreat(&mut self) {
        self.position = self.position.saturating_sub(1);
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    pub(crate) fn peek(&self) -> &Token {
        // The stream always ends with Eof and the cursor never passes it
        &self.tokens[self.position.min(self.tokens.len() - 1)]
    }

    pub(crate) fn peek_ahead(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.position + n)
    }

    pub(crate) fn previous(&self) -> &Token {
        &self.tokens[self.position.saturating_sub(1)]
    }

    pub(crate) fn current_line(&self) -> usize {
        self.peek().line
    }

    pub(crate) fn previous_line(&self) -> usize {
        self.previous().line
    }

    pub(crate) fn check_punctuation(&self, symbol: &str) -> bool {
        self.peek().is_punctuation(symbol)
    }

    pub(crate) fn check_keyword(&self, word: &str) -> bool {
        self.peek().is_keyword(word)
    }

    pub(crate) fn check_operator(&self, symbol: &str) -> bool {
        self.peek().is_operator(symbol)
    }

    pub(crate) fn match_punctuation(&mut self, symbol: &str) -> bool {
        if self.check_punctuation(symbol) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn match_keyword(&mut self, word: &str) -> bool {
        if self.check_keyword(word) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn match_operator(&mut self, symbol: &str) -> bool {
        if self.check_operator(symbol) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect_punctuation(
        &mut self,
        symbol: &'static str,
        context: &'static str,
    ) -> CompileResult<()> {
        if self.match_punctuation(symbol) {
            Ok(())
        } else {
            Err(ErrorKind::MissingGroupingSymbol { symbol, context }.at(self.current_line()))
        }
    }

    pub(crate) fn expect_identifier(&mut self, context: &'static str) -> CompileResult<String> {
        if self.peek().kind == TokenKind::Identifier {
            Ok(self.advance().text.clone())
        } else {
            Err(ErrorKind::MissingIdentifier { context }.at(self.current_line()))
        }
    }

    /// A simple statement must be followed by `;`, or by `,`/`)` inside a
    /// parameter list
    pub(crate) fn expect_statement_end(&self) -> CompileResult<()> {
        let next = self.peek();
        if next.is_punctuation(";") || next.is_punctuation(",") || next.is_punctuation(")") {
            Ok(())
        } else {
            Err(ErrorKind::MissingSemicolon.at(self.previous_line()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ast::StatementKind;

    #[test]
    fn test_stray_semicolons_skipped() {
        let mut parser = Parser::new(";; alloc int x; ;").unwrap();
        let program = parser.parse_program().unwrap();
        assert_eq!(program.len(), 1);
    }

    #[test]
    fn test_create_ast_stops_at_brace() {
        let mut parser = Parser::new("alloc int x; } alloc int y;").unwrap();
        let block = parser.create_ast().unwrap();
        assert_eq!(block.len(), 1);
        assert!(parser.check_punctuation("}"));
    }

    #[test]
    fn test_unbalanced_brace_rejected() {
        let mut parser = Parser::new("alloc int x; }").unwrap();
        assert!(parser.parse_program().is_err());
    }

    #[test]
    fn test_pass_is_dropped() {
        let mut parser = Parser::new("pass; alloc int x;").unwrap();
        let program = parser.parse_program().unwrap();
        assert_eq!(program.len(), 1);
        assert!(matches!(
            program.statements[0].kind,
            StatementKind::Allocation { .. }
        ));
        assert_eq!(parser.diagnostics().len(), 1);
    }

    #[test]
    fn test_synchronize_skips_statement() {
        let mut parser = Parser::new("alloc int : 3; alloc int y;").unwrap();
        assert!(parser.parse_top_level_statement().is_err());
        parser.synchronize();
        let next = parser.parse_top_level_statement().unwrap();
        match next.map(|s| s.kind) {
            Some(StatementKind::Allocation { name, .. }) => assert_eq!(name, "y"),
            _ => panic!("Expected allocation"),
        }
    }

    #[test]
    fn test_synchronize_skips_block() {
        let mut parser = Parser::new("def int f() { let = ; } alloc int y;").unwrap();
        assert!(parser.parse_top_level_statement().is_err());
        parser.synchronize();
        let next = parser.parse_top_level_statement().unwrap();
        assert!(matches!(
            next.map(|s| s.kind),
            Some(StatementKind::Allocation { .. })
        ));
    }

    #[test]
    fn test_cursor_helpers() {
        let mut parser = Parser::new("a b").unwrap();
        assert_eq!(parser.peek().text, "a");
        assert_eq!(parser.advance().text, "a");
        assert_eq!(parser.peek_ahead(0).map(|t| t.text.as_str()), Some("b"));
        parser.retreat();
        assert_eq!(parser.peek().text, "a");
        parser.advance();
        parser.advance();
        assert!(parser.is_at_end());
        parser.advance();
        assert!(parser.is_at_end());
    }
}
