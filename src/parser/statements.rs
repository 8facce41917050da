//! Statement parsing implementation
//!
//! This module handles statement dispatch and the simple statement forms:
//!
//! - Directives: `include "file"`
//! - Assignment: `let x = e`, `let x += e`
//! - Ownership transfer: `move a <- b`, `move b -> a`
//! - Control flow: `if`, `while`, `return`
//! - Calls: `@f(args)`
//! - Scoped blocks: `{ ... }`
//!
//! Declarations and definitions live in `declarations`, construction
//! statements in `construction`.
//!
//! # Grammar
//!
//! ```text
//! statement ::= include | decl | alloc | let | move | return | if | while
//!             | def | "pass" | construct | call | "{" statement* "}"
//! if        ::= "if" "(" expression ")" branch ["else" branch]
//! while     ::= "while" "(" expression ")" branch
//! branch    ::= statement [";"]
//! ```
//!
//! A branch that is not `}`-terminated must be followed by `;`.

use crate::errors::{CompileResult, ErrorKind};
use crate::parser::ast::*;
use crate::parser::expressions::ExprOptions;
use crate::parser::lexer::TokenKind;
use crate::parser::operators::Operator;
use crate::parser::parse::Parser;

impl Parser {
    /// Parse one statement starting at the current token.
    ///
    /// Returns `Ok(None)` for `pass`. `is_parameter` is set while parsing a
    /// formal parameter list, where declarations may carry default values.
    pub(crate) fn parse_statement(&mut self, is_parameter: bool) -> CompileResult<Option<Statement>> {
        let token = self.advance().clone();
        let line = token.line;

        let statement = match token.kind {
            TokenKind::Keyword => match token.text.as_str() {
                "include" => self.parse_include(line)?,
                "decl" => self.parse_declaration(line, is_parameter)?,
                "alloc" => self.parse_allocation(line)?,
                "let" => self.parse_assignment(line)?,
                "move" => self.parse_move(line)?,
                "return" => self.parse_return(line)?,
                "if" => self.parse_if(line)?,
                "while" => self.parse_while(line)?,
                "def" => self.parse_definition(line)?,
                "construct" => self.parse_construct_statement(line)?,
                "pass" => return Ok(None),
                _ => return Err(ErrorKind::UnexpectedKeyword { keyword: token.text }.at(line)),
            },
            TokenKind::Operator if token.text == "@" => {
                self.retreat();
                self.parse_call_statement(line)?
            }
            TokenKind::Punctuation if token.text == "{" => {
                let block = self.create_ast()?;
                self.expect_punctuation("}", "to close scoped block")?;
                Statement::new(StatementKind::ScopedBlock { block }, line)
            }
            TokenKind::Eof => return Err(ErrorKind::UnexpectedEndOfInput.at(line)),
            _ => return Err(ErrorKind::InvalidStatementStart { token: token.text }.at(line)),
        };

        tracing::trace!(line, kind = statement.kind.name(), "parsed statement");
        Ok(Some(statement))
    }

    fn parse_include(&mut self, line: usize) -> CompileResult<Statement> {
        if self.peek().kind != TokenKind::Str {
            return Err(ErrorKind::ExpectedFilename.at(line));
        }
        let filename = self.advance().text.clone();
        self.expect_statement_end()?;
        Ok(Statement::new(StatementKind::Include { filename }, line))
    }

    /// `let lvalue op rvalue`, where `op` is `=` or a compound assignment
    fn parse_assignment(&mut self, line: usize) -> CompileResult<Statement> {
        let lvalue = self.parse_expression(ExprOptions::new(0).omit_equals())?;

        let op_token = self.advance().clone();
        let op = match op_token.as_operator() {
            Some(op) if op.is_copy_assignment() => op,
            Some(op) if op.is_move_assignment() => {
                return Err(ErrorKind::IllegalMoveOperator.at(op_token.line));
            }
            _ => {
                return Err(ErrorKind::InvalidToken {
                    token: op_token.text,
                }
                .at(op_token.line));
            }
        };

        // The rvalue must start on the same line as `let`
        if self.check_punctuation(";") || self.is_at_end() || self.current_line() != line {
            return Err(ErrorKind::ExpectedExpression.at(line));
        }
        let rvalue = self.parse_expression(ExprOptions::new(0))?;
        self.expect_statement_end()?;

        let kind = match op.compound_base() {
            None => StatementKind::Assignment { lvalue, rvalue },
            Some(base) => StatementKind::CompoundAssignment {
                rvalue: Expression::Binary {
                    op: base,
                    constant: lvalue.is_const() && rvalue.is_const(),
                    left: Box::new(lvalue.clone()),
                    right: Box::new(rvalue),
                },
                lvalue,
                op: base,
            },
        };
        Ok(Statement::new(kind, line))
    }

    /// `move a <- b` or `move b -> a`; both store `a` as the destination
    fn parse_move(&mut self, line: usize) -> CompileResult<Statement> {
        let lhs = self.parse_expression(ExprOptions::new(0))?;

        let op = match self.peek().as_operator() {
            Some(op) if op.is_move_assignment() => op,
            _ => return Err(ErrorKind::ExpectedMoveOperator.at(line)),
        };
        self.advance();

        let rhs = self.parse_expression(ExprOptions::new(0))?;
        self.expect_statement_end()?;

        let (destination, source) = if op == Operator::LeftArrow {
            (lhs, rhs)
        } else {
            (rhs, lhs)
        };
        Ok(Statement::new(
            StatementKind::Movement {
                destination,
                source,
            },
            line,
        ))
    }

    /// `return;`, `return void;` or `return expression;`
    fn parse_return(&mut self, line: usize) -> CompileResult<Statement> {
        let value = if self.check_punctuation(";") {
            Expression::void_literal()
        } else if self.match_keyword("void") {
            if !self.check_punctuation(";") {
                return Err(ErrorKind::MissingSemicolon.at(line));
            }
            Expression::void_literal()
        } else {
            let value = self.parse_expression(ExprOptions::new(0))?;
            self.expect_statement_end()?;
            value
        };
        Ok(Statement::new(StatementKind::Return { value }, line))
    }

    fn parse_if(&mut self, line: usize) -> CompileResult<Statement> {
        let condition = self.parse_condition(line, "Condition must be enclosed in parens")?;
        let then_branch = self.parse_branch()?;
        let else_branch = if self.match_keyword("else") {
            Some(Box::new(self.parse_branch()?))
        } else {
            None
        };

        Ok(Statement::new(
            StatementKind::IfElse {
                condition,
                then_branch: Box::new(then_branch),
                else_branch,
            },
            line,
        ))
    }

    fn parse_while(&mut self, line: usize) -> CompileResult<Statement> {
        let condition = self.parse_condition(line, "Expected a condition")?;
        let branch = self.parse_branch()?;
        Ok(Statement::new(
            StatementKind::While {
                condition,
                branch: Box::new(branch),
            },
            line,
        ))
    }

    /// A parenthesized condition, including both parens
    fn parse_condition(&mut self, line: usize, context: &'static str) -> CompileResult<Expression> {
        if !self.match_punctuation("(") {
            return Err(ErrorKind::MalformedConstruct(context).at(line));
        }
        let condition = self.parse_expression(ExprOptions::new(0))?;
        self.expect_punctuation(")", "to close condition")?;
        Ok(condition)
    }

    /// The body of an `if`, `else` or `while`.
    ///
    /// A single statement must be terminated by `;`, which is consumed here.
    /// A `pass` branch becomes an empty scoped block.
    fn parse_branch(&mut self) -> CompileResult<Statement> {
        let line = self.current_line();
        let branch = self.parse_statement(false)?;

        // Branches ending in `}` (blocks, definitions) or in a nested branch's
        // `;` are already terminated
        if !self.match_punctuation(";")
            && !self.previous().is_punctuation("}")
            && !self.previous().is_punctuation(";")
        {
            return Err(ErrorKind::MissingSemicolon.at(self.previous_line()));
        }

        Ok(branch.unwrap_or_else(|| {
            Statement::new(
                StatementKind::ScopedBlock {
                    block: StatementBlock::new(),
                },
                line,
            )
        }))
    }

    /// `@f(args)` in statement position; the expression must be a call
    fn parse_call_statement(&mut self, line: usize) -> CompileResult<Statement> {
        let call = self.parse_expression(ExprOptions::new(0))?;
        if call.kind() != ExpressionKind::Call {
            return Err(
                ErrorKind::IllegalExpression("Expected a valid function call expression").at(line),
            );
        }
        self.expect_statement_end()?;
        Ok(Statement::new(StatementKind::Call { call }, line))
    }
}
