//! Construction parsing
//!
//! A construction body initializes members by name:
//!
//! ```text
//! construction_body ::= "{" (member ":" expression ("," | &"}"))* ["default" [","]] "}"
//! construct_stmt    ::= "construct" expression construction_body
//! ```
//!
//! The body is also the tail of the `construct` expression, which may name
//! the type being built.

use crate::errors::{CompileResult, ErrorKind};
use crate::parser::ast::{Expression, Initializer, Statement, StatementKind};
use crate::parser::expressions::{ExprOptions, Grouping};
use crate::parser::lexer::TokenKind;
use crate::parser::parse::Parser;

impl Parser {
    /// Parse `{ member: value, ... }`, including both braces
    pub(crate) fn parse_construction_body(
        &mut self,
        explicit_type: Option<String>,
    ) -> CompileResult<Expression> {
        self.expect_punctuation("{", "to begin construction")?;

        let mut initializers = Vec::new();
        while self.peek().kind != TokenKind::Keyword && !self.check_punctuation("}") {
            let member =
                self.parse_expression(ExprOptions::new(0).within(Grouping::Brace).omit_equals())?;
            if !self.match_operator(":") {
                return Err(ErrorKind::ExpectedInitialization.at(self.current_line()));
            }
            let value = self.parse_expression(ExprOptions::new(0).within(Grouping::Brace))?;
            initializers.push(Initializer { member, value });

            if !self.match_punctuation(",") && !self.check_punctuation("}") {
                return Err(ErrorKind::ExpectedListInitialization.at(self.current_line()));
            }
        }

        let has_default = self.match_keyword("default");
        if has_default {
            self.match_punctuation(",");
        }
        self.expect_punctuation("}", "to close construction")?;

        let constant = initializers.iter().all(|init| init.value.is_const());
        Ok(Expression::Construction {
            explicit_type,
            initializers,
            has_default,
            constant,
        })
    }

    /// `construct target { ... }`; the keyword has been consumed
    pub(crate) fn parse_construct_statement(&mut self, line: usize) -> CompileResult<Statement> {
        let target = self.parse_expression(ExprOptions::new(0).allow_brace())?;
        let construction = self.parse_construction_body(None)?;
        Ok(Statement::new(
            StatementKind::Construction {
                target,
                construction,
            },
            line,
        ))
    }
}
