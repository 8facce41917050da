//! Declaration parsing implementation
//!
//! This module handles the statements that introduce names:
//!
//! - Declarations: `decl int x;`, `decl int f(decl int a);`, `decl struct Point;`
//! - Allocations: `alloc int x: 5;`
//! - Function definitions: `def int f(decl int a) { ... }`
//! - Struct definitions: `def struct Point { ... }`
//!
//! # Grammar
//!
//! ```text
//! decl         ::= "decl" ("struct" identifier | type identifier postfix [params] [":" expression])
//! alloc        ::= "alloc" type identifier postfix [":" expression]
//! def          ::= "def" (struct_def | function_def)
//! function_def ::= type identifier postfix params "{" statement* "}"
//! struct_def   ::= "struct" identifier "{" statement* "}"
//! params       ::= "(" [decl ("," decl)*] ")"
//! postfix      ::= ["&" quality+]
//! ```
//!
//! Default values in `decl` are only legal for formal parameters. Every
//! control path through a function body must return.

use crate::errors::{code, CompileResult, ErrorKind};
use crate::parser::ast::*;
use crate::parser::control_flow;
use crate::parser::expressions::ExprOptions;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::Parser;
use crate::types::{DataType, Qualities};

impl Parser {
    /// `decl ...`; the keyword has been consumed
    pub(crate) fn parse_declaration(
        &mut self,
        line: usize,
        is_parameter: bool,
    ) -> CompileResult<Statement> {
        if self.match_keyword("struct") {
            if self.peek().kind != TokenKind::Identifier {
                return Err(ErrorKind::IllegalStructName.at(self.current_line()));
            }
            let name = self.advance().text.clone();
            self.expect_statement_end()?;
            return Ok(Statement::new(
                StatementKind::Declaration {
                    ty: DataType::struct_named(name.clone(), Qualities::new()),
                    name,
                    initial_value: None,
                    is_function: false,
                    is_struct: true,
                    params: Vec::new(),
                },
                line,
            ));
        }

        self.expect_type_start(line)?;
        let mut ty = self.parse_type()?;
        let name = self.expect_identifier("after type in declaration")?;
        self.parse_postfixed_type_qualities(&mut ty)?;

        let mut is_function = false;
        let mut params = Vec::new();
        let mut initial_value = None;

        if self.match_punctuation("(") {
            is_function = true;
            params = self.parse_formal_parameters()?;
        } else if self.check_operator(":") {
            if !is_parameter {
                return Err(ErrorKind::InitializerInDeclaration.at(self.current_line()));
            }
            self.advance();
            initial_value = Some(self.parse_expression(ExprOptions::new(0))?);
        }

        self.expect_statement_end()?;
        Ok(Statement::new(
            StatementKind::Declaration {
                ty,
                name,
                initial_value,
                is_function,
                is_struct: false,
                params,
            },
            line,
        ))
    }

    /// `alloc ...`; the keyword has been consumed
    pub(crate) fn parse_allocation(&mut self, line: usize) -> CompileResult<Statement> {
        self.expect_type_start(line)?;
        let mut ty = self.parse_type()?;
        let name = self.expect_identifier("after type in allocation")?;
        self.parse_postfixed_type_qualities(&mut ty)?;

        if !ty.is_valid_type() {
            return Err(ErrorKind::InvalidType.at(self.previous_line()));
        }

        let initial_value = if self.match_operator(":") {
            Some(self.parse_expression(ExprOptions::new(0))?)
        } else {
            None
        };

        self.expect_statement_end()?;
        Ok(Statement::new(
            StatementKind::Allocation {
                ty,
                name,
                initial_value,
            },
            line,
        ))
    }

    /// `def ...`; the keyword has been consumed
    pub(crate) fn parse_definition(&mut self, line: usize) -> CompileResult<Statement> {
        if self.match_keyword("struct") {
            self.parse_struct_definition(line)
        } else {
            self.parse_function_definition(line)
        }
    }

    fn parse_function_definition(&mut self, line: usize) -> CompileResult<Statement> {
        let mut return_type = self.parse_type()?;
        let name = self.expect_identifier("for function name")?;
        self.parse_postfixed_type_qualities(&mut return_type)?;

        if !self.match_punctuation("(") {
            return Err(
                ErrorKind::MalformedConstruct("Function definition requires '(' and ')'").at(line),
            );
        }
        let params = self.parse_formal_parameters()?;

        let body = self.parse_definition_body(
            "Function definition requires use of curly braces after arguments",
            "Empty function definition",
        )?;

        if !control_flow::has_return(&body)? {
            return Err(ErrorKind::FunctionWithoutReturn { name }.at(line));
        }

        tracing::debug!(line, function = %name, params = params.len(), "parsed function definition");
        Ok(Statement::new(
            StatementKind::FunctionDefinition {
                name,
                return_type,
                params,
                body,
            },
            line,
        ))
    }

    fn parse_struct_definition(&mut self, line: usize) -> CompileResult<Statement> {
        if self.peek().kind != TokenKind::Identifier {
            return Err(ErrorKind::IllegalStructName.at(self.current_line()));
        }
        let name = self.advance().text.clone();

        let body = self.parse_definition_body(
            "Expected scoped block in struct definition",
            "Empty struct definition",
        )?;

        Ok(Statement::new(
            StatementKind::StructDefinition { name, body },
            line,
        ))
    }

    /// `{ statement* }` of a definition; warns when the body is empty
    fn parse_definition_body(
        &mut self,
        missing: &'static str,
        empty: &'static str,
    ) -> CompileResult<StatementBlock> {
        if !self.match_punctuation("{") {
            return Err(ErrorKind::MalformedConstruct(missing).at(self.current_line()));
        }
        if self.check_punctuation("}") {
            let line = self.current_line();
            self.warn(empty, line, code::EMPTY_SCOPE_BLOCK);
        }

        let body = self.create_ast()?;
        self.expect_punctuation("}", "to close definition body")?;
        Ok(body)
    }

    /// Parameters after the opening paren, through the closing one.
    ///
    /// Each parameter must be a `decl` statement.
    fn parse_formal_parameters(&mut self) -> CompileResult<Vec<Statement>> {
        let mut params = Vec::new();

        while !self.check_punctuation(")") {
            let line = self.current_line();
            match self.parse_statement(true)? {
                Some(param) if matches!(param.kind, StatementKind::Declaration { .. }) => {
                    params.push(param);
                }
                _ => return Err(ErrorKind::ParameterMustBeDeclaration.at(line)),
            }

            if !self.match_punctuation(",") && !self.check_punctuation(")") {
                return Err(ErrorKind::MissingGroupingSymbol {
                    symbol: ")",
                    context: "to close parameter list",
                }
                .at(self.current_line()));
            }
        }

        self.advance();
        Ok(params)
    }

    /// A type must begin with a keyword or a struct name
    fn expect_type_start(&self, line: usize) -> CompileResult<()> {
        match self.peek().kind {
            TokenKind::Keyword | TokenKind::Identifier => Ok(()),
            _ => Err(ErrorKind::ExpectedType {
                found: self.peek().text.clone(),
            }
            .at(line)),
        }
    }
}
