//! Type parsing implementation
//!
//! Handles the type grammar shared by declarations, allocations, typecasts and
//! array lengths:
//!
//! ```text
//! type        ::= quality* type_name
//! type_name   ::= "ptr" "<" subtype ">" | "ref" "<" subtype ">"
//!               | "array" "<" [expression ","] subtype ">"
//!               | "tuple" "<" subtype ("," subtype)* ">"
//!               | keyword | identifier
//! subtype     ::= type ["&" quality+]
//! ```
//!
//! A closing `>>` is split so nested contained types can be closed together.

use crate::errors::{code, CompileResult, ErrorKind};
use crate::parser::expressions::ExprOptions;
use crate::parser::lexer::{Token, TokenKind};
use crate::parser::parse::Parser;
use crate::types::{ArrayLength, DataType, PrimaryKind, Qualities, Quality, QualityConflict};

fn conflict_error(conflict: QualityConflict, line: usize) -> crate::errors::CompileError {
    ErrorKind::QualityConflict {
        quality: conflict.quality.to_string(),
    }
    .at(line)
}

/// Translate a keyword token into a quality
fn quality_from_token(token: &Token) -> CompileResult<Quality> {
    match token.text.as_str() {
        // Calling conventions are reserved words, rejected as qualities
        "sincall" | "c64" | "windows" => Err(ErrorKind::IllegalQuality {
            quality: token.text.clone(),
        }
        .at(token.line)),
        word => Quality::from_keyword(word).ok_or_else(|| {
            ErrorKind::ExpectedSymbolQuality {
                found: word.to_string(),
            }
            .at(token.line)
        }),
    }
}

impl Parser {
    /// Parse a type, including its prefixed qualities
    pub(crate) fn parse_type(&mut self) -> CompileResult<DataType> {
        let line = self.current_line();
        let qualities = self.parse_prefix_qualities()?;
        let token = self.advance().clone();

        let ty = if token.is_keyword("ptr") || token.is(TokenKind::Identifier, "ref") {
            if !self.match_operator("<") {
                return Err(ErrorKind::InvalidTypeSyntax(
                    "Proper syntax is 'ptr< T >' or 'ref< T >'",
                )
                .at(token.line));
            }
            let subtype = self.parse_subtype()?;
            if token.is_keyword("ptr") {
                DataType::pointer_to(subtype, qualities)
            } else {
                DataType::reference_to(subtype, qualities)
            }
        } else if token.is_keyword("array") {
            self.parse_array_type(qualities, token.line)?
        } else if token.is_keyword("tuple") {
            self.parse_tuple_type(qualities, token.line)?
        } else {
            match token.kind {
                TokenKind::Keyword | TokenKind::Identifier => {
                    match PrimaryKind::from_keyword(&token.text) {
                        PrimaryKind::Struct if token.kind == TokenKind::Keyword => {
                            return Err(ErrorKind::InvalidTypeSpecifier { name: token.text }
                                .at(token.line));
                        }
                        PrimaryKind::Struct => DataType::struct_named(token.text, qualities),
                        primary => DataType::new(primary, qualities),
                    }
                }
                _ => {
                    return Err(ErrorKind::ExpectedType { found: token.text }.at(token.line));
                }
            }
        };

        for quality in ty.qualities().listed() {
            if ty.quality_has_no_effect(quality) {
                self.note(
                    format!("Quality '{}' has no effect on type '{}'", quality, ty.primary()),
                    line,
                );
            }
        }
        if ty.is_half_precision() {
            self.warn(
                "16-bit half-precision floats are not supported; 'short float' is single precision",
                line,
                code::DATA_WIDTH,
            );
        }

        Ok(ty)
    }

    /// `array<T>` or `array<N, T>`; the cursor is just past `array`
    fn parse_array_type(&mut self, qualities: Qualities, line: usize) -> CompileResult<DataType> {
        if !self.match_operator("<") {
            return Err(ErrorKind::InvalidTypeSyntax(
                "Proper syntax is 'array< N, T >' where N is an integer expression and T is the contained type",
            )
            .at(line));
        }

        if self.peek().kind == TokenKind::Keyword {
            let subtype = self.parse_subtype()?;
            return Ok(DataType::array_of(
                subtype,
                ArrayLength::Unspecified,
                qualities,
            ));
        }

        let length = self.parse_expression(ExprOptions::new(0))?;
        if !self.match_punctuation(",") {
            return Err(ErrorKind::InvalidTypeSyntax(
                "The size of an array must be followed by the type",
            )
            .at(line));
        }
        let subtype = self.parse_subtype()?;

        Ok(DataType::array_of(
            subtype,
            ArrayLength::from_expression(length),
            qualities,
        ))
    }

    /// `tuple<T, ...>`; the cursor is just past `tuple`
    fn parse_tuple_type(&mut self, qualities: Qualities, line: usize) -> CompileResult<DataType> {
        if !self.match_operator("<") {
            return Err(
                ErrorKind::InvalidTypeSyntax("Proper syntax is 'tuple< T, ... >'").at(line),
            );
        }

        let mut members = Vec::new();
        while matches!(self.peek().kind, TokenKind::Keyword | TokenKind::Identifier) {
            members.push(self.parse_contained_type()?);

            if !self.match_punctuation(",") && !self.check_closing_angle() {
                return Err(ErrorKind::InvalidTypeSyntax(
                    "Expected type, comma, or closing angle bracket",
                )
                .at(self.current_line()));
            }
        }
        self.expect_closing_angle()?;

        match members.len() {
            0 => return Err(ErrorKind::EmptyTuple.at(line)),
            1 => self.note("Unnecessary tuple (contains only one element)", line),
            _ => {}
        }

        Ok(DataType::tuple_of(members, qualities))
    }

    /// A contained type and its closing `>`
    fn parse_subtype(&mut self) -> CompileResult<DataType> {
        let subtype = self.parse_contained_type()?;
        self.expect_closing_angle()?;
        Ok(subtype)
    }

    /// A type inside angle brackets, with optional postfixed qualities
    fn parse_contained_type(&mut self) -> CompileResult<DataType> {
        let mut ty = self.parse_type()?;
        self.parse_postfixed_type_qualities(&mut ty)?;
        Ok(ty)
    }

    /// Layer `& quality+` onto `ty` if the next token is `&`
    pub(crate) fn parse_postfixed_type_qualities(&mut self, ty: &mut DataType) -> CompileResult<()> {
        if self.match_operator("&") {
            let line = self.previous_line();
            let qualities = self.parse_postfix_qualities()?;
            ty.add_qualities(&qualities)
                .map_err(|conflict| conflict_error(conflict, line))?;
        }
        Ok(())
    }

    /// Qualities before a type name; stops at the first type keyword or
    /// non-keyword token
    pub(crate) fn parse_prefix_qualities(&mut self) -> CompileResult<Qualities> {
        let mut qualities = Qualities::new();
        while self.peek().kind == TokenKind::Keyword
            && !PrimaryKind::is_type_keyword(&self.peek().text)
        {
            let token = self.advance().clone();
            let quality = quality_from_token(&token)?;
            qualities
                .add(quality)
                .map_err(|conflict| conflict_error(conflict, token.line))?;
        }
        Ok(qualities)
    }

    /// Qualities after a postfixed `&`, which has already been consumed.
    ///
    /// At least one quality keyword is required.
    pub(crate) fn parse_postfix_qualities(&mut self) -> CompileResult<Qualities> {
        if self.peek().kind != TokenKind::Keyword {
            return Err(ErrorKind::ExpectedSymbolQuality {
                found: self.peek().text.clone(),
            }
            .at(self.current_line()));
        }

        let mut qualities = Qualities::new();
        while self.peek().kind == TokenKind::Keyword {
            let token = self.advance().clone();
            let quality = quality_from_token(&token)?;
            qualities
                .add(quality)
                .map_err(|conflict| conflict_error(conflict, token.line))?;
        }
        Ok(qualities)
    }

    fn check_closing_angle(&self) -> bool {
        let token = self.peek();
        token.kind == TokenKind::Operator
            && !token.text.is_empty()
            && token.text.chars().all(|c| c == '>')
    }

    /// Consume one `>`. A `>>` token is split and its remainder left in place
    fn expect_closing_angle(&mut self) -> CompileResult<()> {
        if !self.check_closing_angle() {
            return Err(ErrorKind::MissingGroupingSymbol {
                symbol: ">",
                context: "to close contained type",
            }
            .at(self.current_line()));
        }

        let position = self.position;
        let token = &mut self.tokens[position];
        if token.text.len() == 1 {
            self.advance();
        } else {
            token.text.remove(0);
        }
        Ok(())
    }
}
