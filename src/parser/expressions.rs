//! Expression parsing implementation
//!
//! Expressions are parsed with precedence climbing: [`Parser::parse_expression`]
//! produces a primary expression and hands it to [`Parser::maybe_binary`], which
//! decides whether it is the left operand of a binary operator.
//!
//! # Grammar
//!
//! ```text
//! expression ::= ["constexpr"] primary ["&" ("constexpr" | quality+)] (operator expression)*
//! primary    ::= literal | identifier | "(" list ")" | "{" list "}" | "[" expression "]"
//!              | "not" expression | "@" procedure | unary_op expression
//!              | "construct" [type_name] construction_body | attribute | type
//! list       ::= expression ("," expression)*
//! ```
//!
//! Generic binaries built on `:` and `as` are reclassified into attribute
//! selections and typecasts; `(` and `[` in operator position build
//! procedures and indexed expressions.

use crate::errors::{CompileResult, ErrorKind};
use crate::parser::ast::*;
use crate::parser::lexer::{Token, TokenKind};
use crate::parser::operators::Operator;
use crate::parser::parse::Parser;
use crate::types::{DataType, PrimaryKind, Qualities, QualityConflict};

/// Grouping symbols that open a sub-expression or list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grouping {
    Paren,
    Bracket,
    Brace,
}

impl Grouping {
    pub fn from_open(symbol: &str) -> Option<Grouping> {
        match symbol {
            "(" => Some(Grouping::Paren),
            "[" => Some(Grouping::Bracket),
            "{" => Some(Grouping::Brace),
            _ => None,
        }
    }

    pub fn open(self) -> &'static str {
        match self {
            Grouping::Paren => "(",
            Grouping::Bracket => "[",
            Grouping::Brace => "{",
        }
    }

    pub fn close(self) -> &'static str {
        match self {
            Grouping::Paren => ")",
            Grouping::Bracket => "]",
            Grouping::Brace => "}",
        }
    }

    fn list_kind(self, line: usize) -> CompileResult<ListKind> {
        match self {
            Grouping::Paren => Ok(ListKind::Tuple),
            Grouping::Brace => Ok(ListKind::Array),
            Grouping::Bracket => Err(ErrorKind::IllegalListGrouping {
                symbol: self.open().to_string(),
            }
            .at(line)),
        }
    }
}

/// Options threaded through an expression parse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExprOptions {
    /// Only operators binding tighter than this are absorbed
    pub min_prec: usize,
    /// The grouping whose closing symbol ends the expression
    pub closing: Grouping,
    /// Return the primary expression without looking for an operator
    pub not_binary: bool,
    /// Stop before `=`, compound assignments, arrows and `:`
    pub omit_equals: bool,
    /// Stop before `{`
    pub allow_brace: bool,
}

impl Default for ExprOptions {
    fn default() -> Self {
        Self::new(0)
    }
}

impl ExprOptions {
    pub fn new(min_prec: usize) -> Self {
        Self {
            min_prec,
            closing: Grouping::Paren,
            not_binary: false,
            omit_equals: false,
            allow_brace: false,
        }
    }

    pub fn within(mut self, closing: Grouping) -> Self {
        self.closing = closing;
        self
    }

    pub fn not_binary(mut self) -> Self {
        self.not_binary = true;
        self
    }

    pub fn omit_equals(mut self) -> Self {
        self.omit_equals = true;
        self
    }

    pub fn allow_brace(mut self) -> Self {
        self.allow_brace = true;
        self
    }

    /// Same context, different precedence floor, operators allowed
    fn operand(self, min_prec: usize) -> Self {
        Self {
            min_prec,
            not_binary: false,
            ..self
        }
    }
}

/// Type of an attribute selection: `int &unsigned final` plus any overrides
fn attribute_type(overrides: &Qualities) -> Result<DataType, QualityConflict> {
    let mut ty = DataType::new(PrimaryKind::Int, Qualities::unsigned_final());
    ty.add_qualities(overrides)?;
    Ok(ty)
}

fn literal_kind(kind: TokenKind) -> Option<PrimaryKind> {
    match kind {
        TokenKind::Int => Some(PrimaryKind::Int),
        TokenKind::Float => Some(PrimaryKind::Float),
        TokenKind::Str => Some(PrimaryKind::String),
        TokenKind::Char => Some(PrimaryKind::Char),
        TokenKind::Bool => Some(PrimaryKind::Bool),
        _ => None,
    }
}

impl Parser {
    /// Parse an expression starting at the current token
    pub fn parse_expression(&mut self, options: ExprOptions) -> CompileResult<Expression> {
        let mut is_constexpr = self.match_keyword("constexpr");
        let mut not_binary = options.not_binary;

        let token = self.advance().clone();
        let mut left = match token.kind {
            TokenKind::Eof => return Err(ErrorKind::UnexpectedEndOfInput.at(token.line)),
            TokenKind::Identifier => Expression::identifier(token.text),
            TokenKind::Keyword => self.parse_keyword_expression(&token, options)?,
            TokenKind::Operator => self.parse_prefix_operator(&token, options)?,
            TokenKind::Punctuation => match Grouping::from_open(&token.text) {
                Some(group) => {
                    let (expr, is_list) = self.parse_grouped(group)?;
                    // List literals never take part in binary expressions
                    if is_list {
                        not_binary = true;
                    }
                    expr
                }
                None => {
                    return Err(ErrorKind::InvalidToken { token: token.text }.at(token.line));
                }
            },
            kind => match literal_kind(kind) {
                Some(primary) => Expression::literal(primary, token.text),
                None => {
                    return Err(ErrorKind::InvalidToken { token: token.text }.at(token.line));
                }
            },
        };

        // Postfixed `&constexpr` or quality override
        if self.check_operator("&") && self.peek_ahead(1).is_some_and(|t| t.kind == TokenKind::Keyword) {
            self.advance();
            if self.match_keyword("constexpr") {
                is_constexpr = true;
            } else {
                self.apply_postfix_qualities(&mut left)?;
            }
        }

        if is_constexpr || left.kind() == ExpressionKind::Literal {
            left.set_const(true);
        }

        if not_binary {
            return Ok(left);
        }

        if options.omit_equals
            && self
                .peek()
                .as_operator()
                .is_some_and(|op| op.is_copy_assignment() || op.is_move_assignment())
        {
            return Ok(left);
        }

        self.maybe_binary(left, options.min_prec, options)
    }

    /// Decide whether `left` is the left operand of a binary expression.
    ///
    /// Operators binding tighter than `my_prec` are absorbed, recursing on the
    /// right operand first so tighter operators to its right are grouped
    /// there. The result is fed back in at `my_prec`, which makes
    /// equal-precedence chains left-associative.
    pub(crate) fn maybe_binary(
        &mut self,
        left: Expression,
        my_prec: usize,
        options: ExprOptions,
    ) -> CompileResult<Expression> {
        let next = self.peek().clone();

        if next.kind == TokenKind::Eof
            || next.is_punctuation(";")
            || next.is_punctuation(",")
            || next.is_punctuation(options.closing.close())
            || (options.allow_brace && next.is_punctuation("{"))
        {
            return Ok(left);
        }

        let Some(op) = next.as_operator() else {
            return Err(ErrorKind::InvalidToken { token: next.text }.at(next.line));
        };

        if op.is_move_assignment()
            || (options.omit_equals
                && (op.is_copy_assignment() || op == Operator::AttributeSelection))
        {
            return Ok(left);
        }

        // `&` before a keyword introduces postfixed qualities, not bitwise-and
        if op == Operator::BitAnd
            && self.peek_ahead(1).is_some_and(|t| t.kind == TokenKind::Keyword)
        {
            return Ok(left);
        }

        if op.is_prefix_only() {
            return Err(ErrorKind::InvalidBinaryOperator { op: next.text }.at(next.line));
        }

        let his_prec = op.precedence();
        if his_prec <= my_prec {
            return Ok(left);
        }

        self.advance();

        let combined = match op {
            Operator::Index => {
                let index =
                    self.parse_expression(ExprOptions::new(0).within(Grouping::Bracket))?;
                self.expect_punctuation("]", "to close index expression")?;
                Expression::Indexed {
                    target: Box::new(left),
                    index: Box::new(index),
                    constant: false,
                }
            }
            Operator::ProcOperator => {
                // Reparse from the `(` so the arguments come back as one list
                self.retreat();
                let args = match self.parse_expression(options.operand(0).not_binary())? {
                    Expression::List { elements, .. } => elements,
                    single => vec![single],
                };
                Expression::Procedure {
                    name: Box::new(left),
                    args,
                    constant: false,
                }
            }
            _ => {
                let right = self.parse_expression(options.operand(his_prec))?;
                let right = self.maybe_binary(right, his_prec, options)?;
                Self::reclassify(op, left, right, next.line)?
            }
        };

        self.maybe_binary(combined, my_prec, options)
    }

    /// Turn a generic binary into the node its operator calls for
    fn reclassify(
        op: Operator,
        left: Expression,
        right: Expression,
        line: usize,
    ) -> CompileResult<Expression> {
        let constant = left.is_const() && right.is_const();

        match op {
            Operator::AttributeSelection => match right {
                Expression::Keyword {
                    value:
                        KeywordValue::Attribute {
                            attribute,
                            qualities,
                        },
                    ..
                } => {
                    let ty = attribute_type(&qualities).map_err(|conflict| {
                        ErrorKind::QualityConflict {
                            quality: conflict.quality.to_string(),
                        }
                        .at(line)
                    })?;
                    Ok(Expression::AttributeSelection {
                        selected: Box::new(left),
                        attribute,
                        ty,
                        constant,
                    })
                }
                _ => Err(ErrorKind::IllegalExpression("Illegal expression").at(line)),
            },
            Operator::Typecast => match right {
                Expression::Keyword {
                    value: KeywordValue::Type(target),
                    ..
                } => Ok(Expression::Typecast {
                    constant: left.is_const(),
                    operand: Box::new(left),
                    target,
                }),
                _ => Err(ErrorKind::IllegalExpression("Illegal expression").at(line)),
            },
            _ => Ok(Expression::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
                constant,
            }),
        }
    }

    /// Parse the inside of a grouping symbol whose opener was just consumed.
    ///
    /// Returns the expression and whether it is a list.
    fn parse_grouped(&mut self, group: Grouping) -> CompileResult<(Expression, bool)> {
        let close = group.close();

        if self.check_punctuation(close) {
            let kind = group.list_kind(self.current_line())?;
            self.advance();
            return Ok((Expression::empty_list(kind), true));
        }

        let inner = ExprOptions::new(0).within(group);
        let first = self.parse_expression(inner)?;

        if !self.check_punctuation(",") {
            self.expect_punctuation(close, "to close grouped expression")?;
            return Ok((first, false));
        }

        let kind = group.list_kind(self.current_line())?;
        let mut elements = vec![first];
        while self.match_punctuation(",") {
            elements.push(self.parse_expression(inner)?);
        }
        self.expect_punctuation(close, "to close list")?;

        let constant = elements.iter().all(Expression::is_const);
        Ok((
            Expression::List {
                kind,
                elements,
                qualities: Qualities::new(),
                constant,
            },
            true,
        ))
    }

    /// Expressions beginning with a keyword; the keyword is already consumed
    fn parse_keyword_expression(
        &mut self,
        token: &Token,
        options: ExprOptions,
    ) -> CompileResult<Expression> {
        if token.text == "not" {
            let operand = self.parse_expression(options.operand(Operator::Not.precedence()))?;
            return Ok(Expression::Unary {
                op: Operator::Not,
                constant: operand.is_const(),
                operand: Box::new(operand),
            });
        }

        if let Some(attribute) = Attribute::from_keyword(&token.text) {
            return Ok(Expression::Keyword {
                value: KeywordValue::Attribute {
                    attribute,
                    qualities: Qualities::new(),
                },
                constant: false,
            });
        }

        if token.text == "construct" {
            let explicit_type = match self.peek().kind {
                TokenKind::Keyword | TokenKind::Identifier => Some(self.advance().text.clone()),
                _ => None,
            };
            return self.parse_construction_body(explicit_type);
        }

        self.retreat();
        match self.parse_type() {
            Ok(ty) => Ok(Expression::Keyword {
                value: KeywordValue::Type(ty),
                constant: false,
            }),
            Err(_) => Err(ErrorKind::UnexpectedKeyword {
                keyword: token.text.clone(),
            }
            .at(token.line)),
        }
    }

    /// Expressions beginning with an operator; the operator is already consumed
    fn parse_prefix_operator(
        &mut self,
        token: &Token,
        options: ExprOptions,
    ) -> CompileResult<Expression> {
        if token.text == "@" {
            let target =
                self.parse_expression(options.operand(Operator::ControlTransfer.precedence()))?;
            return match target {
                Expression::Procedure {
                    name,
                    args,
                    constant,
                } => Ok(Expression::Call {
                    name,
                    args,
                    constant,
                }),
                _ => Err(ErrorKind::ExpectedProcedure.at(token.line)),
            };
        }

        let op = Operator::from_symbol(&token.text)
            .and_then(Operator::to_unary)
            .ok_or_else(|| {
                ErrorKind::InvalidUnaryOperator {
                    op: token.text.clone(),
                }
                .at(token.line)
            })?;

        let operand = self.parse_expression(options.operand(op.precedence()))?;
        Ok(Expression::Unary {
            op,
            constant: operand.is_const(),
            operand: Box::new(operand),
        })
    }

    /// Parse the qualities after a postfixed `&` and apply them to `expr`
    fn apply_postfix_qualities(&mut self, expr: &mut Expression) -> CompileResult<()> {
        let line = self.current_line();
        let qualities = self.parse_postfix_qualities().map_err(|err| match err.kind {
            ErrorKind::QualityConflict { .. } => err,
            _ => ErrorKind::ExpectedSymbolQuality {
                found: self.peek().text.clone(),
            }
            .at(line),
        })?;

        expr.override_qualities(&qualities).map_err(|err| match err {
            OverrideError::Unsupported => ErrorKind::UnexpectedSymbolQuality.at(line),
            OverrideError::Conflict(conflict) => ErrorKind::QualityConflict {
                quality: conflict.quality.to_string(),
            }
            .at(line),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::code;

    fn parse(source: &str) -> Expression {
        let mut parser = Parser::new(source).unwrap();
        parser.parse_expression(ExprOptions::new(0)).unwrap()
    }

    fn parse_err(source: &str) -> crate::errors::CompileError {
        let mut parser = Parser::new(source).unwrap();
        parser.parse_expression(ExprOptions::new(0)).unwrap_err()
    }

    fn literal_value(expr: &Expression) -> &str {
        match expr {
            Expression::Literal { value, .. } => value,
            _ => panic!("Expected literal, got {:?}", expr),
        }
    }

    #[test]
    fn test_precedence() {
        let expr = parse("3 + 4 * 5 - 6");
        match &expr {
            Expression::Binary {
                op: Operator::Minus,
                left,
                right,
                ..
            } => {
                assert_eq!(literal_value(right), "6");
                match left.as_ref() {
                    Expression::Binary {
                        op: Operator::Plus,
                        left,
                        right,
                        ..
                    } => {
                        assert_eq!(literal_value(left), "3");
                        assert!(matches!(
                            right.as_ref(),
                            Expression::Binary {
                                op: Operator::Mult,
                                ..
                            }
                        ));
                    }
                    _ => panic!("Expected addition"),
                }
            }
            _ => panic!("Expected subtraction at the root"),
        }
        assert!(expr.is_const());
    }

    #[test]
    fn test_left_associativity() {
        match parse("8 - 3 - 2") {
            Expression::Binary {
                op: Operator::Minus,
                left,
                right,
                ..
            } => {
                assert_eq!(literal_value(&right), "2");
                assert!(matches!(
                    *left,
                    Expression::Binary {
                        op: Operator::Minus,
                        ..
                    }
                ));
            }
            _ => panic!("Expected subtraction"),
        }
    }

    #[test]
    fn test_parenthesized_group() {
        match parse("(3 + 4) * 5") {
            Expression::Binary {
                op: Operator::Mult,
                left,
                ..
            } => assert!(matches!(
                *left,
                Expression::Binary {
                    op: Operator::Plus,
                    ..
                }
            )),
            _ => panic!("Expected multiplication"),
        }
    }

    #[test]
    fn test_call_arguments() {
        match parse("@f(1, 2)") {
            Expression::Call { name, args, .. } => {
                assert_eq!(*name, Expression::identifier("f"));
                assert_eq!(args.len(), 2);
                assert_eq!(literal_value(&args[0]), "1");
                assert_eq!(literal_value(&args[1]), "2");
            }
            _ => panic!("Expected call"),
        }
    }

    #[test]
    fn test_call_single_and_empty_arguments() {
        match parse("@f(x + 1)") {
            Expression::Call { args, .. } => {
                assert_eq!(args.len(), 1);
                assert_eq!(args[0].kind(), ExpressionKind::Binary);
            }
            _ => panic!("Expected call"),
        }
        match parse("@f()") {
            Expression::Call { args, .. } => assert!(args.is_empty()),
            _ => panic!("Expected call"),
        }
    }

    #[test]
    fn test_call_result_in_binary() {
        match parse("@f(1) + 2") {
            Expression::Binary { left, .. } => assert_eq!(left.kind(), ExpressionKind::Call),
            _ => panic!("Expected binary"),
        }
    }

    #[test]
    fn test_member_call() {
        match parse("@obj.method(1)") {
            Expression::Call { name, args, .. } => {
                assert!(matches!(
                    *name,
                    Expression::Binary {
                        op: Operator::Dot,
                        ..
                    }
                ));
                assert_eq!(args.len(), 1);
            }
            _ => panic!("Expected call"),
        }
    }

    #[test]
    fn test_call_requires_procedure() {
        let err = parse_err("@x;");
        assert_eq!(err.kind, ErrorKind::ExpectedProcedure);
    }

    #[test]
    fn test_attribute_selection() {
        match parse("x:size") {
            Expression::AttributeSelection {
                selected,
                attribute,
                ty,
                ..
            } => {
                assert_eq!(*selected, Expression::identifier("x"));
                assert_eq!(attribute, Attribute::Size);
                assert!(ty.qualities().is_unsigned());
                assert!(ty.qualities().is_final());
            }
            _ => panic!("Expected attribute selection"),
        }
    }

    #[test]
    fn test_attribute_selection_needs_attribute() {
        let err = parse_err("x:y");
        assert_eq!(err.code(), code::INVALID_EXPRESSION_TYPE);
    }

    #[test]
    fn test_attribute_selection_quality_override() {
        match parse("x:size &final") {
            Expression::AttributeSelection { attribute, ty, .. } => {
                assert_eq!(attribute, Attribute::Size);
                assert!(ty.qualities().is_final());
                assert!(ty.qualities().is_unsigned());
            }
            _ => panic!("Expected attribute selection"),
        }

        match parse("arr:len &long") {
            Expression::AttributeSelection { ty, .. } => {
                assert!(ty.qualities().is_long());
                assert!(ty.qualities().is_final());
            }
            _ => panic!("Expected attribute selection"),
        }

        // Attributes are always final
        let err = parse_err("x:size &const");
        assert!(matches!(err.kind, ErrorKind::QualityConflict { .. }));
    }

    #[test]
    fn test_typecast() {
        match parse("x as long int") {
            Expression::Typecast {
                operand, target, ..
            } => {
                assert_eq!(*operand, Expression::identifier("x"));
                assert_eq!(target.primary(), PrimaryKind::Int);
                assert!(target.qualities().is_long());
            }
            _ => panic!("Expected typecast"),
        }
    }

    #[test]
    fn test_lists() {
        match parse("(1, 2, 3)") {
            Expression::List {
                kind,
                elements,
                constant,
                ..
            } => {
                assert_eq!(kind, ListKind::Tuple);
                assert_eq!(elements.len(), 3);
                assert!(constant);
            }
            _ => panic!("Expected tuple"),
        }
        match parse("{x, 2}") {
            Expression::List {
                kind, constant, ..
            } => {
                assert_eq!(kind, ListKind::Array);
                assert!(!constant);
            }
            _ => panic!("Expected array"),
        }
    }

    #[test]
    fn test_first_list_element_counts_for_constness() {
        match parse("(x, 1)") {
            Expression::List { constant, .. } => assert!(!constant),
            _ => panic!("Expected tuple"),
        }
    }

    #[test]
    fn test_bracket_list_rejected() {
        let err = parse_err("[1, 2]");
        assert!(matches!(err.kind, ErrorKind::IllegalListGrouping { .. }));
    }

    #[test]
    fn test_index() {
        match parse("a[i + 1]") {
            Expression::Indexed { target, index, .. } => {
                assert_eq!(*target, Expression::identifier("a"));
                assert_eq!(index.kind(), ExpressionKind::Binary);
            }
            _ => panic!("Expected indexed expression"),
        }
        match parse("a[(i + 1)] * 2") {
            Expression::Binary { left, .. } => assert_eq!(left.kind(), ExpressionKind::Indexed),
            _ => panic!("Expected binary"),
        }
    }

    #[test]
    fn test_unary_binds_tighter() {
        match parse("-x * y") {
            Expression::Binary {
                op: Operator::Mult,
                left,
                ..
            } => assert!(matches!(
                *left,
                Expression::Unary {
                    op: Operator::UnaryMinus,
                    ..
                }
            )),
            _ => panic!("Expected multiplication"),
        }
        match parse("not x and y") {
            Expression::Binary {
                op: Operator::And,
                left,
                ..
            } => assert!(matches!(
                *left,
                Expression::Unary {
                    op: Operator::Not,
                    ..
                }
            )),
            _ => panic!("Expected logical and"),
        }
    }

    #[test]
    fn test_invalid_operators() {
        let err = parse_err("/x");
        assert!(matches!(err.kind, ErrorKind::InvalidUnaryOperator { .. }));
        let err = parse_err("a ~ b");
        assert!(matches!(err.kind, ErrorKind::InvalidBinaryOperator { .. }));
        let err = parse_err("a b");
        assert!(matches!(err.kind, ErrorKind::InvalidToken { .. }));
    }

    #[test]
    fn test_postfix_constexpr() {
        let expr = parse("x &constexpr");
        assert!(expr.is_const());
        let expr = parse("constexpr y");
        assert!(expr.is_const());
    }

    #[test]
    fn test_postfix_quality_override() {
        match parse("5 &long") {
            Expression::Literal { ty, constant, .. } => {
                assert!(ty.qualities().is_long());
                assert!(constant);
            }
            _ => panic!("Expected literal"),
        }
        let err = parse_err("x &long");
        assert_eq!(err.kind, ErrorKind::UnexpectedSymbolQuality);
        let err = parse_err("5 &if");
        assert!(matches!(err.kind, ErrorKind::ExpectedSymbolQuality { .. }));
    }

    #[test]
    fn test_stops_at_movement_and_assignment() {
        let mut parser = Parser::new("x <- y").unwrap();
        let expr = parser.parse_expression(ExprOptions::new(0)).unwrap();
        assert_eq!(expr, Expression::identifier("x"));
        assert!(parser.check_operator("<-"));

        let mut parser = Parser::new("a[3] = 0").unwrap();
        let expr = parser
            .parse_expression(ExprOptions::new(0).omit_equals())
            .unwrap();
        assert_eq!(expr.kind(), ExpressionKind::Indexed);
        assert!(parser.check_operator("="));
    }

    #[test]
    fn test_equality_without_omit() {
        match parse("a = b") {
            Expression::Binary { op, .. } => assert_eq!(op, Operator::Equal),
            _ => panic!("Expected comparison"),
        }
    }

    #[test]
    fn test_unexpected_keyword() {
        let err = parse_err("if");
        assert!(matches!(err.kind, ErrorKind::UnexpectedKeyword { .. }));
    }

    #[test]
    fn test_end_of_input() {
        let err = parse_err("");
        assert_eq!(err.kind, ErrorKind::UnexpectedEndOfInput);
    }
}
