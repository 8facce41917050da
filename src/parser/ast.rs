// AST (Abstract Syntax Tree) definitions for the SIN front end

use super::operators::Operator;
use crate::types::{DataType, PrimaryKind, Qualities, QualityConflict};
use thiserror::Error;

/// Attributes selectable with the `:` operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    Length,
    Size,
    Variability,
}

impl Attribute {
    pub fn from_keyword(word: &str) -> Option<Attribute> {
        match word {
            "len" => Some(Attribute::Length),
            "size" => Some(Attribute::Size),
            "var" => Some(Attribute::Variability),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Attribute::Length => "len",
            Attribute::Size => "size",
            Attribute::Variability => "var",
        }
    }
}

/// Payload of a keyword expression
#[derive(Debug, Clone, PartialEq)]
pub enum KeywordValue {
    Type(DataType),
    /// `qualities` collects postfixed overrides until the selection is built
    Attribute {
        attribute: Attribute,
        qualities: Qualities,
    },
}

/// List kind, fixed by the opening grouping symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    /// `( a, b )`
    Tuple,
    /// `{ a, b }`
    Array,
}

/// One `member: value` pair of a construction
#[derive(Debug, Clone, PartialEq)]
pub struct Initializer {
    pub member: Expression,
    pub value: Expression,
}

/// Raised by [`Expression::override_qualities`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OverrideError {
    #[error("quality override not supported; use a typecast")]
    Unsupported,
    #[error(transparent)]
    Conflict(#[from] QualityConflict),
}

/// Discriminant of an [`Expression`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpressionKind {
    Literal,
    Identifier,
    Unary,
    Binary,
    Indexed,
    Procedure,
    Call,
    Construction,
    List,
    Keyword,
    AttributeSelection,
    Typecast,
}

/// Expression nodes.
///
/// Every variant carries a `constant` flag: true when the value is known at
/// compile time (literals, `constexpr`, and operations on constants).
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Literal {
        ty: DataType,
        value: String,
        constant: bool,
    },
    Identifier {
        name: String,
        constant: bool,
    },
    Unary {
        op: Operator,
        operand: Box<Expression>,
        constant: bool,
    },
    Binary {
        op: Operator,
        left: Box<Expression>,
        right: Box<Expression>,
        constant: bool,
    },
    Indexed {
        target: Box<Expression>,
        index: Box<Expression>,
        constant: bool,
    },
    /// `f(a, b)`; becomes a [`Expression::Call`] when prefixed with `@`
    Procedure {
        name: Box<Expression>,
        args: Vec<Expression>,
        constant: bool,
    },
    Call {
        name: Box<Expression>,
        args: Vec<Expression>,
        constant: bool,
    },
    Construction {
        explicit_type: Option<String>,
        initializers: Vec<Initializer>,
        has_default: bool,
        constant: bool,
    },
    List {
        kind: ListKind,
        elements: Vec<Expression>,
        qualities: Qualities,
        constant: bool,
    },
    Keyword {
        value: KeywordValue,
        constant: bool,
    },
    AttributeSelection {
        selected: Box<Expression>,
        attribute: Attribute,
        ty: DataType,
        constant: bool,
    },
    Typecast {
        operand: Box<Expression>,
        target: DataType,
        constant: bool,
    },
}

impl Expression {
    /// A literal of the given kind; literals are always constant
    pub fn literal(primary: PrimaryKind, value: impl Into<String>) -> Self {
        Expression::Literal {
            ty: DataType::literal(primary),
            value: value.into(),
            constant: true,
        }
    }

    /// The value of `return;` and `return void;`
    pub fn void_literal() -> Self {
        Expression::literal(PrimaryKind::Void, "void")
    }

    pub fn identifier(name: impl Into<String>) -> Self {
        Expression::Identifier {
            name: name.into(),
            constant: false,
        }
    }

    pub fn empty_list(kind: ListKind) -> Self {
        Expression::List {
            kind,
            elements: Vec::new(),
            qualities: Qualities::new(),
            constant: true,
        }
    }

    pub fn kind(&self) -> ExpressionKind {
        match self {
            Expression::Literal { .. } => ExpressionKind::Literal,
            Expression::Identifier { .. } => ExpressionKind::Identifier,
            Expression::Unary { .. } => ExpressionKind::Unary,
            Expression::Binary { .. } => ExpressionKind::Binary,
            Expression::Indexed { .. } => ExpressionKind::Indexed,
            Expression::Procedure { .. } => ExpressionKind::Procedure,
            Expression::Call { .. } => ExpressionKind::Call,
            Expression::Construction { .. } => ExpressionKind::Construction,
            Expression::List { .. } => ExpressionKind::List,
            Expression::Keyword { .. } => ExpressionKind::Keyword,
            Expression::AttributeSelection { .. } => ExpressionKind::AttributeSelection,
            Expression::Typecast { .. } => ExpressionKind::Typecast,
        }
    }

    fn constant_flag(&self) -> &bool {
        match self {
            Expression::Literal { constant, .. }
            | Expression::Identifier { constant, .. }
            | Expression::Unary { constant, .. }
            | Expression::Binary { constant, .. }
            | Expression::Indexed { constant, .. }
            | Expression::Procedure { constant, .. }
            | Expression::Call { constant, .. }
            | Expression::Construction { constant, .. }
            | Expression::List { constant, .. }
            | Expression::Keyword { constant, .. }
            | Expression::AttributeSelection { constant, .. }
            | Expression::Typecast { constant, .. } => constant,
        }
    }

    fn constant_flag_mut(&mut self) -> &mut bool {
        match self {
            Expression::Literal { constant, .. }
            | Expression::Identifier { constant, .. }
            | Expression::Unary { constant, .. }
            | Expression::Binary { constant, .. }
            | Expression::Indexed { constant, .. }
            | Expression::Procedure { constant, .. }
            | Expression::Call { constant, .. }
            | Expression::Construction { constant, .. }
            | Expression::List { constant, .. }
            | Expression::Keyword { constant, .. }
            | Expression::AttributeSelection { constant, .. }
            | Expression::Typecast { constant, .. } => constant,
        }
    }

    pub fn is_const(&self) -> bool {
        *self.constant_flag()
    }

    pub fn set_const(&mut self, constant: bool) {
        *self.constant_flag_mut() = constant;
    }

    /// Whether the node's type is known without semantic analysis
    pub fn has_type_information(&self) -> bool {
        matches!(
            self,
            Expression::Literal { .. }
                | Expression::Keyword { .. }
                | Expression::List { .. }
                | Expression::AttributeSelection { .. }
        )
    }

    /// Layer postfixed qualities onto a node with static type information
    pub fn override_qualities(&mut self, qualities: &Qualities) -> Result<(), OverrideError> {
        match self {
            Expression::Literal { ty, .. }
            | Expression::Keyword {
                value: KeywordValue::Type(ty),
                ..
            }
            | Expression::AttributeSelection { ty, .. } => Ok(ty.add_qualities(qualities)?),
            Expression::List {
                qualities: own,
                ..
            }
            | Expression::Keyword {
                value:
                    KeywordValue::Attribute {
                        qualities: own,
                        ..
                    },
                ..
            } => Ok(own.add_all(qualities)?),
            _ => Err(OverrideError::Unsupported),
        }
    }
}

/// Statement variants
#[derive(Debug, Clone, PartialEq)]
pub enum StatementKind {
    Include {
        filename: String,
    },
    /// `decl`: a variable, function or struct declaration without a definition
    Declaration {
        ty: DataType,
        name: String,
        /// Only legal for function parameters
        initial_value: Option<Expression>,
        is_function: bool,
        is_struct: bool,
        params: Vec<Statement>,
    },
    Allocation {
        ty: DataType,
        name: String,
        initial_value: Option<Expression>,
    },
    Assignment {
        lvalue: Expression,
        rvalue: Expression,
    },
    /// `let x += e;` stores `rvalue` as `x + e`
    CompoundAssignment {
        lvalue: Expression,
        rvalue: Expression,
        op: Operator,
    },
    /// The destination is always first, whichever arrow was written
    Movement {
        destination: Expression,
        source: Expression,
    },
    Return {
        value: Expression,
    },
    IfElse {
        condition: Expression,
        then_branch: Box<Statement>,
        else_branch: Option<Box<Statement>>,
    },
    While {
        condition: Expression,
        branch: Box<Statement>,
    },
    FunctionDefinition {
        name: String,
        return_type: DataType,
        params: Vec<Statement>,
        body: StatementBlock,
    },
    StructDefinition {
        name: String,
        body: StatementBlock,
    },
    ScopedBlock {
        block: StatementBlock,
    },
    Call {
        call: Expression,
    },
    Construction {
        target: Expression,
        construction: Expression,
    },
}

impl StatementKind {
    /// Short name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            StatementKind::Include { .. } => "include",
            StatementKind::Declaration { .. } => "declaration",
            StatementKind::Allocation { .. } => "allocation",
            StatementKind::Assignment { .. } => "assignment",
            StatementKind::CompoundAssignment { .. } => "compound assignment",
            StatementKind::Movement { .. } => "movement",
            StatementKind::Return { .. } => "return",
            StatementKind::IfElse { .. } => "if/else",
            StatementKind::While { .. } => "while loop",
            StatementKind::FunctionDefinition { .. } => "function definition",
            StatementKind::StructDefinition { .. } => "struct definition",
            StatementKind::ScopedBlock { .. } => "scoped block",
            StatementKind::Call { .. } => "call",
            StatementKind::Construction { .. } => "construction",
        }
    }
}

/// A statement and the line it starts on
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub kind: StatementKind,
    pub line: usize,
}

impl Statement {
    pub fn new(kind: StatementKind, line: usize) -> Self {
        Self { kind, line }
    }

    pub fn is_return(&self) -> bool {
        matches!(self.kind, StatementKind::Return { .. })
    }
}

/// A sequence of statements, e.g. a function body or the whole program
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatementBlock {
    pub statements: Vec<Statement>,
    /// Set when a `return` appears directly in this block
    pub has_return: bool,
}

impl StatementBlock {
    pub fn new() -> Self {
        StatementBlock::default()
    }

    pub fn push(&mut self, statement: Statement) {
        if statement.is_return() {
            self.has_return = true;
        }
        self.statements.push(statement);
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Statement> {
        self.statements.iter()
    }

    pub fn last(&self) -> Option<&Statement> {
        self.statements.last()
    }
}

impl<'a> IntoIterator for &'a StatementBlock {
    type Item = &'a Statement;
    type IntoIter = std::slice::Iter<'a, Statement>;

    fn into_iter(self) -> Self::IntoIter {
        self.statements.iter()
    }
}
