//! Compiler errors and diagnostics
//!
//! [`CompileError`] is the single error type raised by the front end. Every
//! error carries a numeric code (see [`code`]) and the line it occurred at or
//! near. Errors are fatal to the statement being parsed; the driver decides
//! whether the run as a whole continues.
//!
//! Warnings and notes are not errors. They are recorded as [`Diagnostic`]s and
//! never abort parsing.

use std::fmt;
use thiserror::Error;

/// Numeric error codes reported as `C{code}`
pub mod code {
    pub const UNEXPECTED_END_OF_INPUT: u32 = 1;
    pub const DATA_WIDTH: u32 = 3;
    pub const DUPLICATE_SYMBOL: u32 = 30;
    pub const ILLEGAL_OPERATION: u32 = 50;
    pub const NO_RETURN: u32 = 52;
    pub const EMPTY_SCOPE_BLOCK: u32 = 111;
    pub const TYPE_ERROR: u32 = 210;
    pub const OPERATOR_TYPE_ERROR: u32 = 212;
    pub const TYPE_VALIDITY: u32 = 220;
    pub const ILLEGAL_STRUCT_NAME: u32 = 226;
    pub const QUALITY_CONFLICT: u32 = 230;
    pub const ILLEGAL_QUALITY: u32 = 231;
    pub const INVALID_EXPRESSION_TYPE: u32 = 300;
    pub const MALFORMED_CONSTRUCT: u32 = 331;
    pub const UNSUPPORTED_FEATURE: u32 = 390;
    pub const INVALID_TOKEN: u32 = 400;
    pub const BAD_LITERAL: u32 = 401;
    pub const EXPECTED_SYMBOL_QUALITY: u32 = 402;
    pub const MISSING_SEMICOLON: u32 = 404;
    pub const MISSING_GROUPING_SYMBOL: u32 = 405;
    pub const MISSING_IDENTIFIER: u32 = 406;
    pub const INVALID_TYPE_SYNTAX: u32 = 407;
    pub const UNEXPECTED_KEYWORD: u32 = 410;
    pub const UNEXPECTED_SYMBOL_QUALITY: u32 = 412;
    pub const EXPECTED_INITIALIZATION: u32 = 421;
    pub const EXPECTED_LIST_INITIALIZATION: u32 = 422;
    pub const INCOMPLETE_TYPE: u32 = 430;
    pub const ERROR_BUDGET_EXCEEDED: u32 = 500;
    pub const NO_EFFECT: u32 = 900;
}

/// Result alias used throughout the front end
pub type CompileResult<T> = Result<T, CompileError>;

/// A fatal front-end error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Compiler error C{code}: {kind} (error occurred at or near line {line})", code = .kind.code())]
pub struct CompileError {
    pub kind: ErrorKind,
    pub line: usize,
}

impl CompileError {
    pub fn new(kind: ErrorKind, line: usize) -> Self {
        Self { kind, line }
    }

    pub fn code(&self) -> u32 {
        self.kind.code()
    }

    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }
}

/// Broad classification of error kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Lexical,
    Syntax,
    Quality,
    Semantic,
    Internal,
}

/// Every error the front end can raise
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    // Lexical
    #[error("Invalid numeric literal '{literal}'")]
    InvalidNumericLiteral { literal: String },

    #[error("Unrecognized character '{character}' at position {position}")]
    UnrecognizedCharacter { character: char, position: usize },

    // Syntax
    #[error("No more lexemes to parse")]
    UnexpectedEndOfInput,

    #[error("Invalid token '{token}'")]
    InvalidToken { token: String },

    #[error("Lexeme '{token}' is not a valid beginning to a statement")]
    InvalidStatementStart { token: String },

    #[error("Expected expression")]
    ExpectedExpression,

    #[error("Expected a filename in quotes in 'include' statement")]
    ExpectedFilename,

    #[error("Expected a semicolon")]
    MissingSemicolon,

    #[error("Expected '{symbol}' {context}")]
    MissingGroupingSymbol {
        symbol: &'static str,
        context: &'static str,
    },

    #[error("Expected identifier {context}")]
    MissingIdentifier { context: &'static str },

    #[error("{0}")]
    InvalidTypeSyntax(&'static str),

    #[error("Illegal list grouping symbol '{symbol}'")]
    IllegalListGrouping { symbol: String },

    #[error("Unexpected keyword '{keyword}'")]
    UnexpectedKeyword { keyword: String },

    #[error("Tuples must list at least 1 contained type")]
    EmptyTuple,

    #[error("Expected initialization")]
    ExpectedInitialization,

    #[error("Expected commas between initializations")]
    ExpectedListInitialization,

    #[error("{0}")]
    MalformedConstruct(&'static str),

    // Type and quality
    #[error("Invalid qualifier '{found}'")]
    ExpectedSymbolQuality { found: String },

    #[error("Expressions of this type may not utilize quality overrides; use a typecast instead")]
    UnexpectedSymbolQuality,

    #[error("Symbol quality '{quality}' may not be used here (there is a conflicting quality present)")]
    QualityConflict { quality: String },

    #[error("Illegal symbol quality '{quality}'")]
    IllegalQuality { quality: String },

    #[error("Type was parsed correctly, but violates SIN's type validity policy")]
    InvalidType,

    #[error("Invalid type specifier '{name}'")]
    InvalidTypeSpecifier { name: String },

    #[error("Expected a valid data type, found '{found}'")]
    ExpectedType { found: String },

    #[error("Expected struct name")]
    IllegalStructName,

    // Semantic-adjacent
    #[error("Return statement not found in function (perhaps not all control paths return a value?)")]
    NoReturn,

    #[error("Function '{name}' must return a value on every path (if type is void, use 'return void')")]
    FunctionWithoutReturn { name: String },

    #[error("Move assignment operator not supported with 'let'")]
    IllegalMoveOperator,

    #[error("Expected move assignment operator")]
    ExpectedMoveOperator,

    #[error("'{op}' is not a valid unary operator")]
    InvalidUnaryOperator { op: String },

    #[error("'{op}' may not be used as a binary operator")]
    InvalidBinaryOperator { op: String },

    #[error("{0}")]
    IllegalExpression(&'static str),

    #[error("Cannot use alloc-assign syntax in declarations unless said declaration is a default function parameter")]
    InitializerInDeclaration,

    #[error("Formal parameters in a function declaration must use 'decl' (not 'alloc')")]
    ParameterMustBeDeclaration,

    #[error("Symbol '{name}' already defined in this scope")]
    DuplicateSymbol { name: String },

    // Internal
    #[error("Expected procedure expression")]
    ExpectedProcedure,

    #[error("Unsupported feature: {0}")]
    UnsupportedFeature(&'static str),

    #[error("Too many errors ({errors}); aborting compilation")]
    ErrorBudgetExceeded { errors: usize },
}

impl ErrorKind {
    /// The numeric code reported alongside the message
    pub fn code(&self) -> u32 {
        match self {
            ErrorKind::InvalidNumericLiteral { .. } => code::BAD_LITERAL,
            ErrorKind::UnrecognizedCharacter { .. }
            | ErrorKind::InvalidToken { .. }
            | ErrorKind::InvalidStatementStart { .. }
            | ErrorKind::ExpectedExpression
            | ErrorKind::ExpectedFilename => code::INVALID_TOKEN,
            ErrorKind::UnexpectedEndOfInput => code::UNEXPECTED_END_OF_INPUT,
            ErrorKind::MissingSemicolon => code::MISSING_SEMICOLON,
            ErrorKind::MissingGroupingSymbol { .. } => code::MISSING_GROUPING_SYMBOL,
            ErrorKind::MissingIdentifier { .. } => code::MISSING_IDENTIFIER,
            ErrorKind::InvalidTypeSyntax(_) | ErrorKind::IllegalListGrouping { .. } => {
                code::INVALID_TYPE_SYNTAX
            }
            ErrorKind::UnexpectedKeyword { .. } => code::UNEXPECTED_KEYWORD,
            ErrorKind::EmptyTuple => code::INCOMPLETE_TYPE,
            ErrorKind::ExpectedInitialization => code::EXPECTED_INITIALIZATION,
            ErrorKind::ExpectedListInitialization => code::EXPECTED_LIST_INITIALIZATION,
            ErrorKind::MalformedConstruct(_) => code::MALFORMED_CONSTRUCT,
            ErrorKind::ExpectedSymbolQuality { .. } => code::EXPECTED_SYMBOL_QUALITY,
            ErrorKind::UnexpectedSymbolQuality => code::UNEXPECTED_SYMBOL_QUALITY,
            ErrorKind::QualityConflict { .. } => code::QUALITY_CONFLICT,
            ErrorKind::IllegalQuality { .. } => code::ILLEGAL_QUALITY,
            ErrorKind::InvalidType => code::TYPE_VALIDITY,
            ErrorKind::InvalidTypeSpecifier { .. } | ErrorKind::ExpectedType { .. } => {
                code::TYPE_ERROR
            }
            ErrorKind::IllegalStructName => code::ILLEGAL_STRUCT_NAME,
            ErrorKind::NoReturn | ErrorKind::FunctionWithoutReturn { .. } => code::NO_RETURN,
            ErrorKind::IllegalMoveOperator
            | ErrorKind::ExpectedMoveOperator
            | ErrorKind::InvalidUnaryOperator { .. }
            | ErrorKind::InvalidBinaryOperator { .. } => code::OPERATOR_TYPE_ERROR,
            ErrorKind::IllegalExpression(_) => code::INVALID_EXPRESSION_TYPE,
            ErrorKind::InitializerInDeclaration | ErrorKind::ParameterMustBeDeclaration => {
                code::ILLEGAL_OPERATION
            }
            ErrorKind::DuplicateSymbol { .. } => code::DUPLICATE_SYMBOL,
            ErrorKind::ExpectedProcedure | ErrorKind::UnsupportedFeature(_) => {
                code::UNSUPPORTED_FEATURE
            }
            ErrorKind::ErrorBudgetExceeded { .. } => code::ERROR_BUDGET_EXCEEDED,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ErrorKind::InvalidNumericLiteral { .. } | ErrorKind::UnrecognizedCharacter { .. } => {
                ErrorCategory::Lexical
            }
            ErrorKind::ExpectedSymbolQuality { .. }
            | ErrorKind::UnexpectedSymbolQuality
            | ErrorKind::QualityConflict { .. }
            | ErrorKind::IllegalQuality { .. } => ErrorCategory::Quality,
            ErrorKind::NoReturn
            | ErrorKind::FunctionWithoutReturn { .. }
            | ErrorKind::IllegalMoveOperator
            | ErrorKind::ExpectedMoveOperator
            | ErrorKind::InvalidUnaryOperator { .. }
            | ErrorKind::InvalidBinaryOperator { .. }
            | ErrorKind::IllegalExpression(_)
            | ErrorKind::InvalidType
            | ErrorKind::DuplicateSymbol { .. } => ErrorCategory::Semantic,
            ErrorKind::ExpectedProcedure
            | ErrorKind::UnsupportedFeature(_)
            | ErrorKind::ErrorBudgetExceeded { .. } => ErrorCategory::Internal,
            _ => ErrorCategory::Syntax,
        }
    }

    /// Attach a line number
    pub fn at(self, line: usize) -> CompileError {
        CompileError::new(self, line)
    }
}

/// Severity of a non-fatal diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Note,
}

/// A warning or note produced while parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub line: usize,
    pub code: Option<u32>,
}

impl Diagnostic {
    pub fn warning(message: impl Into<String>, line: usize, code: u32) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            line,
            code: Some(code),
        }
    }

    pub fn note(message: impl Into<String>, line: usize) -> Self {
        Self {
            severity: Severity::Note,
            message: message.into(),
            line,
            code: None,
        }
    }

    /// Send the diagnostic to the active `tracing` subscriber
    pub fn emit(&self) {
        match self.severity {
            Severity::Warning => tracing::warn!(line = self.line, code = ?self.code, "{}", self.message),
            Severity::Note => tracing::info!(line = self.line, "{}", self.message),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.severity, self.code) {
            (Severity::Warning, Some(code)) => write!(
                f,
                "Compiler warning W{}: {} (line {})",
                code, self.message, self.line
            ),
            (Severity::Warning, None) => {
                write!(f, "Compiler warning: {} (line {})", self.message, self.line)
            }
            (Severity::Note, _) => write!(f, "Note: {} (line {})", self.message, self.line),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_format() {
        let err = ErrorKind::MissingSemicolon.at(12);
        assert_eq!(
            err.to_string(),
            "Compiler error C404: Expected a semicolon (error occurred at or near line 12)"
        );
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(ErrorKind::NoReturn.code(), 52);
        assert_eq!(ErrorKind::EmptyTuple.code(), 430);
        assert_eq!(
            ErrorKind::QualityConflict {
                quality: "final".to_string()
            }
            .code(),
            230
        );
        assert_eq!(ErrorKind::InvalidType.code(), 220);
    }

    #[test]
    fn test_error_categories() {
        assert_eq!(
            ErrorKind::InvalidNumericLiteral {
                literal: "1.2.3".to_string()
            }
            .category(),
            ErrorCategory::Lexical
        );
        assert_eq!(ErrorKind::MissingSemicolon.category(), ErrorCategory::Syntax);
        assert_eq!(ErrorKind::NoReturn.category(), ErrorCategory::Semantic);
        assert_eq!(
            ErrorKind::UnsupportedFeature("x").category(),
            ErrorCategory::Internal
        );
    }

    #[test]
    fn test_diagnostic_display() {
        let warning = Diagnostic::warning("Empty function definition", 3, code::EMPTY_SCOPE_BLOCK);
        assert_eq!(
            warning.to_string(),
            "Compiler warning W111: Empty function definition (line 3)"
        );
        let note = Diagnostic::note("Unnecessary tuple", 7);
        assert_eq!(note.to_string(), "Note: Unnecessary tuple (line 7)");
    }
}
