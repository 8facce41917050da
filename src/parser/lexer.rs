//! Lexer (tokenizer) for SIN source code
//!
//! Converts raw source text into a flat [`Token`] stream consumed by the parser.
//! CRLF line endings are normalized to LF before lexing, and every token
//! records the 1-based line it starts on.
//!
//! Escape sequences in string and char literals are kept verbatim; resolving
//! them is left to code generation.

use super::operators::Operator;
use crate::errors::{CompileResult, ErrorKind};
use std::fmt;

/// The fixed, case-sensitive keyword set
pub const KEYWORDS: &[&str] = &[
    "alloc", "and", "array", "as", "asm", "bool", "char", "const", "constexpr", "construct", "c64",
    "decl", "def", "default", "dynamic", "else", "extern", "final", "float", "free", "if",
    "include", "int", "is", "len", "let", "long", "move", "not", "null", "or", "pass", "private",
    "proc", "ptr", "public", "raw", "readonly", "realloc", "return", "short", "signed", "sincall",
    "size", "static", "string", "struct", "tuple", "typename", "unmanaged", "unsigned", "var",
    "void", "while", "windows", "xor",
];

/// Single-character punctuation; never coalesced
const PUNCTUATION: &[char] = &[',', ';', '[', ']', '{', '}', '(', ')'];

/// Characters that may begin an operator
const OPERATOR_CHARS: &[char] = &[
    '.', '+', '-', '*', '/', '%', '=', '&', '|', '^', '<', '>', '$', '?', '!', '~', '@', '#', ':',
];

pub fn is_keyword(word: &str) -> bool {
    KEYWORDS.contains(&word)
}

/// Lexeme classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Int,
    Float,
    Str,
    Char,
    Bool,
    Identifier,
    Keyword,
    Punctuation,
    Operator,
    Eof,
}

/// A classified piece of source text.
///
/// Equality compares kind and text only, so tokens can be matched against
/// expected lexemes regardless of where they appeared.
#[derive(Debug, Clone, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: usize,
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.text == other.text
    }
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, line: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            line,
        }
    }

    pub fn eof(line: usize) -> Self {
        Self::new(TokenKind::Eof, "", line)
    }

    pub fn is(&self, kind: TokenKind, text: &str) -> bool {
        self.kind == kind && self.text == text
    }

    pub fn is_keyword(&self, word: &str) -> bool {
        self.is(TokenKind::Keyword, word)
    }

    pub fn is_punctuation(&self, symbol: &str) -> bool {
        self.is(TokenKind::Punctuation, symbol)
    }

    pub fn is_operator(&self, symbol: &str) -> bool {
        self.is(TokenKind::Operator, symbol)
    }

    pub fn is_literal(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Int | TokenKind::Float | TokenKind::Str | TokenKind::Char | TokenKind::Bool
        )
    }

    /// The operator this token spells, for operator, keyword and punctuation tokens
    pub fn as_operator(&self) -> Option<Operator> {
        match self.kind {
            TokenKind::Operator | TokenKind::Keyword | TokenKind::Punctuation => {
                Operator::from_symbol(&self.text)
            }
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Int => write!(f, "int literal {}", self.text),
            TokenKind::Float => write!(f, "float literal {}", self.text),
            TokenKind::Str => write!(f, "string literal \"{}\"", self.text),
            TokenKind::Char => write!(f, "char literal '{}'", self.text),
            TokenKind::Bool => write!(f, "bool literal {}", self.text),
            TokenKind::Identifier => write!(f, "identifier '{}'", self.text),
            TokenKind::Keyword
            | TokenKind::Punctuation
            | TokenKind::Operator => write!(f, "'{}'", self.text),
            TokenKind::Eof => write!(f, "end of file"),
        }
    }
}

/// Lexer for SIN source code
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
}

impl Lexer {
    /// Create a new lexer for the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.replace("\r\n", "\n").chars().collect(),
            position: 0,
            line: 1,
        }
    }

    /// Tokenize the entire input; the last token is always [`TokenKind::Eof`]
    pub fn tokenize(&mut self) -> CompileResult<Vec<Token>> {
        let mut tokens = Vec::new();

        loop {
            let token = self.next_token()?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                break;
            }
        }

        tracing::trace!(count = tokens.len(), "tokenized source");
        Ok(tokens)
    }

    /// Read the next token
    pub fn next_token(&mut self) -> CompileResult<Token> {
        self.skip_whitespace_and_comments();

        let line = self.line;
        let Some(ch) = self.peek() else {
            return Ok(Token::eof(line));
        };

        let token = match ch {
            '"' => Token::new(TokenKind::Str, self.string_literal(), line),
            '\'' => Token::new(TokenKind::Char, self.char_literal(), line),
            c if c == '_' || c.is_ascii_alphabetic() => self.identifier_or_keyword(line),
            c if c.is_ascii_digit() => self.number_literal(line)?,
            c if PUNCTUATION.contains(&c) => {
                self.advance();
                Token::new(TokenKind::Punctuation, c.to_string(), line)
            }
            c if OPERATOR_CHARS.contains(&c) => self.operator(line)?,
            c => {
                return Err(ErrorKind::UnrecognizedCharacter {
                    character: c,
                    position: self.position,
                }
                .at(line))
            }
        };

        Ok(token)
    }

    /// Parse string literal; escapes are kept as written
    fn string_literal(&mut self) -> String {
        self.advance(); // opening quote
        let mut string = String::new();
        let mut escaped = false;

        // An unterminated string runs to end of input
        while let Some(ch) = self.advance() {
            if escaped {
                string.push(ch);
                escaped = false;
            } else if ch == '\\' {
                string.push(ch);
                escaped = true;
            } else if ch == '"' {
                break;
            } else {
                string.push(ch);
            }
        }

        string
    }

    /// Parse character literal; `''` becomes the two characters `\0`
    fn char_literal(&mut self) -> String {
        self.advance(); // opening quote
        let mut value = String::new();

        while let Some(ch) = self.peek() {
            if ch == '\'' {
                break;
            }
            self.advance();
            value.push(ch);
            if ch == '\\' {
                if let Some(escaped) = self.advance() {
                    value.push(escaped);
                }
            }
        }
        self.advance(); // closing quote

        if value.is_empty() {
            value.push_str("\\0");
        }
        value
    }

    /// Parse numeric literal; `_` separators are dropped and a `.` makes it a float
    fn number_literal(&mut self, line: usize) -> CompileResult<Token> {
        let mut raw = String::new();
        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() || ch == '.' || ch == '_' {
                raw.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        let mut value = String::new();
        let mut kind = TokenKind::Int;
        for ch in raw.chars() {
            match ch {
                '.' if kind == TokenKind::Float => {
                    return Err(ErrorKind::InvalidNumericLiteral { literal: raw }.at(line));
                }
                '.' => {
                    kind = TokenKind::Float;
                    value.push(ch);
                }
                '_' => {}
                _ => value.push(ch),
            }
        }

        Ok(Token::new(kind, value, line))
    }

    /// Parse identifier, keyword or boolean literal
    fn identifier_or_keyword(&mut self, line: usize) -> Token {
        let mut ident = String::new();
        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                ident.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        let kind = if is_keyword(&ident) {
            TokenKind::Keyword
        } else if ident == "true" || ident == "false" {
            TokenKind::Bool
        } else {
            TokenKind::Identifier
        };
        Token::new(kind, ident, line)
    }

    /// Greedy longest match against the operator table
    fn operator(&mut self, line: usize) -> CompileResult<Token> {
        let start = self.position;
        let mut symbol = String::new();

        while let Some(ch) = self.peek() {
            let mut candidate = symbol.clone();
            candidate.push(ch);
            if !Operator::is_symbol_prefix(&candidate) {
                break;
            }
            symbol = candidate;
            self.advance();
        }

        if Operator::is_valid_symbol(&symbol) {
            Ok(Token::new(TokenKind::Operator, symbol, line))
        } else {
            Err(ErrorKind::UnrecognizedCharacter {
                character: self.input[start],
                position: start,
            }
            .at(line))
        }
    }

    /// Skip whitespace and both comment forms
    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.peek() {
                Some(' ') | Some('\t') | Some('\r') | Some('\n') => {
                    self.advance();
                }
                Some('/') if self.peek_ahead(1) == Some('/') => {
                    while let Some(ch) = self.advance() {
                        if ch == '\n' {
                            break;
                        }
                    }
                }
                Some('/') if self.peek_ahead(1) == Some('*') => {
                    self.advance();
                    self.advance();
                    // An unterminated block comment runs to end of input
                    while !self.is_at_end() {
                        if self.peek() == Some('*') && self.peek_ahead(1) == Some('/') {
                            self.advance();
                            self.advance();
                            break;
                        }
                        self.advance();
                    }
                }
                _ => break,
            }
        }
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.input.get(self.position + n).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;
        if ch == '\n' {
            self.line += 1;
        }
        Some(ch)
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }
}
