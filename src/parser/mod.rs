//! SIN source code parser
//!
//! This module transforms SIN source text into an Abstract Syntax Tree (AST):
//! - [`lexer`]: Tokenization (source text → tokens)
//! - [`operators`]: The operator table shared by the lexer and parser
//! - [`parse`]: The [`Parser`] struct and block-level entry points
//! - [`ast`]: AST node definitions
//!
//! # Language surface
//!
//! - Statements: `include`, `decl`, `alloc`, `let`, `move`, `return`, `if`/`else`,
//!   `while`, `def` (functions and structs), `construct`, `@` calls, scoped blocks
//! - Types: `int`, `float`, `bool`, `char`, `string`, `raw`, `void`, `ptr<T>`,
//!   `ref<T>`, `array<N, T>`, `tuple<T, ...>` and named structs, each with
//!   prefixed or `&`-postfixed qualities
//! - Expressions: arithmetic, comparison, logical and bitwise operators, indexing,
//!   member access, calls, attribute selection (`x:len`), typecasts (`x as T`),
//!   tuple and array literals, constructions
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent parser with precedence climbing for binary operators.
//! No external parser generator dependencies.

pub mod ast;
mod construction;
pub mod control_flow;
mod declarations;
pub mod expressions;
pub mod lexer;
pub mod operators;
pub mod parse;
mod statements;
mod types;

pub use expressions::{ExprOptions, Grouping};
pub use parse::Parser;
