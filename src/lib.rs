//! # Introduction
//!
//! sinc is the front end of the SIN compiler. It turns SIN source text into a
//! typed abstract syntax tree plus a symbol table, ready for a code generator.
//!
//! ## Compilation pipeline
//!
//! ```text
//! Source → Lexer → Tokens → Parser → AST → Symbol collector → CompileOutput
//! ```
//!
//! 1. [`parser`]: tokenises the source and builds the AST with a
//!    precedence-climbing expression parser. Types are parsed and validated
//!    as they are encountered.
//! 2. [`types`]: primary kinds, qualities, and [`types::DataType`] with its
//!    width, compatibility and decoration rules.
//! 3. [`symbols`]: decorated names and the scoped [`symbols::SymbolTable`].
//! 4. [`driver`]: runs the pipeline statement by statement, recovering from
//!    errors up to a configurable budget.
//! 5. [`errors`]: the [`errors::CompileError`] type and non-fatal
//!    [`errors::Diagnostic`]s.
//!
//! ## Language surface
//!
//! Types: `int`, `float`, `bool`, `char`, `string`, `raw`, `void`, `ptr<T>`,
//! `ref<T>`, `array<N, T>`, `tuple<T, ...>`, and named structs.
//! Statements: `include`, `decl`, `alloc`, `let`, `move`, `return`,
//! `if/else`, `while`, `def`, `construct`, `@` calls, `pass`.

pub mod config;
pub mod driver;
pub mod errors;
pub mod parser;
pub mod symbols;
pub mod types;
