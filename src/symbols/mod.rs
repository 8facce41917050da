//! Symbol table
//!
//! - [`symbol`]: [`Symbol`] records and name decoration
//! - [`table`]: [`SymbolTable`], keyed by decorated name, with scoped locals
//! - [`collector`]: [`SymbolCollector`], which fills a table from an AST

pub mod collector;
pub mod symbol;
pub mod table;

pub use collector::SymbolCollector;
pub use symbol::{decorate, Symbol, SymbolKind};
pub use table::SymbolTable;
