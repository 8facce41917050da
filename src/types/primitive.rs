//! Primary (primitive) type kinds
//!
//! Every [`DataType`](super::DataType) has exactly one [`PrimaryKind`]. The
//! kind decides how many contained types the data type carries, its byte
//! width and the single-letter code used when decorating symbol names.

use std::fmt;

/// The primary kind of a data type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimaryKind {
    /// Sentinel for "no type yet"
    None,
    Int,
    Float,
    Bool,
    String,
    Char,
    Raw,
    Ptr,
    Reference,
    Array,
    Struct,
    Tuple,
    Void,
}

impl PrimaryKind {
    /// Resolve a type keyword to its kind.
    ///
    /// Any name that is not a type keyword names a struct; the caller decides
    /// whether that is legal for the token it came from.
    pub fn from_keyword(name: &str) -> PrimaryKind {
        match name {
            "char" => PrimaryKind::Char,
            "int" => PrimaryKind::Int,
            "float" => PrimaryKind::Float,
            "string" => PrimaryKind::String,
            "bool" => PrimaryKind::Bool,
            "void" => PrimaryKind::Void,
            "ptr" => PrimaryKind::Ptr,
            "ref" => PrimaryKind::Reference,
            "raw" => PrimaryKind::Raw,
            "array" => PrimaryKind::Array,
            "tuple" => PrimaryKind::Tuple,
            _ => PrimaryKind::Struct,
        }
    }

    /// Whether `word` begins a type rather than a quality
    pub fn is_type_keyword(word: &str) -> bool {
        matches!(
            word,
            "int"
                | "bool"
                | "string"
                | "char"
                | "float"
                | "raw"
                | "ptr"
                | "array"
                | "struct"
                | "tuple"
                | "void"
        )
    }

    /// Single-letter decoration code
    pub fn decoration(self) -> char {
        match self {
            PrimaryKind::Int => 'i',
            PrimaryKind::Float => 'f',
            PrimaryKind::Array => 'a',
            PrimaryKind::Bool => 'b',
            PrimaryKind::Char => 'c',
            PrimaryKind::Ptr => 'p',
            PrimaryKind::Reference => 'r',
            PrimaryKind::String => 's',
            PrimaryKind::Struct => 'u',
            PrimaryKind::Tuple => 't',
            PrimaryKind::Void => 'v',
            PrimaryKind::Raw => 'w',
            PrimaryKind::None => 'n',
        }
    }

    /// Kinds that wrap exactly one contained type
    pub fn has_single_subtype(self) -> bool {
        matches!(
            self,
            PrimaryKind::Ptr | PrimaryKind::Reference | PrimaryKind::Array | PrimaryKind::String
        )
    }

    /// Kinds for which width and sign qualifiers have no effect
    pub fn ignores_width_and_sign(self) -> bool {
        matches!(
            self,
            PrimaryKind::Ptr
                | PrimaryKind::Bool
                | PrimaryKind::Array
                | PrimaryKind::String
                | PrimaryKind::Raw
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PrimaryKind::None => "none",
            PrimaryKind::Int => "int",
            PrimaryKind::Float => "float",
            PrimaryKind::Bool => "bool",
            PrimaryKind::String => "string",
            PrimaryKind::Char => "char",
            PrimaryKind::Raw => "raw",
            PrimaryKind::Ptr => "ptr",
            PrimaryKind::Reference => "ref",
            PrimaryKind::Array => "array",
            PrimaryKind::Struct => "struct",
            PrimaryKind::Tuple => "tuple",
            PrimaryKind::Void => "void",
        }
    }
}

impl fmt::Display for PrimaryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_lookup() {
        assert_eq!(PrimaryKind::from_keyword("int"), PrimaryKind::Int);
        assert_eq!(PrimaryKind::from_keyword("ref"), PrimaryKind::Reference);
        assert_eq!(PrimaryKind::from_keyword("Point"), PrimaryKind::Struct);
    }

    #[test]
    fn test_decoration_codes_are_distinct() {
        let kinds = [
            PrimaryKind::Int,
            PrimaryKind::Float,
            PrimaryKind::Bool,
            PrimaryKind::String,
            PrimaryKind::Char,
            PrimaryKind::Raw,
            PrimaryKind::Ptr,
            PrimaryKind::Reference,
            PrimaryKind::Array,
            PrimaryKind::Struct,
            PrimaryKind::Tuple,
            PrimaryKind::Void,
            PrimaryKind::None,
        ];
        let mut codes: Vec<char> = kinds.iter().map(|k| k.decoration()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), kinds.len());
        assert!(codes.iter().all(|c| c.is_ascii_lowercase()));
    }
}
