//! Operator table
//!
//! A single immutable table maps operator text to [`Operator`]. Both the lexer
//! (greedy longest-match) and the parser (translation and precedence lookup)
//! consult it.
//!
//! # Precedence
//!
//! ```text
//!  1  -> <- += -= *= /= %= &= |= ^= <<= >>=
//!  2  and or xor
//!  3  & | ^
//!  7  = != < > <= >=
//!  8  << >>
//! 10  + -
//! 15  * / %
//! 20  as not ~ $ (unary + - *)
//! 23  :
//! 24  @
//! 25  ( . [
//! 30  ::
//! ```

use std::fmt;

/// Expression operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    RightArrow,
    LeftArrow,
    PlusEqual,
    MinusEqual,
    MultEqual,
    DivEqual,
    ModEqual,
    AndEqual,
    OrEqual,
    XorEqual,
    LeftShiftEqual,
    RightShiftEqual,
    Plus,
    Minus,
    UnaryPlus,
    UnaryMinus,
    Mult,
    Div,
    Modulo,
    /// `=`: equality in expressions, copy-assignment in `let`
    Equal,
    NotEqual,
    Greater,
    Less,
    GreaterOrEqual,
    LessOrEqual,
    And,
    Or,
    Xor,
    Not,
    BitAnd,
    BitOr,
    BitXor,
    BitNot,
    LeftShift,
    RightShift,
    Dot,
    Index,
    Address,
    Dereference,
    Typecast,
    AttributeSelection,
    ControlTransfer,
    ProcOperator,
    ScopeResolution,
}

/// Textual operators, in lookup order. `*` resolves to multiplication; the
/// parser turns it into a dereference in prefix position.
pub const OP_STRINGS: &[(&str, Operator)] = &[
    ("->", Operator::RightArrow),
    ("<-", Operator::LeftArrow),
    ("+=", Operator::PlusEqual),
    ("-=", Operator::MinusEqual),
    ("*=", Operator::MultEqual),
    ("/=", Operator::DivEqual),
    ("%=", Operator::ModEqual),
    ("&=", Operator::AndEqual),
    ("|=", Operator::OrEqual),
    ("^=", Operator::XorEqual),
    ("<<=", Operator::LeftShiftEqual),
    (">>=", Operator::RightShiftEqual),
    ("+", Operator::Plus),
    ("-", Operator::Minus),
    ("*", Operator::Mult),
    ("/", Operator::Div),
    ("%", Operator::Modulo),
    ("=", Operator::Equal),
    ("!=", Operator::NotEqual),
    (">", Operator::Greater),
    ("<", Operator::Less),
    (">=", Operator::GreaterOrEqual),
    ("<=", Operator::LessOrEqual),
    ("&", Operator::BitAnd),
    ("|", Operator::BitOr),
    ("^", Operator::BitXor),
    ("~", Operator::BitNot),
    (">>", Operator::RightShift),
    ("<<", Operator::LeftShift),
    ("and", Operator::And),
    ("or", Operator::Or),
    ("xor", Operator::Xor),
    ("not", Operator::Not),
    ("as", Operator::Typecast),
    ("$", Operator::Address),
    (":", Operator::AttributeSelection),
    (".", Operator::Dot),
    ("[", Operator::Index),
    ("@", Operator::ControlTransfer),
    ("(", Operator::ProcOperator),
    ("::", Operator::ScopeResolution),
];

impl Operator {
    /// Translate operator text
    pub fn from_symbol(symbol: &str) -> Option<Operator> {
        OP_STRINGS
            .iter()
            .find(|(text, _)| *text == symbol)
            .map(|(_, op)| *op)
    }

    /// Whether `symbol` is exactly an operator in the table
    pub fn is_valid_symbol(symbol: &str) -> bool {
        Operator::from_symbol(symbol).is_some()
    }

    /// Whether some operator in the table starts with `prefix`
    pub fn is_symbol_prefix(prefix: &str) -> bool {
        OP_STRINGS.iter().any(|(text, _)| text.starts_with(prefix))
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Operator::UnaryPlus => "+",
            Operator::UnaryMinus => "-",
            Operator::Dereference => "*",
            op => OP_STRINGS
                .iter()
                .find(|(_, candidate)| *candidate == op)
                .map(|(text, _)| *text)
                .unwrap_or("?"),
        }
    }

    pub fn precedence(self) -> usize {
        use Operator::*;
        match self {
            RightArrow | LeftArrow | PlusEqual | MinusEqual | MultEqual | DivEqual | ModEqual
            | AndEqual | OrEqual | XorEqual | LeftShiftEqual | RightShiftEqual => 1,
            Or | And | Xor => 2,
            BitAnd | BitOr | BitXor => 3,
            Less | Greater | LessOrEqual | GreaterOrEqual | Equal | NotEqual => 7,
            LeftShift | RightShift => 8,
            Plus | Minus => 10,
            Mult | Div | Modulo => 15,
            Typecast | Not | BitNot | UnaryPlus | UnaryMinus | Address | Dereference => 20,
            AttributeSelection => 23,
            ControlTransfer => 24,
            ProcOperator | Dot | Index => 25,
            ScopeResolution => 30,
        }
    }

    /// `=` and the compound forms accepted by `let`
    pub fn is_copy_assignment(self) -> bool {
        matches!(self, Operator::Equal) || self.compound_base().is_some()
    }

    /// `<-` and `->`, accepted only by `move`
    pub fn is_move_assignment(self) -> bool {
        matches!(self, Operator::LeftArrow | Operator::RightArrow)
    }

    /// The arithmetic operator a compound assignment applies
    pub fn compound_base(self) -> Option<Operator> {
        match self {
            Operator::PlusEqual => Some(Operator::Plus),
            Operator::MinusEqual => Some(Operator::Minus),
            Operator::MultEqual => Some(Operator::Mult),
            Operator::DivEqual => Some(Operator::Div),
            Operator::ModEqual => Some(Operator::Modulo),
            Operator::AndEqual => Some(Operator::BitAnd),
            Operator::OrEqual => Some(Operator::BitOr),
            Operator::XorEqual => Some(Operator::BitXor),
            Operator::LeftShiftEqual => Some(Operator::LeftShift),
            Operator::RightShiftEqual => Some(Operator::RightShift),
            _ => None,
        }
    }

    /// Prefix form of an operator, if it has one
    pub fn to_unary(self) -> Option<Operator> {
        match self {
            Operator::Plus | Operator::UnaryPlus => Some(Operator::UnaryPlus),
            Operator::Minus | Operator::UnaryMinus => Some(Operator::UnaryMinus),
            Operator::Mult | Operator::Dereference => Some(Operator::Dereference),
            Operator::Address => Some(Operator::Address),
            Operator::BitNot => Some(Operator::BitNot),
            Operator::Not => Some(Operator::Not),
            _ => None,
        }
    }

    /// Operators that may only appear in prefix position
    pub fn is_prefix_only(self) -> bool {
        matches!(
            self,
            Operator::Address
                | Operator::BitNot
                | Operator::Not
                | Operator::UnaryPlus
                | Operator::UnaryMinus
                | Operator::Dereference
                | Operator::ControlTransfer
        )
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        assert_eq!(Operator::from_symbol("<<="), Some(Operator::LeftShiftEqual));
        assert_eq!(Operator::from_symbol("*"), Some(Operator::Mult));
        assert_eq!(Operator::from_symbol("as"), Some(Operator::Typecast));
        assert_eq!(Operator::from_symbol("!"), None);
        assert!(Operator::is_symbol_prefix("!"));
        assert!(Operator::is_symbol_prefix("<<"));
        assert!(!Operator::is_symbol_prefix("?"));
    }

    #[test]
    fn test_precedence_ordering() {
        assert!(Operator::Mult.precedence() > Operator::Plus.precedence());
        assert!(Operator::Plus.precedence() > Operator::LeftShift.precedence());
        assert!(Operator::Index.precedence() > Operator::ControlTransfer.precedence());
        assert!(Operator::ControlTransfer.precedence() > Operator::AttributeSelection.precedence());
        assert_eq!(Operator::ScopeResolution.precedence(), 30);
    }

    #[test]
    fn test_assignment_classes() {
        assert!(Operator::Equal.is_copy_assignment());
        assert!(Operator::XorEqual.is_copy_assignment());
        assert!(!Operator::LeftArrow.is_copy_assignment());
        assert!(Operator::RightArrow.is_move_assignment());
        assert_eq!(Operator::PlusEqual.compound_base(), Some(Operator::Plus));
        assert_eq!(Operator::Equal.compound_base(), None);
    }

    #[test]
    fn test_unary_forms() {
        assert_eq!(Operator::Mult.to_unary(), Some(Operator::Dereference));
        assert_eq!(Operator::Minus.to_unary(), Some(Operator::UnaryMinus));
        assert_eq!(Operator::Div.to_unary(), None);
        assert_eq!(Operator::Dereference.symbol(), "*");
    }
}
