//! Data types
//!
//! A [`DataType`] describes the shape of a value: its [`PrimaryKind`], the
//! types it contains, its [`Qualities`], and for arrays and structs the extra
//! information needed to lay it out. Width and ownership are derived from
//! those parts on every query, so they can never go stale after a quality is
//! added.
//!
//! # Decoration
//!
//! [`DataType::decorate`] produces the canonical string used inside symbol
//! names:
//!
//! ```text
//! decoration ::= code ["?" struct_name "?"] qualities [":" n] ["&" decoration+]
//! ```
//!
//! where `code` is the lowercase letter of the primary kind, `qualities` is a
//! run of uppercase letters and `n` is the array length or tuple arity.

use super::primitive::PrimaryKind;
use super::qualities::{Qualities, Quality, QualityConflict};
use super::widths;
use crate::parser::ast::Expression;
use std::fmt;

/// Length of an array type
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ArrayLength {
    /// `array<T>`; the length comes from an initializer or is dynamic
    #[default]
    Unspecified,
    /// A constant length known at parse time
    Resolved(usize),
    /// A length expression to be evaluated by a later pass
    Deferred(Box<Expression>),
}

impl ArrayLength {
    /// Resolve the length immediately when the expression is an integer literal
    pub fn from_expression(expr: Expression) -> ArrayLength {
        match &expr {
            Expression::Literal { ty, value, .. } if ty.primary() == PrimaryKind::Int => {
                match value.parse::<usize>() {
                    Ok(n) => ArrayLength::Resolved(n),
                    Err(_) => ArrayLength::Deferred(Box::new(expr)),
                }
            }
            _ => ArrayLength::Deferred(Box::new(expr)),
        }
    }

    /// The resolved length, or 0 if it is not yet known
    pub fn resolved(&self) -> usize {
        match self {
            ArrayLength::Resolved(n) => *n,
            _ => 0,
        }
    }
}

/// A fully described type
#[derive(Debug, Clone)]
pub struct DataType {
    primary: PrimaryKind,
    contained: Vec<DataType>,
    qualities: Qualities,
    array_length: ArrayLength,
    struct_name: Option<String>,
}

impl DataType {
    fn build(
        primary: PrimaryKind,
        contained: Vec<DataType>,
        mut qualities: Qualities,
        array_length: ArrayLength,
        struct_name: Option<String>,
    ) -> DataType {
        match primary {
            PrimaryKind::Int if !qualities.is_unsigned() => qualities.set_signed(),
            PrimaryKind::Float => qualities.set_signed(),
            _ => {}
        }

        DataType {
            primary,
            contained,
            qualities,
            array_length,
            struct_name,
        }
    }

    /// The "no type yet" sentinel
    pub fn none() -> DataType {
        DataType {
            primary: PrimaryKind::None,
            contained: Vec::new(),
            qualities: Qualities::new(),
            array_length: ArrayLength::Unspecified,
            struct_name: None,
        }
    }

    /// A type with no contained types.
    ///
    /// `string` always receives its implicit `char` subtype. Pointers, arrays,
    /// references and tuples should be built with their dedicated constructors.
    pub fn new(primary: PrimaryKind, qualities: Qualities) -> DataType {
        let contained = if primary == PrimaryKind::String {
            vec![DataType::new(PrimaryKind::Char, Qualities::new())]
        } else {
            Vec::new()
        };
        DataType::build(primary, contained, qualities, ArrayLength::Unspecified, None)
    }

    /// A scalar type with default qualities
    pub fn simple(primary: PrimaryKind) -> DataType {
        DataType::new(primary, Qualities::new())
    }

    pub fn pointer_to(subtype: DataType, qualities: Qualities) -> DataType {
        DataType::build(
            PrimaryKind::Ptr,
            vec![subtype],
            qualities,
            ArrayLength::Unspecified,
            None,
        )
    }

    pub fn reference_to(subtype: DataType, qualities: Qualities) -> DataType {
        DataType::build(
            PrimaryKind::Reference,
            vec![subtype],
            qualities,
            ArrayLength::Unspecified,
            None,
        )
    }

    pub fn array_of(subtype: DataType, length: ArrayLength, qualities: Qualities) -> DataType {
        DataType::build(PrimaryKind::Array, vec![subtype], qualities, length, None)
    }

    pub fn tuple_of(members: Vec<DataType>, qualities: Qualities) -> DataType {
        DataType::build(
            PrimaryKind::Tuple,
            members,
            qualities,
            ArrayLength::Unspecified,
            None,
        )
    }

    pub fn struct_named(name: impl Into<String>, qualities: Qualities) -> DataType {
        DataType::build(
            PrimaryKind::Struct,
            Vec::new(),
            qualities,
            ArrayLength::Unspecified,
            Some(name.into()),
        )
    }

    /// Type of a literal token: constant, and signed for numerics
    pub fn literal(primary: PrimaryKind) -> DataType {
        DataType::new(primary, Qualities::constant())
    }

    pub fn primary(&self) -> PrimaryKind {
        self.primary
    }

    pub fn qualities(&self) -> &Qualities {
        &self.qualities
    }

    pub fn contained(&self) -> &[DataType] {
        &self.contained
    }

    /// The first contained type, for kinds that wrap one
    pub fn subtype(&self) -> Option<&DataType> {
        self.contained.first()
    }

    pub fn array_length(&self) -> &ArrayLength {
        &self.array_length
    }

    /// Replace the array length, resolving integer literals immediately
    pub fn with_array_length(mut self, length: Expression) -> DataType {
        self.array_length = ArrayLength::from_expression(length);
        self
    }

    pub fn struct_name(&self) -> Option<&str> {
        self.struct_name.as_deref()
    }

    pub fn is_none(&self) -> bool {
        self.primary == PrimaryKind::None
    }

    /// Add one quality, re-validating the exclusion rules
    pub fn add_quality(&mut self, quality: Quality) -> Result<(), QualityConflict> {
        self.qualities.add(quality)
    }

    /// Layer a whole set of qualities on top of the current ones
    pub fn add_qualities(&mut self, qualities: &Qualities) -> Result<(), QualityConflict> {
        self.qualities.add_all(qualities)
    }

    /// Whether a quality is meaningless for this type's primary kind
    pub fn quality_has_no_effect(&self, quality: Quality) -> bool {
        quality.is_numeric() && self.primary.ignores_width_and_sign()
    }

    /// `short float` requests half precision, which is not supported
    pub fn is_half_precision(&self) -> bool {
        self.primary == PrimaryKind::Float && self.qualities.is_short()
    }

    /// Width in bytes; 0 when it depends on struct or array information
    pub fn width(&self) -> usize {
        match self.primary {
            PrimaryKind::Int => {
                if self.qualities.is_long() {
                    widths::LONG_WIDTH
                } else if self.qualities.is_short() {
                    widths::SHORT_WIDTH
                } else {
                    widths::INT_WIDTH
                }
            }
            PrimaryKind::Float => {
                if self.qualities.is_long() {
                    widths::DOUBLE_WIDTH
                } else {
                    // short floats degrade to single precision
                    widths::FLOAT_WIDTH
                }
            }
            PrimaryKind::Bool => widths::BOOL_WIDTH,
            PrimaryKind::Char => widths::CHAR_WIDTH,
            PrimaryKind::Ptr | PrimaryKind::Reference | PrimaryKind::String => widths::PTR_WIDTH,
            PrimaryKind::Tuple => {
                let mut total = 0;
                for member in &self.contained {
                    let width = member.width();
                    if width == 0 {
                        return 0;
                    }
                    total += width;
                }
                total
            }
            PrimaryKind::None
            | PrimaryKind::Raw
            | PrimaryKind::Array
            | PrimaryKind::Struct
            | PrimaryKind::Void => 0,
        }
    }

    /// Dynamic, string and reference types all point at managed memory
    pub fn is_reference_type(&self) -> bool {
        self.qualities.is_dynamic()
            || self.primary == PrimaryKind::String
            || self.primary == PrimaryKind::Reference
    }

    fn owns_memory(&self) -> bool {
        (self.primary == PrimaryKind::Ptr && self.qualities.is_managed()) || self.is_reference_type()
    }

    /// Whether a value of this type must release memory when it goes out of scope
    pub fn must_free(&self) -> bool {
        if self.owns_memory() {
            return true;
        }
        match self.primary {
            PrimaryKind::Array => self.subtype().is_some_and(DataType::owns_memory),
            PrimaryKind::Tuple => self.contained.iter().any(DataType::owns_memory),
            _ => false,
        }
    }

    /// Constants and references must be given a value where they are allocated
    pub fn must_initialize(&self) -> bool {
        self.qualities.is_const() || self.primary == PrimaryKind::Reference
    }

    /// Check the validity rules that apply to allocations
    pub fn is_valid_type(&self) -> bool {
        let q = &self.qualities;
        match self.primary {
            PrimaryKind::Float => !q.is_short(),
            PrimaryKind::String => !q.has_sign_quality() && !(q.is_static() && !q.is_const()),
            PrimaryKind::Struct => !(q.is_long() || q.is_short() || q.has_sign_quality()),
            PrimaryKind::Reference => q.is_managed(),
            _ => true,
        }
    }

    /// Whether a `source` value may be stored behind a `target` with these qualities.
    ///
    /// A const target accepts anything; a final target accepts anything but a
    /// const; a mutable target accepts neither.
    pub fn is_valid_type_promotion(target: &Qualities, source: &Qualities) -> bool {
        if target.is_const() {
            true
        } else if target.is_final() {
            !source.is_const()
        } else {
            !(source.is_const() || source.is_final())
        }
    }

    /// Whether a value of type `other` may be used where `self` is expected
    pub fn is_compatible(&self, other: &DataType) -> bool {
        use PrimaryKind as K;

        match (self.primary, other.primary) {
            (K::Raw, _) | (_, K::Raw) => true,
            (K::Ptr, K::Ptr) => match (self.subtype(), other.subtype()) {
                (Some(mine), Some(theirs)) => {
                    mine.is_compatible(theirs)
                        && DataType::is_valid_type_promotion(&mine.qualities, &theirs.qualities)
                }
                _ => false,
            },
            (K::Reference, _) => self
                .subtype()
                .is_some_and(|subtype| subtype.is_compatible(other)),
            (_, K::Reference) => other
                .subtype()
                .is_some_and(|subtype| self.is_compatible(subtype)),
            (K::Array, K::Array) => match (self.subtype(), other.subtype()) {
                (Some(mine), Some(theirs)) => mine.is_compatible(theirs),
                _ => false,
            },
            (K::Tuple, K::Tuple) => {
                self.contained.len() == other.contained.len()
                    && self
                        .contained
                        .iter()
                        .zip(&other.contained)
                        .all(|(mine, theirs)| mine.is_compatible(theirs))
            }
            (K::String, K::Char) => true,
            (mine, theirs) => mine == theirs,
        }
    }

    /// Canonical decoration used in symbol names
    pub fn decorate(&self) -> String {
        let mut decorated = String::new();
        decorated.push(self.primary.decoration());

        if self.primary == PrimaryKind::Struct {
            decorated.push('?');
            decorated.push_str(self.struct_name.as_deref().unwrap_or_default());
            decorated.push('?');
        }

        decorated.push_str(&self.qualities.decorate());

        match self.primary {
            PrimaryKind::Array => {
                decorated.push(':');
                decorated.push_str(&self.array_length.resolved().to_string());
            }
            PrimaryKind::Tuple => {
                decorated.push(':');
                decorated.push_str(&self.contained.len().to_string());
            }
            _ => {}
        }

        if !self.contained.is_empty() {
            decorated.push('&');
            for contained in &self.contained {
                decorated.push_str(&contained.decorate());
            }
        }

        decorated
    }
}

impl PartialEq for DataType {
    fn eq(&self, other: &Self) -> bool {
        self.primary == other.primary
            && self.qualities == other.qualities
            && self.contained == other.contained
            && self.struct_name == other.struct_name
    }
}

impl Default for DataType {
    fn default() -> Self {
        DataType::none()
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let qualities = self.qualities.to_string();
        let qualities = qualities
            .split(' ')
            .filter(|word| !word.is_empty() && *word != "signed")
            .collect::<Vec<_>>()
            .join(" ");
        if !qualities.is_empty() {
            write!(f, "{} ", qualities)?;
        }

        match self.primary {
            PrimaryKind::Struct => write!(f, "{}", self.struct_name.as_deref().unwrap_or("struct")),
            PrimaryKind::Ptr | PrimaryKind::Reference => match self.subtype() {
                Some(subtype) => write!(f, "{}<{}>", self.primary, subtype),
                None => write!(f, "{}", self.primary),
            },
            PrimaryKind::Array => match (self.subtype(), &self.array_length) {
                (Some(subtype), ArrayLength::Resolved(n)) => write!(f, "array<{}, {}>", n, subtype),
                (Some(subtype), _) => write!(f, "array<{}>", subtype),
                (None, _) => write!(f, "array"),
            },
            PrimaryKind::Tuple => {
                let members: Vec<String> = self.contained.iter().map(ToString::to_string).collect();
                write!(f, "tuple<{}>", members.join(", "))
            }
            primary => write!(f, "{}", primary),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int() -> DataType {
        DataType::simple(PrimaryKind::Int)
    }

    fn with(primary: PrimaryKind, list: &[Quality]) -> DataType {
        DataType::new(primary, Qualities::from_list(list).unwrap())
    }

    #[test]
    fn test_int_defaults_to_signed() {
        assert!(int().qualities().is_signed());
        let unsigned = with(PrimaryKind::Int, &[Quality::Unsigned]);
        assert!(!unsigned.qualities().is_signed());
        assert!(unsigned.qualities().is_unsigned());
    }

    #[test]
    fn test_widths() {
        assert_eq!(int().width(), 4);
        assert_eq!(with(PrimaryKind::Int, &[Quality::Long]).width(), 8);
        assert_eq!(with(PrimaryKind::Int, &[Quality::Short]).width(), 2);
        assert_eq!(with(PrimaryKind::Float, &[Quality::Long]).width(), 8);
        assert_eq!(with(PrimaryKind::Float, &[Quality::Short]).width(), 4);
        assert_eq!(DataType::simple(PrimaryKind::Bool).width(), 1);
        assert_eq!(DataType::simple(PrimaryKind::String).width(), 8);
        assert_eq!(DataType::pointer_to(int(), Qualities::new()).width(), 8);
        assert_eq!(DataType::struct_named("Point", Qualities::new()).width(), 0);
    }

    #[test]
    fn test_width_follows_quality_changes() {
        let mut ty = int();
        assert_eq!(ty.width(), 4);
        ty.add_quality(Quality::Long).unwrap();
        assert_eq!(ty.width(), 8);
        ty.add_quality(Quality::Short).unwrap();
        assert_eq!(ty.width(), 2);
    }

    #[test]
    fn test_tuple_width() {
        let tuple = DataType::tuple_of(
            vec![int(), DataType::simple(PrimaryKind::Bool)],
            Qualities::new(),
        );
        assert_eq!(tuple.width(), 5);

        let deferred = DataType::tuple_of(
            vec![int(), DataType::struct_named("Point", Qualities::new())],
            Qualities::new(),
        );
        assert_eq!(deferred.width(), 0);
    }

    #[test]
    fn test_string_has_char_subtype() {
        let string = DataType::simple(PrimaryKind::String);
        assert_eq!(string.subtype().map(DataType::primary), Some(PrimaryKind::Char));
    }

    #[test]
    fn test_must_free() {
        assert!(DataType::pointer_to(int(), Qualities::new()).must_free());
        let unmanaged = Qualities::from_list(&[Quality::Unmanaged]).unwrap();
        assert!(!DataType::pointer_to(int(), unmanaged).must_free());
        assert!(DataType::simple(PrimaryKind::String).must_free());
        assert!(with(PrimaryKind::Int, &[Quality::Dynamic]).must_free());
        assert!(!int().must_free());

        let strings = DataType::array_of(
            DataType::simple(PrimaryKind::String),
            ArrayLength::Resolved(3),
            Qualities::new(),
        );
        assert!(strings.must_free());
        let ints = DataType::array_of(int(), ArrayLength::Resolved(3), Qualities::new());
        assert!(!ints.must_free());

        let tuple = DataType::tuple_of(
            vec![int(), DataType::pointer_to(int(), Qualities::new())],
            Qualities::new(),
        );
        assert!(tuple.must_free());
    }

    #[test]
    fn test_must_free_tracks_qualities() {
        let mut ptr = DataType::pointer_to(int(), Qualities::new());
        assert!(ptr.must_free());
        ptr.add_quality(Quality::Unmanaged).unwrap();
        assert!(!ptr.must_free());
    }

    #[test]
    fn test_validity_rules() {
        assert!(!with(PrimaryKind::Float, &[Quality::Short]).is_valid_type());
        assert!(!with(PrimaryKind::String, &[Quality::Unsigned]).is_valid_type());
        assert!(!with(PrimaryKind::String, &[Quality::Static]).is_valid_type());
        assert!(with(PrimaryKind::String, &[Quality::Static, Quality::Const]).is_valid_type());
        assert!(!DataType::struct_named(
            "Point",
            Qualities::from_list(&[Quality::Long]).unwrap()
        )
        .is_valid_type());
        let unmanaged = Qualities::from_list(&[Quality::Unmanaged]).unwrap();
        assert!(!DataType::reference_to(int(), unmanaged).is_valid_type());
        assert!(DataType::reference_to(int(), Qualities::new()).is_valid_type());
    }

    #[test]
    fn test_string_accepts_char_but_not_reverse() {
        let string = DataType::simple(PrimaryKind::String);
        let ch = DataType::simple(PrimaryKind::Char);
        assert!(string.is_compatible(&ch));
        assert!(!ch.is_compatible(&string));
    }

    #[test]
    fn test_raw_is_always_compatible() {
        let raw = DataType::simple(PrimaryKind::Raw);
        assert!(raw.is_compatible(&int()));
        assert!(int().is_compatible(&raw));
    }

    #[test]
    fn test_reference_unwraps() {
        let reference = DataType::reference_to(int(), Qualities::new());
        assert!(reference.is_compatible(&int()));
        assert!(int().is_compatible(&reference));
        assert!(!reference.is_compatible(&DataType::simple(PrimaryKind::Bool)));
    }

    #[test]
    fn test_pointer_promotion() {
        let const_int = with(PrimaryKind::Int, &[Quality::Const]);
        let final_int = with(PrimaryKind::Int, &[Quality::Final]);
        let to_const = DataType::pointer_to(const_int.clone(), Qualities::new());
        let to_final = DataType::pointer_to(final_int.clone(), Qualities::new());
        let to_mut = DataType::pointer_to(int(), Qualities::new());

        assert!(to_const.is_compatible(&to_mut));
        assert!(to_const.is_compatible(&to_final));
        assert!(to_final.is_compatible(&to_mut));
        assert!(!to_final.is_compatible(&to_const));
        assert!(!to_mut.is_compatible(&to_const));
        assert!(!to_mut.is_compatible(&to_final));
    }

    #[test]
    fn test_tuple_compatibility() {
        let a = DataType::tuple_of(vec![int(), DataType::simple(PrimaryKind::Bool)], Qualities::new());
        let b = DataType::tuple_of(vec![int(), DataType::simple(PrimaryKind::Bool)], Qualities::new());
        let c = DataType::tuple_of(vec![DataType::simple(PrimaryKind::Bool), int()], Qualities::new());
        let d = DataType::tuple_of(vec![int()], Qualities::new());
        assert!(a.is_compatible(&b));
        assert!(!a.is_compatible(&c));
        assert!(!a.is_compatible(&d));
    }

    #[test]
    fn test_array_lengths_not_compared() {
        let a = DataType::array_of(int(), ArrayLength::Resolved(3), Qualities::new());
        let b = DataType::array_of(int(), ArrayLength::Resolved(10), Qualities::new());
        assert!(a.is_compatible(&b));
        assert_eq!(a, b);
    }

    #[test]
    fn test_decorate() {
        assert_eq!(int().decorate(), "iGM");
        assert_eq!(
            DataType::pointer_to(int(), Qualities::new()).decorate(),
            "pM&iGM"
        );
        assert_eq!(
            DataType::array_of(int(), ArrayLength::Resolved(4), Qualities::new()).decorate(),
            "aM:4&iGM"
        );
        assert_eq!(
            DataType::tuple_of(vec![int(), DataType::simple(PrimaryKind::Bool)], Qualities::new())
                .decorate(),
            "tM:2&iGMbM"
        );
        assert_eq!(
            DataType::struct_named("Point", Qualities::new()).decorate(),
            "u?Point?M"
        );
        assert_eq!(DataType::simple(PrimaryKind::String).decorate(), "sM&cM");
    }

    #[test]
    fn test_equality_ignores_nothing_structural() {
        assert_ne!(int(), with(PrimaryKind::Int, &[Quality::Const]));
        assert_ne!(
            DataType::struct_named("A", Qualities::new()),
            DataType::struct_named("B", Qualities::new())
        );
        assert_ne!(
            DataType::pointer_to(int(), Qualities::new()),
            DataType::pointer_to(DataType::simple(PrimaryKind::Bool), Qualities::new())
        );
    }

    #[test]
    fn test_display() {
        let ty = DataType::pointer_to(with(PrimaryKind::Int, &[Quality::Const]), Qualities::new());
        assert_eq!(ty.to_string(), "ptr<const int>");
        let arr = DataType::array_of(int(), ArrayLength::Resolved(3), Qualities::new());
        assert_eq!(arr.to_string(), "array<3, int>");
    }
}
