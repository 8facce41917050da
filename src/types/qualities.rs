//! Type qualities (qualifiers)
//!
//! [`Qualities`] is a set of independent flags attached to a data type. It is
//! only mutated through [`Qualities::add`], which enforces the exclusion rules:
//!
//! - `const` and `final` may not both be set; adding one while the other is
//!   present is a [`QualityConflict`]
//! - `long` clears `short` and vice versa
//! - `unsigned` clears `signed`
//! - `unmanaged` clears the default `managed` flag

use std::fmt;
use thiserror::Error;

/// A single quality keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quality {
    Const,
    Final,
    Static,
    Dynamic,
    Signed,
    Unsigned,
    Long,
    Short,
    Extern,
    Unmanaged,
}

impl Quality {
    /// Look up a quality by its keyword
    pub fn from_keyword(word: &str) -> Option<Quality> {
        match word {
            "const" => Some(Quality::Const),
            "final" => Some(Quality::Final),
            "static" => Some(Quality::Static),
            "dynamic" => Some(Quality::Dynamic),
            "long" => Some(Quality::Long),
            "short" => Some(Quality::Short),
            "signed" => Some(Quality::Signed),
            "unsigned" => Some(Quality::Unsigned),
            "extern" => Some(Quality::Extern),
            "unmanaged" => Some(Quality::Unmanaged),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Quality::Const => "const",
            Quality::Final => "final",
            Quality::Static => "static",
            Quality::Dynamic => "dynamic",
            Quality::Signed => "signed",
            Quality::Unsigned => "unsigned",
            Quality::Long => "long",
            Quality::Short => "short",
            Quality::Extern => "extern",
            Quality::Unmanaged => "unmanaged",
        }
    }

    /// Width and sign qualities
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            Quality::Long | Quality::Short | Quality::Signed | Quality::Unsigned
        )
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Raised when a quality contradicts one already present
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("quality '{quality}' conflicts with a quality already present")]
pub struct QualityConflict {
    pub quality: Quality,
}

/// The set of qualities attached to a type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Qualities {
    is_const: bool,
    is_final: bool,
    is_static: bool,
    is_dynamic: bool,
    is_signed: bool,
    listed_unsigned: bool,
    is_long: bool,
    is_short: bool,
    is_extern: bool,
    is_managed: bool,
}

impl Default for Qualities {
    fn default() -> Self {
        Self::MANAGED
    }
}

impl Qualities {
    const MANAGED: Qualities = Qualities {
        is_const: false,
        is_final: false,
        is_static: false,
        is_dynamic: false,
        is_signed: false,
        listed_unsigned: false,
        is_long: false,
        is_short: false,
        is_extern: false,
        is_managed: true,
    };

    pub fn new() -> Self {
        Self::default()
    }

    /// `const` and nothing else; the qualities of a literal
    pub(crate) const fn constant() -> Self {
        Qualities {
            is_const: true,
            ..Self::MANAGED
        }
    }

    /// `unsigned final`; the qualities of an attribute selection
    pub(crate) const fn unsigned_final() -> Self {
        Qualities {
            is_final: true,
            listed_unsigned: true,
            ..Self::MANAGED
        }
    }

    /// Mark a numeric type signed. Unlike [`Qualities::add`] this cannot fail.
    pub(crate) fn set_signed(&mut self) {
        self.is_signed = true;
    }

    /// Build qualities from raw flags.
    ///
    /// `const` wins over `dynamic`; if both `long` and `short` are requested
    /// neither is kept.
    pub fn from_flags(
        is_const: bool,
        is_static: bool,
        is_dynamic: bool,
        is_signed: bool,
        is_long: bool,
        is_short: bool,
        is_extern: bool,
    ) -> Self {
        let (is_long, is_short) = if is_long && is_short {
            tracing::warn!("long and short qualities both requested; neither will be applied");
            (false, false)
        } else {
            (is_long, is_short)
        };

        Self {
            is_const,
            is_dynamic: is_dynamic && !is_const,
            is_static,
            is_signed,
            is_long,
            is_short,
            is_extern,
            ..Self::default()
        }
    }

    /// Build qualities from a list, validating each insertion
    pub fn from_list(list: &[Quality]) -> Result<Self, QualityConflict> {
        let mut qualities = Self::default();
        for &quality in list {
            qualities.add(quality)?;
        }
        Ok(qualities)
    }

    /// Builder form of [`Qualities::add`]
    pub fn with(mut self, quality: Quality) -> Result<Self, QualityConflict> {
        self.add(quality)?;
        Ok(self)
    }

    /// Add a single quality, enforcing the exclusion rules
    pub fn add(&mut self, quality: Quality) -> Result<(), QualityConflict> {
        match quality {
            Quality::Const => {
                if self.is_final {
                    return Err(QualityConflict { quality });
                }
                self.is_const = true;
            }
            Quality::Final => {
                if self.is_const {
                    return Err(QualityConflict { quality });
                }
                self.is_final = true;
            }
            Quality::Static => self.is_static = true,
            Quality::Dynamic => self.is_dynamic = true,
            Quality::Signed => self.is_signed = true,
            Quality::Unsigned => {
                self.is_signed = false;
                self.listed_unsigned = true;
            }
            Quality::Long => {
                self.is_short = false;
                self.is_long = true;
            }
            Quality::Short => {
                self.is_long = false;
                self.is_short = true;
            }
            Quality::Extern => self.is_extern = true,
            Quality::Unmanaged => self.is_managed = false,
        }
        Ok(())
    }

    /// Merge every quality set in `other` into `self`.
    ///
    /// Each flag is re-added through [`Qualities::add`] so conflicts are
    /// reported the same way as for individual qualities.
    pub fn add_all(&mut self, other: &Qualities) -> Result<(), QualityConflict> {
        for quality in other.listed() {
            self.add(quality)?;
        }
        Ok(())
    }

    /// The qualities that are set, as keywords would list them
    pub fn listed(&self) -> Vec<Quality> {
        let flags = [
            (self.is_const, Quality::Const),
            (self.is_final, Quality::Final),
            (self.is_static, Quality::Static),
            (self.is_dynamic, Quality::Dynamic),
            (self.is_signed, Quality::Signed),
            (self.listed_unsigned, Quality::Unsigned),
            (self.is_long, Quality::Long),
            (self.is_short, Quality::Short),
            (self.is_extern, Quality::Extern),
            (!self.is_managed, Quality::Unmanaged),
        ];
        flags
            .into_iter()
            .filter_map(|(set, quality)| set.then_some(quality))
            .collect()
    }

    pub fn is_const(&self) -> bool {
        self.is_const
    }

    pub fn is_final(&self) -> bool {
        self.is_final
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }

    pub fn is_dynamic(&self) -> bool {
        self.is_dynamic
    }

    pub fn is_signed(&self) -> bool {
        self.is_signed
    }

    pub fn is_unsigned(&self) -> bool {
        self.listed_unsigned
    }

    pub fn is_long(&self) -> bool {
        self.is_long
    }

    pub fn is_short(&self) -> bool {
        self.is_short
    }

    pub fn is_extern(&self) -> bool {
        self.is_extern
    }

    pub fn is_managed(&self) -> bool {
        self.is_managed
    }

    /// True if `signed` or `unsigned` was listed explicitly
    pub fn has_sign_quality(&self) -> bool {
        self.is_signed || self.listed_unsigned
    }

    /// Decoration fragment: one uppercase letter per set flag, in fixed order
    pub fn decorate(&self) -> String {
        let flags = [
            (self.is_const, 'C'),
            (self.is_final, 'F'),
            (self.is_static, 'S'),
            (self.is_dynamic, 'D'),
            (self.is_signed, 'G'),
            (self.listed_unsigned, 'U'),
            (self.is_long, 'L'),
            (self.is_short, 'H'),
            (self.is_extern, 'X'),
            (self.is_managed, 'M'),
        ];
        flags
            .into_iter()
            .filter_map(|(set, letter)| set.then_some(letter))
            .collect()
    }
}

impl fmt::Display for Qualities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let words: Vec<&str> = self.listed().into_iter().map(Quality::as_str).collect();
        write!(f, "{}", words.join(" "))
    }
}
