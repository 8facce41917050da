//! Type system
//!
//! - [`primitive`]: primary kinds and their decoration letters
//! - [`qualities`]: qualifier flags with validated insertion
//! - [`data_type`]: [`DataType`], compatibility, width and decoration
//! - [`widths`]: byte widths of the primitive kinds

pub mod data_type;
pub mod primitive;
pub mod qualities;
pub mod widths;

#[cfg(test)]
mod proptest_support;

pub use data_type::{ArrayLength, DataType};
pub use primitive::PrimaryKind;
pub use qualities::{Qualities, Quality, QualityConflict};
