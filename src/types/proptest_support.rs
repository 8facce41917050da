//! Property-based testing support for the type system.
//!
//! Strategies here generate arbitrary [`DataType`] trees so that decoration
//! can be checked against structural equality.

use proptest::prelude::*;

use super::*;

const ALL_QUALITIES: [Quality; 10] = [
    Quality::Const,
    Quality::Final,
    Quality::Static,
    Quality::Dynamic,
    Quality::Signed,
    Quality::Unsigned,
    Quality::Long,
    Quality::Short,
    Quality::Extern,
    Quality::Unmanaged,
];

/// Generate a struct name.
fn struct_name_strategy() -> impl Strategy<Value = String> {
    "[A-Z][a-zA-Z0-9_]{0,7}".prop_map(|s| s)
}

/// Generate an arbitrary quality set; conflicting picks are skipped.
pub fn arb_qualities() -> impl Strategy<Value = Qualities> {
    prop::collection::vec(0..ALL_QUALITIES.len(), 0..4).prop_map(|picks| {
        let mut qualities = Qualities::new();
        for pick in picks {
            let _ = qualities.add(ALL_QUALITIES[pick]);
        }
        qualities
    })
}

/// Generate a type with no contained types (besides the implicit `string` subtype).
fn arb_leaf_type() -> impl Strategy<Value = DataType> {
    let scalar = prop_oneof![
        Just(PrimaryKind::Int),
        Just(PrimaryKind::Float),
        Just(PrimaryKind::Bool),
        Just(PrimaryKind::Char),
        Just(PrimaryKind::String),
        Just(PrimaryKind::Raw),
        Just(PrimaryKind::Void),
    ];
    prop_oneof![
        (scalar, arb_qualities()).prop_map(|(primary, qualities)| DataType::new(primary, qualities)),
        (struct_name_strategy(), arb_qualities())
            .prop_map(|(name, qualities)| DataType::struct_named(name, qualities)),
    ]
}

/// Generate an array length; deferred lengths need an expression and are left out.
fn arb_array_length() -> impl Strategy<Value = ArrayLength> {
    prop_oneof![Just(ArrayLength::Unspecified), (1usize..64).prop_map(ArrayLength::Resolved)]
}

/// Generate an arbitrary DataType tree a few levels deep.
pub fn arb_data_type() -> impl Strategy<Value = DataType> {
    arb_leaf_type().prop_recursive(3, 16, 3, |inner| {
        prop_oneof![
            (inner.clone(), arb_qualities())
                .prop_map(|(subtype, qualities)| DataType::pointer_to(subtype, qualities)),
            (inner.clone(), arb_qualities())
                .prop_map(|(subtype, qualities)| DataType::reference_to(subtype, qualities)),
            (inner.clone(), arb_array_length(), arb_qualities()).prop_map(
                |(subtype, length, qualities)| DataType::array_of(subtype, length, qualities)
            ),
            (prop::collection::vec(inner, 1..4), arb_qualities())
                .prop_map(|(members, qualities)| DataType::tuple_of(members, qualities)),
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        /// Decorating the same type twice gives the same string.
        #[test]
        fn decoration_is_deterministic(ty in arb_data_type()) {
            let copy = ty.clone();
            prop_assert_eq!(ty.decorate(), copy.decorate());
        }

        /// Types that decorate alike are equal. The converse does not hold:
        /// equality ignores array lengths, decoration encodes them.
        #[test]
        fn decoration_is_injective(a in arb_data_type(), b in arb_data_type()) {
            if a.decorate() == b.decorate() {
                prop_assert_eq!(a, b);
            }
        }

        /// Arrays of different lengths are equal but decorate apart.
        #[test]
        fn array_length_only_affects_decoration(
            subtype in arb_leaf_type(),
            n in 1usize..64,
            m in 1usize..64,
        ) {
            prop_assume!(n != m);
            let a = DataType::array_of(subtype.clone(), ArrayLength::Resolved(n), Qualities::new());
            let b = DataType::array_of(subtype, ArrayLength::Resolved(m), Qualities::new());
            prop_assert_eq!(&a, &b);
            prop_assert_ne!(a.decorate(), b.decorate());
        }

        /// Leaf types are compatible with themselves.
        #[test]
        fn leaf_types_are_self_compatible(ty in arb_leaf_type()) {
            prop_assert!(ty.is_compatible(&ty));
        }

        /// Width is recomputed after adding a width quality.
        #[test]
        fn width_tracks_long_quality(qualities in arb_qualities()) {
            let mut ty = DataType::new(PrimaryKind::Int, qualities);
            ty.add_quality(Quality::Long).unwrap();
            prop_assert_eq!(ty.width(), widths::LONG_WIDTH);
        }
    }
}
