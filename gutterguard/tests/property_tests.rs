//! Property-based tests for the sizing engine using proptest.
//!
//! Covers: fill-ratio and square-root relations, bending space from
//! zero-quantity rows, monotonicity in quantity, and standard-size selection.

use gutterguard::prelude::*;
use gutterguard::{builtin_tables, STANDARD_SIZES};
use proptest::prelude::*;

fn conductor_size() -> impl Strategy<Value = ConductorSize> {
    (0..ConductorSize::ALL.len()).prop_map(|i| ConductorSize::ALL[i])
}

fn entry() -> impl Strategy<Value = ConductorEntry> {
    (conductor_size(), 0u32..60).prop_map(|(size, qty)| ConductorEntry::new(size, qty))
}

fn entries() -> impl Strategy<Value = Vec<ConductorEntry>> {
    prop::collection::vec(entry(), 0..12)
}

proptest! {
    /// Cross-section is total area over the fill ratio.
    #[test]
    fn cross_section_follows_fill_ratio(entries in entries()) {
        let result = compute_size(&entries).unwrap();
        prop_assert!((result.min_cross_section - result.total_area / 0.2).abs() < 1e-9);
    }

    /// Minimum dimension is the rounded-up square root of the cross-section.
    #[test]
    fn dimension_is_ceil_sqrt(entries in entries()) {
        let result = compute_size(&entries).unwrap();
        prop_assert_eq!(result.min_dimension, result.min_cross_section.sqrt().ceil());
    }

    /// Bending space is the table maximum over every row, zero quantities included.
    #[test]
    fn bending_space_ignores_quantity(entries in entries()) {
        let tables = builtin_tables().unwrap();
        let result = compute_size(&entries).unwrap();
        let expected = entries
            .iter()
            .map(|e| tables.bending_space(e.size).unwrap())
            .fold(0.0, f64::max);
        prop_assert_eq!(result.min_bending_space, expected);
    }

    /// Adding a zero-quantity row leaves the area untouched.
    #[test]
    fn zero_quantity_adds_no_area(entries in entries(), size in conductor_size()) {
        let before = compute_size(&entries).unwrap();
        let mut extended = entries.clone();
        extended.push(ConductorEntry::new(size, 0));
        let after = compute_size(&extended).unwrap();
        prop_assert_eq!(before.total_area, after.total_area);
        prop_assert!(after.min_bending_space >= before.min_bending_space);
    }

    /// Raising one quantity never shrinks any figure or the recommendation.
    #[test]
    fn monotonic_in_quantity(
        entries in prop::collection::vec(entry(), 1..12),
        pick in any::<prop::sample::Index>(),
        extra in 1u32..40,
    ) {
        let before = compute_size(&entries).unwrap();
        let mut grown = entries.clone();
        let i = pick.index(grown.len());
        grown[i].quantity += extra;
        let after = compute_size(&grown).unwrap();

        prop_assert!(after.total_area >= before.total_area);
        prop_assert!(after.min_cross_section >= before.min_cross_section);
        prop_assert!(after.min_dimension >= before.min_dimension);
        match (before.recommended_size, after.recommended_size) {
            (Some(b), Some(a)) => prop_assert!(a >= b),
            (None, Some(_)) => prop_assert!(false, "custom size became standard"),
            _ => {}
        }
    }

    /// The recommendation is the smallest standard size covering the
    /// required side, or custom when none does.
    #[test]
    fn recommendation_is_smallest_fit(entries in entries()) {
        let result = compute_size(&entries).unwrap();
        let required = result.min_dimension.max(result.min_bending_space);
        prop_assert_eq!(result.min_required_side, required);

        let fitting: Vec<u32> = STANDARD_SIZES
            .iter()
            .copied()
            .filter(|&s| f64::from(s) >= required)
            .collect();
        prop_assert_eq!(result.recommended_size, fitting.first().copied());
        prop_assert_eq!(result.requires_custom_size, fitting.is_empty());
    }

    /// Entry order does not matter.
    #[test]
    fn order_independent(entries in entries()) {
        let forward = compute_size(&entries).unwrap();
        let mut reversed = entries.clone();
        reversed.reverse();
        let backward = compute_size(&reversed).unwrap();
        prop_assert!((forward.total_area - backward.total_area).abs() < 1e-9);
        prop_assert_eq!(forward.min_bending_space, backward.min_bending_space);
    }

    /// Quantity text that never starts with a digit or sign reads as zero.
    #[test]
    fn non_numeric_quantity_reads_zero(text in "[a-zA-Z ]{0,12}") {
        prop_assert_eq!(gutterguard::parse_quantity(&text), 0);
    }
}
