//! Property-based tests for the fuzzy set algebra
//!
//! These tests use proptest to check laws that must hold for every
//! piecewise-linear membership function, including sets with vertical
//! segments and sets spanning different x ranges.

use proptest::prelude::*;

use fuzzykit::{FuzzySet, FuzzySetBuilder, SetPoint, Strength};

const EPS: f64 = 1e-9;

// ===== Strategies for generating test data =====

/// Membership values on a 1/64 grid, so `1 - (1 - y)` is exact
fn arb_membership() -> impl Strategy<Value = f64> {
    (0u32..=64).prop_map(|k| k as f64 / 64.0)
}

/// Breakpoints with non-decreasing x; repeated x values make jumps
fn arb_set() -> impl Strategy<Value = FuzzySet> {
    prop::collection::vec((-50i32..50, arb_membership()), 1..8).prop_map(|mut pairs| {
        pairs.sort_by_key(|&(x, _)| x);
        let points = pairs
            .into_iter()
            .map(|(x, y)| SetPoint::new(x as f64 / 2.0, y))
            .collect();
        FuzzySet::from_points(points).unwrap()
    })
}

/// x positions to sample, including points outside every breakpoint range
fn arb_x() -> impl Strategy<Value = f64> {
    -40.0f64..40.0
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= EPS
}

// ===== Property Tests =====

proptest! {
    #[test]
    fn prop_complement_is_an_involution(s in arb_set()) {
        prop_assert_eq!(s.complement().complement(), s);
    }

    #[test]
    fn prop_union_commutes(a in arb_set(), b in arb_set()) {
        prop_assert_eq!(a.union(&b), b.union(&a));
    }

    #[test]
    fn prop_intersection_commutes(a in arb_set(), b in arb_set()) {
        prop_assert_eq!(a.intersection(&b), b.intersection(&a));
    }

    #[test]
    fn prop_union_is_pointwise_max(a in arb_set(), b in arb_set(), x in arb_x()) {
        let u = a.union(&b);
        prop_assert!(close(u.membership(x), a.membership(x).max(b.membership(x))));
        prop_assert!(close(u.left_limit(x), a.left_limit(x).max(b.left_limit(x))));
        prop_assert!(close(u.right_limit(x), a.right_limit(x).max(b.right_limit(x))));
    }

    #[test]
    fn prop_intersection_is_pointwise_min(a in arb_set(), b in arb_set(), x in arb_x()) {
        let i = a.intersection(&b);
        prop_assert!(close(i.membership(x), a.membership(x).min(b.membership(x))));
    }

    #[test]
    fn prop_complement_is_pointwise(s in arb_set(), x in arb_x()) {
        let c = s.complement();
        prop_assert!(close(c.left_limit(x), 1.0 - s.left_limit(x)));
        prop_assert!(close(c.right_limit(x), 1.0 - s.right_limit(x)));
    }

    #[test]
    fn prop_horizontal_intersection_caps(s in arb_set(), level in arb_membership(), x in arb_x()) {
        let clipped = s.horizontal_intersection(level).unwrap();
        prop_assert!(close(clipped.membership(x), s.membership(x).min(level)));
        prop_assert!(clipped.max_y() <= level + EPS);
    }

    #[test]
    fn prop_simplify_preserves_membership(s in arb_set(), x in arb_x()) {
        let simple = s.simplify();
        prop_assert!(simple.len() <= s.len());
        prop_assert!(close(simple.membership(x), s.membership(x)));
        prop_assert!(simple.equals(&s, Strength::Weak, EPS));
    }

    #[test]
    fn prop_weak_cut_contains_strong_cut(s in arb_set(), level in arb_membership(), x in arb_x()) {
        let weak = s.alpha_cut(Strength::Weak, level);
        let strong = s.alpha_cut(Strength::Strong, level);
        if strong.contains(x) {
            prop_assert!(weak.contains(x));
        }
        if weak.contains(x) {
            prop_assert!(s.membership(x) >= level - EPS);
        }
    }

    #[test]
    fn prop_intersection_tests_agree_on_disjoint_supports(a in arb_set(), b in arb_set()) {
        // disjoint closed supports imply a zero-height intersection
        if a.non_intersection_test(&b) {
            prop_assert!(a.no_intersection_test(&b));
        }
    }

    #[test]
    fn prop_moment_lies_within_breakpoints(s in arb_set()) {
        if let (Ok(x), Some((lo, hi))) = (s.moment_defuzzify(), s.x_range()) {
            prop_assert!(x >= lo - EPS && x <= hi + EPS);
        }
    }

    #[test]
    fn prop_builder_matches_sorted_input(pairs in prop::collection::vec((-50i32..50, arb_membership()), 1..8)) {
        let mut builder = FuzzySetBuilder::new();
        for &(x, y) in &pairs {
            builder.insert(x as f64, y);
        }
        let built = builder.build().unwrap();
        let xs: Vec<f64> = built.points().iter().map(|p| p.x).collect();
        prop_assert!(xs.windows(2).all(|w| w[0] <= w[1]));
        prop_assert_eq!(built.len(), pairs.len());
    }
}
