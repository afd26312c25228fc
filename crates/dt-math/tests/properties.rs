//! Property-based tests for dt-math invariants.

use dt_math::{
    chi_square_cdf, chi_square_quantile, clip_unit, invert_matrix, max_entropy_bits,
    normalize_weights, shannon_entropy_bits,
};
use proptest::prelude::*;

proptest! {
    #[test]
    fn clip_unit_always_in_unit_interval(x in proptest::num::f64::ANY) {
        let clipped = clip_unit(x);
        prop_assert!((0.0..=1.0).contains(&clipped));
    }

    #[test]
    fn chi_square_cdf_is_a_probability(x in 0.0f64..1e6, dof in 1usize..30) {
        let p = chi_square_cdf(x, dof);
        prop_assert!(p.is_finite());
        prop_assert!((-1e-12..=1.0 + 1e-12).contains(&p));
    }

    #[test]
    fn chi_square_quantile_roundtrips(p in 0.001f64..0.999, dof in 1usize..30) {
        let x = chi_square_quantile(p, dof);
        prop_assert!(x.is_finite() && x > 0.0);
        let back = chi_square_cdf(x, dof);
        prop_assert!((back - p).abs() < 1e-8, "p={p} dof={dof} back={back}");
    }

    #[test]
    fn entropy_bounded_by_uniform(weights in proptest::collection::vec(0.0f64..100.0, 1..10)) {
        if let Some(probs) = normalize_weights(&weights) {
            let h = shannon_entropy_bits(&probs);
            prop_assert!(h >= -1e-12);
            prop_assert!(h <= max_entropy_bits(probs.len()) + 1e-9);
        }
    }

    #[test]
    fn inverse_times_matrix_is_identity(
        diag in proptest::collection::vec(0.5f64..10.0, 2..5),
        off in 0.0f64..0.2,
    ) {
        // Diagonally dominant symmetric matrices are well conditioned
        let n = diag.len();
        let mut m = vec![vec![off; n]; n];
        for i in 0..n {
            m[i][i] = diag[i];
        }
        let inv = invert_matrix(&m).expect("well-conditioned matrix must invert");
        for i in 0..n {
            for j in 0..n {
                let mut cell = 0.0;
                for (k, inv_row) in inv.iter().enumerate() {
                    cell += m[i][k] * inv_row[j];
                }
                let expected = if i == j { 1.0 } else { 0.0 };
                prop_assert!((cell - expected).abs() < 1e-8);
            }
        }
    }
}
