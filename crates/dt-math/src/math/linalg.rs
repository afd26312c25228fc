//! Dense-matrix helpers for the multivariate distance statistic.
//!
//! Small fixed-size problems only (one matrix per analysis window, dimension
//! = number of monitored features), so plain `Vec<Vec<f64>>` with Gauss-Jordan
//! elimination is enough; no external linear-algebra crate is warranted.

/// Column means of a row-major sample matrix. Rows must be non-empty and of
/// equal length.
pub fn mean_vector(rows: &[Vec<f64>]) -> Vec<f64> {
    let n = rows.len();
    let p = rows.first().map_or(0, Vec::len);
    let mut mean = vec![0.0; p];
    for row in rows {
        for (m, v) in mean.iter_mut().zip(row) {
            *m += v;
        }
    }
    for m in &mut mean {
        *m /= n as f64;
    }
    mean
}

/// Sample covariance matrix (denominator n-1). Requires at least 2 rows.
pub fn covariance_matrix(rows: &[Vec<f64>], mean: &[f64]) -> Vec<Vec<f64>> {
    let n = rows.len();
    let p = mean.len();
    let mut cov = vec![vec![0.0; p]; p];
    for row in rows {
        for i in 0..p {
            let di = row[i] - mean[i];
            for j in 0..p {
                cov[i][j] += di * (row[j] - mean[j]);
            }
        }
    }
    let denom = (n - 1) as f64;
    for r in &mut cov {
        for c in r.iter_mut() {
            *c /= denom;
        }
    }
    cov
}

/// Add `eps` to the diagonal in place (ridge regularization before inversion).
pub fn add_ridge(matrix: &mut [Vec<f64>], eps: f64) {
    for (i, row) in matrix.iter_mut().enumerate() {
        row[i] += eps;
    }
}

/// Invert a square matrix by Gauss-Jordan elimination with partial pivoting.
///
/// Returns None when a pivot collapses below 1e-12 (numerically singular).
pub fn invert_matrix(matrix: &[Vec<f64>]) -> Option<Vec<Vec<f64>>> {
    let n = matrix.len();
    if n == 0 || matrix.iter().any(|r| r.len() != n) {
        return None;
    }

    // Augmented [A | I]
    let mut aug = vec![vec![0.0; 2 * n]; n];
    for i in 0..n {
        aug[i][..n].copy_from_slice(&matrix[i]);
        aug[i][n + i] = 1.0;
    }

    for col in 0..n {
        let mut max_row = col;
        for k in (col + 1)..n {
            if aug[k][col].abs() > aug[max_row][col].abs() {
                max_row = k;
            }
        }
        aug.swap(col, max_row);

        let pivot = aug[col][col];
        if pivot.abs() < 1e-12 || !pivot.is_finite() {
            return None;
        }
        for v in aug[col].iter_mut() {
            *v /= pivot;
        }
        for row in 0..n {
            if row == col {
                continue;
            }
            let factor = aug[row][col];
            if factor == 0.0 {
                continue;
            }
            for k in 0..2 * n {
                aug[row][k] -= factor * aug[col][k];
            }
        }
    }

    Some(aug.into_iter().map(|row| row[n..].to_vec()).collect())
}

/// Quadratic form dᵀ M d.
pub fn quadratic_form(diff: &[f64], matrix: &[Vec<f64>]) -> f64 {
    let mut result = 0.0;
    for (i, di) in diff.iter().enumerate() {
        for (j, dj) in diff.iter().enumerate() {
            result += di * matrix[i][j] * dj;
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol
    }

    #[test]
    fn mean_vector_basic() {
        let rows = vec![vec![1.0, 10.0], vec![3.0, 30.0]];
        let mean = mean_vector(&rows);
        assert_eq!(mean, vec![2.0, 20.0]);
    }

    #[test]
    fn covariance_of_independent_columns() {
        // Column 0 varies, column 1 constant
        let rows = vec![vec![1.0, 5.0], vec![2.0, 5.0], vec![3.0, 5.0]];
        let mean = mean_vector(&rows);
        let cov = covariance_matrix(&rows, &mean);
        assert!(approx_eq(cov[0][0], 1.0, 1e-12)); // var([1,2,3]) = 1 (ddof 1)
        assert!(approx_eq(cov[1][1], 0.0, 1e-12));
        assert!(approx_eq(cov[0][1], 0.0, 1e-12));
        assert!(approx_eq(cov[1][0], 0.0, 1e-12));
    }

    #[test]
    fn covariance_is_symmetric() {
        let rows = vec![
            vec![1.0, 2.0, 0.5],
            vec![2.0, 1.0, 1.5],
            vec![4.0, 3.0, 0.0],
            vec![0.5, 2.5, 2.0],
        ];
        let mean = mean_vector(&rows);
        let cov = covariance_matrix(&rows, &mean);
        for i in 0..3 {
            for j in 0..3 {
                assert!(approx_eq(cov[i][j], cov[j][i], 1e-12));
            }
        }
    }

    #[test]
    fn add_ridge_hits_diagonal_only() {
        let mut m = vec![vec![1.0, 2.0], vec![3.0, 4.0]];
        add_ridge(&mut m, 0.5);
        assert_eq!(m, vec![vec![1.5, 2.0], vec![3.0, 4.5]]);
    }

    #[test]
    fn invert_identity() {
        let eye = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
        let inv = invert_matrix(&eye).unwrap();
        assert_eq!(inv, eye);
    }

    #[test]
    fn invert_known_2x2() {
        // [[4, 7], [2, 6]] has inverse [[0.6, -0.7], [-0.2, 0.4]]
        let m = vec![vec![4.0, 7.0], vec![2.0, 6.0]];
        let inv = invert_matrix(&m).unwrap();
        assert!(approx_eq(inv[0][0], 0.6, 1e-12));
        assert!(approx_eq(inv[0][1], -0.7, 1e-12));
        assert!(approx_eq(inv[1][0], -0.2, 1e-12));
        assert!(approx_eq(inv[1][1], 0.4, 1e-12));
    }

    #[test]
    fn invert_singular_returns_none() {
        let m = vec![vec![1.0, 2.0], vec![2.0, 4.0]];
        assert!(invert_matrix(&m).is_none());
    }

    #[test]
    fn invert_non_square_returns_none() {
        let m = vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]];
        assert!(invert_matrix(&m).is_none());
        assert!(invert_matrix(&[]).is_none());
    }

    #[test]
    fn invert_ridge_rescues_zero_matrix() {
        let mut m = vec![vec![0.0, 0.0], vec![0.0, 0.0]];
        add_ridge(&mut m, 1e-6);
        let inv = invert_matrix(&m).unwrap();
        assert!(approx_eq(inv[0][0], 1e6, 1.0));
    }

    #[test]
    fn quadratic_form_identity_is_squared_norm() {
        let eye = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
        let d = vec![3.0, 4.0];
        assert!(approx_eq(quadratic_form(&d, &eye), 25.0, 1e-12));
    }

    #[test]
    fn quadratic_form_with_inverse_covariance() {
        // Diagonal covariance: distance decomposes into per-axis z² terms
        let cov = vec![vec![4.0, 0.0], vec![0.0, 9.0]];
        let inv = invert_matrix(&cov).unwrap();
        let d = vec![2.0, 3.0];
        // (2²/4) + (3²/9) = 1 + 1 = 2
        assert!(approx_eq(quadratic_form(&d, &inv), 2.0, 1e-12));
    }
}
