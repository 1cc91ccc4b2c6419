//! Dense linear-algebra helpers for curvature matrices.
//!
//! Pure routines with no solver state: symmetric spectra, positive
//! definiteness tests, and the three PSD repair methods used by Hessian
//! correction (eigenvalue clipping, Gershgorin-disc shifting and
//! Cholesky with added multiple of the identity).

use nalgebra::{Cholesky, DMatrix, DVector};

use crate::error::LinalgError;

/// Iteration cap for the symmetric QR eigen-solver.
const MAX_EIGEN_ITERATIONS: usize = 10_000;

/// Minimum identity shift tried by [`make_psd_cholesky`] (Nocedal & Wright β).
const CHOLESKY_MIN_SHIFT: f64 = 1e-3;

/// Relative slack of [`meets_min_eigenvalue`].
pub const ROUNDING_TOLERANCE: f64 = 1e-10;

/// Factorisation attempts before [`make_psd_cholesky`] gives up.
pub const CHOLESKY_MAX_ATTEMPTS: usize = 64;

// ============================================================================
// Queries
// ============================================================================

/// Returns `Err(NotSquare)` unless `m` is square.
pub fn ensure_square(m: &DMatrix<f64>) -> Result<(), LinalgError> {
    if m.is_square() {
        Ok(())
    } else {
        Err(LinalgError::NotSquare {
            rows: m.nrows(),
            cols: m.ncols(),
        })
    }
}

/// True if every entry is finite.
pub fn all_finite(m: &DMatrix<f64>) -> bool {
    m.iter().all(|v| v.is_finite())
}

/// Eigen's `isApprox`: `‖a − b‖ ≤ prec · min(‖a‖, ‖b‖)` in Frobenius norm.
pub fn is_approx(a: &DMatrix<f64>, b: &DMatrix<f64>, prec: f64) -> bool {
    (a - b).norm() <= prec * a.norm().min(b.norm())
}

/// Eigenvalues of a symmetric matrix (only the lower triangle is read).
pub fn symmetric_eigenvalues(m: &DMatrix<f64>) -> Result<DVector<f64>, LinalgError> {
    ensure_square(m)?;
    if m.is_empty() {
        return Ok(DVector::zeros(0));
    }
    m.clone()
        .try_symmetric_eigen(f64::EPSILON, MAX_EIGEN_ITERATIONS)
        .map(|eigen| eigen.eigenvalues)
        .ok_or(LinalgError::EigenDecompositionFailed)
}

/// True if `m − min_eigenvalue·I` admits a Cholesky factorisation, i.e. every
/// eigenvalue of `m` is strictly above `min_eigenvalue`.
pub fn is_positive_definite_above(m: &DMatrix<f64>, min_eigenvalue: f64) -> bool {
    if !m.is_square() {
        return false;
    }
    let mut work = m.clone();
    for i in 0..work.nrows() {
        work[(i, i)] -= min_eigenvalue;
    }
    Cholesky::new(work).is_some()
}

/// True if `λ_min(m) ≥ min_eigenvalue` up to rounding.
///
/// Inclusive counterpart of [`is_positive_definite_above`]: the threshold is
/// relaxed by `ROUNDING_TOLERANCE · max(1, ‖m‖)` so that a matrix sitting
/// exactly on the target (a singular Gauss-Newton Hessian at `ε = 0`, or
/// `diag(ε, …)`) is accepted.
pub fn meets_min_eigenvalue(m: &DMatrix<f64>, min_eigenvalue: f64) -> bool {
    let slack = ROUNDING_TOLERANCE * m.norm().max(1.0);
    is_positive_definite_above(m, min_eigenvalue - slack)
}

// ============================================================================
// PSD repair
// ============================================================================

/// Replace `m` by `½(m + mᵀ)`.
pub fn symmetrize(m: &mut DMatrix<f64>) {
    let transposed = m.transpose();
    *m += transposed;
    *m *= 0.5;
}

/// Clip every eigenvalue below `min_eigenvalue` up to it and rebuild
/// `m = V Λ' Vᵀ`.
///
/// Leaves `m` untouched (bit-identical) and returns `Ok(false)` when no
/// eigenvalue needed clipping.
pub fn make_psd_eigenvalue(m: &mut DMatrix<f64>, min_eigenvalue: f64) -> Result<bool, LinalgError> {
    ensure_square(m)?;
    if m.is_empty() {
        return Ok(false);
    }
    let eigen = m
        .clone()
        .try_symmetric_eigen(f64::EPSILON, MAX_EIGEN_ITERATIONS)
        .ok_or(LinalgError::EigenDecompositionFailed)?;

    let mut lambda = eigen.eigenvalues.clone();
    let mut clipped = false;
    for l in lambda.iter_mut() {
        if *l < min_eigenvalue {
            *l = min_eigenvalue;
            clipped = true;
        }
    }
    if clipped {
        let v = &eigen.eigenvectors;
        *m = v * DMatrix::from_diagonal(&lambda) * v.transpose();
    }
    Ok(clipped)
}

/// Raise each diagonal entry to at least its Gershgorin radius plus
/// `min_eigenvalue`, so every disc lies in `[min_eigenvalue, ∞)`.
///
/// The matrix is symmetrised first; radii are row sums of absolute
/// off-diagonal entries.
pub fn make_psd_gershgorin(m: &mut DMatrix<f64>, min_eigenvalue: f64) -> Result<(), LinalgError> {
    ensure_square(m)?;
    symmetrize(m);
    for i in 0..m.nrows() {
        let radius: f64 = m
            .row(i)
            .iter()
            .enumerate()
            .filter(|&(j, _)| j != i)
            .map(|(_, v)| v.abs())
            .sum();
        m[(i, i)] = m[(i, i)].max(radius + min_eigenvalue);
    }
    Ok(())
}

/// Cholesky with added multiple of the identity (Nocedal & Wright, Alg. 3.3)
/// applied to `m − min_eigenvalue·I`.
///
/// Finds the first `τ` in `{τ₀, 2τ₀, 4τ₀, …}` for which
/// `m − min_eigenvalue·I + τI` factorises and replaces `m` with `m + τI`.
/// A matrix that already meets the target (see [`meets_min_eigenvalue`]) is
/// left untouched with `τ = 0`. Otherwise `τ₀ = 0` when every shifted
/// diagonal entry is positive. Returns the applied shift.
pub fn make_psd_cholesky(m: &mut DMatrix<f64>, min_eigenvalue: f64) -> Result<f64, LinalgError> {
    ensure_square(m)?;
    if meets_min_eigenvalue(m, min_eigenvalue) {
        return Ok(0.0);
    }
    let n = m.nrows();

    let min_diag = (0..n)
        .map(|i| m[(i, i)] - min_eigenvalue)
        .fold(f64::INFINITY, f64::min);
    let mut tau = if min_diag > 0.0 {
        0.0
    } else {
        CHOLESKY_MIN_SHIFT - min_diag
    };

    let mut work = DMatrix::zeros(n, n);
    for _ in 0..CHOLESKY_MAX_ATTEMPTS {
        work.copy_from(m);
        for i in 0..n {
            work[(i, i)] += tau - min_eigenvalue;
        }
        if Cholesky::new(work.clone()).is_some() {
            if tau > 0.0 {
                for i in 0..n {
                    m[(i, i)] += tau;
                }
            }
            return Ok(tau);
        }
        tau = (2.0 * tau).max(CHOLESKY_MIN_SHIFT);
    }

    Err(LinalgError::CholeskyModificationFailed {
        attempts: CHOLESKY_MAX_ATTEMPTS,
        last_shift: tau,
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn indefinite() -> DMatrix<f64> {
        // eigenvalues 3 and -1
        DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 2.0, 1.0])
    }

    fn min_eig(m: &DMatrix<f64>) -> f64 {
        symmetric_eigenvalues(m).unwrap().min()
    }

    #[test]
    fn eigenvalues_of_indefinite_matrix() {
        let mut lambda = symmetric_eigenvalues(&indefinite()).unwrap();
        lambda.as_mut_slice().sort_by(f64::total_cmp);
        assert_relative_eq!(lambda[0], -1.0, epsilon = 1e-12);
        assert_relative_eq!(lambda[1], 3.0, epsilon = 1e-12);
    }

    #[test]
    fn eigenvalues_reject_non_square() {
        let err = symmetric_eigenvalues(&DMatrix::zeros(2, 3)).unwrap_err();
        assert_eq!(err, LinalgError::NotSquare { rows: 2, cols: 3 });
    }

    #[test]
    fn positive_definite_above_threshold() {
        let m = DMatrix::from_diagonal(&DVector::from_vec(vec![2.0, 3.0]));
        assert!(is_positive_definite_above(&m, 1.0));
        assert!(!is_positive_definite_above(&m, 2.5));
        assert!(!is_positive_definite_above(&DMatrix::zeros(2, 1), 0.0));
        assert!(!is_positive_definite_above(&indefinite(), 0.0));
        assert!(!is_positive_definite_above(&DMatrix::from_element(1, 1, f64::NAN), 0.0));
    }

    #[test]
    fn boundary_spectrum_meets_target() {
        let m = DMatrix::from_diagonal(&DVector::from_vec(vec![0.5, 3.0]));
        assert!(!is_positive_definite_above(&m, 0.5));
        assert!(meets_min_eigenvalue(&m, 0.5));
        assert!(!meets_min_eigenvalue(&m, 0.5 + 1e-6));

        let singular = DMatrix::from_element(2, 2, 1.0);
        assert!(meets_min_eigenvalue(&singular, 0.0));
        assert!(!meets_min_eigenvalue(&singular, 1e-6));
        assert!(!meets_min_eigenvalue(&DMatrix::from_element(1, 1, f64::NAN), 0.0));
    }

    #[test]
    fn eigenvalue_clipping_reaches_target() {
        let mut m = indefinite();
        assert!(make_psd_eigenvalue(&mut m, 0.1).unwrap());
        assert_relative_eq!(min_eig(&m), 0.1, epsilon = 1e-9);
        // The positive eigen-direction is preserved.
        let mut lambda = symmetric_eigenvalues(&m).unwrap();
        lambda.as_mut_slice().sort_by(f64::total_cmp);
        assert_relative_eq!(lambda[1], 3.0, epsilon = 1e-9);
    }

    #[test]
    fn eigenvalue_clipping_is_noop_when_satisfied() {
        let original = DMatrix::from_row_slice(2, 2, &[2.0, 0.5, 0.5, 2.0]);
        let mut m = original.clone();
        assert!(!make_psd_eigenvalue(&mut m, 0.1).unwrap());
        assert_eq!(m, original);
    }

    #[test]
    fn gershgorin_bounds_all_discs() {
        let mut m = indefinite();
        make_psd_gershgorin(&mut m, 0.1).unwrap();
        assert_relative_eq!(m[(0, 0)], 2.1);
        assert_relative_eq!(m[(1, 1)], 2.1);
        assert!(min_eig(&m) >= 0.1 - 1e-12);
    }

    #[test]
    fn cholesky_modification_reaches_target() {
        let mut m = indefinite();
        let tau = make_psd_cholesky(&mut m, 0.1).unwrap();
        assert!(tau > 1.0);
        assert!(min_eig(&m) >= 0.1);
    }

    #[test]
    fn cholesky_modification_is_noop_when_satisfied() {
        let original = DMatrix::from_row_slice(2, 2, &[2.0, 0.5, 0.5, 2.0]);
        let mut m = original.clone();
        assert_eq!(make_psd_cholesky(&mut m, 0.1).unwrap(), 0.0);
        assert_eq!(m, original);
    }

    #[test]
    fn cholesky_modification_is_noop_on_boundary() {
        let boundary = DMatrix::from_diagonal(&DVector::from_vec(vec![0.5, 3.0]));
        let mut m = boundary.clone();
        assert_eq!(make_psd_cholesky(&mut m, 0.5).unwrap(), 0.0);
        assert_eq!(m, boundary);

        let singular = DMatrix::from_element(2, 2, 1.0);
        let mut m = singular.clone();
        assert_eq!(make_psd_cholesky(&mut m, 0.0).unwrap(), 0.0);
        assert_eq!(m, singular);
    }

    #[test]
    fn cholesky_modification_fails_on_nan() {
        let mut m = DMatrix::from_element(2, 2, f64::NAN);
        let err = make_psd_cholesky(&mut m, 0.1).unwrap_err();
        assert!(matches!(
            err,
            LinalgError::CholeskyModificationFailed {
                attempts: CHOLESKY_MAX_ATTEMPTS,
                ..
            }
        ));
    }

    #[test]
    fn symmetrize_averages_off_diagonals() {
        let mut m = DMatrix::from_row_slice(2, 2, &[1.0, 4.0, 2.0, 1.0]);
        symmetrize(&mut m);
        assert_relative_eq!(m[(0, 1)], 3.0);
        assert_relative_eq!(m[(1, 0)], 3.0);
    }

    #[test]
    fn is_approx_uses_relative_frobenius_norm() {
        let a = DMatrix::identity(2, 2);
        let mut b = a.clone();
        b[(0, 1)] = 1e-9;
        assert!(is_approx(&a, &b, 1e-6));
        b[(0, 1)] = 1e-3;
        assert!(!is_approx(&a, &b, 1e-6));
    }
}
