//! Deterministic RNG utilities for reproducible tests.

use nalgebra::{DMatrix, DVector};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Create a deterministic `ChaCha8Rng` from a seed.
///
/// All test randomization should go through this to ensure reproducibility.
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Random `n x n` orthogonal matrix (Q factor of a uniform random matrix).
pub fn random_orthogonal(rng: &mut impl Rng, n: usize) -> DMatrix<f64> {
    let m = DMatrix::from_fn(n, n, |_, _| rng.gen_range(-1.0..1.0));
    m.qr().q()
}

/// Random symmetric matrix `Q diag(spectrum) Qᵀ` with the given eigenvalues.
pub fn random_symmetric_with_spectrum(rng: &mut impl Rng, spectrum: &[f64]) -> DMatrix<f64> {
    let q = random_orthogonal(rng, spectrum.len());
    let lambda = DMatrix::from_diagonal(&DVector::from_column_slice(spectrum));
    let m = &q * lambda * q.transpose();
    // exact symmetry
    (&m + m.transpose()) * 0.5
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_rng_is_deterministic() {
        let mut rng1 = seeded_rng(42);
        let mut rng2 = seeded_rng(42);
        let v1: f64 = rng1.r#gen();
        let v2: f64 = rng2.r#gen();
        assert!((v1 - v2).abs() < f64::EPSILON);
    }

    #[test]
    fn orthogonal_matrix_is_orthogonal() {
        let q = random_orthogonal(&mut seeded_rng(7), 5);
        let err = (q.transpose() * &q - DMatrix::identity(5, 5)).norm();
        assert!(err < 1e-10, "‖QᵀQ − I‖ = {err}");
    }

    #[test]
    fn prescribed_spectrum_is_recovered() {
        let spectrum = [-2.0, 0.5, 3.0, 7.0];
        let m = random_symmetric_with_spectrum(&mut seeded_rng(3), &spectrum);
        assert_eq!(m, m.transpose());
        let mut eig: Vec<f64> = m.symmetric_eigenvalues().iter().copied().collect();
        eig.sort_by(f64::total_cmp);
        for (got, want) in eig.iter().zip(spectrum) {
            assert!((got - want).abs() < 1e-9, "{got} vs {want}");
        }
    }
}
