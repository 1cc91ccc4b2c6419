//! Hessian correction for the backward pass.
//!
//! Raises the smallest eigenvalue of a symmetric curvature matrix to a
//! target `ε` in place. Four strategies trade cost against tightness:
//!
//! 1. **Diagonal shift**: `H + εI`. Cheapest. Reaches the target only when
//!    `H` is already positive semi-definite.
//! 2. **Cholesky modification**: smallest `τ` in a doubling sequence such
//!    that `H − εI + τI` factorises; result `H + τI`.
//! 3. **Eigenvalue modification**: clip the spectrum at `ε` and rebuild.
//!    Tightest; eigenvectors are preserved.
//! 4. **Gershgorin modification**: lift each diagonal entry above its
//!    Gershgorin radius. No factorisation, may over-shift.
//!
//! Every strategy leaves a matrix that already satisfies `λ_min(H) ≥ ε`
//! (up to [`linalg::ROUNDING_TOLERANCE`]) bit-identical.

use std::fmt;
use std::str::FromStr;

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use talos_core::linalg;
use tracing::debug;

use crate::error::{CorrectionError, UnknownStrategy};

/// Hessian correction strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Strategy {
    #[default]
    DiagonalShift,
    CholeskyModification,
    EigenvalueModification,
    GershgorinModification,
}

impl Strategy {
    pub const ALL: [Self; 4] = [
        Self::DiagonalShift,
        Self::CholeskyModification,
        Self::EigenvalueModification,
        Self::GershgorinModification,
    ];

    /// Configuration label, e.g. `"EIGENVALUE_MODIFICATION"`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DiagonalShift => "DIAGONAL_SHIFT",
            Self::CholeskyModification => "CHOLESKY_MODIFICATION",
            Self::EigenvalueModification => "EIGENVALUE_MODIFICATION",
            Self::GershgorinModification => "GERSHGORIN_MODIFICATION",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = UnknownStrategy;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|s| s.as_str() == name)
            .ok_or_else(|| UnknownStrategy(name.to_string()))
    }
}

/// Correct `matrix` in place so that `λ_min(matrix) ≥ min_eigenvalue`.
///
/// `matrix` must be symmetric. Returns `NotSquare` for non-square input and
/// surfaces factorisation failures of the Cholesky and eigenvalue
/// strategies.
pub fn shift_hessian(
    strategy: Strategy,
    matrix: &mut DMatrix<f64>,
    min_eigenvalue: f64,
) -> Result<(), CorrectionError> {
    if !matrix.is_square() {
        return Err(CorrectionError::NotSquare {
            rows: matrix.nrows(),
            cols: matrix.ncols(),
        });
    }

    if linalg::meets_min_eigenvalue(matrix, min_eigenvalue) {
        return Ok(());
    }

    match strategy {
        Strategy::DiagonalShift => {
            for i in 0..matrix.nrows() {
                matrix[(i, i)] += min_eigenvalue;
            }
            debug!(shift = min_eigenvalue, "diagonal shift");
        }
        Strategy::CholeskyModification => {
            let tau = linalg::make_psd_cholesky(matrix, min_eigenvalue)?;
            if tau > 0.0 {
                debug!(tau, "cholesky modification");
            }
        }
        Strategy::EigenvalueModification => {
            if linalg::make_psd_eigenvalue(matrix, min_eigenvalue)? {
                debug!(min_eigenvalue, "eigenvalue modification");
            }
        }
        Strategy::GershgorinModification => {
            linalg::make_psd_gershgorin(matrix, min_eigenvalue)?;
            debug!(min_eigenvalue, "gershgorin modification");
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
