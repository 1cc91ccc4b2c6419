//! Dimension and positive-semi-definiteness diagnostics.
//!
//! Every check returns a human-readable report, one line per problem, and an
//! empty string when the data is valid. Nothing here panics or returns an
//! error: callers decide whether a non-empty report is fatal. The checks
//! allocate and compute spectra, so keep them out of real-time paths.

use std::fmt::Write as _;

use nalgebra::DMatrix;

use crate::linalg;
use crate::types::{
    ScalarFunctionLinearApproximation, ScalarFunctionQuadraticApproximation,
    VectorFunctionLinearApproximation, VectorFunctionQuadraticApproximation,
};

/// Relative tolerance of the self-adjointness test.
pub const SYMMETRY_TOLERANCE: f64 = 1e-6;

// ---------------------------------------------------------------------------
// Size checks
// ---------------------------------------------------------------------------

/// Shape check for scalar-valued Taylor models.
pub trait SizeCheck {
    /// Append one line per mismatching block to `errors`.
    fn size_errors(&self, state_dim: usize, input_dim: usize, data_name: &str, errors: &mut String);
}

/// Shape check for vector-valued Taylor models.
pub trait VectorSizeCheck {
    /// Append one line per mismatching block to `errors`.
    fn size_errors(
        &self,
        vector_dim: usize,
        state_dim: usize,
        input_dim: usize,
        data_name: &str,
        errors: &mut String,
    );
}

/// Verify every block of a scalar model against `(state_dim, input_dim)`.
pub fn check_size<T: SizeCheck + ?Sized>(
    state_dim: usize,
    input_dim: usize,
    data: &T,
    data_name: &str,
) -> String {
    let mut errors = String::new();
    data.size_errors(state_dim, input_dim, data_name, &mut errors);
    errors
}

/// Verify every block of a vector model against `(vector_dim, state_dim, input_dim)`.
pub fn check_vector_size<T: VectorSizeCheck + ?Sized>(
    vector_dim: usize,
    state_dim: usize,
    input_dim: usize,
    data: &T,
    data_name: &str,
) -> String {
    let mut errors = String::new();
    data.size_errors(vector_dim, state_dim, input_dim, data_name, &mut errors);
    errors
}

impl SizeCheck for ScalarFunctionLinearApproximation {
    fn size_errors(&self, state_dim: usize, input_dim: usize, data_name: &str, errors: &mut String) {
        if self.dfdx.len() != state_dim {
            let _ = writeln!(errors, "{data_name}.dfdx.len() != {state_dim}");
        }
        if self.dfdu.len() != input_dim {
            let _ = writeln!(errors, "{data_name}.dfdu.len() != {input_dim}");
        }
    }
}

impl SizeCheck for ScalarFunctionQuadraticApproximation {
    fn size_errors(&self, state_dim: usize, input_dim: usize, data_name: &str, errors: &mut String) {
        if self.dfdx.len() != state_dim {
            let _ = writeln!(errors, "{data_name}.dfdx.len() != {state_dim}");
        }
        if self.dfdxx.nrows() != state_dim {
            let _ = writeln!(errors, "{data_name}.dfdxx.nrows() != {state_dim}");
        }
        if self.dfdxx.ncols() != state_dim {
            let _ = writeln!(errors, "{data_name}.dfdxx.ncols() != {state_dim}");
        }
        if self.dfdu.len() != input_dim {
            let _ = writeln!(errors, "{data_name}.dfdu.len() != {input_dim}");
        }
        if self.dfduu.nrows() != input_dim {
            let _ = writeln!(errors, "{data_name}.dfduu.nrows() != {input_dim}");
        }
        if self.dfduu.ncols() != input_dim {
            let _ = writeln!(errors, "{data_name}.dfduu.ncols() != {input_dim}");
        }
        if self.dfdux.nrows() != input_dim {
            let _ = writeln!(errors, "{data_name}.dfdux.nrows() != {input_dim}");
        }
        // Input-less models may carry either a 0x0 or a 0xnx block here.
        if self.dfdux.ncols() != state_dim && input_dim > 0 {
            let _ = writeln!(errors, "{data_name}.dfdux.ncols() != {state_dim}");
        }
    }
}

fn vector_linear_size_errors(
    f_len: usize,
    dfdx: &DMatrix<f64>,
    dfdu: &DMatrix<f64>,
    (vector_dim, state_dim, input_dim): (usize, usize, usize),
    data_name: &str,
    errors: &mut String,
) {
    if f_len != vector_dim {
        let _ = writeln!(errors, "{data_name}.f.len() != {vector_dim}");
    }
    if vector_dim > 0 && dfdx.nrows() != vector_dim {
        let _ = writeln!(errors, "{data_name}.dfdx.nrows() != {vector_dim}");
    }
    if vector_dim > 0 && dfdx.ncols() != state_dim {
        let _ = writeln!(errors, "{data_name}.dfdx.ncols() != {state_dim}");
    }
    if vector_dim > 0 && input_dim > 0 && dfdu.nrows() != vector_dim {
        let _ = writeln!(errors, "{data_name}.dfdu.nrows() != {vector_dim}");
    }
    if vector_dim > 0 && input_dim > 0 && dfdu.ncols() != input_dim {
        let _ = writeln!(errors, "{data_name}.dfdu.ncols() != {input_dim}");
    }
}

impl VectorSizeCheck for VectorFunctionLinearApproximation {
    fn size_errors(
        &self,
        vector_dim: usize,
        state_dim: usize,
        input_dim: usize,
        data_name: &str,
        errors: &mut String,
    ) {
        vector_linear_size_errors(
            self.f.len(),
            &self.dfdx,
            &self.dfdu,
            (vector_dim, state_dim, input_dim),
            data_name,
            errors,
        );
    }
}

impl VectorSizeCheck for VectorFunctionQuadraticApproximation {
    fn size_errors(
        &self,
        vector_dim: usize,
        state_dim: usize,
        input_dim: usize,
        data_name: &str,
        errors: &mut String,
    ) {
        vector_linear_size_errors(
            self.f.len(),
            &self.dfdx,
            &self.dfdu,
            (vector_dim, state_dim, input_dim),
            data_name,
            errors,
        );
        for (label, blocks) in [
            ("dfdxx", &self.dfdxx),
            ("dfdux", &self.dfdux),
            ("dfduu", &self.dfduu),
        ] {
            if blocks.len() != vector_dim {
                let _ = writeln!(errors, "{data_name}.{label}.len() != {vector_dim}");
            }
        }
        for (i, m) in self.dfdxx.iter().enumerate() {
            if m.shape() != (state_dim, state_dim) {
                let _ = writeln!(errors, "{data_name}.dfdxx[{i}] is not {state_dim}x{state_dim}");
            }
        }
        if input_dim > 0 {
            for (i, m) in self.dfdux.iter().enumerate() {
                if m.shape() != (input_dim, state_dim) {
                    let _ = writeln!(errors, "{data_name}.dfdux[{i}] is not {input_dim}x{state_dim}");
                }
            }
            for (i, m) in self.dfduu.iter().enumerate() {
                if m.shape() != (input_dim, input_dim) {
                    let _ = writeln!(errors, "{data_name}.dfduu[{i}] is not {input_dim}x{input_dim}");
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// PSD checks
// ---------------------------------------------------------------------------

/// Positive-semi-definiteness check.
pub trait PsdCheck {
    /// Append one line per detected problem to `errors`.
    fn psd_errors(&self, data_name: &str, errors: &mut String);
}

/// Report non-finite entries, asymmetry and negative curvature of `data`.
pub fn check_being_psd<T: PsdCheck + ?Sized>(data: &T, data_name: &str) -> String {
    let mut errors = String::new();
    data.psd_errors(data_name, &mut errors);
    errors
}

impl PsdCheck for DMatrix<f64> {
    fn psd_errors(&self, data_name: &str, errors: &mut String) {
        if self.is_empty() {
            return;
        }

        let finite = linalg::all_finite(self);
        if !finite {
            let _ = writeln!(errors, "{data_name} is not finite.");
        }

        if !self.is_square() {
            let _ = writeln!(errors, "{data_name} is not a square matrix.");
            return;
        }

        if !linalg::is_approx(self, &self.transpose(), SYMMETRY_TOLERANCE) {
            let _ = writeln!(errors, "{data_name} is not self-adjoint.");
        }

        // The spectrum of a matrix with NaN/Inf entries is meaningless.
        if !finite {
            return;
        }
        match linalg::symmetric_eigenvalues(self) {
            Ok(lambda) => {
                let min_eigenvalue = lambda.min();
                if min_eigenvalue < -f64::EPSILON {
                    let _ = writeln!(
                        errors,
                        "{data_name} is not PSD. Its smallest eigenvalue is {min_eigenvalue}."
                    );
                }
            }
            Err(err) => {
                let _ = writeln!(errors, "{data_name}: {err}.");
            }
        }
    }
}

impl PsdCheck for ScalarFunctionQuadraticApproximation {
    fn psd_errors(&self, data_name: &str, errors: &mut String) {
        if !self.f.is_finite() {
            let _ = writeln!(errors, "{data_name} is not finite.");
        }
        if !self.dfdx.iter().all(|v| v.is_finite()) {
            let _ = writeln!(errors, "{data_name} first derivative w.r.t. state is not finite.");
        }
        if !self.dfdu.iter().all(|v| v.is_finite()) {
            let _ = writeln!(errors, "{data_name} first derivative w.r.t. input is not finite.");
        }
        if !linalg::all_finite(&self.dfdux) {
            let _ = writeln!(
                errors,
                "{data_name} second derivative w.r.t. input-state is not finite."
            );
        }

        self.dfdxx
            .psd_errors(&format!("{data_name} second derivative w.r.t. state"), errors);
        self.dfduu
            .psd_errors(&format!("{data_name} second derivative w.r.t. input"), errors);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
