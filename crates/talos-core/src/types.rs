//! Local Taylor models of scalar and vector functions of state and input.
//!
//! All four types follow the same conventions:
//!
//! - `nx` is the state dimension, `nu` the input dimension. `nu = None`
//!   marks a node without a controllable input (event and final nodes); every
//!   input block then collapses to an empty `0x0` (or length-0) block.
//! - [`resize`](ScalarFunctionQuadraticApproximation::resize) keeps the
//!   existing buffers when the shape already matches and reallocates
//!   otherwise. Callers must overwrite the content after a resize.
//! - [`set_zero`](ScalarFunctionQuadraticApproximation::set_zero) resizes and
//!   zeroes; `zero` is the matching factory.
//! - `+=` requires identical shapes on both sides and panics otherwise.
//!   Combining terms of different shapes is a caller bug; run
//!   [`check_size`](crate::validation::check_size) in tests to catch it.

use std::fmt;
use std::ops::{AddAssign, MulAssign};

use nalgebra::{DMatrix, DVector};

// ---------------------------------------------------------------------------
// Buffer helpers
// ---------------------------------------------------------------------------

fn resize_vector(v: &mut DVector<f64>, n: usize) {
    if v.len() != n {
        *v = DVector::zeros(n);
    }
}

fn resize_matrix(m: &mut DMatrix<f64>, rows: usize, cols: usize) {
    if m.shape() != (rows, cols) {
        *m = DMatrix::zeros(rows, cols);
    }
}

fn empty_vector() -> DVector<f64> {
    DVector::zeros(0)
}

fn empty_matrix() -> DMatrix<f64> {
    DMatrix::zeros(0, 0)
}

/// Row-wise rendering of a vector for the `Display` impls.
fn fmt_row(v: &DVector<f64>) -> String {
    v.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

// ---------------------------------------------------------------------------
// ScalarFunctionLinearApproximation
// ---------------------------------------------------------------------------

/// Affine model of a scalar function: `f(x,u) ≈ f + dfdx·δx + dfdu·δu`.
#[derive(Clone, Debug, PartialEq)]
pub struct ScalarFunctionLinearApproximation {
    /// Function value at the linearisation point.
    pub f: f64,
    /// Gradient w.r.t. state (length `nx`).
    pub dfdx: DVector<f64>,
    /// Gradient w.r.t. input (length `nu`, empty if not applicable).
    pub dfdu: DVector<f64>,
}

impl Default for ScalarFunctionLinearApproximation {
    fn default() -> Self {
        Self {
            f: 0.0,
            dfdx: empty_vector(),
            dfdu: empty_vector(),
        }
    }
}

impl ScalarFunctionLinearApproximation {
    /// Allocate a model with zeroed blocks of the given shape.
    pub fn new(nx: usize, nu: Option<usize>) -> Self {
        Self::zero(nx, nu)
    }

    /// Zero model of the given shape.
    pub fn zero(nx: usize, nu: Option<usize>) -> Self {
        let mut approx = Self::default();
        approx.set_zero(nx, nu);
        approx
    }

    /// Reshape the derivative blocks. Content is unspecified afterwards.
    pub fn resize(&mut self, nx: usize, nu: Option<usize>) -> &mut Self {
        resize_vector(&mut self.dfdx, nx);
        match nu {
            Some(nu) => resize_vector(&mut self.dfdu, nu),
            None => self.dfdu = empty_vector(),
        }
        self
    }

    /// Reshape and zero every block, including `f`.
    pub fn set_zero(&mut self, nx: usize, nu: Option<usize>) -> &mut Self {
        self.resize(nx, nu);
        self.f = 0.0;
        self.dfdx.fill(0.0);
        self.dfdu.fill(0.0);
        self
    }
}

impl AddAssign<&Self> for ScalarFunctionLinearApproximation {
    fn add_assign(&mut self, rhs: &Self) {
        self.f += rhs.f;
        self.dfdx += &rhs.dfdx;
        self.dfdu += &rhs.dfdu;
    }
}

impl AddAssign for ScalarFunctionLinearApproximation {
    fn add_assign(&mut self, rhs: Self) {
        *self += &rhs;
    }
}

impl MulAssign<f64> for ScalarFunctionLinearApproximation {
    fn mul_assign(&mut self, scalar: f64) {
        self.f *= scalar;
        self.dfdx *= scalar;
        self.dfdu *= scalar;
    }
}

impl fmt::Display for ScalarFunctionLinearApproximation {
    fn fmt(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(out, "f: {}", self.f)?;
        writeln!(out, "dfdx: {}", fmt_row(&self.dfdx))?;
        writeln!(out, "dfdu: {}", fmt_row(&self.dfdu))
    }
}

// ---------------------------------------------------------------------------
// ScalarFunctionQuadraticApproximation
// ---------------------------------------------------------------------------

/// Quadratic model of a scalar function:
///
/// ```text
/// f(x,u) ≈ f + dfdx·δx + dfdu·δu + ½δxᵀ dfdxx δx + δuᵀ dfdux δx + ½δuᵀ dfduu δu
/// ```
///
/// `dfdxx` and `dfduu` are symmetric. For cost-like roles they are also
/// expected to be PSD; that is checked by
/// [`check_being_psd`](crate::validation::check_being_psd), not enforced here.
#[derive(Clone, Debug, PartialEq)]
pub struct ScalarFunctionQuadraticApproximation {
    /// Function value at the linearisation point.
    pub f: f64,
    /// Gradient w.r.t. state (length `nx`).
    pub dfdx: DVector<f64>,
    /// Gradient w.r.t. input (length `nu`).
    pub dfdu: DVector<f64>,
    /// State Hessian (`nx x nx`).
    pub dfdxx: DMatrix<f64>,
    /// Mixed input-state Hessian (`nu x nx`).
    pub dfdux: DMatrix<f64>,
    /// Input Hessian (`nu x nu`).
    pub dfduu: DMatrix<f64>,
}

impl Default for ScalarFunctionQuadraticApproximation {
    fn default() -> Self {
        Self {
            f: 0.0,
            dfdx: empty_vector(),
            dfdu: empty_vector(),
            dfdxx: empty_matrix(),
            dfdux: empty_matrix(),
            dfduu: empty_matrix(),
        }
    }
}

impl ScalarFunctionQuadraticApproximation {
    /// Allocate a model with zeroed blocks of the given shape.
    pub fn new(nx: usize, nu: Option<usize>) -> Self {
        Self::zero(nx, nu)
    }

    /// Zero model of the given shape.
    pub fn zero(nx: usize, nu: Option<usize>) -> Self {
        let mut approx = Self::default();
        approx.set_zero(nx, nu);
        approx
    }

    /// Reshape the derivative blocks. Content is unspecified afterwards.
    pub fn resize(&mut self, nx: usize, nu: Option<usize>) -> &mut Self {
        resize_vector(&mut self.dfdx, nx);
        resize_matrix(&mut self.dfdxx, nx, nx);
        match nu {
            Some(nu) => {
                resize_vector(&mut self.dfdu, nu);
                resize_matrix(&mut self.dfdux, nu, nx);
                resize_matrix(&mut self.dfduu, nu, nu);
            }
            None => {
                self.dfdu = empty_vector();
                self.dfdux = empty_matrix();
                self.dfduu = empty_matrix();
            }
        }
        self
    }

    /// Reshape and zero every block, including `f`.
    pub fn set_zero(&mut self, nx: usize, nu: Option<usize>) -> &mut Self {
        self.resize(nx, nu);
        self.f = 0.0;
        self.dfdx.fill(0.0);
        self.dfdu.fill(0.0);
        self.dfdxx.fill(0.0);
        self.dfdux.fill(0.0);
        self.dfduu.fill(0.0);
        self
    }

    /// Accumulate only the value, state gradient and state Hessian of `rhs`.
    ///
    /// Used to fold state-only terms into a state-input model; the input
    /// blocks of `rhs` are ignored and may be empty.
    pub fn add_state_terms(&mut self, rhs: &Self) -> &mut Self {
        self.f += rhs.f;
        self.dfdx += &rhs.dfdx;
        self.dfdxx += &rhs.dfdxx;
        self
    }
}

impl AddAssign<&Self> for ScalarFunctionQuadraticApproximation {
    fn add_assign(&mut self, rhs: &Self) {
        self.f += rhs.f;
        self.dfdx += &rhs.dfdx;
        self.dfdu += &rhs.dfdu;
        self.dfdxx += &rhs.dfdxx;
        self.dfdux += &rhs.dfdux;
        self.dfduu += &rhs.dfduu;
    }
}

impl AddAssign for ScalarFunctionQuadraticApproximation {
    fn add_assign(&mut self, rhs: Self) {
        *self += &rhs;
    }
}

impl MulAssign<f64> for ScalarFunctionQuadraticApproximation {
    fn mul_assign(&mut self, scalar: f64) {
        self.f *= scalar;
        self.dfdx *= scalar;
        self.dfdu *= scalar;
        self.dfdxx *= scalar;
        self.dfdux *= scalar;
        self.dfduu *= scalar;
    }
}

impl fmt::Display for ScalarFunctionQuadraticApproximation {
    fn fmt(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(out, "f: {}", self.f)?;
        writeln!(out, "dfdx: {}", fmt_row(&self.dfdx))?;
        writeln!(out, "dfdu: {}", fmt_row(&self.dfdu))?;
        writeln!(out, "dfdxx:{}", self.dfdxx)?;
        writeln!(out, "dfdux:{}", self.dfdux)?;
        writeln!(out, "dfduu:{}", self.dfduu)
    }
}

// ---------------------------------------------------------------------------
// VectorFunctionLinearApproximation
// ---------------------------------------------------------------------------

/// Affine model of a vector function of dimension `nv`:
/// `f(x,u) ≈ f + dfdx·δx + dfdu·δu`.
///
/// Used for dynamics and stacked constraints.
#[derive(Clone, Debug, PartialEq)]
pub struct VectorFunctionLinearApproximation {
    /// Function value (length `nv`).
    pub f: DVector<f64>,
    /// Jacobian w.r.t. state (`nv x nx`).
    pub dfdx: DMatrix<f64>,
    /// Jacobian w.r.t. input (`nv x nu`, empty if not applicable).
    pub dfdu: DMatrix<f64>,
}

impl Default for VectorFunctionLinearApproximation {
    fn default() -> Self {
        Self {
            f: empty_vector(),
            dfdx: empty_matrix(),
            dfdu: empty_matrix(),
        }
    }
}

impl VectorFunctionLinearApproximation {
    /// Allocate a model with zeroed blocks of the given shape.
    pub fn new(nv: usize, nx: usize, nu: Option<usize>) -> Self {
        Self::zero(nv, nx, nu)
    }

    /// Zero model of the given shape.
    pub fn zero(nv: usize, nx: usize, nu: Option<usize>) -> Self {
        let mut approx = Self::default();
        approx.set_zero(nv, nx, nu);
        approx
    }

    /// Reshape all blocks. Content is unspecified afterwards.
    pub fn resize(&mut self, nv: usize, nx: usize, nu: Option<usize>) -> &mut Self {
        resize_vector(&mut self.f, nv);
        resize_matrix(&mut self.dfdx, nv, nx);
        match nu {
            Some(nu) => resize_matrix(&mut self.dfdu, nv, nu),
            None => self.dfdu = empty_matrix(),
        }
        self
    }

    /// Reshape and zero every block.
    pub fn set_zero(&mut self, nv: usize, nx: usize, nu: Option<usize>) -> &mut Self {
        self.resize(nv, nx, nu);
        self.f.fill(0.0);
        self.dfdx.fill(0.0);
        self.dfdu.fill(0.0);
        self
    }

    /// Output dimension `nv`.
    pub fn dim(&self) -> usize {
        self.f.len()
    }
}

impl AddAssign<&Self> for VectorFunctionLinearApproximation {
    fn add_assign(&mut self, rhs: &Self) {
        self.f += &rhs.f;
        self.dfdx += &rhs.dfdx;
        self.dfdu += &rhs.dfdu;
    }
}

impl AddAssign for VectorFunctionLinearApproximation {
    fn add_assign(&mut self, rhs: Self) {
        *self += &rhs;
    }
}

impl MulAssign<f64> for VectorFunctionLinearApproximation {
    fn mul_assign(&mut self, scalar: f64) {
        self.f *= scalar;
        self.dfdx *= scalar;
        self.dfdu *= scalar;
    }
}

impl fmt::Display for VectorFunctionLinearApproximation {
    fn fmt(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(out, "f: {}", fmt_row(&self.f))?;
        writeln!(out, "dfdx:{}", self.dfdx)?;
        writeln!(out, "dfdu:{}", self.dfdu)
    }
}

// ---------------------------------------------------------------------------
// VectorFunctionQuadraticApproximation
// ---------------------------------------------------------------------------

/// Quadratic model of a vector function, with one curvature triple
/// `(dfdxx[i], dfdux[i], dfduu[i])` per output component `i`.
#[derive(Clone, Debug, PartialEq)]
pub struct VectorFunctionQuadraticApproximation {
    /// Function value (length `nv`).
    pub f: DVector<f64>,
    /// Jacobian w.r.t. state (`nv x nx`).
    pub dfdx: DMatrix<f64>,
    /// Jacobian w.r.t. input (`nv x nu`).
    pub dfdu: DMatrix<f64>,
    /// Per-component state Hessians (`nv` matrices of `nx x nx`).
    pub dfdxx: Vec<DMatrix<f64>>,
    /// Per-component input-state Hessians (`nv` matrices of `nu x nx`).
    pub dfdux: Vec<DMatrix<f64>>,
    /// Per-component input Hessians (`nv` matrices of `nu x nu`).
    pub dfduu: Vec<DMatrix<f64>>,
}

impl Default for VectorFunctionQuadraticApproximation {
    fn default() -> Self {
        Self {
            f: empty_vector(),
            dfdx: empty_matrix(),
            dfdu: empty_matrix(),
            dfdxx: Vec::new(),
            dfdux: Vec::new(),
            dfduu: Vec::new(),
        }
    }
}

impl VectorFunctionQuadraticApproximation {
    /// Allocate a model with zeroed blocks of the given shape.
    pub fn new(nv: usize, nx: usize, nu: Option<usize>) -> Self {
        Self::zero(nv, nx, nu)
    }

    /// Zero model of the given shape.
    pub fn zero(nv: usize, nx: usize, nu: Option<usize>) -> Self {
        let mut approx = Self::default();
        approx.set_zero(nv, nx, nu);
        approx
    }

    /// Reshape all blocks. Content is unspecified afterwards.
    pub fn resize(&mut self, nv: usize, nx: usize, nu: Option<usize>) -> &mut Self {
        resize_vector(&mut self.f, nv);
        resize_matrix(&mut self.dfdx, nv, nx);
        self.dfdxx.resize_with(nv, empty_matrix);
        self.dfdux.resize_with(nv, empty_matrix);
        self.dfduu.resize_with(nv, empty_matrix);
        for m in &mut self.dfdxx {
            resize_matrix(m, nx, nx);
        }
        match nu {
            Some(nu) => {
                resize_matrix(&mut self.dfdu, nv, nu);
                for m in &mut self.dfdux {
                    resize_matrix(m, nu, nx);
                }
                for m in &mut self.dfduu {
                    resize_matrix(m, nu, nu);
                }
            }
            None => {
                self.dfdu = empty_matrix();
                self.dfdux.iter_mut().for_each(|m| *m = empty_matrix());
                self.dfduu.iter_mut().for_each(|m| *m = empty_matrix());
            }
        }
        self
    }

    /// Reshape and zero every block.
    pub fn set_zero(&mut self, nv: usize, nx: usize, nu: Option<usize>) -> &mut Self {
        self.resize(nv, nx, nu);
        self.f.fill(0.0);
        self.dfdx.fill(0.0);
        self.dfdu.fill(0.0);
        self.dfdxx
            .iter_mut()
            .chain(self.dfdux.iter_mut())
            .chain(self.dfduu.iter_mut())
            .for_each(|m| m.fill(0.0));
        self
    }

    /// Output dimension `nv`.
    pub fn dim(&self) -> usize {
        self.f.len()
    }
}

impl AddAssign<&Self> for VectorFunctionQuadraticApproximation {
    fn add_assign(&mut self, rhs: &Self) {
        assert_eq!(self.dfdxx.len(), rhs.dfdxx.len(), "component count mismatch");
        self.f += &rhs.f;
        self.dfdx += &rhs.dfdx;
        self.dfdu += &rhs.dfdu;
        for (lhs, rhs) in self.dfdxx.iter_mut().zip(&rhs.dfdxx) {
            *lhs += rhs;
        }
        for (lhs, rhs) in self.dfdux.iter_mut().zip(&rhs.dfdux) {
            *lhs += rhs;
        }
        for (lhs, rhs) in self.dfduu.iter_mut().zip(&rhs.dfduu) {
            *lhs += rhs;
        }
    }
}

impl AddAssign for VectorFunctionQuadraticApproximation {
    fn add_assign(&mut self, rhs: Self) {
        *self += &rhs;
    }
}

impl MulAssign<f64> for VectorFunctionQuadraticApproximation {
    fn mul_assign(&mut self, scalar: f64) {
        self.f *= scalar;
        self.dfdx *= scalar;
        self.dfdu *= scalar;
        self.dfdxx
            .iter_mut()
            .chain(self.dfdux.iter_mut())
            .chain(self.dfduu.iter_mut())
            .for_each(|m| *m *= scalar);
    }
}

impl fmt::Display for VectorFunctionQuadraticApproximation {
    fn fmt(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(out, "f: {}", fmt_row(&self.f))?;
        writeln!(out, "dfdx:{}", self.dfdx)?;
        writeln!(out, "dfdu:{}", self.dfdu)?;
        for (i, m) in self.dfdxx.iter().enumerate() {
            writeln!(out, "dfdxx[{i}]:{m}")?;
        }
        for (i, m) in self.dfdux.iter().enumerate() {
            writeln!(out, "dfdux[{i}]:{m}")?;
        }
        for (i, m) in self.dfduu.iter().enumerate() {
            writeln!(out, "dfduu[{i}]:{m}")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
