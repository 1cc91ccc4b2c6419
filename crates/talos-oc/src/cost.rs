//! Cost term interfaces and quadratic reference costs.
//!
//! Soft constraints are expressed as cost terms too; the problem keeps them
//! in separate collections so they can be weighted or toggled independently.

use nalgebra::{DMatrix, DVector};
use talos_core::ScalarFunctionQuadraticApproximation;

use crate::precomputation::PreComputation;

/// Cost `L(t, x, u)` of an intermediate node.
pub trait StateInputCost: Send + Sync {
    fn is_active(&self, _time: f64) -> bool {
        true
    }

    fn value(
        &self,
        time: f64,
        state: &DVector<f64>,
        input: &DVector<f64>,
        pre_computation: &dyn PreComputation,
    ) -> f64;

    /// Second-order model with `(nx, nu)` shaped blocks.
    fn quadratic_approximation(
        &self,
        time: f64,
        state: &DVector<f64>,
        input: &DVector<f64>,
        pre_computation: &dyn PreComputation,
    ) -> ScalarFunctionQuadraticApproximation;
}

/// State-only cost `Φ(t, x)`, used at every node kind.
pub trait StateCost: Send + Sync {
    fn is_active(&self, _time: f64) -> bool {
        true
    }

    fn value(&self, time: f64, state: &DVector<f64>, pre_computation: &dyn PreComputation) -> f64;

    /// Second-order model; input blocks must be empty (`nu = None`).
    fn quadratic_approximation(
        &self,
        time: f64,
        state: &DVector<f64>,
        pre_computation: &dyn PreComputation,
    ) -> ScalarFunctionQuadraticApproximation;
}

// ---------------------------------------------------------------------------
// QuadraticStateInputCost
// ---------------------------------------------------------------------------

/// `½δxᵀQδx + ½δuᵀRδu + δuᵀPδx` around a nominal `(x̄, ū)`.
#[derive(Clone, Debug, PartialEq)]
pub struct QuadraticStateInputCost {
    pub q: DMatrix<f64>,
    pub r: DMatrix<f64>,
    /// Cross term (`nu x nx`).
    pub p: DMatrix<f64>,
    pub x_nominal: DVector<f64>,
    pub u_nominal: DVector<f64>,
}

impl QuadraticStateInputCost {
    /// Cost around the origin without cross term.
    pub fn new(q: DMatrix<f64>, r: DMatrix<f64>) -> Self {
        let nx = q.nrows();
        let nu = r.nrows();
        Self {
            q,
            r,
            p: DMatrix::zeros(nu, nx),
            x_nominal: DVector::zeros(nx),
            u_nominal: DVector::zeros(nu),
        }
    }

    #[must_use]
    pub fn with_cross_term(mut self, p: DMatrix<f64>) -> Self {
        self.p = p;
        self
    }

    #[must_use]
    pub fn with_nominal(mut self, x_nominal: DVector<f64>, u_nominal: DVector<f64>) -> Self {
        self.x_nominal = x_nominal;
        self.u_nominal = u_nominal;
        self
    }

    fn deviation(&self, state: &DVector<f64>, input: &DVector<f64>) -> (DVector<f64>, DVector<f64>) {
        (state - &self.x_nominal, input - &self.u_nominal)
    }
}

impl StateInputCost for QuadraticStateInputCost {
    fn value(
        &self,
        _time: f64,
        state: &DVector<f64>,
        input: &DVector<f64>,
        _pre_computation: &dyn PreComputation,
    ) -> f64 {
        let (dx, du) = self.deviation(state, input);
        0.5 * dx.dot(&(&self.q * &dx)) + 0.5 * du.dot(&(&self.r * &du)) + du.dot(&(&self.p * &dx))
    }

    fn quadratic_approximation(
        &self,
        time: f64,
        state: &DVector<f64>,
        input: &DVector<f64>,
        pre_computation: &dyn PreComputation,
    ) -> ScalarFunctionQuadraticApproximation {
        let (dx, du) = self.deviation(state, input);
        ScalarFunctionQuadraticApproximation {
            f: self.value(time, state, input, pre_computation),
            dfdx: &self.q * &dx + self.p.transpose() * &du,
            dfdu: &self.r * &du + &self.p * &dx,
            dfdxx: self.q.clone(),
            dfdux: self.p.clone(),
            dfduu: self.r.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// QuadraticStateCost
// ---------------------------------------------------------------------------

/// `½δxᵀQδx` around a nominal state.
#[derive(Clone, Debug, PartialEq)]
pub struct QuadraticStateCost {
    pub q: DMatrix<f64>,
    pub x_nominal: DVector<f64>,
}

impl QuadraticStateCost {
    pub fn new(q: DMatrix<f64>) -> Self {
        let nx = q.nrows();
        Self {
            q,
            x_nominal: DVector::zeros(nx),
        }
    }

    #[must_use]
    pub fn with_nominal(mut self, x_nominal: DVector<f64>) -> Self {
        self.x_nominal = x_nominal;
        self
    }
}

impl StateCost for QuadraticStateCost {
    fn value(&self, _time: f64, state: &DVector<f64>, _pre_computation: &dyn PreComputation) -> f64 {
        let dx = state - &self.x_nominal;
        0.5 * dx.dot(&(&self.q * &dx))
    }

    fn quadratic_approximation(
        &self,
        _time: f64,
        state: &DVector<f64>,
        _pre_computation: &dyn PreComputation,
    ) -> ScalarFunctionQuadraticApproximation {
        let dx = state - &self.x_nominal;
        let mut approx = ScalarFunctionQuadraticApproximation::zero(state.len(), None);
        approx.dfdx = &self.q * &dx;
        approx.f = 0.5 * dx.dot(&approx.dfdx);
        approx.dfdxx.copy_from(&self.q);
        approx
    }
}
