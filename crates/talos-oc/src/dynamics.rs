//! System dynamics interface and a linear time-invariant reference model.

use nalgebra::{DMatrix, DVector};
use talos_core::VectorFunctionLinearApproximation;

use crate::precomputation::PreComputation;

/// Flow map `ẋ = f(t, x, u)` and jump map `x⁺ = g(t, x)` of a hybrid system.
pub trait SystemDynamics: Send + Sync {
    /// Linearisation of the flow map at `(t, x, u)`.
    fn linear_approximation(
        &self,
        time: f64,
        state: &DVector<f64>,
        input: &DVector<f64>,
        pre_computation: &dyn PreComputation,
    ) -> VectorFunctionLinearApproximation;

    /// Linearisation of the jump map at `(t, x)`. Input blocks are empty.
    fn jump_map_linear_approximation(
        &self,
        time: f64,
        state: &DVector<f64>,
        pre_computation: &dyn PreComputation,
    ) -> VectorFunctionLinearApproximation;

    /// Process-noise covariance. Zero unless overridden.
    fn dynamics_covariance(&self, _time: f64, state: &DVector<f64>, _input: &DVector<f64>) -> DMatrix<f64> {
        DMatrix::zeros(state.len(), state.len())
    }
}

/// Linear time-invariant system `ẋ = Ax + Bu`, `x⁺ = Gx`.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearSystemDynamics {
    pub a: DMatrix<f64>,
    pub b: DMatrix<f64>,
    /// Jump map.
    pub g: DMatrix<f64>,
}

impl LinearSystemDynamics {
    /// System with identity jump map.
    pub fn new(a: DMatrix<f64>, b: DMatrix<f64>) -> Self {
        let nx = a.nrows();
        Self {
            a,
            b,
            g: DMatrix::identity(nx, nx),
        }
    }

    #[must_use]
    pub fn with_jump_map(mut self, g: DMatrix<f64>) -> Self {
        self.g = g;
        self
    }
}

impl SystemDynamics for LinearSystemDynamics {
    fn linear_approximation(
        &self,
        _time: f64,
        state: &DVector<f64>,
        input: &DVector<f64>,
        _pre_computation: &dyn PreComputation,
    ) -> VectorFunctionLinearApproximation {
        VectorFunctionLinearApproximation {
            f: &self.a * state + &self.b * input,
            dfdx: self.a.clone(),
            dfdu: self.b.clone(),
        }
    }

    fn jump_map_linear_approximation(
        &self,
        _time: f64,
        state: &DVector<f64>,
        _pre_computation: &dyn PreComputation,
    ) -> VectorFunctionLinearApproximation {
        VectorFunctionLinearApproximation {
            f: &self.g * state,
            dfdx: self.g.clone(),
            dfdu: DMatrix::zeros(0, 0),
        }
    }
}
