//! Constraint term interfaces and linear reference constraints.
//!
//! Equality constraints are satisfied at zero, inequality constraints when
//! every row is non-negative. The same traits serve both; the problem keeps
//! them in separate collections.

use nalgebra::{DMatrix, DVector};
use talos_core::VectorFunctionLinearApproximation;

use crate::precomputation::PreComputation;

/// Constraint `h(t, x)` on the state only.
pub trait StateConstraint: Send + Sync {
    fn is_active(&self, _time: f64) -> bool {
        true
    }

    fn num_constraints(&self, time: f64) -> usize;

    fn value(&self, time: f64, state: &DVector<f64>, pre_computation: &dyn PreComputation) -> DVector<f64>;

    /// Linearisation with an empty input Jacobian.
    fn linear_approximation(
        &self,
        time: f64,
        state: &DVector<f64>,
        pre_computation: &dyn PreComputation,
    ) -> VectorFunctionLinearApproximation;
}

/// Constraint `h(t, x, u)` coupling state and input.
pub trait StateInputConstraint: Send + Sync {
    fn is_active(&self, _time: f64) -> bool {
        true
    }

    fn num_constraints(&self, time: f64) -> usize;

    fn value(
        &self,
        time: f64,
        state: &DVector<f64>,
        input: &DVector<f64>,
        pre_computation: &dyn PreComputation,
    ) -> DVector<f64>;

    fn linear_approximation(
        &self,
        time: f64,
        state: &DVector<f64>,
        input: &DVector<f64>,
        pre_computation: &dyn PreComputation,
    ) -> VectorFunctionLinearApproximation;
}

// ---------------------------------------------------------------------------
// Linear constraints
// ---------------------------------------------------------------------------

/// `e + Cx`.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearStateConstraint {
    pub e: DVector<f64>,
    pub c: DMatrix<f64>,
}

impl LinearStateConstraint {
    pub const fn new(e: DVector<f64>, c: DMatrix<f64>) -> Self {
        Self { e, c }
    }
}

impl StateConstraint for LinearStateConstraint {
    fn num_constraints(&self, _time: f64) -> usize {
        self.e.len()
    }

    fn value(&self, _time: f64, state: &DVector<f64>, _pre_computation: &dyn PreComputation) -> DVector<f64> {
        &self.e + &self.c * state
    }

    fn linear_approximation(
        &self,
        time: f64,
        state: &DVector<f64>,
        pre_computation: &dyn PreComputation,
    ) -> VectorFunctionLinearApproximation {
        VectorFunctionLinearApproximation {
            f: self.value(time, state, pre_computation),
            dfdx: self.c.clone(),
            dfdu: DMatrix::zeros(0, 0),
        }
    }
}

/// `e + Cx + Du`.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearStateInputConstraint {
    pub e: DVector<f64>,
    pub c: DMatrix<f64>,
    pub d: DMatrix<f64>,
}

impl LinearStateInputConstraint {
    pub const fn new(e: DVector<f64>, c: DMatrix<f64>, d: DMatrix<f64>) -> Self {
        Self { e, c, d }
    }
}

impl StateInputConstraint for LinearStateInputConstraint {
    fn num_constraints(&self, _time: f64) -> usize {
        self.e.len()
    }

    fn value(
        &self,
        _time: f64,
        state: &DVector<f64>,
        input: &DVector<f64>,
        _pre_computation: &dyn PreComputation,
    ) -> DVector<f64> {
        &self.e + &self.c * state + &self.d * input
    }

    fn linear_approximation(
        &self,
        time: f64,
        state: &DVector<f64>,
        input: &DVector<f64>,
        pre_computation: &dyn PreComputation,
    ) -> VectorFunctionLinearApproximation {
        VectorFunctionLinearApproximation {
            f: self.value(time, state, input, pre_computation),
            dfdx: self.c.clone(),
            dfdu: self.d.clone(),
        }
    }
}
