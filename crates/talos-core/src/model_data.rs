//! Local LQ model of one trajectory node.

use nalgebra::{DMatrix, DVector};

use crate::types::{ScalarFunctionQuadraticApproximation, VectorFunctionLinearApproximation};
use crate::validation::{check_being_psd, check_size, check_vector_size};

/// Linear dynamics, quadratic cost and linearised constraints at one node.
///
/// Rebuilt from scratch at every linearisation. Event and final nodes have
/// `input_dim == 0`; the final node additionally has empty dynamics.
#[derive(Clone, Debug, PartialEq)]
pub struct ModelData {
    pub time: f64,
    pub state_dim: usize,
    pub input_dim: usize,

    /// Flow map (intermediate) or jump map (pre-jump) linearisation.
    pub dynamics: VectorFunctionLinearApproximation,
    /// Process-noise covariance (`nx x nx`, empty when not queried).
    pub dynamics_covariance: DMatrix<f64>,
    /// Additive bias filled by the discretisation scheme.
    pub dynamics_bias: DVector<f64>,

    pub cost: ScalarFunctionQuadraticApproximation,

    pub state_eq_constraint: VectorFunctionLinearApproximation,
    pub state_input_eq_constraint: VectorFunctionLinearApproximation,
    pub state_ineq_constraint: VectorFunctionLinearApproximation,
    pub state_input_ineq_constraint: VectorFunctionLinearApproximation,
}

impl Default for ModelData {
    fn default() -> Self {
        Self {
            time: 0.0,
            state_dim: 0,
            input_dim: 0,
            dynamics: VectorFunctionLinearApproximation::default(),
            dynamics_covariance: DMatrix::zeros(0, 0),
            dynamics_bias: DVector::zeros(0),
            cost: ScalarFunctionQuadraticApproximation::default(),
            state_eq_constraint: VectorFunctionLinearApproximation::default(),
            state_input_eq_constraint: VectorFunctionLinearApproximation::default(),
            state_ineq_constraint: VectorFunctionLinearApproximation::default(),
            state_input_ineq_constraint: VectorFunctionLinearApproximation::default(),
        }
    }
}

impl ModelData {
    /// Shape diagnostics for every populated block against
    /// `(state_dim, input_dim)`. Empty when consistent.
    ///
    /// State-only constraints are checked with a zero input dimension.
    /// Empty dynamics (final node) are not checked.
    pub fn check_size(&self) -> String {
        let nx = self.state_dim;
        let nu = self.input_dim;
        let mut errors = String::new();

        if self.dynamics.dim() > 0 {
            errors += &check_vector_size(nx, nx, nu, &self.dynamics, "dynamics");
            if self.dynamics_bias.len() != nx {
                errors += &format!("dynamics_bias.len() != {nx}\n");
            }
        }
        errors += &check_size(nx, nu, &self.cost, "cost");
        errors += &check_vector_size(
            self.state_eq_constraint.dim(),
            nx,
            0,
            &self.state_eq_constraint,
            "state_eq_constraint",
        );
        errors += &check_vector_size(
            self.state_input_eq_constraint.dim(),
            nx,
            nu,
            &self.state_input_eq_constraint,
            "state_input_eq_constraint",
        );
        errors += &check_vector_size(
            self.state_ineq_constraint.dim(),
            nx,
            0,
            &self.state_ineq_constraint,
            "state_ineq_constraint",
        );
        errors += &check_vector_size(
            self.state_input_ineq_constraint.dim(),
            nx,
            nu,
            &self.state_input_ineq_constraint,
            "state_input_ineq_constraint",
        );
        errors
    }

    /// Finiteness and PSD diagnostics of the cost curvature.
    pub fn check_cost_properties(&self) -> String {
        check_being_psd(&self.cost, "cost")
    }

    /// Finiteness diagnostics of the dynamics linearisation and a PSD check
    /// of the covariance.
    pub fn check_dynamics_properties(&self) -> String {
        let mut errors = String::new();
        if !self.dynamics.f.iter().all(|v| v.is_finite()) {
            errors += "dynamics.f is not finite.\n";
        }
        if !self.dynamics.dfdx.iter().all(|v| v.is_finite()) {
            errors += "dynamics.dfdx is not finite.\n";
        }
        if !self.dynamics.dfdu.iter().all(|v| v.is_finite()) {
            errors += "dynamics.dfdu is not finite.\n";
        }
        errors += &check_being_psd(&self.dynamics_covariance, "dynamics_covariance");
        errors
    }

    /// All diagnostics above, concatenated.
    pub fn check(&self) -> String {
        let mut errors = self.check_size();
        errors += &self.check_dynamics_properties();
        errors += &self.check_cost_properties();
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn intermediate(nx: usize, nu: usize) -> ModelData {
        let mut cost = ScalarFunctionQuadraticApproximation::zero(nx, Some(nu));
        cost.dfdxx = DMatrix::identity(nx, nx);
        cost.dfduu = DMatrix::identity(nu, nu);
        ModelData {
            time: 0.5,
            state_dim: nx,
            input_dim: nu,
            dynamics: VectorFunctionLinearApproximation::zero(nx, nx, Some(nu)),
            dynamics_covariance: DMatrix::zeros(nx, nx),
            dynamics_bias: DVector::zeros(nx),
            cost,
            state_eq_constraint: VectorFunctionLinearApproximation::zero(0, nx, None),
            state_input_eq_constraint: VectorFunctionLinearApproximation::zero(1, nx, Some(nu)),
            ..Default::default()
        }
    }

    #[test]
    fn consistent_node_has_no_diagnostics() {
        assert_eq!(intermediate(3, 2).check(), "");
    }

    #[test]
    fn default_node_is_consistent() {
        assert_eq!(ModelData::default().check(), "");
    }

    #[test]
    fn wrong_bias_length_is_reported() {
        let mut data = intermediate(3, 2);
        data.dynamics_bias = DVector::zeros(2);
        assert_eq!(data.check_size(), "dynamics_bias.len() != 3\n");
    }

    #[test]
    fn indefinite_cost_is_reported() {
        let mut data = intermediate(2, 1);
        data.cost.dfduu[(0, 0)] = -1.0;
        let report = data.check_cost_properties();
        assert!(report.contains("cost second derivative w.r.t. input is not PSD"));
    }

    #[test]
    fn non_finite_dynamics_is_reported() {
        let mut data = intermediate(2, 1);
        data.dynamics.dfdx[(1, 0)] = f64::NAN;
        assert_eq!(data.check_dynamics_properties(), "dynamics.dfdx is not finite.\n");
    }
}
