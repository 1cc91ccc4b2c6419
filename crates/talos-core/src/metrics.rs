//! Zero-order evaluation of a node: cost, constraint values and
//! augmented-Lagrangian penalties.
//!
//! Metrics feed convergence checks and line search. They never carry
//! derivatives and are not consumed by the backward pass.

use nalgebra::DVector;

/// Value of one augmented-Lagrangian term.
#[derive(Clone, Debug, PartialEq)]
pub struct LagrangianMetrics {
    /// Penalty added to the cost.
    pub penalty: f64,
    /// Constraint value the penalty was computed from.
    pub constraint: DVector<f64>,
}

impl Default for LagrangianMetrics {
    fn default() -> Self {
        Self {
            penalty: 0.0,
            constraint: DVector::zeros(0),
        }
    }
}

impl LagrangianMetrics {
    pub const fn new(penalty: f64, constraint: DVector<f64>) -> Self {
        Self {
            penalty,
            constraint,
        }
    }
}

/// Aggregated metrics of one node.
///
/// Constraint fields hold one vector per active term, in insertion order.
/// A field stays empty when the matching term collection is empty.
#[derive(Clone, Debug, PartialEq)]
pub struct Metrics {
    pub cost: f64,

    /// Passed through from the integrator, never computed by the assembler.
    pub dynamics_violation: DVector<f64>,

    pub state_eq_constraint: Vec<DVector<f64>>,
    pub state_input_eq_constraint: Vec<DVector<f64>>,
    /// Inequality constraints are satisfied when non-negative.
    pub state_ineq_constraint: Vec<DVector<f64>>,
    pub state_input_ineq_constraint: Vec<DVector<f64>>,

    pub state_eq_lagrangian: Vec<LagrangianMetrics>,
    pub state_ineq_lagrangian: Vec<LagrangianMetrics>,
    pub state_input_eq_lagrangian: Vec<LagrangianMetrics>,
    pub state_input_ineq_lagrangian: Vec<LagrangianMetrics>,
}

impl Default for Metrics {
    fn default() -> Self {
        Self {
            cost: 0.0,
            dynamics_violation: DVector::zeros(0),
            state_eq_constraint: Vec::new(),
            state_input_eq_constraint: Vec::new(),
            state_ineq_constraint: Vec::new(),
            state_input_ineq_constraint: Vec::new(),
            state_eq_lagrangian: Vec::new(),
            state_ineq_lagrangian: Vec::new(),
            state_input_eq_lagrangian: Vec::new(),
            state_input_ineq_lagrangian: Vec::new(),
        }
    }
}

impl Metrics {
    /// Reset to the default (zero cost, no constraints).
    pub fn clear(&mut self) {
        self.cost = 0.0;
        self.dynamics_violation = DVector::zeros(0);
        self.state_eq_constraint.clear();
        self.state_input_eq_constraint.clear();
        self.state_ineq_constraint.clear();
        self.state_input_ineq_constraint.clear();
        self.state_eq_lagrangian.clear();
        self.state_ineq_lagrangian.clear();
        self.state_input_eq_lagrangian.clear();
        self.state_input_ineq_lagrangian.clear();
    }

    /// `‖dynamics_violation‖² + Σ‖state_eq‖² + Σ‖state_input_eq‖²`.
    pub fn total_equality_violation_squared_norm(&self) -> f64 {
        self.dynamics_violation.norm_squared()
            + self
                .state_eq_constraint
                .iter()
                .chain(&self.state_input_eq_constraint)
                .map(|v| v.norm_squared())
                .sum::<f64>()
    }

    /// Squared norm of the negative parts of every inequality constraint.
    pub fn total_inequality_violation_squared_norm(&self) -> f64 {
        self.state_ineq_constraint
            .iter()
            .chain(&self.state_input_ineq_constraint)
            .flat_map(|h| h.iter())
            .map(|&v| v.min(0.0).powi(2))
            .sum()
    }

    /// Sum of all augmented-Lagrangian penalties.
    pub fn total_lagrangian_penalty(&self) -> f64 {
        self.state_eq_lagrangian
            .iter()
            .chain(&self.state_ineq_lagrangian)
            .chain(&self.state_input_eq_lagrangian)
            .chain(&self.state_input_ineq_lagrangian)
            .map(|l| l.penalty)
            .sum()
    }
}
