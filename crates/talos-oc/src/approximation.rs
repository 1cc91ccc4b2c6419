//! Linear-quadratic approximation and metrics of trajectory nodes.
//!
//! Three node kinds are handled:
//!
//! 1. **Intermediate**: flow-map dynamics, state-input cost and
//!    constraints, all four Lagrangian groups.
//! 2. **Pre-jump**: jump-map dynamics, state-only event cost and
//!    constraints, no input (`input_dim = 0`).
//! 3. **Final**: no dynamics, state-only final cost and constraints.
//!
//! Every LQ entry point first issues a [`Request`] to the problem's
//! [`PreComputation`](crate::PreComputation), then evaluates the terms. A
//! term collection that is empty is never evaluated.
//!
//! ```text
//! request ─► metadata ─► dynamics ─► cost ─► constraints ─► Lagrangians
//! ```

use nalgebra::{DMatrix, DVector};
use talos_core::{Metrics, ModelData, MultiplierCollection, ScalarFunctionQuadraticApproximation};
use tracing::{debug, warn};

use crate::precomputation::Request;
use crate::problem::OptimalControlProblem;

/// Post-assembly checks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LqSettings {
    /// Run the validation checks on every assembled node and log the
    /// diagnostics. Costly; meant for debugging.
    pub check_numerical_stability: bool,
}

// ---------------------------------------------------------------------------
// LQ assembly
// ---------------------------------------------------------------------------

/// Fill `model` with the LQ approximation of an intermediate node.
pub fn approximate_intermediate_lq(
    problem: &mut OptimalControlProblem,
    time: f64,
    state: &DVector<f64>,
    input: &DVector<f64>,
    multipliers: &MultiplierCollection,
    model: &mut ModelData,
) {
    problem
        .pre_computation
        .request(Request::NODE_APPROXIMATION, time, state, input);
    let problem = &*problem;
    let pre = problem.pre_computation.as_ref();

    model.time = time;
    model.state_dim = state.len();
    model.input_dim = input.len();

    model.dynamics_covariance = problem.dynamics.dynamics_covariance(time, state, input);
    model.dynamics = problem.dynamics.linear_approximation(time, state, input, pre);
    model.dynamics_bias = DVector::zeros(model.dynamics.dfdx.nrows());

    model.cost = approximate_cost(problem, time, state, input);

    model.state_eq_constraint = problem.state_equality_constraint.linear_approximation(time, state, pre);
    model.state_input_eq_constraint = problem.equality_constraint.linear_approximation(time, state, input, pre);
    model.state_ineq_constraint = Default::default();
    model.state_input_ineq_constraint = Default::default();

    if !problem.state_equality_lagrangian.is_empty() {
        let approx = problem
            .state_equality_lagrangian
            .quadratic_approximation(time, state, &multipliers.state_eq, pre);
        model.cost.add_state_terms(&approx);
    }
    if !problem.state_inequality_lagrangian.is_empty() {
        let approx = problem
            .state_inequality_lagrangian
            .quadratic_approximation(time, state, &multipliers.state_ineq, pre);
        model.cost.add_state_terms(&approx);
    }
    if !problem.equality_lagrangian.is_empty() {
        model.cost += problem
            .equality_lagrangian
            .quadratic_approximation(time, state, input, &multipliers.state_input_eq, pre);
    }
    if !problem.inequality_lagrangian.is_empty() {
        model.cost += problem
            .inequality_lagrangian
            .quadratic_approximation(time, state, input, &multipliers.state_input_ineq, pre);
    }

    debug!(time, nx = model.state_dim, nu = model.input_dim, "assembled intermediate node");
}

/// Fill `model` with the LQ approximation of the node just before a jump.
pub fn approximate_pre_jump_lq(
    problem: &mut OptimalControlProblem,
    time: f64,
    state: &DVector<f64>,
    multipliers: &MultiplierCollection,
    model: &mut ModelData,
) {
    problem
        .pre_computation
        .request_pre_jump(Request::NODE_APPROXIMATION, time, state);
    let problem = &*problem;
    let pre = problem.pre_computation.as_ref();

    model.time = time;
    model.state_dim = state.len();
    model.input_dim = 0;

    model.dynamics = problem.dynamics.jump_map_linear_approximation(time, state, pre);
    model.dynamics_covariance = DMatrix::zeros(0, 0);
    model.dynamics_bias = DVector::zeros(model.dynamics.dfdx.nrows());

    model.cost = approximate_event_cost(problem, time, state);

    model.state_eq_constraint = problem.pre_jump_equality_constraint.linear_approximation(time, state, pre);
    model.state_input_eq_constraint = Default::default();
    model.state_ineq_constraint = Default::default();
    model.state_input_ineq_constraint = Default::default();

    if !problem.pre_jump_equality_lagrangian.is_empty() {
        let approx = problem
            .pre_jump_equality_lagrangian
            .quadratic_approximation(time, state, &multipliers.state_eq, pre);
        model.cost.add_state_terms(&approx);
    }
    if !problem.pre_jump_inequality_lagrangian.is_empty() {
        let approx = problem
            .pre_jump_inequality_lagrangian
            .quadratic_approximation(time, state, &multipliers.state_ineq, pre);
        model.cost.add_state_terms(&approx);
    }

    debug!(time, nx = model.state_dim, "assembled pre-jump node");
}

/// Fill `model` with the LQ approximation of the final node.
pub fn approximate_final_lq(
    problem: &mut OptimalControlProblem,
    time: f64,
    state: &DVector<f64>,
    multipliers: &MultiplierCollection,
    model: &mut ModelData,
) {
    problem
        .pre_computation
        .request_final(Request::FINAL_APPROXIMATION, time, state);
    let problem = &*problem;
    let pre = problem.pre_computation.as_ref();

    model.time = time;
    model.state_dim = state.len();
    model.input_dim = 0;

    model.dynamics = Default::default();
    model.dynamics_covariance = DMatrix::zeros(0, 0);
    model.dynamics_bias = DVector::zeros(0);

    model.state_eq_constraint = problem.final_equality_constraint.linear_approximation(time, state, pre);
    model.state_input_eq_constraint = Default::default();
    model.state_ineq_constraint = Default::default();
    model.state_input_ineq_constraint = Default::default();

    model.cost = approximate_final_cost(problem, time, state);

    if !problem.final_equality_lagrangian.is_empty() {
        let approx = problem
            .final_equality_lagrangian
            .quadratic_approximation(time, state, &multipliers.state_eq, pre);
        model.cost.add_state_terms(&approx);
    }
    if !problem.final_inequality_lagrangian.is_empty() {
        let approx = problem
            .final_inequality_lagrangian
            .quadratic_approximation(time, state, &multipliers.state_ineq, pre);
        model.cost.add_state_terms(&approx);
    }

    debug!(time, nx = model.state_dim, "assembled final node");
}

/// [`approximate_intermediate_lq`] into a fresh [`ModelData`].
pub fn intermediate_lq(
    problem: &mut OptimalControlProblem,
    time: f64,
    state: &DVector<f64>,
    input: &DVector<f64>,
    multipliers: &MultiplierCollection,
) -> ModelData {
    let mut model = ModelData::default();
    approximate_intermediate_lq(problem, time, state, input, multipliers, &mut model);
    model
}

/// [`approximate_pre_jump_lq`] into a fresh [`ModelData`].
pub fn pre_jump_lq(
    problem: &mut OptimalControlProblem,
    time: f64,
    state: &DVector<f64>,
    multipliers: &MultiplierCollection,
) -> ModelData {
    let mut model = ModelData::default();
    approximate_pre_jump_lq(problem, time, state, multipliers, &mut model);
    model
}

/// [`approximate_final_lq`] into a fresh [`ModelData`].
pub fn final_lq(
    problem: &mut OptimalControlProblem,
    time: f64,
    state: &DVector<f64>,
    multipliers: &MultiplierCollection,
) -> ModelData {
    let mut model = ModelData::default();
    approximate_final_lq(problem, time, state, multipliers, &mut model);
    model
}

// ---------------------------------------------------------------------------
// LqApproximator
// ---------------------------------------------------------------------------

/// LQ assembler that optionally validates every node it produces.
///
/// Diagnostics are logged with `warn!` and never abort the assembly. Each
/// entry point also returns them (empty when checks are disabled or the node
/// is clean) so callers can decide to abort.
#[derive(Debug, Clone, Copy, Default)]
pub struct LqApproximator {
    settings: LqSettings,
}

impl LqApproximator {
    pub const fn new(settings: LqSettings) -> Self {
        Self { settings }
    }

    pub const fn settings(&self) -> &LqSettings {
        &self.settings
    }

    #[must_use = "returns the validation diagnostics"]
    pub fn intermediate(
        &self,
        problem: &mut OptimalControlProblem,
        time: f64,
        state: &DVector<f64>,
        input: &DVector<f64>,
        multipliers: &MultiplierCollection,
        model: &mut ModelData,
    ) -> String {
        approximate_intermediate_lq(problem, time, state, input, multipliers, model);
        self.check(model, "intermediate")
    }

    #[must_use = "returns the validation diagnostics"]
    pub fn pre_jump(
        &self,
        problem: &mut OptimalControlProblem,
        time: f64,
        state: &DVector<f64>,
        multipliers: &MultiplierCollection,
        model: &mut ModelData,
    ) -> String {
        approximate_pre_jump_lq(problem, time, state, multipliers, model);
        self.check(model, "pre-jump")
    }

    #[must_use = "returns the validation diagnostics"]
    pub fn final_node(
        &self,
        problem: &mut OptimalControlProblem,
        time: f64,
        state: &DVector<f64>,
        multipliers: &MultiplierCollection,
        model: &mut ModelData,
    ) -> String {
        approximate_final_lq(problem, time, state, multipliers, model);
        self.check(model, "final")
    }

    fn check(&self, model: &ModelData, node: &str) -> String {
        if !self.settings.check_numerical_stability {
            return String::new();
        }
        let report = model.check();
        for line in report.lines() {
            warn!(time = model.time, node, "{line}");
        }
        report
    }
}

// ---------------------------------------------------------------------------
// Costs
// ---------------------------------------------------------------------------

/// Sum of all intermediate cost and soft-constraint values.
pub fn compute_cost(problem: &OptimalControlProblem, time: f64, state: &DVector<f64>, input: &DVector<f64>) -> f64 {
    let pre = problem.pre_computation.as_ref();
    problem.cost.value(time, state, input, pre)
        + problem.soft_constraint.value(time, state, input, pre)
        + problem.state_cost.value(time, state, pre)
        + problem.state_soft_constraint.value(time, state, pre)
}

/// Quadratic model of all intermediate cost and soft-constraint terms.
pub fn approximate_cost(
    problem: &OptimalControlProblem,
    time: f64,
    state: &DVector<f64>,
    input: &DVector<f64>,
) -> ScalarFunctionQuadraticApproximation {
    let pre = problem.pre_computation.as_ref();

    let mut cost = problem.cost.quadratic_approximation(time, state, input, pre);
    if !problem.soft_constraint.is_empty() {
        cost += problem.soft_constraint.quadratic_approximation(time, state, input, pre);
    }
    if !problem.state_cost.is_empty() {
        cost.add_state_terms(&problem.state_cost.quadratic_approximation(time, state, pre));
    }
    if !problem.state_soft_constraint.is_empty() {
        cost.add_state_terms(&problem.state_soft_constraint.quadratic_approximation(time, state, pre));
    }
    cost
}

/// Sum of pre-jump cost and soft-constraint values.
pub fn compute_event_cost(problem: &OptimalControlProblem, time: f64, state: &DVector<f64>) -> f64 {
    let pre = problem.pre_computation.as_ref();
    problem.pre_jump_cost.value(time, state, pre) + problem.pre_jump_soft_constraint.value(time, state, pre)
}

/// Quadratic model of the pre-jump cost; input blocks are empty.
pub fn approximate_event_cost(
    problem: &OptimalControlProblem,
    time: f64,
    state: &DVector<f64>,
) -> ScalarFunctionQuadraticApproximation {
    let pre = problem.pre_computation.as_ref();
    let mut cost = problem.pre_jump_cost.quadratic_approximation(time, state, pre);
    if !problem.pre_jump_soft_constraint.is_empty() {
        cost += problem.pre_jump_soft_constraint.quadratic_approximation(time, state, pre);
    }
    cost
}

/// Sum of final cost and soft-constraint values.
pub fn compute_final_cost(problem: &OptimalControlProblem, time: f64, state: &DVector<f64>) -> f64 {
    let pre = problem.pre_computation.as_ref();
    problem.final_cost.value(time, state, pre) + problem.final_soft_constraint.value(time, state, pre)
}

/// Quadratic model of the final cost; input blocks are empty.
pub fn approximate_final_cost(
    problem: &OptimalControlProblem,
    time: f64,
    state: &DVector<f64>,
) -> ScalarFunctionQuadraticApproximation {
    let pre = problem.pre_computation.as_ref();
    let mut cost = problem.final_cost.quadratic_approximation(time, state, pre);
    if !problem.final_soft_constraint.is_empty() {
        cost += problem.final_soft_constraint.quadratic_approximation(time, state, pre);
    }
    cost
}

// ---------------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------------

/// Cost, dynamics violation and constraint values of an intermediate node.
pub fn compute_intermediate_metrics(
    problem: &OptimalControlProblem,
    time: f64,
    state: &DVector<f64>,
    input: &DVector<f64>,
    dynamics_violation: DVector<f64>,
) -> Metrics {
    let pre = problem.pre_computation.as_ref();
    let mut metrics = Metrics {
        cost: compute_cost(problem, time, state, input),
        dynamics_violation,
        ..Default::default()
    };

    if !problem.state_equality_constraint.is_empty() {
        metrics.state_eq_constraint = problem.state_equality_constraint.value(time, state, pre);
    }
    if !problem.equality_constraint.is_empty() {
        metrics.state_input_eq_constraint = problem.equality_constraint.value(time, state, input, pre);
    }
    if !problem.state_inequality_constraint.is_empty() {
        metrics.state_ineq_constraint = problem.state_inequality_constraint.value(time, state, pre);
    }
    if !problem.inequality_constraint.is_empty() {
        metrics.state_input_ineq_constraint = problem.inequality_constraint.value(time, state, input, pre);
    }
    metrics
}

/// [`compute_intermediate_metrics`] plus the Lagrangian penalties under `multipliers`.
pub fn compute_intermediate_metrics_with_multipliers(
    problem: &OptimalControlProblem,
    time: f64,
    state: &DVector<f64>,
    input: &DVector<f64>,
    multipliers: &MultiplierCollection,
    dynamics_violation: DVector<f64>,
) -> Metrics {
    let pre = problem.pre_computation.as_ref();
    let mut metrics = compute_intermediate_metrics(problem, time, state, input, dynamics_violation);

    metrics.state_eq_lagrangian = problem
        .state_equality_lagrangian
        .value(time, state, &multipliers.state_eq, pre);
    metrics.state_input_eq_lagrangian = problem
        .equality_lagrangian
        .value(time, state, input, &multipliers.state_input_eq, pre);
    metrics.state_ineq_lagrangian = problem
        .state_inequality_lagrangian
        .value(time, state, &multipliers.state_ineq, pre);
    metrics.state_input_ineq_lagrangian = problem
        .inequality_lagrangian
        .value(time, state, input, &multipliers.state_input_ineq, pre);
    metrics
}

/// Cost, jump-map violation and constraint values of a pre-jump node.
pub fn compute_pre_jump_metrics(
    problem: &OptimalControlProblem,
    time: f64,
    state: &DVector<f64>,
    dynamics_violation: DVector<f64>,
) -> Metrics {
    let pre = problem.pre_computation.as_ref();
    let mut metrics = Metrics {
        cost: compute_event_cost(problem, time, state),
        dynamics_violation,
        ..Default::default()
    };

    if !problem.pre_jump_equality_constraint.is_empty() {
        metrics.state_eq_constraint = problem.pre_jump_equality_constraint.value(time, state, pre);
    }
    if !problem.pre_jump_inequality_constraint.is_empty() {
        metrics.state_ineq_constraint = problem.pre_jump_inequality_constraint.value(time, state, pre);
    }
    metrics
}

/// [`compute_pre_jump_metrics`] plus the Lagrangian penalties under `multipliers`.
pub fn compute_pre_jump_metrics_with_multipliers(
    problem: &OptimalControlProblem,
    time: f64,
    state: &DVector<f64>,
    multipliers: &MultiplierCollection,
    dynamics_violation: DVector<f64>,
) -> Metrics {
    let pre = problem.pre_computation.as_ref();
    let mut metrics = compute_pre_jump_metrics(problem, time, state, dynamics_violation);

    metrics.state_eq_lagrangian = problem
        .pre_jump_equality_lagrangian
        .value(time, state, &multipliers.state_eq, pre);
    metrics.state_ineq_lagrangian = problem
        .pre_jump_inequality_lagrangian
        .value(time, state, &multipliers.state_ineq, pre);
    metrics
}

/// Cost and constraint values of the final node. No dynamics violation.
pub fn compute_final_metrics(problem: &OptimalControlProblem, time: f64, state: &DVector<f64>) -> Metrics {
    let pre = problem.pre_computation.as_ref();
    let mut metrics = Metrics {
        cost: compute_final_cost(problem, time, state),
        ..Default::default()
    };

    if !problem.final_equality_constraint.is_empty() {
        metrics.state_eq_constraint = problem.final_equality_constraint.value(time, state, pre);
    }
    if !problem.final_inequality_constraint.is_empty() {
        metrics.state_ineq_constraint = problem.final_inequality_constraint.value(time, state, pre);
    }
    metrics
}

/// [`compute_final_metrics`] plus the Lagrangian penalties under `multipliers`.
pub fn compute_final_metrics_with_multipliers(
    problem: &OptimalControlProblem,
    time: f64,
    state: &DVector<f64>,
    multipliers: &MultiplierCollection,
) -> Metrics {
    let pre = problem.pre_computation.as_ref();
    let mut metrics = compute_final_metrics(problem, time, state);

    metrics.state_eq_lagrangian = problem
        .final_equality_lagrangian
        .value(time, state, &multipliers.state_eq, pre);
    metrics.state_ineq_lagrangian = problem
        .final_inequality_lagrangian
        .value(time, state, &multipliers.state_ineq, pre);
    metrics
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::LinearStateConstraint;
    use crate::cost::{QuadraticStateCost, QuadraticStateInputCost};
    use crate::dynamics::LinearSystemDynamics;
    use crate::lagrangian::AugmentedLagrangianTerm;
    use approx::assert_relative_eq;
    use talos_core::Multiplier;

    fn problem() -> OptimalControlProblem {
        let dynamics = LinearSystemDynamics::new(
            DMatrix::from_row_slice(2, 2, &[0.0, 1.0, 0.0, 0.0]),
            DMatrix::from_row_slice(2, 1, &[0.0, 1.0]),
        );
        let mut p = OptimalControlProblem::new(Box::new(dynamics));
        p.cost
            .add(
                "tracking",
                Box::new(QuadraticStateInputCost::new(DMatrix::identity(2, 2), DMatrix::identity(1, 1))),
            )
            .unwrap();
        p
    }

    // -- costs --

    #[test]
    fn state_cost_only_touches_state_blocks() {
        let mut p = problem();
        p.state_cost
            .add("state", Box::new(QuadraticStateCost::new(DMatrix::identity(2, 2) * 3.0)))
            .unwrap();
        let x = DVector::from_vec(vec![1.0, 0.0]);
        let u = DVector::from_vec(vec![2.0]);

        let approx = approximate_cost(&p, 0.0, &x, &u);
        assert_relative_eq!(approx.f, 0.5 + 2.0 + 1.5);
        assert_relative_eq!(approx.dfdxx[(0, 0)], 4.0);
        assert_relative_eq!(approx.dfduu[(0, 0)], 1.0);
        assert_relative_eq!(compute_cost(&p, 0.0, &x, &u), approx.f);
    }

    #[test]
    fn event_and_final_costs_have_no_input() {
        let mut p = problem();
        p.pre_jump_cost
            .add("jump", Box::new(QuadraticStateCost::new(DMatrix::identity(2, 2))))
            .unwrap();
        let x = DVector::from_vec(vec![1.0, 1.0]);
        let event = approximate_event_cost(&p, 1.0, &x);
        assert_relative_eq!(event.f, compute_event_cost(&p, 1.0, &x));
        assert_eq!(event.dfdu.len(), 0);

        let fin = approximate_final_cost(&p, 2.0, &x);
        assert_eq!(fin, ScalarFunctionQuadraticApproximation::zero(2, None));
        assert_relative_eq!(compute_final_cost(&p, 2.0, &x), 0.0);
    }

    // -- LQ --

    #[test]
    fn intermediate_node_metadata_and_bias() {
        let mut p = problem();
        let x = DVector::from_vec(vec![1.0, 2.0]);
        let u = DVector::from_vec(vec![0.5]);
        let model = intermediate_lq(&mut p, 0.25, &x, &u, &MultiplierCollection::default());
        assert_relative_eq!(model.time, 0.25);
        assert_eq!((model.state_dim, model.input_dim), (2, 1));
        assert_eq!(model.dynamics_bias, DVector::zeros(2));
        assert_eq!(model.dynamics_covariance.shape(), (2, 2));
        assert_eq!(model.state_eq_constraint.dfdx.shape(), (0, 2));
        assert_eq!(model.check_size(), "");
    }

    #[test]
    fn pre_jump_node_uses_jump_map() {
        let mut p = problem();
        let x = DVector::from_vec(vec![1.0, 2.0]);
        let model = pre_jump_lq(&mut p, 1.0, &x, &MultiplierCollection::default());
        assert_eq!(model.input_dim, 0);
        assert_eq!(model.dynamics.dfdx, DMatrix::identity(2, 2));
        assert_eq!(model.dynamics.f, x);
        assert_eq!(model.dynamics_bias.len(), 2);
        assert_eq!(model.check_size(), "");
    }

    #[test]
    fn final_node_has_empty_dynamics() {
        let mut p = problem();
        let x = DVector::from_vec(vec![1.0, 2.0]);
        let model = final_lq(&mut p, 2.0, &x, &MultiplierCollection::default());
        assert_eq!(model.dynamics.dim(), 0);
        assert_eq!(model.dynamics_bias.len(), 0);
        assert_eq!(model.input_dim, 0);
        assert_eq!(model.check_size(), "");
    }

    #[test]
    fn state_lagrangian_leaves_input_blocks_alone() {
        let mut p = problem();
        p.state_equality_lagrangian
            .add(
                "pin",
                Box::new(AugmentedLagrangianTerm::equality(LinearStateConstraint::new(
                    DVector::zeros(1),
                    DMatrix::from_row_slice(1, 2, &[1.0, 0.0]),
                ))),
            )
            .unwrap();
        let x = DVector::from_vec(vec![2.0, 0.0]);
        let u = DVector::from_vec(vec![0.0]);
        let multipliers = MultiplierCollection {
            state_eq: vec![Multiplier::zero(1.0, 1)],
            ..Default::default()
        };

        let bare = approximate_cost(&p, 0.0, &x, &u);
        let model = intermediate_lq(&mut p, 0.0, &x, &u, &multipliers);
        // h = 2, ρ = 1 → penalty 2, gradient 2, curvature 1
        assert_relative_eq!(model.cost.f, bare.f + 2.0);
        assert_relative_eq!(model.cost.dfdx[0], bare.dfdx[0] + 2.0);
        assert_relative_eq!(model.cost.dfdxx[(0, 0)], bare.dfdxx[(0, 0)] + 1.0);
        assert_eq!(model.cost.dfdu, bare.dfdu);
        assert_eq!(model.cost.dfduu, bare.dfduu);
    }

    #[test]
    fn checked_approximator_reports_indefinite_cost() {
        let mut p = problem();
        p.state_cost
            .add("bad", Box::new(QuadraticStateCost::new(DMatrix::identity(2, 2) * -5.0)))
            .unwrap();
        let approximator = LqApproximator::new(LqSettings {
            check_numerical_stability: true,
        });
        let x = DVector::zeros(2);
        let u = DVector::zeros(1);
        let mut model = ModelData::default();
        let report = approximator.intermediate(&mut p, 0.0, &x, &u, &MultiplierCollection::default(), &mut model);
        assert!(report.contains("cost second derivative w.r.t. state is not PSD"), "{report}");

        let silent = LqApproximator::default();
        let report = silent.intermediate(&mut p, 0.0, &x, &u, &MultiplierCollection::default(), &mut model);
        assert_eq!(report, "");

        let report = approximator.final_node(&mut p, 1.0, &x, &MultiplierCollection::default(), &mut model);
        assert_eq!(report, "");
        let report = approximator.pre_jump(&mut p, 0.5, &x, &MultiplierCollection::default(), &mut model);
        assert_eq!(report, "");
    }

    // -- metrics --

    #[test]
    fn metrics_pass_dynamics_violation_through() {
        let p = problem();
        let x = DVector::from_vec(vec![1.0, 0.0]);
        let u = DVector::from_vec(vec![0.0]);
        let violation = DVector::from_vec(vec![0.1, -0.2]);
        let metrics = compute_intermediate_metrics(&p, 0.0, &x, &u, violation.clone());
        assert_eq!(metrics.dynamics_violation, violation);
        assert_relative_eq!(metrics.cost, 0.5);
        assert!(metrics.state_eq_constraint.is_empty());
        assert!(metrics.state_input_ineq_constraint.is_empty());
    }

    #[test]
    fn final_metrics_with_multipliers() {
        let mut p = problem();
        let con = LinearStateConstraint::new(DVector::from_element(1, -1.0), DMatrix::zeros(1, 2));
        p.final_inequality_constraint.add("floor", Box::new(con.clone())).unwrap();
        p.final_inequality_lagrangian
            .add("floor", Box::new(AugmentedLagrangianTerm::inequality(con)))
            .unwrap();
        let multipliers = MultiplierCollection {
            state_ineq: vec![Multiplier::zero(2.0, 1)],
            ..Default::default()
        };
        let x = DVector::zeros(2);

        let metrics = compute_final_metrics_with_multipliers(&p, 3.0, &x, &multipliers);
        assert_eq!(metrics.state_ineq_constraint.len(), 1);
        assert_eq!(metrics.state_ineq_lagrangian.len(), 1);
        // h = -1, λ = 0, ρ = 2 → 0.5 * 2 * 1
        assert_relative_eq!(metrics.state_ineq_lagrangian[0].penalty, 1.0);
        assert_relative_eq!(metrics.total_inequality_violation_squared_norm(), 1.0);
        assert_eq!(metrics.dynamics_violation.len(), 0);
    }
}
