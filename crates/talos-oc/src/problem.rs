//! Optimal-control problem definition.

use crate::collection::TermCollection;
use crate::constraint::{StateConstraint, StateInputConstraint};
use crate::cost::{StateCost, StateInputCost};
use crate::dynamics::SystemDynamics;
use crate::lagrangian::{StateAugmentedLagrangian, StateInputAugmentedLagrangian};
use crate::precomputation::{NoPreComputation, PreComputation};

/// Every term of a hybrid optimal-control problem, grouped by node kind.
///
/// ```text
/// intermediate:  cost, soft_constraint, state_cost, state_soft_constraint,
///                equality/inequality constraints and Lagrangians
/// pre-jump:      pre_jump_* (state only)
/// final:         final_*    (state only)
/// ```
pub struct OptimalControlProblem {
    // -- intermediate --
    pub cost: TermCollection<dyn StateInputCost>,
    pub soft_constraint: TermCollection<dyn StateInputCost>,
    pub state_cost: TermCollection<dyn StateCost>,
    pub state_soft_constraint: TermCollection<dyn StateCost>,
    pub equality_constraint: TermCollection<dyn StateInputConstraint>,
    pub state_equality_constraint: TermCollection<dyn StateConstraint>,
    pub inequality_constraint: TermCollection<dyn StateInputConstraint>,
    pub state_inequality_constraint: TermCollection<dyn StateConstraint>,
    pub equality_lagrangian: TermCollection<dyn StateInputAugmentedLagrangian>,
    pub state_equality_lagrangian: TermCollection<dyn StateAugmentedLagrangian>,
    pub inequality_lagrangian: TermCollection<dyn StateInputAugmentedLagrangian>,
    pub state_inequality_lagrangian: TermCollection<dyn StateAugmentedLagrangian>,

    // -- pre-jump --
    pub pre_jump_cost: TermCollection<dyn StateCost>,
    pub pre_jump_soft_constraint: TermCollection<dyn StateCost>,
    pub pre_jump_equality_constraint: TermCollection<dyn StateConstraint>,
    pub pre_jump_inequality_constraint: TermCollection<dyn StateConstraint>,
    pub pre_jump_equality_lagrangian: TermCollection<dyn StateAugmentedLagrangian>,
    pub pre_jump_inequality_lagrangian: TermCollection<dyn StateAugmentedLagrangian>,

    // -- final --
    pub final_cost: TermCollection<dyn StateCost>,
    pub final_soft_constraint: TermCollection<dyn StateCost>,
    pub final_equality_constraint: TermCollection<dyn StateConstraint>,
    pub final_inequality_constraint: TermCollection<dyn StateConstraint>,
    pub final_equality_lagrangian: TermCollection<dyn StateAugmentedLagrangian>,
    pub final_inequality_lagrangian: TermCollection<dyn StateAugmentedLagrangian>,

    pub dynamics: Box<dyn SystemDynamics>,
    pub pre_computation: Box<dyn PreComputation>,
}

impl OptimalControlProblem {
    /// Problem with the given dynamics, no terms and a no-op cache.
    pub fn new(dynamics: Box<dyn SystemDynamics>) -> Self {
        Self {
            cost: TermCollection::new(),
            soft_constraint: TermCollection::new(),
            state_cost: TermCollection::new(),
            state_soft_constraint: TermCollection::new(),
            equality_constraint: TermCollection::new(),
            state_equality_constraint: TermCollection::new(),
            inequality_constraint: TermCollection::new(),
            state_inequality_constraint: TermCollection::new(),
            equality_lagrangian: TermCollection::new(),
            state_equality_lagrangian: TermCollection::new(),
            inequality_lagrangian: TermCollection::new(),
            state_inequality_lagrangian: TermCollection::new(),
            pre_jump_cost: TermCollection::new(),
            pre_jump_soft_constraint: TermCollection::new(),
            pre_jump_equality_constraint: TermCollection::new(),
            pre_jump_inequality_constraint: TermCollection::new(),
            pre_jump_equality_lagrangian: TermCollection::new(),
            pre_jump_inequality_lagrangian: TermCollection::new(),
            final_cost: TermCollection::new(),
            final_soft_constraint: TermCollection::new(),
            final_equality_constraint: TermCollection::new(),
            final_inequality_constraint: TermCollection::new(),
            final_equality_lagrangian: TermCollection::new(),
            final_inequality_lagrangian: TermCollection::new(),
            dynamics,
            pre_computation: Box::new(NoPreComputation),
        }
    }

    /// Replace the shared precomputation cache.
    #[must_use]
    pub fn with_pre_computation(mut self, pre_computation: Box<dyn PreComputation>) -> Self {
        self.pre_computation = pre_computation;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::LinearSystemDynamics;
    use nalgebra::DMatrix;

    #[test]
    fn new_problem_is_empty() {
        let dynamics = LinearSystemDynamics::new(DMatrix::zeros(2, 2), DMatrix::zeros(2, 1));
        let problem = OptimalControlProblem::new(Box::new(dynamics));
        assert!(problem.cost.is_empty());
        assert!(problem.final_inequality_lagrangian.is_empty());
        assert!(problem.pre_computation.as_any().is::<NoPreComputation>());
    }
}
