//! Named, ordered collections of problem terms.
//!
//! A [`TermCollection`] owns boxed trait objects of one term kind and
//! evaluates them in insertion order:
//!
//! 1. **Cost collections** sum the contributions of active terms. An empty
//!    collection returns a zero model without evaluating anything.
//! 2. **Constraint collections** return one value per active term, or the
//!    row-stacked linearisation of all active terms.
//! 3. **Lagrangian collections** pair the `i`-th term with the `i`-th
//!    [`Multiplier`]. Terms without a multiplier entry see a zero multiplier.

use nalgebra::{DMatrix, DVector};
use talos_core::{
    LagrangianMetrics, Multiplier, ScalarFunctionQuadraticApproximation, VectorFunctionLinearApproximation,
};

use crate::constraint::{StateConstraint, StateInputConstraint};
use crate::cost::{StateCost, StateInputCost};
use crate::error::ProblemError;
use crate::lagrangian::{StateAugmentedLagrangian, StateInputAugmentedLagrangian};
use crate::precomputation::PreComputation;

/// Ordered collection of named terms.
pub struct TermCollection<T: ?Sized> {
    terms: Vec<(String, Box<T>)>,
}

impl<T: ?Sized> Default for TermCollection<T> {
    fn default() -> Self {
        Self { terms: Vec::new() }
    }
}

impl<T: ?Sized> TermCollection<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a term. Names must be unique within the collection.
    pub fn add(&mut self, name: impl Into<String>, term: Box<T>) -> Result<(), ProblemError> {
        let name = name.into();
        if self.terms.iter().any(|(n, _)| *n == name) {
            return Err(ProblemError::DuplicateTerm(name));
        }
        self.terms.push((name, term));
        Ok(())
    }

    /// Remove and return the term called `name`.
    pub fn remove(&mut self, name: &str) -> Result<Box<T>, ProblemError> {
        let idx = self
            .terms
            .iter()
            .position(|(n, _)| n == name)
            .ok_or_else(|| ProblemError::UnknownTerm(name.to_string()))?;
        Ok(self.terms.remove(idx).1)
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        self.terms.iter().find(|(n, _)| n == name).map(|(_, t)| t.as_ref())
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut T> {
        self.terms.iter_mut().find(|(n, _)| n == name).map(|(_, t)| t.as_mut())
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Term names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(|(n, _)| n.as_str())
    }

    fn iter(&self) -> impl Iterator<Item = &T> {
        self.terms.iter().map(|(_, t)| t.as_ref())
    }
}

fn multiplier_at(multipliers: &[Multiplier], i: usize) -> Multiplier {
    multipliers.get(i).cloned().unwrap_or_default()
}

/// Stack row blocks of several linearisations into one model.
fn stack(parts: &[VectorFunctionLinearApproximation], nx: usize, nu: Option<usize>) -> VectorFunctionLinearApproximation {
    let rows: usize = parts.iter().map(VectorFunctionLinearApproximation::dim).sum();
    let mut out = VectorFunctionLinearApproximation::zero(rows, nx, nu);
    let mut offset = 0;
    for part in parts {
        let n = part.dim();
        out.f.rows_mut(offset, n).copy_from(&part.f);
        out.dfdx.view_mut((offset, 0), (n, nx)).copy_from(&part.dfdx);
        if let Some(nu) = nu {
            out.dfdu.view_mut((offset, 0), (n, nu)).copy_from(&part.dfdu);
        }
        offset += n;
    }
    out
}

// ---------------------------------------------------------------------------
// Costs
// ---------------------------------------------------------------------------

impl TermCollection<dyn StateInputCost> {
    pub fn value(&self, time: f64, state: &DVector<f64>, input: &DVector<f64>, pre: &dyn PreComputation) -> f64 {
        self.iter()
            .filter(|t| t.is_active(time))
            .map(|t| t.value(time, state, input, pre))
            .sum()
    }

    pub fn quadratic_approximation(
        &self,
        time: f64,
        state: &DVector<f64>,
        input: &DVector<f64>,
        pre: &dyn PreComputation,
    ) -> ScalarFunctionQuadraticApproximation {
        let mut sum = ScalarFunctionQuadraticApproximation::zero(state.len(), Some(input.len()));
        for term in self.iter().filter(|t| t.is_active(time)) {
            sum += term.quadratic_approximation(time, state, input, pre);
        }
        sum
    }
}

impl TermCollection<dyn StateCost> {
    pub fn value(&self, time: f64, state: &DVector<f64>, pre: &dyn PreComputation) -> f64 {
        self.iter()
            .filter(|t| t.is_active(time))
            .map(|t| t.value(time, state, pre))
            .sum()
    }

    pub fn quadratic_approximation(
        &self,
        time: f64,
        state: &DVector<f64>,
        pre: &dyn PreComputation,
    ) -> ScalarFunctionQuadraticApproximation {
        let mut sum = ScalarFunctionQuadraticApproximation::zero(state.len(), None);
        for term in self.iter().filter(|t| t.is_active(time)) {
            sum += term.quadratic_approximation(time, state, pre);
        }
        sum
    }
}

// ---------------------------------------------------------------------------
// Constraints
// ---------------------------------------------------------------------------

impl TermCollection<dyn StateConstraint> {
    /// Total number of rows of active terms.
    pub fn num_constraints(&self, time: f64) -> usize {
        self.iter()
            .filter(|t| t.is_active(time))
            .map(|t| t.num_constraints(time))
            .sum()
    }

    pub fn value(&self, time: f64, state: &DVector<f64>, pre: &dyn PreComputation) -> Vec<DVector<f64>> {
        self.iter()
            .filter(|t| t.is_active(time))
            .map(|t| t.value(time, state, pre))
            .collect()
    }

    /// Row-stacked linearisation; `0 x nx` when nothing is active.
    pub fn linear_approximation(
        &self,
        time: f64,
        state: &DVector<f64>,
        pre: &dyn PreComputation,
    ) -> VectorFunctionLinearApproximation {
        let parts: Vec<_> = self
            .iter()
            .filter(|t| t.is_active(time))
            .map(|t| t.linear_approximation(time, state, pre))
            .collect();
        stack(&parts, state.len(), None)
    }
}

impl TermCollection<dyn StateInputConstraint> {
    /// Total number of rows of active terms.
    pub fn num_constraints(&self, time: f64) -> usize {
        self.iter()
            .filter(|t| t.is_active(time))
            .map(|t| t.num_constraints(time))
            .sum()
    }

    pub fn value(
        &self,
        time: f64,
        state: &DVector<f64>,
        input: &DVector<f64>,
        pre: &dyn PreComputation,
    ) -> Vec<DVector<f64>> {
        self.iter()
            .filter(|t| t.is_active(time))
            .map(|t| t.value(time, state, input, pre))
            .collect()
    }

    /// Row-stacked linearisation; `0 x nx` when nothing is active.
    pub fn linear_approximation(
        &self,
        time: f64,
        state: &DVector<f64>,
        input: &DVector<f64>,
        pre: &dyn PreComputation,
    ) -> VectorFunctionLinearApproximation {
        let parts: Vec<_> = self
            .iter()
            .filter(|t| t.is_active(time))
            .map(|t| t.linear_approximation(time, state, input, pre))
            .collect();
        stack(&parts, state.len(), Some(input.len()))
    }
}

// ---------------------------------------------------------------------------
// Lagrangians
// ---------------------------------------------------------------------------

impl TermCollection<dyn StateAugmentedLagrangian> {
    /// One entry per active term.
    pub fn value(
        &self,
        time: f64,
        state: &DVector<f64>,
        multipliers: &[Multiplier],
        pre: &dyn PreComputation,
    ) -> Vec<LagrangianMetrics> {
        self.iter()
            .enumerate()
            .filter(|(_, t)| t.is_active(time))
            .map(|(i, t)| t.value(time, state, &multiplier_at(multipliers, i), pre))
            .collect()
    }

    pub fn quadratic_approximation(
        &self,
        time: f64,
        state: &DVector<f64>,
        multipliers: &[Multiplier],
        pre: &dyn PreComputation,
    ) -> ScalarFunctionQuadraticApproximation {
        let mut sum = ScalarFunctionQuadraticApproximation::zero(state.len(), None);
        for (i, term) in self.iter().enumerate().filter(|(_, t)| t.is_active(time)) {
            sum += term.quadratic_approximation(time, state, &multiplier_at(multipliers, i), pre);
        }
        sum
    }
}

impl TermCollection<dyn StateInputAugmentedLagrangian> {
    /// One entry per active term.
    pub fn value(
        &self,
        time: f64,
        state: &DVector<f64>,
        input: &DVector<f64>,
        multipliers: &[Multiplier],
        pre: &dyn PreComputation,
    ) -> Vec<LagrangianMetrics> {
        self.iter()
            .enumerate()
            .filter(|(_, t)| t.is_active(time))
            .map(|(i, t)| t.value(time, state, input, &multiplier_at(multipliers, i), pre))
            .collect()
    }

    pub fn quadratic_approximation(
        &self,
        time: f64,
        state: &DVector<f64>,
        input: &DVector<f64>,
        multipliers: &[Multiplier],
        pre: &dyn PreComputation,
    ) -> ScalarFunctionQuadraticApproximation {
        let mut sum = ScalarFunctionQuadraticApproximation::zero(state.len(), Some(input.len()));
        for (i, term) in self.iter().enumerate().filter(|(_, t)| t.is_active(time)) {
            sum += term.quadratic_approximation(time, state, input, &multiplier_at(multipliers, i), pre);
        }
        sum
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::{LinearStateConstraint, LinearStateInputConstraint};
    use crate::cost::{QuadraticStateCost, QuadraticStateInputCost};
    use crate::lagrangian::AugmentedLagrangianTerm;
    use crate::precomputation::NoPreComputation;
    use approx::assert_relative_eq;

    /// Cost that is only active before `t = 1`.
    struct EarlyCost;

    impl StateCost for EarlyCost {
        fn is_active(&self, time: f64) -> bool {
            time < 1.0
        }

        fn value(&self, _time: f64, _state: &DVector<f64>, _pre: &dyn PreComputation) -> f64 {
            10.0
        }

        fn quadratic_approximation(
            &self,
            _time: f64,
            state: &DVector<f64>,
            _pre: &dyn PreComputation,
        ) -> ScalarFunctionQuadraticApproximation {
            let mut approx = ScalarFunctionQuadraticApproximation::zero(state.len(), None);
            approx.f = 10.0;
            approx
        }
    }

    // -- bookkeeping --

    #[test]
    fn duplicate_names_are_rejected() {
        let mut costs = TermCollection::<dyn StateCost>::new();
        costs.add("q", Box::new(QuadraticStateCost::new(DMatrix::identity(2, 2)))).unwrap();
        let err = costs
            .add("q", Box::new(QuadraticStateCost::new(DMatrix::identity(2, 2))))
            .unwrap_err();
        assert_eq!(err, ProblemError::DuplicateTerm("q".into()));
        assert_eq!(costs.len(), 1);
    }

    #[test]
    fn names_keep_insertion_order() {
        let mut costs = TermCollection::<dyn StateCost>::new();
        costs.add("b", Box::new(EarlyCost)).unwrap();
        costs.add("a", Box::new(EarlyCost)).unwrap();
        assert_eq!(costs.names().collect::<Vec<_>>(), vec!["b", "a"]);
        assert!(costs.get("a").is_some());
        assert!(costs.get("c").is_none());
    }

    #[test]
    fn remove_unknown_term_fails() {
        let mut costs = TermCollection::<dyn StateCost>::new();
        costs.add("a", Box::new(EarlyCost)).unwrap();
        assert!(costs.remove("a").is_ok());
        assert!(costs.is_empty());
        assert_eq!(costs.remove("a").err(), Some(ProblemError::UnknownTerm("a".into())));
    }

    // -- evaluation --

    #[test]
    fn inactive_terms_are_skipped() {
        let mut costs = TermCollection::<dyn StateCost>::new();
        costs.add("early", Box::new(EarlyCost)).unwrap();
        let x = DVector::zeros(2);
        assert_relative_eq!(costs.value(0.5, &x, &NoPreComputation), 10.0);
        assert_relative_eq!(costs.value(1.5, &x, &NoPreComputation), 0.0);
        assert_relative_eq!(costs.quadratic_approximation(1.5, &x, &NoPreComputation).f, 0.0);
    }

    #[test]
    fn empty_cost_collection_returns_zero_model() {
        let costs = TermCollection::<dyn StateInputCost>::new();
        let approx = costs.quadratic_approximation(0.0, &DVector::zeros(3), &DVector::zeros(2), &NoPreComputation);
        assert_eq!(approx, ScalarFunctionQuadraticApproximation::zero(3, Some(2)));
    }

    #[test]
    fn cost_terms_are_summed() {
        let mut costs = TermCollection::<dyn StateInputCost>::new();
        let term = QuadraticStateInputCost::new(DMatrix::identity(2, 2), DMatrix::identity(1, 1));
        costs.add("a", Box::new(term.clone())).unwrap();
        costs.add("b", Box::new(term)).unwrap();
        let x = DVector::from_vec(vec![1.0, 1.0]);
        let u = DVector::from_vec(vec![1.0]);
        assert_relative_eq!(costs.value(0.0, &x, &u, &NoPreComputation), 3.0);
        let approx = costs.quadratic_approximation(0.0, &x, &u, &NoPreComputation);
        assert_relative_eq!(approx.dfdxx[(0, 0)], 2.0);
    }

    #[test]
    fn constraints_are_stacked() {
        let mut cons = TermCollection::<dyn StateInputConstraint>::new();
        cons.add(
            "first",
            Box::new(LinearStateInputConstraint::new(
                DVector::from_vec(vec![1.0]),
                DMatrix::from_row_slice(1, 2, &[1.0, 0.0]),
                DMatrix::from_row_slice(1, 1, &[1.0]),
            )),
        )
        .unwrap();
        cons.add(
            "second",
            Box::new(LinearStateInputConstraint::new(
                DVector::from_vec(vec![0.0, 2.0]),
                DMatrix::from_row_slice(2, 2, &[0.0, 1.0, 1.0, 1.0]),
                DMatrix::from_row_slice(2, 1, &[0.0, -1.0]),
            )),
        )
        .unwrap();
        let x = DVector::from_vec(vec![1.0, 2.0]);
        let u = DVector::from_vec(vec![3.0]);

        assert_eq!(cons.num_constraints(0.0), 3);
        let values = cons.value(0.0, &x, &u, &NoPreComputation);
        assert_eq!(values.len(), 2);

        let lin = cons.linear_approximation(0.0, &x, &u, &NoPreComputation);
        assert_eq!(lin.f.as_slice(), &[5.0, 2.0, 2.0]);
        assert_eq!(lin.dfdx.row(2)[1], 1.0);
        assert_eq!(lin.dfdu.shape(), (3, 1));
        assert_eq!(lin.dfdu[(2, 0)], -1.0);
    }

    #[test]
    fn empty_state_constraint_is_zero_rows() {
        let cons = TermCollection::<dyn StateConstraint>::new();
        let lin = cons.linear_approximation(0.0, &DVector::zeros(4), &NoPreComputation);
        assert_eq!(lin.f.len(), 0);
        assert_eq!(lin.dfdx.shape(), (0, 4));
        assert!(cons.value(0.0, &DVector::zeros(4), &NoPreComputation).is_empty());
    }

    #[test]
    fn lagrangians_use_matching_multiplier() {
        let mut lag = TermCollection::<dyn StateAugmentedLagrangian>::new();
        let con = LinearStateConstraint::new(DVector::from_element(1, 1.0), DMatrix::zeros(1, 2));
        lag.add("a", Box::new(AugmentedLagrangianTerm::equality(con.clone()))).unwrap();
        lag.add("b", Box::new(AugmentedLagrangianTerm::equality(con))).unwrap();
        let x = DVector::zeros(2);
        let multipliers = vec![Multiplier::zero(2.0, 1)];

        let values = lag.value(0.0, &x, &multipliers, &NoPreComputation);
        // ρ = 2 on the first term, missing multiplier on the second
        assert_relative_eq!(values[0].penalty, 1.0);
        assert_relative_eq!(values[1].penalty, 0.0);
        assert_relative_eq!(lag.quadratic_approximation(0.0, &x, &multipliers, &NoPreComputation).f, 1.0);
    }
}
