//! Augmented-Lagrangian terms.
//!
//! A Lagrangian term wraps a constraint `h` and turns it into a penalty that
//! depends on the current multiplier estimate `(ρ, λ)`:
//!
//! 1. **Equality** (`h = 0`): `λᵀh + ½ρ‖h‖²`
//! 2. **Inequality** (`h ≥ 0`): `(‖max(0, λ − ρh)‖² − ‖λ‖²) / (2ρ)`
//!
//! Both are evaluated row by row. The quadratic model uses the Gauss-Newton
//! curvature `Jᵀ diag(c) J`, where `c` is the second derivative of the
//! penalty with respect to each row of `h`.

use nalgebra::{DMatrix, DVector};
use talos_core::{LagrangianMetrics, Multiplier, ScalarFunctionQuadraticApproximation};

use crate::constraint::{StateConstraint, StateInputConstraint};
use crate::precomputation::PreComputation;

/// Lagrangian term on the state only.
pub trait StateAugmentedLagrangian: Send + Sync {
    fn is_active(&self, _time: f64) -> bool {
        true
    }

    fn value(
        &self,
        time: f64,
        state: &DVector<f64>,
        multiplier: &Multiplier,
        pre_computation: &dyn PreComputation,
    ) -> LagrangianMetrics;

    /// Second-order model of the penalty; input blocks are empty.
    fn quadratic_approximation(
        &self,
        time: f64,
        state: &DVector<f64>,
        multiplier: &Multiplier,
        pre_computation: &dyn PreComputation,
    ) -> ScalarFunctionQuadraticApproximation;
}

/// Lagrangian term coupling state and input.
pub trait StateInputAugmentedLagrangian: Send + Sync {
    fn is_active(&self, _time: f64) -> bool {
        true
    }

    fn value(
        &self,
        time: f64,
        state: &DVector<f64>,
        input: &DVector<f64>,
        multiplier: &Multiplier,
        pre_computation: &dyn PreComputation,
    ) -> LagrangianMetrics;

    fn quadratic_approximation(
        &self,
        time: f64,
        state: &DVector<f64>,
        input: &DVector<f64>,
        multiplier: &Multiplier,
        pre_computation: &dyn PreComputation,
    ) -> ScalarFunctionQuadraticApproximation;
}

// ---------------------------------------------------------------------------
// Penalty
// ---------------------------------------------------------------------------

/// Which side of the constraint is feasible.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PenaltyKind {
    /// `h = 0`.
    Equality,
    /// `h ≥ 0`.
    Inequality,
}

/// Row-wise penalty value, first and second derivative w.r.t. `h`.
struct RowPenalty {
    value: f64,
    gradient: DVector<f64>,
    curvature: DVector<f64>,
}

impl PenaltyKind {
    /// Evaluate the penalty of `h` under `multiplier`.
    ///
    /// An empty multiplier vector stands for `λ = 0`.
    fn evaluate(self, h: &DVector<f64>, multiplier: &Multiplier) -> RowPenalty {
        let rho = multiplier.penalty;
        let n = h.len();
        let lambda = |i: usize| multiplier.lagrangian.get(i).copied().unwrap_or(0.0);

        let mut value = 0.0;
        let mut gradient = DVector::zeros(n);
        let mut curvature = DVector::zeros(n);
        for i in 0..n {
            let (l, hi) = (lambda(i), h[i]);
            match self {
                Self::Equality => {
                    value += l * hi + 0.5 * rho * hi * hi;
                    gradient[i] = l + rho * hi;
                    curvature[i] = rho;
                }
                Self::Inequality => {
                    if l - rho * hi > 0.0 {
                        value += -l * hi + 0.5 * rho * hi * hi;
                        gradient[i] = -l + rho * hi;
                        curvature[i] = rho;
                    } else if rho > 0.0 {
                        value -= l * l / (2.0 * rho);
                    }
                }
            }
        }
        RowPenalty {
            value,
            gradient,
            curvature,
        }
    }
}

/// `Jᵀ diag(c) K`.
fn weighted_gram(j: &DMatrix<f64>, c: &DVector<f64>, k: &DMatrix<f64>) -> DMatrix<f64> {
    let mut scaled = k.clone();
    for (mut row, &ci) in scaled.row_iter_mut().zip(c.iter()) {
        row *= ci;
    }
    j.transpose() * scaled
}

// ---------------------------------------------------------------------------
// AugmentedLagrangianTerm
// ---------------------------------------------------------------------------

/// Augmented-Lagrangian penalty built on top of a constraint.
///
/// Implements [`StateAugmentedLagrangian`] when `C` is a
/// [`StateConstraint`] and [`StateInputAugmentedLagrangian`] when `C` is a
/// [`StateInputConstraint`].
#[derive(Clone, Debug, PartialEq)]
pub struct AugmentedLagrangianTerm<C> {
    constraint: C,
    kind: PenaltyKind,
}

impl<C> AugmentedLagrangianTerm<C> {
    pub const fn new(constraint: C, kind: PenaltyKind) -> Self {
        Self { constraint, kind }
    }

    pub const fn equality(constraint: C) -> Self {
        Self::new(constraint, PenaltyKind::Equality)
    }

    pub const fn inequality(constraint: C) -> Self {
        Self::new(constraint, PenaltyKind::Inequality)
    }

    pub const fn kind(&self) -> PenaltyKind {
        self.kind
    }

    pub const fn constraint(&self) -> &C {
        &self.constraint
    }
}

impl<C: StateConstraint> StateAugmentedLagrangian for AugmentedLagrangianTerm<C> {
    fn is_active(&self, time: f64) -> bool {
        self.constraint.is_active(time)
    }

    fn value(
        &self,
        time: f64,
        state: &DVector<f64>,
        multiplier: &Multiplier,
        pre_computation: &dyn PreComputation,
    ) -> LagrangianMetrics {
        let h = self.constraint.value(time, state, pre_computation);
        let penalty = self.kind.evaluate(&h, multiplier).value;
        LagrangianMetrics::new(penalty, h)
    }

    fn quadratic_approximation(
        &self,
        time: f64,
        state: &DVector<f64>,
        multiplier: &Multiplier,
        pre_computation: &dyn PreComputation,
    ) -> ScalarFunctionQuadraticApproximation {
        let h = self.constraint.linear_approximation(time, state, pre_computation);
        let p = self.kind.evaluate(&h.f, multiplier);

        let mut approx = ScalarFunctionQuadraticApproximation::zero(state.len(), None);
        approx.f = p.value;
        approx.dfdx = h.dfdx.transpose() * &p.gradient;
        approx.dfdxx = weighted_gram(&h.dfdx, &p.curvature, &h.dfdx);
        approx
    }
}

impl<C: StateInputConstraint> StateInputAugmentedLagrangian for AugmentedLagrangianTerm<C> {
    fn is_active(&self, time: f64) -> bool {
        self.constraint.is_active(time)
    }

    fn value(
        &self,
        time: f64,
        state: &DVector<f64>,
        input: &DVector<f64>,
        multiplier: &Multiplier,
        pre_computation: &dyn PreComputation,
    ) -> LagrangianMetrics {
        let h = self.constraint.value(time, state, input, pre_computation);
        let penalty = self.kind.evaluate(&h, multiplier).value;
        LagrangianMetrics::new(penalty, h)
    }

    fn quadratic_approximation(
        &self,
        time: f64,
        state: &DVector<f64>,
        input: &DVector<f64>,
        multiplier: &Multiplier,
        pre_computation: &dyn PreComputation,
    ) -> ScalarFunctionQuadraticApproximation {
        let h = self.constraint.linear_approximation(time, state, input, pre_computation);
        let p = self.kind.evaluate(&h.f, multiplier);

        ScalarFunctionQuadraticApproximation {
            f: p.value,
            dfdx: h.dfdx.transpose() * &p.gradient,
            dfdu: h.dfdu.transpose() * &p.gradient,
            dfdxx: weighted_gram(&h.dfdx, &p.curvature, &h.dfdx),
            dfdux: weighted_gram(&h.dfdu, &p.curvature, &h.dfdx),
            dfduu: weighted_gram(&h.dfdu, &p.curvature, &h.dfdu),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::{LinearStateConstraint, LinearStateInputConstraint};
    use crate::precomputation::NoPreComputation;
    use approx::assert_relative_eq;

    fn row_constraint(e: f64) -> LinearStateConstraint {
        LinearStateConstraint::new(DVector::from_element(1, e), DMatrix::from_row_slice(1, 2, &[1.0, 0.0]))
    }

    // -- equality --

    #[test]
    fn equality_penalty_value() {
        let term = AugmentedLagrangianTerm::equality(row_constraint(0.0));
        let x = DVector::from_vec(vec![2.0, 5.0]);
        let m = Multiplier::new(4.0, DVector::from_element(1, 0.5));
        let metrics = StateAugmentedLagrangian::value(&term, 0.0, &x, &m, &NoPreComputation);
        // 0.5 * 2 + 0.5 * 4 * 4
        assert_relative_eq!(metrics.penalty, 9.0);
        assert_relative_eq!(metrics.constraint[0], 2.0);
    }

    #[test]
    fn equality_quadratic_model() {
        let term = AugmentedLagrangianTerm::equality(row_constraint(0.0));
        let x = DVector::from_vec(vec![2.0, 5.0]);
        let m = Multiplier::new(4.0, DVector::from_element(1, 0.5));
        let approx = StateAugmentedLagrangian::quadratic_approximation(&term, 0.0, &x, &m, &NoPreComputation);
        assert_relative_eq!(approx.f, 9.0);
        assert_relative_eq!(approx.dfdx[0], 8.5);
        assert_relative_eq!(approx.dfdx[1], 0.0);
        assert_relative_eq!(approx.dfdxx[(0, 0)], 4.0);
        assert_relative_eq!(approx.dfdxx[(1, 1)], 0.0);
        assert_eq!(approx.dfdu.len(), 0);
    }

    #[test]
    fn empty_multiplier_means_zero_lambda() {
        let term = AugmentedLagrangianTerm::equality(row_constraint(1.0));
        let x = DVector::zeros(2);
        let m = Multiplier::new(2.0, DVector::zeros(0));
        let metrics = StateAugmentedLagrangian::value(&term, 0.0, &x, &m, &NoPreComputation);
        assert_relative_eq!(metrics.penalty, 1.0);
    }

    // -- inequality --

    #[test]
    fn inactive_inequality_has_no_curvature() {
        // h = 3 (satisfied), λ = 1, ρ = 1 → λ − ρh < 0
        let term = AugmentedLagrangianTerm::inequality(row_constraint(3.0));
        let x = DVector::zeros(2);
        let m = Multiplier::new(1.0, DVector::from_element(1, 1.0));
        let approx = StateAugmentedLagrangian::quadratic_approximation(&term, 0.0, &x, &m, &NoPreComputation);
        assert_relative_eq!(approx.f, -0.5);
        assert_relative_eq!(approx.dfdx.norm(), 0.0);
        assert_relative_eq!(approx.dfdxx.norm(), 0.0);
    }

    #[test]
    fn violated_inequality_matches_closed_form() {
        // h = -1, λ = 1, ρ = 2 → max(0, 1 + 2) = 3 → (9 - 1) / 4 = 2
        let term = AugmentedLagrangianTerm::inequality(row_constraint(-1.0));
        let x = DVector::zeros(2);
        let m = Multiplier::new(2.0, DVector::from_element(1, 1.0));
        let approx = StateAugmentedLagrangian::quadratic_approximation(&term, 0.0, &x, &m, &NoPreComputation);
        assert_relative_eq!(approx.f, 2.0);
        assert_relative_eq!(approx.dfdx[0], -3.0);
        assert_relative_eq!(approx.dfdxx[(0, 0)], 2.0);
    }

    #[test]
    fn zero_penalty_inequality_is_finite() {
        let term = AugmentedLagrangianTerm::inequality(row_constraint(1.0));
        let m = Multiplier::zero(0.0, 1);
        let metrics = StateAugmentedLagrangian::value(&term, 0.0, &DVector::zeros(2), &m, &NoPreComputation);
        assert_eq!(metrics.penalty, 0.0);
    }

    // -- state-input --

    #[test]
    fn state_input_term_couples_blocks() {
        let con = LinearStateInputConstraint::new(
            DVector::zeros(1),
            DMatrix::from_row_slice(1, 2, &[1.0, 0.0]),
            DMatrix::from_row_slice(1, 1, &[2.0]),
        );
        let term = AugmentedLagrangianTerm::equality(con);
        let x = DVector::from_vec(vec![1.0, 0.0]);
        let u = DVector::from_vec(vec![1.0]);
        let m = Multiplier::new(1.0, DVector::zeros(1));
        let approx =
            StateInputAugmentedLagrangian::quadratic_approximation(&term, 0.0, &x, &u, &m, &NoPreComputation);
        // h = 3, f = 4.5, dfdh = 3
        assert_relative_eq!(approx.f, 4.5);
        assert_relative_eq!(approx.dfdu[0], 6.0);
        assert_relative_eq!(approx.dfdux[(0, 0)], 2.0);
        assert_relative_eq!(approx.dfduu[(0, 0)], 4.0);
        assert_eq!(approx.dfdux.shape(), (1, 2));
    }
}
