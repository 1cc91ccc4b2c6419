//! Ready-made problems.

use nalgebra::{DMatrix, DVector};
use talos_oc::{LinearStateInputConstraint, LinearSystemDynamics, OptimalControlProblem, QuadraticStateInputCost};

/// Planar double integrator: state `(p, v)`, input `a`.
pub fn double_integrator() -> LinearSystemDynamics {
    LinearSystemDynamics::new(
        DMatrix::from_row_slice(2, 2, &[0.0, 1.0, 0.0, 0.0]),
        DMatrix::from_row_slice(2, 1, &[0.0, 1.0]),
    )
}

/// Double integrator with one quadratic tracking cost (`"tracking"`) and one
/// linear state-input equality `v + a = 0` (`"damping"`).
///
/// Every other collection is empty.
pub fn double_integrator_problem() -> OptimalControlProblem {
    let mut problem = OptimalControlProblem::new(Box::new(double_integrator()));

    let cost = QuadraticStateInputCost::new(
        DMatrix::from_diagonal(&DVector::from_vec(vec![10.0, 1.0])),
        DMatrix::from_element(1, 1, 0.1),
    )
    .with_nominal(DVector::from_vec(vec![1.0, 0.0]), DVector::zeros(1));
    let constraint = LinearStateInputConstraint::new(
        DVector::zeros(1),
        DMatrix::from_row_slice(1, 2, &[0.0, 1.0]),
        DMatrix::from_element(1, 1, 1.0),
    );

    problem.cost.add("tracking", Box::new(cost)).unwrap();
    problem.equality_constraint.add("damping", Box::new(constraint)).unwrap();
    problem
}
