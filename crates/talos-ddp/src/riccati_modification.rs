//! Per-node output of the Hessian correction step.
//!
//! The backward pass adds the `delta_*` terms to the projected model data
//! before integrating the Riccati equations.

use nalgebra::{DMatrix, DVector};

/// Corrections and constraint projectors of one node.
#[derive(Clone, Debug, PartialEq)]
pub struct Data {
    pub time: f64,
    /// Correction of the state-state Hessian `Qm`.
    pub delta_qm: DMatrix<f64>,
    /// Correction of the input-input Hessian `Rm`.
    pub delta_rm: DMatrix<f64>,
    /// Correction of the input-state Hessian `Pm`.
    pub delta_pm: DMatrix<f64>,
    /// Correction of the feedforward gradient.
    pub delta_gv: DVector<f64>,
    /// Correction of the feedback gradient.
    pub delta_gm: DMatrix<f64>,
    /// Projector onto the range of the input equality constraint.
    pub constraint_range_projector: DMatrix<f64>,
    /// Projector onto its null space.
    pub constraint_null_projector: DMatrix<f64>,
}

impl Default for Data {
    fn default() -> Self {
        Self {
            time: 0.0,
            delta_qm: DMatrix::zeros(0, 0),
            delta_rm: DMatrix::zeros(0, 0),
            delta_pm: DMatrix::zeros(0, 0),
            delta_gv: DVector::zeros(0),
            delta_gm: DMatrix::zeros(0, 0),
            constraint_range_projector: DMatrix::zeros(0, 0),
            constraint_null_projector: DMatrix::zeros(0, 0),
        }
    }
}

impl Data {
    /// Zero corrections for a node with `nx` states and `nu` inputs and
    /// identity null-space projector (no constraint).
    pub fn zero(time: f64, nx: usize, nu: usize) -> Self {
        Self {
            time,
            delta_qm: DMatrix::zeros(nx, nx),
            delta_rm: DMatrix::zeros(nu, nu),
            delta_pm: DMatrix::zeros(nu, nx),
            delta_gv: DVector::zeros(nu),
            delta_gm: DMatrix::zeros(nu, nx),
            constraint_range_projector: DMatrix::zeros(nu, 0),
            constraint_null_projector: DMatrix::identity(nu, nu),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_data_shapes() {
        let d = Data::zero(0.5, 4, 2);
        assert_eq!(d.delta_pm.shape(), (2, 4));
        assert_eq!(d.delta_gv.len(), 2);
        assert_eq!(d.constraint_null_projector, DMatrix::identity(2, 2));
        assert_eq!(d.constraint_range_projector.ncols(), 0);
    }
}
