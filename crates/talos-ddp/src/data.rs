//! Iteration containers of the DDP solver.
//!
//! ```text
//! PrimalDataContainer  rollout:   primal solution, metrics, ModelData per node
//! DualDataContainer    backward:  dual solution, projected ModelData,
//!                                 Riccati modifications, value function
//! ```
//!
//! All trajectories in a primal container come from rolling out the same
//! controller. The only exception is right after initialisation from an
//! external controller, until the next rollout refreshes the container.
//!
//! `swap` exchanges owned buffers and never copies trajectories; solvers use
//! it to promote the data of an accepted iteration.

use talos_core::{ModelData, ScalarFunctionQuadraticApproximation};
use talos_oc::{DualSolution, PrimalSolution, ProblemMetrics};

use crate::riccati_modification;

/// Rollout-consistent primal data.
#[derive(Clone, Debug, Default)]
pub struct PrimalDataContainer {
    pub primal_solution: PrimalSolution,
    pub problem_metrics: ProblemMetrics,
    pub model_data_final_time: ModelData,
    /// One entry per event.
    pub model_data_event_times: Vec<ModelData>,
    /// One entry per node of the primal solution.
    pub model_data_trajectory: Vec<ModelData>,
}

impl PrimalDataContainer {
    pub fn swap(&mut self, other: &mut Self) {
        self.primal_solution.swap(&mut other.primal_solution);
        self.problem_metrics.swap(&mut other.problem_metrics);
        std::mem::swap(&mut self.model_data_final_time, &mut other.model_data_final_time);
        std::mem::swap(&mut self.model_data_event_times, &mut other.model_data_event_times);
        std::mem::swap(&mut self.model_data_trajectory, &mut other.model_data_trajectory);
    }

    /// Drop all trajectories. `model_data_final_time` is kept; it is
    /// overwritten by the next linearisation.
    pub fn clear(&mut self) {
        self.primal_solution.clear();
        self.problem_metrics.clear();
        self.model_data_event_times.clear();
        self.model_data_trajectory.clear();
    }
}

/// Dual data produced by the backward pass.
///
/// `value_function_trajectory` is always the Riccati solution for
/// `(projected_model_data_trajectory, riccati_modification_trajectory)`.
#[derive(Clone, Debug, Default)]
pub struct DualDataContainer {
    pub dual_solution: DualSolution,
    pub projected_model_data_trajectory: Vec<ModelData>,
    pub riccati_modification_trajectory: Vec<riccati_modification::Data>,
    pub value_function_trajectory: Vec<ScalarFunctionQuadraticApproximation>,
}

impl DualDataContainer {
    pub fn swap(&mut self, other: &mut Self) {
        self.dual_solution.swap(&mut other.dual_solution);
        std::mem::swap(
            &mut self.projected_model_data_trajectory,
            &mut other.projected_model_data_trajectory,
        );
        std::mem::swap(
            &mut self.riccati_modification_trajectory,
            &mut other.riccati_modification_trajectory,
        );
        std::mem::swap(&mut self.value_function_trajectory, &mut other.value_function_trajectory);
    }

    pub fn clear(&mut self) {
        self.dual_solution.clear();
        self.projected_model_data_trajectory.clear();
        self.riccati_modification_trajectory.clear();
        self.value_function_trajectory.clear();
    }

    /// Size the per-node arrays for `n` nodes, keeping existing entries.
    pub fn resize_for(&mut self, n: usize) {
        self.projected_model_data_trajectory.resize_with(n, ModelData::default);
        self.riccati_modification_trajectory
            .resize_with(n, riccati_modification::Data::default);
        self.value_function_trajectory
            .resize_with(n, ScalarFunctionQuadraticApproximation::default);
    }
}
