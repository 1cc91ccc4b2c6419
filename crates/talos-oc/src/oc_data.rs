//! Trajectory-level containers for primal and dual solutions and metrics.
//!
//! `swap` exchanges owned buffers and never copies trajectory data.

use nalgebra::DVector;
use talos_core::{Metrics, MultiplierCollection};

/// Time-indexed state and input trajectories of one rollout.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PrimalSolution {
    pub time_trajectory: Vec<f64>,
    /// Index of the first node after each event.
    pub post_event_indices: Vec<usize>,
    pub state_trajectory: Vec<DVector<f64>>,
    pub input_trajectory: Vec<DVector<f64>>,
}

impl PrimalSolution {
    pub fn swap(&mut self, other: &mut Self) {
        std::mem::swap(self, other);
    }

    pub fn clear(&mut self) {
        self.time_trajectory.clear();
        self.post_event_indices.clear();
        self.state_trajectory.clear();
        self.input_trajectory.clear();
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.time_trajectory.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time_trajectory.is_empty()
    }
}

/// Multiplier estimates along the trajectory.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DualSolution {
    pub time_trajectory: Vec<f64>,
    pub post_event_indices: Vec<usize>,
    pub final_multipliers: MultiplierCollection,
    /// One entry per event.
    pub pre_jumps: Vec<MultiplierCollection>,
    /// One entry per node of `time_trajectory`.
    pub intermediates: Vec<MultiplierCollection>,
}

impl DualSolution {
    pub fn swap(&mut self, other: &mut Self) {
        std::mem::swap(self, other);
    }

    pub fn clear(&mut self) {
        self.time_trajectory.clear();
        self.post_event_indices.clear();
        self.final_multipliers.clear();
        self.pre_jumps.clear();
        self.intermediates.clear();
    }
}

/// Metrics of every node of a rollout.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProblemMetrics {
    pub final_metrics: Metrics,
    pub pre_jumps: Vec<Metrics>,
    pub intermediates: Vec<Metrics>,
}

impl ProblemMetrics {
    pub fn swap(&mut self, other: &mut Self) {
        std::mem::swap(self, other);
    }

    pub fn clear(&mut self) {
        self.final_metrics.clear();
        self.pre_jumps.clear();
        self.intermediates.clear();
    }

    /// Sum of the node costs (intermediate nodes are not time-weighted).
    pub fn total_cost(&self) -> f64 {
        self.final_metrics.cost
            + self
                .pre_jumps
                .iter()
                .chain(&self.intermediates)
                .map(|m| m.cost)
                .sum::<f64>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn primal_swap_exchanges_buffers() {
        let mut a = PrimalSolution {
            time_trajectory: vec![0.0, 0.1],
            state_trajectory: vec![DVector::zeros(2); 2],
            ..Default::default()
        };
        let mut b = PrimalSolution::default();
        let ptr = a.time_trajectory.as_ptr();

        a.swap(&mut b);
        assert!(a.is_empty());
        assert_eq!(b.len(), 2);
        assert_eq!(b.time_trajectory.as_ptr(), ptr);
    }

    #[test]
    fn dual_clear_empties_everything() {
        let mut d = DualSolution {
            time_trajectory: vec![0.0],
            intermediates: vec![MultiplierCollection::default()],
            ..Default::default()
        };
        d.clear();
        assert_eq!(d, DualSolution::default());
    }

    #[test]
    fn total_cost_sums_all_nodes() {
        let node = |cost| Metrics {
            cost,
            ..Default::default()
        };
        let m = ProblemMetrics {
            final_metrics: node(1.0),
            pre_jumps: vec![node(0.5)],
            intermediates: vec![node(2.0), node(3.0)],
        };
        assert_relative_eq!(m.total_cost(), 6.5);
    }
}
