//! Optimal-control problem definition and node-wise LQ approximation.
//!
//! An [`OptimalControlProblem`] groups the dynamics and every cost,
//! constraint and augmented-Lagrangian term of a hybrid trajectory
//! optimisation problem. The assembler in [`approximation`] turns it into a
//! [`ModelData`](talos_core::ModelData) per node:
//!
//! ```text
//!  OptimalControlProblem ──► approximate_{intermediate,pre_jump,final}_lq ──► ModelData
//!          │
//!          └──────────────► compute_*_metrics ──────────────────────────────► Metrics
//! ```
//!
//! Terms plug in through the traits in [`dynamics`], [`cost`],
//! [`constraint`] and [`lagrangian`]; shared intermediate results go through
//! a [`PreComputation`].

pub mod approximation;
pub mod collection;
pub mod constraint;
pub mod cost;
pub mod dynamics;
pub mod error;
pub mod lagrangian;
pub mod oc_data;
pub mod precomputation;
pub mod problem;

pub use approximation::{LqApproximator, LqSettings};
pub use collection::TermCollection;
pub use constraint::{LinearStateConstraint, LinearStateInputConstraint, StateConstraint, StateInputConstraint};
pub use cost::{QuadraticStateCost, QuadraticStateInputCost, StateCost, StateInputCost};
pub use dynamics::{LinearSystemDynamics, SystemDynamics};
pub use error::ProblemError;
pub use lagrangian::{AugmentedLagrangianTerm, PenaltyKind, StateAugmentedLagrangian, StateInputAugmentedLagrangian};
pub use oc_data::{DualSolution, PrimalSolution, ProblemMetrics};
pub use precomputation::{NoPreComputation, PreComputation, Request};
pub use problem::OptimalControlProblem;
