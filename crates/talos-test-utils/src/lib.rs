//! Shared test fixtures and utilities for talos crates.
//!
//! Provides deterministic RNG setup, random symmetric matrices with a
//! prescribed spectrum, instrumented problem terms and a small ready-made
//! problem.

pub mod fixtures;
pub mod mocks;
pub mod rng;

// ---------------------------------------------------------------------------
// Re-exports for convenience
// ---------------------------------------------------------------------------

pub use fixtures::{double_integrator, double_integrator_problem};
pub use mocks::{CallCounter, CountingStateCost, CountingStateInputCost, NodeKind, RecordingPreComputation};
pub use rng::{random_orthogonal, random_symmetric_with_spectrum, seeded_rng};
