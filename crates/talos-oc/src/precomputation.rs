//! Shared per-node cache for intermediate results used by several terms.
//!
//! Before the terms of a node are evaluated, the assembler issues a
//! [`Request`] naming what will be evaluated. An implementation can compute
//! expensive shared quantities (kinematics, contact Jacobians, …) once and
//! terms read them back through [`PreComputation::as_any`].

use std::any::Any;

use nalgebra::DVector;

bitflags::bitflags! {
    /// Capabilities requested from a [`PreComputation`] before evaluating a node.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Request: u32 {
        /// Cost terms will be evaluated.
        const COST = 1 << 0;
        /// Soft-constraint (penalty cost) terms will be evaluated.
        const SOFT_CONSTRAINT = 1 << 1;
        /// Hard constraints will be evaluated.
        const CONSTRAINT = 1 << 2;
        /// Flow or jump map will be evaluated.
        const DYNAMICS = 1 << 3;
        /// Derivatives are needed, not only values.
        const APPROXIMATION = 1 << 4;
    }
}

impl Request {
    /// Everything evaluated at an intermediate or pre-jump node.
    pub const NODE_APPROXIMATION: Self = Self::COST
        .union(Self::SOFT_CONSTRAINT)
        .union(Self::CONSTRAINT)
        .union(Self::DYNAMICS)
        .union(Self::APPROXIMATION);

    /// Everything evaluated at the final node (no dynamics).
    pub const FINAL_APPROXIMATION: Self = Self::NODE_APPROXIMATION.difference(Self::DYNAMICS);
}

/// Per-node cache shared by all terms of a problem.
///
/// Every request method defaults to a no-op.
pub trait PreComputation: Send + Sync + 'static {
    /// Prepare an intermediate node.
    fn request(&mut self, _request: Request, _time: f64, _state: &DVector<f64>, _input: &DVector<f64>) {}

    /// Prepare the node just before a jump.
    fn request_pre_jump(&mut self, _request: Request, _time: f64, _state: &DVector<f64>) {}

    /// Prepare the final node.
    fn request_final(&mut self, _request: Request, _time: f64, _state: &DVector<f64>) {}

    /// Downcast hook for terms that need a concrete cache type.
    fn as_any(&self) -> &dyn Any;
}

/// Cache that computes nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPreComputation;

impl PreComputation for NoPreComputation {
    fn as_any(&self) -> &dyn Any {
        self
    }
}
