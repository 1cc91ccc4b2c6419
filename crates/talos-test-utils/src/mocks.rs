//! Instrumented problem terms for testing the assembler.
//!
//! Counting terms wrap a real term and bump a shared [`CallCounter`] on every
//! evaluation, so a test can keep a handle after the term is boxed into a
//! problem. [`RecordingPreComputation`] logs every request it receives.

use std::any::Any;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use nalgebra::DVector;
use talos_core::ScalarFunctionQuadraticApproximation;
use talos_oc::{PreComputation, Request, StateCost, StateInputCost};

// ---------------------------------------------------------------------------
// CallCounter
// ---------------------------------------------------------------------------

/// Shared evaluation counter.
#[derive(Clone, Debug, Default)]
pub struct CallCounter(Arc<AtomicUsize>);

impl CallCounter {
    pub fn get(&self) -> usize {
        self.0.load(Ordering::Relaxed)
    }

    fn bump(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }
}

// ---------------------------------------------------------------------------
// Counting terms
// ---------------------------------------------------------------------------

/// State-input cost that counts its evaluations.
pub struct CountingStateInputCost<C> {
    inner: C,
    calls: CallCounter,
}

impl<C: StateInputCost> CountingStateInputCost<C> {
    /// Wrap `inner`; the returned counter observes every evaluation.
    pub fn new(inner: C) -> (Self, CallCounter) {
        let calls = CallCounter::default();
        (
            Self {
                inner,
                calls: calls.clone(),
            },
            calls,
        )
    }
}

impl<C: StateInputCost> StateInputCost for CountingStateInputCost<C> {
    fn value(&self, time: f64, state: &DVector<f64>, input: &DVector<f64>, pre: &dyn PreComputation) -> f64 {
        self.calls.bump();
        self.inner.value(time, state, input, pre)
    }

    fn quadratic_approximation(
        &self,
        time: f64,
        state: &DVector<f64>,
        input: &DVector<f64>,
        pre: &dyn PreComputation,
    ) -> ScalarFunctionQuadraticApproximation {
        self.calls.bump();
        self.inner.quadratic_approximation(time, state, input, pre)
    }
}

/// State cost that counts its evaluations.
pub struct CountingStateCost<C> {
    inner: C,
    calls: CallCounter,
}

impl<C: StateCost> CountingStateCost<C> {
    /// Wrap `inner`; the returned counter observes every evaluation.
    pub fn new(inner: C) -> (Self, CallCounter) {
        let calls = CallCounter::default();
        (
            Self {
                inner,
                calls: calls.clone(),
            },
            calls,
        )
    }
}

impl<C: StateCost> StateCost for CountingStateCost<C> {
    fn value(&self, time: f64, state: &DVector<f64>, pre: &dyn PreComputation) -> f64 {
        self.calls.bump();
        self.inner.value(time, state, pre)
    }

    fn quadratic_approximation(
        &self,
        time: f64,
        state: &DVector<f64>,
        pre: &dyn PreComputation,
    ) -> ScalarFunctionQuadraticApproximation {
        self.calls.bump();
        self.inner.quadratic_approximation(time, state, pre)
    }
}

// ---------------------------------------------------------------------------
// RecordingPreComputation
// ---------------------------------------------------------------------------

/// Which request method was called.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Intermediate,
    PreJump,
    Final,
}

/// Cache that records `(kind, flags, time)` of every request.
#[derive(Clone, Debug, Default)]
pub struct RecordingPreComputation {
    pub requests: Vec<(NodeKind, Request, f64)>,
}

impl RecordingPreComputation {
    /// Time of the most recent request.
    pub fn last_time(&self) -> Option<f64> {
        self.requests.last().map(|&(_, _, t)| t)
    }
}

impl PreComputation for RecordingPreComputation {
    fn request(&mut self, request: Request, time: f64, _state: &DVector<f64>, _input: &DVector<f64>) {
        self.requests.push((NodeKind::Intermediate, request, time));
    }

    fn request_pre_jump(&mut self, request: Request, time: f64, _state: &DVector<f64>) {
        self.requests.push((NodeKind::PreJump, request, time));
    }

    fn request_final(&mut self, request: Request, time: f64, _state: &DVector<f64>) {
        self.requests.push((NodeKind::Final, request, time));
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::DMatrix;
    use talos_oc::{NoPreComputation, QuadraticStateCost};

    #[test]
    fn counter_survives_boxing() {
        let (term, calls) = CountingStateCost::new(QuadraticStateCost::new(DMatrix::identity(2, 2)));
        let boxed: Box<dyn StateCost> = Box::new(term);
        let _ = boxed.value(0.0, &DVector::zeros(2), &NoPreComputation);
        let _ = boxed.quadratic_approximation(0.0, &DVector::zeros(2), &NoPreComputation);
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn recording_cache_logs_requests() {
        let mut cache = RecordingPreComputation::default();
        cache.request_final(Request::COST, 3.0, &DVector::zeros(1));
        assert_eq!(cache.requests, vec![(NodeKind::Final, Request::COST, 3.0)]);
        assert_eq!(cache.last_time(), Some(3.0));
    }
}
