//! Lagrange multiplier estimates carried by augmented-Lagrangian terms.

use nalgebra::DVector;

/// Multiplier estimate of a single augmented-Lagrangian term.
#[derive(Clone, Debug, PartialEq)]
pub struct Multiplier {
    /// Penalty parameter ρ.
    pub penalty: f64,
    /// Multiplier vector λ (one entry per constraint row).
    pub lagrangian: DVector<f64>,
}

impl Default for Multiplier {
    fn default() -> Self {
        Self {
            penalty: 0.0,
            lagrangian: DVector::zeros(0),
        }
    }
}

impl Multiplier {
    pub const fn new(penalty: f64, lagrangian: DVector<f64>) -> Self {
        Self {
            penalty,
            lagrangian,
        }
    }

    /// Zero multiplier of dimension `dim` with penalty `penalty`.
    pub fn zero(penalty: f64, dim: usize) -> Self {
        Self::new(penalty, DVector::zeros(dim))
    }

    /// Number of constraint rows.
    pub fn dim(&self) -> usize {
        self.lagrangian.len()
    }
}

/// Multipliers of every Lagrangian term at one node, one entry per term in
/// the insertion order of the owning collection.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MultiplierCollection {
    pub state_eq: Vec<Multiplier>,
    pub state_ineq: Vec<Multiplier>,
    pub state_input_eq: Vec<Multiplier>,
    pub state_input_ineq: Vec<Multiplier>,
}

impl MultiplierCollection {
    pub fn clear(&mut self) {
        self.state_eq.clear();
        self.state_ineq.clear();
        self.state_input_eq.clear();
        self.state_input_ineq.clear();
    }

    /// Exchange contents with `other` without copying.
    pub fn swap(&mut self, other: &mut Self) {
        std::mem::swap(self, other);
    }

    /// True when no term carries a multiplier.
    pub fn is_empty(&self) -> bool {
        self.state_eq.is_empty()
            && self.state_ineq.is_empty()
            && self.state_input_eq.is_empty()
            && self.state_input_ineq.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_multiplier_has_requested_dim() {
        let m = Multiplier::zero(10.0, 3);
        assert_eq!(m.dim(), 3);
        assert_eq!(m.penalty, 10.0);
        assert!(m.lagrangian.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn collection_swap_and_clear() {
        let mut a = MultiplierCollection {
            state_eq: vec![Multiplier::zero(1.0, 2)],
            ..Default::default()
        };
        let mut b = MultiplierCollection::default();
        assert!(b.is_empty());

        a.swap(&mut b);
        assert!(a.is_empty());
        assert_eq!(b.state_eq.len(), 1);

        b.clear();
        assert!(b.is_empty());
    }
}
