// histogram.rs

use std::sync::Arc;

use crate::{edges::BinEdges, error::BinningError};

/// The running accumulator of one binner, bound to the edges it counts into.
///
/// Counts change only by binning samples or merging another histogram in; there
/// is no reset. Edges are shared read-only, so channels built from a single
/// specification point at the same `BinEdges`.
#[derive(Clone, Debug, PartialEq)]
pub struct Histogram {
    edges: Arc<BinEdges>,
    counts: Vec<f64>,
}

impl Histogram {
    pub fn new(edges: Arc<BinEdges>) -> Self {
        let counts = vec![0.0; edges.len()];
        Self { edges, counts }
    }

    pub fn edges(&self) -> &BinEdges {
        &self.edges
    }

    #[cfg(test)]
    pub(crate) fn shared_edges(&self) -> &Arc<BinEdges> {
        &self.edges
    }

    pub fn centers(&self) -> &[f64] {
        self.edges.centers()
    }

    /// Cumulative per-bin counts.
    pub fn counts(&self) -> &[f64] {
        &self.counts
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum over all bins.
    pub fn total(&self) -> f64 {
        self.counts.iter().sum()
    }

    /// Add `weight` to bin `index`. Callers guarantee `index < len()`.
    #[inline]
    pub(crate) fn add(&mut self, index: usize, weight: f64) {
        self.counts[index] += weight;
    }

    /// Add another histogram's counts into this one. Both must have identical edges.
    pub fn merge(&mut self, other: &Histogram) -> Result<(), BinningError> {
        self.check_compatible(other)?;
        for (count, other) in self.counts.iter_mut().zip(&other.counts) {
            *count += other;
        }
        Ok(())
    }

    pub(crate) fn check_compatible(&self, other: &Histogram) -> Result<(), BinningError> {
        if Arc::ptr_eq(&self.edges, &other.edges) || self.edges.edges() == other.edges.edges() {
            Ok(())
        } else {
            Err(BinningError::IncompatibleBins)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_test_histogram() -> Histogram {
        let edges = BinEdges::new(vec![0.0, 1.0, 2.0, 4.0]).unwrap();
        Histogram::new(Arc::new(edges))
    }

    #[test]
    fn test_starts_at_zero() {
        let hist = make_test_histogram();
        assert_eq!(hist.len(), 3);
        assert_eq!(hist.counts(), &[0.0, 0.0, 0.0]);
        assert_eq!(hist.total(), 0.0);
        assert_eq!(hist.centers(), &[0.5, 1.5, 3.0]);
    }

    #[test]
    fn test_merge() {
        let mut a = make_test_histogram();
        let mut b = make_test_histogram();
        a.add(0, 1.0);
        a.add(2, 2.0);
        b.add(2, 3.0);
        b.add(1, 0.5);

        a.merge(&b).unwrap();
        assert_eq!(a.counts(), &[1.0, 0.5, 5.0]);
        // the source is untouched
        assert_eq!(b.counts(), &[0.0, 0.5, 3.0]);
    }

    #[test]
    fn test_merge_incompatible() {
        let mut a = make_test_histogram();
        a.add(0, 1.0);
        let other = Histogram::new(Arc::new(BinEdges::uniform(0.0, 4.0, 3).unwrap()));
        assert!(matches!(
            a.merge(&other),
            Err(BinningError::IncompatibleBins)
        ));
        assert_eq!(a.counts(), &[1.0, 0.0, 0.0]);
    }
}
