// binner/edge.rs

use std::borrow::Borrow;
use std::sync::Arc;

use tracing::debug;

use super::ChannelBinner;
use crate::{
    edges::{BinEdges, Inclusivity},
    error::BinningError,
    histogram::Histogram,
};

/// Binning over explicit, possibly non-uniform, bin edges.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeBinner {
    hist: Histogram,
}

impl EdgeBinner {
    /// Create a binner over `edges`, which must be strictly increasing with at least
    /// two values.
    pub fn new(edges: Vec<f64>) -> Result<Self, BinningError> {
        Self::from_spec(&edges)
    }

    /// Count every sample into the bin it digitizes to. Samples outside the edges
    /// (and NaN) are dropped.
    ///
    /// Nested input can be flattened by the caller, e.g. `rows.iter().flatten()`.
    /// Returns the bin centers and the cumulative counts over all calls so far.
    pub fn bin<I>(&mut self, samples: I, inclusivity: Inclusivity) -> (&[f64], &[f64])
    where
        I: IntoIterator,
        I::Item: Borrow<f64>,
    {
        for x in samples {
            if let Some(i) = self.hist.edges().bin_index(*x.borrow(), inclusivity) {
                self.hist.add(i, 1.0);
            }
        }
        (self.hist.centers(), self.hist.counts())
    }

    /// [`EdgeBinner::bin`] with right-inclusive bins.
    pub fn bin_default<I>(&mut self, samples: I) -> (&[f64], &[f64])
    where
        I: IntoIterator,
        I::Item: Borrow<f64>,
    {
        self.bin(samples, Inclusivity::default())
    }

    pub fn len(&self) -> usize {
        self.hist.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hist.is_empty()
    }
}

impl ChannelBinner for EdgeBinner {
    type Spec = Vec<f64>;
    type Args<'a> = Inclusivity;

    fn build_edges(spec: &Vec<f64>) -> Result<BinEdges, BinningError> {
        let edges = BinEdges::new(spec.clone())?;
        debug!(bins = edges.len(), "built edge binning");
        Ok(edges)
    }

    fn with_edges(edges: Arc<BinEdges>) -> Self {
        Self {
            hist: Histogram::new(edges),
        }
    }

    fn accumulate(&mut self, samples: &[f64], inclusivity: Inclusivity) {
        self.bin(samples, inclusivity);
    }

    fn histogram(&self) -> &Histogram {
        &self.hist
    }

    fn merge(&mut self, other: &Self) -> Result<(), BinningError> {
        self.hist.merge(&other.hist)
    }
}
