// binner/range.rs

use std::{fmt, str::FromStr, sync::Arc};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::ChannelBinner;
use crate::{edges::BinEdges, error::BinningError, histogram::Histogram};

/// A `(min, max, bins)` triple describing `bins` uniform bins over `min..max`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RangeSpec {
    pub min: f64,
    pub max: f64,
    pub bins: usize,
}

impl RangeSpec {
    pub fn new(min: f64, max: f64, bins: usize) -> Self {
        Self { min, max, bins }
    }
}

impl fmt::Display for RangeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.min, self.max, self.bins)
    }
}

/// Parses `MIN:MAX:BINS`, e.g. `0:100:50`.
impl FromStr for RangeSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        let [min, max, bins] = parts.as_slice() else {
            return Err(format!("expected MIN:MAX:BINS, got '{}'", s));
        };
        let min = min
            .trim()
            .parse::<f64>()
            .map_err(|e| format!("invalid minimum '{}': {}", min, e))?;
        let max = max
            .trim()
            .parse::<f64>()
            .map_err(|e| format!("invalid maximum '{}': {}", max, e))?;
        let bins = bins
            .trim()
            .parse::<usize>()
            .map_err(|e| format!("invalid bin count '{}': {}", bins, e))?;
        Ok(Self { min, max, bins })
    }
}

/// Binning over uniform-width bins, with direct index arithmetic instead of an edge
/// search.
///
/// A sample `x` is counted iff `min <= x < max`; the upper bound of the range is
/// exclusive, so a sample exactly at `max` is dropped. Bin membership is decided by
/// `floor((x - min) * bins / (max - min))`, which can disagree with the derived edges
/// by one ulp right at an internal edge.
#[derive(Clone, Debug, PartialEq)]
pub struct RangeBinner {
    min: f64,
    max: f64,
    /// bins / ((max - min) / 2)
    scale: f64,
    hist: Histogram,
}

impl RangeBinner {
    pub fn new(min: f64, max: f64, bins: usize) -> Result<Self, BinningError> {
        Self::from_spec(&RangeSpec::new(min, max, bins))
    }

    /// Count `samples` into the running histogram, adding `weights[i]` for sample `i`,
    /// or 1 for every sample when `weights` is `None`.
    ///
    /// Fails without touching the accumulator if `weights` does not match `samples`
    /// in length. Returns the bin centers and the cumulative counts.
    ///
    /// Weights are added as given: negative or NaN weights are not rejected, so counts
    /// stay non-negative only when every weight is.
    pub fn bin(
        &mut self,
        samples: &[f64],
        weights: Option<&[f64]>,
    ) -> Result<(&[f64], &[f64]), BinningError> {
        self.check(samples, weights)?;
        self.accumulate(samples, weights);
        Ok((self.hist.centers(), self.hist.counts()))
    }

    /// [`RangeBinner::bin`] with every sample weighted 1.
    pub fn bin_unweighted(&mut self, samples: &[f64]) -> (&[f64], &[f64]) {
        self.accumulate(samples, None);
        (self.hist.centers(), self.hist.counts())
    }

    pub fn spec(&self) -> RangeSpec {
        RangeSpec::new(self.min, self.max, self.hist.len())
    }

    pub fn len(&self) -> usize {
        self.hist.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hist.is_empty()
    }

    /// Uniform bin index of `x`, or `None` outside `min..max`.
    #[inline]
    fn index_of(&self, x: f64) -> Option<usize> {
        // NaN fails both comparisons.
        if x >= self.min && x < self.max {
            // Halved so that the span of a finite range cannot overflow.
            let i = ((0.5 * x - 0.5 * self.min) * self.scale) as usize;
            Some(i.min(self.hist.len() - 1))
        } else {
            None
        }
    }
}

impl ChannelBinner for RangeBinner {
    type Spec = RangeSpec;
    type Args<'a> = Option<&'a [f64]>;

    fn build_edges(spec: &RangeSpec) -> Result<BinEdges, BinningError> {
        let edges = BinEdges::uniform(spec.min, spec.max, spec.bins)?;
        debug!(min = spec.min, max = spec.max, bins = spec.bins, "built range binning");
        Ok(edges)
    }

    fn with_edges(edges: Arc<BinEdges>) -> Self {
        let (min, max) = (edges.min(), edges.max());
        let scale = edges.len() as f64 / (0.5 * max - 0.5 * min);
        Self {
            min,
            max,
            scale,
            hist: Histogram::new(edges),
        }
    }

    fn check(&self, samples: &[f64], weights: Option<&[f64]>) -> Result<(), BinningError> {
        match weights {
            Some(weights) if weights.len() != samples.len() => {
                Err(BinningError::WeightLengthMismatch {
                    samples: samples.len(),
                    weights: weights.len(),
                })
            }
            _ => Ok(()),
        }
    }

    fn accumulate(&mut self, samples: &[f64], weights: Option<&[f64]>) {
        match weights {
            Some(weights) => {
                for (&x, &w) in samples.iter().zip(weights) {
                    if let Some(i) = self.index_of(x) {
                        self.hist.add(i, w);
                    }
                }
            }
            None => {
                for &x in samples {
                    if let Some(i) = self.index_of(x) {
                        self.hist.add(i, 1.0);
                    }
                }
            }
        }
    }

    fn histogram(&self) -> &Histogram {
        &self.hist
    }

    fn merge(&mut self, other: &Self) -> Result<(), BinningError> {
        self.hist.merge(&other.hist)
    }
}
