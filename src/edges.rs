// edges.rs

//! # Bin Edges
//!
//! A histogram with K bins is described by K+1 strictly increasing edges. Bin `i` spans
//! `edges[i]..edges[i+1]`; which side of that interval is closed depends on the
//! [`Inclusivity`] chosen at bin time.
//!
//! Edges either come from the caller directly (possibly non-uniform widths), or are
//! derived from a `(min, max, bins)` triple the way linspace does it:
//!
//!   edge[i] = min + i * (max - min) / bins,   for i < bins
//!   edge[bins] = max
//!
//! The lower/upper/center arrays are derived once, at construction, and never change.
//!
//! ## Digitize
//!
//! Mapping a sample to a bin follows the standard digitize convention. The digitized
//! value `d` lies in `0..=K+1`:
//!
//!   Right:  edges[d-1] <  x <= edges[d]
//!   Left:   edges[d-1] <= x <  edges[d]
//!
//! `d == 0` (below the first edge) and `d == K+1` (above the last edge) do not
//! correspond to any declared bin, and those samples are dropped by the binners.
//! In-range values map to bin `d - 1`.
use serde::{Deserialize, Serialize};

use crate::error::BinningError;

/// Which side of each bin interval is closed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Inclusivity {
    /// `(lower, upper]`: a sample equal to an edge counts toward the bin below it.
    #[default]
    Right,
    /// `[lower, upper)`: a sample equal to an edge counts toward the bin above it.
    Left,
}

/// The immutable bin specification: edges plus everything derived from them.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BinEdges {
    edges: Vec<f64>,
    lower: Vec<f64>,
    upper: Vec<f64>,
    centers: Vec<f64>,
}

/// Calculate K+1 uniformly spaced edges between `min` and `max`.
///
/// The first and last edges are exactly `min` and `max`. A span too wide for `f64`
/// (e.g. `-1e308..1e308`) is stepped through without overflowing.
pub fn linspace_edges(min: f64, max: f64, bins: usize) -> Vec<f64> {
    let bins_f = bins as f64;
    let span = max - min;
    let step = if span.is_finite() {
        span / bins_f
    } else {
        max / bins_f - min / bins_f
    };
    let mut edges = Vec::with_capacity(bins + 1);
    edges.push(min);
    edges.extend((1..bins).map(|i| min + i as f64 * step));
    edges.push(max);
    edges
}

impl BinEdges {
    /// Build from explicit edges, which must be strictly increasing.
    pub fn new(edges: Vec<f64>) -> Result<Self, BinningError> {
        if edges.len() < 2 {
            return Err(BinningError::InvalidSpecification(format!(
                "at least 2 edges are required, got {}",
                edges.len()
            )));
        }

        let lower = edges[..edges.len() - 1].to_vec();
        let upper = edges[1..].to_vec();

        // NaN widths fail this comparison too.
        if let Some(i) = lower
            .iter()
            .zip(&upper)
            .position(|(lo, hi)| !(hi - lo > 0.0))
        {
            return Err(BinningError::InvalidSpecification(format!(
                "bin {} has non-positive width: [{}, {}]",
                i, lower[i], upper[i]
            )));
        }

        let centers = lower
            .iter()
            .zip(&upper)
            .map(|(lo, hi)| (lo + hi) / 2.0)
            .collect();

        Ok(Self {
            edges,
            lower,
            upper,
            centers,
        })
    }

    /// Build `bins` uniform-width bins spanning `min..max`.
    pub fn uniform(min: f64, max: f64, bins: usize) -> Result<Self, BinningError> {
        if bins == 0 {
            return Err(BinningError::InvalidSpecification(
                "bin count must be positive".to_string(),
            ));
        }
        if !(max > min) {
            return Err(BinningError::InvalidSpecification(format!(
                "range minimum ({}) must be less than maximum ({})",
                min, max
            )));
        }
        Self::new(linspace_edges(min, max, bins))
    }

    /// Number of bins, K.
    pub fn len(&self) -> usize {
        self.centers.len()
    }

    /// Always false: construction rejects specifications without bins.
    pub fn is_empty(&self) -> bool {
        self.centers.is_empty()
    }

    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    pub fn lower(&self) -> &[f64] {
        &self.lower
    }

    pub fn upper(&self) -> &[f64] {
        &self.upper
    }

    pub fn centers(&self) -> &[f64] {
        &self.centers
    }

    pub fn min(&self) -> f64 {
        self.edges[0]
    }

    pub fn max(&self) -> f64 {
        self.edges[self.edges.len() - 1]
    }

    pub fn widths(&self) -> impl Iterator<Item = f64> + '_ {
        self.lower.iter().zip(&self.upper).map(|(lo, hi)| hi - lo)
    }

    /// The digitized value of `x`, in `0..=K+1`.
    pub fn digitize(&self, x: f64, inclusivity: Inclusivity) -> usize {
        match inclusivity {
            Inclusivity::Right => self.edges.partition_point(|&e| e < x),
            Inclusivity::Left => self.edges.partition_point(|&e| e <= x),
        }
    }

    /// The declared bin containing `x`, or `None` when `x` falls outside every bin.
    pub fn bin_index(&self, x: f64, inclusivity: Inclusivity) -> Option<usize> {
        match self.digitize(x, inclusivity) {
            0 => None,
            d if d > self.len() => None,
            d => Some(d - 1),
        }
    }
}
