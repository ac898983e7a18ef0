// binner/mod.rs
mod edge;
mod range;

pub use edge::EdgeBinner;
pub use range::{RangeBinner, RangeSpec};

use std::sync::Arc;

use crate::{edges::BinEdges, error::BinningError, histogram::Histogram};

/// A single-channel binner that a [`crate::MultiChannelBinner`] can fan out over.
///
/// Binning is split into `check` and `accumulate` so the multi-channel wrapper can
/// validate every channel's row before mutating any of them.
pub trait ChannelBinner: Sized {
    /// The per-channel bin specification this binner is built from.
    type Spec: Clone + std::fmt::Debug;

    /// Per-call arguments, passed identically to every channel.
    type Args<'a>: Copy;

    /// Derive the edges for a specification, failing on degenerate bins.
    fn build_edges(spec: &Self::Spec) -> Result<BinEdges, BinningError>;

    /// Create a binner with a zeroed accumulator over already-validated edges.
    fn with_edges(edges: Arc<BinEdges>) -> Self;

    fn from_spec(spec: &Self::Spec) -> Result<Self, BinningError> {
        Ok(Self::with_edges(Arc::new(Self::build_edges(spec)?)))
    }

    /// Validate a call without touching the accumulator.
    fn check(&self, _samples: &[f64], _args: Self::Args<'_>) -> Result<(), BinningError> {
        Ok(())
    }

    /// Add `samples` into the accumulator. Only called after `check` succeeded.
    fn accumulate(&mut self, samples: &[f64], args: Self::Args<'_>);

    fn histogram(&self) -> &Histogram;

    /// Sum another binner's accumulator into this one.
    fn merge(&mut self, other: &Self) -> Result<(), BinningError>;

    fn edges(&self) -> &BinEdges {
        self.histogram().edges()
    }

    fn centers(&self) -> &[f64] {
        self.histogram().centers()
    }

    fn counts(&self) -> &[f64] {
        self.histogram().counts()
    }
}
