pub mod binner;
pub mod edges;
pub mod error;
pub mod histogram;
#[cfg(feature = "cli")]
pub mod io;
pub mod multi;
pub mod stats;

pub use binner::{ChannelBinner, EdgeBinner, RangeBinner, RangeSpec};
pub use edges::{BinEdges, Inclusivity};
pub use error::BinningError;
pub use histogram::Histogram;
pub use multi::{BinSpec, ChannelInfo, MultiChannelBinner, MultiEdgeBinner, MultiRangeBinner};
pub use stats::HistogramStats;

#[cfg(all(test, feature = "cli"))]
pub(crate) mod test_utils;
