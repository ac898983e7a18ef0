// multi.rs

use std::{collections::BTreeMap, sync::Arc};

use serde::Serialize;
use tracing::{debug, info, trace};

use crate::{
    binner::{ChannelBinner, EdgeBinner, RangeBinner},
    error::BinningError,
};

/// How bins are specified across the channels of a [`MultiChannelBinner`].
#[derive(Clone, Debug, PartialEq)]
pub enum BinSpec<S> {
    /// One specification for every channel. Edges are derived once and shared.
    Shared(S),
    /// One specification per channel, in channel order.
    PerChannel(Vec<S>),
}

/// Owned snapshot of one channel's bins and accumulated counts.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChannelInfo {
    pub bin_centers: Vec<f64>,
    pub hist: Vec<f64>,
    pub bin_edges: Vec<f64>,
}

/// Fans binning out over N independent channels, each with a private accumulator.
#[derive(Clone, Debug)]
pub struct MultiChannelBinner<B> {
    binners: Vec<B>,
    verbose: bool,
}

/// Multi-channel binning over explicit edges.
pub type MultiEdgeBinner = MultiChannelBinner<EdgeBinner>;

/// Multi-channel binning over uniform ranges.
pub type MultiRangeBinner = MultiChannelBinner<RangeBinner>;

impl<B: ChannelBinner> MultiChannelBinner<B> {
    /// Build `channels` binners from `spec`.
    ///
    /// A `PerChannel` spec must hold exactly `channels` entries, otherwise this fails
    /// with [`BinningError::ChannelCountMismatch`]. Any degenerate specification fails
    /// the whole construction.
    pub fn new(spec: BinSpec<B::Spec>, channels: usize) -> Result<Self, BinningError> {
        let binners = match spec {
            BinSpec::Shared(spec) => {
                let edges = Arc::new(B::build_edges(&spec)?);
                debug!(channels, bins = edges.len(), "shared bin specification");
                (0..channels)
                    .map(|_| B::with_edges(Arc::clone(&edges)))
                    .collect()
            }
            BinSpec::PerChannel(specs) => {
                if specs.len() != channels {
                    return Err(BinningError::ChannelCountMismatch {
                        expected: channels,
                        found: specs.len(),
                    });
                }
                debug!(channels, "per-channel bin specifications");
                specs
                    .iter()
                    .map(B::from_spec)
                    .collect::<Result<Vec<_>, _>>()?
            }
        };

        Ok(Self {
            binners,
            verbose: false,
        })
    }

    /// Log each channel at INFO level as it is binned.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    pub fn n_channels(&self) -> usize {
        self.binners.len()
    }

    /// Bin one batch: `data[c]` holds the samples for channel `c`.
    ///
    /// `args` (inclusivity or weights, depending on the binner) is passed identically
    /// to every channel. Every row is validated before any channel is touched, so a
    /// failing call leaves all accumulators unchanged.
    pub fn bin<R>(&mut self, data: &[R], args: B::Args<'_>) -> Result<(), BinningError>
    where
        R: AsRef<[f64]>,
    {
        if data.len() != self.binners.len() {
            return Err(BinningError::ChannelCountMismatch {
                expected: self.binners.len(),
                found: data.len(),
            });
        }

        for (binner, row) in self.binners.iter().zip(data) {
            binner.check(row.as_ref(), args)?;
        }

        for (channel, (binner, row)) in self.binners.iter_mut().zip(data).enumerate() {
            let row = row.as_ref();
            if self.verbose {
                info!(channel, samples = row.len(), "binning channel");
            } else {
                trace!(channel, samples = row.len(), "binning channel");
            }
            binner.accumulate(row, args);
        }
        Ok(())
    }

    /// Snapshot of every channel's centers, cumulative counts and edges.
    ///
    /// The returned map is a copy; later `bin` calls are not reflected in it. Use
    /// [`MultiChannelBinner::channel`] for a borrowed view.
    #[doc(alias = "get_info")]
    pub fn info(&self) -> BTreeMap<usize, ChannelInfo> {
        self.binners
            .iter()
            .enumerate()
            .map(|(channel, binner)| {
                let info = ChannelInfo {
                    bin_centers: binner.centers().to_vec(),
                    hist: binner.counts().to_vec(),
                    bin_edges: binner.edges().edges().to_vec(),
                };
                (channel, info)
            })
            .collect()
    }

    pub fn channel(&self, channel: usize) -> Option<&B> {
        self.binners.get(channel)
    }

    pub fn iter(&self) -> impl Iterator<Item = &B> {
        self.binners.iter()
    }

    /// Sum another multi-channel binner's accumulators into this one, channel by
    /// channel. Channel counts and every channel's edges must match; on failure
    /// nothing is merged.
    pub fn merge(&mut self, other: &Self) -> Result<(), BinningError> {
        if other.binners.len() != self.binners.len() {
            return Err(BinningError::ChannelCountMismatch {
                expected: self.binners.len(),
                found: other.binners.len(),
            });
        }
        for (ours, theirs) in self.binners.iter().zip(&other.binners) {
            ours.histogram().check_compatible(theirs.histogram())?;
        }
        for (ours, theirs) in self.binners.iter_mut().zip(&other.binners) {
            ours.merge(theirs)?;
        }
        Ok(())
    }
}
