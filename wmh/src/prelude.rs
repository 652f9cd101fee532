pub use super::algo::consts::{
    DEFAULT_THRESHOLD, DILATION_ITERATIONS, MAX_BASE_THRESHOLD, MEAN_OFFSET, MEAN_SCALE,
    MIN_BASE_THRESHOLD,
};
pub use super::algo::dice::{dice, OverlapCounts};
pub use super::algo::error::{Result, WmhError};
pub use super::algo::mask::{BinaryMask, IntensityVolume, Visit};
pub use super::algo::morph::{border_shell, dilate, Connectivity};
pub use super::algo::params::ReconcileParams;
pub use super::algo::pipeline::{correct_pair, CorrectedPair};
pub use super::algo::reconcile::{
    reconcile, Recalibration, Reconciler, Reconciliation, TieBreak,
};
pub use super::algo::region::{Region, RegionMask};
pub use super::algo::stats::PairStats;
pub use super::algo::threshold::threshold;
pub use super::algo::voxel::Voxel;
