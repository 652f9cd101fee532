pub mod dice;
pub mod error;
pub mod iter;
pub mod mask;
pub mod morph;
pub mod params;
pub mod pipeline;
pub mod reconcile;
pub mod region;
pub mod stats;
pub mod threshold;
pub mod voxel;

pub use dice::dice;
pub use error::{Result, WmhError};
pub use iter::VoxelIter;
pub use mask::{BinaryMask, IntensityVolume, Visit};
pub use params::{consts, ReconcileParams};
pub use pipeline::{correct_pair, CorrectedPair};
pub use reconcile::{reconcile, Reconciler, Reconciliation};
pub use region::{Region, RegionMask};
pub use threshold::threshold;
pub use voxel::Voxel;
