//! Associates timestamped camera images with a 6-DoF pose log and builds a
//! `transforms.json` manifest (intrinsics, per-frame extrinsics and sharpness).

pub mod data_loader;
pub mod error;
pub mod io;
pub mod manifest;
pub mod sharpness;
pub mod sync;
pub mod synthetic;
pub mod transform;
pub mod types;

pub use error::{Result, SyncError};
pub use manifest::{SyncOptions, SyncSummary, build_manifest};
