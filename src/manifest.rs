use serde::{Deserialize, Serialize};

use crate::error::{Result, SyncError};
use crate::sync::match_timestamp;
use crate::transform::{build_transform, matrix_to_rows};
use crate::types::{Calibration, CameraIntrinsics, Frame, ImageRecord, Manifest, PoseSample};

pub const AABB_SCALE: u32 = 32;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SyncOptions {
    /// Largest accepted image/pose time difference.
    pub tolerance_ms: f64,
    /// First image (in timestamp order) to consider.
    pub start_idx: usize,
    /// Use every `step`-th image from `start_idx` on.
    pub step: usize,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            tolerance_ms: 10.0,
            start_idx: 0,
            step: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncSummary {
    /// Images considered after sampling.
    pub total: usize,
    pub matched: usize,
    pub missed: usize,
}

fn deg(rad: f64) -> f64 {
    rad * 180.0 / std::f64::consts::PI
}

impl CameraIntrinsics {
    pub fn from_calibration(calibration: &Calibration) -> Result<CameraIntrinsics> {
        let k = &calibration.camera_matrix.data;
        let d = &calibration.distortion_coefficients.data;
        if k.len() != 9 {
            return Err(SyncError::invalid_calibration(format!(
                "camera_matrix needs 9 entries, got {}",
                k.len()
            )));
        }
        if d.len() < 4 {
            return Err(SyncError::invalid_calibration(format!(
                "distortion_coefficients needs at least 4 entries, got {}",
                d.len()
            )));
        }
        let (fl_x, fl_y, cx, cy) = (k[0], k[4], k[2], k[5]);
        Ok(CameraIntrinsics {
            camera_angle_x: deg(2.0 * (cx / fl_x).atan()),
            camera_angle_y: deg(2.0 * (cy / fl_y).atan()),
            fl_x,
            fl_y,
            k1: d[0],
            k2: d[1],
            p1: d[2],
            p2: d[3],
            cx,
            cy,
            w: calibration.image_width,
            h: calibration.image_height,
            aabb_scale: AABB_SCALE,
        })
    }
}

/// Matches each sampled image to its closest pose and builds the frames.
///
/// `images` and `poses` must both be sorted by timestamp. Images without a pose
/// inside the tolerance are counted in [`SyncSummary::missed`] and left out.
/// `sharpness` is only called for matched images.
pub fn assemble_frames<F>(
    images: &[ImageRecord],
    poses: &[PoseSample],
    options: &SyncOptions,
    mut sharpness: F,
) -> Result<(Vec<Frame>, SyncSummary)>
where
    F: FnMut(&ImageRecord) -> Result<f64>,
{
    let pose_times: Vec<i64> = poses.iter().map(|p| p.time_ns).collect();
    let mut summary = SyncSummary::default();
    let mut frames = Vec::new();
    let mut cursor = 0;

    for image in images.iter().skip(options.start_idx).step_by(options.step.max(1)) {
        summary.total += 1;
        let m = match_timestamp(image.time_ns, &pose_times, cursor, options.tolerance_ms);
        cursor = m.index;
        if !m.found {
            log::debug!("no pose within {} ms of image {}", options.tolerance_ms, image.time_ns);
            summary.missed += 1;
            continue;
        }

        let pose = &poses[m.index];
        if !pose.is_finite() {
            return Err(SyncError::malformed_sample(
                m.index + 2,
                format!("non-finite pose at {}", pose.time_ns),
            ));
        }
        log::debug!("image {} -> pose {} ({})", image.time_ns, m.index, pose.time_ns);
        let transform = build_transform(&pose.position, &pose.quaternion);
        frames.push(Frame {
            file_path: image.relative_path(),
            sharpness: sharpness(image)?,
            transform_matrix: matrix_to_rows(&transform),
        });
        summary.matched += 1;
    }

    Ok((frames, summary))
}

/// Builds the whole manifest. Nothing is written to disk here.
pub fn build_manifest<F>(
    calibration: &Calibration,
    images: &[ImageRecord],
    poses: &[PoseSample],
    options: &SyncOptions,
    sharpness: F,
) -> Result<(Manifest, SyncSummary)>
where
    F: FnMut(&ImageRecord) -> Result<f64>,
{
    let intrinsics = CameraIntrinsics::from_calibration(calibration)?;
    let (frames, summary) = assemble_frames(images, poses, options, sharpness)?;
    Ok((Manifest { intrinsics, frames }, summary))
}
