use std::fs;
use std::io::Write;
use std::path::Path;

use image::{GrayImage, Luma};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::{Calibration, MatrixData, PoseSample};

const START_NS: i64 = 1_700_000_000_000_000_000;
const NS_PER_MS: i64 = 1_000_000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyntheticConfig {
    pub num_images: usize,
    pub num_poses: usize,
    pub image_period_ms: i64,
    pub pose_period_ms: i64,
    /// Delay of the first image after the first pose.
    pub image_offset_ms: i64,
    pub width: u32,
    pub height: u32,
    pub seed: u64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            num_images: 20,
            num_poses: 200,
            image_period_ms: 100,
            pose_period_ms: 10,
            image_offset_ms: 3,
            width: 64,
            height: 48,
            seed: 0,
        }
    }
}

/// Camera circling the origin at 1 m height while yawing to follow the path.
pub fn circle_pose(time_ns: i64, period_ns: i64) -> PoseSample {
    let angle = std::f64::consts::TAU * ((time_ns - START_NS) as f64 / period_ns as f64);
    let half = angle / 2.0;
    PoseSample::new(
        time_ns,
        [angle.cos(), angle.sin(), 1.0],
        [0.0, 0.0, half.sin(), half.cos()],
    )
}

pub fn synthetic_calibration(width: u32, height: u32) -> Calibration {
    let f = width as f64;
    Calibration {
        image_width: width,
        image_height: height,
        camera_matrix: MatrixData {
            data: vec![f, 0.0, width as f64 / 2.0, 0.0, f, height as f64 / 2.0, 0.0, 0.0, 1.0],
        },
        distortion_coefficients: MatrixData {
            data: vec![0.0; 5],
        },
    }
}

pub fn write_poses_csv(path: &Path, poses: &[PoseSample]) -> Result<()> {
    let mut file = fs::File::create(path)?;
    writeln!(file, "timestamp,pos_x,pos_y,pos_z,quat_x,quat_y,quat_z,quat_w")?;
    for p in poses {
        let [x, y, z] = p.position;
        let [qx, qy, qz, qw] = p.quaternion;
        writeln!(file, "{},{},{},{},{},{},{},{}", p.time_ns, x, y, z, qx, qy, qz, qw)?;
    }
    Ok(())
}

/// Writes `calibration.yaml`, `poses.csv` and `images/<timestamp>.png` under `output_dir`.
///
/// Returns the image timestamps that were written.
pub fn generate_dataset(output_dir: &Path, config: &SyntheticConfig) -> Result<Vec<i64>> {
    let image_dir = output_dir.join("images");
    fs::create_dir_all(&image_dir)?;

    let calibration = synthetic_calibration(config.width, config.height);
    fs::write(
        output_dir.join("calibration.yaml"),
        serde_yaml::to_string(&calibration)?,
    )?;

    let period_ns = (config.num_poses.max(1) as i64) * config.pose_period_ms * NS_PER_MS;
    let poses: Vec<PoseSample> = (0..config.num_poses as i64)
        .map(|i| circle_pose(START_NS + i * config.pose_period_ms * NS_PER_MS, period_ns))
        .collect();
    write_poses_csv(&output_dir.join("poses.csv"), &poses)?;

    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let image_times: Vec<i64> = (0..config.num_images as i64)
        .map(|i| START_NS + (config.image_offset_ms + i * config.image_period_ms) * NS_PER_MS)
        .collect();
    for t in &image_times {
        let img = GrayImage::from_fn(config.width, config.height, |_, _| {
            Luma([rng.random_range(0..=255u8)])
        });
        img.save(image_dir.join(format!("{}.png", t)))?;
    }
    log::info!(
        "generated {} images and {} poses in {}",
        image_times.len(),
        poses.len(),
        output_dir.display()
    );
    Ok(image_times)
}
