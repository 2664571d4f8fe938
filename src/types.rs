use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One row of the pose log.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseSample {
    pub time_ns: i64,
    pub position: [f64; 3],
    /// x, y, z, w
    pub quaternion: [f64; 4],
}

impl PoseSample {
    pub fn new(time_ns: i64, position: [f64; 3], quaternion: [f64; 4]) -> PoseSample {
        PoseSample {
            time_ns,
            position,
            quaternion,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.position
            .iter()
            .chain(self.quaternion.iter())
            .all(|v| v.is_finite())
    }
}

/// An image found on disk, keyed by the timestamp in its file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRecord {
    pub time_ns: i64,
    pub path: PathBuf,
}

impl ImageRecord {
    pub fn new(time_ns: i64, path: impl Into<PathBuf>) -> ImageRecord {
        ImageRecord {
            time_ns,
            path: path.into(),
        }
    }

    /// Path written to the manifest, relative to the dataset root.
    pub fn relative_path(&self) -> String {
        format!("images/{}.png", self.time_ns)
    }
}

/// Outcome of matching one image timestamp against the pose table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeMatch {
    pub time_ns: i64,
    /// Local-minimum row in the pose table. Also the cursor for the next search.
    pub index: usize,
    pub found: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub file_path: String,
    pub sharpness: f64,
    pub transform_matrix: [[f64; 4]; 4],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraIntrinsics {
    pub camera_angle_x: f64,
    pub camera_angle_y: f64,
    pub fl_x: f64,
    pub fl_y: f64,
    pub k1: f64,
    pub k2: f64,
    pub p1: f64,
    pub p2: f64,
    pub cx: f64,
    pub cy: f64,
    pub w: u32,
    pub h: u32,
    pub aabb_scale: u32,
}

/// The `transforms.json` document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(flatten)]
    pub intrinsics: CameraIntrinsics,
    pub frames: Vec<Frame>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixData {
    pub data: Vec<f64>,
}

/// Pinhole calibration as written by ROS `camera_calibration`.
/// Unknown keys such as `camera_name` or `distortion_model` are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Calibration {
    pub image_width: u32,
    pub image_height: u32,
    pub camera_matrix: MatrixData,
    pub distortion_coefficients: MatrixData,
}
