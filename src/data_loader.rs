use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use glob::glob;

use crate::error::{Result, SyncError};
use crate::types::{Calibration, ImageRecord, PoseSample};

const POSE_COLUMNS: [&str; 8] = [
    "timestamp",
    "pos_x",
    "pos_y",
    "pos_z",
    "quat_x",
    "quat_y",
    "quat_z",
    "quat_w",
];

/// Parses the timestamp from a file path.
///
/// The filename without extension must be an integer timestamp in nanoseconds.
pub fn path_to_timestamp(path: &Path) -> Option<i64> {
    path.file_stem()?.to_str()?.parse().ok()
}

fn png_filter(rp: glob::GlobResult) -> Option<PathBuf> {
    match rp {
        Ok(p) if p.extension().is_some_and(|ext| ext == "png") => Some(p),
        Ok(_) => None,
        Err(e) => {
            log::warn!("skipping unreadable entry: {}", e);
            None
        }
    }
}

/// Lists `<timestamp>.png` images in `folder`, sorted by timestamp.
///
/// PNG files whose stem is not an integer are skipped with a warning.
pub fn load_image_records(folder: &Path) -> Result<Vec<ImageRecord>> {
    if !folder.is_dir() {
        return Err(SyncError::missing_input("image folder", folder));
    }
    let pattern = format!("{}/*.png", glob::Pattern::escape(&folder.to_string_lossy()));
    let img_paths = glob(&pattern).map_err(|e| SyncError::Glob(e.to_string()))?;

    let mut records: Vec<ImageRecord> = img_paths
        .filter_map(png_filter)
        .filter_map(|path| match path_to_timestamp(&path) {
            Some(time_ns) => Some(ImageRecord::new(time_ns, path)),
            None => {
                log::warn!("ignoring {}: file name is not a timestamp", path.display());
                None
            }
        })
        .collect();
    records.sort_by_key(|r| r.time_ns);
    log::trace!("found {} images in {}", records.len(), folder.display());
    Ok(records)
}

fn parse_field<T: std::str::FromStr>(
    values: &[&str],
    column: usize,
    name: &str,
    line: usize,
) -> Result<T> {
    let raw = values
        .get(column)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| SyncError::malformed_sample(line, format!("missing {}", name)))?;
    raw.parse()
        .map_err(|_| SyncError::malformed_sample(line, format!("cannot parse {} from '{}'", name, raw)))
}

/// Loads the pose table.
///
/// Columns are found by header name, so their order does not matter and extra
/// columns are ignored. Rows are kept in file order, which must already be
/// ascending by timestamp.
pub fn load_poses_csv(path: &Path) -> Result<Vec<PoseSample>> {
    if !path.is_file() {
        return Err(SyncError::missing_input("pose csv file", path));
    }
    let reader = BufReader::new(File::open(path)?);
    let mut lines = reader.lines();

    let header = match lines.next() {
        Some(h) => h?,
        None => return Ok(Vec::new()),
    };
    let header_idx: HashMap<&str, usize> = header
        .split(',')
        .enumerate()
        .map(|(i, name)| (name.trim(), i))
        .collect();
    let mut columns = [0usize; 8];
    for (col, name) in columns.iter_mut().zip(POSE_COLUMNS) {
        *col = *header_idx
            .get(name)
            .ok_or_else(|| SyncError::malformed_sample(1, format!("header has no '{}' column", name)))?;
    }

    let mut poses = Vec::new();
    for (i, line) in lines.enumerate() {
        let contents = line?;
        if contents.trim().is_empty() {
            continue;
        }
        let line_no = i + 2;
        let values: Vec<&str> = contents.split(',').collect();

        let time_ns: i64 = parse_field(&values, columns[0], POSE_COLUMNS[0], line_no)?;
        let mut numbers = [0.0f64; 7];
        for (k, v) in numbers.iter_mut().enumerate() {
            *v = parse_field(&values, columns[k + 1], POSE_COLUMNS[k + 1], line_no)?;
        }
        let pose = PoseSample::new(
            time_ns,
            [numbers[0], numbers[1], numbers[2]],
            [numbers[3], numbers[4], numbers[5], numbers[6]],
        );
        if !pose.is_finite() {
            return Err(SyncError::malformed_sample(line_no, "non-finite pose value"));
        }
        poses.push(pose);
    }
    log::trace!("loaded {} poses from {}", poses.len(), path.display());
    Ok(poses)
}

/// Loads a ROS style pinhole calibration YAML.
pub fn load_calibration(path: &Path) -> Result<Calibration> {
    if !path.is_file() {
        return Err(SyncError::missing_input("calibration file", path));
    }
    let contents = std::fs::read_to_string(path)?;
    let calibration: Calibration = serde_yaml::from_str(&contents)?;
    Ok(calibration)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_from_stem() {
        assert_eq!(
            path_to_timestamp(Path::new("images/1700000000123456789.png")),
            Some(1_700_000_000_123_456_789)
        );
        assert_eq!(path_to_timestamp(Path::new("images/cover.png")), None);
    }
}
