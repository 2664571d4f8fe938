use image_pose_sync::data_loader::{load_calibration, load_image_records, load_poses_csv};
use image_pose_sync::io::{object_from_json, write_manifest};
use image_pose_sync::sharpness::calc_sharpness;
use image_pose_sync::synthetic::{SyntheticConfig, generate_dataset, synthetic_calibration};
use image_pose_sync::types::{ImageRecord, Manifest, PoseSample};
use image_pose_sync::{SyncOptions, build_manifest};
use tempfile::TempDir;

const IDENTITY: [f64; 4] = [0.0, 0.0, 0.0, 1.0];

fn images(times: &[i64]) -> Vec<ImageRecord> {
    times
        .iter()
        .map(|t| ImageRecord::new(*t, format!("/data/images/{}.png", t)))
        .collect()
}

#[test]
fn test_three_images_three_poses() {
    let poses: Vec<_> = [0, 200, 400]
        .iter()
        .map(|t| PoseSample::new(*t, [0.0; 3], IDENTITY))
        .collect();
    let (manifest, summary) = build_manifest(
        &synthetic_calibration(64, 48),
        &images(&[100, 250, 400]),
        &poses,
        &SyncOptions::default(),
        |_| Ok(12.5),
    )
    .unwrap();

    assert_eq!(summary.total, 3);
    assert_eq!(summary.matched, 3);
    assert_eq!(summary.missed, 0);
    let paths: Vec<_> = manifest.frames.iter().map(|f| f.file_path.as_str()).collect();
    assert_eq!(paths, vec!["images/100.png", "images/250.png", "images/400.png"]);
    for f in &manifest.frames {
        assert_eq!(f.sharpness, 12.5);
        assert_eq!(f.transform_matrix[2], [1.0, 0.0, 0.0, 0.0]);
        assert_eq!(f.transform_matrix[3], [0.0, 0.0, 0.0, 1.0]);
    }
}

#[test]
fn test_matched_pose_is_the_nearest_row() {
    let poses = vec![
        PoseSample::new(0, [1.0, 0.0, 0.0], IDENTITY),
        PoseSample::new(200, [2.0, 0.0, 0.0], IDENTITY),
        PoseSample::new(400, [3.0, 0.0, 0.0], IDENTITY),
    ];
    let (manifest, _) = build_manifest(
        &synthetic_calibration(64, 48),
        &images(&[250, 400]),
        &poses,
        &SyncOptions::default(),
        |_| Ok(0.0),
    )
    .unwrap();
    // x maps onto the third output axis
    assert_eq!(manifest.frames[0].transform_matrix[2][3], 2.0);
    assert_eq!(manifest.frames[1].transform_matrix[2][3], 3.0);
}

#[test]
fn test_unmatched_image_is_left_out() {
    let poses: Vec<_> = [4_900_000_000, 4_950_000_000, 5_050_000_000, 5_100_000_000]
        .iter()
        .map(|t| PoseSample::new(*t, [0.0; 3], IDENTITY))
        .collect();
    let mut scored = Vec::new();
    let (manifest, summary) = build_manifest(
        &synthetic_calibration(64, 48),
        &images(&[4_900_000_000, 5_000_000_000, 5_100_000_000]),
        &poses,
        &SyncOptions::default(),
        |image| {
            scored.push(image.time_ns);
            Ok(1.0)
        },
    )
    .unwrap();

    assert_eq!(summary.missed, 1);
    assert_eq!(summary.matched, 2);
    assert_eq!(scored, vec![4_900_000_000, 5_100_000_000]);
    let paths: Vec<_> = manifest.frames.iter().map(|f| f.file_path.as_str()).collect();
    assert_eq!(paths, vec!["images/4900000000.png", "images/5100000000.png"]);
}

#[test]
fn test_generated_dataset_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    let config = SyntheticConfig {
        num_images: 8,
        num_poses: 100,
        ..Default::default()
    };
    let image_times = generate_dataset(root, &config).unwrap();

    let calibration = load_calibration(&root.join("calibration.yaml")).unwrap();
    let images = load_image_records(&root.join("images")).unwrap();
    let poses = load_poses_csv(&root.join("poses.csv")).unwrap();
    assert_eq!(images.len(), 8);
    assert_eq!(poses.len(), 100);

    let (manifest, summary) = build_manifest(
        &calibration,
        &images,
        &poses,
        &SyncOptions::default(),
        |image| calc_sharpness(&image.path),
    )
    .unwrap();
    assert_eq!(summary.missed, 0);
    assert_eq!(manifest.frames.len(), image_times.len());
    assert!(manifest.frames.iter().all(|f| f.sharpness > 0.0));

    let output = root.join("transforms.json");
    write_manifest(&output, &manifest).unwrap();
    let back: Manifest = object_from_json(&output).unwrap();
    assert_eq!(back.frames.len(), manifest.frames.len());
    assert_eq!(back.intrinsics.aabb_scale, 32);

    let raw: serde_json::Value = object_from_json(&output).unwrap();
    for key in [
        "camera_angle_x",
        "camera_angle_y",
        "fl_x",
        "fl_y",
        "k1",
        "k2",
        "p1",
        "p2",
        "cx",
        "cy",
        "w",
        "h",
        "aabb_scale",
        "frames",
    ] {
        assert!(raw.get(key).is_some(), "missing {}", key);
    }
    let first = &raw["frames"][0];
    assert_eq!(first["file_path"], format!("images/{}.png", image_times[0]));
    assert_eq!(first["transform_matrix"].as_array().unwrap().len(), 4);
}

#[test]
fn test_sampling_with_step() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    generate_dataset(root, &SyntheticConfig::default()).unwrap();

    let calibration = load_calibration(&root.join("calibration.yaml")).unwrap();
    let images = load_image_records(&root.join("images")).unwrap();
    let poses = load_poses_csv(&root.join("poses.csv")).unwrap();
    let options = SyncOptions {
        step: 3,
        ..Default::default()
    };
    let (manifest, summary) =
        build_manifest(&calibration, &images, &poses, &options, |_| Ok(0.0)).unwrap();
    assert_eq!(summary.total, 7);
    assert_eq!(manifest.frames.len(), 7);
}
