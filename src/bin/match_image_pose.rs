use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use image_pose_sync::data_loader::{load_calibration, load_image_records, load_poses_csv};
use image_pose_sync::io::write_manifest;
use image_pose_sync::sharpness::calc_sharpness;
use image_pose_sync::sync::associate;
use image_pose_sync::{Result, SyncError, SyncOptions, build_manifest};
use indicatif::{ProgressBar, ProgressStyle};

/// Match images and poses by timestamp, then write a transforms.json file.
#[derive(Parser)]
#[command(version, about, author)]
struct Cli {
    /// dataset folder, expected to contain an images folder
    #[arg(short, long)]
    base_path: PathBuf,

    /// calibration YAML [default: <base_path>/calibration.yaml]
    #[arg(long)]
    calib_yaml: Option<PathBuf>,

    /// folder of <timestamp>.png images [default: <base_path>/images]
    #[arg(long)]
    image_folder: Option<PathBuf>,

    /// pose csv (timestamp, pos xyz, quat xyzw) [default: <base_path>/poses.csv]
    #[arg(long)]
    pose_csv: Option<PathBuf>,

    /// output manifest [default: <base_path>/transforms.json]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// max image/pose time difference
    #[arg(long, default_value_t = 10.0)]
    tolerance_ms: f64,

    #[arg(long, default_value_t = 0)]
    start_idx: usize,

    /// use every n-th image
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
    step: u64,
}

fn require(kind: &'static str, path: &Path, is_dir: bool) -> Result<()> {
    let exists = if is_dir { path.is_dir() } else { path.is_file() };
    if exists {
        Ok(())
    } else {
        Err(SyncError::missing_input(kind, path))
    }
}

fn run(cli: Cli) -> Result<()> {
    let base = &cli.base_path;
    let calib_yaml = cli.calib_yaml.unwrap_or_else(|| base.join("calibration.yaml"));
    let image_folder = cli.image_folder.unwrap_or_else(|| base.join("images"));
    let pose_csv = cli.pose_csv.unwrap_or_else(|| base.join("poses.csv"));
    let output = cli.output.unwrap_or_else(|| base.join("transforms.json"));

    require("calibration file", &calib_yaml, false)?;
    require("image folder", &image_folder, true)?;
    require("pose csv file", &pose_csv, false)?;

    let options = SyncOptions {
        tolerance_ms: cli.tolerance_ms,
        start_idx: cli.start_idx,
        step: cli.step as usize,
    };

    let now = Instant::now();
    let calibration = load_calibration(&calib_yaml)?;
    let images = load_image_records(&image_folder)?;
    let poses = load_poses_csv(&pose_csv)?;
    log::info!("loaded {} images and {} poses", images.len(), poses.len());

    log::info!("find closest pose for each image...");
    let sampled_times: Vec<i64> = images
        .iter()
        .skip(options.start_idx)
        .step_by(options.step)
        .map(|r| r.time_ns)
        .collect();
    let pose_times: Vec<i64> = poses.iter().map(|p| p.time_ns).collect();
    let num_matched = associate(&sampled_times, &pose_times, options.tolerance_ms)
        .iter()
        .filter(|m| m.found)
        .count();

    log::info!("adding frame data...");
    let pb = ProgressBar::new(num_matched as u64);
    if let Ok(style) = ProgressStyle::with_template("{bar:40} {pos}/{len} sharpness") {
        pb.set_style(style);
    }
    let (manifest, summary) = build_manifest(&calibration, &images, &poses, &options, |image| {
        let score = calc_sharpness(&image.path);
        pb.inc(1);
        score
    })?;
    pb.finish_and_clear();

    if summary.missed > 0 {
        log::warn!(
            "#images not synced with poses / #total images: {} / {}",
            summary.missed,
            summary.total
        );
    } else {
        log::info!("all {} images synced with poses", summary.total);
    }

    write_manifest(&output, &manifest)?;
    log::info!("done in {:.3} sec", now.elapsed().as_secs_f64());
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
