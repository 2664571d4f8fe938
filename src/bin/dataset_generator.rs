use std::path::PathBuf;

use clap::{Parser, Subcommand};
use image_pose_sync::synthetic::{SyntheticConfig, generate_dataset};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a synthetic image + pose dataset
    Generate {
        /// Output directory
        #[arg(short, long)]
        output: PathBuf,

        /// Number of images to generate
        #[arg(long, default_value = "20")]
        num_images: usize,

        /// Number of pose samples to generate
        #[arg(long, default_value = "200")]
        num_poses: usize,

        #[arg(long, default_value = "100")]
        image_period_ms: i64,

        #[arg(long, default_value = "10")]
        pose_period_ms: i64,

        /// Delay of the first image after the first pose
        #[arg(long, default_value = "3")]
        image_offset_ms: i64,

        /// Image width
        #[arg(long, default_value = "64")]
        width: u32,

        /// Image height
        #[arg(long, default_value = "48")]
        height: u32,

        #[arg(long, default_value = "0")]
        seed: u64,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    match args.command {
        Commands::Generate {
            output,
            num_images,
            num_poses,
            image_period_ms,
            pose_period_ms,
            image_offset_ms,
            width,
            height,
            seed,
        } => {
            let config = SyntheticConfig {
                num_images,
                num_poses,
                image_period_ms,
                pose_period_ms,
                image_offset_ms,
                width,
                height,
                seed,
            };
            generate_dataset(&output, &config)?;
        }
    }

    Ok(())
}
