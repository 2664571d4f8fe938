use std::path::Path;

use image::{GrayImage, ImageReader};

use crate::error::Result;

/// Index of the reflected neighbour for reflect-101 borders (`gfedcb|abcdefgh|gfedcba`).
fn reflect_101(i: i64, len: i64) -> u32 {
    if len == 1 {
        return 0;
    }
    let r = if i < 0 {
        -i
    } else if i >= len {
        2 * len - i - 2
    } else {
        i
    };
    r as u32
}

/// Variance of the 4-neighbour Laplacian over every pixel.
///
/// Higher is sharper. Borders are reflected without repeating the edge pixel.
pub fn variance_of_laplacian(img: &GrayImage) -> f64 {
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return 0.0;
    }
    let (w, h) = (width as i64, height as i64);
    let px = |x: i64, y: i64| img.get_pixel(reflect_101(x, w), reflect_101(y, h))[0] as f64;

    let n = (width as u64 * height as u64) as f64;
    let mut sum = 0.0;
    let mut sum_sq = 0.0;
    for y in 0..h {
        for x in 0..w {
            let lap = px(x, y - 1) + px(x, y + 1) + px(x - 1, y) + px(x + 1, y) - 4.0 * px(x, y);
            sum += lap;
            sum_sq += lap * lap;
        }
    }
    let mean = sum / n;
    (sum_sq / n - mean * mean).max(0.0)
}

/// Decodes the image at `path` and scores it with [`variance_of_laplacian`].
pub fn calc_sharpness(path: &Path) -> Result<f64> {
    let img = ImageReader::open(path)?.decode()?;
    Ok(variance_of_laplacian(&img.to_luma8()))
}
