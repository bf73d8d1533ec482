use image::imageops::{self, FilterType};
use image::{GrayImage, ImageBuffer, Luma, RgbImage};

/// Block size of the Gaussian-weighted local threshold.
const ADAPTIVE_BLOCK_SIZE: u32 = 31;

/// Constant subtracted from the local mean before comparing.
const ADAPTIVE_OFFSET: i32 = 10;

/// Binarization strategy applied after grayscale and upscale.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Binarize {
    /// Locally weighted threshold. Handles uneven background brightness.
    Adaptive,
    /// Global Otsu threshold. Suits light HUD text over the dark
    /// semi-transparent overlay.
    Otsu,
}

/// Converts RGB to grayscale with the ITU-R BT.601 luma weights:
/// Y = 0.299*R + 0.587*G + 0.114*B
pub fn to_grayscale(img: &RgbImage) -> GrayImage {
    let (width, height) = img.dimensions();
    let mut output = ImageBuffer::new(width, height);

    for (x, y, pixel) in img.enumerate_pixels() {
        let r = pixel[0] as f32;
        let g = pixel[1] as f32;
        let b = pixel[2] as f32;
        let luma = (0.299 * r + 0.587 * g + 0.114 * b).round().clamp(0.0, 255.0);
        output.put_pixel(x, y, Luma([luma as u8]));
    }

    output
}

/// Upscales with cubic interpolation so small HUD text is easier to read.
/// A factor of 1 (or an empty image) returns a copy.
pub fn upscale(gray: &GrayImage, factor: u32) -> GrayImage {
    let (w, h) = gray.dimensions();
    if factor <= 1 || w == 0 || h == 0 {
        return gray.clone();
    }
    imageops::resize(gray, w * factor, h * factor, FilterType::CatmullRom)
}

/// Finds the Otsu level: the gray value that maximizes between-class variance.
pub fn otsu_level(gray: &GrayImage) -> u8 {
    let mut histogram = [0u64; 256];
    for pixel in gray.pixels() {
        histogram[pixel[0] as usize] += 1;
    }

    let total = (gray.width() as u64 * gray.height() as u64) as f64;
    if total == 0.0 {
        return 0;
    }
    let sum_all: f64 = histogram
        .iter()
        .enumerate()
        .map(|(value, &count)| value as f64 * count as f64)
        .sum();

    let mut weight_bg = 0.0;
    let mut sum_bg = 0.0;
    let mut best_variance = 0.0;
    let mut level = 0u8;

    for (value, &count) in histogram.iter().enumerate() {
        weight_bg += count as f64;
        if weight_bg == 0.0 {
            continue;
        }
        let weight_fg = total - weight_bg;
        if weight_fg == 0.0 {
            break;
        }

        sum_bg += value as f64 * count as f64;
        let mean_bg = sum_bg / weight_bg;
        let mean_fg = (sum_all - sum_bg) / weight_fg;
        let variance = weight_bg * weight_fg * (mean_bg - mean_fg).powi(2);

        if variance > best_variance {
            best_variance = variance;
            level = value as u8;
        }
    }

    level
}

/// Global threshold at the Otsu level: brighter pixels become white (255).
pub fn otsu_threshold(gray: &GrayImage) -> GrayImage {
    let level = otsu_level(gray);
    ImageBuffer::from_fn(gray.width(), gray.height(), |x, y| {
        if gray.get_pixel(x, y)[0] > level {
            Luma([255u8])
        } else {
            Luma([0u8])
        }
    })
}

/// Gaussian-weighted local threshold: a pixel becomes white when it is
/// brighter than its neighbourhood mean minus a small offset.
pub fn adaptive_threshold(gray: &GrayImage) -> GrayImage {
    let (w, h) = gray.dimensions();
    if w == 0 || h == 0 {
        return gray.clone();
    }

    // Same sigma OpenCV derives for a Gaussian kernel of this size.
    let sigma = 0.3 * ((ADAPTIVE_BLOCK_SIZE as f32 - 1.0) * 0.5 - 1.0) + 0.8;
    let local_mean = imageops::blur(gray, sigma);

    ImageBuffer::from_fn(w, h, |x, y| {
        let value = gray.get_pixel(x, y)[0] as i32;
        let mean = local_mean.get_pixel(x, y)[0] as i32;
        if value > mean - ADAPTIVE_OFFSET {
            Luma([255u8])
        } else {
            Luma([0u8])
        }
    })
}

/// Full preprocessing chain: grayscale, upscale, binarize.
pub fn prepare_for_ocr(crop: &RgbImage, method: Binarize, scale: u32) -> GrayImage {
    let gray = upscale(&to_grayscale(crop), scale);
    match method {
        Binarize::Adaptive => adaptive_threshold(&gray),
        Binarize::Otsu => otsu_threshold(&gray),
    }
}
