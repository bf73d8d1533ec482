//! Screen regions (ROIs) for HUD elements.
//!
//! Regions are ratios (0.0-1.0) of the frame dimensions so they stay valid
//! across resolutions. Pixel coordinates are computed per frame.

use image::{ImageBuffer, Pixel};
use serde::{Deserialize, Serialize};

/// Absolute pixel box: top-left corner plus size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelBox {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

/// A rectangle in relative coordinates (0.0 to 1.0).
///
/// Values are not clamped: a region that runs past the frame edge is a
/// calibration mistake, and cropping simply returns whatever part overlaps.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Region {
    /// X position of top-left corner (0.0 = left edge, 1.0 = right edge)
    pub x: f64,
    /// Y position of top-left corner (0.0 = top edge, 1.0 = bottom edge)
    pub y: f64,
    /// Width as fraction of frame width
    pub w: f64,
    /// Height as fraction of frame height
    pub h: f64,
}

impl Region {
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Converts the ratios to absolute pixels (`floor(ratio * dimension)`).
    pub fn to_pixels(&self, frame_w: u32, frame_h: u32) -> PixelBox {
        PixelBox {
            x: ratio_to_px(self.x, frame_w),
            y: ratio_to_px(self.y, frame_h),
            w: ratio_to_px(self.w, frame_w),
            h: ratio_to_px(self.h, frame_h),
        }
    }

    /// Crops `img` to this region.
    ///
    /// The pixel box is clipped to the image bounds, so malformed geometry
    /// yields a smaller (possibly zero-area) image rather than a panic.
    pub fn crop<P>(
        &self,
        img: &ImageBuffer<P, Vec<P::Subpixel>>,
    ) -> ImageBuffer<P, Vec<P::Subpixel>>
    where
        P: Pixel + 'static,
    {
        let (w, h) = img.dimensions();
        let bx = self.to_pixels(w, h);

        let x0 = bx.x.min(w);
        let y0 = bx.y.min(h);
        let cw = bx.w.min(w - x0);
        let ch = bx.h.min(h - y0);

        image::imageops::crop_imm(img, x0, y0, cw, ch).to_image()
    }

    /// True when the region cannot produce a non-empty crop on any frame.
    pub fn is_degenerate(&self) -> bool {
        !(self.w > 0.0 && self.h > 0.0)
    }

    /// True when every edge lies inside the unit square.
    pub fn is_within_frame(&self) -> bool {
        self.x >= 0.0
            && self.y >= 0.0
            && self.x + self.w <= 1.0 + f64::EPSILON
            && self.y + self.h <= 1.0 + f64::EPSILON
    }
}

fn ratio_to_px(ratio: f64, dimension: u32) -> u32 {
    let px = (ratio * dimension as f64).floor();
    if px <= 0.0 { 0 } else { px as u32 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgb, RgbImage};

    #[test]
    fn test_to_pixels_floors() {
        let region = Region::new(0.70, 0.0, 0.17, 0.12);
        let bx = region.to_pixels(854, 394);
        assert_eq!(bx, PixelBox { x: 597, y: 0, w: 145, h: 47 });
    }

    #[test]
    fn test_crop_dimensions_follow_ratios() {
        let img: RgbImage = ImageBuffer::new(200, 100);
        for (w, h) in [(0.5, 0.5), (0.25, 0.1), (1.0, 1.0), (0.05, 0.2)] {
            let region = Region::new(0.0, 0.0, w, h);
            let cropped = region.crop(&img);
            assert_eq!(cropped.width(), (w * 200.0).round() as u32);
            assert_eq!(cropped.height(), (h * 100.0).round() as u32);
        }
    }

    #[test]
    fn test_crop_keeps_source_pixels() {
        let img: RgbImage = ImageBuffer::from_fn(100, 200, |x, y| Rgb([x as u8, y as u8, 0]));
        let region = Region::new(0.1, 0.25, 0.5, 0.1);
        let cropped = region.crop(&img);

        assert_eq!(cropped.dimensions(), (50, 20));
        assert_eq!(cropped.get_pixel(0, 0)[0], 10);
        assert_eq!(cropped.get_pixel(0, 0)[1], 50);
    }

    #[test]
    fn test_crop_past_edge_is_clipped() {
        let img: GrayImage = ImageBuffer::new(100, 100);
        let region = Region::new(0.9, 0.9, 0.5, 0.5);
        assert_eq!(region.crop(&img).dimensions(), (10, 10));

        let outside = Region::new(1.5, 0.0, 0.2, 0.2);
        assert_eq!(outside.crop(&img).width(), 0);
    }

    #[test]
    fn test_degenerate_region_gives_empty_crop() {
        let img: GrayImage = ImageBuffer::from_pixel(50, 50, Luma([255]));
        let region = Region::new(0.2, 0.2, 0.0, 0.3);
        assert!(region.is_degenerate());

        let cropped = region.crop(&img);
        assert_eq!(cropped.width(), 0);
        assert!(cropped.as_raw().is_empty());
    }

    #[test]
    fn test_within_frame() {
        assert!(Region::new(0.70, 0.0, 0.17, 0.12).is_within_frame());
        assert!(Region::new(0.0, 0.0, 1.0, 1.0).is_within_frame());
        assert!(!Region::new(0.9, 0.0, 0.2, 0.1).is_within_frame());
        assert!(!Region::new(-0.1, 0.0, 0.2, 0.1).is_within_frame());
    }
}
