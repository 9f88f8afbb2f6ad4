//! Single-channel pixel buffers: luminance crops, resizing, diffing
//! and adaptive binarization

use crate::error::{CvError, Result};
use image::imageops::{self, FilterType};
use image::{ImageBuffer, Luma, RgbImage};
use std::path::Path;
use vodsig_core::Roi;

/// Weight of the standard deviation in the adaptive binarization threshold
pub const BINARIZE_STD_WEIGHT: f64 = 0.5;
/// Lower clamp of the adaptive binarization threshold
pub const BINARIZE_MIN_THRESHOLD: f64 = 80.0;
/// Upper clamp of the adaptive binarization threshold
pub const BINARIZE_MAX_THRESHOLD: f64 = 180.0;

/// Immutable single-channel luminance buffer.
///
/// `pixels.len() == width * height`, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrayBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl GrayBuffer {
    /// Wrap raw row-major pixels. Panics if the length does not match
    /// the dimensions; callers construct from checked sources.
    pub fn from_raw(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        assert_eq!(pixels.len(), (width * height) as usize);
        Self { width, height, pixels }
    }

    /// Desaturate a color image (or a ROI of it) using BT.601 luma:
    /// `round(0.299 R + 0.587 G + 0.114 B)`.
    pub fn from_rgb(img: &RgbImage, roi: Option<&Roi>) -> Result<Self> {
        let full = Roi::new(0, 0, img.width(), img.height());
        let roi = roi.unwrap_or(&full);
        if !roi.fits_within(img.width(), img.height()) {
            return Err(CvError::OutOfBounds {
                x: roi.x,
                y: roi.y,
                w: roi.w,
                h: roi.h,
                src_w: img.width(),
                src_h: img.height(),
            });
        }

        let mut pixels = Vec::with_capacity((roi.w * roi.h) as usize);
        for y in roi.y..roi.bottom() {
            for x in roi.x..roi.right() {
                let p = img.get_pixel(x, y);
                let luma = 0.299 * p[0] as f64 + 0.587 * p[1] as f64 + 0.114 * p[2] as f64;
                pixels.push(luma.round() as u8);
            }
        }

        Ok(Self { width: roi.w, height: roi.h, pixels })
    }

    /// Decode an image file and desaturate it, optionally cropping to
    /// `roi` and resizing to `resize`.
    pub fn load<P: AsRef<Path>>(
        path: P,
        roi: Option<&Roi>,
        resize: Option<(u32, u32)>,
    ) -> Result<Self> {
        let img = image::open(&path)
            .map_err(|source| CvError::Image {
                path: path.as_ref().to_path_buf(),
                source,
            })?
            .to_rgb8();

        let gray = Self::from_rgb(&img, roi)?;
        match resize {
            Some((w, h)) => Ok(gray.resized(w, h)),
            None => Ok(gray),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> u8 {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Copy out a sub-rectangle (coordinates local to this buffer)
    pub fn crop(&self, roi: &Roi) -> Result<GrayBuffer> {
        if !roi.fits_within(self.width, self.height) {
            return Err(CvError::OutOfBounds {
                x: roi.x,
                y: roi.y,
                w: roi.w,
                h: roi.h,
                src_w: self.width,
                src_h: self.height,
            });
        }
        let mut pixels = Vec::with_capacity((roi.w * roi.h) as usize);
        for y in roi.y..roi.bottom() {
            let start = (y * self.width + roi.x) as usize;
            pixels.extend_from_slice(&self.pixels[start..start + roi.w as usize]);
        }
        Ok(GrayBuffer { width: roi.w, height: roi.h, pixels })
    }

    /// Deterministic bilinear resample (`FilterType::Triangle`)
    pub fn resized(&self, w: u32, h: u32) -> GrayBuffer {
        if w == self.width && h == self.height {
            return self.clone();
        }
        let buf: ImageBuffer<Luma<u8>, Vec<u8>> =
            ImageBuffer::from_raw(self.width, self.height, self.pixels.clone())
                .expect("buffer length matches dimensions");
        let resized = imageops::resize(&buf, w, h, FilterType::Triangle);
        GrayBuffer {
            width: w,
            height: h,
            pixels: resized.into_raw(),
        }
    }

    pub fn mean(&self) -> f64 {
        let sum: u64 = self.pixels.iter().map(|&p| p as u64).sum();
        sum as f64 / self.pixels.len() as f64
    }

    /// Population variance of the pixel values
    pub fn variance(&self) -> f64 {
        let mean = self.mean();
        let acc: f64 = self
            .pixels
            .iter()
            .map(|&p| {
                let d = p as f64 - mean;
                d * d
            })
            .sum();
        acc / self.pixels.len() as f64
    }

    /// Mean absolute pixel difference, normalized to [0, 1]
    pub fn mean_abs_diff(&self, other: &GrayBuffer) -> Result<f64> {
        if self.width != other.width || self.height != other.height {
            return Err(CvError::SizeMismatch {
                a_w: self.width,
                a_h: self.height,
                b_w: other.width,
                b_h: other.height,
            });
        }
        let sum: u64 = self
            .pixels
            .iter()
            .zip(&other.pixels)
            .map(|(&a, &b)| (a as i32 - b as i32).unsigned_abs() as u64)
            .sum();
        Ok(sum as f64 / (self.pixels.len() as f64 * 255.0))
    }

    /// Adaptive binarization: pixels at or above
    /// `clamp(mean + 0.5 * stddev, 80, 180)` map to 255, the rest to 0.
    pub fn binarized(&self) -> GrayBuffer {
        let threshold = (self.mean() + BINARIZE_STD_WEIGHT * self.variance().sqrt())
            .clamp(BINARIZE_MIN_THRESHOLD, BINARIZE_MAX_THRESHOLD);
        let pixels = self
            .pixels
            .iter()
            .map(|&p| if p as f64 >= threshold { 255 } else { 0 })
            .collect();
        GrayBuffer {
            width: self.width,
            height: self.height,
            pixels,
        }
    }

    /// Number of foreground (non-zero) pixels
    pub fn count_on(&self) -> usize {
        self.pixels.iter().filter(|&&p| p > 0).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform(width: u32, height: u32, value: u8) -> GrayBuffer {
        GrayBuffer::from_raw(width, height, vec![value; (width * height) as usize])
    }

    #[test]
    fn test_luma_rounding() {
        let mut img = RgbImage::new(1, 1);
        img.put_pixel(0, 0, image::Rgb([100, 200, 50]));
        let gray = GrayBuffer::from_rgb(&img, None).unwrap();
        // 0.299*100 + 0.587*200 + 0.114*50 = 152.9 -> 153
        assert_eq!(gray.get(0, 0), 153);
    }

    #[test]
    fn test_roi_out_of_bounds() {
        let img = RgbImage::new(10, 10);
        let roi = Roi::new(5, 5, 6, 5);
        let err = GrayBuffer::from_rgb(&img, Some(&roi)).unwrap_err();
        assert!(matches!(err, CvError::OutOfBounds { .. }));
    }

    #[test]
    fn test_crop_extracts_local_rect() {
        let mut pixels = vec![0u8; 16];
        pixels[4 * 1 + 2] = 77; // (2, 1)
        let buf = GrayBuffer::from_raw(4, 4, pixels);
        let crop = buf.crop(&Roi::new(2, 1, 2, 2)).unwrap();
        assert_eq!(crop.get(0, 0), 77);
        assert_eq!(crop.count_on(), 1);
    }

    #[test]
    fn test_mean_abs_diff_size_mismatch() {
        let a = uniform(4, 4, 0);
        let b = uniform(4, 5, 0);
        assert!(matches!(
            a.mean_abs_diff(&b),
            Err(CvError::SizeMismatch { .. })
        ));
    }

    #[test]
    fn test_mean_abs_diff_normalized() {
        let a = uniform(2, 2, 0);
        let b = uniform(2, 2, 255);
        assert_eq!(a.mean_abs_diff(&b).unwrap(), 1.0);
        assert_eq!(a.mean_abs_diff(&a).unwrap(), 0.0);
    }

    #[test]
    fn test_binarize_uniform_boundary() {
        // stddev = 0, so the threshold is clamp(mean, 80, 180)
        assert_eq!(uniform(3, 3, 80).binarized().count_on(), 9);
        assert_eq!(uniform(3, 3, 180).binarized().count_on(), 9);
    }

    #[test]
    fn test_binarize_clamp_low() {
        // mean = 79 clamps the threshold to 80; 79 < 80 so all pixels are off
        let out = uniform(3, 3, 79).binarized();
        assert_eq!(out.count_on(), 0);
    }

    #[test]
    fn test_binarize_clamp_high() {
        // mean = 200 clamps the threshold to 180; 200 >= 180 so all pixels are on
        let out = uniform(3, 3, 200).binarized();
        assert_eq!(out.count_on(), 9);
    }

    #[test]
    fn test_resize_identity_is_noop() {
        let buf = uniform(4, 4, 42);
        assert_eq!(buf.resized(4, 4), buf);
    }
}
