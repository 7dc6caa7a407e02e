//! HSV color math for soil photos
//!
//! Decoding, canonical downscaling and mean-color computation. HSV values
//! use the OpenCV convention (hue in [0,180), saturation and value in
//! [0,255]) so the classifier thresholds stay on their original scale.

use image::imageops::FilterType;
use image::RgbImage;
use serde::Serialize;
use thiserror::Error;

/// Fixed analysis resolution. Downscaling bounds cost; it is not an
/// accuracy measure.
pub const CANONICAL_SIZE: u32 = 150;

/// Image bytes that could not be turned into a pixel grid.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("could not decode image: {0}")]
    Decode(#[from] image::ImageError),
}

/// Mean color of one photo in HSV, OpenCV scale.
///
/// Transient: computed per classification call, never stored.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct HsvColorSample {
    /// Mean hue, [0, 180)
    pub hue: f64,
    /// Mean saturation, [0, 255]
    pub saturation: f64,
    /// Mean value (brightness), [0, 255]
    pub value: f64,
}

impl HsvColorSample {
    /// Compact display form, e.g. "HSV(12,87,140)".
    pub fn display(&self) -> String {
        format!(
            "HSV({},{},{})",
            self.hue as u32, self.saturation as u32, self.value as u32
        )
    }
}

/// Decode raw bytes and downscale to the canonical resolution.
///
/// Zero-length, truncated or unrecognizable input is a [`ScanError`].
pub fn decode_and_downscale(bytes: &[u8]) -> Result<RgbImage, ScanError> {
    let decoded = image::load_from_memory(bytes)?;
    let resized = decoded.resize_exact(CANONICAL_SIZE, CANONICAL_SIZE, FilterType::Triangle);
    Ok(resized.to_rgb8())
}

/// Convert one RGB pixel to HSV on the OpenCV scale.
pub fn rgb_to_hsv(r: u8, g: u8, b: u8) -> (f64, f64, f64) {
    let r = r as f64 / 255.0;
    let g = g as f64 / 255.0;
    let b = b as f64 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let hue_degrees = if delta == 0.0 {
        0.0
    } else if max == r {
        60.0 * ((g - b) / delta).rem_euclid(6.0)
    } else if max == g {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };

    let saturation = if max == 0.0 { 0.0 } else { delta / max };

    (hue_degrees / 2.0, saturation * 255.0, max * 255.0)
}

/// Unweighted mean H, S, V across all pixels.
///
/// Plain arithmetic mean, no circular-hue handling; the classifier
/// thresholds assume the same convention.
pub fn mean_hsv(img: &RgbImage) -> HsvColorSample {
    let mut hue = 0.0;
    let mut saturation = 0.0;
    let mut value = 0.0;

    for pixel in img.pixels() {
        let (h, s, v) = rgb_to_hsv(pixel[0], pixel[1], pixel[2]);
        hue += h;
        saturation += s;
        value += v;
    }

    let count = (img.width() as f64) * (img.height() as f64);
    HsvColorSample {
        hue: hue / count,
        saturation: saturation / count,
        value: value / count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use image::Rgb;

    #[test]
    fn test_rgb_to_hsv_primaries() {
        // Pure red: hue 0, full saturation and value.
        let (h, s, v) = rgb_to_hsv(255, 0, 0);
        assert_relative_eq!(h, 0.0);
        assert_relative_eq!(s, 255.0);
        assert_relative_eq!(v, 255.0);

        // Pure green: 120 degrees -> 60 on the OpenCV scale.
        let (h, _, _) = rgb_to_hsv(0, 255, 0);
        assert_relative_eq!(h, 60.0);

        // Pure blue: 240 degrees -> 120.
        let (h, _, _) = rgb_to_hsv(0, 0, 255);
        assert_relative_eq!(h, 120.0);
    }

    #[test]
    fn test_rgb_to_hsv_achromatic() {
        let (h, s, v) = rgb_to_hsv(0, 0, 0);
        assert_relative_eq!(h, 0.0);
        assert_relative_eq!(s, 0.0);
        assert_relative_eq!(v, 0.0);

        let (h, s, v) = rgb_to_hsv(255, 255, 255);
        assert_relative_eq!(h, 0.0);
        assert_relative_eq!(s, 0.0);
        assert_relative_eq!(v, 255.0);

        let (_, s, v) = rgb_to_hsv(128, 128, 128);
        assert_relative_eq!(s, 0.0);
        assert_relative_eq!(v, 128.0);
    }

    #[test]
    fn test_rgb_to_hsv_near_red_wraps_high() {
        // Slightly purple red sits just under 180 instead of going negative.
        let (h, _, _) = rgb_to_hsv(255, 0, 10);
        assert!(h > 170.0 && h < 180.0, "hue was {}", h);
    }

    #[test]
    fn test_mean_hsv_uniform_image() {
        let img = RgbImage::from_pixel(150, 150, Rgb([40, 40, 40]));
        let sample = mean_hsv(&img);
        assert_relative_eq!(sample.hue, 0.0);
        assert_relative_eq!(sample.saturation, 0.0);
        assert_relative_eq!(sample.value, 40.0);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_and_downscale(&[]).is_err());
        assert!(decode_and_downscale(b"definitely not an image").is_err());
        // Valid PNG magic with a truncated body.
        assert!(decode_and_downscale(&[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a]).is_err());
    }

    #[test]
    fn test_decode_and_downscale_roundtrip() {
        let img = RgbImage::from_pixel(32, 48, Rgb([180, 40, 40]));
        let mut bytes = std::io::Cursor::new(Vec::new());
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut bytes, image::ImageOutputFormat::Png)
            .unwrap();

        let decoded = decode_and_downscale(bytes.get_ref()).unwrap();
        assert_eq!(decoded.width(), CANONICAL_SIZE);
        assert_eq!(decoded.height(), CANONICAL_SIZE);
        // Uniform input stays uniform through the resize, modulo filter
        // rounding.
        let pixel = decoded.get_pixel(75, 75);
        for (channel, expected) in pixel.0.iter().zip([180u8, 40, 40]) {
            assert!((*channel as i16 - expected as i16).abs() <= 1, "pixel was {:?}", pixel);
        }
    }

    #[test]
    fn test_sample_display() {
        let sample = HsvColorSample { hue: 12.7, saturation: 87.2, value: 140.9 };
        assert_eq!(sample.display(), "HSV(12,87,140)");
    }
}
