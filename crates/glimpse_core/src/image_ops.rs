//! Cosmetic image operations
//!
//! Dominant-color sampling for the adaptive background plus the
//! flip/grayscale display transforms. Rendering itself belongs to the
//! display collaborator; nothing here is load-bearing.

use crate::error::AppError;
use image::{DynamicImage, GenericImageView};
use std::collections::HashMap;
use std::path::Path;

/// Display-time transforms applied to the current image
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Transforms {
    pub flip_horizontal: bool,
    pub flip_vertical: bool,
    pub grayscale: bool,
}

impl Transforms {
    pub fn is_identity(&self) -> bool {
        !self.flip_horizontal && !self.flip_vertical && !self.grayscale
    }

    pub fn apply(&self, mut image: DynamicImage) -> DynamicImage {
        if self.grayscale {
            image = DynamicImage::ImageLuma8(image.to_luma8());
        }
        if self.flip_horizontal {
            image = image.fliph();
        }
        if self.flip_vertical {
            image = image.flipv();
        }
        image
    }
}

/// Decode an image and apply the active display transforms
pub fn load_for_display(path: &Path, transforms: Transforms) -> Result<DynamicImage, AppError> {
    let image = image::open(path)?;
    Ok(transforms.apply(image))
}

const ZOOM_STEP: f32 = 1.15;
const ZOOM_MIN: f32 = 0.1;
const ZOOM_MAX: f32 = 8.0;

/// Multiplicative zoom factor for the display surface.
/// Kept across navigation; only an explicit reset returns to 100%.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Zoom {
    factor: f32,
}

impl Zoom {
    pub fn new() -> Self {
        Self { factor: 1.0 }
    }

    pub fn factor(&self) -> f32 {
        self.factor
    }

    pub fn zoom_in(&mut self) {
        self.factor = (self.factor * ZOOM_STEP).min(ZOOM_MAX);
    }

    pub fn zoom_out(&mut self) {
        self.factor = (self.factor / ZOOM_STEP).max(ZOOM_MIN);
    }

    pub fn reset(&mut self) {
        self.factor = 1.0;
    }
}

impl Default for Zoom {
    fn default() -> Self {
        Self::new()
    }
}

/// Most frequent quantized color over a sampled pixel grid.
///
/// Bounded cost: the grid step scales with the image so roughly 64x64
/// samples are taken regardless of size.
pub fn dominant_color(image: &DynamicImage) -> Option<[u8; 3]> {
    let (w, h) = image.dimensions();
    if w == 0 || h == 0 {
        return None;
    }

    let step = (w.min(h) / 64).max(1) as usize;
    let rgb = image.to_rgb8();
    let mut counts: HashMap<[u8; 3], usize> = HashMap::new();

    for y in (0..h).step_by(step) {
        for x in (0..w).step_by(step) {
            let p = rgb.get_pixel(x, y);
            // 5 bits per channel is plenty for a background tint
            let quantized = [p[0] & 0xF8, p[1] & 0xF8, p[2] & 0xF8];
            *counts.entry(quantized).or_insert(0) += 1;
        }
    }

    counts
        .into_iter()
        .max_by_key(|(_, count)| *count)
        .map(|(color, _)| color)
}

/// Dominant color of an image file; None when it cannot be decoded
pub fn dominant_color_of_file(path: &Path) -> Option<[u8; 3]> {
    match image::open(path) {
        Ok(image) => dominant_color(&image),
        Err(e) => {
            tracing::debug!("Cannot sample {}: {}", path.display(), e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn solid(width: u32, height: u32, color: [u8; 3]) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb(color)))
    }

    #[test]
    fn test_dominant_color_of_solid_image() {
        let image = solid(200, 100, [200, 16, 96]);
        assert_eq!(dominant_color(&image), Some([200, 16, 96]));
    }

    #[test]
    fn test_dominant_color_picks_majority() {
        let mut buffer = RgbImage::from_pixel(100, 100, Rgb([0, 0, 248]));
        for x in 0..100 {
            for y in 0..10 {
                buffer.put_pixel(x, y, Rgb([248, 0, 0]));
            }
        }
        let image = DynamicImage::ImageRgb8(buffer);
        assert_eq!(dominant_color(&image), Some([0, 0, 248]));
    }

    #[test]
    fn test_dominant_color_of_unreadable_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let bogus = dir.path().join("not_an_image.jpg");
        std::fs::write(&bogus, b"plain text").unwrap();

        assert!(dominant_color_of_file(&bogus).is_none());
        assert!(dominant_color_of_file(&dir.path().join("missing.png")).is_none());
    }

    #[test]
    fn test_flip_horizontal_swaps_columns() {
        let mut buffer = RgbImage::new(2, 1);
        buffer.put_pixel(0, 0, Rgb([255, 0, 0]));
        buffer.put_pixel(1, 0, Rgb([0, 255, 0]));

        let transforms = Transforms {
            flip_horizontal: true,
            ..Default::default()
        };
        let flipped = transforms.apply(DynamicImage::ImageRgb8(buffer)).to_rgb8();

        assert_eq!(flipped.get_pixel(0, 0), &Rgb([0, 255, 0]));
        assert_eq!(flipped.get_pixel(1, 0), &Rgb([255, 0, 0]));
    }

    #[test]
    fn test_grayscale_flattens_channels() {
        let transforms = Transforms {
            grayscale: true,
            ..Default::default()
        };
        let gray = transforms.apply(solid(4, 4, [10, 200, 30]));
        assert_eq!(gray.color(), image::ColorType::L8);
    }

    #[test]
    fn test_load_for_display_reports_decode_errors() {
        let dir = tempfile::tempdir().unwrap();
        let bogus = dir.path().join("broken.png");
        std::fs::write(&bogus, b"not a png").unwrap();

        let result = load_for_display(&bogus, Transforms::default());
        assert!(matches!(result, Err(AppError::ImageDecode(_))));
    }

    #[test]
    fn test_identity_transforms() {
        assert!(Transforms::default().is_identity());
        assert!(!Transforms {
            flip_vertical: true,
            ..Default::default()
        }
        .is_identity());
    }

    #[test]
    fn test_zoom_clamps_and_resets() {
        let mut zoom = Zoom::new();
        assert_eq!(zoom.factor(), 1.0);

        for _ in 0..50 {
            zoom.zoom_in();
        }
        assert_eq!(zoom.factor(), ZOOM_MAX);

        for _ in 0..100 {
            zoom.zoom_out();
        }
        assert_eq!(zoom.factor(), ZOOM_MIN);

        zoom.reset();
        assert_eq!(zoom.factor(), 1.0);
    }
}
