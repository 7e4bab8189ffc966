use crate::feature_extractor::interface::{Embedding, FeatureExtractor};
use image::{imageops, DynamicImage};

/// Model-free extractor: the frame averaged down to a `grid_size` square of
/// RGB cells. Good enough to tell apart scenes with different colors and
/// layout, and fully deterministic.
pub struct FeatureExtractorPooling {
    grid_size: u32,
}

impl FeatureExtractorPooling {
    pub fn new(grid_size: u32) -> Self {
        Self {
            grid_size: grid_size.max(1),
        }
    }
}

impl FeatureExtractor for FeatureExtractorPooling {
    fn infer(&self, frame: &DynamicImage) -> Result<Embedding, Box<dyn std::error::Error + Send + Sync>> {
        if frame.width() == 0 || frame.height() == 0 {
            return Err("Cannot extract features from an empty frame".into());
        }

        let pooled = frame
            .resize_exact(self.grid_size, self.grid_size, imageops::FilterType::Triangle)
            .to_rgb8();

        let values = pooled
            .pixels()
            .flat_map(|pixel| pixel.0)
            .map(|channel| channel as f32 / 255.0)
            .collect();

        Ok(Embedding::new(values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    fn solid(color: [u8; 3]) -> DynamicImage {
        DynamicImage::ImageRgb8(ImageBuffer::from_pixel(64, 48, Rgb(color)))
    }

    #[test]
    fn test_embedding_size() {
        let extractor = FeatureExtractorPooling::new(8);

        let embedding = extractor.infer(&solid([10, 20, 30])).unwrap();

        assert_eq!(embedding.len(), 8 * 8 * 3);
    }

    #[test]
    fn test_same_frame_same_embedding() {
        let extractor = FeatureExtractorPooling::new(4);

        let a = extractor.infer(&solid([200, 10, 10])).unwrap();
        let b = extractor.infer(&solid([200, 10, 10])).unwrap();

        assert_eq!(a, b);
    }

    #[test]
    fn test_colors_map_to_channels() {
        let extractor = FeatureExtractorPooling::new(2);

        let red = extractor.infer(&solid([255, 0, 0])).unwrap();

        assert_eq!(&red.as_slice()[..3], &[1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_empty_frame_is_an_error() {
        let extractor = FeatureExtractorPooling::new(2);

        assert!(extractor.infer(&DynamicImage::new_rgb8(0, 0)).is_err());
    }
}
