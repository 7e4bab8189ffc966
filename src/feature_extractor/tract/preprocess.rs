use crate::feature_extractor::models::model_config::Normalization;
use image::{imageops, DynamicImage, RgbImage};
use tract_onnx::prelude::*;

/// Scales the frame to fit `width`x`height` keeping its aspect ratio and
/// centers it on a black canvas.
pub fn letterbox(image: &DynamicImage, width: u32, height: u32) -> RgbImage {
    if image.width() * height == image.height() * width {
        return image
            .resize_exact(width, height, imageops::FilterType::Triangle)
            .to_rgb8();
    }

    let scaled = image
        .resize(width, height, imageops::FilterType::Triangle)
        .to_rgb8();

    let mut canvas = RgbImage::new(width, height);
    let x_offset = (width - scaled.width()) / 2;
    let y_offset = (height - scaled.height()) / 2;
    imageops::overlay(&mut canvas, &scaled, x_offset.into(), y_offset.into());

    canvas
}

/// NCHW tensor with a batch of one.
pub fn to_tensor(image: &RgbImage, normalization: Normalization) -> Tensor {
    let (width, height) = (image.width() as usize, image.height() as usize);

    tract_ndarray::Array4::from_shape_fn((1, 3, height, width), |(_, c, y, x)| {
        let value = image.get_pixel(x as u32, y as u32)[c] as f32;
        match normalization {
            Normalization::ZeroToOne => value / 255.0,
            Normalization::MinusOneToOne => value / 127.5 - 1.0,
        }
    })
    .into_tensor()
}

pub fn frame_to_tensor(
    image: &DynamicImage,
    (width, height): (u32, u32),
    normalization: Normalization,
) -> Tensor {
    to_tensor(&letterbox(image, width, height), normalization)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    fn solid(width: u32, height: u32, color: [u8; 3]) -> DynamicImage {
        DynamicImage::ImageRgb8(ImageBuffer::from_pixel(width, height, Rgb(color)))
    }

    #[test]
    fn test_square_frame_fills_tensor() {
        let image = solid(100, 100, [255, 0, 0]);

        let tensor = frame_to_tensor(&image, (224, 224), Normalization::ZeroToOne);
        assert_eq!(tensor.shape(), &[1, 3, 224, 224]);

        let slice = tensor.as_slice::<f32>().unwrap();
        assert_eq!(slice[0], 1.0);
        assert_eq!(slice[224 * 224], 0.0);
        assert_eq!(slice[2 * 224 * 224], 0.0);
    }

    #[test]
    fn test_wide_frame_is_centered() {
        let image = solid(200, 100, [255, 0, 0]);

        let tensor = frame_to_tensor(&image, (64, 64), Normalization::ZeroToOne);
        let slice = tensor.as_slice::<f32>().unwrap();

        // red channel: padding at the top row, image in the middle
        assert_eq!(slice[0], 0.0);
        assert_eq!(slice[32 * 64 + 32], 1.0);
    }

    #[test]
    fn test_minus_one_to_one_normalization() {
        let image = solid(10, 10, [0, 255, 255]);

        let tensor = frame_to_tensor(&image, (8, 8), Normalization::MinusOneToOne);
        let slice = tensor.as_slice::<f32>().unwrap();

        assert!((slice[0] + 1.0).abs() < 1e-6);
        assert!((slice[8 * 8] - 1.0).abs() < 1e-6);
    }
}
