use image::{DynamicImage, ImageFormat, RgbImage};

/// Converts one raw capture buffer into an image. `fourcc` is the V4L2
/// pixel format code the device negotiated.
pub fn decode_frame(
    fourcc: &[u8; 4],
    width: u32,
    height: u32,
    data: &[u8],
) -> Result<DynamicImage, Box<dyn std::error::Error + Send + Sync>> {
    match fourcc {
        b"RGB3" => {
            let size = width as usize * height as usize * 3;
            let pixels = data
                .get(..size)
                .ok_or_else(|| format!("RGB3 frame too short: {} of {} bytes", data.len(), size))?;
            let image = RgbImage::from_raw(width, height, pixels.to_vec())
                .ok_or("RGB3 frame does not match its size")?;
            Ok(DynamicImage::ImageRgb8(image))
        }
        b"YUYV" => Ok(DynamicImage::ImageRgb8(yuyv_to_rgb(width, height, data)?)),
        b"MJPG" | b"JPEG" => Ok(image::load_from_memory_with_format(data, ImageFormat::Jpeg)?),
        other => Err(format!("Unsupported pixel format {}", String::from_utf8_lossy(other)).into()),
    }
}

/// YUV 4:2:2, two pixels per `Y0 U Y1 V` group, BT.601 coefficients.
fn yuyv_to_rgb(
    width: u32,
    height: u32,
    data: &[u8],
) -> Result<RgbImage, Box<dyn std::error::Error + Send + Sync>> {
    let size = width as usize * height as usize * 2;
    let data = data
        .get(..size)
        .ok_or_else(|| format!("YUYV frame too short: {} of {} bytes", data.len(), size))?;

    let mut rgb = Vec::with_capacity(width as usize * height as usize * 3);
    for group in data.chunks_exact(4) {
        let u = group[1] as f32 - 128.0;
        let v = group[3] as f32 - 128.0;
        for y in [group[0], group[2]] {
            let y = y as f32;
            rgb.push((y + 1.402 * v).round().clamp(0.0, 255.0) as u8);
            rgb.push((y - 0.344_136 * u - 0.714_136 * v).round().clamp(0.0, 255.0) as u8);
            rgb.push((y + 1.772 * u).round().clamp(0.0, 255.0) as u8);
        }
    }

    RgbImage::from_raw(width, height, rgb).ok_or_else(|| "YUYV frame has an odd width".into())
}
