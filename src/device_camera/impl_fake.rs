use crate::device_camera::interface::DeviceCamera;
use crate::library::logger::interface::Logger;
use image::{DynamicImage, Rgb, RgbImage};
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

const NOISE_WIDTH: u32 = 160;
const NOISE_HEIGHT: u32 = 120;

/// Produces random noise, or a fixed frame once one has been set. Clones
/// share the frame so a test can swap what the camera "sees".
#[derive(Clone)]
pub struct DeviceCameraFake {
    logger: Arc<dyn Logger + Send + Sync>,
    frame: Arc<Mutex<Option<DynamicImage>>>,
    fail_start: Arc<AtomicBool>,
}

impl DeviceCameraFake {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            logger: logger.with_namespace("camera").with_namespace("fake"),
            frame: Arc::new(Mutex::new(None)),
            fail_start: Arc::new(AtomicBool::new(false)),
        }
    }

    #[cfg(test)]
    pub fn set_frame(&self, frame: DynamicImage) {
        if let Ok(mut current) = self.frame.lock() {
            *current = Some(frame);
        }
    }

    /// Simulates missing hardware or a denied permission.
    #[cfg(test)]
    pub fn set_fail_start(&self, fail: bool) {
        self.fail_start.store(fail, Ordering::SeqCst);
    }

    fn noise() -> DynamicImage {
        let mut rng = rand::rng();
        let image = RgbImage::from_fn(NOISE_WIDTH, NOISE_HEIGHT, |_, _| {
            Rgb([rng.random(), rng.random(), rng.random()])
        });
        DynamicImage::ImageRgb8(image)
    }
}

impl DeviceCamera for DeviceCameraFake {
    fn start(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.logger.info("Starting camera...")?;
        if self.fail_start.load(Ordering::SeqCst) {
            return Err("Camera not available".into());
        }
        self.logger.info("Camera started")?;
        Ok(())
    }

    fn stop(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.logger.info("Camera stopped")?;
        Ok(())
    }

    fn capture_frame(&self) -> Result<DynamicImage, Box<dyn std::error::Error + Send + Sync>> {
        let frame = self.frame.lock().map_err(|e| e.to_string())?.clone();
        Ok(frame.unwrap_or_else(Self::noise))
    }
}
