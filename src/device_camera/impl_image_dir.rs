use crate::device_camera::interface::DeviceCamera;
use crate::library::logger::interface::Logger;
use image::DynamicImage;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

const EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Replays the images of a directory in file name order, looping forever.
pub struct DeviceCameraImageDir {
    logger: Arc<dyn Logger + Send + Sync>,
    directory: PathBuf,
    frames: Mutex<Vec<PathBuf>>,
    next: AtomicUsize,
}

impl DeviceCameraImageDir {
    pub fn new(directory: impl AsRef<Path>, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            logger: logger.with_namespace("camera").with_namespace("image_dir"),
            directory: directory.as_ref().to_path_buf(),
            frames: Mutex::new(Vec::new()),
            next: AtomicUsize::new(0),
        }
    }

    fn list_frames(&self) -> Result<Vec<PathBuf>, Box<dyn std::error::Error + Send + Sync>> {
        let mut frames = Vec::new();
        for entry in std::fs::read_dir(&self.directory)? {
            let path = entry?.path();
            let is_image = path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| EXTENSIONS.contains(&ext.to_lowercase().as_str()))
                .unwrap_or(false);
            if is_image {
                frames.push(path);
            }
        }
        frames.sort();
        Ok(frames)
    }
}

impl DeviceCamera for DeviceCameraImageDir {
    fn start(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.logger
            .info(&format!("Reading frames from {}", self.directory.display()))?;

        let frames = self.list_frames()?;
        if frames.is_empty() {
            return Err(format!("No images found in {}", self.directory.display()).into());
        }

        self.logger.info(&format!("Found {} frames", frames.len()))?;
        *self.frames.lock().map_err(|e| e.to_string())? = frames;
        self.next.store(0, Ordering::SeqCst);
        Ok(())
    }

    fn stop(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.frames.lock().map_err(|e| e.to_string())?.clear();
        self.logger.info("Camera stopped")?;
        Ok(())
    }

    fn capture_frame(&self) -> Result<DynamicImage, Box<dyn std::error::Error + Send + Sync>> {
        let frames = self.frames.lock().map_err(|e| e.to_string())?;
        if frames.is_empty() {
            return Err("Camera not started".into());
        }
        let index = self.next.fetch_add(1, Ordering::SeqCst) % frames.len();
        Ok(image::open(&frames[index])?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::logger::impl_fake::LoggerFake;
    use image::{ImageBuffer, Rgb};

    fn write_frame(dir: &Path, name: &str, color: [u8; 3]) {
        let image: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::from_pixel(4, 4, Rgb(color));
        image.save(dir.join(name)).unwrap();
    }

    #[test]
    fn test_replays_frames_in_order() {
        let dir = tempfile::tempdir().unwrap();
        write_frame(dir.path(), "b.png", [0, 255, 0]);
        write_frame(dir.path(), "a.png", [255, 0, 0]);
        std::fs::write(dir.path().join("notes.txt"), "not a frame").unwrap();

        let camera = DeviceCameraImageDir::new(dir.path(), Arc::new(LoggerFake::new()));
        camera.start().unwrap();

        let first = camera.capture_frame().unwrap().to_rgb8();
        let second = camera.capture_frame().unwrap().to_rgb8();
        let third = camera.capture_frame().unwrap().to_rgb8();

        assert_eq!(first.get_pixel(0, 0), &Rgb([255, 0, 0]));
        assert_eq!(second.get_pixel(0, 0), &Rgb([0, 255, 0]));
        assert_eq!(third.get_pixel(0, 0), &Rgb([255, 0, 0]));
    }

    #[test]
    fn test_empty_directory_fails_to_start() {
        let dir = tempfile::tempdir().unwrap();

        let camera = DeviceCameraImageDir::new(dir.path(), Arc::new(LoggerFake::new()));

        assert!(camera.start().is_err());
        assert!(camera.capture_frame().is_err());
    }
}
