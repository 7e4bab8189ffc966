use crate::device_camera::interface::DeviceCamera;
use crate::device_camera::pixel_format::decode_frame;
use crate::library::logger::interface::Logger;
use image::DynamicImage;
use std::sync::mpsc::{channel, sync_channel, Receiver, Sender, SyncSender, TryRecvError};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;
use v4l::buffer::Type;
use v4l::io::traits::CaptureStream;
use v4l::prelude::MmapStream;
use v4l::video::Capture;

const BUFFER_COUNT: u32 = 4;
const RETRY_DELAY: Duration = Duration::from_millis(100);

/// Negotiated capture format: width, height and fourcc.
type StreamFormat = (u32, u32, [u8; 4]);

/// Live camera through Video4Linux. A capture thread keeps the most recent
/// frame; `capture_frame` hands out a copy of it.
pub struct DeviceCameraV4l {
    device: String,
    resolution: (u32, u32),
    logger: Arc<dyn Logger + Send + Sync>,
    latest: Arc<Mutex<Option<DynamicImage>>>,
    capture_thread: Mutex<Option<(Sender<()>, JoinHandle<()>)>>,
}

impl DeviceCameraV4l {
    pub fn new(
        device: &str,
        resolution: (u32, u32),
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> Self {
        Self {
            device: device.to_string(),
            resolution,
            logger: logger.with_namespace("camera").with_namespace("v4l"),
            latest: Arc::new(Mutex::new(None)),
            capture_thread: Mutex::new(None),
        }
    }
}

fn open_device(
    path: &str,
    (width, height): (u32, u32),
    logger: &Arc<dyn Logger + Send + Sync>,
) -> Result<(v4l::Device, StreamFormat), Box<dyn std::error::Error + Send + Sync>> {
    let device = v4l::Device::with_path(path)
        .map_err(|e| format!("Failed to open {}: {}", path, e))?;

    let mut format = device.format()?;
    format.width = width;
    format.height = height;
    format.fourcc = v4l::FourCC::new(b"RGB3");

    // drivers may refuse RGB3 and keep their own format
    let format = match device.set_format(&format) {
        Ok(format) => format,
        Err(e) => {
            let _ = logger.warn(&format!("Failed to set format on {}: {}", path, e));
            device.format()?
        }
    };

    Ok((device, (format.width, format.height, format.fourcc.repr)))
}

fn capture_loop(
    path: String,
    resolution: (u32, u32),
    logger: Arc<dyn Logger + Send + Sync>,
    latest: Arc<Mutex<Option<DynamicImage>>>,
    ready: SyncSender<Result<StreamFormat, String>>,
    shutdown: Receiver<()>,
) {
    let (device, (width, height, fourcc)) = match open_device(&path, resolution, &logger) {
        Ok(opened) => opened,
        Err(e) => {
            let _ = ready.send(Err(e.to_string()));
            return;
        }
    };

    let mut stream = match MmapStream::with_buffers(&device, Type::VideoCapture, BUFFER_COUNT) {
        Ok(stream) => stream,
        Err(e) => {
            let _ = ready.send(Err(format!("Failed to create buffer stream: {}", e)));
            return;
        }
    };

    if ready.send(Ok((width, height, fourcc))).is_err() {
        return;
    }

    loop {
        match shutdown.try_recv() {
            Err(TryRecvError::Empty) => {}
            _ => break,
        }

        let decoded = match CaptureStream::next(&mut stream) {
            Ok((buffer, meta)) => {
                let used = match meta.bytesused as usize {
                    0 => buffer.len(),
                    used => used.min(buffer.len()),
                };
                decode_frame(&fourcc, width, height, &buffer[..used])
            }
            Err(e) => Err(e.into()),
        };

        match decoded {
            Ok(frame) => {
                if let Ok(mut current) = latest.lock() {
                    *current = Some(frame);
                }
            }
            Err(e) => {
                let _ = logger.error(&format!("Failed to capture frame: {}", e));
                if let Ok(mut current) = latest.lock() {
                    *current = None;
                }
                std::thread::sleep(RETRY_DELAY);
            }
        }
    }
}

impl DeviceCamera for DeviceCameraV4l {
    fn start(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.logger.info(&format!("Opening {}...", self.device))?;

        let (ready_tx, ready_rx) = sync_channel(1);
        let (shutdown_tx, shutdown_rx) = channel();
        let path = self.device.clone();
        let resolution = self.resolution;
        let logger = self.logger.clone();
        let latest = Arc::clone(&self.latest);

        let handle = std::thread::spawn(move || {
            capture_loop(path, resolution, logger, latest, ready_tx, shutdown_rx)
        });

        let (width, height, fourcc) = match ready_rx.recv() {
            Ok(Ok(format)) => format,
            Ok(Err(e)) => {
                let _ = handle.join();
                return Err(e.into());
            }
            Err(_) => {
                let _ = handle.join();
                return Err("Capture thread exited before opening the camera".into());
            }
        };

        *self.capture_thread.lock().map_err(|e| e.to_string())? = Some((shutdown_tx, handle));

        self.logger.info(&format!(
            "Camera started at {}x{} ({})",
            width,
            height,
            String::from_utf8_lossy(&fourcc)
        ))?;
        Ok(())
    }

    fn stop(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let capture_thread = self.capture_thread.lock().map_err(|e| e.to_string())?.take();
        if let Some((shutdown, handle)) = capture_thread {
            let _ = shutdown.send(());
            handle
                .join()
                .map_err(|_| "Capture thread panicked".to_string())?;
        }
        *self.latest.lock().map_err(|e| e.to_string())? = None;
        self.logger.info("Camera stopped")?;
        Ok(())
    }

    fn capture_frame(&self) -> Result<DynamicImage, Box<dyn std::error::Error + Send + Sync>> {
        self.latest
            .lock()
            .map_err(|e| e.to_string())?
            .clone()
            .ok_or_else(|| "No frame captured yet".into())
    }
}

impl Drop for DeviceCameraV4l {
    fn drop(&mut self) {
        if let Ok(mut capture_thread) = self.capture_thread.lock() {
            if let Some((shutdown, handle)) = capture_thread.take() {
                let _ = shutdown.send(());
                let _ = handle.join();
            }
        }
    }
}
