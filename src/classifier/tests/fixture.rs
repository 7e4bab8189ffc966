use crate::classifier::core::Msg;
use crate::classifier::main::ClassifierApp;
use crate::config::Config;
use crate::device_camera::impl_fake::DeviceCameraFake;
use crate::device_display::impl_fake::DeviceDisplayFake;
use crate::device_input::impl_channel::DeviceInputChannel;
use crate::device_input::interface::Command;
use crate::feature_extractor::impl_pooling::FeatureExtractorPooling;
use crate::feature_extractor::interface::{Embedding, FeatureExtractor};
use crate::knn_classifier::impl_cosine::KnnClassifierCosine;
use crate::library::logger::impl_fake::LoggerFake;
use crate::library::logger::interface::{Level, Logger};
use image::{DynamicImage, ImageBuffer, Rgb};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::time::{Duration, Instant};

pub struct FeatureExtractorFailing;

impl FeatureExtractor for FeatureExtractorFailing {
    fn infer(&self, _frame: &DynamicImage) -> Result<Embedding, Box<dyn std::error::Error + Send + Sync>> {
        Err("model not loaded".into())
    }
}

/// A logger whose sink is gone, e.g. a closed stderr.
pub struct LoggerFailing;

impl Logger for LoggerFailing {
    fn log(&self, _level: Level, _message: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        Err("log sink closed".into())
    }

    fn with_namespace(&self, _namespace: &str) -> Arc<dyn Logger + Send + Sync> {
        Arc::new(LoggerFailing)
    }
}

pub fn solid_frame(color: [u8; 3]) -> DynamicImage {
    DynamicImage::ImageRgb8(ImageBuffer::from_pixel(32, 24, Rgb(color)))
}

pub const RED: [u8; 3] = [255, 0, 0];
pub const GREEN: [u8; 3] = [0, 255, 0];
pub const BLUE: [u8; 3] = [0, 0, 255];
pub const YELLOW: [u8; 3] = [255, 255, 0];

#[allow(dead_code)]
pub struct Fixture {
    pub config: Config,
    pub logger: LoggerFake,
    pub device_camera: DeviceCameraFake,
    pub device_display: DeviceDisplayFake,
    pub commands: Sender<Command>,
    pub app: ClassifierApp,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_feature_extractor(Box::new(FeatureExtractorPooling::new(4)))
    }

    pub fn with_feature_extractor(feature_extractor: Box<dyn FeatureExtractor + Send>) -> Self {
        let mut config = Config::default();
        config.tick_rate = Duration::from_millis(5);

        let logger = LoggerFake::new();
        let device_camera = DeviceCameraFake::new(Arc::new(logger.clone()));
        let device_display = DeviceDisplayFake::new();
        let (device_input, commands) = DeviceInputChannel::new();

        let app = ClassifierApp::new(
            config.clone(),
            Arc::new(logger.clone()),
            Arc::new(device_camera.clone()),
            Arc::new(device_input),
            Box::new(device_display.clone()),
            feature_extractor,
            Box::new(KnnClassifierCosine::new()),
        );

        Self {
            config,
            logger,
            device_camera,
            device_display,
            commands,
            app,
        }
    }

    /// Points the camera at a solid color and adds an example for `class_index`.
    pub fn add_example(&mut self, class_index: usize, color: [u8; 3]) {
        self.device_camera.set_frame(solid_frame(color));
        self.app
            .dispatch(Msg::AddExample {
                class_index,
                now: Instant::now(),
            })
            .unwrap();
    }
}
