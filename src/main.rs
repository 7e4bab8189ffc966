use classifier::core::Msg;
use classifier::main::ClassifierApp;
use config::{CameraConfig, Config, DisplayConfig, FeatureExtractorConfig};
use device_camera::{
    impl_fake::DeviceCameraFake, impl_image_dir::DeviceCameraImageDir, interface::DeviceCamera,
};
use device_display::impl_console::DeviceDisplayConsole;
use device_display::impl_gui::{run_window, DeviceDisplayGui};
use device_input::{impl_channel::DeviceInputChannel, impl_console::DeviceInputConsole};
use feature_extractor::{
    impl_pooling::FeatureExtractorPooling, impl_tract::FeatureExtractorTract,
    interface::FeatureExtractor,
};
use knn_classifier::impl_cosine::KnnClassifierCosine;
use library::logger::{impl_console::LoggerConsole, interface::Logger};
use std::sync::Arc;

mod certainty;
mod classifier;
mod config;
mod device_camera;
mod device_display;
mod device_input;
mod feature_extractor;
mod knn_classifier;
mod library;

#[cfg(feature = "camera-v4l")]
fn camera_v4l(
    device: &str,
    resolution: (u32, u32),
    logger: Arc<dyn Logger + Send + Sync>,
) -> Result<Arc<dyn DeviceCamera + Send + Sync>, Box<dyn std::error::Error + Send + Sync>> {
    Ok(Arc::new(device_camera::impl_v4l::DeviceCameraV4l::new(
        device, resolution, logger,
    )))
}

#[cfg(not(feature = "camera-v4l"))]
fn camera_v4l(
    device: &str,
    _resolution: (u32, u32),
    _logger: Arc<dyn Logger + Send + Sync>,
) -> Result<Arc<dyn DeviceCamera + Send + Sync>, Box<dyn std::error::Error + Send + Sync>> {
    Err(format!("Cannot open {}: built without the camera-v4l feature", device).into())
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = Config::from_env()?;

    let logger: Arc<dyn Logger + Send + Sync> = Arc::new(LoggerConsole::new(config.logger_timezone));

    let device_camera: Arc<dyn DeviceCamera + Send + Sync> = match &config.camera {
        CameraConfig::Fake => Arc::new(DeviceCameraFake::new(logger.clone())),
        CameraConfig::ImageDir { path } => Arc::new(DeviceCameraImageDir::new(path, logger.clone())),
        CameraConfig::V4l { device, resolution } => {
            camera_v4l(device, *resolution, logger.clone())?
        }
    };

    let feature_extractor: Box<dyn FeatureExtractor + Send> = match &config.feature_extractor {
        FeatureExtractorConfig::Pooling { grid_size } => {
            Box::new(FeatureExtractorPooling::new(*grid_size))
        }
        FeatureExtractorConfig::TractOnnx(model_config) => Box::new(FeatureExtractorTract::new(
            model_config.clone(),
            logger.clone(),
        )?),
    };

    let knn_classifier = Box::new(KnnClassifierCosine::new());

    match config.display {
        DisplayConfig::Console => {
            let device_input = Arc::new(DeviceInputConsole::new(
                config.class_labels.len(),
                logger.clone(),
            ));

            let mut app = ClassifierApp::new(
                config,
                logger,
                device_camera,
                device_input,
                Box::new(DeviceDisplayConsole::new()),
                feature_extractor,
                knn_classifier,
            );

            app.run()
        }
        DisplayConfig::Gui => {
            let (device_input, commands) = DeviceInputChannel::new();
            let device_display = DeviceDisplayGui::new();
            let window = device_display.window(config.class_labels.clone(), commands);

            let mut app = ClassifierApp::new(
                config,
                logger.clone(),
                device_camera,
                Arc::new(device_input),
                Box::new(device_display),
                feature_extractor,
                knn_classifier,
            );
            let sender = app.sender();

            // egui wants the main thread; the loop runs beside it
            let worker = std::thread::spawn(move || app.run());

            run_window(window)?;
            let _ = sender.send(Msg::Quit);

            worker
                .join()
                .map_err(|_| "Classifier thread panicked".to_string())?
        }
    }
}
