use crate::feature_extractor::models::model_config::{ModelConfig, Normalization};
use chrono::Offset;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub enum CameraConfig {
    Fake,
    ImageDir { path: PathBuf },
    V4l { device: String, resolution: (u32, u32) },
}

#[derive(Debug, Clone, PartialEq)]
pub enum FeatureExtractorConfig {
    Pooling { grid_size: u32 },
    TractOnnx(ModelConfig),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayConfig {
    Console,
    Gui,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub tick_rate: Duration,
    pub neighbor_count: usize,
    pub class_labels: Vec<String>,
    pub no_action_label: String,
    pub no_action_sample_interval: Duration,
    pub no_action_sampling_enabled: bool,
    pub logger_timezone: chrono::FixedOffset,
    pub camera: CameraConfig,
    pub feature_extractor: FeatureExtractorConfig,
    pub display: DisplayConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_rate: Duration::from_millis(33),
            neighbor_count: 32,
            class_labels: ["A", "B", "C", "D"].iter().map(|l| l.to_string()).collect(),
            no_action_label: "No Action".to_string(),
            no_action_sample_interval: Duration::from_millis(1000),
            no_action_sampling_enabled: true,
            logger_timezone: utc(),
            camera: CameraConfig::Fake,
            feature_extractor: FeatureExtractorConfig::Pooling { grid_size: 8 },
            display: DisplayConfig::Console,
        }
    }
}

impl Config {
    /// Defaults overlaid with the `KNN_CAM_*` environment variables.
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let mut config = Self::default();

        config.camera = match (lookup("KNN_CAM_FRAMES_DIR"), lookup("KNN_CAM_CAMERA_DEVICE")) {
            (Some(_), Some(_)) => {
                return Err("Set either KNN_CAM_FRAMES_DIR or KNN_CAM_CAMERA_DEVICE, not both".into())
            }
            (Some(path), None) => CameraConfig::ImageDir {
                path: PathBuf::from(path),
            },
            (None, Some(device)) => CameraConfig::V4l {
                device,
                resolution: match lookup("KNN_CAM_CAMERA_SIZE") {
                    Some(value) => parse_shape(&value)?,
                    None => (640, 480),
                },
            },
            (None, None) => CameraConfig::Fake,
        };

        if let Some(onnx_model_path) = lookup("KNN_CAM_MODEL_PATH") {
            let input_shape = match lookup("KNN_CAM_MODEL_INPUT") {
                Some(value) => parse_shape(&value)?,
                None => (224, 224),
            };
            config.feature_extractor = FeatureExtractorConfig::TractOnnx(ModelConfig {
                onnx_model_path,
                input_shape,
                output_layer: lookup("KNN_CAM_MODEL_LAYER"),
                normalization: match lookup("KNN_CAM_MODEL_NORMALIZATION") {
                    Some(value) => parse_normalization(&value)?,
                    None => Normalization::MinusOneToOne,
                },
            });
        }

        if let Some(display) = lookup("KNN_CAM_DISPLAY") {
            config.display = match display.to_lowercase().as_str() {
                "console" => DisplayConfig::Console,
                "gui" => DisplayConfig::Gui,
                other => return Err(format!("Unknown display kind: {}", other).into()),
            };
        }

        Ok(config)
    }

    /// Class index reserved for frames sampled in the background.
    pub fn no_action_class_index(&self) -> usize {
        self.class_labels.len()
    }

    pub fn class_label(&self, class_index: usize) -> String {
        if class_index == self.no_action_class_index() {
            return self.no_action_label.clone();
        }
        self.class_labels
            .get(class_index)
            .cloned()
            .unwrap_or_else(|| class_index.to_string())
    }
}

fn parse_shape(value: &str) -> Result<(u32, u32), Box<dyn std::error::Error + Send + Sync>> {
    let (width, height) = value
        .split_once('x')
        .ok_or_else(|| format!("Expected WIDTHxHEIGHT, got {}", value))?;
    Ok((width.trim().parse()?, height.trim().parse()?))
}

fn parse_normalization(value: &str) -> Result<Normalization, Box<dyn std::error::Error + Send + Sync>> {
    match value.to_lowercase().as_str() {
        "zero_to_one" => Ok(Normalization::ZeroToOne),
        "minus_one_to_one" => Ok(Normalization::MinusOneToOne),
        other => Err(format!("Unknown normalization: {}", other).into()),
    }
}

fn utc() -> chrono::FixedOffset {
    chrono::Utc.fix()
}
