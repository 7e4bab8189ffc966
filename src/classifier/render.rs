use crate::certainty::{certainty_text, report_certainty};
use crate::classifier::core::Model;
use crate::config::Config;
use crate::device_display::interface::{DeviceDisplay, DisplaySurface};
use crate::knn_classifier::interface::Prediction;

pub struct Render {
    config: Config,
    device_display: Box<dyn DeviceDisplay>,
}

impl Render {
    pub fn new(config: Config, device_display: Box<dyn DeviceDisplay>) -> Self {
        Self {
            config,
            device_display,
        }
    }

    pub fn init(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.device_display.init()
    }

    /// Nothing is written until the first prediction (or failure) exists.
    /// A failure clears the certainty label.
    pub fn render(&mut self, model: &Model) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if let Some(error) = &model.error {
            self.device_display
                .write(DisplaySurface::Predictions, &format!("Error: {}", error))?;
            self.device_display
                .write(DisplaySurface::Certainty, &certainty_text(None))?;
            return Ok(());
        }

        let Some(prediction) = &model.prediction else {
            return Ok(());
        };

        self.device_display.write(
            DisplaySurface::Predictions,
            &predictions_text(&self.config, prediction),
        )?;
        self.device_display.write(
            DisplaySurface::Certainty,
            &report_certainty(prediction.top_confidence()),
        )?;
        self.device_display
            .write(DisplaySurface::NoActionStatus, &no_action_status_text(model))?;

        Ok(())
    }
}

pub fn predictions_text(config: &Config, prediction: &Prediction) -> String {
    let mut lines = vec![
        format!("Top Prediction: {}", config.class_label(prediction.class_index)),
        format!("Top prediction's probability: {}", prediction.top_confidence()),
    ];
    for (class_index, confidence) in &prediction.confidences {
        lines.push(format!(
            "Class {}: {}",
            config.class_label(*class_index),
            confidence
        ));
    }
    lines.join("\n")
}

pub fn no_action_status_text(model: &Model) -> String {
    format!(
        "Number of no-action images: {}\nIs the system actively adding No-action images? {}",
        model.no_action.sample_count,
        if model.no_action.enabled { "Yes" } else { "No" }
    )
}
