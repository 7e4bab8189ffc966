use crate::classifier::core::{Effect, Msg};
use crate::config::Config;
use crate::device_camera::interface::DeviceCamera;
use crate::device_input::interface::{Command, DeviceInput};
use crate::feature_extractor::interface::{Embedding, FeatureExtractor};
use crate::knn_classifier::interface::{KnnClassifier, Prediction};
use crate::library::logger::interface::Logger;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::time::Instant;

pub struct RunEffect {
    config: Config,
    logger: Arc<dyn Logger + Send + Sync>,
    device_camera: Arc<dyn DeviceCamera + Send + Sync>,
    device_input: Arc<dyn DeviceInput + Send + Sync>,
    feature_extractor: Box<dyn FeatureExtractor + Send>,
    knn_classifier: Box<dyn KnnClassifier + Send>,
    msg_sender: Sender<Msg>,
    tick_pending: Arc<AtomicBool>,
}

impl RunEffect {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: Config,
        logger: Arc<dyn Logger + Send + Sync>,
        device_camera: Arc<dyn DeviceCamera + Send + Sync>,
        device_input: Arc<dyn DeviceInput + Send + Sync>,
        feature_extractor: Box<dyn FeatureExtractor + Send>,
        knn_classifier: Box<dyn KnnClassifier + Send>,
        msg_sender: Sender<Msg>,
        tick_pending: Arc<AtomicBool>,
    ) -> Self {
        Self {
            config,
            logger: logger.with_namespace("effect"),
            device_camera,
            device_input,
            feature_extractor,
            knn_classifier,
            msg_sender,
            tick_pending,
        }
    }

    #[cfg(test)]
    pub fn knn_classifier(&self) -> &dyn KnnClassifier {
        self.knn_classifier.as_ref()
    }

    /// Runs one effect on the calling thread. Subscriptions spawn their
    /// producer thread and return immediately; everything else hands back
    /// the message carrying its outcome.
    pub fn run_effect(&mut self, effect: Effect) -> Option<Msg> {
        if !matches!(effect, Effect::Predict { .. }) {
            let _ = self
                .logger
                .info(&format!("Running effect: {}", effect.to_display_string()));
        }

        match effect {
            Effect::SubscribeTick => {
                self.subscribe_tick();
                None
            }
            Effect::SubscribeCommands => {
                self.subscribe_commands();
                None
            }
            Effect::Predict { now } => Some(Msg::PredictDone {
                now,
                result: self.predict(),
            }),
            Effect::AddExample { class_index } => Some(Msg::ExampleAdded {
                class_index,
                result: self.add_example(class_index),
            }),
            Effect::AddNoActionExample { embedding } => {
                let class_index = self.config.no_action_class_index();
                let result: Result<(), Box<dyn std::error::Error + Send + Sync>> = self
                    .knn_classifier
                    .add_example(embedding, class_index)
                    .map_err(Into::into);
                Some(Msg::NoActionSampled(result))
            }
            Effect::StopCamera => {
                if let Err(e) = self.device_camera.stop() {
                    let _ = self.logger.error(&format!("Failed to stop camera: {}", e));
                }
                None
            }
        }
    }

    fn capture_embedding(&self) -> Result<Embedding, Box<dyn std::error::Error + Send + Sync>> {
        let frame = self.device_camera.capture_frame()?;
        self.feature_extractor.infer(&frame)
    }

    fn predict(&self) -> Result<(Embedding, Prediction), Box<dyn std::error::Error + Send + Sync>> {
        let embedding = self.capture_embedding()?;
        let prediction = self
            .knn_classifier
            .predict_class(&embedding, self.config.neighbor_count)?;
        Ok((embedding, prediction))
    }

    fn add_example(&mut self, class_index: usize) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let embedding = self.capture_embedding()?;
        self.knn_classifier.add_example(embedding, class_index)?;
        // the example is stored either way
        let _ = self.logger.info(&format!(
            "Added example for class {}, store holds {} examples in {} classes",
            class_index,
            self.knn_classifier.num_examples(),
            self.knn_classifier.num_classes()
        ));
        Ok(())
    }

    fn subscribe_tick(&self) {
        let sender = self.msg_sender.clone();
        let tick_pending = Arc::clone(&self.tick_pending);
        let tick_rate = self.config.tick_rate;

        std::thread::spawn(move || loop {
            std::thread::sleep(tick_rate);
            // previous tick still queued
            if tick_pending.swap(true, Ordering::SeqCst) {
                continue;
            }
            if sender.send(Msg::Tick(Instant::now())).is_err() {
                break;
            }
        });
    }

    fn subscribe_commands(&self) {
        let sender = self.msg_sender.clone();
        let events = self.device_input.events();

        std::thread::spawn(move || {
            for command in events {
                let msg = match command {
                    Command::AddExample(class_index) => Msg::AddExample {
                        class_index,
                        now: Instant::now(),
                    },
                    Command::ToggleNoActionSampling => Msg::ToggleNoActionSampling,
                    Command::Quit => Msg::Quit,
                };
                if sender.send(msg).is_err() {
                    break;
                }
            }
        });
    }
}
