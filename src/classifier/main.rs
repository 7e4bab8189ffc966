use crate::classifier::core::{init, transition, Effect, Model, Msg, Status};
use crate::classifier::render::Render;
use crate::classifier::run_effect::RunEffect;
use crate::config::Config;
use crate::device_camera::interface::DeviceCamera;
use crate::device_display::interface::DeviceDisplay;
use crate::device_input::interface::DeviceInput;
use crate::feature_extractor::interface::FeatureExtractor;
use crate::knn_classifier::interface::KnnClassifier;
use crate::library::logger::interface::Logger;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::time::Instant;

/// The classification loop. All state changes happen on the thread that
/// calls [`ClassifierApp::run`]; ticks and commands only queue messages.
pub struct ClassifierApp {
    config: Config,
    logger: Arc<dyn Logger + Send + Sync>,
    device_camera: Arc<dyn DeviceCamera + Send + Sync>,
    model: Model,
    run_effect: RunEffect,
    render: Render,
    msg_sender: Sender<Msg>,
    msg_receiver: Receiver<Msg>,
    tick_pending: Arc<AtomicBool>,
}

impl ClassifierApp {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: Config,
        logger: Arc<dyn Logger + Send + Sync>,
        device_camera: Arc<dyn DeviceCamera + Send + Sync>,
        device_input: Arc<dyn DeviceInput + Send + Sync>,
        device_display: Box<dyn DeviceDisplay>,
        feature_extractor: Box<dyn FeatureExtractor + Send>,
        knn_classifier: Box<dyn KnnClassifier + Send>,
    ) -> Self {
        let logger = logger.with_namespace("classifier");
        let (msg_sender, msg_receiver) = channel();
        let tick_pending = Arc::new(AtomicBool::new(false));

        let run_effect = RunEffect::new(
            config.clone(),
            logger.clone(),
            device_camera.clone(),
            device_input,
            feature_extractor,
            knn_classifier,
            msg_sender.clone(),
            Arc::clone(&tick_pending),
        );
        let render = Render::new(config.clone(), device_display);

        Self {
            model: Model::new(&config, Instant::now()),
            config,
            logger,
            device_camera,
            run_effect,
            render,
            msg_sender,
            msg_receiver,
            tick_pending,
        }
    }

    #[cfg(test)]
    pub fn model(&self) -> &Model {
        &self.model
    }

    #[cfg(test)]
    pub fn knn_classifier(&self) -> &dyn KnnClassifier {
        self.run_effect.knn_classifier()
    }

    /// Sender for feeding messages from outside the loop.
    pub fn sender(&self) -> Sender<Msg> {
        self.msg_sender.clone()
    }

    /// Starts the camera, subscribes to ticks and commands, then handles
    /// messages until a quit command arrives. A camera that fails to start
    /// aborts the run.
    pub fn run(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.device_camera.start()?;
        self.render.init()?;

        let (model, effects) = init(&self.config, Instant::now());
        self.model = model;
        self.run_effects(effects)?;

        while self.model.status == Status::Running {
            let msg = self.msg_receiver.recv()?;
            self.dispatch(msg)?;
        }

        self.logger.info("Stopped")?;
        Ok(())
    }

    /// Handles one message and, before returning, every message its effects
    /// produce.
    pub fn dispatch(&mut self, msg: Msg) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut queue = VecDeque::from([msg]);

        while let Some(msg) = queue.pop_front() {
            if msg.is_tick() {
                self.tick_pending.store(false, Ordering::SeqCst);
            }
            if !msg.is_periodic() {
                self.logger.info(&format!("Handling msg: {:?}", msg))?;
            }

            let (model, effects) = transition(&self.config, self.model.clone(), msg);

            if model.error.is_some() && model.error != self.model.error {
                self.logger
                    .error(model.error.as_deref().unwrap_or_default())?;
            }
            self.model = model;

            self.render.render(&self.model)?;

            for effect in effects {
                if let Some(msg) = self.run_effect.run_effect(effect) {
                    queue.push_back(msg);
                }
            }
        }

        Ok(())
    }

    fn run_effects(&mut self, effects: Vec<Effect>) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        for effect in effects {
            if let Some(msg) = self.run_effect.run_effect(effect) {
                self.dispatch(msg)?;
            }
        }
        Ok(())
    }
}
