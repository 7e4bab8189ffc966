use crate::config::Config;
use crate::feature_extractor::interface::Embedding;
use crate::knn_classifier::interface::Prediction;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Running,
    Stopped,
}

/// Automatic labeling of frames as "no action" once every class is trained.
#[derive(Debug, Clone, PartialEq)]
pub struct NoActionSampling {
    pub enabled: bool,
    pub sample_count: usize,
    /// Reference point for the sampling interval.
    pub last_sample_time: Instant,
}

/// Session context: everything the loop and the commands mutate.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub status: Status,
    /// Next class allowed to receive its first example.
    pub frontier: usize,
    pub example_count: usize,
    pub prediction: Option<Prediction>,
    pub no_action: NoActionSampling,
    pub error: Option<String>,
}

impl Model {
    pub fn new(config: &Config, now: Instant) -> Self {
        Self {
            status: Status::Running,
            frontier: 0,
            example_count: 0,
            prediction: None,
            no_action: NoActionSampling {
                enabled: config.no_action_sampling_enabled,
                sample_count: 0,
                last_sample_time: now,
            },
            error: None,
        }
    }
}

#[derive(Debug)]
pub enum Msg {
    Tick(Instant),
    AddExample {
        class_index: usize,
        now: Instant,
    },
    ToggleNoActionSampling,
    Quit,
    PredictDone {
        now: Instant,
        result: Result<(Embedding, Prediction), Box<dyn std::error::Error + Send + Sync>>,
    },
    ExampleAdded {
        class_index: usize,
        result: Result<(), Box<dyn std::error::Error + Send + Sync>>,
    },
    NoActionSampled(Result<(), Box<dyn std::error::Error + Send + Sync>>),
}

impl Msg {
    pub fn is_tick(&self) -> bool {
        matches!(self, Msg::Tick(_))
    }

    /// Messages produced every frame, too frequent to log.
    pub fn is_periodic(&self) -> bool {
        matches!(
            self,
            Msg::Tick(_) | Msg::PredictDone { result: Ok(_), .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    SubscribeTick,
    SubscribeCommands,
    Predict { now: Instant },
    AddExample { class_index: usize },
    AddNoActionExample { embedding: Embedding },
    StopCamera,
}

impl Effect {
    pub fn to_display_string(&self) -> String {
        match self {
            Effect::AddNoActionExample { embedding } => {
                format!("AddNoActionExample({} dimensions)", embedding.len())
            }
            effect => format!("{:?}", effect),
        }
    }
}

pub fn init(config: &Config, now: Instant) -> (Model, Vec<Effect>) {
    (
        Model::new(config, now),
        vec![Effect::SubscribeTick, Effect::SubscribeCommands],
    )
}

fn should_sample_no_action(config: &Config, model: &Model, now: Instant) -> bool {
    model.no_action.enabled
        && model.frontier >= config.class_labels.len()
        && now.saturating_duration_since(model.no_action.last_sample_time)
            >= config.no_action_sample_interval
}

pub fn transition(config: &Config, model: Model, msg: Msg) -> (Model, Vec<Effect>) {
    if model.status == Status::Stopped {
        return (model, vec![]);
    }

    match msg {
        Msg::Tick(now) => {
            if model.example_count == 0 {
                return (model, vec![]);
            }
            (model, vec![Effect::Predict { now }])
        }

        Msg::PredictDone {
            now,
            result: Ok((embedding, prediction)),
        } => {
            let mut model = Model {
                prediction: Some(prediction),
                error: None,
                ..model
            };

            if should_sample_no_action(config, &model, now) {
                model.no_action.last_sample_time = now;
                return (model, vec![Effect::AddNoActionExample { embedding }]);
            }

            (model, vec![])
        }
        Msg::PredictDone { result: Err(e), .. } => (
            Model {
                error: Some(e.to_string()),
                ..model
            },
            vec![],
        ),

        Msg::AddExample { class_index, now } => {
            // Classes are trained in order; skipping ahead is ignored.
            if class_index >= config.class_labels.len() || class_index > model.frontier {
                return (model, vec![]);
            }

            let mut model = model;
            model.no_action.last_sample_time = now;
            (model, vec![Effect::AddExample { class_index }])
        }
        Msg::ExampleAdded {
            class_index,
            result: Ok(()),
        } => {
            let mut model = model;
            model.example_count += 1;
            if class_index == model.frontier {
                model.frontier += 1;
            }
            (model, vec![])
        }
        Msg::ExampleAdded { result: Err(e), .. } => (
            Model {
                error: Some(e.to_string()),
                ..model
            },
            vec![],
        ),

        Msg::NoActionSampled(Ok(())) => {
            let mut model = model;
            model.example_count += 1;
            model.no_action.sample_count += 1;
            (model, vec![])
        }
        Msg::NoActionSampled(Err(e)) => (
            Model {
                error: Some(e.to_string()),
                ..model
            },
            vec![],
        ),

        Msg::ToggleNoActionSampling => {
            let mut model = model;
            model.no_action.enabled = !model.no_action.enabled;
            (model, vec![])
        }

        Msg::Quit => (
            Model {
                status: Status::Stopped,
                ..model
            },
            vec![Effect::StopCamera],
        ),
    }
}
