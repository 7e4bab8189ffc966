use std::error::Error;

/// Independent text outputs of the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DisplaySurface {
    /// Certainty label of the top prediction
    Certainty,
    /// Top class and the full confidence breakdown
    Predictions,
    /// No-action sampler counter and on/off state
    NoActionStatus,
}

impl DisplaySurface {
    pub const ALL: [DisplaySurface; 3] = [
        DisplaySurface::Certainty,
        DisplaySurface::Predictions,
        DisplaySurface::NoActionStatus,
    ];
}

pub trait DeviceDisplay: Send {
    fn init(&mut self) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// Replace the whole text of one surface.
    fn write(&mut self, surface: DisplaySurface, text: &str) -> Result<(), Box<dyn Error + Send + Sync>>;
}
