use std::fmt;

/// Discrete certainty levels shown for the top prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Certainty {
    Uncertain,
    LeastCertainty,
    LowCertainty,
    MediumCertainty,
    HighCertainty,
    SuperCertain,
}

impl Certainty {
    /// Upper bounds of the half-open buckets, lowest first. A value sits in
    /// the first bucket whose bound it does not exceed; exactly `0.0` is
    /// `Uncertain` on its own.
    const BUCKETS: [(f32, Certainty); 5] = [
        (0.2, Certainty::LeastCertainty),
        (0.4, Certainty::LowCertainty),
        (0.6, Certainty::MediumCertainty),
        (0.8, Certainty::HighCertainty),
        (1.0, Certainty::SuperCertain),
    ];

    /// `None` for anything outside `[0, 1]`, NaN included.
    pub fn from_confidence(confidence: f32) -> Option<Self> {
        if confidence == 0.0 {
            return Some(Certainty::Uncertain);
        }
        if !(confidence > 0.0 && confidence <= 1.0) {
            return None;
        }
        Self::BUCKETS
            .iter()
            .find(|(upper, _)| confidence <= *upper)
            .map(|(_, certainty)| *certainty)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Certainty::Uncertain => "UNCERTAIN",
            Certainty::LeastCertainty => "LEAST_CERTAINTY",
            Certainty::LowCertainty => "LOW_CERTAINTY",
            Certainty::MediumCertainty => "MEDIUM_CERTAINTY",
            Certainty::HighCertainty => "HIGH_CERTAINTY",
            Certainty::SuperCertain => "SUPER_CERTAIN",
        }
    }
}

impl fmt::Display for Certainty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Text for the certainty surface. `None` leaves the label empty.
pub fn certainty_text(certainty: Option<Certainty>) -> String {
    format!(
        "PREDICTION CERTAINTY: {}",
        certainty.map(|c| c.label()).unwrap_or("")
    )
}

/// Out of range confidences leave the label empty.
pub fn report_certainty(confidence: f32) -> String {
    certainty_text(Certainty::from_confidence(confidence))
}
