use std::fmt;

use serde::Serialize;

use crate::presenter::format_percentage;

/// One classification result for one submitted text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationOutcome {
    /// The predicted label, as returned by the service
    pub label: String,
    /// Probability of the label as a fraction in [0, 1]
    pub probability: f64,
}

impl ClassificationOutcome {
    pub fn new(label: impl Into<String>, probability: f64) -> Self {
        Self {
            label: label.into(),
            probability,
        }
    }
}

impl fmt::Display for ClassificationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Classification: {}, Probability: {}",
            self.label,
            format_percentage(self.probability)
        )
    }
}

/// Evaluation metrics reported after a successful retraining run.
///
/// All values are fractions in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RetrainMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
}

impl fmt::Display for RetrainMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Precision: {}, Recall: {}, F1 score: {}",
            format_percentage(self.precision),
            format_percentage(self.recall),
            format_percentage(self.f1_score)
        )
    }
}
