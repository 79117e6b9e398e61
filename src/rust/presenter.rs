//! Maps raw service responses onto [`ClassificationOutcome`] and
//! [`RetrainMetrics`], and formats them for display.
//!
//! Probabilities stay fractions in the view models; turning them into
//! percentages happens only here, at render time.

use serde_json::{Map, Value};

use crate::models::{ClassificationOutcome, RetrainMetrics};

/// Key names a classification outcome may use for its two fields.
#[derive(Debug, Clone, Copy)]
struct OutcomeKeys {
    label: &'static str,
    probability: &'static str,
}

/// English scheme first, then the Spanish one older servers send.
const OUTCOME_KEY_SETS: &[OutcomeKeys] = &[
    OutcomeKeys {
        label: "label",
        probability: "probability",
    },
    OutcomeKeys {
        label: "etiqueta",
        probability: "probabilidad",
    },
];

const F1_KEYS: &[&str] = &["f1_score", "f1"];

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PresentError {
    /// The body does not have any shape we know how to read
    #[error("Malformed response: {0}")]
    Malformed(String),
    /// The body is well formed but reports a failure from the service
    #[error("{0}")]
    Application(String),
}

/// Normalizes a classify response into an ordered list of outcomes.
///
/// A single object becomes a one-element list, so callers always have one
/// rendering path. Each element must match one of the known key sets.
///
/// # Example
/// ```
/// use sdg_classify::presenter::normalize_predictions;
/// use serde_json::json;
///
/// let single = normalize_predictions(&json!({"label": "ODS 6", "probability": 0.8}))?;
/// let list = normalize_predictions(&json!([{"etiqueta": "ODS 6", "probabilidad": 0.8}]))?;
/// assert_eq!(single, list);
/// # Ok::<(), sdg_classify::presenter::PresentError>(())
/// ```
pub fn normalize_predictions(body: &Value) -> Result<Vec<ClassificationOutcome>, PresentError> {
    match body {
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                parse_outcome(item).map_err(|e| match e {
                    PresentError::Malformed(msg) => {
                        PresentError::Malformed(format!("item {}: {}", i + 1, msg))
                    }
                    other => other,
                })
            })
            .collect(),
        Value::Object(fields) => {
            if let Some(message) = error_message(fields) {
                return Err(PresentError::Application(message));
            }
            parse_outcome(body).map(|outcome| vec![outcome])
        }
        other => Err(PresentError::Malformed(format!(
            "expected an object or a list, got {}",
            value_kind(other)
        ))),
    }
}

fn parse_outcome(item: &Value) -> Result<ClassificationOutcome, PresentError> {
    let fields = item.as_object().ok_or_else(|| {
        PresentError::Malformed(format!("expected an object, got {}", value_kind(item)))
    })?;

    let keys = OUTCOME_KEY_SETS
        .iter()
        .find(|keys| fields.contains_key(keys.label) && fields.contains_key(keys.probability))
        .ok_or_else(|| {
            let found: Vec<&str> = fields.keys().map(String::as_str).collect();
            PresentError::Malformed(format!(
                "no label/probability fields (found: {})",
                found.join(", ")
            ))
        })?;

    let label = match &fields[keys.label] {
        Value::String(label) => label.clone(),
        other => {
            return Err(PresentError::Malformed(format!(
                "'{}' must be a string, got {}",
                keys.label,
                value_kind(other)
            )))
        }
    };
    let probability = fraction(fields, keys.probability)?;

    Ok(ClassificationOutcome { label, probability })
}

/// Interprets a retrain response body.
///
/// An `error` field wins over everything else, even when the transport
/// reported success.
pub fn interpret_retrain(body: &Value) -> Result<RetrainMetrics, PresentError> {
    let fields = body.as_object().ok_or_else(|| {
        PresentError::Malformed(format!("expected an object, got {}", value_kind(body)))
    })?;

    if let Some(message) = error_message(fields) {
        return Err(PresentError::Application(message));
    }

    let f1_key = F1_KEYS
        .iter()
        .copied()
        .find(|key| fields.contains_key(*key))
        .unwrap_or(F1_KEYS[0]);

    Ok(RetrainMetrics {
        precision: fraction(fields, "precision")?,
        recall: fraction(fields, "recall")?,
        f1_score: fraction(fields, f1_key)?,
    })
}

/// Extracts a server-supplied error message, if the body carries one.
pub(crate) fn error_message(fields: &Map<String, Value>) -> Option<String> {
    match fields.get("error")? {
        Value::Null => None,
        Value::String(message) => Some(message.clone()),
        other => Some(other.to_string()),
    }
}

fn fraction(fields: &Map<String, Value>, key: &str) -> Result<f64, PresentError> {
    let value = fields
        .get(key)
        .ok_or_else(|| PresentError::Malformed(format!("missing '{}'", key)))?;
    let number = value.as_f64().ok_or_else(|| {
        PresentError::Malformed(format!("'{}' must be a number, got {}", key, value_kind(value)))
    })?;
    if !(0.0..=1.0).contains(&number) {
        return Err(PresentError::Malformed(format!(
            "'{}' must be between 0 and 1, got {}",
            key, number
        )));
    }
    Ok(number)
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

/// Renders a fraction as a percentage with two decimals, e.g. `0.91` -> `91.00%`.
pub fn format_percentage(fraction: f64) -> String {
    format!("{:.2}%", fraction * 100.0)
}

/// One display line per outcome, in order.
pub fn describe_outcomes(outcomes: &[ClassificationOutcome]) -> Vec<String> {
    outcomes.iter().map(ToString::to_string).collect()
}

pub fn describe_metrics(metrics: &RetrainMetrics) -> Vec<String> {
    vec![
        format!("Precision: {}", format_percentage(metrics.precision)),
        format!("Recall: {}", format_percentage(metrics.recall)),
        format!("F1 score: {}", format_percentage(metrics.f1_score)),
    ]
}
