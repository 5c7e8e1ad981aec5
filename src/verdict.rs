//! Detection-score interpretation.
//!
//! The detection model replies with a bare number between 0 and 100. This
//! module owns the parsing fallback, the clamp, and the thresholds that turn
//! that number into the qualitative verdict printed on reports. Keeping the
//! thresholds here means the renderer and any transport layer agree on what
//! a given score is called.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Score assumed when the model reply cannot be parsed as a number.
const FALLBACK_SCORE: f64 = 50.0;

/// AI-likelihood score, clamped to `[0, 100]`.
///
/// Construction always clamps, so a `Score` in hand is guaranteed to be in
/// range. The human share is derived, never stored, so the two percentages
/// printed on a report always sum to 100.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct Score(f64);

impl Score {
    /// Clamp `value` into `[0, 100]`. Non-numeric input (NaN) falls back to
    /// the midpoint, same as an unparseable model reply.
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self(FALLBACK_SCORE);
        }
        Self(value.clamp(0.0, 100.0))
    }

    /// Parse a raw model reply into a score.
    ///
    /// The reply is trimmed and parsed as a float; anything unparseable
    /// falls back to 50 rather than failing the request, then the usual
    /// clamp applies.
    pub fn parse_model_reply(reply: &str) -> Self {
        match reply.trim().parse::<f64>() {
            Ok(value) => Self::new(value),
            Err(_) => Self(FALLBACK_SCORE),
        }
    }

    /// AI-likelihood percentage in `[0, 100]`.
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Complementary human-written percentage.
    pub fn human(&self) -> f64 {
        100.0 - self.0
    }

    /// Qualitative verdict for this score.
    pub fn label(&self) -> Label {
        if self.0 < 30.0 {
            Label::HumanWritten
        } else if self.0 >= 70.0 {
            Label::AiGenerated
        } else {
            Label::Mixed
        }
    }

    /// How decisive the verdict is. Scores inside `[30, 70]` sit in the
    /// model's uncertain band.
    pub fn confidence(&self) -> Confidence {
        if self.0 < 30.0 || self.0 > 70.0 {
            Confidence::High
        } else {
            Confidence::Medium
        }
    }
}

impl From<f64> for Score {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<Score> for f64 {
    fn from(score: Score) -> Self {
        score.0
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.0}", self.0)
    }
}

/// Qualitative verdict bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Label {
    /// Score below 30.
    HumanWritten,
    /// Score in `[30, 70)`.
    Mixed,
    /// Score of 70 or above.
    AiGenerated,
}

impl Label {
    /// Display string used verbatim on reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::HumanWritten => "Human-Written",
            Label::Mixed => "Mixed/Uncertain",
            Label::AiGenerated => "AI-Generated",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decisiveness of a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    High,
    Medium,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::High => "High",
            Confidence::Medium => "Medium",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
