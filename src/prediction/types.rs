use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShotLabel {
    Make,
    Miss,
}

impl ShotLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShotLabel::Make => "Make",
            ShotLabel::Miss => "Miss",
        }
    }
}

impl std::fmt::Display for ShotLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PredictionErrorKind {
    /// The service answered 401.
    Unauthorized,
    /// The request went out but no response came back (refused, reset, timeout).
    NoResponse,
    /// Any other non-2xx answer.
    ServerError { status: u16, status_text: String },
    /// The request could not be built or sent.
    ClientError { message: String },
}

/// Classified result of one prediction attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PredictionOutcome {
    Success { label: ShotLabel },
    Error { kind: PredictionErrorKind },
}

impl PredictionOutcome {
    pub fn success(label: ShotLabel) -> Self {
        PredictionOutcome::Success { label }
    }

    pub fn error(kind: PredictionErrorKind) -> Self {
        PredictionOutcome::Error { kind }
    }
}
