//! Display state for the latest outcome.
//!
//! `render` is pure; `ResultPresenter` holds exactly one current display and
//! replaces it in place. Tagged presentation drops outcomes older than the
//! newest one already shown, so a slow early request cannot overwrite a later one.
use serde::{Deserialize, Serialize};

use crate::prediction::types::{PredictionErrorKind, PredictionOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayStyle {
    Normal,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayState {
    pub text: String,
    pub style: DisplayStyle,
}

pub fn render(outcome: &PredictionOutcome) -> DisplayState {
    match outcome {
        PredictionOutcome::Success { label } => DisplayState {
            text: format!("Prediction: {label}"),
            style: DisplayStyle::Normal,
        },
        PredictionOutcome::Error { kind } => DisplayState {
            text: error_text(kind),
            style: DisplayStyle::Error,
        },
    }
}

fn error_text(kind: &PredictionErrorKind) -> String {
    match kind {
        PredictionErrorKind::Unauthorized => "Not Authorized".to_string(),
        PredictionErrorKind::NoResponse => "No response received from server".to_string(),
        PredictionErrorKind::ServerError {
            status,
            status_text,
        } => format!("Error: {status} {status_text}").trim_end().to_string(),
        PredictionErrorKind::ClientError { message } => message.clone(),
    }
}

#[derive(Debug, Default)]
pub struct ResultPresenter {
    current: Option<DisplayState>,
    /// Highest sequence number whose outcome has been shown.
    accepted_seq: Option<u64>,
}

impl ResultPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&DisplayState> {
        self.current.as_ref()
    }

    pub fn accepted_seq(&self) -> Option<u64> {
        self.accepted_seq
    }

    /// Unconditionally replaces the current display.
    pub fn present(&mut self, outcome: &PredictionOutcome) -> &DisplayState {
        self.current.insert(render(outcome))
    }

    /// Replaces the current display only if `seq` is not older than the last
    /// accepted outcome. Returns `false` for a stale outcome.
    pub fn present_tagged(&mut self, seq: u64, outcome: &PredictionOutcome) -> bool {
        if self.accepted_seq.is_some_and(|last| seq < last) {
            return false;
        }
        self.accepted_seq = Some(seq);
        self.present(outcome);
        true
    }
}
