use serde::Serialize;

use crate::court::types::{CourtCoordinate, PixelPoint};
use crate::prediction::types::PredictionOutcome;
use crate::presenter::DisplayState;

/// Inputs to the click session loop.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    Click(PixelPoint),
    StatusRequested,
    /// Stop immediately; in-flight results are dropped.
    Stop,
    /// Accept no more clicks, present what is still in flight, then stop.
    Drain,
}

/// Everything the session pushes to whatever renders it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "update", rename_all = "snake_case")]
pub enum UiUpdate {
    /// A click was mapped and its request dispatched.
    CoordinateSelected { seq: u64, coordinate: CourtCoordinate },
    /// The current display was replaced by the outcome of request `seq`.
    Display { seq: u64, display: DisplayState },
    /// Request `seq` completed after a newer outcome was already shown.
    Discarded { seq: u64 },
    Status(StatusReport),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusReport {
    pub session_id: String,
    pub auth: String,
    pub display: Option<DisplayState>,
    pub dispatched: u64,
    pub accepted: u64,
    pub discarded: u64,
    pub in_flight: u64,
}

/// A finished prediction, tagged with the sequence number it was dispatched under.
#[derive(Debug)]
pub(crate) struct Completion {
    pub seq: u64,
    pub outcome: PredictionOutcome,
}
