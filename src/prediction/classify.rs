//! Response → outcome classification, kept free of any HTTP client type.
//!
//! Precedence: no response → 401 → other non-2xx → 2xx body → local failure.
//! A 2xx is `Make` only when `prediction` is numerically equal to 1.
use crate::prediction::types::{PredictionErrorKind, PredictionOutcome, ShotLabel};

/// What came back from the wire, reduced to what classification needs.
#[derive(Debug, Clone, PartialEq)]
pub enum RawReply {
    /// A response arrived. `body` is `None` when it was not valid JSON.
    Received {
        status: u16,
        status_text: String,
        body: Option<serde_json::Value>,
    },
    /// The request was sent (or attempted) but no response arrived.
    NoResponse { detail: String },
    /// The request never left the client.
    LocalFailure { message: String },
}

pub fn classify(reply: RawReply) -> PredictionOutcome {
    match reply {
        RawReply::NoResponse { .. } => PredictionOutcome::error(PredictionErrorKind::NoResponse),
        RawReply::Received { status: 401, .. } => {
            PredictionOutcome::error(PredictionErrorKind::Unauthorized)
        }
        RawReply::Received {
            status,
            status_text,
            ..
        } if !(200..300).contains(&status) => {
            PredictionOutcome::error(PredictionErrorKind::ServerError {
                status,
                status_text,
            })
        }
        RawReply::Received { body, .. } => PredictionOutcome::success(label_from_body(body.as_ref())),
        RawReply::LocalFailure { message } => {
            PredictionOutcome::error(PredictionErrorKind::ClientError { message })
        }
    }
}

/// `prediction == 1` is a make; anything else, including a missing field, a
/// string `"1"` or `true`, is a miss.
pub fn label_from_body(body: Option<&serde_json::Value>) -> ShotLabel {
    let is_make = body
        .and_then(|b| b.get("prediction"))
        .and_then(serde_json::Value::as_f64)
        .is_some_and(|p| p == 1.0);
    if is_make {
        ShotLabel::Make
    } else {
        ShotLabel::Miss
    }
}
