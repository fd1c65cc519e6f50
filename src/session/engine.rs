use std::sync::Arc;

use tokio::sync::mpsc;

use crate::auth::authenticator::SessionAuthenticator;
use crate::court::mapper::CoordinateMapper;
use crate::court::types::{PixelPoint, RenderSurfaceSpec};
use crate::features::vector::FeatureVectorBuilder;
use crate::prediction::client::{PredictionService, NON_FINITE_MESSAGE};
use crate::prediction::types::{PredictionErrorKind, PredictionOutcome};
use crate::presenter::ResultPresenter;
use crate::session::state::{Completion, SessionEvent, StatusReport, UiUpdate};

/// Handle given to the input side so it can drive the session and observe it.
pub struct SessionHandle {
    pub tx: mpsc::Sender<SessionEvent>,
    pub ui_rx: mpsc::UnboundedReceiver<UiUpdate>,
}

/// Click → coordinate → feature vector → prediction → display loop.
///
/// Clicks are handled without waiting on the network: each one is mapped and
/// built synchronously, then its request runs on its own task. Completions
/// come back through a channel and are presented in the loop, newest-wins.
pub struct ClickSession {
    session_id: String,
    surface: RenderSurfaceSpec,
    mapper: CoordinateMapper,
    builder: FeatureVectorBuilder,
    auth: SessionAuthenticator,
    service: Arc<dyn PredictionService>,
    presenter: ResultPresenter,

    event_rx: mpsc::Receiver<SessionEvent>,
    completion_tx: mpsc::UnboundedSender<Completion>,
    completion_rx: mpsc::UnboundedReceiver<Completion>,
    ui_tx: mpsc::UnboundedSender<UiUpdate>,

    // ── Counters ──────────────────────────────────────────────────────────
    next_seq: u64,
    completed: u64,
    accepted: u64,
    discarded: u64,
}

impl ClickSession {
    pub fn new(
        surface: RenderSurfaceSpec,
        auth: SessionAuthenticator,
        service: Arc<dyn PredictionService>,
    ) -> (Self, SessionHandle) {
        let (event_tx, event_rx) = mpsc::channel::<SessionEvent>(32);
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        let (ui_tx, ui_rx) = mpsc::unbounded_channel();

        let session = Self {
            session_id: uuid::Uuid::new_v4().to_string(),
            surface,
            mapper: CoordinateMapper::default(),
            builder: FeatureVectorBuilder::default(),
            auth,
            service,
            presenter: ResultPresenter::new(),
            event_rx,
            completion_tx,
            completion_rx,
            ui_tx,
            next_seq: 1,
            completed: 0,
            accepted: 0,
            discarded: 0,
        };
        (session, SessionHandle { tx: event_tx, ui_rx })
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub async fn run_loop(&mut self) {
        tracing::info!(session_id = %self.session_id, "click session started");
        let mut draining = false;
        loop {
            tokio::select! {
                biased;

                // The loop owns a sender, so this arm never sees a closed channel.
                Some(completion) = self.completion_rx.recv() => {
                    self.on_completion(completion);
                    if draining && self.in_flight() == 0 {
                        break;
                    }
                }

                event = self.event_rx.recv() => match event {
                    Some(SessionEvent::Click(_)) if draining => {
                        tracing::debug!("click ignored while draining");
                    }
                    Some(SessionEvent::Click(point)) => self.dispatch(point).await,
                    Some(SessionEvent::StatusRequested) => self.report_status().await,
                    Some(SessionEvent::Drain) => {
                        if self.in_flight() == 0 {
                            break;
                        }
                        tracing::info!(in_flight = self.in_flight(), "draining in-flight predictions");
                        draining = true;
                    }
                    Some(SessionEvent::Stop) | None => break,
                },
            }
        }
        tracing::info!(
            session_id = %self.session_id,
            in_flight = self.in_flight(),
            "click session stopped"
        );
    }

    async fn dispatch(&mut self, point: PixelPoint) {
        let seq = self.next_seq;
        self.next_seq += 1;

        let coordinate = self.mapper.map(point, self.surface);
        let vector = self.builder.build(coordinate);
        let token = self.auth.token().await;

        tracing::info!(
            seq,
            px = point.px,
            py = point.py,
            x = coordinate.x,
            y = coordinate.y,
            on_court = self.mapper.frame().contains(coordinate),
            authenticated = token.is_some(),
            "click dispatched"
        );
        let _ = self.ui_tx.send(UiUpdate::CoordinateSelected { seq, coordinate });

        if !vector.is_finite() {
            tracing::warn!(seq, "click position overflows the feature range; not sent");
            let outcome = PredictionOutcome::error(PredictionErrorKind::ClientError {
                message: NON_FINITE_MESSAGE.to_string(),
            });
            let _ = self.completion_tx.send(Completion { seq, outcome });
            return;
        }

        let service = self.service.clone();
        let completion_tx = self.completion_tx.clone();
        tokio::spawn(async move {
            let outcome = service.predict(&vector, token.as_ref()).await;
            if completion_tx.send(Completion { seq, outcome }).is_err() {
                tracing::debug!(seq, "session gone before prediction completed");
            }
        });
    }

    fn on_completion(&mut self, completion: Completion) {
        let Completion { seq, outcome } = completion;
        self.completed += 1;

        if !self.presenter.present_tagged(seq, &outcome) {
            self.discarded += 1;
            tracing::warn!(
                seq,
                newest = ?self.presenter.accepted_seq(),
                "stale prediction discarded"
            );
            let _ = self.ui_tx.send(UiUpdate::Discarded { seq });
            return;
        }

        self.accepted += 1;
        if let Some(shown) = self.presenter.current() {
            tracing::debug!(seq, text = %shown.text, "display updated");
            let _ = self.ui_tx.send(UiUpdate::Display {
                seq,
                display: shown.clone(),
            });
        }
    }

    async fn report_status(&self) {
        let report = StatusReport {
            session_id: self.session_id.clone(),
            auth: self.auth.state().await.label().to_string(),
            display: self.presenter.current().cloned(),
            dispatched: self.next_seq - 1,
            accepted: self.accepted,
            discarded: self.discarded,
            in_flight: self.in_flight(),
        };
        let _ = self.ui_tx.send(UiUpdate::Status(report));
    }

    fn in_flight(&self) -> u64 {
        (self.next_seq - 1) - self.completed
    }
}
