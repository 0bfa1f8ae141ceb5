use std::{sync::Arc, time::Duration};

use chrono::Utc;
use shared::{
    domain::{CaptureStatus, SessionSlot, SessionSnapshot, SubmissionId, SubmitReport},
    error::CaptureError,
};
use tokio::{
    sync::{broadcast, Mutex},
    time::Instant,
};
use tracing::{debug, info, warn};

use crate::{
    endpoint::SubscriptionEndpoint,
    session::{CaptureSession, SubmitAdmission},
};

const EVENT_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureEvent {
    StatusChanged {
        slot: SessionSlot,
        status: CaptureStatus,
    },
    /// Raised for every validation or submission error; front ends show it as a blocking alert.
    Alert {
        slot: SessionSlot,
        error: CaptureError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Subscribed(SubmitReport),
    /// The session already had a submission in flight.
    Ignored,
}

/// Owns both capture sessions. Each session has its own lock and no lock is held
/// while the endpoint call is pending, so the sessions never block each other.
pub struct SubscriptionFormController {
    sessions: [Mutex<CaptureSession>; 2],
    endpoint: Arc<dyn SubscriptionEndpoint>,
    events: broadcast::Sender<CaptureEvent>,
}

impl SubscriptionFormController {
    pub fn new(endpoint: Arc<dyn SubscriptionEndpoint>, display_interval: Duration) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            sessions: SessionSlot::ALL
                .map(|slot| Mutex::new(CaptureSession::new(slot, display_interval))),
            endpoint,
            events,
        }
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<CaptureEvent> {
        self.events.subscribe()
    }

    fn session(&self, slot: SessionSlot) -> &Mutex<CaptureSession> {
        &self.sessions[slot.index()]
    }

    fn emit(&self, event: CaptureEvent) {
        let _ = self.events.send(event);
    }

    pub async fn update_input(&self, slot: SessionSlot, text: impl Into<String>) {
        self.session(slot).lock().await.update_input(text);
    }

    pub async fn snapshot(&self, slot: SessionSlot) -> SessionSnapshot {
        self.session(slot).lock().await.snapshot()
    }

    pub async fn submit(self: &Arc<Self>, slot: SessionSlot) -> Result<SubmitOutcome, CaptureError> {
        let admission = self.session(slot).lock().await.begin_submit();
        let email = match admission {
            Ok(SubmitAdmission::Accepted { email }) => email,
            Ok(SubmitAdmission::InFlight) => {
                debug!(%slot, "submit ignored; submission already in flight");
                return Ok(SubmitOutcome::Ignored);
            }
            Err(err) => {
                warn!(%slot, detail = err.detail(), "capture input rejected");
                self.emit(CaptureEvent::Alert {
                    slot,
                    error: err.clone(),
                });
                return Err(err);
            }
        };

        let submission_id = SubmissionId::new();
        self.emit(CaptureEvent::StatusChanged {
            slot,
            status: CaptureStatus::Submitting,
        });
        info!(%slot, %submission_id, "submitting capture session");

        let outcome = self.endpoint.subscribe(&email).await;

        let finished = {
            let mut session = self.session(slot).lock().await;
            let finished = session.finish(outcome, Instant::now().into_std());
            self.emit(CaptureEvent::StatusChanged {
                slot,
                status: session.status(),
            });
            finished
        };

        match finished {
            Ok(()) => {
                info!(%slot, %submission_id, "capture session subscribed");
                self.schedule_revert(slot);
                Ok(SubmitOutcome::Subscribed(SubmitReport {
                    slot,
                    submission_id,
                    completed_at: Utc::now(),
                }))
            }
            Err(err) => {
                warn!(%slot, %submission_id, detail = err.detail(), "capture submission failed");
                self.emit(CaptureEvent::Alert {
                    slot,
                    error: err.clone(),
                });
                Err(err)
            }
        }
    }

    fn schedule_revert(self: &Arc<Self>, slot: SessionSlot) {
        let controller = Arc::clone(self);
        tokio::spawn(async move {
            let deadline = controller.session(slot).lock().await.revert_at();
            let Some(deadline) = deadline else {
                return;
            };
            tokio::time::sleep_until(Instant::from_std(deadline)).await;
            let reverted = controller
                .session(slot)
                .lock()
                .await
                .poll_revert(Instant::now().into_std());
            if reverted {
                debug!(%slot, "success display expired");
                controller.emit(CaptureEvent::StatusChanged {
                    slot,
                    status: CaptureStatus::Idle,
                });
            }
        });
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
