//! Per-form capture state machine: `Idle -> Submitting -> Succeeded -> Idle`, or
//! `Submitting -> Idle` on failure. Time is passed in so the owner decides how
//! the revert deadline is driven (a frame loop or a timer task).

use std::time::{Duration, Instant};

use shared::{
    domain::{validate_candidate_email, CaptureStatus, SessionSlot, SessionSnapshot},
    error::CaptureError,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitAdmission {
    /// Session moved to `Submitting`; `email` is the value to send.
    Accepted { email: String },
    /// A submission is already in flight for this session; nothing changed.
    InFlight,
}

#[derive(Debug, Clone)]
pub struct CaptureSession {
    slot: SessionSlot,
    input_value: String,
    status: CaptureStatus,
    revert_at: Option<Instant>,
    display_interval: Duration,
}

impl CaptureSession {
    pub fn new(slot: SessionSlot, display_interval: Duration) -> Self {
        Self {
            slot,
            input_value: String::new(),
            status: CaptureStatus::Idle,
            revert_at: None,
            display_interval,
        }
    }

    pub fn slot(&self) -> SessionSlot {
        self.slot
    }

    pub fn input_value(&self) -> &str {
        &self.input_value
    }

    /// Mutable access for text widgets that edit in place.
    pub fn input_mut(&mut self) -> &mut String {
        &mut self.input_value
    }

    pub fn status(&self) -> CaptureStatus {
        self.status
    }

    pub fn revert_at(&self) -> Option<Instant> {
        self.revert_at
    }

    pub fn is_in_flight(&self) -> bool {
        self.status == CaptureStatus::Submitting
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            slot: self.slot,
            input_value: self.input_value.clone(),
            status: self.status,
        }
    }

    pub fn update_input(&mut self, text: impl Into<String>) {
        self.input_value = text.into();
    }

    pub fn begin_submit(&mut self) -> Result<SubmitAdmission, CaptureError> {
        if self.is_in_flight() {
            return Ok(SubmitAdmission::InFlight);
        }
        validate_candidate_email(&self.input_value)?;

        self.status = CaptureStatus::Submitting;
        self.revert_at = None;
        Ok(SubmitAdmission::Accepted {
            email: self.input_value.clone(),
        })
    }

    /// Applies the outcome of the in-flight submission. Outside `Submitting` this
    /// is a no-op apart from handing the error back.
    pub fn finish(
        &mut self,
        outcome: Result<(), CaptureError>,
        now: Instant,
    ) -> Result<(), CaptureError> {
        if !self.is_in_flight() {
            return outcome;
        }
        match outcome {
            Ok(()) => {
                self.input_value.clear();
                self.status = CaptureStatus::Succeeded;
                self.revert_at = Some(now + self.display_interval);
                Ok(())
            }
            Err(err) => {
                self.status = CaptureStatus::Idle;
                self.revert_at = None;
                Err(err)
            }
        }
    }

    /// Returns true when the success display expired and the session went back to `Idle`.
    pub fn poll_revert(&mut self, now: Instant) -> bool {
        match (self.status, self.revert_at) {
            (CaptureStatus::Succeeded, Some(deadline)) if now >= deadline => {
                self.status = CaptureStatus::Idle;
                self.revert_at = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
