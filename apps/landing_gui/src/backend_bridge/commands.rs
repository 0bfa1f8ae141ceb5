//! Backend commands queued from UI to backend worker.

use shared::domain::{SessionSlot, SubmissionId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCommand {
    Subscribe {
        slot: SessionSlot,
        submission_id: SubmissionId,
        email: String,
    },
    FetchGifs {
        urls: Vec<String>,
    },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Subscribe { .. } => "subscribe",
            Self::FetchGifs { .. } => "fetch_gifs",
        }
    }
}
