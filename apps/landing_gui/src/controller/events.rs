//! Events flowing from the backend worker back to the UI thread.

use shared::{
    domain::{SessionSlot, SubmissionId},
    error::CaptureError,
};

use crate::media::DecodedGif;

pub enum UiEvent {
    Info(String),
    SubscribeFinished {
        slot: SessionSlot,
        submission_id: SubmissionId,
        outcome: Result<(), CaptureError>,
    },
    GifLoaded {
        url: String,
        gif: DecodedGif,
    },
    GifFailed {
        url: String,
        reason: String,
    },
    /// The worker could not start; submissions will fail until restart.
    BackendUnavailable(String),
}
