//! Email capture flow for the landing page: per-form state machine, the hosted
//! form endpoint, and the controller that ties both capture sessions together.

pub mod config;
pub mod controller;
pub mod endpoint;
pub mod session;

pub use config::{load_settings, load_settings_from, EndpointSettings, SettingsError};
pub use controller::{CaptureEvent, SubmitOutcome, SubscriptionFormController};
pub use endpoint::{FormEndpointClient, SubscriptionEndpoint};
pub use session::{CaptureSession, SubmitAdmission};
