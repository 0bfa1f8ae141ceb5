//! UI layer: app shell, page copy, layout selection and theme.

pub mod app;
pub mod copy;
pub mod layout;
pub mod theme;

pub use app::LandingApp;
