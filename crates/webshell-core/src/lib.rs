//! WebShell Core
//!
//! Engine-independent control surface for the single-page browser shell.
//! The host owns the window and the webview; this crate owns the session and
//! decides what every lifecycle, navigation and back event means.

mod config;
mod controller;
mod error;
mod session;
mod state;
mod surface;

pub use config::ShellConfig;
pub use controller::{BackOutcome, EventOutcome, ShellController, ShellEvent};
pub use error::CoreError;
pub use session::ShellSession;
pub use state::SessionState;
pub use surface::{BrowserSurface, LoadingIndicator, SurfaceSettings};

// Re-export navigation components
pub use webshell_navigation::{HistoryStack, NavigationDecision, NavigationError, NavigationPolicy};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}
