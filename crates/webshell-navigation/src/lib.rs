//! WebShell Navigation
//!
//! Decides which navigations stay inside the shell and keeps a mirror of the
//! surface's session history:
//! - No allow-list → every navigation is delegated to the engine
//! - Allow-list → foreign origins are intercepted and handed to the host
//! - History mirror → answers `can_go_back` for engines that don't expose it

mod error;
mod history;
mod policy;

pub use error::NavigationError;
pub use history::HistoryStack;
pub use policy::{NavigationDecision, NavigationPolicy};

pub type Result<T> = std::result::Result<T, NavigationError>;
