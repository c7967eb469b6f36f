//! Seams between the controller and the embedding engine.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::Result;

/// Capability flags applied when the surface is constructed.
///
/// Both default to enabled: the hosted page needs script and DOM storage, and
/// the shell only ever loads its own operator-controlled origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SurfaceSettings {
    #[serde(default = "enabled")]
    pub javascript_enabled: bool,
    #[serde(default = "enabled")]
    pub dom_storage_enabled: bool,
}

fn enabled() -> bool {
    true
}

impl Default for SurfaceSettings {
    fn default() -> Self {
        Self {
            javascript_enabled: true,
            dom_storage_enabled: true,
        }
    }
}

/// An embedded browser surface.
///
/// All methods are called from the host UI thread. After [`dispose`](Self::dispose)
/// the controller never calls into the surface again.
pub trait BrowserSurface {
    /// Start a navigation to `url`
    fn load_url(&mut self, url: &Url) -> Result<()>;

    /// Whether the surface's session history has an entry behind the current one
    fn can_go_back(&self) -> bool;

    /// Traverse one history entry back
    fn go_back(&mut self) -> Result<()>;

    /// Release the surface, halting any in-flight navigation
    fn dispose(&mut self);
}

/// The view shown over the surface while a page is loading.
pub trait LoadingIndicator {
    fn set_visible(&mut self, visible: bool);
}
