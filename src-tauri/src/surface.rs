//! Tauri implementation of the browser surface
//!
//! On desktop the surface is a full-size child webview of the main window; on
//! mobile, where a window holds exactly one webview, it is the main webview
//! window itself.
//!
//! Back requests reach the shell as a navigation to `webshell://back`, issued
//! by [`BACK_BRIDGE_SCRIPT`] from the keyboard/mouse back buttons and from the
//! Android back button. The page attaches its own `navigation.canGoBack` when
//! the engine supports the Navigation API; otherwise the history mirror answers.

use parking_lot::Mutex;
use std::sync::Arc;
use tauri::webview::PageLoadEvent;
use tauri::{AppHandle, Manager, WebviewUrl};
use tauri_plugin_opener::OpenerExt;
use url::Url;

#[cfg(desktop)]
use tauri::webview::WebviewBuilder;
#[cfg(desktop)]
use tauri::{LogicalPosition, LogicalSize, Webview, Window};
#[cfg(mobile)]
use tauri::{WebviewWindow, WebviewWindowBuilder};

use crate::state::ShellState;
use webshell_core::{
    BrowserSurface, CoreError, HistoryStack, NavigationPolicy, Result, SurfaceSettings,
};

pub const CONTENT_WEBVIEW: &str = "content";

const BACK_REQUEST_SCHEME: &str = "webshell";
const BACK_REQUEST_HOST: &str = "back";

/// Turns platform back triggers into a `webshell://back` navigation.
pub const BACK_BRIDGE_SCRIPT: &str = r#"
(() => {
  if (window.__webshellBackBridge) return;
  window.__webshellBackBridge = true;

  const requestBack = () => {
    let query = '';
    const nav = window.navigation;
    if (nav && typeof nav.canGoBack === 'boolean') {
      query = '?can_go_back=' + nav.canGoBack;
    }
    window.location.assign('webshell://back' + query);
  };

  window.addEventListener('keydown', (event) => {
    if (event.key === 'BrowserBack' || (event.altKey && event.key === 'ArrowLeft')) {
      event.preventDefault();
      requestBack();
    }
  }, true);

  window.addEventListener('mouseup', (event) => {
    if (event.button === 3) {
      event.preventDefault();
      requestBack();
    }
  }, true);

  // Android: a registered back-button listener replaces the default close-on-back
  const internals = window.__TAURI_INTERNALS__;
  if (internals && typeof internals.transformCallback === 'function') {
    const id = internals.transformCallback((payload) => {
      if (payload && payload.end) return;
      requestBack();
    });
    internals
      .invoke('plugin:app|register_listener', { event: 'back-button', handler: '__CHANNEL__:' + id })
      .catch(() => {});
  }
})();
"#;

/// A back request decoded from a `webshell://back` navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackRequest {
    /// The engine's own answer, when the page could read it
    pub engine_can_go_back: Option<bool>,
}

impl BackRequest {
    pub fn from_url(url: &Url) -> Option<Self> {
        if url.scheme() != BACK_REQUEST_SCHEME || url.host_str() != Some(BACK_REQUEST_HOST) {
            return None;
        }

        let engine_can_go_back = url
            .query_pairs()
            .find(|(key, _)| key == "can_go_back")
            .and_then(|(_, value)| match value.as_ref() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            });

        Some(Self { engine_can_go_back })
    }
}

fn surface_error(e: tauri::Error) -> CoreError {
    CoreError::Surface(e.to_string())
}

/// Loads of the placeholder page the webview is created on.
fn is_internal(url: &Url) -> bool {
    matches!(url.scheme(), "about" | "tauri")
}

fn blank_url() -> Result<Url> {
    "about:blank"
        .parse()
        .map_err(|e: url::ParseError| CoreError::Surface(e.to_string()))
}

/// The engine's answer wins; the mirror, settled first, covers engines
/// without the Navigation API.
fn resolve_can_go_back(engine: Option<bool>, history: &mut HistoryStack) -> bool {
    history.reconcile();
    engine.unwrap_or_else(|| history.can_go_back())
}

/// Callbacks shared by the webview's navigation and page-load hooks.
struct Hooks {
    app: AppHandle,
    policy: Arc<NavigationPolicy>,
    history: Arc<Mutex<HistoryStack>>,
    engine_can_go_back: Arc<Mutex<Option<bool>>>,
}

impl Hooks {
    fn on_navigation(&self, url: &Url) -> bool {
        if let Some(request) = BackRequest::from_url(url) {
            *self.engine_can_go_back.lock() = request.engine_can_go_back;

            // Leave the engine callback before touching the surface again
            let handle = self.app.clone();
            let posted = self.app.run_on_main_thread(move || {
                if let Some(state) = handle.try_state::<ShellState>() {
                    state.back_requested(&handle);
                }
            });
            if let Err(e) = posted {
                tracing::warn!(error = %e, "Failed to dispatch back request");
            }
            return false;
        }

        if !self.policy.decide(url).intercepts() {
            return true;
        }

        tracing::info!(url = %url, "Navigation intercepted; opening in system browser");
        if let Err(e) = self.app.opener().open_url(url.as_str(), None::<&str>) {
            tracing::warn!(url = %url, error = %e, "Failed to open external URL");
        }
        false
    }

    fn on_page_load(&self, url: &Url, event: PageLoadEvent) {
        if is_internal(url) {
            return;
        }

        if let PageLoadEvent::Started = event {
            self.history.lock().record_start(url);
        }

        let Some(state) = self.app.try_state::<ShellState>() else {
            return;
        };

        match event {
            PageLoadEvent::Started => state.page_started(&self.app, url.as_str()),
            PageLoadEvent::Finished => state.page_finished(url.as_str()),
        }
    }
}

#[cfg(desktop)]
type ContentHandle = Webview;
#[cfg(mobile)]
type ContentHandle = WebviewWindow;

pub struct TauriSurface {
    content: ContentHandle,
    /// Back stack mirrored from page-start events, for engines without the Navigation API
    history: Arc<Mutex<HistoryStack>>,
    /// Engine answer delivered with the pending back request
    engine_can_go_back: Arc<Mutex<Option<bool>>>,
}

impl TauriSurface {
    fn hooks(
        app: &AppHandle,
        settings: &SurfaceSettings,
        policy: Arc<NavigationPolicy>,
    ) -> Arc<Hooks> {
        if !settings.javascript_enabled {
            tracing::warn!("Script execution cannot be disabled on this engine; ignoring setting");
        }

        Arc::new(Hooks {
            app: app.clone(),
            policy,
            history: Arc::new(Mutex::new(HistoryStack::new())),
            engine_can_go_back: Arc::new(Mutex::new(None)),
        })
    }

    fn from_hooks(content: ContentHandle, hooks: &Hooks) -> Self {
        Self {
            content,
            history: Arc::clone(&hooks.history),
            engine_can_go_back: Arc::clone(&hooks.engine_can_go_back),
        }
    }

    #[cfg(desktop)]
    pub fn build(
        app: &AppHandle,
        window: &Window,
        settings: &SurfaceSettings,
        policy: Arc<NavigationPolicy>,
        size: LogicalSize<f64>,
    ) -> Result<Self> {
        let hooks = Self::hooks(app, settings, policy);
        let hooks_for_navigation = Arc::clone(&hooks);
        let hooks_for_load = Arc::clone(&hooks);

        let webview_builder = WebviewBuilder::new(CONTENT_WEBVIEW, WebviewUrl::External(blank_url()?))
            .auto_resize()
            .incognito(!settings.dom_storage_enabled)
            .initialization_script(BACK_BRIDGE_SCRIPT)
            .on_navigation(move |url| hooks_for_navigation.on_navigation(url))
            .on_page_load(move |_webview, payload| {
                hooks_for_load.on_page_load(payload.url(), payload.event())
            });

        let webview = window
            .add_child(webview_builder, LogicalPosition::new(0.0, 0.0), size)
            .map_err(surface_error)?;

        tracing::info!(label = CONTENT_WEBVIEW, "Created content webview");

        Ok(Self::from_hooks(webview, &hooks))
    }

    #[cfg(mobile)]
    pub fn build(
        app: &AppHandle,
        label: &str,
        settings: &SurfaceSettings,
        policy: Arc<NavigationPolicy>,
    ) -> Result<Self> {
        let hooks = Self::hooks(app, settings, policy);
        let hooks_for_navigation = Arc::clone(&hooks);
        let hooks_for_load = Arc::clone(&hooks);

        let window = WebviewWindowBuilder::new(app, label, WebviewUrl::External(blank_url()?))
            .incognito(!settings.dom_storage_enabled)
            .initialization_script(BACK_BRIDGE_SCRIPT)
            .initialization_script(crate::indicator::LOADING_OVERLAY_SCRIPT)
            .on_navigation(move |url| hooks_for_navigation.on_navigation(url))
            .on_page_load(move |_window, payload| {
                hooks_for_load.on_page_load(payload.url(), payload.event())
            })
            .build()
            .map_err(surface_error)?;

        tracing::info!(label = %label, "Created content webview window");

        Ok(Self::from_hooks(window, &hooks))
    }

    #[cfg(mobile)]
    pub fn content(&self) -> &ContentHandle {
        &self.content
    }
}

impl BrowserSurface for TauriSurface {
    fn load_url(&mut self, url: &Url) -> Result<()> {
        self.content.navigate(url.clone()).map_err(surface_error)?;
        tracing::info!(url = %url, "Navigated webview");
        Ok(())
    }

    fn can_go_back(&self) -> bool {
        let engine = self.engine_can_go_back.lock().take();
        resolve_can_go_back(engine, &mut self.history.lock())
    }

    fn go_back(&mut self) -> Result<()> {
        // Keeps the mirror's pending-traversal bookkeeping in step
        self.history.lock().begin_back();

        self.content
            .eval("history.back()")
            .map_err(|e| CoreError::Surface(format!("Back navigation failed: {}", e)))
    }

    fn dispose(&mut self) {
        self.history.lock().clear();
        self.engine_can_go_back.lock().take();

        // Fails harmlessly when the window already took the webview down with it
        if let Err(e) = self.content.close() {
            tracing::debug!(error = %e, "Content webview already closed");
        }
    }
}
