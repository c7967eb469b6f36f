//! Loading indicator
//!
//! Desktop: a second child webview serving the bundled `loading.html`, added
//! after the content webview so it stacks on top of it.
//! Mobile: a window holds a single webview, so the overlay is injected into
//! the content page and toggled with `eval`.

use webshell_core::LoadingIndicator;

#[cfg(desktop)]
use tauri::webview::WebviewBuilder;
#[cfg(desktop)]
use tauri::{LogicalPosition, LogicalSize, Webview, WebviewUrl, Window};
#[cfg(desktop)]
use webshell_core::{CoreError, Result};

#[cfg(mobile)]
use crate::surface::TauriSurface;
#[cfg(mobile)]
use tauri::WebviewWindow;

#[cfg(desktop)]
pub const LOADING_WEBVIEW: &str = "loading";

/// Defines `window.__webshellLoading(visible)`; each new document starts covered.
#[cfg_attr(desktop, allow(dead_code))]
pub const LOADING_OVERLAY_SCRIPT: &str = r#"
(() => {
  const OVERLAY_ID = '__webshell_loading';

  const ensure = () => {
    let el = document.getElementById(OVERLAY_ID);
    if (!el && document.documentElement) {
      el = document.createElement('div');
      el.id = OVERLAY_ID;
      el.setAttribute('role', 'progressbar');
      el.style.cssText =
        'position:fixed;inset:0;z-index:2147483647;display:flex;' +
        'align-items:center;justify-content:center;background:#ffffff;';
      el.innerHTML =
        '<style>@keyframes __webshell_spin{to{transform:rotate(360deg)}}</style>' +
        '<div style="width:40px;height:40px;border-radius:50%;border:4px solid #e0e0e0;' +
        'border-top-color:#555555;animation:__webshell_spin .9s linear infinite"></div>';
      document.documentElement.appendChild(el);
    }
    return el;
  };

  window.__webshellLoading = (visible) => {
    const el = visible ? ensure() : document.getElementById(OVERLAY_ID);
    if (el) el.style.display = visible ? 'flex' : 'none';
  };

  window.__webshellLoading(true);
})();
"#;

pub struct LoadingOverlay {
    #[cfg(desktop)]
    webview: Webview,
    #[cfg(mobile)]
    content: WebviewWindow,
}

impl LoadingOverlay {
    #[cfg(desktop)]
    pub fn build(window: &Window, size: LogicalSize<f64>) -> Result<Self> {
        let webview_builder =
            WebviewBuilder::new(LOADING_WEBVIEW, WebviewUrl::App("loading.html".into()))
                .auto_resize();

        let webview = window
            .add_child(webview_builder, LogicalPosition::new(0.0, 0.0), size)
            .map_err(|e| CoreError::Surface(e.to_string()))?;

        // Start hidden
        if let Err(e) = webview.hide() {
            tracing::warn!(label = LOADING_WEBVIEW, error = %e, "Failed to hide loading overlay");
        }

        Ok(Self { webview })
    }

    #[cfg(mobile)]
    pub fn over(surface: &TauriSurface) -> Self {
        Self {
            content: surface.content().clone(),
        }
    }
}

impl LoadingIndicator for LoadingOverlay {
    #[cfg(desktop)]
    fn set_visible(&mut self, visible: bool) {
        let result = if visible {
            self.webview.show()
        } else {
            self.webview.hide()
        };

        if let Err(e) = result {
            tracing::warn!(label = LOADING_WEBVIEW, visible, error = %e, "Failed to toggle loading overlay");
        }
    }

    #[cfg(mobile)]
    fn set_visible(&mut self, visible: bool) {
        let script = format!(
            "window.__webshellLoading && window.__webshellLoading({})",
            visible
        );

        if let Err(e) = self.content.eval(&script) {
            tracing::warn!(visible, error = %e, "Failed to toggle loading overlay");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlay_script_defines_toggle() {
        assert!(LOADING_OVERLAY_SCRIPT.contains("window.__webshellLoading = (visible)"));
        // New documents start covered
        assert!(LOADING_OVERLAY_SCRIPT.contains("window.__webshellLoading(true);"));
    }
}
