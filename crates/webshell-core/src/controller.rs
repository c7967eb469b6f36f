//! Shell Controller
//!
//! Bridges host-delivered events to loading-indicator visibility and surface
//! navigation. Every handler runs on the host UI thread, one at a time.
//!
//! Handlers after [`ShellController::teardown`] are no-ops: the surface is
//! never touched again once it has been disposed.

use std::sync::Arc;

use serde::Serialize;
use url::Url;

use crate::config::ShellConfig;
use crate::error::CoreError;
use crate::session::ShellSession;
use crate::surface::{BrowserSurface, LoadingIndicator, SurfaceSettings};
use crate::Result;
use webshell_navigation::{NavigationDecision, NavigationPolicy};

/// What the host should do after a back gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BackOutcome {
    /// The surface went back one entry; the event is consumed
    WentBack,
    /// Nothing to go back to; the host should close the shell
    Exit,
}

/// Events delivered by the host runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellEvent {
    PageStarted(String),
    PageFinished(String),
    LoadFailed { url: String, reason: String },
    LoadTimedOut(u64),
    NavigationRequested(String),
    BackRequested,
    Teardown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// The event changed session state
    Handled,
    /// The event was stale, out of order, or arrived after teardown
    Ignored,
    /// A page-start began loading generation `n`
    Loading(u64),
    Navigation(NavigationDecision),
    Back(BackOutcome),
}

pub struct ShellController<S, L> {
    session: ShellSession,
    target: Url,
    settings: SurfaceSettings,
    policy: Arc<NavigationPolicy>,
    surface: S,
    indicator: L,
    started: bool,
}

impl<S: BrowserSurface, L: LoadingIndicator> ShellController<S, L> {
    /// Validate `config`, then let the host construct the surface and the
    /// loading indicator from its settings.
    ///
    /// The builder also receives the navigation policy so the host can answer
    /// navigation requests without taking the session lock.
    pub fn new<F>(config: &ShellConfig, build: F) -> Result<Self>
    where
        F: FnOnce(&SurfaceSettings, &Arc<NavigationPolicy>) -> Result<(S, L)>,
    {
        let target = config.target_url()?;
        let policy = Arc::new(config.navigation_policy()?);
        let settings = config.surface;
        let (surface, indicator) = build(&settings, &policy)?;
        let session = ShellSession::new(target.to_string());

        tracing::info!(
            session_id = %session.id,
            url = %target,
            javascript = settings.javascript_enabled,
            dom_storage = settings.dom_storage_enabled,
            restricted = policy.is_restricted(),
            "Shell session created"
        );

        Ok(Self {
            session,
            target,
            settings,
            policy,
            surface,
            indicator,
            started: false,
        })
    }

    /// Issue the one initial navigation to the target URL.
    pub fn start(&mut self) -> Result<()> {
        if self.started {
            return Err(CoreError::AlreadyStarted);
        }
        if self.session.is_disposed() {
            return Err(CoreError::InvalidTransition {
                from: self.session.state.to_string(),
                to: "loading".to_string(),
            });
        }

        self.started = true;
        self.session.begin_navigation(self.target.as_str())?;
        self.indicator.set_visible(true);
        self.surface.load_url(&self.target)?;

        tracing::info!(session_id = %self.session.id, url = %self.target, "Initial navigation issued");
        Ok(())
    }

    /// Page-start callback. Returns the generation of the new load, or `None`
    /// after teardown.
    pub fn on_page_started(&mut self, url: &str) -> Result<Option<u64>> {
        if self.session.is_disposed() {
            tracing::debug!(url = %url, "Page start after teardown ignored");
            return Ok(None);
        }

        let generation = self.session.begin_navigation(url)?;
        self.indicator.set_visible(true);

        tracing::debug!(url = %url, generation, "Page load started");
        Ok(Some(generation))
    }

    /// Page-finish callback. Returns false if no load was in flight.
    pub fn on_page_finished(&mut self, url: &str) -> Result<bool> {
        if self.session.is_disposed() {
            return Ok(false);
        }

        if !self.session.finish_navigation()? {
            tracing::debug!(url = %url, state = %self.session.state, "Page finish without start ignored");
            return Ok(false);
        }

        self.indicator.set_visible(false);
        tracing::debug!(url = %url, "Page load finished");
        Ok(true)
    }

    /// Load failure; clears the loading state so the indicator can't stick.
    pub fn on_load_failed(&mut self, url: &str, reason: &str) -> Result<bool> {
        if self.session.is_disposed() || !self.session.finish_navigation()? {
            return Ok(false);
        }

        self.indicator.set_visible(false);
        tracing::warn!(url = %url, reason = %reason, "Page load failed");
        Ok(true)
    }

    /// Watchdog expiry for `generation`. Ignored unless that load is still in flight.
    pub fn on_load_timeout(&mut self, generation: u64) -> Result<bool> {
        if self.session.is_disposed()
            || !self.session.is_loading()
            || self.session.generation != generation
        {
            return Ok(false);
        }

        self.session.finish_navigation()?;
        self.indicator.set_visible(false);

        tracing::warn!(
            url = self.session.current_url.as_deref().unwrap_or_default(),
            generation,
            "Page load timed out"
        );
        Ok(true)
    }

    /// `shouldOverrideUrlLoading`: true means the shell intercepts the request
    /// instead of letting the surface load it.
    pub fn should_override_url_loading(&self, url: &str) -> bool {
        if self.session.is_disposed() {
            return false;
        }

        match self.policy.decide_str(url) {
            Ok(decision) => decision.intercepts(),
            Err(e) => {
                tracing::debug!(url = %url, error = %e, "Unparseable navigation delegated to engine");
                false
            }
        }
    }

    /// Back gesture: traverse in-page history, or tell the host to exit.
    pub fn on_back_requested(&mut self) -> Result<BackOutcome> {
        if self.session.is_disposed() {
            return Ok(BackOutcome::Exit);
        }

        if self.surface.can_go_back() {
            self.surface.go_back()?;
            tracing::debug!(session_id = %self.session.id, "Back gesture consumed by history");
            Ok(BackOutcome::WentBack)
        } else {
            tracing::info!(session_id = %self.session.id, "Back gesture with empty history; exiting");
            Ok(BackOutcome::Exit)
        }
    }

    /// Release the surface. Runs at most once; later calls return false.
    pub fn teardown(&mut self) -> bool {
        if self.session.is_disposed() {
            return false;
        }

        let was_loading = self.session.is_loading();
        self.indicator.set_visible(false);
        if let Err(e) = self.session.dispose() {
            tracing::error!(error = %e, "Session dispose failed");
        }
        self.surface.dispose();

        tracing::info!(
            session_id = %self.session.id,
            was_loading,
            "Shell surface disposed"
        );
        true
    }

    /// Dispatch a host event to its handler.
    pub fn handle(&mut self, event: ShellEvent) -> Result<EventOutcome> {
        let outcome = match event {
            ShellEvent::PageStarted(url) => match self.on_page_started(&url)? {
                Some(generation) => EventOutcome::Loading(generation),
                None => EventOutcome::Ignored,
            },
            ShellEvent::PageFinished(url) => handled(self.on_page_finished(&url)?),
            ShellEvent::LoadFailed { url, reason } => handled(self.on_load_failed(&url, &reason)?),
            ShellEvent::LoadTimedOut(generation) => handled(self.on_load_timeout(generation)?),
            ShellEvent::NavigationRequested(url) => {
                let decision = if self.should_override_url_loading(&url) {
                    NavigationDecision::Intercept
                } else {
                    NavigationDecision::Delegate
                };
                EventOutcome::Navigation(decision)
            }
            ShellEvent::BackRequested => EventOutcome::Back(self.on_back_requested()?),
            ShellEvent::Teardown => handled(self.teardown()),
        };

        Ok(outcome)
    }

    pub fn session(&self) -> &ShellSession {
        &self.session
    }

    pub fn is_loading(&self) -> bool {
        self.session.is_loading()
    }

    pub fn target_url(&self) -> &Url {
        &self.target
    }

    pub fn settings(&self) -> &SurfaceSettings {
        &self.settings
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn indicator(&self) -> &L {
        &self.indicator
    }
}

fn handled(changed: bool) -> EventOutcome {
    if changed {
        EventOutcome::Handled
    } else {
        EventOutcome::Ignored
    }
}
