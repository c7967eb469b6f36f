//! Application state management
use parking_lot::Mutex;
use std::time::Duration;
use tauri::{AppHandle, Manager};

use crate::indicator::LoadingOverlay;
use crate::surface::TauriSurface;
use webshell_core::{BackOutcome, EventOutcome, Result, ShellController, ShellEvent};

pub type TauriController = ShellController<TauriSurface, LoadingOverlay>;

/// Thread-safe wrapper around the shell controller.
///
/// Every callback arrives from the UI event loop; the lock only satisfies
/// Tauri's `Send + Sync` requirement for managed state.
pub struct ShellState {
    controller: Mutex<TauriController>,
    load_timeout: Option<Duration>,
}

impl ShellState {
    pub fn new(controller: TauriController, load_timeout: Option<Duration>) -> Self {
        Self {
            controller: Mutex::new(controller),
            load_timeout,
        }
    }

    /// Issue the initial navigation.
    pub fn start(&self, app: &AppHandle) -> Result<()> {
        let generation = {
            let mut controller = self.controller.lock();
            controller.start()?;
            controller.session().generation
        };

        self.arm_load_watchdog(app, generation);
        Ok(())
    }

    /// Hand one host event to the controller.
    fn dispatch(&self, event: ShellEvent) -> Option<EventOutcome> {
        let result = self.controller.lock().handle(event.clone());
        match result {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                tracing::warn!(event = ?event, error = %e, "Failed to handle shell event");
                None
            }
        }
    }

    pub fn page_started(&self, app: &AppHandle, url: &str) {
        if let Some(EventOutcome::Loading(generation)) =
            self.dispatch(ShellEvent::PageStarted(url.to_string()))
        {
            self.arm_load_watchdog(app, generation);
        }
    }

    pub fn page_finished(&self, url: &str) {
        self.dispatch(ShellEvent::PageFinished(url.to_string()));
    }

    pub fn load_timed_out(&self, generation: u64) {
        self.dispatch(ShellEvent::LoadTimedOut(generation));
    }

    /// The engine reports no load errors, so a page that never finishes is
    /// failed by a watchdog posted back to the main thread.
    fn arm_load_watchdog(&self, app: &AppHandle, generation: u64) {
        let Some(timeout) = self.load_timeout else {
            return;
        };

        let app = app.clone();
        tauri::async_runtime::spawn(async move {
            tokio::time::sleep(timeout).await;

            let handle = app.clone();
            let posted = app.run_on_main_thread(move || {
                if let Some(state) = handle.try_state::<ShellState>() {
                    state.load_timed_out(generation);
                }
            });
            if let Err(e) = posted {
                tracing::debug!(generation, error = %e, "Load watchdog dropped");
            }
        });
    }

    /// Back gesture or back button, decoded by the surface's navigation hook.
    pub fn back_requested(&self, app: &AppHandle) {
        if let Some(EventOutcome::Back(BackOutcome::Exit)) =
            self.dispatch(ShellEvent::BackRequested)
        {
            self.teardown();
            app.exit(0);
        }
    }

    /// Dispose the surface. Safe to call from every shutdown path; only the
    /// first call does anything.
    pub fn teardown(&self) {
        if let Some(EventOutcome::Handled) = self.dispatch(ShellEvent::Teardown) {
            tracing::info!("WebShell surface released");
        }
    }
}
