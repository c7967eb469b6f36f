//! WebShell - Tauri Application
//!
//! Hosts one remote page in a full-screen webview:
//! - Loading overlay shown between page start and finish
//! - Back gesture walks in-page history before closing the shell
//! - Surface released before the runtime shuts down

mod indicator;
mod state;
mod surface;

use indicator::LoadingOverlay;
use state::ShellState;
use std::sync::Arc;
use surface::TauriSurface;
use tauri::{AppHandle, Manager, RunEvent, WindowEvent};
use webshell_core::{ShellConfig, ShellController};

#[cfg(desktop)]
use tauri::window::WindowBuilder;

const MAIN_WINDOW: &str = "main";

/// Bundled `app_url` resource and its optional settings.
const SHELL_CONFIG: &str = include_str!("../shell.json");

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    // Initialize logging
    webshell_core::init_logging();

    let config = match ShellConfig::from_json(SHELL_CONFIG) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid shell configuration");
            return;
        }
    };

    let app = tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .setup(move |app| {
            let handle = app.handle().clone();

            // Content webview plus an overlay webview stacked above it
            #[cfg(desktop)]
            let controller = {
                let window = WindowBuilder::new(app, MAIN_WINDOW)
                    .title(&config.title)
                    .inner_size(1024.0, 768.0)
                    .build()?;

                let size = window
                    .inner_size()?
                    .to_logical::<f64>(window.scale_factor()?);

                ShellController::new(&config, |settings, policy| {
                    let surface =
                        TauriSurface::build(&handle, &window, settings, Arc::clone(policy), size)?;
                    let indicator = LoadingOverlay::build(&window, size)?;
                    Ok((surface, indicator))
                })?
            };

            // One webview window; the overlay lives inside the page
            #[cfg(mobile)]
            let controller = ShellController::new(&config, |settings, policy| {
                let surface =
                    TauriSurface::build(&handle, MAIN_WINDOW, settings, Arc::clone(policy))?;
                let indicator = LoadingOverlay::over(&surface);
                Ok((surface, indicator))
            })?;

            app.manage(ShellState::new(controller, config.load_timeout()));
            app.state::<ShellState>().start(&handle)?;

            tracing::info!("WebShell started");

            Ok(())
        })
        .build(tauri::generate_context!())
        .expect("error while building WebShell");

    app.run(|app_handle, event| match event {
        RunEvent::WindowEvent {
            label,
            event: WindowEvent::CloseRequested { .. } | WindowEvent::Destroyed,
            ..
        } if label == MAIN_WINDOW => teardown(app_handle),
        RunEvent::ExitRequested { .. } | RunEvent::Exit => teardown(app_handle),
        _ => {}
    });
}

fn teardown(app: &AppHandle) {
    if let Some(state) = app.try_state::<ShellState>() {
        state.teardown();
    }
}
