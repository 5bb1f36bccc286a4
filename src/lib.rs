#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use std::sync::Arc;

use anyhow::Result;
use log::{info, warn};
use parking_lot::Mutex;
use tauri::{Builder, State};

pub mod catalog;
pub mod feedback;
pub mod flow;
pub mod ingest;
pub mod openrouter;

use flow::{ArtworkSession, SessionSnapshot};
use openrouter::OpenRouterClient;

pub fn run() -> Result<()> {
    // Credentials are embedded at build time via build.rs; runtime env vars
    // take precedence (see get_env_var).
    info!("Artelier starting with embedded environment configuration...");
    log_environment_status();

    Builder::default()
        .plugin(tauri_plugin_opener::init())
        .invoke_handler(tauri::generate_handler![
            get_session_state,
            get_course_catalog,
            get_focus_area_catalog,
            ingest_artwork,
            update_artwork_details,
            analyze_artwork,
            reset_session
        ])
        .manage(AppState::new())
        .run(tauri::generate_context!())
        .map_err(|e| anyhow::anyhow!("Failed to run Artelier: {}", e))?;

    Ok(())
}

#[derive(Default)]
struct AppState {
    session: Arc<Mutex<ArtworkSession>>,
    openrouter_client: Arc<Mutex<Option<OpenRouterClient>>>,
}

impl AppState {
    fn new() -> Self {
        Self::default()
    }

    fn ensure_openrouter_client(&self) -> Result<OpenRouterClient, String> {
        let mut client_guard = self.openrouter_client.lock();
        if client_guard.is_none() {
            let api_key = get_env_var("OPENROUTER_API_KEY")
                .ok_or_else(|| "OPENROUTER_API_KEY environment variable not set".to_string())?;
            let model = get_env_var("OPENROUTER_MODEL")
                .unwrap_or_else(|| openrouter::DEFAULT_MODEL.to_string());
            *client_guard = Some(OpenRouterClient::new(api_key, model));
        }
        Ok(client_guard.as_ref().unwrap().clone())
    }
}

#[tauri::command]
fn get_session_state(state: State<'_, AppState>) -> SessionSnapshot {
    state.session.lock().snapshot()
}

#[tauri::command]
fn get_course_catalog() -> Vec<String> {
    catalog::courses()
}

#[tauri::command]
fn get_focus_area_catalog() -> Vec<String> {
    catalog::focus_areas()
}

#[tauri::command]
async fn ingest_artwork(
    path: String,
    state: State<'_, AppState>,
) -> Result<SessionSnapshot, String> {
    info!("📥 Ingesting artwork from {}", path);

    let data_url = ingest::read_artwork_data_url(&path)
        .await
        .map_err(|e| e.to_string())?;

    let mut session = state.session.lock();
    session.complete_upload(data_url)?;
    Ok(session.snapshot())
}

#[tauri::command]
fn update_artwork_details(
    course: String,
    focus_area: String,
    state: State<'_, AppState>,
) -> Result<SessionSnapshot, String> {
    let mut session = state.session.lock();
    session.set_details(course, focus_area)?;
    Ok(session.snapshot())
}

/// Runs the whole analyzing step: gate check, the single external request,
/// and the generation-guarded application of the outcome. Success and
/// fallback both land on the feedback step; a stale resolution after a reset
/// is discarded and the current session returned untouched.
#[tauri::command]
async fn analyze_artwork(state: State<'_, AppState>) -> Result<SessionSnapshot, String> {
    let client = state.ensure_openrouter_client()?;

    // The session mutex is never held across the network await.
    let (generation, image, course, focus_area) = {
        let mut session = state.session.lock();
        let image = session
            .image()
            .ok_or_else(|| "No artwork has been uploaded".to_string())?
            .to_string();
        let course = session.course().to_string();
        let focus_area = session.focus_area().to_string();
        let generation = session.begin_analysis()?;
        (generation, image, course, focus_area)
    };

    let outcome = client
        .critique_or_fallback(&image, &course, &focus_area)
        .await;

    let mut session = state.session.lock();
    session.apply_outcome(generation, outcome);
    Ok(session.snapshot())
}

#[tauri::command]
fn reset_session(state: State<'_, AppState>) -> SessionSnapshot {
    let mut session = state.session.lock();
    session.reset();
    session.snapshot()
}

/// Runtime environment variable with a compile-time embedded fallback.
/// build.rs embeds the values found in .env at build time; a runtime export
/// still wins during development.
fn get_env_var(name: &str) -> Option<String> {
    if let Ok(value) = std::env::var(name) {
        if !value.is_empty() {
            return Some(value);
        }
    }

    let embedded = match name {
        "OPENROUTER_API_KEY" => option_env!("OPENROUTER_API_KEY"),
        "OPENROUTER_MODEL" => option_env!("OPENROUTER_MODEL"),
        _ => None,
    };

    embedded
        .filter(|value| !value.is_empty())
        .map(|value| value.to_string())
}

fn log_environment_status() {
    match get_env_var("OPENROUTER_API_KEY") {
        Some(key) => {
            let key_preview = if key.len() > 8 {
                format!("{}...{}", &key[..4], &key[key.len() - 4..])
            } else {
                "***".to_string()
            };
            info!("✅ OPENROUTER_API_KEY: {} (length: {})", key_preview, key.len());
        }
        None => warn!("❌ OPENROUTER_API_KEY: Not available (neither runtime nor embedded)"),
    }

    match get_env_var("OPENROUTER_MODEL") {
        Some(model) => info!("✅ OPENROUTER_MODEL: {}", model),
        None => info!(
            "OPENROUTER_MODEL not set, defaulting to {}",
            openrouter::DEFAULT_MODEL
        ),
    }
}
