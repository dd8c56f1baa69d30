//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use tracing::{error, info, warn};

use crate::{
    scheduler::{Event, ReminderAction},
    settings::{Settings, SettingsSource},
    state::AppState,
};
use super::responses::{ApiResponse, HealthResponse, SettingsResponse, StatusResponse};

type ApiResult = Result<(StatusCode, Json<ApiResponse>), StatusCode>;

/// Queue a command event and answer 202
fn dispatch(state: &AppState, action: &str, event: Event, message: &str) -> ApiResult {
    match state.send_event(action, event) {
        Ok(()) => {
            info!("{} endpoint called", action);
            Ok((StatusCode::ACCEPTED, Json(ApiResponse::accepted(message.to_string()))))
        }
        Err(e) => {
            error!("Failed to queue {}: {}", action, e);
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}

fn not_found(message: &str) -> ApiResult {
    Ok((StatusCode::NOT_FOUND, Json(ApiResponse::error(message.to_string()))))
}

/// Handle POST /skip - Abort the current reminder or countdown
pub async fn skip_handler(State(state): State<Arc<AppState>>) -> ApiResult {
    dispatch(&state, "skip", Event::Skip, "Skip requested")
}

/// Handle POST /pause - Suspend reminder scheduling
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> ApiResult {
    dispatch(&state, "pause", Event::Pause, "Pause requested")
}

/// Handle POST /resume - Restore reminder scheduling
pub async fn resume_handler(State(state): State<Arc<AppState>>) -> ApiResult {
    dispatch(&state, "resume", Event::Resume, "Resume requested")
}

/// Answer the pending reminder prompt
fn answer_prompt(state: &AppState, action: Option<ReminderAction>) -> ApiResult {
    let prompt = match state.notices.take_prompt() {
        Ok(Some(prompt)) => prompt,
        Ok(None) => return not_found("No reminder is waiting for an answer"),
        Err(e) => {
            error!("Failed to read pending prompt: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let label = action.map_or("dismiss", |action| action.label());
    dispatch(
        state,
        label,
        Event::ReminderAnswered { prompt, action },
        &format!("Reminder answered: {}", label),
    )
}

/// Handle POST /reminder/start - Start the break offered by the reminder
pub async fn reminder_start_handler(State(state): State<Arc<AppState>>) -> ApiResult {
    answer_prompt(&state, Some(ReminderAction::StartBreak))
}

/// Handle POST /reminder/skip - Skip the break offered by the reminder
pub async fn reminder_skip_handler(State(state): State<Arc<AppState>>) -> ApiResult {
    answer_prompt(&state, Some(ReminderAction::Skip))
}

/// Handle POST /reminder/dismiss - Close the reminder without choosing
pub async fn reminder_dismiss_handler(State(state): State<Arc<AppState>>) -> ApiResult {
    answer_prompt(&state, None)
}

/// Handle POST /break/cancel - Cancel the running countdown
pub async fn break_cancel_handler(State(state): State<Arc<AppState>>) -> ApiResult {
    match state.notices.cancel_progress() {
        Ok(Some(progress)) => dispatch(
            &state,
            "cancel",
            Event::ProgressCancelled(progress),
            "Break cancellation requested",
        ),
        Ok(None) => not_found("No break is in progress"),
        Err(e) => {
            error!("Failed to cancel progress: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /settings - Return the settings in force
pub async fn get_settings_handler(State(state): State<Arc<AppState>>) -> Json<Settings> {
    Json(state.settings.current())
}

/// Handle PUT /settings - Replace the settings group
pub async fn put_settings_handler(
    State(state): State<Arc<AppState>>,
    Json(settings): Json<Settings>,
) -> Result<Json<SettingsResponse>, (StatusCode, Json<ApiResponse>)> {
    if let Err(e) = settings.validate() {
        warn!("Rejected settings update: {}", e);
        return Err((StatusCode::BAD_REQUEST, Json(ApiResponse::error(e))));
    }

    match state.update_settings(settings.clone()) {
        Ok(changed) => Ok(Json(SettingsResponse { changed, settings })),
        Err(e) => {
            error!("Failed to update settings: {}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, Json(ApiResponse::error(e))))
        }
    }
}

/// Handle GET /status - Return current scheduler status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let notices = match state.notices.snapshot() {
        Ok(notices) => notices,
        Err(e) => {
            error!("Failed to read notice board: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        scheduler: state.get_status(),
        notices,
        settings: state.settings.current(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
