#[cfg(test)]
#[path = "web_test.rs"]
mod tests;

use std::path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use anyhow::bail;
use anyhow::Result;
use axum::extract::Path;
use axum::extract::State;
use axum::http::header;
use axum::http::StatusCode;
use axum::response::sse::Event;
use axum::response::sse::KeepAlive;
use axum::response::sse::Sse;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::get;
use axum::routing::post;
use axum::Json;
use axum::Router;
use chrono::Local;
use serde_derive::Deserialize;
use serde_derive::Serialize;
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tokio_stream::StreamExt;

use super::assets;
use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::configuration::Settings;
use crate::domain::models::BackendRef;
use crate::domain::models::ReplyEvent;
use crate::domain::models::StoreName;
use crate::domain::models::StoreRef;
use crate::domain::models::Transcript;
use crate::domain::models::View;
use crate::domain::services::render;
use crate::domain::services::ReplyService;
use crate::domain::services::SessionRef;
use crate::domain::services::SessionState;
use crate::domain::services::Sessions;
use crate::infrastructure::backends::BackendManager;
use crate::infrastructure::stores::StoreManager;

/// Shared by every request. Sessions are the only mutable part.
#[derive(Clone)]
pub struct AppContext {
    pub settings: Arc<Settings>,
    pub models: Arc<Vec<String>>,
    pub sessions: Arc<Sessions>,
    pub backend: BackendRef,
    /// Receives the transcript when a chat is ended.
    pub end_store: StoreRef,
    /// Receives the transcript from "Save Chat".
    pub save_store: StoreRef,
}

impl AppContext {
    pub fn new(
        settings: Settings,
        models: Vec<String>,
        backend: BackendRef,
        end_store: StoreRef,
        save_store: StoreRef,
    ) -> AppContext {
        return AppContext {
            settings: Arc::new(settings),
            models: Arc::new(models),
            sessions: Arc::new(Sessions::default()),
            backend,
            end_store,
            save_store,
        };
    }

    pub async fn from_config() -> Result<AppContext> {
        let settings_path = path::PathBuf::from(Config::get(ConfigKey::SettingsFile));
        let settings = Settings::load(&settings_path).await?;
        let models = settings.model_choices(&Config::models());

        let store_config = Config::get(ConfigKey::TranscriptStore);
        let store_name = match StoreName::parse(&store_config) {
            Some(store_name) => store_name,
            None => bail!(format!("Unknown transcript store: {store_config}")),
        };
        let end_store = StoreManager::get(store_name, &settings)?;
        let save_store = StoreManager::get(StoreName::Local, &settings)?;

        let backend = BackendManager::get();
        if let Err(err) = backend.health_check().await {
            tracing::warn!(error = ?err, "OpenAI health check failed, starting anyway");
        }

        return Ok(AppContext::new(
            settings, models, backend, end_store, save_store,
        ));
    }
}

pub struct AppError {
    status: StatusCode,
    err: anyhow::Error,
}

impl AppError {
    fn not_found(id: &str) -> AppError {
        return AppError {
            status: StatusCode::NOT_FOUND,
            err: anyhow!("Session {id} does not exist"),
        };
    }

    fn unprocessable(err: anyhow::Error) -> AppError {
        return AppError {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            err,
        };
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> AppError {
        return AppError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            err: err.into(),
        };
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(error = ?self.err, "Request failed");
        }

        return (self.status, Json(json!({ "error": self.err.to_string() }))).into_response();
    }
}

type HandlerResult = Result<Response, AppError>;

#[derive(Debug, Deserialize)]
struct NameRequest {
    name: String,
}

#[derive(Debug, Deserialize)]
struct SettingsRequest {
    model: Option<String>,
    temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct MessageRequest {
    text: String,
}

#[derive(Debug, Deserialize)]
struct ConfirmRequest {
    confirm: bool,
}

#[derive(Debug, Serialize)]
struct PersistResponse {
    location: String,
    view: View,
}

fn find_session(ctx: &AppContext, id: &str) -> Result<SessionRef, AppError> {
    return ctx.sessions.get(id).ok_or_else(|| return AppError::not_found(id));
}

fn view_response(ctx: &AppContext, state: &SessionState, accepted: bool) -> Response {
    let view = render(state, &ctx.settings, &ctx.models);
    if !accepted {
        return (StatusCode::CONFLICT, Json(view)).into_response();
    }

    return Json(view).into_response();
}

async fn index() -> Response {
    return assets::serve("index.html");
}

async fn asset(Path(file_path): Path<String>) -> Response {
    return assets::serve(&file_path);
}

async fn get_settings(State(ctx): State<AppContext>) -> Response {
    return Json(json!({
        "settings": *ctx.settings,
        "models": *ctx.models,
    }))
    .into_response();
}

async fn create_session(State(ctx): State<AppContext>) -> Response {
    let (id, session) = ctx.sessions.create(&ctx.settings);
    tracing::info!(
        session_id = id,
        active_sessions = ctx.sessions.count(),
        "Session started"
    );

    let state = session.lock().await;
    let view = render(&state, &ctx.settings, &ctx.models);

    return (StatusCode::CREATED, Json(view)).into_response();
}

async fn get_session(State(ctx): State<AppContext>, Path(id): Path<String>) -> HandlerResult {
    let session = find_session(&ctx, &id)?;
    let state = session.lock().await;

    return Ok(view_response(&ctx, &state, true));
}

async fn delete_session(State(ctx): State<AppContext>, Path(id): Path<String>) -> HandlerResult {
    if !ctx.sessions.delete(&id) {
        return Err(AppError::not_found(&id));
    }

    return Ok(StatusCode::NO_CONTENT.into_response());
}

async fn set_name(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
    Json(req): Json<NameRequest>,
) -> HandlerResult {
    let session = find_session(&ctx, &id)?;
    let mut state = session.lock().await;
    let accepted = state.set_name(&req.name);

    return Ok(view_response(&ctx, &state, accepted));
}

async fn update_settings(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
    Json(req): Json<SettingsRequest>,
) -> HandlerResult {
    let session = find_session(&ctx, &id)?;
    let mut state = session.lock().await;

    if !ctx.settings.sidebar_show {
        return Ok(view_response(&ctx, &state, false));
    }
    if let Some(model) = &req.model {
        if !ctx.models.contains(model) {
            return Err(AppError::unprocessable(anyhow!(
                "Model {model} is not one of: {}",
                ctx.models.join(", ")
            )));
        }
    }
    if let Some(temperature) = req.temperature {
        let bounds = &ctx.settings.temperature;
        if !bounds.accepts(temperature) {
            return Err(AppError::unprocessable(anyhow!(
                "Temperature {temperature} is not a step of {} between {} and {}",
                bounds.step,
                bounds.min_value,
                bounds.max_value
            )));
        }
    }

    let mut accepted = true;
    if let Some(model) = &req.model {
        accepted = accepted && state.set_model(model, &ctx.models);
    }
    if let Some(temperature) = req.temperature {
        accepted = accepted && state.set_temperature(temperature, &ctx.settings.temperature);
    }

    return Ok(view_response(&ctx, &state, accepted));
}

async fn submit_message(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
    Json(req): Json<MessageRequest>,
) -> HandlerResult {
    let session = find_session(&ctx, &id)?;
    let prompt = {
        let mut state = session.lock().await;
        match state.submit_prompt(&req.text) {
            Some(prompt) => prompt,
            None => return Ok(view_response(&ctx, &state, false)),
        }
    };

    tracing::debug!(session_id = id, model = prompt.model, "Streaming reply");

    let (tx, rx) = mpsc::unbounded_channel::<ReplyEvent>();
    let backend = ctx.backend.clone();
    tokio::spawn(async move {
        if let Err(err) = ReplyService::stream(backend, session, prompt, tx).await {
            tracing::debug!(session_id = id, error = ?err, "Reply stream closed with an error");
        }
    });

    let stream = UnboundedReceiverStream::new(rx).map(|event| {
        return Event::default().event(event.name()).json_data(&event);
    });

    return Ok(Sse::new(stream)
        .keep_alive(KeepAlive::default())
        .into_response());
}

async fn clear_messages(State(ctx): State<AppContext>, Path(id): Path<String>) -> HandlerResult {
    let session = find_session(&ctx, &id)?;
    let mut state = session.lock().await;
    let accepted = ctx.settings.sidebar_show && state.delete_chat();

    return Ok(view_response(&ctx, &state, accepted));
}

async fn save_chat(State(ctx): State<AppContext>, Path(id): Path<String>) -> HandlerResult {
    let session = find_session(&ctx, &id)?;
    let mut state = session.lock().await;

    if !ctx.settings.sidebar_show || state.waiting_for_backend() {
        return Ok(view_response(&ctx, &state, false));
    }

    match state.save_chat(&*ctx.save_store).await? {
        Some(location) => {
            let view = render(&state, &ctx.settings, &ctx.models);
            return Ok(Json(PersistResponse { location, view }).into_response());
        }
        None => return Ok(view_response(&ctx, &state, false)),
    }
}

async fn request_end(State(ctx): State<AppContext>, Path(id): Path<String>) -> HandlerResult {
    let session = find_session(&ctx, &id)?;
    let mut state = session.lock().await;
    let accepted = state.request_end();

    return Ok(view_response(&ctx, &state, accepted));
}

async fn confirm_end(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
    Json(req): Json<ConfirmRequest>,
) -> HandlerResult {
    let session = find_session(&ctx, &id)?;
    let mut state = session.lock().await;

    if !req.confirm {
        let accepted = state.cancel_end();
        return Ok(view_response(&ctx, &state, accepted));
    }

    match state.confirm_end(&*ctx.end_store).await? {
        Some(location) => {
            let view = render(&state, &ctx.settings, &ctx.models);
            return Ok(Json(PersistResponse { location, view }).into_response());
        }
        None => return Ok(view_response(&ctx, &state, false)),
    }
}

async fn download(State(ctx): State<AppContext>, Path(id): Path<String>) -> HandlerResult {
    let session = find_session(&ctx, &id)?;
    let transcript = session.lock().await.transcript();
    let file_name = Transcript::download_file_name(&Local::now());

    return Ok((
        [
            (
                header::CONTENT_TYPE,
                "text/plain; charset=utf-8".to_string(),
            ),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        transcript,
    )
        .into_response());
}

pub fn router(ctx: AppContext) -> Router {
    return Router::new()
        .route("/", get(index))
        .route("/assets/*path", get(asset))
        .route("/api/settings", get(get_settings))
        .route("/api/sessions", post(create_session))
        .route(
            "/api/sessions/:id",
            get(get_session).delete(delete_session),
        )
        .route("/api/sessions/:id/name", post(set_name))
        .route("/api/sessions/:id/settings", post(update_settings))
        .route("/api/sessions/:id/messages", post(submit_message))
        .route("/api/sessions/:id/clear", post(clear_messages))
        .route("/api/sessions/:id/save", post(save_chat))
        .route("/api/sessions/:id/end", post(request_end))
        .route("/api/sessions/:id/end/confirm", post(confirm_end))
        .route("/api/sessions/:id/download", get(download))
        .with_state(ctx);
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = ?err, "Failed to listen for shutdown signal");
    }
}

pub async fn start(ctx: AppContext, address: &str, idle_timeout: Duration) -> Result<()> {
    let listener = TcpListener::bind(address).await?;
    let local_addr = listener.local_addr()?;
    tracing::info!(
        address = %local_addr,
        idle_timeout_secs = idle_timeout.as_secs(),
        "Serving chat UI"
    );

    let reaper = tokio::spawn(Sessions::reap_idle(ctx.sessions.clone(), idle_timeout));
    println!("Chat UI running at http://{local_addr}");

    axum::serve(listener, router(ctx))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    reaper.abort();

    return Ok(());
}
