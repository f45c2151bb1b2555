use axum::{
    Json, Router,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

mod sessions;
use sessions::SessionStore;

use bilingual_render::orchestrator::LOGIN_PATH;
use bilingual_render::{
    AudioFormat, AudioOptions, AudioOutcome, Config, FormInput, HttpBilingualService,
    Orchestrator, Outcome, SubmitError, Submission,
};

#[derive(Serialize, Deserialize)]
pub struct RenderResponse {
    pub html: String,
    pub lemmas: Option<String>,
    pub data_hash: String,
}

#[derive(Serialize, Deserialize)]
pub struct JsonResponse {
    pub json: String,
}

#[derive(Serialize, Deserialize)]
pub struct AudioRequestBody {
    pub data_hash: String,
    pub output_format: Option<String>,
    pub break_time_ms: Option<u32>,
    #[serde(default)]
    pub ssml_only: bool,
}

#[derive(Serialize)]
pub struct AudioResponseBody {
    pub audio_url: Option<String>,
    pub ssml: Option<String>,
    pub download_url: Option<String>,
    pub message: String,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub login: Option<String>,
}

#[derive(Serialize)]
pub struct LogoutResponse {
    pub login: String,
}

#[derive(Clone)]
pub struct AppState {
    pub service: HttpBilingualService,
    pub config: Config,
    /// Sessions of the most recent results, keyed by data hash
    pub sessions: Arc<Mutex<SessionStore>>,
}

impl AppState {
    /// One orchestrator per result view, so re-submission only cancels the
    /// submitting page's own request.
    fn orchestrator(&self) -> Orchestrator<HttpBilingualService> {
        Orchestrator::new(self.service.clone(), self.config.clone())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("info".parse()?),
        )
        .init();

    let config = Config::from_env()?;
    let service = HttpBilingualService::new(&config)
        .map_err(|e| format!("Failed to initialize API client: {}", e))?;
    let addr = config.web_addr.clone();

    info!("Using bilingual API at {}", config.api_url);
    let state = AppState {
        service,
        config,
        sessions: Arc::new(Mutex::new(SessionStore::default())),
    };

    let app = Router::new()
        .route("/", get(serve_index))
        .route("/api/render", post(render_submission))
        .route("/api/audio", post(request_audio))
        .route("/api/logout", post(logout))
        .nest_service("/static", ServeDir::new("bilingual-web/src/static"))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server running at http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

async fn serve_index() -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        include_str!("static/index.html"),
    )
}

fn error_response(error: &SubmitError) -> Response {
    let (status, login) = match error {
        SubmitError::Validation(_) | SubmitError::NotLoaded => (StatusCode::BAD_REQUEST, None),
        e if e.requires_login() => (StatusCode::UNAUTHORIZED, Some(LOGIN_PATH.to_string())),
        _ => (StatusCode::BAD_GATEWAY, None),
    };
    (
        status,
        Json(ErrorResponse {
            error: error.user_message(),
            login,
        }),
    )
        .into_response()
}

async fn render_submission(State(state): State<AppState>, Json(form): Json<FormInput>) -> Response {
    let submission = match Submission::try_from(form) {
        Ok(submission) => submission,
        Err(e) => return error_response(&SubmitError::Validation(e)),
    };

    let outcome = match state.orchestrator().submit(&submission).await {
        Ok(outcome) => outcome,
        Err(e) => {
            warn!("Submission failed: {}", e);
            return error_response(&e);
        }
    };

    match outcome {
        Outcome::Web(result) => {
            let data_hash = result.session.data_hash.clone();
            {
                let mut sessions = state.sessions.lock().unwrap_or_else(|e| e.into_inner());
                sessions.insert(result.session);
                debug!("Holding {} result sessions", sessions.len());
            }
            Json(RenderResponse {
                html: result.content,
                lemmas: result.lemmas,
                data_hash,
            })
            .into_response()
        }
        Outcome::Json(json) => Json(JsonResponse { json }).into_response(),
        Outcome::Pdf(download) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "application/pdf".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", download.file_name),
                ),
            ],
            download.bytes,
        )
            .into_response(),
        Outcome::Superseded => StatusCode::CONFLICT.into_response(),
    }
}

async fn request_audio(State(state): State<AppState>, Json(body): Json<AudioRequestBody>) -> Response {
    let format = match body.output_format.as_deref() {
        Some(s) => match s.parse::<AudioFormat>() {
            Ok(format) => format,
            Err(e) => return error_response(&SubmitError::Validation(e)),
        },
        None => AudioFormat::default(),
    };
    let options = AudioOptions {
        format,
        break_time_ms: body.break_time_ms,
        ssml_only: body.ssml_only,
    };

    let session = state
        .sessions
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .get(&body.data_hash)
        .cloned();

    match state.orchestrator().request_audio(session.as_ref(), &options).await {
        Ok(AudioOutcome::Audio { url }) => Json(AudioResponseBody {
            audio_url: Some(url),
            ssml: None,
            download_url: None,
            message: "Audio generated!".to_string(),
        })
        .into_response(),
        Ok(AudioOutcome::Ssml {
            markup,
            download_url,
        }) => Json(AudioResponseBody {
            audio_url: None,
            ssml: Some(markup),
            download_url: Some(download_url),
            message: "SSML generated!".to_string(),
        })
        .into_response(),
        Ok(AudioOutcome::NoLink) => Json(AudioResponseBody {
            audio_url: None,
            ssml: None,
            download_url: None,
            message: "Audio generated, but no download link provided.".to_string(),
        })
        .into_response(),
        Err(e) => error_response(&e),
    }
}

async fn logout(State(state): State<AppState>) -> Response {
    state.orchestrator().logout().await;
    state
        .sessions
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .clear();
    Json(LogoutResponse {
        login: LOGIN_PATH.to_string(),
    })
    .into_response()
}
