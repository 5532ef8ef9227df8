// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod session;

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{DefaultBodyLimit, Path, State as AxumState},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use clap::Parser;
use entregas_api::{
    ApiError, AuthSettings, CloseBatchResponse, CloseDayRequest, CreateDeliveryRequest,
    CreateDeliveryResponse, CreateUserRequest, CreateUserResponse, DeleteUserResponse,
    DeliveryNotifier, ExportResponse, ListDeliveriesResponse, ListUsersResponse, LogNotifier,
    LoginRequest, LoginResponse, MAX_ATTACHMENT_BYTES, RegisterRequest, RegisterResponse,
    SpoolNotifier, UsageResponse, WhoAmIResponse, bootstrap_defaults,
};
use entregas_domain::format_timestamp;
use entregas_persistence::Persistence;
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::session::SessionUser;

/// Entregas Server - HTTP server for the Entregas delivery tracker
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long, env = "ENTREGAS_DATABASE")]
    database: Option<PathBuf>,

    /// Address to bind the server to
    #[arg(short, long, env = "ENTREGAS_BIND", default_value = "127.0.0.1")]
    bind: String,

    /// Port to bind the server to
    #[arg(short, long, env = "ENTREGAS_PORT", default_value_t = 3000)]
    port: u16,

    /// Hours a login session stays valid
    #[arg(long, env = "ENTREGAS_SESSION_TTL_HOURS", default_value_t = 12)]
    session_ttl_hours: u16,

    /// Company that self-registered accounts and the default admin join
    #[arg(long, env = "ENTREGAS_DEFAULT_TENANT", default_value = "Empresa Demo")]
    default_tenant: String,

    /// Password given to the default admin account when it is first created
    #[arg(long, env = "ENTREGAS_ADMIN_PASSWORD", default_value = "Entregas@2024")]
    admin_password: String,

    /// Directory that receives one `.eml` file per client notification.
    /// Notifications are only logged when not set.
    #[arg(long, env = "ENTREGAS_MAIL_SPOOL_DIR")]
    mail_spool_dir: Option<PathBuf>,

    /// Sender address for client notifications
    #[arg(long, env = "ENTREGAS_MAIL_FROM", default_value = "entregas@localhost")]
    mail_from: String,
}

impl Args {
    fn auth_settings(&self) -> AuthSettings {
        AuthSettings {
            session_ttl: Duration::hours(i64::from(self.session_ttl_hours)),
            default_tenant: self.default_tenant.clone(),
            admin_password: self.admin_password.clone(),
            ..AuthSettings::default()
        }
    }
}

/// Largest accepted request body: two base64-encoded attachments at the
/// attachment limit plus 1 MiB for the remaining form fields.
const MAX_REQUEST_BODY_BYTES: usize = 2 * (MAX_ATTACHMENT_BYTES.div_ceil(3) * 4) + 1024 * 1024;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The persistence layer, serialized behind a mutex.
    pub persistence: Arc<Mutex<Persistence>>,
    /// Session and bootstrap settings.
    pub settings: Arc<AuthSettings>,
    /// Client notification channel.
    pub notifier: Arc<dyn DeliveryNotifier>,
}

/// API request for recording a delivery.
///
/// Attachments arrive base64-encoded; a `data:` URL prefix is accepted.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
struct CreateDeliveryApiRequest {
    client_name: String,
    address: String,
    #[serde(default)]
    client_email: Option<String>,
    #[serde(default)]
    client_phone: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    note: Option<String>,
    #[serde(default)]
    tracking_code: Option<String>,
    /// Base64-encoded photo of the delivery.
    #[serde(default)]
    photo: Option<String>,
    /// Base64-encoded signature image.
    #[serde(default)]
    signature: Option<String>,
}

impl CreateDeliveryApiRequest {
    fn into_api_request(self) -> Result<CreateDeliveryRequest, ApiError> {
        Ok(CreateDeliveryRequest {
            client_name: self.client_name,
            address: self.address,
            client_email: self.client_email,
            client_phone: self.client_phone,
            status: self.status,
            note: self.note,
            tracking_code: self.tracking_code,
            photo: decode_attachment("photo", self.photo.as_deref())?,
            signature: decode_attachment("signature", self.signature.as_deref())?,
        })
    }
}

/// Decodes a base64 attachment, stripping an optional `data:<mime>;base64,` prefix.
fn decode_attachment(field: &str, encoded: Option<&str>) -> Result<Option<Vec<u8>>, ApiError> {
    let Some(encoded) = encoded.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(None);
    };

    let payload: &str = match encoded.strip_prefix("data:") {
        Some(data_url) => data_url
            .split_once(',')
            .map_or(data_url, |(_, payload)| payload),
        None => encoded,
    };

    STANDARD
        .decode(payload)
        .map(Some)
        .map_err(|e| ApiError::InvalidInput {
            field: field.to_string(),
            message: format!("Attachment is not valid base64: {e}"),
        })
}

/// Error response body.
#[derive(Debug, Serialize, Deserialize)]
struct ErrorResponse {
    /// Always true for error responses.
    error: bool,
    /// Human-readable error message.
    message: String,
}

/// Simple acknowledgement body.
#[derive(Debug, Serialize, Deserialize)]
struct MessageResponse {
    message: String,
}

/// HTTP error wrapper that converts API errors to HTTP responses.
#[derive(Debug)]
pub struct HttpError {
    pub status: StatusCode,
    pub message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match &err {
            ApiError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Unauthorized { .. } => StatusCode::FORBIDDEN,
            ApiError::DomainRuleViolation { .. }
            | ApiError::InvalidInput { .. }
            | ApiError::PasswordPolicyViolation { .. } => StatusCode::BAD_REQUEST,
            ApiError::DuplicateUsername { .. } => StatusCode::CONFLICT,
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Internal { .. } => {
                error!(error = %err, "Internal error while handling request");
                return Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: String::from("Internal server error"),
                };
            }
        };

        Self {
            status,
            message: err.to_string(),
        }
    }
}

/// Builds a CSV download response.
fn csv_download(export: ExportResponse) -> Response {
    info!(
        file_name = %export.file_name,
        row_count = export.row_count,
        "Serving CSV export"
    );
    (
        [
            (header::CONTENT_TYPE, String::from("text/csv; charset=utf-8")),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", export.file_name),
            ),
        ],
        export.content,
    )
        .into_response()
}

/// Handler for GET `/health`.
async fn handle_health() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: String::from("ok"),
    })
}

/// Handler for POST `/auth/register`.
async fn handle_register(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>, HttpError> {
    info!(username = %req.username, "Handling self-registration");

    let mut persistence = app_state.persistence.lock().await;
    let response: RegisterResponse =
        entregas_api::register(&mut persistence, &app_state.settings, &req)?;

    Ok(Json(response))
}

/// Handler for POST `/auth/login`.
async fn handle_login(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: LoginResponse = entregas_api::login(
        &mut persistence,
        &app_state.settings,
        &req,
        OffsetDateTime::now_utc(),
    )?;

    Ok(Json(response))
}

/// Handler for POST `/auth/logout`.
async fn handle_logout(
    AxumState(app_state): AxumState<AppState>,
    SessionUser { context, token }: SessionUser,
) -> Result<Json<MessageResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    entregas_api::logout(&mut persistence, &token)?;

    info!(username = %context.username, "Logged out");
    Ok(Json(MessageResponse {
        message: String::from("Logged out"),
    }))
}

/// Handler for GET `/auth/whoami`.
async fn handle_whoami(
    AxumState(app_state): AxumState<AppState>,
    SessionUser { context, .. }: SessionUser,
) -> Result<Json<WhoAmIResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(entregas_api::whoami(&mut persistence, &context)?))
}

/// Handler for POST `/deliveries`.
async fn handle_create_delivery(
    AxumState(app_state): AxumState<AppState>,
    SessionUser { context, .. }: SessionUser,
    Json(req): Json<CreateDeliveryApiRequest>,
) -> Result<Json<CreateDeliveryResponse>, HttpError> {
    let request: CreateDeliveryRequest = req.into_api_request()?;

    let mut persistence = app_state.persistence.lock().await;
    let response: CreateDeliveryResponse = entregas_api::create_delivery(
        &mut persistence,
        app_state.notifier.as_ref(),
        &context,
        request,
        OffsetDateTime::now_utc(),
    )?;

    Ok(Json(response))
}

/// Handler for GET `/deliveries/mine`.
async fn handle_list_my_deliveries(
    AxumState(app_state): AxumState<AppState>,
    SessionUser { context, .. }: SessionUser,
) -> Result<Json<ListDeliveriesResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(entregas_api::list_my_deliveries(
        &mut persistence,
        &context,
    )?))
}

/// Handler for GET `/deliveries`.
async fn handle_list_tenant_deliveries(
    AxumState(app_state): AxumState<AppState>,
    SessionUser { context, .. }: SessionUser,
) -> Result<Json<ListDeliveriesResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(entregas_api::list_tenant_deliveries(
        &mut persistence,
        &context,
    )?))
}

/// Handler for POST `/deliveries/close-mine`.
async fn handle_close_mine(
    AxumState(app_state): AxumState<AppState>,
    SessionUser { context, .. }: SessionUser,
) -> Result<Json<CloseBatchResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(entregas_api::close_my_deliveries(
        &mut persistence,
        &context,
    )?))
}

/// Handler for POST `/deliveries/close-day`.
///
/// The body is optional; an empty body closes the current UTC day.
async fn handle_close_day(
    AxumState(app_state): AxumState<AppState>,
    SessionUser { context, .. }: SessionUser,
    body: Bytes,
) -> Result<Json<CloseBatchResponse>, HttpError> {
    let request: CloseDayRequest = if body.iter().all(u8::is_ascii_whitespace) {
        CloseDayRequest::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| ApiError::InvalidInput {
            field: String::from("body"),
            message: format!("Malformed close-day request: {e}"),
        })?
    };

    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(entregas_api::close_day(
        &mut persistence,
        &context,
        &request,
        OffsetDateTime::now_utc(),
    )?))
}

/// Handler for GET `/deliveries/mine/export`.
async fn handle_export_mine(
    AxumState(app_state): AxumState<AppState>,
    SessionUser { context, .. }: SessionUser,
) -> Result<Response, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let export: ExportResponse =
        entregas_api::export_my_deliveries(&mut persistence, &context, OffsetDateTime::now_utc())?;
    Ok(csv_download(export))
}

/// Handler for GET `/deliveries/export`.
async fn handle_export_tenant(
    AxumState(app_state): AxumState<AppState>,
    SessionUser { context, .. }: SessionUser,
) -> Result<Response, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let export: ExportResponse = entregas_api::export_tenant_deliveries(
        &mut persistence,
        &context,
        OffsetDateTime::now_utc(),
    )?;
    Ok(csv_download(export))
}

/// Handler for GET `/admin/users`.
async fn handle_list_users(
    AxumState(app_state): AxumState<AppState>,
    SessionUser { context, .. }: SessionUser,
) -> Result<Json<ListUsersResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(entregas_api::list_users(&mut persistence, &context)?))
}

/// Handler for POST `/admin/users`.
async fn handle_create_user(
    AxumState(app_state): AxumState<AppState>,
    SessionUser { context, .. }: SessionUser,
    Json(req): Json<CreateUserRequest>,
) -> Result<Json<CreateUserResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(entregas_api::create_user(
        &mut persistence,
        &app_state.settings,
        &context,
        &req,
    )?))
}

/// Handler for DELETE `/admin/users/{user_id}`.
async fn handle_delete_user(
    AxumState(app_state): AxumState<AppState>,
    SessionUser { context, .. }: SessionUser,
    Path(user_id): Path<i64>,
) -> Result<Json<DeleteUserResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(entregas_api::delete_user(
        &mut persistence,
        &context,
        user_id,
    )?))
}

/// Handler for GET `/admin/usage`.
async fn handle_usage(
    AxumState(app_state): AxumState<AppState>,
    SessionUser { context, .. }: SessionUser,
) -> Result<Json<UsageResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(entregas_api::usage(&mut persistence, &context)?))
}

/// Builds the application router with all routes.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(handle_health))
        .route("/auth/register", post(handle_register))
        .route("/auth/login", post(handle_login))
        .route("/auth/logout", post(handle_logout))
        .route("/auth/whoami", get(handle_whoami))
        .route(
            "/deliveries",
            post(handle_create_delivery).get(handle_list_tenant_deliveries),
        )
        .route("/deliveries/mine", get(handle_list_my_deliveries))
        .route("/deliveries/close-mine", post(handle_close_mine))
        .route("/deliveries/close-day", post(handle_close_day))
        .route("/deliveries/mine/export", get(handle_export_mine))
        .route("/deliveries/export", get(handle_export_tenant))
        .route(
            "/admin/users",
            get(handle_list_users).post(handle_create_user),
        )
        .route("/admin/users/{user_id}", delete(handle_delete_user))
        .route("/admin/usage", get(handle_usage))
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Entregas Server");

    let mut persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path.display());
        Persistence::new_with_file(db_path)?
    } else {
        warn!("Using in-memory database; data is lost on shutdown");
        Persistence::new_in_memory()?
    };

    let purged: usize =
        persistence.delete_expired_sessions(&format_timestamp(OffsetDateTime::now_utc())?)?;
    if purged > 0 {
        info!(purged, "Removed expired sessions");
    }

    let settings: AuthSettings = args.auth_settings();
    let outcome = bootstrap_defaults(&mut persistence, &settings)?;
    if outcome.admin_created {
        warn!(
            tenant = %settings.default_tenant,
            "Created the default admin account with the configured password; change it after first login"
        );
    }

    let notifier: Arc<dyn DeliveryNotifier> = match &args.mail_spool_dir {
        Some(dir) => {
            info!(spool_dir = %dir.display(), "Client notifications spool to disk");
            Arc::new(SpoolNotifier::new(dir.clone(), args.mail_from.clone()))
        }
        None => {
            info!("Client notifications are logged only");
            Arc::new(LogNotifier)
        }
    };

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        settings: Arc::new(settings),
        notifier,
    };

    let app: Router = build_router(app_state);

    let listener = tokio::net::TcpListener::bind((args.bind.as_str(), args.port)).await?;
    info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
