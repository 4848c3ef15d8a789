mod config;
pub mod credentials;

use axum::http::{HeaderName, HeaderValue};
use axum::middleware;
use axum::response::Response as AxumResponse;
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
pub use config::{AppConfig, ConfigError, DEFAULT_DB_PATH, DEFAULT_PORT};
use eduscreen_shared::api::{
    ActivityRowDto, AddChildReq, ChildProfileDto, ErrorResp, LoginReq, MessageResp, ReportResp,
    SaveActivityReq, SignupReq,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info_span;
use uuid::Uuid;

use crate::screening::classify::{
    ATTENTION_IDS, DYSCALCULIA_IDS, MEMORY_IDS, classify_attention, classify_dyscalculia,
    classify_memory, in_id_range,
};
use crate::screening::{Attempt, grading};
use crate::storage::Store;

#[derive(Clone)]
pub struct AppState {
    pub store: Store,
}

impl AppState {
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

#[derive(Clone, Debug)]
struct ReqId(pub String);

pub fn router(state: AppState) -> Router {
    // Trace with request context (method, path, request_id)
    let trace = TraceLayer::new_for_http().make_span_with(|req: &axum::http::Request<_>| {
        let request_id = req
            .extensions()
            .get::<ReqId>()
            .map(|r| r.0.clone())
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        info_span!(
            "request",
            method = %req.method(),
            path = %req.uri().path(),
            request_id = %request_id
        )
    });

    // The whole surface is unauthenticated and CORS-open.
    Router::new()
        .route("/", get(home))
        .route("/signup", post(api_signup))
        .route("/login", post(api_login))
        .route("/add-child", post(api_add_child))
        .route("/save-activity", post(api_save_activity))
        .route("/view-report/{child_name}", get(api_view_report))
        .route("/children/{parent_email}", get(api_list_children))
        .with_state(state)
        .layer(trace)
        .layer(middleware::from_fn(add_request_id))
        .layer(CorsLayer::permissive())
}

async fn home() -> &'static str {
    "API running"
}

async fn add_request_id(
    mut req: axum::http::Request<axum::body::Body>,
    next: axum::middleware::Next,
) -> Result<AxumResponse, AppError> {
    let hdr = HeaderName::from_static("x-request-id");
    // Use provided x-request-id if present, else generate
    let rid = req
        .headers()
        .get(&hdr)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    req.extensions_mut().insert(ReqId(rid.clone()));
    let mut resp = next.run(req).await;
    if let Ok(hv) = HeaderValue::from_str(&rid) {
        resp.headers_mut().insert(hdr, hv);
    }
    Ok(resp)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

async fn api_signup(
    State(state): State<AppState>,
    Json(body): Json<SignupReq>,
) -> Result<(StatusCode, Json<MessageResp>), AppError> {
    let (Some(email), Some(username), Some(password)) = (
        non_empty(body.email.as_deref()),
        non_empty(body.username.as_deref()),
        non_empty(body.password.as_deref()),
    ) else {
        return Err(AppError::bad_request("all fields required"));
    };

    if !credentials::email_is_valid(email) {
        return Err(AppError::bad_request(
            "invalid email format, use @gmail.com only",
        ));
    }
    if !credentials::password_is_valid(password) {
        return Err(AppError::bad_request(
            "weak password: must include uppercase, lowercase, number, symbol, and be 8+ chars",
        ));
    }

    if state
        .store
        .adult_by_email(email)
        .await
        .map_err(AppError::internal)?
        .is_some()
    {
        return Err(AppError::conflict("email already exists"));
    }
    if state
        .store
        .username_exists(username)
        .await
        .map_err(AppError::internal)?
    {
        let suggestions = credentials::suggest_usernames(&state.store, username)
            .await
            .map_err(AppError::internal)?;
        return Err(AppError::username_taken(suggestions));
    }

    let digest = credentials::digest_password(password);
    state
        .store
        .create_adult(email, username, &digest)
        .await
        .map_err(|e| {
            // Concurrent signups can lose the pre-check; the unique index
            // turns the race into a conflict instead of corrupt data.
            if e.is_unique_violation() {
                AppError::conflict("email or username already exists")
            } else {
                AppError::internal(e)
            }
        })?;

    tracing::info!(username = %username, "adult registered");
    Ok((
        StatusCode::CREATED,
        Json(MessageResp {
            message: "Signup successful".into(),
        }),
    ))
}

async fn api_login(
    State(state): State<AppState>,
    Json(body): Json<LoginReq>,
) -> Result<Json<MessageResp>, AppError> {
    let (Some(email), Some(password)) = (
        non_empty(body.email.as_deref()),
        non_empty(body.password.as_deref()),
    ) else {
        return Err(AppError::unauthorized());
    };

    let adult = state
        .store
        .adult_by_email(email)
        .await
        .map_err(AppError::internal)?;
    let Some(adult) = adult else {
        tracing::warn!(email = %email, "login: unknown email");
        return Err(AppError::unauthorized());
    };
    if adult.password_hash != credentials::digest_password(password) {
        tracing::warn!(email = %email, "login: digest mismatch");
        return Err(AppError::unauthorized());
    }

    // Session-less by design: no token is issued.
    Ok(Json(MessageResp {
        message: "Login successful".into(),
    }))
}

async fn api_add_child(
    State(state): State<AppState>,
    Json(body): Json<AddChildReq>,
) -> Result<(StatusCode, Json<MessageResp>), AppError> {
    let adult = state
        .store
        .adult_by_email(&body.email)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::not_found("adult not found"))?;

    state
        .store
        .create_child(adult.adult_id, &body.name, &body.gender, body.age, body.grade)
        .await
        .map_err(|e| {
            if e.is_unique_violation() {
                AppError::conflict(format!(
                    "child '{}' already exists for this adult",
                    body.name
                ))
            } else {
                AppError::internal(e)
            }
        })?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResp {
            message: "Child added".into(),
        }),
    ))
}

async fn api_save_activity(
    State(state): State<AppState>,
    Json(body): Json<SaveActivityReq>,
) -> Result<Json<MessageResp>, AppError> {
    let child = state
        .store
        .child_by_name(&body.child_name)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::not_found("child not found"))?;

    let score = grading::grade(body.activity_id, body.given_answer.as_deref());
    state
        .store
        .insert_activity_result(
            child.child_id,
            body.activity_id,
            body.given_answer.as_deref(),
            score,
            body.time_taken_seconds,
        )
        .await
        .map_err(AppError::internal)?;

    Ok(Json(MessageResp {
        message: "Saved".into(),
    }))
}

async fn api_view_report(
    State(state): State<AppState>,
    Path(child_name): Path<String>,
) -> Result<Json<ReportResp>, AppError> {
    let child = state
        .store
        .child_by_name(&child_name)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::not_found("child not found"))?;

    let rows = state
        .store
        .results_for_child(child.child_id)
        .await
        .map_err(AppError::internal)?;
    let attempts = rows
        .iter()
        .map(Attempt::try_from)
        .collect::<Result<Vec<_>, _>>()
        .map_err(AppError::internal)?;

    let (confidence, dyscalculia_risk) =
        classify_dyscalculia(&in_id_range(&attempts, DYSCALCULIA_IDS));
    if let Some(confidence) = confidence {
        // Computed but kept internal; the report only carries the label.
        tracing::debug!(child_id = child.child_id, confidence, "dyscalculia confidence");
    }
    let attention_status = classify_attention(&in_id_range(&attempts, ATTENTION_IDS));
    let memory_status = classify_memory(&in_id_range(&attempts, MEMORY_IDS));

    let activities = rows
        .iter()
        .map(|r| ActivityRowDto {
            activity_id: r.activity_id,
            given_answer: r.given_answer.clone(),
            is_correct: r.is_correct,
            score: r.score,
            time_taken_seconds: r.time_taken_seconds,
        })
        .collect();

    Ok(Json(ReportResp {
        child: ChildProfileDto {
            child_id: child.child_id,
            child_name: child.child_name,
            age: child.age,
            gender: child.gender,
        },
        activities,
        dyscalculia_risk,
        attention_status,
        memory_status,
    }))
}

async fn api_list_children(
    State(state): State<AppState>,
    Path(parent_email): Path<String>,
) -> Result<Json<Vec<String>>, AppError> {
    let adult = state
        .store
        .adult_by_email(&parent_email)
        .await
        .map_err(AppError::internal)?;
    // An unknown adult yields an empty list, not an error.
    let names = match adult {
        Some(adult) => state
            .store
            .children_names_for_adult(adult.adult_id)
            .await
            .map_err(AppError::internal)?,
        None => Vec::new(),
    };
    Ok(Json(names))
}

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    Unauthorized,
    NotFound(String),
    Conflict {
        message: String,
        suggestions: Option<Vec<String>>,
    },
    Internal(String),
}

impl AppError {
    fn bad_request<T: Into<String>>(msg: T) -> Self {
        Self::BadRequest(msg.into())
    }
    fn unauthorized() -> Self {
        Self::Unauthorized
    }
    fn not_found<T: Into<String>>(msg: T) -> Self {
        Self::NotFound(msg.into())
    }
    fn conflict<T: Into<String>>(msg: T) -> Self {
        Self::Conflict {
            message: msg.into(),
            suggestions: None,
        }
    }
    fn username_taken(suggestions: Vec<String>) -> Self {
        Self::Conflict {
            message: "username exists".into(),
            suggestions: Some(suggestions),
        }
    }
    fn internal<E: std::fmt::Display>(e: E) -> Self {
        Self::Internal(e.to_string())
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, msg, suggestions, kind, detail) = match self {
            AppError::BadRequest(m) => (StatusCode::BAD_REQUEST, m, None, "bad_request", None),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "Invalid login".into(),
                None,
                "unauthorized",
                None,
            ),
            AppError::NotFound(m) => (StatusCode::NOT_FOUND, m, None, "not_found", None),
            AppError::Conflict {
                message,
                suggestions,
            } => (StatusCode::CONFLICT, message, suggestions, "conflict", None),
            // Do not leak internal error details to clients, but log them
            AppError::Internal(m) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal server error".into(),
                None,
                "internal",
                Some(m),
            ),
        };
        if let Some(detail) = detail {
            tracing::error!(status = %status, kind = kind, message = %msg, detail = %detail, "request failed");
        } else {
            tracing::warn!(status = %status, kind = kind, message = %msg, "request failed");
        }
        let body = Json(ErrorResp {
            error: msg,
            suggestions,
        });
        (status, body).into_response()
    }
}
