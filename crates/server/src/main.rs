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

use axum::{
    Json, Router,
    extract::{Path, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post},
};
use chrono::{Datelike, Timelike};
use chrono_tz::Tz;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use taproom::AdmissionPolicy;
use taproom_api::{
    ApiError, CreatePromotionRequest, EligiblePromotionsResponse, ListPromotionsResponse,
    PriorityCountResponse, PromotionResponse, UpdatePromotionRequest, attempt_activate,
    create_promotion, list_eligible_now, list_promotions, priority_count, promotion_to_response,
};
use taproom_domain::{LocalInstant, PromotionId, PromotionRuleSet};
use taproom_store::{MemoryStore, PromotionStore, StoreError};
use tokio::sync::Mutex;
use tracing::{error, info};

/// Taproom Server - HTTP server for the Taproom promotion engine
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Reference timezone for evaluating promotion windows (IANA name)
    #[arg(short, long, default_value = "America/New_York")]
    timezone: String,

    /// Optional cap on concurrently-eligible promotions of any kind.
    /// The priority cap of 2 is always enforced.
    #[arg(long)]
    active_cap: Option<usize>,
}

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    /// The promotion store wrapped in a Mutex to allow safe concurrent
    /// access. Mutation handlers hold the lock across their whole
    /// read-check-write sequence, which serializes admissions within
    /// this process.
    store: Arc<Mutex<MemoryStore>>,
    /// The caps enforced on mutations.
    policy: AdmissionPolicy,
    /// The timezone promotion windows are declared in.
    timezone: Tz,
}

/// API response for delete operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct DeleteResponse {
    /// Success indicator.
    success: bool,
    /// A success message.
    message: String,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
    /// Machine-readable admission code, when the rejection came from a cap.
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
    /// Titles of the currently-eligible conflicting promotions.
    #[serde(skip_serializing_if = "Option::is_none")]
    conflicting_titles: Option<Vec<String>>,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
    /// Machine-readable admission code, if any.
    code: Option<String>,
    /// Conflicting promotion titles, if any.
    conflicting_titles: Option<Vec<String>>,
}

impl HttpError {
    /// A plain error without an admission payload.
    fn new(status: StatusCode, message: String) -> Self {
        Self {
            status,
            message,
            code: None,
            conflicting_titles: None,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
            code: self.code,
            conflicting_titles: self.conflicting_titles,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::InvalidInput { .. } => Self::new(StatusCode::BAD_REQUEST, err.to_string()),
            ApiError::DomainRuleViolation { .. } => {
                Self::new(StatusCode::UNPROCESSABLE_ENTITY, err.to_string())
            }
            ApiError::AdmissionDenied {
                ref code,
                ref conflicting_titles,
                ..
            } => Self {
                status: StatusCode::CONFLICT,
                code: Some(code.clone()),
                conflicting_titles: Some(conflicting_titles.clone()),
                message: err.to_string(),
            },
            ApiError::ResourceNotFound { .. } => Self::new(StatusCode::NOT_FOUND, err.to_string()),
        }
    }
}

impl From<StoreError> for HttpError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => Self::new(StatusCode::NOT_FOUND, err.to_string()),
            StoreError::Unavailable(_) => {
                error!(error = %err, "Store error");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
        }
    }
}

/// Resolves the current wall-clock instant in the reference timezone.
///
/// This is the only place the system clock is read; everything below the
/// handlers takes the instant as an explicit input.
fn local_now(timezone: Tz) -> Result<LocalInstant, HttpError> {
    let now: chrono::DateTime<Tz> = chrono::Utc::now().with_timezone(&timezone);

    let month: time::Month = u8::try_from(now.month())
        .ok()
        .and_then(|m| time::Month::try_from(m).ok())
        .ok_or_else(|| clock_error(&now))?;
    let date: time::Date = u8::try_from(now.day())
        .ok()
        .and_then(|d| time::Date::from_calendar_date(now.year(), month, d).ok())
        .ok_or_else(|| clock_error(&now))?;
    let clock: time::Time = u8::try_from(now.hour())
        .ok()
        .zip(u8::try_from(now.minute()).ok())
        .and_then(|(h, m)| time::Time::from_hms(h, m, 0).ok())
        .ok_or_else(|| clock_error(&now))?;

    Ok(LocalInstant::new(date, clock))
}

fn clock_error(now: &chrono::DateTime<Tz>) -> HttpError {
    error!(now = %now, "Failed to resolve local instant");
    HttpError::new(
        StatusCode::INTERNAL_SERVER_ERROR,
        format!("Failed to resolve local instant from {now}"),
    )
}

/// Handler for GET `/promotions` endpoint.
///
/// Lists every stored promotion for the admin UI, active and inactive.
async fn handle_list_promotions(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<ListPromotionsResponse>, HttpError> {
    info!("Handling list_promotions request");

    let store = app_state.store.lock().await;
    let rules: Vec<PromotionRuleSet> = store.load_all()?;
    drop(store);

    Ok(Json(list_promotions(&rules)))
}

/// Handler for GET `/promotions/eligible` endpoint.
///
/// The public storefront query: which promotions should be shown right
/// now.
async fn handle_list_eligible(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<EligiblePromotionsResponse>, HttpError> {
    info!("Handling list_eligible request");

    let store = app_state.store.lock().await;
    let rules: Vec<PromotionRuleSet> = store.load_all()?;
    drop(store);

    let now: LocalInstant = local_now(app_state.timezone)?;
    Ok(Json(list_eligible_now(&rules, now)))
}

/// Handler for GET `/promotions/priority/count` endpoint.
///
/// Exposes the priority-eligible count for the admin UI badge.
async fn handle_priority_count(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<PriorityCountResponse>, HttpError> {
    info!("Handling priority_count request");

    let store = app_state.store.lock().await;
    let rules: Vec<PromotionRuleSet> = store.load_all()?;
    drop(store);

    let now: LocalInstant = local_now(app_state.timezone)?;
    Ok(Json(priority_count(&rules, &app_state.policy, now)))
}

/// Handler for POST `/promotions` endpoint.
///
/// Creates a new promotion, gated by the admission check.
async fn handle_create_promotion(
    AxumState(app_state): AxumState<AppState>,
    Json(request): Json<CreatePromotionRequest>,
) -> Result<Json<PromotionResponse>, HttpError> {
    info!(title = %request.title, "Handling create_promotion request");

    // The lock spans check and write so two concurrent mutations cannot
    // both observe a free priority slot.
    let mut store = app_state.store.lock().await;
    let rules: Vec<PromotionRuleSet> = store.load_all()?;
    let now: LocalInstant = local_now(app_state.timezone)?;

    let admitted: PromotionRuleSet = create_promotion(&rules, request, &app_state.policy, now)?;
    let persisted: PromotionRuleSet = store.insert(admitted)?;
    drop(store);

    info!(
        promotion_id = ?persisted.promotion_id,
        title = %persisted.title,
        "Successfully created promotion"
    );

    Ok(Json(promotion_to_response(&persisted)))
}

/// Handler for PATCH `/promotions/{id}` endpoint.
///
/// Applies a partial update, gated by the admission check. On rejection
/// nothing is written and the stored rule-set is unchanged.
async fn handle_update_promotion(
    AxumState(app_state): AxumState<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdatePromotionRequest>,
) -> Result<Json<PromotionResponse>, HttpError> {
    info!(promotion_id = id, "Handling update_promotion request");

    let promotion_id: PromotionId = PromotionId::new(id);

    // The lock spans check and write so two concurrent mutations cannot
    // both observe a free priority slot.
    let mut store = app_state.store.lock().await;
    let rules: Vec<PromotionRuleSet> = store.load_all()?;
    let now: LocalInstant = local_now(app_state.timezone)?;

    let admitted: PromotionRuleSet =
        attempt_activate(&rules, promotion_id, request, &app_state.policy, now)?;
    let persisted: PromotionRuleSet = store.save(promotion_id, admitted)?;
    drop(store);

    info!(
        promotion_id = id,
        title = %persisted.title,
        "Successfully updated promotion"
    );

    Ok(Json(promotion_to_response(&persisted)))
}

/// Handler for DELETE `/promotions/{id}` endpoint.
async fn handle_delete_promotion(
    AxumState(app_state): AxumState<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<DeleteResponse>, HttpError> {
    info!(promotion_id = id, "Handling delete_promotion request");

    let promotion_id: PromotionId = PromotionId::new(id);

    let mut store = app_state.store.lock().await;
    store.delete(promotion_id)?;
    drop(store);

    info!(promotion_id = id, "Successfully deleted promotion");

    Ok(Json(DeleteResponse {
        success: true,
        message: format!("Deleted promotion {id}"),
    }))
}

/// Builds the application router.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/promotions", get(handle_list_promotions))
        .route("/promotions", post(handle_create_promotion))
        .route("/promotions/eligible", get(handle_list_eligible))
        .route("/promotions/priority/count", get(handle_priority_count))
        .route("/promotions/{id}", patch(handle_update_promotion))
        .route("/promotions/{id}", delete(handle_delete_promotion))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Taproom Server");

    let timezone: Tz = args
        .timezone
        .parse()
        .map_err(|_| format!("Invalid timezone: '{}'", args.timezone))?;

    let policy: AdmissionPolicy = AdmissionPolicy {
        active_cap: args.active_cap,
        ..AdmissionPolicy::default()
    };
    info!(
        timezone = %timezone,
        priority_cap = policy.priority_cap,
        active_cap = ?policy.active_cap,
        "Admission policy configured"
    );

    let app_state: AppState = AppState {
        store: Arc::new(Mutex::new(MemoryStore::new())),
        policy,
        timezone,
    };

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
