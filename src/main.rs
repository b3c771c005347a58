use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{delete, get, post},
    Json, Router,
};
use chrono::Utc;
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::{Arc, RwLock};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

mod directory;
mod models;

use directory::{ActivityDirectory, DirectoryError};
use models::{
    Activity, AttendanceParams, AttendanceQuery, CategoryFilter, EmailParams, Message,
    StudentReport,
};

/// Extracurricular activities HTTP API
/// All state lives in one in-memory directory; handlers take the lock
/// for their whole validate-then-mutate sequence
#[derive(Clone)]
struct AppState {
    directory: Arc<RwLock<ActivityDirectory>>,
}

impl AppState {
    fn seeded() -> Self {
        Self {
            directory: Arc::new(RwLock::new(ActivityDirectory::seeded())),
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let state = AppState::seeded();
    let app = app(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], 8000));
    tracing::info!("Server running on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/activities", get(get_activities))
        .route("/activities/categories", get(get_categories))
        .route("/activities/filter", get(filter_activities))
        .route("/activities/:name/signup", post(signup_for_activity))
        .route("/activities/:name/unregister", delete(unregister_from_activity))
        .route("/activities/:name/record-attendance", post(record_attendance))
        .route("/activities/:name/attendance", get(get_activity_attendance))
        .route("/students/:email/activity-report", get(get_student_activity_report))
        .nest_service("/static", ServeDir::new("static"))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

impl IntoResponse for DirectoryError {
    fn into_response(self) -> Response {
        let status = match self {
            DirectoryError::ActivityNotFound => StatusCode::NOT_FOUND,
            DirectoryError::AlreadySignedUp
            | DirectoryError::NotSignedUp
            | DirectoryError::AttendanceAlreadyRecorded => StatusCode::BAD_REQUEST,
        };
        (status, Json(serde_json::json!({ "detail": self.to_string() }))).into_response()
    }
}

async fn root() -> Redirect {
    Redirect::to("/static/index.html")
}

async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

async fn get_activities(State(state): State<AppState>) -> Json<BTreeMap<String, Activity>> {
    let directory = state.directory.read().unwrap();
    Json(directory.all().clone())
}

async fn get_categories(State(state): State<AppState>) -> Json<Vec<String>> {
    let directory = state.directory.read().unwrap();
    Json(directory.categories())
}

async fn filter_activities(
    State(state): State<AppState>,
    Query(query): Query<CategoryFilter>,
) -> Json<BTreeMap<String, Activity>> {
    let directory = state.directory.read().unwrap();
    Json(directory.filter_by_category(query.category.as_deref()))
}

async fn signup_for_activity(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(params): Query<EmailParams>,
) -> Result<Json<Message>, DirectoryError> {
    let mut directory = state.directory.write().unwrap();
    directory.sign_up(&name, &params.email)?;
    Ok(Json(Message {
        message: format!("Signed up {} for {}", params.email, name),
    }))
}

async fn unregister_from_activity(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(params): Query<EmailParams>,
) -> Result<Json<Message>, DirectoryError> {
    let mut directory = state.directory.write().unwrap();
    directory.unregister(&name, &params.email)?;
    Ok(Json(Message {
        message: format!("Unregistered {} from {}", params.email, name),
    }))
}

async fn record_attendance(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(params): Query<AttendanceParams>,
) -> Result<Json<Message>, DirectoryError> {
    let mut directory = state.directory.write().unwrap();
    directory.record_attendance(&name, &params.email, &params.date)?;
    Ok(Json(Message {
        message: format!(
            "Recorded attendance for {} at {} on {}",
            params.email, name, params.date
        ),
    }))
}

/// With an email: that student's attended dates and hour total.
/// Without: the activity's full per-date ledger.
async fn get_activity_attendance(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(query): Query<AttendanceQuery>,
) -> Result<Response, DirectoryError> {
    let directory = state.directory.read().unwrap();
    match query.email {
        Some(email) => Ok(Json(directory.student_attendance(&name, &email)?).into_response()),
        None => Ok(Json(directory.activity_attendance(&name)?).into_response()),
    }
}

/// Always 200; an unknown email simply yields an empty report
async fn get_student_activity_report(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Json<StudentReport> {
    let directory = state.directory.read().unwrap();
    Json(directory.student_report(&email))
}
