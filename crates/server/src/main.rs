use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde::Deserialize;
use shared::{
    domain::BatchId,
    error::{ApiError, ErrorCode},
    protocol::{DepartmentBatches, ScheduleItem, TimetableRequest},
};
use timetable::{build_source, require_selection, Catalog, TimetableController, ViewOutcome};
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod app_state;
mod config;
mod page;

use app_state::AppState;
use config::load_settings;
use page::{AlertBanner, TimetableSection, ViewerPage};

const MAX_FORM_BYTES: usize = 16 * 1024;

#[derive(Debug, Default, Deserialize)]
struct ViewerQuery {
    batch_id: Option<String>,
    view: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = load_settings()?;
    let catalog = Catalog::load_or_builtin(settings.catalog_path.as_deref())
        .context("failed to load batch catalog")?;
    let source = build_source(settings.timetable_source, &catalog, settings.scheduler_seed);

    let state = AppState::new(&catalog, source);
    let app = build_router(Arc::new(state));

    let addr: SocketAddr = settings
        .server_bind
        .parse()
        .with_context(|| format!("invalid bind address '{}'", settings.server_bind))?;
    info!(%addr, source = %settings.timetable_source, "timetable server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(viewer_page))
        .route("/healthz", get(healthz))
        .route("/batches", get(http_list_batches))
        .route("/timetable", get(http_timetable_fragment))
        .route("/get_timetable", post(http_get_timetable))
        .layer(RequestBodyLimitLayer::new(MAX_FORM_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn error_response(error: ApiError) -> (StatusCode, Json<ApiError>) {
    let status = match error.code {
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(error))
}

async fn healthz() -> &'static str {
    "ok"
}

async fn viewer_page(
    State(state): State<Arc<AppState>>,
    Query(q): Query<ViewerQuery>,
) -> Html<String> {
    let selection = BatchId::new(q.batch_id.unwrap_or_default());
    let mut page = ViewerPage::new(&state.departments, selection);

    if q.view.is_some() {
        let selection = page.selected().clone();
        TimetableController::new(state.source.as_ref()).view(
            &selection,
            &mut page.alert,
            &mut page.section,
        );
    }

    Html(page.to_html())
}

async fn http_list_batches(State(state): State<Arc<AppState>>) -> Json<Vec<DepartmentBatches>> {
    Json(state.departments.clone())
}

async fn http_timetable_fragment(
    State(state): State<Arc<AppState>>,
    Query(req): Query<TimetableRequest>,
) -> Response {
    let mut alert = AlertBanner::default();
    let mut section = TimetableSection::default();
    let outcome = TimetableController::new(state.source.as_ref()).view(
        &req.selected(),
        &mut alert,
        &mut section,
    );

    match outcome {
        ViewOutcome::Rendered { .. } => Html(section.markup().to_string()).into_response(),
        ViewOutcome::NotSelected => {
            let message = alert.message().unwrap_or_default();
            error_response(ApiError::validation(message)).into_response()
        }
        ViewOutcome::Unavailable { message, .. } => {
            error_response(ApiError::not_found(message)).into_response()
        }
    }
}

async fn http_get_timetable(
    State(state): State<Arc<AppState>>,
    Form(req): Form<TimetableRequest>,
) -> Result<Json<Vec<ScheduleItem>>, (StatusCode, Json<ApiError>)> {
    let batch_id = req.selected();
    let items = require_selection(&batch_id)
        .and_then(|batch_id| state.source.schedule_for(batch_id))
        .map_err(|e| error_response(e.into()))?;
    Ok(Json(items))
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
