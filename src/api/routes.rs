use axum::{
    routing::{get, post},
    Router,
    extract::{Form, Json, State},
    response::{Html, IntoResponse, Response},
    http::StatusCode,
};
use tower_http::cors::{CorsLayer, Any};
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

use crate::api::models::{SummarizeRequest, SummaryForm};
use crate::api::page::{self, Outcome, DEFAULT_URL, EMPTY_URL_WARNING};
use crate::api::response;
use crate::error::AppError;
use crate::summarizer::summarize;
use crate::AppState;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(90);

pub fn create_router(app_state: AppState) -> Router {
    let api = Router::new()
        .route("/api/summarize", post(summarize_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    Router::new()
        .route("/", get(index).post(submit_form))
        .merge(api)
        .with_state(app_state)
}

async fn index() -> Html<String> {
    Html(page::render(DEFAULT_URL, None))
}

async fn submit_form(
    State(state): State<AppState>,
    Form(form): Form<SummaryForm>,
) -> Html<String> {
    let start_time = Instant::now();

    let html = match summarize(&state.llm, &form.url).await {
        Ok(summary) => {
            info!(url = %summary.url, elapsed = ?start_time.elapsed(), "summary rendered");
            page::render(&form.url, Some(&Outcome::Summary(&summary)))
        }
        Err(AppError::InvalidUrl) => {
            warn!("empty URL submitted");
            page::render(&form.url, Some(&Outcome::Warning(EMPTY_URL_WARNING)))
        }
        Err(err) => {
            error!(url = %form.url, error = %err, "summary failed");
            page::render(&form.url, Some(&Outcome::Error(err.to_string())))
        }
    };

    Html(html)
}

async fn summarize_handler(
    State(state): State<AppState>,
    Json(req): Json<SummarizeRequest>,
) -> Response {
    info!(url = %req.url, "processing summarize request");
    let start_time = Instant::now();

    // Set an overall timeout for the entire handler
    let result = tokio::time::timeout(REQUEST_TIMEOUT, summarize(&state.llm, &req.url)).await;

    let elapsed = start_time.elapsed();
    match result {
        Ok(Ok(summary)) => {
            info!(url = %req.url, ?elapsed, "summarize request succeeded");
            response::success(summary)
        }
        Ok(Err(err)) => {
            warn!(url = %req.url, ?elapsed, error = %err, "summarize request failed");
            err.into_response()
        }
        Err(_) => {
            warn!(url = %req.url, ?elapsed, "summarize request timed out");
            response::error(
                StatusCode::REQUEST_TIMEOUT,
                "Request processing timed out".to_string(),
            )
        }
    }
}
