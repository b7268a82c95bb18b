use crate::error::ApiError;
use crate::request_log::log_requests;
use crate::schema::{AnswerResponse, HealthResponse, Question};
use crate::state::AppState;
use axum::{
    extract::State,
    middleware,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::WithRejection;
use tower::ServiceBuilder;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/ask", post(ask))
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(log_requests))
                .layer(cors_layer()),
        )
        .with_state(state)
}

// Credentials cannot be combined with wildcards, so every allow-list mirrors the request.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        rag_engine: state.engine_status(),
    })
}

/// POST /ask - answer a question about the paper.
pub async fn ask(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<Question>, ApiError>,
) -> Result<Json<AnswerResponse>, ApiError> {
    let engine = state.engine().ok_or(ApiError::EngineUnavailable)?;

    if payload.question.trim().is_empty() {
        return Err(ApiError::invalid("question must not be empty"));
    }

    log::info!("Question: \"{}\"", payload.question);
    match engine.answer_question(&payload.question).await {
        Ok(answer) => Ok(Json(AnswerResponse::new(payload.question, answer))),
        Err(err) => {
            log::error!("Error while answering question: {}", err);
            Err(ApiError::AnswerFailed)
        }
    }
}
