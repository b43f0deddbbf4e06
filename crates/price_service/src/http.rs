//! HTTP API
//!
//! warp filters over a shared [`PredictionService`]. `POST /predict`
//! always answers 200: when the service fails, a simpler title-length
//! formula stands in.

use crate::metrics::render_prometheus;
use crate::service::PredictionService;
use crate::types::{PredictRequest, PredictResponse, ServiceStatus, API_VERSION, SERVICE_NAME};
use amazeworth_price_core::PredictionMethod;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::sync::Arc;
use tracing::{debug, warn};
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

/// Largest accepted request body
const MAX_BODY_BYTES: u64 = 64 * 1024;
const DEFAULT_HISTORY_LIMIT: usize = 20;

const FALLBACK_PRICE_PER_CHAR: f64 = 15.0;
const FALLBACK_CONFIDENCE: f64 = 0.75;
const FALLBACK_RESPONSE_TIME: f64 = 0.1;

#[derive(Debug, Serialize)]
struct RootResponse {
    message: String,
    version: &'static str,
    status: &'static str,
    #[serde(flatten)]
    service: ServiceStatus,
}

#[derive(Debug, Serialize)]
struct AdminResponse {
    status: &'static str,
    message: &'static str,
}

#[derive(Debug, Deserialize)]
struct HistoryQuery {
    #[serde(default = "default_history_limit")]
    limit: usize,
}

fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

/// Boundary fallback used when the service returns an error.
pub fn fallback_response(title: &str) -> PredictResponse {
    let base = title.chars().count() as f64 * FALLBACK_PRICE_PER_CHAR;
    let multiplier = if title.to_lowercase().contains("samsung") {
        2.5
    } else {
        1.5
    };

    PredictResponse {
        predicted_price: (base * multiplier * 100.0).round() / 100.0,
        confidence: FALLBACK_CONFIDENCE,
        key_features: vec!["Fallback Algorithm".to_string()],
        prediction_method: PredictionMethod::Fallback.label().to_string(),
        response_time: FALLBACK_RESPONSE_TIME,
    }
}

fn with_service(
    service: Arc<PredictionService>,
) -> impl Filter<Extract = (Arc<PredictionService>,), Error = Infallible> + Clone {
    warp::any().map(move || service.clone())
}

async fn predict_handler(
    request: PredictRequest,
    service: Arc<PredictionService>,
) -> Result<impl Reply, Infallible> {
    let description = request.description.unwrap_or_default();
    let response = match service.predict(&request.title, &description) {
        Ok(result) => PredictResponse::from(&result),
        Err(e) => {
            warn!("Prediction failed, answering with fallback: {}", e);
            fallback_response(&request.title)
        }
    };
    Ok(warp::reply::json(&response))
}

/// All routes, with CORS and JSON error replies.
pub fn routes(
    service: Arc<PredictionService>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let root = warp::path::end()
        .and(warp::get())
        .and(with_service(service.clone()))
        .map(|service: Arc<PredictionService>| {
            warp::reply::json(&RootResponse {
                message: format!("{SERVICE_NAME} API is running!"),
                version: API_VERSION,
                status: "active",
                service: service.status(),
            })
        });

    let health = warp::path!("health")
        .and(warp::get())
        .and(with_service(service.clone()))
        .map(|service: Arc<PredictionService>| warp::reply::json(&service.health_check()));

    let predict = warp::path!("predict")
        .and(warp::post())
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::json())
        .and(with_service(service.clone()))
        .and_then(predict_handler);

    let model_stats = warp::path!("model-stats")
        .and(warp::get())
        .and(with_service(service.clone()))
        .map(|service: Arc<PredictionService>| {
            warp::reply::json(&service.predictor().model_stats())
        });

    let analytics = warp::path!("analytics")
        .and(warp::get())
        .and(with_service(service.clone()))
        .map(|service: Arc<PredictionService>| warp::reply::json(&service.analytics()));

    let metrics = warp::path!("metrics")
        .and(warp::get())
        .and(with_service(service.clone()))
        .map(|service: Arc<PredictionService>| {
            let body = render_prometheus(
                &service.metrics_snapshot(),
                service.cache_len(),
                service.predictor().is_model_loaded(),
            );
            warp::reply::with_header(body, "Content-Type", "text/plain; version=0.0.4")
        });

    let routes = root
        .or(health)
        .or(predict)
        .or(model_stats)
        .or(analytics)
        .or(metrics)
        .or(api_routes(service.clone()))
        .or(admin_routes(service));

    let cors = warp::cors()
        .allow_any_origin()
        .allow_methods(vec!["GET", "POST", "OPTIONS"])
        .allow_header("content-type");

    routes.recover(handle_rejection).with(cors)
}

/// `/api/v1/analytics/*`
fn api_routes(
    service: Arc<PredictionService>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let analytics = warp::path!("api" / "v1" / "analytics" / ..).and(warp::get());

    let model_stats = warp::path!("model-stats")
        .and(with_service(service.clone()))
        .map(|service: Arc<PredictionService>| {
            warp::reply::json(&service.predictor().model_stats())
        });

    let feature_importance = warp::path!("feature-importance")
        .and(with_service(service.clone()))
        .map(|service: Arc<PredictionService>| {
            warp::reply::json(&service.predictor().feature_importance())
        });

    let performance = warp::path!("performance")
        .and(with_service(service.clone()))
        .map(|service: Arc<PredictionService>| {
            warp::reply::json(&service.predictor().performance_comparison())
        });

    let real_time = warp::path!("real-time-metrics")
        .and(with_service(service.clone()))
        .map(|service: Arc<PredictionService>| {
            warp::reply::json(&service.real_time_metrics())
        });

    let history = warp::path!("prediction-history")
        .and(warp::query::<HistoryQuery>())
        .and(with_service(service.clone()))
        .map(|query: HistoryQuery, service: Arc<PredictionService>| {
            debug!("History requested with limit {}", query.limit);
            warp::reply::json(&service.history_summary(query.limit))
        });

    let model_info = warp::path!("model-info")
        .and(with_service(service.clone()))
        .map(|service: Arc<PredictionService>| warp::reply::json(&service.model_info()));

    let dashboard = warp::path!("dashboard")
        .and(with_service(service))
        .map(|service: Arc<PredictionService>| warp::reply::json(&service.dashboard()));

    analytics.and(
        model_stats
            .or(feature_importance)
            .or(performance)
            .or(real_time)
            .or(history)
            .or(model_info)
            .or(dashboard),
    )
}

/// `/api/v1/admin/*`
fn admin_routes(
    service: Arc<PredictionService>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let clear_cache = warp::path!("api" / "v1" / "admin" / "cache" / "clear")
        .and(warp::post())
        .and(with_service(service.clone()))
        .map(|service: Arc<PredictionService>| {
            service.clear_cache();
            warp::reply::json(&AdminResponse {
                status: "ok",
                message: "Prediction cache cleared",
            })
        });

    let reset_metrics = warp::path!("api" / "v1" / "admin" / "metrics" / "reset")
        .and(warp::post())
        .and(with_service(service))
        .map(|service: Arc<PredictionService>| {
            service.reset_metrics();
            warp::reply::json(&AdminResponse {
                status: "ok",
                message: "Performance metrics reset",
            })
        });

    clear_cache.or(reset_metrics)
}

async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let (status, body) = if err.is_not_found() {
        (
            StatusCode::NOT_FOUND,
            serde_json::json!({ "error": "not_found" }),
        )
    } else if let Some(e) = err.find::<warp::filters::body::BodyDeserializeError>() {
        (
            StatusCode::BAD_REQUEST,
            serde_json::json!({ "error": "bad_request", "message": e.to_string() }),
        )
    } else if let Some(e) = err.find::<warp::reject::InvalidQuery>() {
        (
            StatusCode::BAD_REQUEST,
            serde_json::json!({ "error": "bad_request", "message": e.to_string() }),
        )
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        (
            StatusCode::PAYLOAD_TOO_LARGE,
            serde_json::json!({ "error": "payload_too_large" }),
        )
    } else if err.find::<warp::reject::UnsupportedMediaType>().is_some() {
        (
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            serde_json::json!({ "error": "unsupported_media_type" }),
        )
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (
            StatusCode::METHOD_NOT_ALLOWED,
            serde_json::json!({ "error": "method_not_allowed" }),
        )
    } else {
        warn!("Unhandled rejection: {:?}", err);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            serde_json::json!({ "error": "internal_server_error" }),
        )
    };

    Ok(warp::reply::with_status(warp::reply::json(&body), status))
}
