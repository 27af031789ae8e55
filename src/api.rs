//! REST API for the packing service.
//!
//! Provides the HTTP endpoints that feed order batches into the dispatcher.
//! Uses Axum as the web framework and supports CORS.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use axum::{
    Router,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Serialize;
#[allow(unused_imports)]
use serde_json::json;
use std::sync::OnceLock;
use tower_http::cors::{Any, CorsLayer};
use utoipa::{OpenApi, ToSchema};

use crate::config::{ApiConfig, BatchConfig};
use crate::dispatcher::pack_batch_with_config;
use crate::model::{BoxInstance, Order, OrderId, PackingResponse, Product, ValidationError};

#[derive(Clone, Default)]
struct ApiState {
    batch_config: BatchConfig,
}

static OPENAPI_DOC: OnceLock<utoipa::openapi::OpenApi> = OnceLock::new();

// SRI hashes verified against https://unpkg.com/swagger-ui-dist@5.17.14/ on 2025-10-29.
const SWAGGER_UI_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
    <head>
        <meta charset="utf-8" />
        <title>order-packer API Docs</title>
        <link
            rel="stylesheet"
            href="https://unpkg.com/swagger-ui-dist@5.17.14/swagger-ui.css"
            integrity="sha384-wxLW6kwyHktdDGr6Pv1zgm/VGJh99lfUbzSn6HNHBENZlCN7W602k9VkGdxuFvPn"
            crossorigin="anonymous"
        />
    </head>
    <body>
        <div id="swagger-ui"></div>
        <script
            src="https://unpkg.com/swagger-ui-dist@5.17.14/swagger-ui-bundle.js"
            integrity="sha384-wmyclcVGX/WhUkdkATwhaK1X1JtiNrr2EoYJ+diV3vj4v6OC5yCeSu+yW13SYJep"
            crossorigin="anonymous"
        ></script>
        <script
            src="https://unpkg.com/swagger-ui-dist@5.17.14/swagger-ui-standalone-preset.js"
            integrity="sha384-2YH8WDRaj7V2OqU/trsmzSagmk/E2SutiCsGkdgoQwC9pNUJV1u/141DHB6jgs8t"
            crossorigin="anonymous"
        ></script>
        <script>
            window.onload = function () {
                const ui = SwaggerUIBundle({
                    url: "/docs/openapi.json",
                    dom_id: "#swagger-ui",
                    presets: [SwaggerUIBundle.presets.apis, SwaggerUIStandalonePreset],
                    layout: "StandaloneLayout",
                });
                window.ui = ui;
            };
        </script>
    </body>
    </html>"##;

fn openapi_doc() -> &'static utoipa::openapi::OpenApi {
    OPENAPI_DOC.get_or_init(ApiDoc::openapi)
}

#[derive(Debug)]
enum PackRequestValidationError {
    MissingOrders,
    InvalidOrder(ValidationError),
}

fn validate_orders(orders: Vec<Order>) -> Result<Vec<Order>, PackRequestValidationError> {
    if orders.is_empty() {
        return Err(PackRequestValidationError::MissingOrders);
    }

    for order in &orders {
        order
            .validate()
            .map_err(PackRequestValidationError::InvalidOrder)?;
    }

    Ok(orders)
}

/// Error body. The message key is `erro`, matching the wire names of the
/// success responses.
#[derive(Serialize, ToSchema)]
#[schema(example = json!({"erro": "Invalid input data", "details": "No orders were sent"}))]
struct ErrorResponse {
    #[serde(rename = "erro")]
    error: String,
    details: String,
}

impl ErrorResponse {
    fn new(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: details.into(),
        }
    }
}

#[derive(Serialize, ToSchema)]
#[schema(example = json!({"status": "ok"}))]
struct HealthResponse {
    status: String,
}

fn error_response(
    status: StatusCode,
    error: impl Into<String>,
    details: impl Into<String>,
) -> Response {
    (status, Json(ErrorResponse::new(error, details))).into_response()
}

fn json_deserialize_error(err: JsonRejection) -> Response {
    error_response(StatusCode::BAD_REQUEST, "Invalid JSON data", err.body_text())
}

fn validation_error(details: impl Into<String>) -> Response {
    error_response(StatusCode::BAD_REQUEST, "Invalid input data", details)
}

fn parse_pack_request(
    payload: Result<Json<Vec<Order>>, JsonRejection>,
) -> Result<Vec<Order>, Response> {
    let Json(orders) = match payload {
        Ok(payload) => payload,
        Err(err) => return Err(json_deserialize_error(err)),
    };

    match validate_orders(orders) {
        Ok(validated) => Ok(validated),
        Err(PackRequestValidationError::MissingOrders) => {
            Err(validation_error("No orders were sent"))
        }
        Err(PackRequestValidationError::InvalidOrder(err)) => {
            Err(validation_error(err.to_string()))
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(handle_pack, handle_health),
    components(
        schemas(
            Order,
            OrderId,
            Product,
            PackingResponse,
            BoxInstance,
            ErrorResponse,
            HealthResponse
        )
    ),
    tags((name = "packing", description = "Endpoints for packing orders into boxes"))
)]
struct ApiDoc;

fn build_router(state: ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/pack", post(handle_pack))
        .route("/health", get(handle_health))
        // API documentation
        .route("/docs/openapi.json", get(serve_openapi_json))
        .route("/docs", get(serve_openapi_ui))
        .route("/swagger", get(redirect_to_docs))
        .route("/swagger/{*rest}", get(redirect_to_docs))
        .layer(cors)
        .with_state(state)
}

/// Starts the API server.
///
/// Configures CORS for cross-origin requests.
/// Blocks until the server is terminated.
pub async fn start_api_server(
    config: ApiConfig,
    batch_config: BatchConfig,
) -> Result<(), std::io::Error> {
    let app = build_router(ApiState { batch_config });

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await.map_err(|err| {
        log::error!("❌ Could not bind API server to {}: {}", addr, err);
        err
    })?;

    let display_host = config.display_host().to_string();
    log::info!(
        "🚀 Server running on http://{}:{}",
        display_host,
        config.port()
    );
    if config.binds_to_all_interfaces() && config.uses_default_host() {
        log::info!("💡 Local access: http://localhost:{}", config.port());
    }
    log::info!("📦 API Endpoints:");
    log::info!("   - POST /api/pack");
    log::info!("   - GET /health");
    log::info!("📑 Documentation:");
    log::info!("   - GET /docs");
    log::info!("   - GET /docs/openapi.json");

    axum::serve(listener, app).await
}

/// Handler for POST /api/pack endpoint.
///
/// Takes a list of orders and packs each into boxes from the catalog.
///
/// # Returns
/// JSON array with one packing response per order, in request order
#[utoipa::path(
    post,
    path = "/api/pack",
    request_body = [Order],
    responses(
        (status = 200, description = "Orders packed", body = [PackingResponse]),
        (
            status = BAD_REQUEST,
            description = "Malformed JSON, empty order list or invalid product data",
            body = ErrorResponse
        )
    ),
    tag = "packing"
)]
async fn handle_pack(
    State(state): State<ApiState>,
    payload: Result<Json<Vec<Order>>, JsonRejection>,
) -> Response {
    let orders = match parse_pack_request(payload) {
        Ok(orders) => orders,
        Err(response) => return response,
    };

    let order_count = orders.len();
    let product_count: usize = orders.iter().map(|order| order.products.len()).sum();
    log::info!(
        "📥 New pack request: {} orders, {} products",
        order_count,
        product_count
    );

    let dispatch_config = state.batch_config.dispatch_config();
    let mut responses = match tokio::task::spawn_blocking(move || {
        pack_batch_with_config(orders, dispatch_config)
    })
    .await
    {
        Ok(responses) => responses,
        Err(err) => {
            log::error!("❌ Packing task failed: {}", err);
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Packing failed",
                err.to_string(),
            );
        }
    };

    let box_count: usize = responses.iter().map(PackingResponse::box_count).sum();
    let excluded_count: usize = responses.iter().map(PackingResponse::excluded_count).sum();
    log::info!(
        "📦 Result: {} boxes, {} excluded products",
        box_count,
        excluded_count
    );
    if excluded_count > 0 {
        log::warn!(
            "⚠️ {} products fit no box and were left out",
            excluded_count
        );
    }

    if !state.batch_config.report_excluded() {
        for response in &mut responses {
            response.excluded.clear();
        }
    }

    (StatusCode::OK, Json(responses)).into_response()
}

/// Handler for GET /health endpoint.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is alive", body = HealthResponse)),
    tag = "packing"
)]
async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

async fn serve_openapi_json(State(_state): State<ApiState>) -> impl IntoResponse {
    Json(openapi_doc())
}

async fn serve_openapi_ui(State(_state): State<ApiState>) -> impl IntoResponse {
    Html(SWAGGER_UI_HTML)
}

async fn redirect_to_docs() -> Redirect {
    Redirect::permanent("/docs")
}
