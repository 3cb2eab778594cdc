use std::sync::Arc;

use axum::Router;
use axum::extract::{DefaultBodyLimit, Path, State};
use axum::http::StatusCode;
use axum::middleware;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use tower_http::limit::RequestBodyLimitLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use uuid::Uuid;

use showroom_core::{AppError, ListingPayload, Notification, send_notification};

use crate::auth::require_admin_token;
use crate::dto::{HealthResponse, ListingResponse, SendEmailResponse};
use crate::error::{ApiError, not_found};
use crate::openapi::ApiDoc;
use crate::state::AppState;

/// Listing payloads carry base64 images inline.
pub const MAX_BODY_BYTES: usize = 25 * 1024 * 1024;

/// Build the full router with all routes and middleware.
pub fn router(state: Arc<AppState>) -> Router {
    let admin = middleware::from_fn_with_state(state.clone(), require_admin_token);

    let api = Router::new()
        .route(
            "/api/cars",
            get(list_listings).merge(post(create_listing).route_layer(admin)),
        )
        .route("/api/cars/{id}", get(get_listing))
        .route("/api/send-email", post(send_email))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES));

    let public = Router::new()
        .route("/health", get(health))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    public.merge(api).with_state(state)
}

// ---------------------------------------------------------------------------
// Listings
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/api/cars",
    responses(
        (status = 200, description = "All listings, newest first", body = Vec<ListingResponse>),
    ),
    tag = "listings"
)]
pub async fn list_listings(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let listings = state.listings().list().await?;

    let response: Vec<ListingResponse> = listings.into_iter().map(Into::into).collect();
    Ok(axum::Json(response))
}

#[utoipa::path(
    get,
    path = "/api/cars/{id}",
    params(("id" = String, Path, description = "Listing ID")),
    responses(
        (status = 200, description = "Listing details", body = ListingResponse),
        (status = 404, description = "Listing not found", body = crate::dto::ErrorResponse),
    ),
    tag = "listings"
)]
pub async fn get_listing(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let Ok(id) = Uuid::parse_str(&id) else {
        return Ok(not_found("Listing"));
    };

    match state.listings().get(id).await? {
        Some(listing) => Ok(axum::Json(ListingResponse::from(listing)).into_response()),
        None => Ok(not_found("Listing")),
    }
}

#[utoipa::path(
    post,
    path = "/api/cars",
    request_body = crate::dto::CreateListingRequest,
    responses(
        (status = 201, description = "Listing created", body = ListingResponse),
        (status = 400, description = "Invalid listing", body = crate::dto::ErrorResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin endpoints disabled"),
    ),
    security(("bearer" = [])),
    tag = "listings"
)]
pub async fn create_listing(
    State(state): State<Arc<AppState>>,
    axum::Json(body): axum::Json<serde_json::Value>,
) -> Result<impl IntoResponse, ApiError> {
    let payload: ListingPayload = serde_json::from_value(body)
        .map_err(|e| AppError::ValidationError(format!("Invalid listing: {e}")))?;

    let listing = state.listings().create(payload).await?;

    Ok((StatusCode::CREATED, axum::Json(ListingResponse::from(listing))))
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

#[utoipa::path(
    post,
    path = "/api/send-email",
    request_body = crate::dto::SendEmailRequest,
    responses(
        (status = 200, description = "Email sent", body = SendEmailResponse),
        (status = 400, description = "Unknown type or invalid form", body = crate::dto::ErrorResponse),
        (status = 502, description = "Mail transport failed", body = crate::dto::ErrorResponse),
    ),
    tag = "notifications"
)]
pub async fn send_email(
    State(state): State<Arc<AppState>>,
    axum::Json(body): axum::Json<serde_json::Value>,
) -> Result<impl IntoResponse, ApiError> {
    let notification = Notification::from_json(body)?;

    send_notification(&state.mailer, &notification).await?;

    Ok(axum::Json(SendEmailResponse { success: true }))
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Service is unhealthy", body = HealthResponse),
    ),
    tag = "system"
)]
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let healthy = state.db.listing_repo().health_check().await.is_ok();

    let (status, response) = if healthy {
        (
            StatusCode::OK,
            HealthResponse {
                status: "healthy",
                database: "ok",
            },
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            HealthResponse {
                status: "unhealthy",
                database: "error",
            },
        )
    };

    (status, axum::Json(response))
}
