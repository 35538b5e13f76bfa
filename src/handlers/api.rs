use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{delete, get, patch, post},
    Form, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::models::{AddCafeForm, CafeListResponse, CafeResponse, ServiceError};
use crate::services::CafeService;

pub const ADDED: &str = "Added the new cafe";
pub const PRICE_UPDATED: &str = "Updated the price";
pub const DELETED: &str = "Deleted the cafe";
pub const NO_CAFE_AT_LOCATION: &str = "Sorry, we do not have a cafe at a given location";
pub const NO_CAFES: &str = "Sorry, there are no cafes in the database.";
pub const UPDATE_NOT_FOUND: &str = "Sorry a cafe with that id was not found in the database.";
pub const DELETE_NOT_FOUND: &str = "Sorry, a cafe with given id was not found in our database";
pub const FORBIDDEN: &str = "That's forbidden. Check your api-key.";

type ApiError = (StatusCode, Json<Value>);

/// Shared application state
#[derive(Clone)]
pub struct ApiState {
    pub cafe_service: Arc<CafeService>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub loc: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePriceQuery {
    pub new_price: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReportClosedQuery {
    pub api_key: Option<String>,
}

/// Create API router with all cafe endpoints
pub fn create_api_router(state: ApiState) -> Router {
    Router::new()
        .route("/random", get(random_cafe))
        .route("/all", get(all_cafes))
        .route("/search", get(search_cafe))
        .route("/add", post(add_cafe))
        .route("/update-price/:cafe_id", patch(update_price))
        .route("/report-closed/:cafe_id", delete(report_closed))
        .with_state(state)
}

/// `{"response": {"<kind>": "<message>"}}`
pub fn response_payload(kind: &str, message: &str) -> Json<Value> {
    Json(json!({ "response": { kind: message } }))
}

/// `{"error": {"<kind>": "<message>"}}`
pub fn error_payload(kind: &str, message: &str) -> Json<Value> {
    Json(json!({ "error": { kind: message } }))
}

/// Return one cafe chosen uniformly at random
#[instrument(name = "random_cafe", skip(state))]
pub async fn random_cafe(State(state): State<ApiState>) -> Result<Json<CafeResponse>, ApiError> {
    let cafe = state
        .cafe_service
        .get_random()
        .await
        .map_err(service_error_to_response)?;

    info!(cafe_id = cafe.id, "Serving random cafe");
    Ok(Json(cafe.into()))
}

/// Return every cafe
#[instrument(name = "all_cafes", skip(state))]
pub async fn all_cafes(State(state): State<ApiState>) -> Result<Json<CafeListResponse>, ApiError> {
    let cafes = state
        .cafe_service
        .list_all()
        .await
        .map_err(service_error_to_response)?;

    Ok(Json(cafes.into()))
}

/// Return the first cafe at `loc`. A miss is reported in the body with status 200.
#[instrument(name = "search_cafe", skip(state))]
pub async fn search_cafe(
    State(state): State<ApiState>,
    Query(query): Query<SearchQuery>,
) -> Result<Response, ApiError> {
    match state
        .cafe_service
        .search_by_location(query.loc.as_deref())
        .await
    {
        Ok(cafe) => Ok(Json(CafeResponse::from(cafe)).into_response()),
        Err(ServiceError::NoCafeAtLocation { .. }) => {
            Ok(error_payload("Not Found", NO_CAFE_AT_LOCATION).into_response())
        }
        Err(err) => Err(service_error_to_response(err)),
    }
}

/// Create a cafe from a form submission
#[instrument(name = "add_cafe", skip(state, form))]
pub async fn add_cafe(
    State(state): State<ApiState>,
    Form(form): Form<AddCafeForm>,
) -> Result<Json<Value>, ApiError> {
    let id = state
        .cafe_service
        .add_cafe(form)
        .await
        .map_err(service_error_to_response)?;

    info!(cafe_id = id, "Cafe created");
    Ok(response_payload("Success", ADDED))
}

/// Set a cafe's coffee price
#[instrument(name = "update_price", skip(state))]
pub async fn update_price(
    State(state): State<ApiState>,
    Path(cafe_id): Path<String>,
    Query(query): Query<UpdatePriceQuery>,
) -> Result<Json<Value>, ApiError> {
    match state
        .cafe_service
        .update_price(&cafe_id, query.new_price.as_deref())
        .await
    {
        Ok(()) => Ok(response_payload("Success", PRICE_UPDATED)),
        Err(ServiceError::CafeNotFound { .. }) => Err((
            StatusCode::NOT_FOUND,
            error_payload("Not Found", UPDATE_NOT_FOUND),
        )),
        Err(err) => Err(service_error_to_response(err)),
    }
}

/// Delete a cafe reported as closed; requires the shared api key
#[instrument(name = "report_closed", skip(state, query))]
pub async fn report_closed(
    State(state): State<ApiState>,
    Path(cafe_id): Path<String>,
    Query(query): Query<ReportClosedQuery>,
) -> Result<Json<Value>, ApiError> {
    match state
        .cafe_service
        .delete_cafe(&cafe_id, query.api_key.as_deref())
        .await
    {
        Ok(()) => Ok(response_payload("Success", DELETED)),
        Err(ServiceError::CafeNotFound { .. }) => Err((
            StatusCode::NOT_FOUND,
            response_payload("Error", DELETE_NOT_FOUND),
        )),
        Err(err) => Err(service_error_to_response(err)),
    }
}

/// Convert ServiceError to HTTP response
fn service_error_to_response(err: ServiceError) -> ApiError {
    match err {
        ServiceError::CafeNotFound { .. } => (
            StatusCode::NOT_FOUND,
            error_payload("Not Found", UPDATE_NOT_FOUND),
        ),
        ServiceError::NoCafeAtLocation { .. } => (
            StatusCode::NOT_FOUND,
            error_payload("Not Found", NO_CAFE_AT_LOCATION),
        ),
        ServiceError::EmptyStore => (StatusCode::NOT_FOUND, error_payload("Not Found", NO_CAFES)),
        ServiceError::ValidationError { message } => (
            StatusCode::BAD_REQUEST,
            error_payload("Bad Request", &message),
        ),
        ServiceError::Conflict { message } => {
            (StatusCode::CONFLICT, error_payload("Conflict", &message))
        }
        ServiceError::Forbidden => (StatusCode::FORBIDDEN, response_payload("Error", FORBIDDEN)),
        ServiceError::Repository { source } => {
            crate::error_with_trace!("Store failure: {}", source);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_payload("Internal Server Error", "Internal server error"),
            )
        }
    }
}
