use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::models::{AlertEntry, ForecastPlan, ForecastRequest};
use crate::AppState;

/// A saved plan together with the run id it was logged under.
#[derive(Debug, Serialize, ToSchema)]
pub struct SavedPlanResponse {
    pub run_id: Uuid,
    #[serde(flatten)]
    pub plan: ForecastPlan,
}

/// Compute a replenishment plan for a product
///
/// An empty plan means no restock is needed over the horizon; it is not
/// an error.
#[utoipa::path(
    post,
    path = "/api/v1/forecast/{product_id}",
    params(("product_id" = Uuid, Path, description = "Product ID")),
    request_body = ForecastRequest,
    responses(
        (status = 200, description = "Replenishment plan computed", body = ForecastPlan),
        (status = 400, description = "Invalid horizon parameters", body = crate::errors::ErrorResponse),
        (status = 404, description = "Product not found", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "forecast"
)]
pub async fn generate_forecast(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
    Json(request): Json<ForecastRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let plan = state
        .services
        .forecasting
        .generate_plan(product_id, request)
        .await?;
    Ok(Json(plan))
}

/// Compute a plan and persist it to the plan log
#[utoipa::path(
    post,
    path = "/api/v1/forecast/{product_id}/save",
    params(("product_id" = Uuid, Path, description = "Product ID")),
    request_body = ForecastRequest,
    responses(
        (status = 201, description = "Plan computed and saved", body = SavedPlanResponse),
        (status = 400, description = "Invalid horizon parameters", body = crate::errors::ErrorResponse),
        (status = 404, description = "Product not found", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "forecast"
)]
pub async fn save_forecast(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
    Json(request): Json<ForecastRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let (run, plan) = state
        .services
        .forecasting
        .save_plan(product_id, request)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(SavedPlanResponse {
            run_id: run.run_id,
            plan,
        }),
    ))
}

/// List saved replenishment entries, newest run first
#[utoipa::path(
    get,
    path = "/api/v1/alerts",
    responses(
        (status = 200, description = "Saved plan entries returned", body = [AlertEntry]),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "forecast"
)]
pub async fn list_alerts(State(state): State<AppState>) -> Result<impl IntoResponse, ServiceError> {
    Ok(Json(state.services.forecasting.list_alerts()))
}

pub async fn delete_alert(
    State(state): State<AppState>,
    Path(run_id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.forecasting.delete_run(run_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
