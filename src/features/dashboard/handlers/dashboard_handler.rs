use axum::{extract::State, Json};
use std::sync::Arc;

use crate::core::error::AppError;
use crate::features::dashboard::dtos::DashboardDto;
use crate::features::dashboard::services::DashboardService;
use crate::shared::types::ApiResponse;

/// Get the back-office dashboard
///
/// Returns the 7 oldest processing orders, the 7 oldest unread messages and
/// up to 100 categories sorted by name.
#[utoipa::path(
    get,
    path = "/api/dashboard",
    tag = "dashboard",
    responses(
        (status = 200, description = "Dashboard data", body = ApiResponse<DashboardDto>),
        (status = 503, description = "Store unavailable"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_dashboard(
    State(service): State<Arc<DashboardService>>,
) -> Result<Json<ApiResponse<DashboardDto>>, AppError> {
    let dashboard = service.get().await?;
    Ok(Json(ApiResponse::success(Some(dashboard), None, None)))
}
