use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::core::error::Result;
use crate::core::extractor::{AppJson, AppQuery};
use crate::features::orders::dtos::{
    CreateOrderDto, OrderQueryParams, OrderResponseDto, UpdateOrderDto,
};
use crate::features::orders::services::OrderService;
use crate::shared::types::{ApiResponse, Meta};

/// List orders with pagination, sorting, search and status filter
#[utoipa::path(
    get,
    path = "/api/orders",
    params(OrderQueryParams),
    responses(
        (status = 200, description = "Orders retrieved successfully", body = ApiResponse<Vec<OrderResponseDto>>),
        (status = 400, description = "Invalid query parameters"),
        (status = 503, description = "Store unavailable")
    ),
    tag = "orders"
)]
pub async fn list_orders(
    State(service): State<Arc<OrderService>>,
    AppQuery(params): AppQuery<OrderQueryParams>,
) -> Result<Json<ApiResponse<Vec<OrderResponseDto>>>> {
    let page = service.list(params).await?;
    Ok(Json(ApiResponse::success(
        Some(page.items),
        None,
        Some(Meta { total: page.total }),
    )))
}

/// Get an order by ID
#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    params(
        ("id" = String, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Order found", body = ApiResponse<OrderResponseDto>),
        (status = 404, description = "Order not found")
    ),
    tag = "orders"
)]
pub async fn get_order(
    State(service): State<Arc<OrderService>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<OrderResponseDto>>> {
    let order = service.get(&id).await?;
    Ok(Json(ApiResponse::success(Some(order), None, None)))
}

/// Place an order (total is computed from the lines)
#[utoipa::path(
    post,
    path = "/api/orders",
    request_body = CreateOrderDto,
    responses(
        (status = 201, description = "Order created successfully", body = ApiResponse<OrderResponseDto>),
        (status = 400, description = "Validation error")
    ),
    tag = "orders"
)]
pub async fn create_order(
    State(service): State<Arc<OrderService>>,
    AppJson(dto): AppJson<CreateOrderDto>,
) -> Result<(StatusCode, Json<ApiResponse<OrderResponseDto>>)> {
    dto.validate()?;

    let order = service.create(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(order), None, None)),
    ))
}

/// Update an order (status changes, corrections)
#[utoipa::path(
    patch,
    path = "/api/orders/{id}",
    params(
        ("id" = String, Path, description = "Order ID")
    ),
    request_body = UpdateOrderDto,
    responses(
        (status = 200, description = "Order updated successfully", body = ApiResponse<OrderResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Order not found")
    ),
    tag = "orders"
)]
pub async fn update_order(
    State(service): State<Arc<OrderService>>,
    Path(id): Path<String>,
    AppJson(dto): AppJson<UpdateOrderDto>,
) -> Result<Json<ApiResponse<OrderResponseDto>>> {
    dto.validate()?;

    let order = service.update(&id, dto).await?;
    Ok(Json(ApiResponse::success(Some(order), None, None)))
}

/// Delete an order permanently
#[utoipa::path(
    delete,
    path = "/api/orders/{id}",
    params(
        ("id" = String, Path, description = "Order ID")
    ),
    responses(
        (status = 204, description = "Order deleted"),
        (status = 404, description = "Order not found")
    ),
    tag = "orders"
)]
pub async fn delete_order(
    State(service): State<Arc<OrderService>>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    service.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use axum_test::TestServer;
    use serde_json::{json, Value};

    use crate::features::orders::models::Order;
    use crate::features::orders::routes;
    use crate::modules::catalog::MemoryRepository;

    use super::*;

    fn server() -> TestServer {
        let service = OrderService::new(Arc::new(MemoryRepository::<Order>::new()));
        TestServer::new(routes(Arc::new(service))).unwrap()
    }

    async fn place(server: &TestServer, customer: &str, quantity: i32) -> Value {
        let response = server
            .post("/api/orders")
            .json(&json!({
                "customerName": customer,
                "customerEmail": "customer@example.com",
                "lines": [
                    {"productId": "product-1", "name": "Polish", "quantity": quantity, "unitPrice": "5.00"}
                ]
            }))
            .await;
        assert_eq!(response.status_code(), StatusCode::CREATED);
        response.json::<Value>()["data"].clone()
    }

    #[tokio::test]
    async fn test_place_order() {
        let server = server();
        let order = place(&server, "Ada", 3).await;

        assert!(order["id"].as_str().unwrap().starts_with("order-"));
        assert_eq!(order["status"], "processing");
        assert_eq!(order["total"], "15.00");
    }

    #[tokio::test]
    async fn test_client_cannot_set_total() {
        let server = server();

        let response = server
            .post("/api/orders")
            .json(&json!({
                "customerName": "Ada",
                "customerEmail": "ada@example.com",
                "total": "0.01",
                "lines": [
                    {"productId": "product-1", "name": "Polish", "quantity": 1, "unitPrice": "5.00"}
                ]
            }))
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_amounts_beyond_storage_are_rejected() {
        let server = server();

        let response = server
            .post("/api/orders")
            .json(&json!({
                "customerName": "Ada",
                "customerEmail": "ada@example.com",
                "lines": [
                    {"productId": "product-1", "name": "Polish", "quantity": 2, "unitPrice": "79228162514264337593543950335"}
                ]
            }))
            .await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

        // Valid unit price, total too large for the stored amount
        let response = server
            .post("/api/orders")
            .json(&json!({
                "customerName": "Ada",
                "customerEmail": "ada@example.com",
                "lines": [
                    {"productId": "product-1", "name": "Polish", "quantity": 2147483647, "unitPrice": "9999.99"}
                ]
            }))
            .await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

        let order = place(&server, "Ada", 1).await;
        let url = format!("/api/orders/{}", order["id"].as_str().unwrap());
        let response = server
            .patch(&url)
            .json(&json!({
                "lines": [
                    {"productId": "product-1", "name": "Polish", "quantity": 2147483647, "unitPrice": "9999.99"}
                ]
            }))
            .await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

        let body = server.get(&url).await.json::<Value>();
        assert_eq!(body["data"]["total"], "5.00");
        assert_eq!(server.get("/api/orders").await.json::<Value>()["meta"]["total"], 1);
    }

    #[tokio::test]
    async fn test_list_filters_by_status() {
        let server = server();
        let first = place(&server, "Ada", 1).await;
        place(&server, "Grace", 2).await;

        let url = format!("/api/orders/{}", first["id"].as_str().unwrap());
        let response = server.patch(&url).json(&json!({"status": "shipped"})).await;
        assert_eq!(response.json::<Value>()["data"]["status"], "shipped");

        let response = server
            .get("/api/orders")
            .add_query_param("status", "processing")
            .await;
        let body = response.json::<Value>();
        assert_eq!(body["meta"]["total"], 1);
        assert_eq!(body["data"][0]["customerName"], "Grace");
    }

    #[tokio::test]
    async fn test_list_rejects_unknown_status() {
        let server = server();

        let response = server
            .get("/api/orders")
            .add_query_param("status", "returned")
            .await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_delete_twice() {
        let server = server();
        let order = place(&server, "Ada", 1).await;
        let url = format!("/api/orders/{}", order["id"].as_str().unwrap());

        assert_eq!(server.delete(&url).await.status_code(), StatusCode::NO_CONTENT);
        assert_eq!(server.delete(&url).await.status_code(), StatusCode::NOT_FOUND);
    }
}
