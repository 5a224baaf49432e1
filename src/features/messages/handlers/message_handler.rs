use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::core::error::Result;
use crate::core::extractor::{AppJson, AppQuery};
use crate::features::messages::dtos::{
    CreateMessageDto, MessageQueryParams, MessageResponseDto, UpdateMessageDto,
};
use crate::features::messages::services::MessageService;
use crate::shared::types::{ApiResponse, Meta};

/// List customer messages with pagination, sorting, search and status filter
#[utoipa::path(
    get,
    path = "/api/messages",
    params(MessageQueryParams),
    responses(
        (status = 200, description = "Messages retrieved successfully", body = ApiResponse<Vec<MessageResponseDto>>),
        (status = 400, description = "Invalid query parameters"),
        (status = 503, description = "Store unavailable")
    ),
    tag = "messages"
)]
pub async fn list_messages(
    State(service): State<Arc<MessageService>>,
    AppQuery(params): AppQuery<MessageQueryParams>,
) -> Result<Json<ApiResponse<Vec<MessageResponseDto>>>> {
    let page = service.list(params).await?;
    Ok(Json(ApiResponse::success(
        Some(page.items),
        None,
        Some(Meta { total: page.total }),
    )))
}

/// Get a message by ID
#[utoipa::path(
    get,
    path = "/api/messages/{id}",
    params(
        ("id" = String, Path, description = "Message ID")
    ),
    responses(
        (status = 200, description = "Message found", body = ApiResponse<MessageResponseDto>),
        (status = 404, description = "Message not found")
    ),
    tag = "messages"
)]
pub async fn get_message(
    State(service): State<Arc<MessageService>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<MessageResponseDto>>> {
    let message = service.get(&id).await?;
    Ok(Json(ApiResponse::success(Some(message), None, None)))
}

/// Submit a customer message
#[utoipa::path(
    post,
    path = "/api/messages",
    request_body = CreateMessageDto,
    responses(
        (status = 201, description = "Message stored", body = ApiResponse<MessageResponseDto>),
        (status = 400, description = "Validation error")
    ),
    tag = "messages"
)]
pub async fn create_message(
    State(service): State<Arc<MessageService>>,
    AppJson(dto): AppJson<CreateMessageDto>,
) -> Result<(StatusCode, Json<ApiResponse<MessageResponseDto>>)> {
    dto.validate()?;

    let message = service.create(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(message), None, None)),
    ))
}

/// Update a message (mark read / unread)
#[utoipa::path(
    patch,
    path = "/api/messages/{id}",
    params(
        ("id" = String, Path, description = "Message ID")
    ),
    request_body = UpdateMessageDto,
    responses(
        (status = 200, description = "Message updated", body = ApiResponse<MessageResponseDto>),
        (status = 404, description = "Message not found")
    ),
    tag = "messages"
)]
pub async fn update_message(
    State(service): State<Arc<MessageService>>,
    Path(id): Path<String>,
    AppJson(dto): AppJson<UpdateMessageDto>,
) -> Result<Json<ApiResponse<MessageResponseDto>>> {
    let message = service.update(&id, dto).await?;
    Ok(Json(ApiResponse::success(Some(message), None, None)))
}

/// Delete a message permanently
#[utoipa::path(
    delete,
    path = "/api/messages/{id}",
    params(
        ("id" = String, Path, description = "Message ID")
    ),
    responses(
        (status = 204, description = "Message deleted"),
        (status = 404, description = "Message not found")
    ),
    tag = "messages"
)]
pub async fn delete_message(
    State(service): State<Arc<MessageService>>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    service.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use axum_test::TestServer;
    use serde_json::{json, Value};

    use crate::features::messages::models::Message;
    use crate::features::messages::routes;
    use crate::modules::catalog::MemoryRepository;

    use super::*;

    fn server() -> TestServer {
        let service = MessageService::new(Arc::new(MemoryRepository::<Message>::new()));
        TestServer::new(routes(Arc::new(service))).unwrap()
    }

    #[tokio::test]
    async fn test_submit_and_mark_read() {
        let server = server();

        let response = server
            .post("/api/messages")
            .json(&json!({
                "name": "Ada",
                "email": "ada@example.com",
                "subject": "Shade question",
                "body": "Does the red come in matte?"
            }))
            .await;
        assert_eq!(response.status_code(), StatusCode::CREATED);
        let created = response.json::<Value>()["data"].clone();
        assert_eq!(created["status"], "unread");

        let url = format!("/api/messages/{}", created["id"].as_str().unwrap());
        let response = server.patch(&url).json(&json!({"status": "read"})).await;
        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(response.json::<Value>()["data"]["status"], "read");
    }

    #[tokio::test]
    async fn test_submit_rejects_bad_email() {
        let server = server();

        let response = server
            .post("/api/messages")
            .json(&json!({
                "name": "Ada",
                "email": "nope",
                "subject": "Hi",
                "body": "Hello"
            }))
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        let body = response.json::<Value>();
        assert_eq!(body["success"], false);
        assert!(body["errors"].is_array());
    }

    #[tokio::test]
    async fn test_list_rejects_unknown_sort_field() {
        let server = server();

        let response = server
            .get("/api/messages")
            .add_query_param("sortBy", "total")
            .await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_get_missing_message() {
        let server = server();

        let response = server.get("/api/messages/message-missing").await;
        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(response.json::<Value>()["success"], false);
    }
}
