use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::features::messages::models::{
    Message, MessageFilter, MessagePatch, MessageSort, MessageStatus,
};
use crate::modules::catalog::{default_limit, ListParams, SortOrder};

/// Query params for listing messages
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct MessageQueryParams {
    /// Number of matches to skip
    #[serde(default)]
    #[param(minimum = 0)]
    pub offset: i64,

    /// Items per page (clamped to 100)
    #[serde(default = "default_limit")]
    #[param(minimum = 1, maximum = 100)]
    pub limit: i64,

    /// Sort field (default: createdAt)
    #[serde(default)]
    pub sort_by: MessageSort,

    /// Sort direction (default: asc)
    #[serde(default)]
    pub order: SortOrder,

    /// Case-insensitive match on subject
    pub search_term: Option<String>,

    /// Only messages with this status
    pub status: Option<MessageStatus>,
}

impl From<MessageQueryParams> for ListParams<Message> {
    fn from(q: MessageQueryParams) -> Self {
        ListParams::new(q.sort_by, q.order)
            .page(q.offset, q.limit)
            .search(q.search_term)
            .filter(MessageFilter { status: q.status })
    }
}

// Create request (contact form)
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateMessageDto {
    #[validate(length(min = 1, max = 120))]
    pub name: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1, max = 200))]
    pub subject: String,

    #[validate(length(min = 1, max = 10000))]
    pub body: String,
}

// Update request
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateMessageDto {
    pub status: Option<MessageStatus>,
}

impl From<UpdateMessageDto> for MessagePatch {
    fn from(dto: UpdateMessageDto) -> Self {
        Self { status: dto.status }
    }
}

// Response DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponseDto {
    pub id: String,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub body: String,
    pub status: MessageStatus,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl From<Message> for MessageResponseDto {
    fn from(m: Message) -> Self {
        Self {
            id: m.id,
            name: m.name,
            email: m.email,
            subject: m.subject,
            body: m.body,
            status: m.status,
            created_at: m.created_at,
            modified_at: m.modified_at,
        }
    }
}
