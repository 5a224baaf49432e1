use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::categories::dtos::CategoryResponseDto;
use crate::features::messages::dtos::MessageResponseDto;
use crate::features::orders::dtos::OrderResponseDto;

/// Back-office home page: oldest pending work first, plus the category list
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardDto {
    /// Oldest orders still `processing`
    pub new_orders: Vec<OrderResponseDto>,
    /// Number of orders still `processing`
    pub new_order_count: i64,
    /// Oldest `unread` messages
    pub new_messages: Vec<MessageResponseDto>,
    /// Number of `unread` messages
    pub unread_message_count: i64,
    /// Categories sorted by name
    pub categories: Vec<CategoryResponseDto>,
}
