use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::core::error::AppError;
use crate::features::orders::models::{
    Order, OrderFilter, OrderLine, OrderPatch, OrderSort, OrderStatus, PricedLines,
};
use crate::modules::catalog::{default_limit, ListParams, SortOrder};

/// Query params for listing orders
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct OrderQueryParams {
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
    pub sort_by: OrderSort,

    /// Sort direction (default: asc)
    #[serde(default)]
    pub order: SortOrder,

    /// Case-insensitive match on customer name
    pub search_term: Option<String>,

    /// Only orders with this status
    pub status: Option<OrderStatus>,
}

impl From<OrderQueryParams> for ListParams<Order> {
    fn from(q: OrderQueryParams) -> Self {
        ListParams::new(q.sort_by, q.order)
            .page(q.offset, q.limit)
            .search(q.search_term)
            .filter(OrderFilter { status: q.status })
    }
}

// Create request; the total is always computed from the lines
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateOrderDto {
    #[validate(length(min = 1, max = 120))]
    pub customer_name: String,

    #[validate(email)]
    pub customer_email: String,

    #[validate(length(min = 1, message = "an order needs at least one line"), nested)]
    pub lines: Vec<OrderLine>,
}

// Update request
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateOrderDto {
    #[validate(length(min = 1, max = 120))]
    pub customer_name: Option<String>,

    #[validate(email)]
    pub customer_email: Option<String>,

    /// Replaces all lines and recomputes the total
    #[validate(length(min = 1, message = "an order needs at least one line"), nested)]
    pub lines: Option<Vec<OrderLine>>,

    pub status: Option<OrderStatus>,
}

impl TryFrom<UpdateOrderDto> for OrderPatch {
    type Error = AppError;

    fn try_from(dto: UpdateOrderDto) -> Result<Self, AppError> {
        Ok(Self {
            customer_name: dto.customer_name,
            customer_email: dto.customer_email,
            lines: dto.lines.map(PricedLines::new).transpose()?,
            status: dto.status,
        })
    }
}

// Response DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponseDto {
    pub id: String,
    pub customer_name: String,
    pub customer_email: String,
    pub lines: Vec<OrderLine>,
    #[schema(value_type = String, example = "34.99")]
    pub total: Decimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl From<Order> for OrderResponseDto {
    fn from(o: Order) -> Self {
        Self {
            id: o.id,
            customer_name: o.customer_name,
            customer_email: o.customer_email,
            lines: o.lines,
            total: o.total,
            status: o.status,
            created_at: o.created_at,
            modified_at: o.modified_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_dto_rejects_total_and_empty_lines() {
        let result = serde_json::from_value::<CreateOrderDto>(serde_json::json!({
            "customerName": "Ada",
            "customerEmail": "ada@example.com",
            "lines": [],
            "total": "1.00"
        }));
        assert!(result.is_err());

        let dto: CreateOrderDto = serde_json::from_value(serde_json::json!({
            "customerName": "Ada",
            "customerEmail": "not-an-email",
            "lines": []
        }))
        .unwrap();
        let errors = dto.validate().unwrap_err();
        assert!(errors.errors().contains_key("customer_email"));
        assert!(errors.errors().contains_key("lines"));
    }

    #[test]
    fn test_line_quantity_must_be_positive() {
        let dto: CreateOrderDto = serde_json::from_value(serde_json::json!({
            "customerName": "Ada",
            "customerEmail": "ada@example.com",
            "lines": [{"productId": "product-1", "name": "Polish", "quantity": 0, "unitPrice": "9.99"}]
        }))
        .unwrap();

        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_unit_price_must_fit_stored_amount() {
        for price in ["12.345", "10000000000", "79228162514264337593543950335"] {
            let dto: CreateOrderDto = serde_json::from_value(serde_json::json!({
                "customerName": "Ada",
                "customerEmail": "ada@example.com",
                "lines": [{"productId": "product-1", "name": "Polish", "quantity": 2, "unitPrice": price}]
            }))
            .unwrap();

            assert!(dto.validate().is_err(), "{price} should be rejected");
        }
    }

    #[test]
    fn test_update_dto_prices_replacement_lines() {
        let dto = UpdateOrderDto {
            lines: Some(vec![OrderLine {
                product_id: "product-1".to_string(),
                name: "Polish".to_string(),
                quantity: 3,
                unit_price: Decimal::new(250, 2),
            }]),
            ..Default::default()
        };
        let patch = OrderPatch::try_from(dto).unwrap();
        assert_eq!(patch.lines.unwrap().total(), Decimal::new(750, 2));

        let dto = UpdateOrderDto {
            lines: Some(vec![OrderLine {
                product_id: "product-1".to_string(),
                name: "Polish".to_string(),
                quantity: i32::MAX,
                unit_price: Decimal::new(999_999, 2),
            }]),
            ..Default::default()
        };
        assert!(matches!(
            OrderPatch::try_from(dto),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_query_params_status_filter() {
        let params: OrderQueryParams =
            serde_json::from_value(serde_json::json!({"status": "shipped"})).unwrap();
        let list: ListParams<Order> = params.into();

        assert_eq!(list.filter.status, Some(OrderStatus::Shipped));
        assert_eq!(list.sort_by, OrderSort::CreatedAt);
    }
}
