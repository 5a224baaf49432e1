use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::query_builder::Separated;
use sqlx::types::Json;
use sqlx::{FromRow, Postgres, QueryBuilder};
use utoipa::ToSchema;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::modules::catalog::{PgRecord, Record, ResourceKind, SortField};
use crate::shared::validation::{amount_limit, validate_price};

/// Order status enum matching PostgreSQL order_status type
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "order_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

/// One line of an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    #[validate(length(min = 1))]
    pub product_id: String,

    /// Product name at the time of ordering
    #[validate(length(min = 1, max = 120))]
    pub name: String,

    #[validate(range(min = 1))]
    pub quantity: i32,

    #[validate(custom(function = "validate_price"))]
    #[schema(value_type = String, example = "12.50")]
    pub unit_price: Decimal,
}

impl OrderLine {
    pub fn subtotal(&self) -> Result<Decimal> {
        self.unit_price
            .checked_mul(Decimal::from(self.quantity))
            .ok_or_else(|| {
                AppError::Validation(format!(
                    "Line '{}': quantity times unit price is out of range",
                    self.product_id
                ))
            })
    }

    /// Order total: sum of quantity times unit price. Fails with Validation
    /// when the sum does not fit the stored amount.
    pub fn total(lines: &[OrderLine]) -> Result<Decimal> {
        let mut total = Decimal::ZERO;
        for line in lines {
            total = total
                .checked_add(line.subtotal()?)
                .ok_or_else(|| AppError::Validation("Order total is out of range".to_string()))?;
        }

        if total >= amount_limit() {
            return Err(AppError::Validation(format!(
                "Order total must be below {}",
                amount_limit()
            )));
        }
        Ok(total)
    }
}

/// Replacement lines together with their already computed total
#[derive(Debug, Clone, PartialEq)]
pub struct PricedLines {
    lines: Vec<OrderLine>,
    total: Decimal,
}

impl PricedLines {
    pub fn new(lines: Vec<OrderLine>) -> Result<Self> {
        let total = OrderLine::total(&lines)?;
        Ok(Self { lines, total })
    }

    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    pub fn total(&self) -> Decimal {
        self.total
    }
}

/// Domain model for order
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: String,
    pub customer_name: String,
    pub customer_email: String,
    pub lines: Vec<OrderLine>,
    pub total: Decimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

/// Database row for order; `lines` is JSONB
#[derive(Debug, Clone, FromRow)]
pub struct OrderRow {
    pub id: String,
    pub customer_name: String,
    pub customer_email: String,
    pub lines: Json<Vec<OrderLine>>,
    pub total: Decimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

/// Sortable order fields
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum OrderSort {
    #[default]
    CreatedAt,
    ModifiedAt,
    Total,
}

impl SortField for OrderSort {
    fn as_str(&self) -> &'static str {
        match self {
            OrderSort::CreatedAt => "createdAt",
            OrderSort::ModifiedAt => "modifiedAt",
            OrderSort::Total => "total",
        }
    }

    fn column(&self) -> &'static str {
        match self {
            OrderSort::CreatedAt => "created_at",
            OrderSort::ModifiedAt => "modified_at",
            OrderSort::Total => "total",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
}

#[derive(Debug, Clone, Default)]
pub struct OrderPatch {
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    /// Replacing the lines recomputes the total
    pub lines: Option<PricedLines>,
    pub status: Option<OrderStatus>,
}

impl Record for Order {
    const KIND: ResourceKind = ResourceKind::Order;

    type Sort = OrderSort;
    type Filter = OrderFilter;
    type Patch = OrderPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn search_text(&self) -> &str {
        &self.customer_name
    }

    fn matches(&self, filter: &OrderFilter) -> bool {
        filter.status.is_none_or(|s| s == self.status)
    }

    fn compare(&self, other: &Self, field: OrderSort) -> Ordering {
        match field {
            OrderSort::CreatedAt => self.created_at.cmp(&other.created_at),
            OrderSort::ModifiedAt => self.modified_at.cmp(&other.modified_at),
            OrderSort::Total => self.total.cmp(&other.total),
        }
    }

    fn patch_is_empty(patch: &OrderPatch) -> bool {
        patch.customer_name.is_none()
            && patch.customer_email.is_none()
            && patch.lines.is_none()
            && patch.status.is_none()
    }

    fn apply(&mut self, patch: OrderPatch, modified_at: DateTime<Utc>) {
        if let Some(customer_name) = patch.customer_name {
            self.customer_name = customer_name;
        }
        if let Some(customer_email) = patch.customer_email {
            self.customer_email = customer_email;
        }
        if let Some(priced) = patch.lines {
            self.total = priced.total;
            self.lines = priced.lines;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        self.modified_at = modified_at;
    }
}

impl PgRecord for Order {
    type Row = OrderRow;

    const TABLE: &'static str = "orders";
    const COLUMNS: &'static str =
        "id, customer_name, customer_email, lines, total, status, created_at, modified_at";
    const SEARCH_COLUMN: &'static str = "customer_name";

    fn from_row(row: OrderRow) -> Result<Self> {
        Ok(Self {
            id: row.id,
            customer_name: row.customer_name,
            customer_email: row.customer_email,
            lines: row.lines.0,
            total: row.total,
            status: row.status,
            created_at: row.created_at,
            modified_at: row.modified_at,
        })
    }

    fn push_filter(filter: &OrderFilter, qb: &mut QueryBuilder<'_, Postgres>) {
        if let Some(status) = filter.status {
            qb.push(" AND status = ");
            qb.push_bind(status);
        }
    }

    fn push_values(&self, values: &mut Separated<'_, '_, Postgres, &'static str>) -> Result<()> {
        values.push_bind(self.id.clone());
        values.push_bind(self.customer_name.clone());
        values.push_bind(self.customer_email.clone());
        values.push_bind(Json(self.lines.clone()));
        values.push_bind(self.total);
        values.push_bind(self.status);
        values.push_bind(self.created_at);
        values.push_bind(self.modified_at);
        Ok(())
    }

    fn push_patch(
        patch: &OrderPatch,
        set: &mut Separated<'_, '_, Postgres, &'static str>,
    ) -> Result<()> {
        if let Some(customer_name) = &patch.customer_name {
            set.push("customer_name = ")
                .push_bind_unseparated(customer_name.clone());
        }
        if let Some(customer_email) = &patch.customer_email {
            set.push("customer_email = ")
                .push_bind_unseparated(customer_email.clone());
        }
        if let Some(priced) = &patch.lines {
            set.push("lines = ")
                .push_bind_unseparated(Json(priced.lines().to_vec()));
            set.push("total = ").push_bind_unseparated(priced.total());
        }
        if let Some(status) = patch.status {
            set.push("status = ").push_bind_unseparated(status);
        }
        Ok(())
    }
}
