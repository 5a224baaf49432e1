use tracing::debug;

use crate::core::error::Result;
use crate::features::categories::dtos::CategoryResponseDto;
use crate::features::categories::models::{Category, CategorySort};
use crate::features::dashboard::dtos::DashboardDto;
use crate::features::messages::dtos::MessageResponseDto;
use crate::features::messages::models::{Message, MessageFilter, MessageSort, MessageStatus};
use crate::features::orders::dtos::OrderResponseDto;
use crate::features::orders::models::{Order, OrderFilter, OrderSort, OrderStatus};
use crate::modules::catalog::{CatalogService, ListParams, SortOrder};
use crate::shared::constants::{DASHBOARD_ITEMS, MAX_PAGE_SIZE};

/// Service for the back-office dashboard
pub struct DashboardService {
    orders: CatalogService<Order>,
    messages: CatalogService<Message>,
    categories: CatalogService<Category>,
}

impl DashboardService {
    pub fn new(
        orders: CatalogService<Order>,
        messages: CatalogService<Message>,
        categories: CatalogService<Category>,
    ) -> Self {
        Self {
            orders,
            messages,
            categories,
        }
    }

    /// Fetch new orders, unread messages and categories concurrently.
    /// Any failing read fails the whole dashboard.
    pub async fn get(&self) -> Result<DashboardDto> {
        let new_orders = ListParams::<Order>::new(OrderSort::CreatedAt, SortOrder::Asc)
            .page(0, DASHBOARD_ITEMS)
            .filter(OrderFilter {
                status: Some(OrderStatus::Processing),
            });
        let new_messages = ListParams::<Message>::new(MessageSort::CreatedAt, SortOrder::Asc)
            .page(0, DASHBOARD_ITEMS)
            .filter(MessageFilter {
                status: Some(MessageStatus::Unread),
            });
        let categories =
            ListParams::<Category>::new(CategorySort::Name, SortOrder::Asc).page(0, MAX_PAGE_SIZE);

        let (orders, messages, categories) = futures::try_join!(
            self.orders.list(&new_orders),
            self.messages.list(&new_messages),
            self.categories.list(&categories),
        )?;

        debug!(
            new_orders = orders.total,
            unread_messages = messages.total,
            categories = categories.total,
            "Dashboard loaded"
        );

        Ok(DashboardDto {
            new_order_count: orders.total,
            new_orders: orders.items.into_iter().map(OrderResponseDto::from).collect(),
            unread_message_count: messages.total,
            new_messages: messages
                .items
                .into_iter()
                .map(MessageResponseDto::from)
                .collect(),
            categories: categories
                .items
                .into_iter()
                .map(CategoryResponseDto::from)
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use chrono::{DateTime, Duration, Utc};
    use rust_decimal::Decimal;

    use super::*;
    use crate::core::error::AppError;
    use crate::features::orders::models::OrderLine;
    use crate::modules::catalog::{Lookup, MemoryRepository, Repository};
    use crate::shared::test_helpers::fixed_time;
    use crate::shared::types::Image;

    fn at(minutes: i64) -> DateTime<Utc> {
        fixed_time() + Duration::minutes(minutes)
    }

    fn order(n: i64, status: OrderStatus) -> Order {
        Order {
            id: format!("order-{:02}", n),
            customer_name: format!("Customer {}", n),
            customer_email: "customer@example.com".to_string(),
            lines: vec![OrderLine {
                product_id: "product-1".to_string(),
                name: "Polish".to_string(),
                quantity: 1,
                unit_price: Decimal::new(500, 2),
            }],
            total: Decimal::new(500, 2),
            status,
            created_at: at(n),
            modified_at: at(n),
        }
    }

    fn message(n: i64, status: MessageStatus) -> Message {
        Message {
            id: format!("message-{:02}", n),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            subject: format!("Question {}", n),
            body: "Hello".to_string(),
            status,
            created_at: at(n),
            modified_at: at(n),
        }
    }

    fn category(name: &str) -> Category {
        Category {
            id: format!("category-{}", name.to_lowercase()),
            name: name.to_string(),
            description: String::new(),
            image: Image {
                src: "https://cdn.example.com/c.png".to_string(),
                alt: name.to_string(),
            },
            slug: name.to_lowercase(),
            created_at: fixed_time(),
            modified_at: fixed_time(),
        }
    }

    fn categories() -> CatalogService<Category> {
        CatalogService::new(Arc::new(MemoryRepository::with_records(vec![
            category("Nails"),
            category("Lips"),
            category("Eyes"),
        ])))
    }

    #[tokio::test]
    async fn test_dashboard_joins_three_reads() {
        // Newest first in storage; the dashboard must return oldest first
        let mut orders: Vec<Order> = (1..=9)
            .rev()
            .map(|n| order(n, OrderStatus::Processing))
            .collect();
        orders.push(order(0, OrderStatus::Shipped));

        let messages = vec![
            message(3, MessageStatus::Unread),
            message(1, MessageStatus::Read),
            message(2, MessageStatus::Unread),
        ];

        let service = DashboardService::new(
            CatalogService::new(Arc::new(MemoryRepository::with_records(orders))),
            CatalogService::new(Arc::new(MemoryRepository::with_records(messages))),
            categories(),
        );

        let dashboard = service.get().await.unwrap();

        let order_ids: Vec<_> = dashboard.new_orders.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(
            order_ids,
            vec!["order-01", "order-02", "order-03", "order-04", "order-05", "order-06", "order-07"]
        );
        assert_eq!(dashboard.new_order_count, 9);

        let message_ids: Vec<_> = dashboard
            .new_messages
            .iter()
            .map(|m| m.id.as_str())
            .collect();
        assert_eq!(message_ids, vec!["message-02", "message-03"]);
        assert_eq!(dashboard.unread_message_count, 2);

        let names: Vec<_> = dashboard.categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Eyes", "Lips", "Nails"]);
    }

    /// Repository whose store is always unreachable
    struct Unreachable;

    #[async_trait]
    impl Repository<Message> for Unreachable {
        async fn find_many(&self, _: &ListParams<Message>) -> Result<Vec<Message>> {
            Err(AppError::StoreUnavailable("connection refused".to_string()))
        }

        async fn count(&self, _: &ListParams<Message>) -> Result<i64> {
            Err(AppError::StoreUnavailable("connection refused".to_string()))
        }

        async fn find_one(&self, _: &Lookup) -> Result<Option<Message>> {
            Err(AppError::StoreUnavailable("connection refused".to_string()))
        }

        async fn insert(&self, _: Message) -> Result<Message> {
            Err(AppError::StoreUnavailable("connection refused".to_string()))
        }

        async fn update(
            &self,
            _: &str,
            _: crate::features::messages::models::MessagePatch,
            _: DateTime<Utc>,
        ) -> Result<Option<Message>> {
            Err(AppError::StoreUnavailable("connection refused".to_string()))
        }

        async fn delete(&self, _: &str) -> Result<bool> {
            Err(AppError::StoreUnavailable("connection refused".to_string()))
        }
    }

    #[tokio::test]
    async fn test_any_failing_read_fails_the_dashboard() {
        let service = DashboardService::new(
            CatalogService::new(Arc::new(MemoryRepository::<Order>::new())),
            CatalogService::new(Arc::new(Unreachable)),
            categories(),
        );

        let err = service.get().await.unwrap_err();
        assert!(matches!(err, AppError::StoreUnavailable(_)));
    }
}
