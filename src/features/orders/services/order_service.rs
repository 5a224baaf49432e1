use std::sync::Arc;

use crate::core::error::Result;
use crate::features::orders::dtos::{
    CreateOrderDto, OrderQueryParams, OrderResponseDto, UpdateOrderDto,
};
use crate::features::orders::models::{Order, OrderLine, OrderStatus};
use crate::modules::catalog::{CatalogService, Lookup, Page, Repository};

/// Service for order operations
pub struct OrderService {
    catalog: CatalogService<Order>,
}

impl OrderService {
    pub fn new(repo: Arc<dyn Repository<Order>>) -> Self {
        Self {
            catalog: CatalogService::new(repo),
        }
    }

    /// Underlying catalog service, shared with the dashboard
    pub fn catalog(&self) -> &CatalogService<Order> {
        &self.catalog
    }

    pub async fn list(&self, params: OrderQueryParams) -> Result<Page<OrderResponseDto>> {
        let page = self.catalog.list(&params.into()).await?;
        Ok(page.map(OrderResponseDto::from))
    }

    pub async fn get(&self, id: &str) -> Result<OrderResponseDto> {
        Ok(self.catalog.get(&Lookup::Id(id.to_string())).await?.into())
    }

    /// Place a new order; it starts out as `processing`
    pub async fn create(&self, dto: CreateOrderDto) -> Result<OrderResponseDto> {
        let total = OrderLine::total(&dto.lines)?;

        let order = self
            .catalog
            .add(|meta| Order {
                id: meta.id,
                customer_name: dto.customer_name,
                customer_email: dto.customer_email,
                lines: dto.lines,
                total,
                status: OrderStatus::default(),
                created_at: meta.created_at,
                modified_at: meta.created_at,
            })
            .await?;

        Ok(order.into())
    }

    pub async fn update(&self, id: &str, dto: UpdateOrderDto) -> Result<OrderResponseDto> {
        Ok(self.catalog.update(id, dto.try_into()?).await?.into())
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.catalog.remove(id).await
    }
}
