use utoipa::{Modify, OpenApi};

use crate::features::categories::{
    dtos as categories_dtos, handlers as categories_handlers, models as categories_models,
};
use crate::features::dashboard::{dtos as dashboard_dtos, handlers as dashboard_handlers};
use crate::features::messages::{
    dtos as messages_dtos, handlers as messages_handlers, models as messages_models,
};
use crate::features::orders::{
    dtos as orders_dtos, handlers as orders_handlers, models as orders_models,
};
use crate::features::products::{
    dtos as products_dtos, handlers as products_handlers, models as products_models,
};
use crate::modules::catalog::SortOrder;
use crate::shared::types::{ApiResponse, Image, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Categories
        categories_handlers::list_categories,
        categories_handlers::get_category,
        categories_handlers::get_category_by_slug,
        categories_handlers::create_category,
        categories_handlers::upload_category,
        categories_handlers::update_category,
        categories_handlers::delete_category,
        // Products
        products_handlers::list_products,
        products_handlers::get_product,
        products_handlers::get_product_by_slug,
        products_handlers::create_product,
        products_handlers::upload_product,
        products_handlers::update_product,
        products_handlers::delete_product,
        // Orders
        orders_handlers::list_orders,
        orders_handlers::get_order,
        orders_handlers::create_order,
        orders_handlers::update_order,
        orders_handlers::delete_order,
        // Messages
        messages_handlers::list_messages,
        messages_handlers::get_message,
        messages_handlers::create_message,
        messages_handlers::update_message,
        messages_handlers::delete_message,
        // Dashboard
        dashboard_handlers::get_dashboard,
    ),
    components(
        schemas(
            Meta,
            Image,
            SortOrder,
            // Categories
            categories_models::CategorySort,
            categories_dtos::CreateCategoryDto,
            categories_dtos::UploadCategoryDto,
            categories_dtos::UpdateCategoryDto,
            categories_dtos::CategoryResponseDto,
            ApiResponse<categories_dtos::CategoryResponseDto>,
            ApiResponse<Vec<categories_dtos::CategoryResponseDto>>,
            // Products
            products_models::ProductSort,
            products_models::Variant,
            products_models::Promotion,
            products_dtos::CreateProductDto,
            products_dtos::UploadProductDto,
            products_dtos::UpdateProductDto,
            products_dtos::ProductResponseDto,
            ApiResponse<products_dtos::ProductResponseDto>,
            ApiResponse<Vec<products_dtos::ProductResponseDto>>,
            // Orders
            orders_models::OrderSort,
            orders_models::OrderStatus,
            orders_models::OrderLine,
            orders_dtos::CreateOrderDto,
            orders_dtos::UpdateOrderDto,
            orders_dtos::OrderResponseDto,
            ApiResponse<orders_dtos::OrderResponseDto>,
            ApiResponse<Vec<orders_dtos::OrderResponseDto>>,
            // Messages
            messages_models::MessageSort,
            messages_models::MessageStatus,
            messages_dtos::CreateMessageDto,
            messages_dtos::UpdateMessageDto,
            messages_dtos::MessageResponseDto,
            ApiResponse<messages_dtos::MessageResponseDto>,
            ApiResponse<Vec<messages_dtos::MessageResponseDto>>,
            // Dashboard
            dashboard_dtos::DashboardDto,
            ApiResponse<dashboard_dtos::DashboardDto>,
        )
    ),
    tags(
        (name = "categories", description = "Product categories"),
        (name = "products", description = "Catalog products with variants and promotions"),
        (name = "orders", description = "Customer orders"),
        (name = "messages", description = "Contact form messages"),
        (name = "dashboard", description = "Back-office overview"),
    ),
    info(
        title = "Catalog API",
        version = "0.1.0",
        description = "Catalog back-office API documentation",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
