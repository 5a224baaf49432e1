use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::core::error::Result;
use crate::core::extractor::{AppJson, AppQuery};
use crate::features::products::dtos::{
    CreateProductDto, ProductQueryParams, ProductResponseDto, UpdateProductDto, UploadProductDto,
};
use crate::features::products::services::ProductService;
use crate::modules::catalog::Lookup;
use crate::shared::types::{ApiResponse, Meta};
use crate::shared::upload::ImageForm;

/// List products with pagination, sorting, search and filters
#[utoipa::path(
    get,
    path = "/api/products",
    params(ProductQueryParams),
    responses(
        (status = 200, description = "Products retrieved successfully", body = ApiResponse<Vec<ProductResponseDto>>),
        (status = 400, description = "Invalid query parameters"),
        (status = 503, description = "Store unavailable")
    ),
    tag = "products"
)]
pub async fn list_products(
    State(service): State<Arc<ProductService>>,
    AppQuery(params): AppQuery<ProductQueryParams>,
) -> Result<Json<ApiResponse<Vec<ProductResponseDto>>>> {
    let page = service.list(params).await?;
    Ok(Json(ApiResponse::success(
        Some(page.items),
        None,
        Some(Meta { total: page.total }),
    )))
}

/// Get a product by ID
#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(
        ("id" = String, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product found", body = ApiResponse<ProductResponseDto>),
        (status = 404, description = "Product not found")
    ),
    tag = "products"
)]
pub async fn get_product(
    State(service): State<Arc<ProductService>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ProductResponseDto>>> {
    let product = service.get(&Lookup::Id(id)).await?;
    Ok(Json(ApiResponse::success(Some(product), None, None)))
}

/// Get a product by slug
#[utoipa::path(
    get,
    path = "/api/products/slug/{slug}",
    params(
        ("slug" = String, Path, description = "Product slug")
    ),
    responses(
        (status = 200, description = "Product found", body = ApiResponse<ProductResponseDto>),
        (status = 404, description = "Product not found")
    ),
    tag = "products"
)]
pub async fn get_product_by_slug(
    State(service): State<Arc<ProductService>>,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<ProductResponseDto>>> {
    let product = service.get(&Lookup::Slug(slug)).await?;
    Ok(Json(ApiResponse::success(Some(product), None, None)))
}

/// Create a product
#[utoipa::path(
    post,
    path = "/api/products",
    request_body = CreateProductDto,
    responses(
        (status = 201, description = "Product created successfully", body = ApiResponse<ProductResponseDto>),
        (status = 400, description = "Validation error or unknown category"),
        (status = 409, description = "Slug already in use")
    ),
    tag = "products"
)]
pub async fn create_product(
    State(service): State<Arc<ProductService>>,
    AppJson(dto): AppJson<CreateProductDto>,
) -> Result<(StatusCode, Json<ApiResponse<ProductResponseDto>>)> {
    dto.validate()?;

    let product = service.create(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(product), None, None)),
    ))
}

/// Create a product with an uploaded image
///
/// Accepts multipart/form-data with:
/// - `name`, `price`, `categoryId`: required
/// - `image`: The image file (required)
/// - `description`, `slug`, `alt`: optional
#[utoipa::path(
    post,
    path = "/api/products/upload",
    request_body(
        content = UploadProductDto,
        content_type = "multipart/form-data",
        description = "Product fields plus the raw image file",
    ),
    responses(
        (status = 201, description = "Product created successfully", body = ApiResponse<ProductResponseDto>),
        (status = 400, description = "Invalid image or validation error"),
        (status = 409, description = "Slug already in use"),
        (status = 413, description = "Image too large")
    ),
    tag = "products"
)]
pub async fn upload_product(
    State(service): State<Arc<ProductService>>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<ProductResponseDto>>)> {
    let form = ImageForm::read(multipart).await?;

    let product = service.create_with_upload(form).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(product), None, None)),
    ))
}

/// Update a product (only supplied fields change)
#[utoipa::path(
    patch,
    path = "/api/products/{id}",
    params(
        ("id" = String, Path, description = "Product ID")
    ),
    request_body = UpdateProductDto,
    responses(
        (status = 200, description = "Product updated successfully", body = ApiResponse<ProductResponseDto>),
        (status = 400, description = "Validation error or unknown category"),
        (status = 404, description = "Product not found"),
        (status = 409, description = "Slug already in use")
    ),
    tag = "products"
)]
pub async fn update_product(
    State(service): State<Arc<ProductService>>,
    Path(id): Path<String>,
    AppJson(dto): AppJson<UpdateProductDto>,
) -> Result<Json<ApiResponse<ProductResponseDto>>> {
    dto.validate()?;

    let product = service.update(&id, dto).await?;
    Ok(Json(ApiResponse::success(Some(product), None, None)))
}

/// Delete a product permanently
#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    params(
        ("id" = String, Path, description = "Product ID")
    ),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 404, description = "Product not found")
    ),
    tag = "products"
)]
pub async fn delete_product(
    State(service): State<Arc<ProductService>>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    service.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use axum_test::multipart::{MultipartForm, Part};
    use axum_test::TestServer;
    use serde_json::{json, Value};

    use crate::features::categories::models::Category;
    use crate::features::products::models::Product;
    use crate::features::products::routes;
    use crate::modules::catalog::{CatalogService, MemoryRepository};
    use crate::modules::storage::MemoryStorage;
    use crate::shared::test_helpers::{fixed_time, png_bytes};
    use crate::shared::types::Image;

    use super::*;

    fn server() -> (TestServer, Arc<MemoryStorage>) {
        let categories = CatalogService::new(Arc::new(MemoryRepository::with_records(vec![
            Category {
                id: "category-nails".to_string(),
                name: "Nails".to_string(),
                description: String::new(),
                image: Image {
                    src: "https://cdn.example.com/nails.png".to_string(),
                    alt: "Nails".to_string(),
                },
                slug: "nails".to_string(),
                created_at: fixed_time(),
                modified_at: fixed_time(),
            },
        ])));
        let storage = Arc::new(MemoryStorage::new());
        let service = ProductService::new(
            Arc::new(MemoryRepository::<Product>::new()),
            categories,
            storage.clone(),
        );
        let server = TestServer::new(routes(Arc::new(service))).unwrap();
        (server, storage)
    }

    async fn create(server: &TestServer, name: &str, price: &str) -> Value {
        let response = server
            .post("/api/products")
            .json(&json!({
                "name": name,
                "price": price,
                "categoryId": "category-nails",
                "image": {"src": "https://cdn.example.com/product.png", "alt": name}
            }))
            .await;
        assert_eq!(response.status_code(), StatusCode::CREATED);
        response.json::<Value>()["data"].clone()
    }

    #[tokio::test]
    async fn test_list_sorted_by_price_desc() {
        let (server, _) = server();
        create(&server, "Base Coat", "11.00").await;
        create(&server, "Top Coat", "15.00").await;
        create(&server, "Cuticle Oil", "7.50").await;

        let response = server
            .get("/api/products")
            .add_query_param("sortBy", "price")
            .add_query_param("order", "desc")
            .add_query_param("limit", 2)
            .await;

        assert_eq!(response.status_code(), StatusCode::OK);
        let body = response.json::<Value>();
        let names: Vec<&str> = body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Top Coat", "Base Coat"]);
        assert_eq!(body["meta"]["total"], 3);
    }

    #[tokio::test]
    async fn test_list_filter_by_variants() {
        let (server, _) = server();
        let plain = create(&server, "Base Coat", "11.00").await;
        create(&server, "Polish", "9.00").await;

        let response = server
            .get("/api/products")
            .add_query_param("hasVariants", false)
            .add_query_param("searchTerm", "coat")
            .await;

        let body = response.json::<Value>();
        assert_eq!(body["meta"]["total"], 1);
        assert_eq!(body["data"][0]["id"], plain["id"]);
    }

    #[tokio::test]
    async fn test_create_with_unknown_category_is_rejected() {
        let (server, _) = server();

        let response = server
            .post("/api/products")
            .json(&json!({
                "name": "Polish",
                "price": "9.00",
                "categoryId": "category-missing",
                "image": {"src": "https://cdn.example.com/polish.png", "alt": "Polish"}
            }))
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_update_variants_and_get_by_slug() {
        let (server, _) = server();
        let created = create(&server, "Polish", "9.00").await;
        let url = format!("/api/products/{}", created["id"].as_str().unwrap());

        let response = server
            .patch(&url)
            .json(&json!({"variants": [{"name": "Red"}, {"name": "Gold", "price": "11.00"}]}))
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);

        let fetched = server.get("/api/products/slug/polish").await;
        let data = fetched.json::<Value>()["data"].clone();
        assert_eq!(data["variants"].as_array().unwrap().len(), 2);
        assert_eq!(data["variants"][0]["name"], "Red");
    }

    #[tokio::test]
    async fn test_delete_missing_product() {
        let (server, _) = server();

        let response = server.delete("/api/products/product-missing").await;
        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_upload_creates_product() {
        let (server, storage) = server();

        let form = MultipartForm::new()
            .add_text("name", "Top Coat")
            .add_text("price", "15.00")
            .add_text("categoryId", "category-nails")
            .add_text("alt", "Glossy top coat")
            .add_part(
                "image",
                Part::bytes(png_bytes())
                    .file_name("topcoat.webp")
                    .mime_type("image/webp"),
            );

        let response = server.post("/api/products/upload").multipart(form).await;
        assert_eq!(response.status_code(), StatusCode::CREATED);

        let data = response.json::<Value>()["data"].clone();
        let src = data["image"]["src"].as_str().unwrap();
        assert!(src.starts_with("memory://catalog-images/product/"));
        assert!(src.ends_with(".webp"));
        assert_eq!(data["image"]["alt"], "Glossy top coat");
        assert_eq!(storage.len().await, 1);
    }

    #[tokio::test]
    async fn test_upload_requires_price() {
        let (server, storage) = server();

        let form = MultipartForm::new()
            .add_text("name", "Top Coat")
            .add_text("categoryId", "category-nails")
            .add_part(
                "image",
                Part::bytes(png_bytes())
                    .file_name("topcoat.png")
                    .mime_type("image/png"),
            );

        let response = server.post("/api/products/upload").multipart(form).await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(storage.len().await, 0);
    }
}
