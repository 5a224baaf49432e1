use std::str::FromStr;
use std::sync::Arc;

use rust_decimal::Decimal;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::categories::models::Category;
use crate::features::products::dtos::{
    CreateProductDto, ProductQueryParams, ProductResponseDto, UpdateProductDto,
};
use crate::features::products::models::Product;
use crate::modules::catalog::{CatalogService, Lookup, Page, Record, Repository};
use crate::modules::storage::ObjectStorage;
use crate::shared::upload::{discard_image, store_image, ImageForm};
use crate::shared::validation::resolve_slug;

/// Service for product operations
pub struct ProductService {
    catalog: CatalogService<Product>,
    categories: CatalogService<Category>,
    storage: Arc<dyn ObjectStorage>,
}

impl ProductService {
    pub fn new(
        repo: Arc<dyn Repository<Product>>,
        categories: CatalogService<Category>,
        storage: Arc<dyn ObjectStorage>,
    ) -> Self {
        Self {
            catalog: CatalogService::new(repo),
            categories,
            storage,
        }
    }

    /// List products with pagination, sorting, search and filters
    pub async fn list(&self, params: ProductQueryParams) -> Result<Page<ProductResponseDto>> {
        let page = self.catalog.list(&params.into()).await?;
        Ok(page.map(ProductResponseDto::from))
    }

    /// Get product by id or slug
    pub async fn get(&self, lookup: &Lookup) -> Result<ProductResponseDto> {
        Ok(self.catalog.get(lookup).await?.into())
    }

    /// Create a product from a JSON payload
    pub async fn create(&self, dto: CreateProductDto) -> Result<ProductResponseDto> {
        let slug = resolve_slug(dto.slug, &dto.name)?;
        self.ensure_category_exists(&dto.category_id).await?;

        let product = self
            .catalog
            .add(|meta| Product {
                id: meta.id,
                name: dto.name,
                description: dto.description,
                slug,
                price: dto.price,
                category_id: dto.category_id,
                image: dto.image,
                variants: dto.variants,
                promotion: dto.promotion,
                created_at: meta.created_at,
                modified_at: meta.created_at,
            })
            .await?;

        Ok(product.into())
    }

    /// Create a product from a multipart form carrying the raw image file.
    ///
    /// The image is stored first; it is discarded again if the product
    /// cannot be created.
    pub async fn create_with_upload(&self, mut form: ImageForm) -> Result<ProductResponseDto> {
        let name = form.require_text("name")?;
        let price = parse_price(&form.require_text("price")?)?;
        let category_id = form.require_text("categoryId")?;
        self.ensure_category_exists(&category_id).await?;

        let upload = form.take_image()?;
        let alt = form.text("alt").unwrap_or_else(|| name.clone());

        let image = store_image(self.storage.as_ref(), Product::KIND, upload, alt).await?;
        let dto = CreateProductDto {
            name,
            description: form.text("description").unwrap_or_default(),
            slug: form.text("slug"),
            price,
            category_id,
            image: image.clone(),
            variants: Vec::new(),
            promotion: None,
        };

        let result = match dto.validate() {
            Ok(()) => self.create(dto).await,
            Err(e) => Err(e.into()),
        };
        if result.is_err() {
            discard_image(self.storage.as_ref(), &image).await;
        }

        result
    }

    /// Partially update a product
    pub async fn update(&self, id: &str, dto: UpdateProductDto) -> Result<ProductResponseDto> {
        if let Some(category_id) = &dto.category_id {
            self.ensure_category_exists(category_id).await?;
        }

        Ok(self.catalog.update(id, dto.into()).await?.into())
    }

    /// Permanently delete a product
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.catalog.remove(id).await
    }

    /// A product must reference an existing category
    async fn ensure_category_exists(&self, category_id: &str) -> Result<()> {
        match self
            .categories
            .get(&Lookup::Id(category_id.to_string()))
            .await
        {
            Ok(_) => Ok(()),
            Err(AppError::NotFound(_)) => Err(AppError::Validation(format!(
                "Category '{}' does not exist",
                category_id
            ))),
            Err(e) => Err(e),
        }
    }
}

fn parse_price(value: &str) -> Result<Decimal> {
    Decimal::from_str(value)
        .map_err(|_| AppError::Validation(format!("Invalid price '{}'", value)))
}
