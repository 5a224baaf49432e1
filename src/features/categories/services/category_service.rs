use std::sync::Arc;

use validator::Validate;

use crate::core::error::Result;
use crate::features::categories::dtos::{
    CategoryQueryParams, CategoryResponseDto, CreateCategoryDto, UpdateCategoryDto,
};
use crate::features::categories::models::Category;
use crate::modules::catalog::{CatalogService, Lookup, Page, Record, Repository};
use crate::modules::storage::ObjectStorage;
use crate::shared::upload::{discard_image, store_image, ImageForm};
use crate::shared::validation::resolve_slug;

/// Service for category operations
pub struct CategoryService {
    catalog: CatalogService<Category>,
    storage: Arc<dyn ObjectStorage>,
}

impl CategoryService {
    pub fn new(repo: Arc<dyn Repository<Category>>, storage: Arc<dyn ObjectStorage>) -> Self {
        Self {
            catalog: CatalogService::new(repo),
            storage,
        }
    }

    /// Underlying catalog service, shared with the dashboard
    pub fn catalog(&self) -> &CatalogService<Category> {
        &self.catalog
    }

    /// List categories with pagination, sorting and search
    pub async fn list(&self, params: CategoryQueryParams) -> Result<Page<CategoryResponseDto>> {
        let page = self.catalog.list(&params.into()).await?;
        Ok(page.map(CategoryResponseDto::from))
    }

    /// Get category by id or slug
    pub async fn get(&self, lookup: &Lookup) -> Result<CategoryResponseDto> {
        Ok(self.catalog.get(lookup).await?.into())
    }

    /// Create a category from a JSON payload
    pub async fn create(&self, dto: CreateCategoryDto) -> Result<CategoryResponseDto> {
        let slug = resolve_slug(dto.slug, &dto.name)?;

        let category = self
            .catalog
            .add(|meta| Category {
                id: meta.id,
                name: dto.name,
                description: dto.description,
                image: dto.image,
                slug,
                created_at: meta.created_at,
                modified_at: meta.created_at,
            })
            .await?;

        Ok(category.into())
    }

    /// Create a category from a multipart form carrying the raw image file.
    ///
    /// The image is stored first; it is discarded again if the category
    /// cannot be created.
    pub async fn create_with_upload(&self, mut form: ImageForm) -> Result<CategoryResponseDto> {
        let name = form.require_text("name")?;
        let upload = form.take_image()?;
        let alt = form.text("alt").unwrap_or_else(|| name.clone());

        let image = store_image(self.storage.as_ref(), Category::KIND, upload, alt).await?;
        let dto = CreateCategoryDto {
            name,
            description: form.text("description").unwrap_or_default(),
            image: image.clone(),
            slug: form.text("slug"),
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

    /// Partially update a category
    pub async fn update(&self, id: &str, dto: UpdateCategoryDto) -> Result<CategoryResponseDto> {
        Ok(self.catalog.update(id, dto.into()).await?.into())
    }

    /// Permanently delete a category
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.catalog.remove(id).await
    }
}
