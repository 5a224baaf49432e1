use std::sync::Arc;

use crate::core::error::Result;
use crate::features::messages::dtos::{
    CreateMessageDto, MessageQueryParams, MessageResponseDto, UpdateMessageDto,
};
use crate::features::messages::models::{Message, MessageStatus};
use crate::modules::catalog::{CatalogService, Lookup, Page, Repository};

/// Service for customer message operations
pub struct MessageService {
    catalog: CatalogService<Message>,
}

impl MessageService {
    pub fn new(repo: Arc<dyn Repository<Message>>) -> Self {
        Self {
            catalog: CatalogService::new(repo),
        }
    }

    /// Underlying catalog service, shared with the dashboard
    pub fn catalog(&self) -> &CatalogService<Message> {
        &self.catalog
    }

    pub async fn list(&self, params: MessageQueryParams) -> Result<Page<MessageResponseDto>> {
        let page = self.catalog.list(&params.into()).await?;
        Ok(page.map(MessageResponseDto::from))
    }

    pub async fn get(&self, id: &str) -> Result<MessageResponseDto> {
        Ok(self.catalog.get(&Lookup::Id(id.to_string())).await?.into())
    }

    /// Store a new message; it starts out `unread`
    pub async fn create(&self, dto: CreateMessageDto) -> Result<MessageResponseDto> {
        let message = self
            .catalog
            .add(|meta| Message {
                id: meta.id,
                name: dto.name,
                email: dto.email,
                subject: dto.subject,
                body: dto.body,
                status: MessageStatus::default(),
                created_at: meta.created_at,
                modified_at: meta.created_at,
            })
            .await?;

        Ok(message.into())
    }

    pub async fn update(&self, id: &str, dto: UpdateMessageDto) -> Result<MessageResponseDto> {
        Ok(self.catalog.update(id, dto.into()).await?.into())
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.catalog.remove(id).await
    }
}
