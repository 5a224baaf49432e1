use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::query_builder::Separated;
use sqlx::{FromRow, Postgres, QueryBuilder};
use utoipa::ToSchema;

use crate::core::error::Result;
use crate::modules::catalog::{compare_text, PgRecord, Record, ResourceKind, SortField};

/// Message status enum matching PostgreSQL message_status type
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "message_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    #[default]
    Unread,
    Read,
}

/// A message sent by a customer through the contact form
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Message {
    pub id: String,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub body: String,
    pub status: MessageStatus,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

/// Messages have no blob columns, so the row is the record itself
pub type MessageRow = Message;

/// Sortable message fields
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum MessageSort {
    Name,
    #[default]
    CreatedAt,
    ModifiedAt,
}

impl SortField for MessageSort {
    fn as_str(&self) -> &'static str {
        match self {
            MessageSort::Name => "name",
            MessageSort::CreatedAt => "createdAt",
            MessageSort::ModifiedAt => "modifiedAt",
        }
    }

    fn column(&self) -> &'static str {
        match self {
            MessageSort::Name => "name",
            MessageSort::CreatedAt => "created_at",
            MessageSort::ModifiedAt => "modified_at",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MessageFilter {
    pub status: Option<MessageStatus>,
}

/// Only the read status of a customer message can change
#[derive(Debug, Clone, Default)]
pub struct MessagePatch {
    pub status: Option<MessageStatus>,
}

impl Record for Message {
    const KIND: ResourceKind = ResourceKind::Message;

    type Sort = MessageSort;
    type Filter = MessageFilter;
    type Patch = MessagePatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn search_text(&self) -> &str {
        &self.subject
    }

    fn matches(&self, filter: &MessageFilter) -> bool {
        filter.status.is_none_or(|s| s == self.status)
    }

    fn compare(&self, other: &Self, field: MessageSort) -> Ordering {
        match field {
            MessageSort::Name => compare_text(&self.name, &other.name),
            MessageSort::CreatedAt => self.created_at.cmp(&other.created_at),
            MessageSort::ModifiedAt => self.modified_at.cmp(&other.modified_at),
        }
    }

    fn patch_is_empty(patch: &MessagePatch) -> bool {
        patch.status.is_none()
    }

    fn apply(&mut self, patch: MessagePatch, modified_at: DateTime<Utc>) {
        if let Some(status) = patch.status {
            self.status = status;
        }
        self.modified_at = modified_at;
    }
}

impl PgRecord for Message {
    type Row = MessageRow;

    const TABLE: &'static str = "messages";
    const COLUMNS: &'static str =
        "id, name, email, subject, body, status, created_at, modified_at";
    const SEARCH_COLUMN: &'static str = "subject";

    fn from_row(row: MessageRow) -> Result<Self> {
        Ok(row)
    }

    fn push_filter(filter: &MessageFilter, qb: &mut QueryBuilder<'_, Postgres>) {
        if let Some(status) = filter.status {
            qb.push(" AND status = ");
            qb.push_bind(status);
        }
    }

    fn push_values(&self, values: &mut Separated<'_, '_, Postgres, &'static str>) -> Result<()> {
        values.push_bind(self.id.clone());
        values.push_bind(self.name.clone());
        values.push_bind(self.email.clone());
        values.push_bind(self.subject.clone());
        values.push_bind(self.body.clone());
        values.push_bind(self.status);
        values.push_bind(self.created_at);
        values.push_bind(self.modified_at);
        Ok(())
    }

    fn push_patch(
        patch: &MessagePatch,
        set: &mut Separated<'_, '_, Postgres, &'static str>,
    ) -> Result<()> {
        if let Some(status) = patch.status {
            set.push("status = ").push_bind_unseparated(status);
        }
        Ok(())
    }
}
