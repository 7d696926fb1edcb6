//! # Question models
//!
//! [`QuestionRow`] is the raw `questions` row. [`QuestionView`] is what the
//! API returns: the row plus its owner summary and expanded tag names. The
//! owner's email is present on the single-question path and omitted on the
//! feed path, so [`QuestionOwner::email`] is optional and skipped when absent.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Raw `questions` row.
#[derive(Debug, Clone, FromRow)]
pub struct QuestionRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Owner summary embedded in a question response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionOwner {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub image: Option<String>,
}

/// A question as the API returns it: fields, owner summary, tag names.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionView {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user: QuestionOwner,
    pub tags: Vec<String>,
}

/// One page of the public feed.
#[derive(Debug, Clone, Serialize)]
pub struct FeedPage {
    pub questions: Vec<QuestionView>,
    pub current_page: i64,
    pub total_pages: i64,
    pub total_questions: i64,
}
