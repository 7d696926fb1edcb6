//! # Question repository
//!
//! Persistence operations for questions: create, fetch by id, in-place
//! update, ownership-checked delete with notification cleanup, and the
//! paginated public feed. Every multi-step write runs inside a single
//! transaction; a failure after any step rolls the whole operation back.
//!
//! Update is an in-place field update plus a full replacement of the
//! tag-association set. The question keeps its `id` and `created_at`; only
//! `updated_at` moves.

pub mod tags;

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::Error;
use crate::models::{FeedPage, QuestionOwner, QuestionRow, QuestionView};

/// Fixed feed page size.
pub const PAGE_SIZE: i64 = 10;

/// Question joined with its owner's summary columns.
#[derive(Debug, FromRow)]
struct QuestionOwnerRow {
    id: Uuid,
    title: String,
    description: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    owner_id: Uuid,
    owner_username: String,
    owner_email: String,
    owner_image: Option<String>,
}

impl QuestionOwnerRow {
    fn into_view(self, tags: Vec<String>, include_email: bool) -> QuestionView {
        QuestionView {
            id: self.id,
            title: self.title,
            description: self.description,
            created_at: self.created_at,
            updated_at: self.updated_at,
            user: QuestionOwner {
                id: self.owner_id,
                username: self.owner_username,
                email: include_email.then_some(self.owner_email),
                image: self.owner_image,
            },
            tags,
        }
    }
}

const SELECT_WITH_OWNER: &str = "SELECT q.id, q.title, q.description, q.created_at, q.updated_at, \
     u.id AS owner_id, u.username AS owner_username, u.email AS owner_email, u.image AS owner_image \
     FROM questions q JOIN users u ON u.id = q.user_id";

/// Insert a question and link its tags. Returns the created question with
/// tags expanded.
pub async fn create(
    pool: &PgPool,
    owner_id: Uuid,
    title: &str,
    description: &str,
    tag_names: &[String],
) -> Result<QuestionView, Error> {
    let mut tx = pool.begin().await?;
    let row: QuestionRow = sqlx::query_as(
        "INSERT INTO questions (title, description, user_id) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(title)
    .bind(description)
    .bind(owner_id)
    .fetch_one(&mut *tx)
    .await?;
    link_tags(&mut tx, row.id, tag_names).await?;
    tx.commit().await?;

    get_by_id(pool, row.id).await
}

/// Fetch a question with its owner summary (email included) and tags.
pub async fn get_by_id(pool: &PgPool, id: Uuid) -> Result<QuestionView, Error> {
    let row: Option<QuestionOwnerRow> =
        sqlx::query_as(&format!("{SELECT_WITH_OWNER} WHERE q.id = $1"))
            .bind(id)
            .fetch_optional(pool)
            .await?;
    let row = row.ok_or(Error::NotFound("Question"))?;
    let mut tags = tag_names_for(pool, &[id]).await?;
    Ok(row.into_view(tags.remove(&id).unwrap_or_default(), true))
}

/// Replace a question's content and tag set in place. Ownership-checked.
pub async fn update(
    pool: &PgPool,
    id: Uuid,
    actor_id: Uuid,
    title: &str,
    description: &str,
    tag_names: &[String],
) -> Result<QuestionView, Error> {
    let mut tx = pool.begin().await?;
    let row: Option<QuestionRow> = sqlx::query_as("SELECT * FROM questions WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
    let row = row.ok_or(Error::NotFound("Question"))?;
    if row.user_id != actor_id {
        return Err(Error::Forbidden(
            "You are not authorized to update this question".to_string(),
        ));
    }

    sqlx::query("UPDATE questions SET title = $2, description = $3, updated_at = NOW() WHERE id = $1")
        .bind(id)
        .bind(title)
        .bind(description)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM question_tags WHERE question_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    link_tags(&mut tx, id, tag_names).await?;
    tx.commit().await?;

    get_by_id(pool, id).await
}

/// Delete a question and its best-effort notification cleanup: notifications
/// whose message mentions the question id, or whose receiver owns the
/// question, go with it. One transaction, so the question never outlives a
/// half-done cleanup.
pub async fn delete(pool: &PgPool, id: Uuid, actor_id: Uuid) -> Result<(), Error> {
    let mut tx = pool.begin().await?;
    let row: Option<QuestionRow> = sqlx::query_as("SELECT * FROM questions WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
    let row = row.ok_or(Error::NotFound("Question"))?;
    if row.user_id != actor_id {
        return Err(Error::Forbidden(
            "You are not authorized to delete this question".to_string(),
        ));
    }

    sqlx::query("DELETE FROM notifications WHERE message LIKE '%' || $1 || '%' OR receiver_id = $2")
        .bind(id.to_string())
        .bind(row.user_id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM questions WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(())
}

/// One page of the public feed, most recently updated first. Owner summaries
/// omit the email on this path. Pages below 1 clamp to the first page.
pub async fn list(pool: &PgPool, page: i64) -> Result<FeedPage, Error> {
    let page = clamp_page(page);
    let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM questions")
        .fetch_one(pool)
        .await?;
    let rows: Vec<QuestionOwnerRow> = sqlx::query_as(&format!(
        "{SELECT_WITH_OWNER} ORDER BY q.updated_at DESC LIMIT $1 OFFSET $2"
    ))
    .bind(PAGE_SIZE)
    .bind(page_offset(page))
    .fetch_all(pool)
    .await?;

    let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
    let mut tags = tag_names_for(pool, &ids).await?;
    let questions = rows
        .into_iter()
        .map(|row| {
            let row_tags = tags.remove(&row.id).unwrap_or_default();
            row.into_view(row_tags, false)
        })
        .collect();

    Ok(FeedPage {
        questions,
        current_page: page,
        total_pages: total_pages(total, PAGE_SIZE),
        total_questions: total,
    })
}

/// Link the (deduplicated) tag names to a question inside `tx`.
async fn link_tags(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    question_id: Uuid,
    tag_names: &[String],
) -> Result<(), Error> {
    for name in tags::normalize(tag_names) {
        let tag = tags::connect_or_create(tx, &name).await?;
        sqlx::query(
            "INSERT INTO question_tags (question_id, tag_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(question_id)
        .bind(tag.id)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

/// Expanded tag names for a set of questions, grouped by question id.
async fn tag_names_for(
    pool: &PgPool,
    question_ids: &[Uuid],
) -> Result<HashMap<Uuid, Vec<String>>, Error> {
    if question_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows: Vec<(Uuid, String)> = sqlx::query_as(
        "SELECT qt.question_id, t.name FROM question_tags qt \
         JOIN tags t ON t.id = qt.tag_id WHERE qt.question_id = ANY($1) ORDER BY t.name",
    )
    .bind(question_ids)
    .fetch_all(pool)
    .await?;
    let mut grouped: HashMap<Uuid, Vec<String>> = HashMap::new();
    for (question_id, name) in rows {
        grouped.entry(question_id).or_default().push(name);
    }
    Ok(grouped)
}

fn clamp_page(page: i64) -> i64 {
    page.max(1)
}

// Saturates so an absurd page number yields an empty page, not a panic.
fn page_offset(page: i64) -> i64 {
    (clamp_page(page) - 1).saturating_mul(PAGE_SIZE)
}

fn total_pages(total: i64, page_size: i64) -> i64 {
    (total + page_size - 1) / page_size
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_page_guards_zero_and_negative() {
        assert_eq!(clamp_page(0), 1);
        assert_eq!(clamp_page(-7), 1);
        assert_eq!(clamp_page(1), 1);
        assert_eq!(clamp_page(3), 3);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        assert_eq!(total_pages(0, PAGE_SIZE), 0);
        assert_eq!(total_pages(1, PAGE_SIZE), 1);
        assert_eq!(total_pages(10, PAGE_SIZE), 1);
        assert_eq!(total_pages(11, PAGE_SIZE), 2);
        assert_eq!(total_pages(15, PAGE_SIZE), 2);
        assert_eq!(total_pages(20, PAGE_SIZE), 2);
    }

    #[test]
    fn test_page_offsets_do_not_overlap() {
        // 15 questions: page 1 covers offsets 0..10, page 2 covers 10..15.
        let first = page_offset(1);
        let second = page_offset(2);
        assert_eq!(first, 0);
        assert_eq!(second, 10);
        assert!(first + PAGE_SIZE <= second + PAGE_SIZE);
        assert_eq!(second - first, PAGE_SIZE);
    }

    #[test]
    fn test_page_offset_saturates_on_huge_pages() {
        assert_eq!(page_offset(i64::MAX), i64::MAX);
        assert_eq!(page_offset(i64::MAX / 2), i64::MAX);
        assert_eq!(page_offset(i64::MIN), 0);
    }
}
