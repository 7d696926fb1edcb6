//! # Tag normalizer
//!
//! A tag name maps to exactly one persisted `tags` row. Identity is the
//! exact stored string: no trimming, no case folding. Two questions tagged
//! `"go"` share one row; `"Go"` is a different tag.
//!
//! Creation is connect-or-create and race-tolerant: the insert relies on the
//! unique constraint on `tags.name` rather than any application lock, so two
//! concurrent requests introducing the same new name converge on one row.

use std::collections::HashSet;

use sqlx::{Postgres, Transaction};

use crate::error::Error;
use crate::models::Tag;

/// Deduplicate a request's tag names, preserving first-seen order.
pub fn normalize(names: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for name in names {
        if seen.insert(name.as_str()) {
            out.push(name.clone());
        }
    }
    out
}

/// Link to the tag row for `name`, creating it if absent, inside the
/// caller's transaction.
pub async fn connect_or_create(
    tx: &mut Transaction<'_, Postgres>,
    name: &str,
) -> Result<Tag, Error> {
    // DO NOTHING on conflict: a concurrent insert of the same name wins and
    // the follow-up select sees its row once it commits.
    sqlx::query("INSERT INTO tags (name) VALUES ($1) ON CONFLICT (name) DO NOTHING")
        .bind(name)
        .execute(&mut **tx)
        .await?;
    let tag: Tag = sqlx::query_as("SELECT id, name FROM tags WHERE name = $1")
        .bind(name)
        .fetch_one(&mut **tx)
        .await?;
    Ok(tag)
}
