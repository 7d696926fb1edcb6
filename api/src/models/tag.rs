use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A row of the shared tag vocabulary. Names are unique and case-sensitive
/// exactly as stored; tags are created lazily on first use and never garbage
/// collected.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
}
