//! Session lookup helpers.
//!
//! The session stores only the user's id; the full row is re-read from the
//! database on every request so role or profile changes take effect
//! immediately.

use sqlx::PgPool;
use tower_sessions::Session;
use uuid::Uuid;

use crate::error::Error;
use crate::models::User;

/// Key for storing the user id in the session.
pub const SESSION_USER_ID_KEY: &str = "user_id";

/// The user behind the current session, if any.
pub async fn current_user(session: &Session, pool: &PgPool) -> Result<Option<User>, Error> {
    let user_id: Option<Uuid> = session.get(SESSION_USER_ID_KEY).await?;
    let Some(user_id) = user_id else {
        return Ok(None);
    };
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

/// Like [`current_user`], but missing or dangling sessions are an
/// [`Error::Unauthenticated`].
pub async fn require_user(session: &Session, pool: &PgPool) -> Result<User, Error> {
    current_user(session, pool)
        .await?
        .ok_or(Error::Unauthenticated)
}
