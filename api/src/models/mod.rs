//! Data models: database rows and their client-safe projections.

mod question;
mod tag;
mod user;

pub use question::{FeedPage, QuestionOwner, QuestionRow, QuestionView};
pub use tag::Tag;
pub use user::{User, UserInfo, ROLE_ADMIN, ROLE_USER};
