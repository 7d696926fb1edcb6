//! # API crate — StackIt's server backbone
//!
//! Everything between the HTTP surface and PostgreSQL lives here: the data
//! models, the question repository, authentication helpers, the error
//! taxonomy, and the axum router the server binary mounts.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`auth`] | Argon2id password hashing and session-backed user lookup |
//! | [`db`] | PostgreSQL connection pool construction |
//! | [`error`] | The error taxonomy and its JSON response envelope |
//! | [`extract`] | `Json`/`Path`/`Query` wrappers whose rejections render through the envelope |
//! | [`models`] | Database rows (`User`, `QuestionRow`, `Tag`) and their client-safe projections |
//! | [`questions`] | The question repository: create, fetch, update, delete, paginated feed, tag normalization |
//! | [`routes`] | HTTP handlers and the [`axum::Router`] wiring them up |
//!
//! The crate holds no state of its own: every operation re-reads from the
//! injected [`sqlx::PgPool`], and correctness under concurrent writers relies
//! on transactions and unique constraints, never on application locks.

pub mod auth;
pub mod db;
pub mod error;
pub mod extract;
pub mod models;
pub mod questions;
pub mod routes;

pub use error::Error;
pub use routes::{router, AppState};
