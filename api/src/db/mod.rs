//! # Database module — PostgreSQL connection pool
//!
//! The pool is constructed exactly once, in the server binary's startup path,
//! and handed to the router as shared state. Nothing in this crate reaches
//! for an ambient global; every repository operation receives the pool (or a
//! transaction started from it) explicitly.
//!
//! Schema migrations live in `api/migrations` and are applied at startup via
//! `sqlx::migrate!` from the binary.

mod pool;

pub use pool::connect;
