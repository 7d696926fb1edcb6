//! Authentication: password hashing and session-backed user lookup.

mod password;
mod session;

pub use password::{hash_password, verify_password};
pub use session::{current_user, require_user, SESSION_USER_ID_KEY};
