//! # Route guard
//!
//! Request-interception layer for the page routes: signed-in users are
//! bounced away from the landing and auth pages, signed-out users away from
//! the app pages, and `/admin` additionally requires the `ADMIN` role. The
//! JSON API under `/api` enforces its own authentication and passes through
//! untouched.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use api::AppState;

pub async fn route_guard(
    State(state): State<AppState>,
    session: Session,
    request: Request,
    next: Next,
) -> Response {
    // A failed session lookup is treated as no session.
    let user = api::auth::current_user(&session, &state.pool)
        .await
        .unwrap_or(None);
    let is_admin = user.as_ref().map(|u| u.is_admin()).unwrap_or(false);

    if let Some(target) = redirect_target(request.uri().path(), user.is_some(), is_admin) {
        return Redirect::to(target).into_response();
    }
    next.run(request).await
}

/// Where to send this request instead, if anywhere.
fn redirect_target(path: &str, authenticated: bool, is_admin: bool) -> Option<&'static str> {
    if authenticated && matches!(path, "/" | "/signin" | "/signup") {
        return Some("/feed");
    }
    if path == "/admin" || path.starts_with("/admin/") {
        if !authenticated {
            return Some("/signin");
        }
        if !is_admin {
            return Some("/");
        }
        return None;
    }
    if !authenticated
        && (path.starts_with("/feed/")
            || path.starts_with("/question/")
            || path.starts_with("/profile/")
            || path == "/notification")
    {
        return Some("/signin");
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authenticated_leaves_auth_pages() {
        assert_eq!(redirect_target("/", true, false), Some("/feed"));
        assert_eq!(redirect_target("/signin", true, false), Some("/feed"));
        assert_eq!(redirect_target("/signup", true, false), Some("/feed"));
    }

    #[test]
    fn test_unauthenticated_leaves_app_pages() {
        assert_eq!(redirect_target("/feed/1", false, false), Some("/signin"));
        assert_eq!(redirect_target("/question/abc", false, false), Some("/signin"));
        assert_eq!(redirect_target("/profile/alice", false, false), Some("/signin"));
        assert_eq!(redirect_target("/notification", false, false), Some("/signin"));
    }

    #[test]
    fn test_admin_requires_role() {
        assert_eq!(redirect_target("/admin/users", false, false), Some("/signin"));
        assert_eq!(redirect_target("/admin/users", true, false), Some("/"));
        assert_eq!(redirect_target("/admin/users", true, true), None);
    }

    #[test]
    fn test_api_and_public_paths_pass_through() {
        assert_eq!(redirect_target("/api/questions", false, false), None);
        assert_eq!(redirect_target("/signin", false, false), None);
        assert_eq!(redirect_target("/feed/1", true, false), None);
    }
}
