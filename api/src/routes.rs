//! # HTTP routes
//!
//! Thin authorization/validation shims over the [`crate::questions`]
//! repository and the auth helpers. Handlers validate the body, resolve the
//! session, call the repository, and shape the `{success, ...}` response;
//! every failure path is an [`Error`] and renders through its envelope.
//!
//! The feed (`GET /api/questions`) is public; every other question operation
//! and the session endpoints require a valid session.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;
use sqlx::PgPool;
use tower_sessions::Session;
use uuid::Uuid;

use crate::auth;
use crate::error::Error;
use crate::extract::{Json, Path, Query};
use crate::models::{User, ROLE_USER};
use crate::questions;

/// Shared state handed to every handler: the process-wide connection pool,
/// constructed once at startup.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
}

/// Build the API router over an injected pool.
pub fn router(pool: PgPool) -> Router {
    Router::new()
        .route("/api/signup", post(signup))
        .route("/api/login", post(login))
        .route("/api/logout", post(logout))
        .route("/api/me", get(me))
        .route("/api/questions", post(create_question).get(list_questions))
        .route(
            "/api/questions/{question_id}",
            get(get_question).put(update_question).delete(delete_question),
        )
        .with_state(AppState { pool })
}

#[derive(Debug, Deserialize)]
struct SignupBody {
    username: String,
    email: String,
    password: String,
}

async fn signup(
    State(state): State<AppState>,
    Json(body): Json<SignupBody>,
) -> Result<impl IntoResponse, Error> {
    let username = body.username.trim();
    let email = body.email.trim().to_lowercase();
    if username.is_empty() {
        return Err(Error::Validation("Username is required".to_string()));
    }
    if email.is_empty() || !email.contains('@') {
        return Err(Error::Validation("Invalid email address".to_string()));
    }
    if body.password.len() < 8 {
        return Err(Error::Validation(
            "Password must be at least 8 characters".to_string(),
        ));
    }

    let taken: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE username = $1")
        .bind(username)
        .fetch_optional(&state.pool)
        .await?;
    if taken.is_some() {
        return Err(Error::Conflict("Username already exists".to_string()));
    }
    let taken: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE email = $1")
        .bind(&email)
        .fetch_optional(&state.pool)
        .await?;
    if taken.is_some() {
        return Err(Error::Conflict("Email already exists".to_string()));
    }

    let password_hash = auth::hash_password(&body.password)?;
    let user: User = sqlx::query_as(
        "INSERT INTO users (username, email, password_hash, role) VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(username)
    .bind(&email)
    .bind(&password_hash)
    .bind(ROLE_USER)
    .fetch_one(&state.pool)
    .await
    .map_err(|err| {
        // Two signups can race past the pre-checks; the unique constraints win.
        if let sqlx::Error::Database(db) = &err {
            if db.is_unique_violation() {
                return Error::Conflict("Username or email already exists".to_string());
            }
        }
        Error::from(err)
    })?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "user": user.to_info() })),
    ))
}

#[derive(Debug, Deserialize)]
struct LoginBody {
    email: String,
    password: String,
}

async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<LoginBody>,
) -> Result<impl IntoResponse, Error> {
    let email = body.email.trim().to_lowercase();
    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE email = $1")
        .bind(&email)
        .fetch_optional(&state.pool)
        .await?;
    // Same message for unknown email and wrong password.
    let user = user.ok_or_else(|| Error::Validation("Invalid email or password".to_string()))?;
    if !auth::verify_password(&body.password, &user.password_hash)? {
        return Err(Error::Validation("Invalid email or password".to_string()));
    }

    session.insert(auth::SESSION_USER_ID_KEY, user.id).await?;
    Ok(Json(json!({ "success": true, "user": user.to_info() })))
}

async fn logout(session: Session) -> Result<impl IntoResponse, Error> {
    session.flush().await?;
    Ok(Json(json!({ "success": true })))
}

async fn me(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, Error> {
    let user = auth::current_user(&session, &state.pool).await?;
    Ok(Json(json!({
        "success": true,
        "user": user.map(|u| u.to_info()),
    })))
}

#[derive(Debug, Deserialize)]
struct QuestionBody {
    title: String,
    description: String,
    tags: Vec<String>,
}

impl QuestionBody {
    fn validate(&self) -> Result<(), Error> {
        if self.title.trim().is_empty()
            || self.description.trim().is_empty()
            || self.tags.is_empty()
            || self.tags.iter().any(|t| t.is_empty())
        {
            return Err(Error::Validation(
                "Missing required fields: title, description or tags".to_string(),
            ));
        }
        Ok(())
    }
}

async fn create_question(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<QuestionBody>,
) -> Result<impl IntoResponse, Error> {
    let user = auth::require_user(&session, &state.pool).await?;
    body.validate()?;
    let description = richtext::sanitize(&body.description);
    let question =
        questions::create(&state.pool, user.id, &body.title, &description, &body.tags).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Question created successfully",
            "question": question,
        })),
    ))
}

#[derive(Debug, Deserialize)]
struct FeedQuery {
    page: Option<i64>,
}

async fn list_questions(
    State(state): State<AppState>,
    Query(params): Query<FeedQuery>,
) -> Result<impl IntoResponse, Error> {
    let feed = questions::list(&state.pool, params.page.unwrap_or(1)).await?;
    Ok(Json(json!({
        "success": true,
        "questions": feed.questions,
        "currentPage": feed.current_page,
        "totalPages": feed.total_pages,
        "totalQuestions": feed.total_questions,
    })))
}

async fn get_question(
    State(state): State<AppState>,
    session: Session,
    Path(question_id): Path<Uuid>,
) -> Result<impl IntoResponse, Error> {
    auth::require_user(&session, &state.pool).await?;
    let question = questions::get_by_id(&state.pool, question_id).await?;
    Ok(Json(json!({ "success": true, "question": question })))
}

async fn update_question(
    State(state): State<AppState>,
    session: Session,
    Path(question_id): Path<Uuid>,
    Json(body): Json<QuestionBody>,
) -> Result<impl IntoResponse, Error> {
    let user = auth::require_user(&session, &state.pool).await?;
    body.validate()?;
    let description = richtext::sanitize(&body.description);
    let question = questions::update(
        &state.pool,
        question_id,
        user.id,
        &body.title,
        &description,
        &body.tags,
    )
    .await?;
    Ok(Json(json!({
        "success": true,
        "message": "Question updated successfully",
        "question": question,
    })))
}

async fn delete_question(
    State(state): State<AppState>,
    session: Session,
    Path(question_id): Path<Uuid>,
) -> Result<impl IntoResponse, Error> {
    let user = auth::require_user(&session, &state.pool).await?;
    questions::delete(&state.pool, question_id, user.id).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Question deleted successfully",
    })))
}
