//! # Request extractors
//!
//! Thin wrappers over axum's `Json`, `Path`, and `Query` whose rejections
//! flow through [`Error`] instead of axum's plain-text defaults. A body with
//! a missing or wrong-typed field, a non-UUID path segment, or a malformed
//! query string all render as the same 400 `{success:false, message}`
//! envelope the handlers themselves produce.
//!
//! [`Json`] also implements `IntoResponse`, so handlers use one type on both
//! sides of the call.

use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Error;

#[derive(Debug)]
pub struct Json<T>(pub T);

impl<S, T> FromRequest<S> for Json<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(Json(value)),
            Err(rejection) => Err(Error::Validation(rejection.body_text())),
        }
    }
}

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

pub struct Path<T>(pub T);

impl<S, T> FromRequestParts<S> for Path<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match axum::extract::Path::<T>::from_request_parts(parts, state).await {
            Ok(axum::extract::Path(value)) => Ok(Path(value)),
            Err(rejection) => Err(Error::Validation(rejection.body_text())),
        }
    }
}

#[derive(Debug)]
pub struct Query<T>(pub T);

impl<S, T> FromRequestParts<S> for Query<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match axum::extract::Query::<T>::from_request_parts(parts, state).await {
            Ok(axum::extract::Query(value)) => Ok(Query(value)),
            Err(rejection) => Err(Error::Validation(rejection.body_text())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use serde::Deserialize;

    async fn envelope_of(response: Response) -> (StatusCode, serde_json::Value) {
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[derive(Debug, Deserialize)]
    struct Payload {
        #[allow(dead_code)]
        title: String,
    }

    #[tokio::test]
    async fn test_missing_body_field_renders_validation_envelope() {
        let request = Request::builder()
            .method("POST")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"description":"<p>x</p>","tags":["go"]}"#))
            .unwrap();
        let err = Json::<Payload>::from_request(request, &()).await.unwrap_err();

        let (status, value) = envelope_of(err.into_response()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(value["success"], false);
        assert!(value["message"].as_str().unwrap().contains("title"));
    }

    #[tokio::test]
    async fn test_non_json_body_renders_validation_envelope() {
        let request = Request::builder()
            .method("POST")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("not json"))
            .unwrap();
        let err = Json::<Payload>::from_request(request, &()).await.unwrap_err();

        let (status, value) = envelope_of(err.into_response()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(value["success"], false);
    }

    #[tokio::test]
    async fn test_invalid_path_parameter_renders_validation_envelope() {
        use axum::routing::get;
        use tower::ServiceExt;

        async fn handler(Path(_id): Path<uuid::Uuid>) -> &'static str {
            "ok"
        }
        let app = axum::Router::new().route("/api/questions/{question_id}", get(handler));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/questions/not-a-uuid")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let (status, value) = envelope_of(response).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(value["success"], false);
    }

    #[tokio::test]
    async fn test_malformed_query_renders_validation_envelope() {
        #[derive(Debug, Deserialize)]
        struct Params {
            #[allow(dead_code)]
            page: Option<i64>,
        }
        let (mut parts, _) = Request::builder()
            .uri("/api/questions?page=abc")
            .body(())
            .unwrap()
            .into_parts();
        let err = Query::<Params>::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();

        let (status, value) = envelope_of(err.into_response()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(value["success"], false);
    }
}
