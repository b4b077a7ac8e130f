//! HTTP mapping of domain errors, the validated `:id` path extractor and the
//! lenient JSON body extractor.

use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::{header, request::Parts, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use domain::{CoreError, RepositoryId};
use serde::de::DeserializeOwned;
use tracing::{error, warn};

/// Error returned by handlers; converts into the JSON error body.
#[derive(Debug)]
pub enum ApiError {
    Core(CoreError),
    /// Request body could not be read or is not valid JSON for the route.
    BadBody(String),
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        Self::Core(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Core(CoreError::InvalidId(raw)) => {
                warn!(id = %raw, "invalid repository id");
                (StatusCode::BAD_REQUEST, http_common::INVALID_REPOSITORY_ID)
            }
            ApiError::Core(CoreError::NotFound) => {
                (StatusCode::BAD_REQUEST, http_common::REPOSITORY_NOT_FOUND)
            }
            ApiError::BadBody(reason) => {
                warn!(%reason, "rejected request body");
                (StatusCode::BAD_REQUEST, http_common::INVALID_REQUEST_BODY)
            }
            ApiError::Core(other) => {
                error!(err = ?other, "store error");
                (StatusCode::INTERNAL_SERVER_ERROR, http_common::INTERNAL_ERROR)
            }
        };
        (status, Json(http_common::json_error(message))).into_response()
    }
}

/// The `:id` path segment, checked for identifier syntax before the handler
/// body runs. Malformed ids never reach the store.
#[derive(Debug, Clone, Copy)]
pub struct RepoIdPath(pub RepositoryId);

#[axum::async_trait]
impl<S> FromRequestParts<S> for RepoIdPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::Core(CoreError::InvalidId(e.body_text())))?;
        Ok(Self(RepositoryId::parse(&raw)?))
    }
}

/// JSON request body that falls back to `T::default()` when the body is empty
/// or not declared as JSON, so a bare `PUT` is a no-op update.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .is_some_and(|mime| {
            let mime = mime.trim();
            mime.eq_ignore_ascii_case("application/json")
                || mime.to_ascii_lowercase().ends_with("+json")
        })
}

#[axum::async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Default,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let json = is_json(req.headers());
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::BadBody(e.body_text()))?;
        if !json || bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self(T::default()));
        }
        serde_json::from_slice(&bytes)
            .map(Self)
            .map_err(|e| ApiError::BadBody(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(content_type: &'static str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
        h
    }

    #[test]
    fn json_content_types() {
        assert!(is_json(&headers("application/json")));
        assert!(is_json(&headers("application/json; charset=utf-8")));
        assert!(is_json(&headers("application/vnd.api+json")));
        assert!(!is_json(&headers("text/plain")));
        assert!(!is_json(&HeaderMap::new()));
    }
}
