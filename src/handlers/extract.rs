//! Request extractors.

use axum::{
    extract::{FromRequest, FromRequestParts, Request},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::error::StudyError;

/// Header carrying the caller's user id, set by the authentication proxy
pub const USER_ID_HEADER: &str = "x-user-id";

/// Identity of the calling user.
/// Add this as a handler parameter to require it; missing or malformed → 401.
#[derive(Debug, Clone, Copy)]
pub struct UserContext {
    pub user_id: i64,
}

impl<S: Send + Sync> FromRequestParts<S> for UserContext {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<i64>().ok())
            .filter(|id| *id > 0)
            .ok_or_else(unauthorized)?;

        Ok(Self { user_id })
    }
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "unauthorized",
            "message": "missing or invalid X-User-Id header",
        })),
    )
        .into_response()
}

/// JSON body whose rejections are reported as validation errors
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = StudyError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(StudyError::Validation(rejection.body_text())),
        }
    }
}
