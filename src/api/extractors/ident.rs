use axum::{
    extract::FromRequestParts,
    http::request::Parts,
};
use tracing::Span;
use url::form_urlencoded;

use crate::error::AppError;

/// Caller identity as reported by the external auth layer: the `x-user-id`
/// header, with a `uid` query parameter fallback for plain links.
pub struct CallerId(pub String);

fn caller_from_parts(parts: &Parts) -> Option<String> {
    if let Some(value) = parts.headers.get("x-user-id") {
        if let Ok(uid) = value.to_str() {
            if !uid.is_empty() {
                return Some(uid.to_string());
            }
        }
    }

    if let Some(query) = parts.uri.query() {
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            if key == "uid" && !value.is_empty() {
                return Some(value.into_owned());
            }
        }
    }

    None
}

impl<S> FromRequestParts<S> for CallerId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match caller_from_parts(parts) {
            Some(uid) => {
                Span::current().record("user_id", &uid);
                Ok(CallerId(uid))
            }
            None => Err(AppError::Validation("Missing uid (x-user-id header or uid parameter)".into())),
        }
    }
}

pub struct MaybeCallerId(pub Option<String>);

impl<S> FromRequestParts<S> for MaybeCallerId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeCallerId(caller_from_parts(parts)))
    }
}
