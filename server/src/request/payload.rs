use axum::async_trait;
use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use axum::{Form, Json};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Request body sent either as JSON or as an urlencoded form.
///
/// A body without a recognised content type, an empty one, or a JSON
/// document that is not an object reads as `T::default()`: every field is
/// treated as missing. Only JSON that fails to parse is rejected.
#[derive(Debug)]
pub struct Payload<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for Payload<T>
where
    T: DeserializeOwned + Default + Send,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_ascii_lowercase())
            .unwrap_or_default();

        if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(value) = Form::<T>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            return Ok(Self(value));
        }

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(IntoResponse::into_response)?;
        if !content_type.starts_with("application/json") || bytes.is_empty() {
            return Ok(Self(T::default()));
        }
        let Json(value) =
            Json::<Value>::from_bytes(&bytes).map_err(IntoResponse::into_response)?;
        let value = match value {
            Value::Object(_) => serde_json::from_value(value).unwrap_or_default(),
            _ => T::default(),
        };
        Ok(Self(value))
    }
}
