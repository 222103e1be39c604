/*
 * Responsibility
 * - JSON body decoding for handlers, with a bounded read
 * - Validate hook so payload types can report every violated field at once
 */
use axum::body::Body;
use axum::extract::Request;
use axum::http::StatusCode;
use serde::de::DeserializeOwned;

use crate::error::{AppError, FieldErrors};

const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Payload types that can check themselves after decoding.
pub trait Validate {
    fn validate(&self) -> Result<(), FieldErrors>;
}

/// Decode the request body as JSON into `T`, then run its validation.
/// Malformed JSON is a 400 request error; validation failures become
/// field-validation errors listing every violated field.
pub async fn decode<T>(req: Request<Body>) -> Result<T, AppError>
where
    T: DeserializeOwned + Validate,
{
    let bytes = axum::body::to_bytes(req.into_body(), MAX_BODY_BYTES)
        .await
        .map_err(|e| {
            AppError::request(StatusCode::BAD_REQUEST, format!("unable to read payload: {e}"))
        })?;

    let val: T = serde_json::from_slice(&bytes).map_err(|e| {
        AppError::request(
            StatusCode::BAD_REQUEST,
            format!("unable to decode payload: {e}"),
        )
    })?;

    val.validate()?;

    Ok(val)
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct NewUser {
        name: String,
        email: String,
    }

    impl Validate for NewUser {
        fn validate(&self) -> Result<(), FieldErrors> {
            let mut fields = FieldErrors::default();
            if self.name.is_empty() {
                fields.push("name", "name is required");
            }
            if !self.email.contains('@') {
                fields.push("email", "email must be valid");
            }
            if fields.is_empty() { Ok(()) } else { Err(fields) }
        }
    }

    fn request_with(body: &str) -> Request<Body> {
        Request::builder()
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn decode_valid_payload() {
        let user: NewUser = decode(request_with(r#"{"name":"ann","email":"ann@example.com"}"#))
            .await
            .unwrap();
        assert_eq!(user.name, "ann");
    }

    #[tokio::test]
    async fn malformed_json_is_a_request_error() {
        let err = decode::<NewUser>(request_with("{not json"))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(err.to_response().fields.is_none());
    }

    #[tokio::test]
    async fn validation_reports_every_violated_field() {
        let err = decode::<NewUser>(request_with(r#"{"name":"","email":"nope"}"#))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        let fields = err.to_response().fields.unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].field, "name");
        assert_eq!(fields[1].field, "email");
    }
}
