//! Axum extractor for validated payloads
//!
//! `Valid<T>` parses the JSON body into `T` and runs its `validator` rules,
//! rejecting with a typed [`PortalError`] (400) on either failure.

use crate::core::error::{PortalError, ValidationError};
use axum::{
    Json,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use validator::Validate;

/// Axum extractor that parses and validates a JSON body
///
/// # Usage
///
/// ```rust,ignore
/// pub async fn create_volunteer(
///     Valid(input): Valid<NewVolunteer>,
/// ) -> PortalResult<Json<Volunteer>> {
///     // input already passed its field rules
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Valid<T>(pub T);

impl<S, T> FromRequest<S> for Valid<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = PortalError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ValidationError::InvalidJson {
                message: rejection.body_text(),
            })?;

        payload.validate()?;

        Ok(Valid(payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{StatusCode, header};
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Signup {
        #[validate(length(min = 1))]
        name: String,
        #[validate(email)]
        email: String,
    }

    fn request(body: &'static str) -> Request {
        Request::builder()
            .method("POST")
            .uri("/")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_valid_payload_passes() {
        let Valid(signup) =
            Valid::<Signup>::from_request(request(r#"{"name":"Asha","email":"asha@ngo.org"}"#), &())
                .await
                .unwrap();
        assert_eq!(signup.name, "Asha");
        assert_eq!(signup.email, "asha@ngo.org");
    }

    #[tokio::test]
    async fn test_broken_json_is_rejected() {
        let err = Valid::<Signup>::from_request(request("{not json"), &())
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), "INVALID_JSON");
    }

    #[tokio::test]
    async fn test_rule_violation_lists_fields() {
        let err = Valid::<Signup>::from_request(request(r#"{"name":"","email":"nope"}"#), &())
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
        match err {
            PortalError::Validation(ValidationError::FieldErrors(fields)) => {
                let names: Vec<&str> = fields.iter().map(|f| f.field.as_str()).collect();
                assert_eq!(names, vec!["email", "name"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
