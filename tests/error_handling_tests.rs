//! Tests for the typed error handling system
//!
//! These tests verify that:
//! - Errors return correct HTTP status codes
//! - Error responses are properly formatted
//! - Storage and render failures map onto client-facing errors

use axum::http::StatusCode;
use axum::response::IntoResponse;
use portal::core::error::{
    ConfigError, EntityError, FieldValidationError, PortalError, RenderError, RequestError,
    StorageError, ValidationError,
};
use serde_json::Value;

async fn body_json(err: PortalError) -> (StatusCode, Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

// =============================================================================
// HTTP Status Code Tests
// =============================================================================

mod status_code_tests {
    use super::*;

    #[test]
    fn test_entity_not_found_returns_404() {
        let err = PortalError::Entity(EntityError::NotFound {
            entity_type: "donation".to_string(),
            id: "abc".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_entity_already_exists_returns_409() {
        let err = PortalError::Entity(EntityError::AlreadyExists {
            entity_type: "volunteer".to_string(),
            field: "email".to_string(),
            value: "meera@example.org".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_validation_errors_return_400() {
        let errors = [
            ValidationError::FieldError {
                field: "amount".to_string(),
                message: "must be positive".to_string(),
            },
            ValidationError::InvalidJson {
                message: "EOF".to_string(),
            },
            ValidationError::InvalidId {
                value: "12".to_string(),
            },
            ValidationError::InvalidQuery {
                message: "page: invalid digit found in string".to_string(),
            },
        ];
        for err in errors {
            assert_eq!(
                PortalError::Validation(err).status_code(),
                StatusCode::BAD_REQUEST
            );
        }
    }

    #[test]
    fn test_unauthorized_and_forbidden() {
        let anonymous = PortalError::Request(RequestError::Unauthorized {
            message: "sign in".to_string(),
        });
        let wrong_role = PortalError::Request(RequestError::Forbidden {
            message: "admins only".to_string(),
        });
        assert_eq!(anonymous.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(wrong_role.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_render_errors() {
        let bad_amount: PortalError = RenderError::InvalidAmount(f64::NAN).into();
        assert_eq!(bad_amount.status_code(), StatusCode::BAD_REQUEST);

        let qr: PortalError = RenderError::QrCode("data too long".to_string()).into();
        assert_eq!(qr.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(qr.error_code(), "RENDER_ERROR");
    }

    #[test]
    fn test_storage_backend_failure_returns_500() {
        let err: PortalError = StorageError::ConnectionError {
            backend: "mongodb".to_string(),
            message: "connection refused".to_string(),
        }
        .into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.error_code(), "STORAGE_ERROR");
    }
}

// =============================================================================
// Response Body Tests
// =============================================================================

mod response_body_tests {
    use super::*;

    #[tokio::test]
    async fn test_not_found_body() {
        let (status, body) = body_json(PortalError::Entity(EntityError::NotFound {
            entity_type: "member".to_string(),
            id: "42".to_string(),
        }))
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "ENTITY_NOT_FOUND");
        assert_eq!(body["details"]["entity_type"], "member");
        assert_eq!(body["details"]["id"], "42");
        assert!(body["error"].as_str().unwrap().contains("42"));
    }

    #[tokio::test]
    async fn test_field_errors_body() {
        let (status, body) = body_json(PortalError::Validation(ValidationError::FieldErrors(
            vec![
                FieldValidationError {
                    field: "amount".to_string(),
                    message: "must be positive".to_string(),
                },
                FieldValidationError {
                    field: "email".to_string(),
                    message: "invalid email".to_string(),
                },
            ],
        )))
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(body["details"]["fields"][0]["field"], "amount");
        assert_eq!(body["details"]["fields"][1]["message"], "invalid email");
    }

    #[tokio::test]
    async fn test_unauthorized_body_has_no_details() {
        let (status, body) = body_json(PortalError::Request(RequestError::Unauthorized {
            message: "a valid session is required".to_string(),
        }))
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "UNAUTHORIZED");
        assert!(body.get("details").is_none());
    }

    #[tokio::test]
    async fn test_internal_error_body() {
        let (status, body) = body_json(PortalError::Internal("boom".to_string())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "INTERNAL_ERROR");
    }
}

// =============================================================================
// Conversion Tests
// =============================================================================

mod conversion_tests {
    use super::*;

    #[test]
    fn test_storage_errors_inside_anyhow() {
        let duplicate = anyhow::Error::new(StorageError::Duplicate {
            entity_type: "post".to_string(),
            field: "slug".to_string(),
            value: "hello".to_string(),
        });
        let err: PortalError = duplicate.into();
        assert!(matches!(
            err,
            PortalError::Entity(EntityError::AlreadyExists { ref field, .. }) if field == "slug"
        ));

        let missing = anyhow::Error::new(StorageError::NotFound {
            entity_type: "event".to_string(),
            id: "7".to_string(),
        });
        let err: PortalError = missing.into();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_render_error_inside_anyhow() {
        let err: PortalError = anyhow::Error::new(RenderError::InvalidAmount(-5.0)).into();
        assert!(matches!(err, PortalError::Render(RenderError::InvalidAmount(_))));
    }

    #[test]
    fn test_context_is_kept_for_unknown_errors() {
        let err: PortalError = anyhow::anyhow!("socket closed")
            .context("Failed to list records")
            .into();
        match err {
            PortalError::Internal(message) => {
                assert!(message.contains("Failed to list records"));
                assert!(message.contains("socket closed"));
            }
            other => panic!("expected internal error, got {:?}", other),
        }
    }

    #[test]
    fn test_config_error_conversion() {
        let err: PortalError = ConfigError::InvalidValue {
            field: "auth.admin_roles".to_string(),
            value: "[]".to_string(),
            message: "at least one admin role is required".to_string(),
        }
        .into();
        assert_eq!(err.error_code(), "CONFIG_ERROR");
        assert!(err.to_string().contains("auth.admin_roles"));
    }

    #[test]
    fn test_validator_errors_are_sorted_by_field() {
        use validator::Validate;

        #[derive(Validate)]
        struct Signup {
            #[validate(length(min = 1))]
            name: String,
            #[validate(email)]
            email: String,
        }

        let errors = Signup {
            name: String::new(),
            email: "nope".to_string(),
        }
        .validate()
        .unwrap_err();

        match PortalError::from(errors) {
            PortalError::Validation(ValidationError::FieldErrors(fields)) => {
                let names: Vec<&str> = fields.iter().map(|f| f.field.as_str()).collect();
                assert_eq!(names, vec!["email", "name"]);
            }
            other => panic!("expected field errors, got {:?}", other),
        }
    }
}
