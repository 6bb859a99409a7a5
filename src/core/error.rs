//! Typed error handling for the portal
//!
//! Every handler returns [`PortalError`] on failure. Each category knows its
//! HTTP status and a stable error code, so clients can branch on `code`
//! instead of parsing messages.
//!
//! # Error Categories
//!
//! - [`EntityError`]: record lookups and uniqueness conflicts
//! - [`ValidationError`]: malformed JSON, failed field rules, bad ids
//! - [`StorageError`]: store backends (in-memory, MongoDB)
//! - [`RequestError`]: authentication and authorization failures
//! - [`RenderError`]: PDF generation
//! - [`ConfigError`]: configuration loading and validation
//!
//! # Example
//!
//! ```rust,ignore
//! async fn fetch(state: &AppState, id: Uuid) -> PortalResult<Donation> {
//!     state.donations.get(&id).await?.ok_or_else(|| {
//!         EntityError::NotFound { entity_type: "donation".into(), id: id.to_string() }.into()
//!     })
//! }
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;

pub use crate::render::RenderError;

/// The main error type for the portal
#[derive(Debug)]
pub enum PortalError {
    /// Record-related errors (lookup, uniqueness)
    Entity(EntityError),

    /// Input validation errors
    Validation(ValidationError),

    /// Storage backend errors
    Storage(StorageError),

    /// Authentication / authorization errors
    Request(RequestError),

    /// PDF rendering errors
    Render(RenderError),

    /// Configuration errors
    Config(ConfigError),

    /// Anything else; logged and reported as a 500
    Internal(String),
}

impl fmt::Display for PortalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortalError::Entity(e) => write!(f, "{}", e),
            PortalError::Validation(e) => write!(f, "{}", e),
            PortalError::Storage(e) => write!(f, "{}", e),
            PortalError::Request(e) => write!(f, "{}", e),
            PortalError::Render(e) => write!(f, "{}", e),
            PortalError::Config(e) => write!(f, "{}", e),
            PortalError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for PortalError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PortalError::Entity(e) => Some(e),
            PortalError::Validation(e) => Some(e),
            PortalError::Storage(e) => Some(e),
            PortalError::Request(e) => Some(e),
            PortalError::Render(e) => Some(e),
            PortalError::Config(e) => Some(e),
            PortalError::Internal(_) => None,
        }
    }
}

/// Error body written to HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: String,
    /// Error code for programmatic handling
    pub code: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl PortalError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            PortalError::Entity(e) => e.status_code(),
            PortalError::Validation(_) => StatusCode::BAD_REQUEST,
            PortalError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            PortalError::Request(e) => e.status_code(),
            PortalError::Render(e) => match e {
                RenderError::InvalidAmount(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            PortalError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            PortalError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            PortalError::Entity(e) => e.error_code(),
            PortalError::Validation(e) => e.error_code(),
            PortalError::Storage(_) => "STORAGE_ERROR",
            PortalError::Request(e) => e.error_code(),
            PortalError::Render(_) => "RENDER_ERROR",
            PortalError::Config(_) => "CONFIG_ERROR",
            PortalError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to an error response body
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.to_string(),
            code: self.error_code().to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            PortalError::Entity(EntityError::NotFound { entity_type, id }) => {
                Some(serde_json::json!({
                    "entity_type": entity_type,
                    "id": id
                }))
            }
            PortalError::Entity(EntityError::AlreadyExists {
                entity_type,
                field,
                value,
            }) => Some(serde_json::json!({
                "entity_type": entity_type,
                "field": field,
                "value": value
            })),
            PortalError::Validation(ValidationError::FieldErrors(errors)) => {
                Some(serde_json::json!({ "fields": errors }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for PortalError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), "{}", self);
        }
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Entity Errors
// =============================================================================

/// Errors related to record operations
#[derive(Debug)]
pub enum EntityError {
    /// Record was not found
    NotFound { entity_type: String, id: String },

    /// A unique field already holds this value
    AlreadyExists {
        entity_type: String,
        field: String,
        value: String,
    },
}

impl fmt::Display for EntityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityError::NotFound { entity_type, id } => {
                write!(f, "{} with id '{}' not found", entity_type, id)
            }
            EntityError::AlreadyExists {
                entity_type,
                field,
                value,
            } => {
                write!(
                    f,
                    "{} with {} '{}' already exists",
                    entity_type, field, value
                )
            }
        }
    }
}

impl std::error::Error for EntityError {}

impl EntityError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            EntityError::NotFound { .. } => StatusCode::NOT_FOUND,
            EntityError::AlreadyExists { .. } => StatusCode::CONFLICT,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            EntityError::NotFound { .. } => "ENTITY_NOT_FOUND",
            EntityError::AlreadyExists { .. } => "ENTITY_ALREADY_EXISTS",
        }
    }
}

impl From<EntityError> for PortalError {
    fn from(err: EntityError) -> Self {
        PortalError::Entity(err)
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to input validation
#[derive(Debug)]
pub enum ValidationError {
    /// Single field validation error
    FieldError { field: String, message: String },

    /// Multiple field validation errors
    FieldErrors(Vec<FieldValidationError>),

    /// Body could not be parsed into the expected shape
    InvalidJson { message: String },

    /// Path id is not a UUID
    InvalidId { value: String },

    /// Query string could not be parsed
    InvalidQuery { message: String },
}

/// A single field validation error
#[derive(Debug, Clone, Serialize)]
pub struct FieldValidationError {
    pub field: String,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::FieldError { field, message } => {
                write!(f, "Validation error for field '{}': {}", field, message)
            }
            ValidationError::FieldErrors(errors) => {
                let msgs: Vec<String> = errors
                    .iter()
                    .map(|e| format!("{}: {}", e.field, e.message))
                    .collect();
                write!(f, "Validation errors: {}", msgs.join(", "))
            }
            ValidationError::InvalidJson { message } => {
                write!(f, "Invalid JSON: {}", message)
            }
            ValidationError::InvalidId { value } => {
                write!(f, "Invalid id format: '{}'", value)
            }
            ValidationError::InvalidQuery { message } => {
                write!(f, "Invalid query string: {}", message)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl ValidationError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ValidationError::FieldError { .. } | ValidationError::FieldErrors(_) => {
                "VALIDATION_ERROR"
            }
            ValidationError::InvalidJson { .. } => "INVALID_JSON",
            ValidationError::InvalidId { .. } => "INVALID_ID",
            ValidationError::InvalidQuery { .. } => "INVALID_QUERY",
        }
    }
}

impl From<ValidationError> for PortalError {
    fn from(err: ValidationError) -> Self {
        PortalError::Validation(err)
    }
}

impl From<validator::ValidationErrors> for ValidationError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<FieldValidationError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                let field = field.to_string();
                errs.iter().map(move |err| FieldValidationError {
                    field: field.clone(),
                    message: err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("failed '{}' check", err.code)),
                })
            })
            .collect();
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        ValidationError::FieldErrors(fields)
    }
}

impl From<validator::ValidationErrors> for PortalError {
    fn from(errors: validator::ValidationErrors) -> Self {
        PortalError::Validation(errors.into())
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors raised by storage backends
///
/// Backends return these wrapped in `anyhow::Error`; the conversion into
/// [`PortalError`] downcasts them so lookups and conflicts keep their status.
#[derive(Debug)]
pub enum StorageError {
    /// No record with this id
    NotFound { entity_type: String, id: String },

    /// Unique constraint violated
    Duplicate {
        entity_type: String,
        field: String,
        value: String,
    },

    /// Connection error
    ConnectionError { backend: String, message: String },

    /// Query execution error
    QueryError { backend: String, message: String },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::NotFound { entity_type, id } => {
                write!(f, "{} with id '{}' not found", entity_type, id)
            }
            StorageError::Duplicate {
                entity_type,
                field,
                value,
            } => {
                write!(
                    f,
                    "{} with {} '{}' already exists",
                    entity_type, field, value
                )
            }
            StorageError::ConnectionError { backend, message } => {
                write!(f, "Failed to connect to {}: {}", backend, message)
            }
            StorageError::QueryError { backend, message } => {
                write!(f, "{} query error: {}", backend, message)
            }
        }
    }
}

impl std::error::Error for StorageError {}

impl From<StorageError> for PortalError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound { entity_type, id } => {
                PortalError::Entity(EntityError::NotFound { entity_type, id })
            }
            StorageError::Duplicate {
                entity_type,
                field,
                value,
            } => PortalError::Entity(EntityError::AlreadyExists {
                entity_type,
                field,
                value,
            }),
            other => PortalError::Storage(other),
        }
    }
}

// =============================================================================
// Request Errors
// =============================================================================

/// Errors related to the caller's session
#[derive(Debug)]
pub enum RequestError {
    /// No session, or the session token is invalid/expired
    Unauthorized { message: String },

    /// Session is valid but lacks the required role
    Forbidden { message: String },
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::Unauthorized { message } => {
                write!(f, "Unauthorized: {}", message)
            }
            RequestError::Forbidden { message } => {
                write!(f, "Forbidden: {}", message)
            }
        }
    }
}

impl std::error::Error for RequestError {}

impl RequestError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RequestError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            RequestError::Forbidden { .. } => StatusCode::FORBIDDEN,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            RequestError::Unauthorized { .. } => "UNAUTHORIZED",
            RequestError::Forbidden { .. } => "FORBIDDEN",
        }
    }
}

impl From<RequestError> for PortalError {
    fn from(err: RequestError) -> Self {
        PortalError::Request(err)
    }
}

// =============================================================================
// Render Errors
// =============================================================================

impl From<RenderError> for PortalError {
    fn from(err: RenderError) -> Self {
        PortalError::Render(err)
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to parse configuration file
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// Invalid value in configuration
    InvalidValue {
        field: String,
        value: String,
        message: String,
    },

    /// IO error while reading configuration
    IoError { message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError { file, message } => {
                if let Some(file) = file {
                    write!(f, "Failed to parse config file '{}': {}", file, message)
                } else {
                    write!(f, "Failed to parse config: {}", message)
                }
            }
            ConfigError::InvalidValue {
                field,
                value,
                message,
            } => {
                write!(
                    f,
                    "Invalid value '{}' for field '{}': {}",
                    value, field, message
                )
            }
            ConfigError::IoError { message } => {
                write!(f, "IO error: {}", message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for PortalError {
    fn from(err: ConfigError) -> Self {
        PortalError::Config(err)
    }
}

// =============================================================================
// Conversions from external errors
// =============================================================================

impl From<serde_json::Error> for PortalError {
    fn from(err: serde_json::Error) -> Self {
        PortalError::Validation(ValidationError::InvalidJson {
            message: err.to_string(),
        })
    }
}

/// Storage and render helpers return `anyhow::Result`; recover the typed
/// error when one is inside.
impl From<anyhow::Error> for PortalError {
    fn from(err: anyhow::Error) -> Self {
        let err = match err.downcast::<StorageError>() {
            Ok(storage) => return storage.into(),
            Err(err) => err,
        };
        match err.downcast::<RenderError>() {
            Ok(render) => render.into(),
            Err(err) => PortalError::Internal(format!("{:#}", err)),
        }
    }
}

// =============================================================================
// Result type alias
// =============================================================================

/// A specialized Result type for portal handlers
pub type PortalResult<T> = Result<T, PortalError>;

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_error_display() {
        let err = EntityError::NotFound {
            entity_type: "donation".to_string(),
            id: "abc".to_string(),
        };
        assert!(err.to_string().contains("donation"));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_entity_error_status_code() {
        let err = EntityError::NotFound {
            entity_type: "member".to_string(),
            id: "x".to_string(),
        };
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);

        let err = EntityError::AlreadyExists {
            entity_type: "member".to_string(),
            field: "email".to_string(),
            value: "a@b.org".to_string(),
        };
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_validation_error_multiple_fields() {
        let err = ValidationError::FieldErrors(vec![
            FieldValidationError {
                field: "donor_name".to_string(),
                message: "required".to_string(),
            },
            FieldValidationError {
                field: "email".to_string(),
                message: "invalid format".to_string(),
            },
        ]);
        let display = err.to_string();
        assert!(display.contains("donor_name"));
        assert!(display.contains("email"));
    }

    #[test]
    fn test_storage_duplicate_becomes_conflict() {
        let err: PortalError = StorageError::Duplicate {
            entity_type: "post".to_string(),
            field: "slug".to_string(),
            value: "hello".to_string(),
        }
        .into();
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.error_code(), "ENTITY_ALREADY_EXISTS");
    }

    #[test]
    fn test_anyhow_downcasts_storage_not_found() {
        let err = anyhow::Error::new(StorageError::NotFound {
            entity_type: "event".to_string(),
            id: "42".to_string(),
        });
        let err: PortalError = err.into();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_anyhow_unknown_becomes_internal() {
        let err: PortalError = anyhow::anyhow!("boom").into();
        assert!(matches!(err, PortalError::Internal(_)));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_invalid_amount_is_bad_request() {
        let err: PortalError = RenderError::InvalidAmount(-1.0).into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_error_response_serialization() {
        let err = PortalError::Entity(EntityError::NotFound {
            entity_type: "donation".to_string(),
            id: "abc".to_string(),
        });
        let response = err.to_response();
        assert_eq!(response.code, "ENTITY_NOT_FOUND");
        assert!(response.error.contains("abc"));
        assert!(response.details.is_some());
    }

    #[test]
    fn test_request_error_status_codes() {
        assert_eq!(
            RequestError::Unauthorized {
                message: "test".to_string()
            }
            .status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            RequestError::Forbidden {
                message: "test".to_string()
            }
            .status_code(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_config_error() {
        let err = ConfigError::InvalidValue {
            field: "storage.backend".to_string(),
            value: "redis".to_string(),
            message: "unsupported backend".to_string(),
        };
        assert!(err.to_string().contains("redis"));
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: PortalError = json_err.into();
        assert!(matches!(
            err,
            PortalError::Validation(ValidationError::InvalidJson { .. })
        ));
    }
}
