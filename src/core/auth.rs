//! Session authentication and role-based authorization
//!
//! Sessions are HS256 JWTs carried in the `portal_session` cookie or an
//! `Authorization: Bearer` header. Decoding a token yields an
//! [`AuthContext`]; routes declare an [`AuthPolicy`] and check it against
//! that context.

use crate::config::{AccountConfig, AuthConfig};
use crate::core::error::{PortalError, RequestError};
use axum::http::{HeaderMap, header};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "portal_session";

/// Authorization context extracted from a request
#[derive(Debug, Clone, PartialEq)]
pub enum AuthContext {
    /// Authenticated user
    User {
        user_id: String,
        email: String,
        name: String,
        roles: Vec<String>,
    },

    /// No session (public access)
    Anonymous,
}

impl AuthContext {
    /// Get user_id if available
    pub fn user_id(&self) -> Option<&str> {
        match self {
            AuthContext::User { user_id, .. } => Some(user_id),
            AuthContext::Anonymous => None,
        }
    }

    /// Check whether the user carries any of `roles`
    pub fn has_any_role(&self, roles: &[String]) -> bool {
        match self {
            AuthContext::User { roles: held, .. } => roles.iter().any(|r| held.contains(r)),
            AuthContext::Anonymous => false,
        }
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, AuthContext::Anonymous)
    }
}

impl From<Claims> for AuthContext {
    fn from(claims: Claims) -> Self {
        AuthContext::User {
            user_id: claims.sub,
            email: claims.email,
            name: claims.name,
            roles: claims.roles,
        }
    }
}

/// Authorization policy for an operation
#[derive(Debug, Clone)]
pub enum AuthPolicy {
    /// Public access (no auth required)
    Public,

    /// Any authenticated user
    Authenticated,

    /// User must have one of these roles
    HasRole(Vec<String>),

    /// Combination of policies (AND)
    And(Vec<AuthPolicy>),

    /// Combination of policies (OR)
    Or(Vec<AuthPolicy>),
}

impl AuthPolicy {
    /// Check if auth context satisfies this policy
    pub fn check(&self, context: &AuthContext) -> bool {
        match self {
            AuthPolicy::Public => true,

            AuthPolicy::Authenticated => !context.is_anonymous(),

            AuthPolicy::HasRole(required_roles) => context.has_any_role(required_roles),

            AuthPolicy::And(policies) => policies.iter().all(|p| p.check(context)),

            AuthPolicy::Or(policies) => policies.iter().any(|p| p.check(context)),
        }
    }

    /// Like [`check`](Self::check), but reports 401 for anonymous callers
    /// and 403 for signed-in users that fall short
    pub fn authorize(&self, context: &AuthContext) -> Result<(), RequestError> {
        if self.check(context) {
            return Ok(());
        }
        match context {
            AuthContext::Anonymous => Err(RequestError::Unauthorized {
                message: "a valid session is required".to_string(),
            }),
            AuthContext::User { email, .. } => {
                tracing::warn!(user = %email, "session lacks the required role");
                Err(RequestError::Forbidden {
                    message: "insufficient role".to_string(),
                })
            }
        }
    }
}

// =============================================================================
// Session tokens
// =============================================================================

/// Claims carried by a session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub name: String,
    pub roles: Vec<String>,
    pub exp: usize,
}

/// Signing and verification keys for session tokens
#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl SessionKeys {
    pub fn new(secret: &str, ttl_hours: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::hours(ttl_hours.max(1)),
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(&config.jwt_secret, config.session_ttl_hours)
    }

    /// Session lifetime in seconds, used for the cookie's Max-Age
    pub fn ttl_seconds(&self) -> i64 {
        self.ttl.num_seconds()
    }

    /// Sign a session token for `account`
    pub fn issue(&self, account: &AccountConfig) -> Result<String, PortalError> {
        let exp = (Utc::now() + self.ttl).timestamp().max(0) as usize;
        let claims = Claims {
            sub: account.email.clone(),
            email: account.email.clone(),
            name: account.name.clone(),
            roles: account.roles.clone(),
            exp,
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| PortalError::Internal(format!("Failed to sign session token: {}", e)))
    }

    /// Decode and validate a session token (signature and expiry)
    pub fn verify(&self, token: &str) -> Result<Claims, RequestError> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::warn!("rejected session token: {}", e);
                RequestError::Unauthorized {
                    message: "invalid or expired session".to_string(),
                }
            })
    }
}

/// Pull the session token from a Bearer header or the session cookie
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
    {
        return Some(token.trim().to_string());
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .flat_map(|h| h.split(';'))
        .filter_map(|cookie| cookie.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.to_string())
        .filter(|value| !value.is_empty())
}

/// `Set-Cookie` value carrying a fresh session
pub fn session_cookie(token: &str, max_age: i64, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; HttpOnly; SameSite=Strict; Path=/; Max-Age={}",
        SESSION_COOKIE, token, max_age
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` value that clears the session
pub fn clear_session_cookie(secure: bool) -> String {
    session_cookie("", 0, secure)
}

// =============================================================================
// Passwords
// =============================================================================

/// Lower-case hex SHA-256 digest of a password
pub fn hash_password(password: &str) -> String {
    format!("{:x}", Sha256::digest(password.as_bytes()))
}

/// Compare a stored hex digest with a computed one without an early exit
///
/// Runs in time that depends only on the lengths, which are public.
fn digest_matches(stored: &str, computed: &str) -> bool {
    let stored = stored.as_bytes();
    let computed = computed.as_bytes();
    if stored.len() != computed.len() {
        return false;
    }
    stored
        .iter()
        .zip(computed)
        .fold(0u8, |diff, (a, b)| diff | (a.to_ascii_lowercase() ^ b))
        == 0
}

/// Find the configured account matching these credentials
///
/// Every account's digest is checked so the response time does not reveal
/// which position matched.
pub fn authenticate<'a>(
    accounts: &'a [AccountConfig],
    email: &str,
    password: &str,
) -> Option<&'a AccountConfig> {
    let digest = hash_password(password);
    let email = email.trim();
    accounts.iter().fold(None, |found, account| {
        let matches = digest_matches(&account.password_hash, &digest)
            && account.email.eq_ignore_ascii_case(email);
        found.or(matches.then_some(account))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn admin_account() -> AccountConfig {
        AccountConfig {
            email: "admin@ngo.org".to_string(),
            name: "Admin".to_string(),
            password_hash: hash_password("s3cret"),
            roles: vec!["admin".to_string()],
        }
    }

    fn user(roles: &[&str]) -> AuthContext {
        AuthContext::User {
            user_id: "u1".to_string(),
            email: "u1@ngo.org".to_string(),
            name: "U1".to_string(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
        }
    }

    #[test]
    fn test_policy_check() {
        let admin = AuthPolicy::HasRole(vec!["admin".to_string()]);
        assert!(admin.check(&user(&["admin"])));
        assert!(!admin.check(&user(&["editor"])));
        assert!(!admin.check(&AuthContext::Anonymous));

        assert!(AuthPolicy::Public.check(&AuthContext::Anonymous));
        assert!(AuthPolicy::Authenticated.check(&user(&[])));
        assert!(!AuthPolicy::Authenticated.check(&AuthContext::Anonymous));
    }

    #[test]
    fn test_combined_policies() {
        let either = AuthPolicy::Or(vec![
            AuthPolicy::HasRole(vec!["admin".to_string()]),
            AuthPolicy::HasRole(vec!["editor".to_string()]),
        ]);
        assert!(either.check(&user(&["editor"])));

        let both = AuthPolicy::And(vec![
            AuthPolicy::Authenticated,
            AuthPolicy::HasRole(vec!["admin".to_string()]),
        ]);
        assert!(both.check(&user(&["admin"])));
        assert!(!both.check(&user(&["editor"])));
        assert!(!both.check(&AuthContext::Anonymous));
    }

    #[test]
    fn test_authorize_distinguishes_401_and_403() {
        let admin = AuthPolicy::HasRole(vec!["admin".to_string()]);
        assert!(matches!(
            admin.authorize(&AuthContext::Anonymous),
            Err(RequestError::Unauthorized { .. })
        ));
        assert!(matches!(
            admin.authorize(&user(&["volunteer"])),
            Err(RequestError::Forbidden { .. })
        ));
        assert!(admin.authorize(&user(&["admin"])).is_ok());
    }

    #[test]
    fn test_digest_matches() {
        let digest = hash_password("s3cret");
        assert!(digest_matches(&digest, &digest));
        assert!(digest_matches(&digest.to_uppercase(), &digest));
        assert!(!digest_matches(&hash_password("s3cret!"), &digest));
        assert!(!digest_matches(&digest[..63], &digest));
        assert!(!digest_matches("", &digest));
    }

    #[test]
    fn test_token_roundtrip() {
        let keys = SessionKeys::new("unit-test-secret", 1);
        let token = keys.issue(&admin_account()).unwrap();
        let claims = keys.verify(&token).unwrap();
        assert_eq!(claims.email, "admin@ngo.org");
        assert_eq!(claims.roles, vec!["admin".to_string()]);
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let token = SessionKeys::new("one", 1).issue(&admin_account()).unwrap();
        assert!(SessionKeys::new("two", 1).verify(&token).is_err());
        assert!(SessionKeys::new("one", 1).verify("not-a-token").is_err());
    }

    #[test]
    fn test_extract_token_from_bearer_and_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        assert_eq!(extract_token(&headers).as_deref(), Some("abc"));

        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; portal_session=xyz"),
        );
        assert_eq!(extract_token(&headers).as_deref(), Some("xyz"));

        assert!(extract_token(&HeaderMap::new()).is_none());
    }

    #[test]
    fn test_cookies() {
        let cookie = session_cookie("tok", 3600, true);
        assert!(cookie.starts_with("portal_session=tok;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Max-Age=3600"));
        assert!(cookie.ends_with("; Secure"));

        let cleared = clear_session_cookie(false);
        assert!(cleared.contains("Max-Age=0"));
        assert!(!cleared.contains("Secure"));
    }

    #[test]
    fn test_hash_password_and_authenticate() {
        assert_eq!(
            hash_password("password"),
            "5e884898da28047151d0e56f8dc6292773603d0d6aabbdd62a11ef721d1542d8"
        );

        let accounts = vec![admin_account()];
        assert!(authenticate(&accounts, "ADMIN@ngo.org", "s3cret").is_some());
        assert!(authenticate(&accounts, "admin@ngo.org", "wrong").is_none());
        assert!(authenticate(&accounts, "other@ngo.org", "s3cret").is_none());
    }
}
