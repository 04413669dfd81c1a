//! JWT session tokens for administrator authentication
//!
//! Security notes:
//! - Tokens are signed with HS256 (HMAC-SHA256)
//! - Default expiry is 1 hour
//! - In production, SESSION_SECRET must be a strong random value from the
//!   environment; the secret is loaded once at startup and never mutated

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::auth::PermissionLevel;
use crate::types::IntakeError;

/// Payload stored in an admin session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Administrator identifier (email/username)
    pub identifier: String,
    /// Permission level granted
    pub permission_level: PermissionLevel,
    /// Token version (for future invalidation)
    pub version: u32,
    /// Issued at (Unix timestamp)
    pub iat: u64,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
}

/// Input for creating a new session token
#[derive(Debug, Clone)]
pub struct SessionInput {
    pub identifier: String,
    pub permission_level: PermissionLevel,
}

/// JWT validator and generator for admin sessions
#[derive(Clone)]
pub struct JwtValidator {
    secret: String,
    expiry_seconds: u64,
}

impl JwtValidator {
    /// Create a new JWT validator
    ///
    /// Returns an error if the secret is empty or too short.
    pub fn new(secret: String, expiry_seconds: u64) -> Result<Self, IntakeError> {
        if secret.is_empty() {
            return Err(IntakeError::Config(
                "SESSION_SECRET is required in production mode".into(),
            ));
        }

        if secret.len() < 32 {
            return Err(IntakeError::Config(
                "SESSION_SECRET must be at least 32 characters".into(),
            ));
        }

        Ok(Self {
            secret,
            expiry_seconds,
        })
    }

    /// Create a validator for dev mode (fixed insecure secret)
    pub fn new_dev() -> Self {
        Self {
            secret: "dev-mode-secret-not-for-production-use-123456".into(),
            expiry_seconds: 3600,
        }
    }

    /// Generate a session token for an authenticated administrator
    pub fn generate_token(&self, input: SessionInput) -> Result<String, IntakeError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| IntakeError::Auth(format!("System time error: {}", e)))?
            .as_secs();

        let claims = Claims {
            identifier: input.identifier,
            permission_level: input.permission_level,
            version: 1,
            iat: now,
            exp: now + self.expiry_seconds,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| IntakeError::Auth(format!("Failed to generate token: {}", e)))
    }

    /// Verify and decode a session token
    pub fn verify_token(&self, token: &str) -> Result<Claims, IntakeError> {
        let validation = Validation::default();

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|err| {
            use jsonwebtoken::errors::ErrorKind;
            let msg = match err.kind() {
                ErrorKind::ExpiredSignature => "Session expired",
                ErrorKind::InvalidToken => "Invalid session token",
                ErrorKind::InvalidSignature => "Invalid session signature",
                _ => "Session validation failed",
            };
            IntakeError::Unauthorized(msg.into())
        })
    }

    /// Session expiry in seconds
    pub fn expiry_seconds(&self) -> u64 {
        self.expiry_seconds
    }
}

/// Extract token from Authorization header.
/// Supports "Bearer <token>" format and raw tokens.
pub fn extract_token_from_header(auth_header: Option<&str>) -> Option<&str> {
    let header = auth_header?;

    if let Some(token) = header.strip_prefix("Bearer ") {
        let token = token.trim();
        if !token.is_empty() {
            return Some(token);
        }
    }

    // Also support raw token (for flexibility)
    if !header.contains(' ') {
        let token = header.trim();
        if !token.is_empty() {
            return Some(token);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_validator() -> JwtValidator {
        JwtValidator::new(
            "test-secret-that-is-at-least-32-characters-long".into(),
            3600,
        )
        .unwrap()
    }

    #[test]
    fn test_generate_and_verify_token() {
        let validator = test_validator();

        let token = validator
            .generate_token(SessionInput {
                identifier: "admin@example.com".into(),
                permission_level: PermissionLevel::Admin,
            })
            .unwrap();
        assert!(!token.is_empty());

        let claims = validator.verify_token(&token).unwrap();
        assert_eq!(claims.identifier, "admin@example.com");
        assert_eq!(claims.permission_level, PermissionLevel::Admin);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_invalid_token() {
        let validator = test_validator();
        assert!(validator.verify_token("invalid-token").is_err());
    }

    #[test]
    fn test_wrong_secret() {
        let validator1 = test_validator();
        let validator2 = JwtValidator::new(
            "different-secret-that-is-at-least-32-characters".into(),
            3600,
        )
        .unwrap();

        let token = validator1
            .generate_token(SessionInput {
                identifier: "admin@example.com".into(),
                permission_level: PermissionLevel::Admin,
            })
            .unwrap();

        assert!(validator2.verify_token(&token).is_err());
    }

    #[test]
    fn test_extract_token_from_header() {
        assert_eq!(
            extract_token_from_header(Some("Bearer abc123")),
            Some("abc123")
        );
        assert_eq!(extract_token_from_header(Some("abc123")), Some("abc123"));
        assert_eq!(extract_token_from_header(None), None);
        assert_eq!(extract_token_from_header(Some("")), None);
        assert_eq!(extract_token_from_header(Some("Bearer ")), None);
        assert_eq!(extract_token_from_header(Some("Basic abc123")), None);
    }

    #[test]
    fn test_secret_validation() {
        assert!(JwtValidator::new("short".into(), 3600).is_err());
        assert!(JwtValidator::new("".into(), 3600).is_err());
        assert!(JwtValidator::new("this-secret-is-at-least-32-chars-long".into(), 3600).is_ok());
    }

    #[test]
    fn test_dev_mode_validator() {
        let validator = JwtValidator::new_dev();

        let token = validator
            .generate_token(SessionInput {
                identifier: "dev@example.com".into(),
                permission_level: PermissionLevel::Admin,
            })
            .unwrap();
        assert!(validator.verify_token(&token).is_ok());
    }
}
