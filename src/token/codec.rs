//! Signed capability token codec
//!
//! Token format: `base64url(payload) "." base64url(issued_at) "." base64url(sig)`
//! where `sig = HMAC-SHA256(secret, domain_tag "." payload "." issued_at)`.
//!
//! Security notes:
//! - The MAC is checked with a constant-time comparison before the issue
//!   timestamp is inspected, so a forged token and a tampered-timestamp
//!   token are indistinguishable by timing
//! - The domain tag namespaces the signature; rotating the tag invalidates
//!   every token minted under the old one
//! - Verification is stateless: there is no token registry, so a token stays
//!   valid until its TTL lapses even after the entity's link is regenerated

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::types::IntakeError;

type HmacSha256 = Hmac<Sha256>;

/// Domain tag for entity submission links
pub const ENTITY_LINK_TAG: &str = "entity-link";

/// Token verification failure kinds
///
/// Callers surfacing errors to external users must collapse both variants
/// into one message; the distinction exists for server-side logging only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// Malformed token or signature mismatch
    #[error("invalid token")]
    Invalid,

    /// Valid signature, issue timestamp older than the TTL
    #[error("expired token")]
    Expired,
}

/// Mints and verifies signed capability tokens
#[derive(Clone)]
pub struct LinkCodec {
    secret: Vec<u8>,
    domain_tag: String,
    ttl_secs: u64,
}

impl LinkCodec {
    /// Create a new codec
    ///
    /// Returns an error if the secret is empty or shorter than 32 bytes.
    pub fn new(
        secret: impl Into<Vec<u8>>,
        domain_tag: impl Into<String>,
        ttl_secs: u64,
    ) -> Result<Self, IntakeError> {
        let secret = secret.into();

        if secret.is_empty() {
            return Err(IntakeError::Config("LINK_SECRET is required".into()));
        }

        if secret.len() < 32 {
            return Err(IntakeError::Config(
                "LINK_SECRET must be at least 32 bytes".into(),
            ));
        }

        Ok(Self {
            secret,
            domain_tag: domain_tag.into(),
            ttl_secs,
        })
    }

    /// Create a codec for dev mode (fixed insecure secret)
    pub fn new_dev() -> Self {
        Self {
            secret: b"dev-mode-link-secret-not-for-production".to_vec(),
            domain_tag: ENTITY_LINK_TAG.into(),
            ttl_secs: DEFAULT_LINK_TTL_SECS,
        }
    }

    /// Token TTL in seconds, enforced at verify time only
    pub fn ttl_secs(&self) -> u64 {
        self.ttl_secs
    }

    /// Mint a token carrying `payload`, issued at `issued_at` (Unix seconds)
    ///
    /// Deterministic: identical inputs produce an identical token. The
    /// output is URL-safe with no whitespace or padding.
    pub fn mint(&self, payload: &str, issued_at: u64) -> String {
        let issued_at = issued_at.to_string();
        let sig = self.signature(payload, &issued_at);

        format!(
            "{}.{}.{}",
            URL_SAFE_NO_PAD.encode(payload.as_bytes()),
            URL_SAFE_NO_PAD.encode(issued_at.as_bytes()),
            URL_SAFE_NO_PAD.encode(sig)
        )
    }

    /// Verify a token and return its payload
    ///
    /// The signature is recomputed and compared in constant time first; only
    /// after it matches is the issue timestamp parsed and checked against
    /// the TTL. A tampered token therefore always reports `Invalid`, never
    /// `Expired`.
    pub fn verify(&self, token: &str, now: u64) -> Result<String, TokenError> {
        let mut parts = token.split('.');
        let (payload_b64, issued_b64, sig_b64) =
            match (parts.next(), parts.next(), parts.next(), parts.next()) {
                (Some(p), Some(i), Some(s), None) => (p, i, s),
                _ => return Err(TokenError::Invalid),
            };

        let payload = URL_SAFE_NO_PAD
            .decode(payload_b64)
            .ok()
            .and_then(|b| String::from_utf8(b).ok())
            .ok_or(TokenError::Invalid)?;
        let issued_at = URL_SAFE_NO_PAD
            .decode(issued_b64)
            .ok()
            .and_then(|b| String::from_utf8(b).ok())
            .ok_or(TokenError::Invalid)?;
        let sig = URL_SAFE_NO_PAD
            .decode(sig_b64)
            .map_err(|_| TokenError::Invalid)?;

        let mut mac = HmacSha256::new_from_slice(&self.secret).map_err(|_| TokenError::Invalid)?;
        mac.update(self.domain_tag.as_bytes());
        mac.update(b".");
        mac.update(payload.as_bytes());
        mac.update(b".");
        mac.update(issued_at.as_bytes());
        mac.verify_slice(&sig).map_err(|_| TokenError::Invalid)?;

        // Signature verified; the timestamp string is now trusted
        let issued_at: u64 = issued_at.parse().map_err(|_| TokenError::Invalid)?;

        if now.saturating_sub(issued_at) > self.ttl_secs {
            return Err(TokenError::Expired);
        }

        Ok(payload)
    }

    fn signature(&self, payload: &str, issued_at: &str) -> Vec<u8> {
        let mut mac =
            HmacSha256::new_from_slice(&self.secret).expect("HMAC accepts any key length");
        mac.update(self.domain_tag.as_bytes());
        mac.update(b".");
        mac.update(payload.as_bytes());
        mac.update(b".");
        mac.update(issued_at.as_bytes());
        mac.finalize().into_bytes().to_vec()
    }
}

/// Default link TTL: 30 days
pub const DEFAULT_LINK_TTL_SECS: u64 = 30 * 24 * 60 * 60;

/// Current Unix timestamp in seconds
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: u64 = 3600;

    fn test_codec() -> LinkCodec {
        LinkCodec::new(
            b"test-link-secret-that-is-long-enough-123".to_vec(),
            ENTITY_LINK_TAG,
            TTL,
        )
        .unwrap()
    }

    #[test]
    fn test_mint_and_verify_roundtrip() {
        let codec = test_codec();

        let token = codec.mint("ministry_of_health", 1000);
        let payload = codec.verify(&token, 1500).unwrap();

        assert_eq!(payload, "ministry_of_health");
    }

    #[test]
    fn test_mint_is_deterministic_and_url_safe() {
        let codec = test_codec();

        let a = codec.mint("some_entity", 1000);
        let b = codec.mint("some_entity", 1000);
        assert_eq!(a, b);

        // URL-safe: no whitespace, no characters outside the base64url set
        assert!(a
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.'));

        // Different issue time yields a different token
        let c = codec.mint("some_entity", 1001);
        assert_ne!(a, c);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let codec = test_codec();
        let other = LinkCodec::new(
            b"another-link-secret-that-is-long-enough".to_vec(),
            ENTITY_LINK_TAG,
            TTL,
        )
        .unwrap();

        let token = codec.mint("some_entity", 1000);
        assert_eq!(other.verify(&token, 1000), Err(TokenError::Invalid));
    }

    #[test]
    fn test_wrong_domain_tag_rejected() {
        let codec = test_codec();
        let other = LinkCodec::new(
            b"test-link-secret-that-is-long-enough-123".to_vec(),
            "entity-link-v2",
            TTL,
        )
        .unwrap();

        let token = codec.mint("some_entity", 1000);
        assert_eq!(other.verify(&token, 1000), Err(TokenError::Invalid));
    }

    #[test]
    fn test_single_character_mutation_rejected() {
        let codec = test_codec();
        let token = codec.mint("ministry_of_health", 1000);

        for i in 0..token.len() {
            let mut bytes = token.clone().into_bytes();
            bytes[i] = if bytes[i] == b'A' { b'B' } else { b'A' };
            let mutated = String::from_utf8(bytes).unwrap();
            if mutated == token {
                continue;
            }
            assert_eq!(
                codec.verify(&mutated, 1000),
                Err(TokenError::Invalid),
                "mutation at index {} was accepted",
                i
            );
        }
    }

    #[test]
    fn test_expiry_boundary() {
        let codec = test_codec();
        let token = codec.mint("some_entity", 1000);

        // Exactly at TTL: still valid (age must exceed the TTL to expire)
        assert!(codec.verify(&token, 1000 + TTL).is_ok());
        assert!(codec.verify(&token, 1000 + TTL - 1).is_ok());

        // One second past: expired
        assert_eq!(
            codec.verify(&token, 1000 + TTL + 1),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn test_tampered_timestamp_is_invalid_not_expired() {
        let codec = test_codec();
        let token = codec.mint("some_entity", 1000);

        // Rewrite the timestamp segment to something ancient; the signature
        // no longer matches, so this must report Invalid, not Expired
        let parts: Vec<&str> = token.split('.').collect();
        let forged = format!(
            "{}.{}.{}",
            parts[0],
            URL_SAFE_NO_PAD.encode(b"1"),
            parts[2]
        );
        assert_eq!(
            codec.verify(&forged, 1000 + TTL + 100),
            Err(TokenError::Invalid)
        );
    }

    #[test]
    fn test_malformed_tokens_rejected() {
        let codec = test_codec();

        for tok in [
            "",
            "not-a-token",
            "a.b",
            "a.b.c.d",
            "!!!.###.$$$",
            "YQ.YQ", // two well-formed segments, missing signature
        ] {
            assert_eq!(codec.verify(tok, 1000), Err(TokenError::Invalid), "{tok}");
        }
    }

    #[test]
    fn test_future_issued_token_is_valid() {
        // Clock skew between mint and verify hosts must not lock holders out
        let codec = test_codec();
        let token = codec.mint("some_entity", 2000);
        assert!(codec.verify(&token, 1000).is_ok());
    }

    #[test]
    fn test_secret_length_enforced() {
        assert!(LinkCodec::new(b"short".to_vec(), ENTITY_LINK_TAG, TTL).is_err());
        assert!(LinkCodec::new(Vec::new(), ENTITY_LINK_TAG, TTL).is_err());
    }
}
