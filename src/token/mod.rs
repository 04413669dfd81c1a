//! Capability token minting and verification
//!
//! A capability link token is a signed triple of payload, issue timestamp,
//! and HMAC-SHA256 signature, encoded URL-safe. Holding a valid token IS the
//! authorization; there is no submitter account behind it.

pub mod codec;
pub mod slug;

pub use codec::{unix_now, LinkCodec, TokenError, DEFAULT_LINK_TTL_SECS, ENTITY_LINK_TAG};
pub use slug::{denormalize, normalize};
