//! Capability link lifecycle
//!
//! Operator note: verification is stateless, so regenerating an entity's
//! link does NOT revoke the previous token. Any holder of the old link can
//! keep submitting until that token's own TTL lapses. Actually cutting off
//! an old link requires rotating the shared signing secret (or the domain
//! tag), which invalidates every outstanding link at once.

use crate::db::schemas::EntityDoc;
use crate::token::{slug, unix_now, LinkCodec};

/// Mints and rotates entity capability links
#[derive(Clone)]
pub struct LinkManager {
    codec: LinkCodec,
}

impl LinkManager {
    pub fn new(codec: LinkCodec) -> Self {
        Self { codec }
    }

    pub fn codec(&self) -> &LinkCodec {
        &self.codec
    }

    /// Mint a link for the entity if it has none
    ///
    /// Idempotent: creating an entity twice never silently rotates its link.
    /// Returns true if a link was minted.
    pub fn ensure_link(&self, entity: &mut EntityDoc) -> bool {
        if entity.capability_link.is_some() {
            return false;
        }

        let payload = slug::normalize(&entity.name);
        entity.capability_link = Some(self.codec.mint(&payload, unix_now()));
        true
    }

    /// Unconditionally mint a fresh link, overwriting any existing one
    ///
    /// The previous token stays verifiable until its TTL lapses; see the
    /// module docs.
    pub fn regenerate(&self, entity: &mut EntityDoc) -> String {
        let payload = slug::normalize(&entity.name);
        let token = self.codec.mint(&payload, unix_now());
        entity.capability_link = Some(token.clone());
        token
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::ENTITY_LINK_TAG;

    fn test_manager() -> LinkManager {
        LinkManager::new(
            LinkCodec::new(
                b"test-link-secret-that-is-long-enough-123".to_vec(),
                ENTITY_LINK_TAG,
                3600,
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_ensure_link_mints_once() {
        let manager = test_manager();
        let mut entity = EntityDoc::new("Ministry Of Health".into());

        assert!(manager.ensure_link(&mut entity));
        let first = entity.capability_link.clone().unwrap();

        // Second call is a no-op
        assert!(!manager.ensure_link(&mut entity));
        assert_eq!(entity.capability_link.as_deref(), Some(first.as_str()));
    }

    #[test]
    fn test_minted_link_verifies_to_slug() {
        let manager = test_manager();
        let mut entity = EntityDoc::new("Ministry   Of Health".into());
        manager.ensure_link(&mut entity);

        let token = entity.capability_link.unwrap();
        let payload = manager.codec().verify(&token, unix_now()).unwrap();
        assert_eq!(payload, "ministry_of_health");
    }

    #[test]
    fn test_regenerate_overwrites() {
        let manager = test_manager();
        let mut entity = EntityDoc::new("Ministry Of Health".into());
        manager.ensure_link(&mut entity);
        let old = entity.capability_link.clone().unwrap();

        // Tokens embed the issue second; step past it so the mint differs
        std::thread::sleep(std::time::Duration::from_millis(1100));
        let new = manager.regenerate(&mut entity);

        assert_ne!(old, new);
        assert_eq!(entity.capability_link.as_deref(), Some(new.as_str()));

        // No revocation: both the old and the new token still verify
        let now = unix_now();
        assert!(manager.codec().verify(&old, now).is_ok());
        assert!(manager.codec().verify(&new, now).is_ok());
    }

    #[test]
    fn test_regenerate_works_without_prior_link() {
        let manager = test_manager();
        let mut entity = EntityDoc::new("Ministry Of Health".into());

        let token = manager.regenerate(&mut entity);
        assert!(manager.codec().verify(&token, unix_now()).is_ok());
    }
}
