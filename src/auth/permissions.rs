//! Permission levels and operation table for the admin API
//!
//! Authorization is an explicit capability check: a handler names the
//! operation it is about to perform and passes the caller's session claims
//! (if any) to [`require`]. Unknown operations are denied.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::auth::Claims;
use crate::types::IntakeError;

/// Permission levels for admin API operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
#[repr(u8)]
pub enum PermissionLevel {
    /// No authentication - capability-link submission paths
    #[default]
    Public = 0,
    /// Authenticated administrator - read-only curation views
    Authenticated = 1,
    /// Admin - mutating operations (entity CRUD, link regeneration)
    Admin = 2,
}

impl fmt::Display for PermissionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PermissionLevel::Public => write!(f, "PUBLIC"),
            PermissionLevel::Authenticated => write!(f, "AUTHENTICATED"),
            PermissionLevel::Admin => write!(f, "ADMIN"),
        }
    }
}

/// Get the required permission level for an admin API operation.
/// Returns None for unknown operations (which should be blocked).
pub fn get_required_permission(operation: &str) -> Option<PermissionLevel> {
    match operation {
        // Public - capability-token paths; the link itself is the guard
        "view_submission_form" | "submit_service" => Some(PermissionLevel::Public),

        // Authenticated - read-only curation views
        "list_entities" | "view_entity" | "list_submissions" => {
            Some(PermissionLevel::Authenticated)
        }

        // Admin - mutating operations
        "create_entity"
        | "update_entity"
        | "delete_entity"
        | "regenerate_link"
        | "create_admin_user" => Some(PermissionLevel::Admin),

        // Unknown operations are blocked
        _ => None,
    }
}

/// Check if an operation is allowed for the given permission level
pub fn is_operation_allowed(operation: &str, level: PermissionLevel) -> bool {
    match get_required_permission(operation) {
        Some(required) => level >= required,
        None => false, // Unknown operations are blocked
    }
}

/// Explicit capability check against the caller's session state
///
/// `claims` is None for unauthenticated callers, who hold Public level.
pub fn require(claims: Option<&Claims>, operation: &str) -> Result<(), IntakeError> {
    let level = claims
        .map(|c| c.permission_level)
        .unwrap_or(PermissionLevel::Public);

    if is_operation_allowed(operation, level) {
        Ok(())
    } else if claims.is_none() {
        Err(IntakeError::Unauthorized(format!(
            "Operation '{}' requires authentication",
            operation
        )))
    } else {
        Err(IntakeError::Forbidden(format!(
            "Operation '{}' requires {} permission",
            operation,
            get_required_permission(operation)
                .map(|l| l.to_string())
                .unwrap_or_else(|| "unknown".into())
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(level: PermissionLevel) -> Claims {
        Claims {
            identifier: "admin@example.com".into(),
            permission_level: level,
            version: 1,
            iat: 0,
            exp: u64::MAX,
        }
    }

    #[test]
    fn test_public_operations() {
        assert!(is_operation_allowed("submit_service", PermissionLevel::Public));
        assert!(is_operation_allowed(
            "submit_service",
            PermissionLevel::Authenticated
        ));
        assert!(is_operation_allowed("submit_service", PermissionLevel::Admin));
    }

    #[test]
    fn test_authenticated_operations() {
        assert!(!is_operation_allowed("list_entities", PermissionLevel::Public));
        assert!(is_operation_allowed(
            "list_entities",
            PermissionLevel::Authenticated
        ));
        assert!(is_operation_allowed("list_entities", PermissionLevel::Admin));
    }

    #[test]
    fn test_admin_operations() {
        assert!(!is_operation_allowed("create_entity", PermissionLevel::Public));
        assert!(!is_operation_allowed(
            "regenerate_link",
            PermissionLevel::Authenticated
        ));
        assert!(is_operation_allowed("create_entity", PermissionLevel::Admin));
    }

    #[test]
    fn test_unknown_operations_blocked() {
        assert!(!is_operation_allowed("unknown_operation", PermissionLevel::Admin));
        assert!(!is_operation_allowed("drop_all_tables", PermissionLevel::Admin));
    }

    #[test]
    fn test_permission_ordering() {
        assert!(PermissionLevel::Admin > PermissionLevel::Authenticated);
        assert!(PermissionLevel::Authenticated > PermissionLevel::Public);
    }

    #[test]
    fn test_require_without_session() {
        assert!(require(None, "submit_service").is_ok());
        assert!(matches!(
            require(None, "list_entities"),
            Err(IntakeError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_require_with_session() {
        let admin = claims(PermissionLevel::Admin);
        assert!(require(Some(&admin), "create_entity").is_ok());

        let reader = claims(PermissionLevel::Authenticated);
        assert!(matches!(
            require(Some(&reader), "create_entity"),
            Err(IntakeError::Forbidden(_))
        ));
    }
}
