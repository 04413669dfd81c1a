//! Authentication and authorization for the admin console
//!
//! Provides:
//! - JWT session token generation and validation for administrators
//! - Password hashing with Argon2
//! - Permission levels and an explicit per-operation capability check
//!
//! External submitters never touch this module; their authorization is the
//! capability link itself (see [`crate::token`]).

pub mod jwt;
pub mod password;
pub mod permissions;

pub use jwt::{extract_token_from_header, Claims, JwtValidator, SessionInput};
pub use password::{hash_password, verify_password};
pub use permissions::{get_required_permission, is_operation_allowed, require, PermissionLevel};
