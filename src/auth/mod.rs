//! Authentication Module
//!
//! JWT token service plus the auth / role-gate middleware pair.

pub mod jwt;
pub mod middleware;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService, MAX_TOKEN_LIFETIME_MINUTES};
pub use middleware::{STAFF_ROLES, SUPER_ADMIN_ONLY, require_auth, require_role};
