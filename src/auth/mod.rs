//! Authentication and Authorization module
//!
//! JWT token-based authentication plus the three role gates.

pub mod jwt;
pub mod middleware;
pub mod password;

pub use jwt::{create_token, verify_token, Claims, JwtConfig};
pub use middleware::{auth_middleware, require_admin, require_operator, AuthState, CurrentUser};
pub use password::{hash_password, verify_password};
