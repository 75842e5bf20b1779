pub mod jwt;
pub mod middleware;
pub mod password;

pub use jwt::{Claims, JwtConfig, JwtService};
pub use middleware::{AuthUser, require_auth};
pub use password::{hash_password, verify_password};
