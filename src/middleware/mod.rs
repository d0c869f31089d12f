pub mod auth;
pub mod origin;

pub use auth::{jwt_auth_middleware, require_admin, AuthUser};
pub use origin::RequestOrigin;
