// handlers/auth/mod.rs - Auth handler module

pub mod login; // POST /api/auth/login
pub mod me; // GET /api/auth/me

pub use login::login_post;
pub use me::me_get;
