// handlers/mod.rs - Route handlers
//
// Public and admin routes share these handlers; the admin guard is applied
// as a route layer in `routes`, never inside a handler.
//
// src/handlers/
// ├── root.rs        ← GET /, GET /health
// ├── auth/          ← /api/auth/login, /api/auth/me
// ├── resource.rs    ← projects and clients CRUD, generic over `Resource`
// └── newsletter.rs  ← subscribe and list subscribers

pub mod auth;
pub mod newsletter;
pub mod resource;
pub mod root;
