pub mod auth;
pub mod clients;
pub mod landing;
pub mod newsletter;
pub mod projects;
pub mod resource;
