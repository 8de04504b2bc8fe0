/// Database connection and schema creation
pub mod database;

/// JWT secret and token lifetimes from environment variables
pub mod auth;

/// HTTP server bind settings from environment variables
pub mod server;
