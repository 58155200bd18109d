//! API Module
//!
//! HTTP handlers and routing for the cache inspection API.
//!
//! # Endpoints
//! - `PUT /cache/:tier` - Store a value
//! - `GET /cache/:tier/:key` - Retrieve a value
//! - `GET /cache/:tier/:key/exists` - Existence check
//! - `DELETE /cache/:tier/:key` - Delete a key
//! - `DELETE /cache/:tier`, `DELETE /cache` - Clear one or all tiers
//! - `GET /stats` - Cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
