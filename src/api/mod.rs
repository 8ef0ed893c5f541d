//! API Module
//!
//! HTTP/JSON surface over the catalog operations.
//!
//! # Endpoints
//! - `GET|POST /categories`, `GET|PATCH|DELETE /categories/:id`
//! - `GET|POST /products`, `GET /products/search?q=`, `GET|PATCH|DELETE /products/:id`
//! - `GET|POST /users`, `GET|PATCH|DELETE /users/:id`
//! - `GET /stats` - Cache counters and staleness report
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
