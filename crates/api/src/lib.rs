//! HTTP API layer for schoolboard.
//!
//! This crate provides the JSON API:
//!
//! - **Endpoints**: students, admin check, photo polls and the meme board
//! - **Extractors**: admin passphrase check, query parameters, multipart uploads
//! - **Middleware**: shared application state
//!
//! Built on Axum 0.8. Scalar inputs travel as query parameters and files as
//! multipart fields.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
pub use middleware::AppState;
