//! Core business logic for schoolboard.

pub mod services;

pub use services::*;
