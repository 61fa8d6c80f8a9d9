//! Common utilities and shared types for schoolboard.
//!
//! This crate provides foundational components used across all schoolboard crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **Storage**: Content storage backends and upload naming
//!
//! # Example
//!
//! ```no_run
//! use schoolboard_common::{AppResult, Config, LocalStorage};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let storage = LocalStorage::from_config(&config.storage);
//!     println!("Serving uploads from {}", config.storage.base_url);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod storage;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use storage::{
    LocalStorage, StorageBackend, StoredFile, UploadedFile, build_storage_key,
    resolve_extension, sanitize_prefix,
};
