//! Business logic services.

#![allow(missing_docs)]

pub mod admin;
pub mod meme;
pub mod poll;
pub mod student;
pub mod upload;

pub use admin::{AdminGate, hash_passphrase};
pub use meme::{CreateMemeInput, LikeStatus, MemeService, MemeSummary};
pub use poll::{CreatePollInput, PollService, PollSummary};
pub use student::{ProfileVote, StudentInput, StudentProfile, StudentService};
pub use upload::{MEME_EXTENSIONS, PHOTO_EXTENSIONS, PlannedUpload, UploadService};
