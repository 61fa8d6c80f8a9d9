//! Database entities.

#![allow(missing_docs)]

pub mod choice;
pub mod meme;
pub mod meme_like;
pub mod poll;
pub mod student;

pub use choice::Entity as Choice;
pub use meme::Entity as Meme;
pub use meme_like::Entity as MemeLike;
pub use poll::Entity as Poll;
pub use student::Entity as Student;
