//! API middleware.

#![allow(missing_docs)]

use schoolboard_core::{AdminGate, MemeService, PollService, StudentService};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub student_service: StudentService,
    pub poll_service: PollService,
    pub meme_service: MemeService,
    pub admin_gate: AdminGate,
}
