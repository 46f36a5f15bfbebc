#![forbid(unsafe_code)]

//! Core workout engine for the Repcoach companion coach.
//!
//! This crate provides:
//! - Domain types (exercises, phases, threshold profiles)
//! - Joint angle geometry and pose frame reduction
//! - The repetition phase machine
//! - Coaching cue policy, session timing and narration
//! - Workout sessions and the workout journal

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod geometry;
pub mod pose;
pub mod tracker;
pub mod timing;
pub mod cues;
pub mod session;
pub mod narration;
pub mod journal;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use cues::{Cue, CuePolicy};
pub use journal::{JsonlJournal, SummarySink};
pub use narration::PhraseBook;
pub use pose::PoseFrame;
pub use session::{FrameOutcome, SessionRegistry, WorkoutSession, WorkoutSummary};
pub use tracker::{RepTracker, TrackerEvent};
