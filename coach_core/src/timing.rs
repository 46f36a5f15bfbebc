//! Per-session coaching timers.
//!
//! Plain storage: the cue policy in [`crate::cues`] is the only writer.

use crate::ExerciseType;
use std::time::{Duration, Instant};

/// Timestamps and flags the cue policy consults between samples
#[derive(Clone, Debug, PartialEq)]
pub struct SessionTiming {
    pub last_rep_time: Instant,
    pub last_encourage_time: Instant,
    pub last_tease_time: Instant,
    pub was_teased: bool,
    pub idle_count: u32,
    pub selected_exercise: ExerciseType,
}

impl SessionTiming {
    /// All timers start at the session start instant
    pub fn new(exercise: ExerciseType, now: Instant) -> Self {
        Self {
            last_rep_time: now,
            last_encourage_time: now,
            last_tease_time: now,
            was_teased: false,
            idle_count: 0,
            selected_exercise: exercise,
        }
    }

    pub fn since_rep(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.last_rep_time)
    }

    pub fn since_tease(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.last_tease_time)
    }

    pub fn since_encouragement(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.last_encourage_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_timing() {
        let now = Instant::now();
        let timing = SessionTiming::new(ExerciseType::JumpingJack, now);

        assert_eq!(timing.last_rep_time, now);
        assert_eq!(timing.last_tease_time, now);
        assert_eq!(timing.last_encourage_time, now);
        assert!(!timing.was_teased);
        assert_eq!(timing.idle_count, 0);
        assert_eq!(timing.selected_exercise, ExerciseType::JumpingJack);
    }

    #[test]
    fn test_elapsed_never_negative() {
        let now = Instant::now();
        let timing = SessionTiming::new(ExerciseType::Squat, now + Duration::from_secs(5));

        assert_eq!(timing.since_rep(now), Duration::ZERO);
        assert_eq!(timing.since_tease(now), Duration::ZERO);
        assert_eq!(timing.since_encouragement(now), Duration::ZERO);
        assert_eq!(
            timing.since_rep(now + Duration::from_secs(7)),
            Duration::from_secs(2)
        );
    }
}
