//! Coaching cue policy.
//!
//! Decides, once per processed angle sample, whether the coach should
//! acknowledge a rep, tease an idle user or offer encouragement. Cues are
//! categories with their interpolation values; turning them into speech or
//! gestures is left to the presentation layer.
//!
//! Decision order for one sample:
//! 1. A rep completed: optional re-engagement cue (if the user was teased),
//!    then the rep acknowledgment. Idle timers reset.
//! 2. Idle longer than the idle threshold and the tease cooldown expired: tease.
//! 3. Not idle and the encouragement interval expired: encourage.
//! 4. Nothing.

use crate::config::CoachingConfig;
use crate::timing::SessionTiming;
use crate::tracker::RepMilestone;
use crate::ExerciseType;
use std::time::{Duration, Instant};

/// A coaching prompt selected for external rendering
#[derive(Clone, Debug, PartialEq)]
pub enum Cue {
    Welcome {
        exercise: ExerciseType,
        target_reps: u32,
    },
    /// The user moved again after being teased
    ReEngage,
    RepAck {
        rep_count: u32,
        target_reps: u32,
        milestone: RepMilestone,
    },
    Tease {
        idle_count: u32,
    },
    Encourage,
    Finish {
        rep_count: u32,
        duration: Duration,
        target_reached: bool,
    },
}

/// What the phase machine reported for the current sample
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CueInput {
    pub rep_delta: u32,
    pub rep_count: u32,
    pub target_reps: u32,
}

/// Timing thresholds for idle and encouragement cues
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CuePolicy {
    pub idle_threshold: Duration,
    pub tease_cooldown: Duration,
    pub encouragement_interval: Duration,
}

impl Default for CuePolicy {
    fn default() -> Self {
        Self::new(&CoachingConfig::default())
    }
}

impl CuePolicy {
    pub fn new(config: &CoachingConfig) -> Self {
        Self {
            idle_threshold: config.idle_threshold(),
            tease_cooldown: config.tease_cooldown(),
            encouragement_interval: config.encouragement_interval(),
        }
    }

    /// Select the cues for one sample and update the session timers
    ///
    /// Returns nothing, a single idle cue, or a rep acknowledgment optionally
    /// preceded by [`Cue::ReEngage`]. Rep acks, teases and encouragements are
    /// mutually exclusive within one call.
    pub fn select(&self, input: CueInput, timing: &mut SessionTiming, now: Instant) -> Vec<Cue> {
        if input.rep_delta > 0 {
            let mut cues = Vec::with_capacity(2);
            if timing.was_teased {
                cues.push(Cue::ReEngage);
            }
            cues.push(Cue::RepAck {
                rep_count: input.rep_count,
                target_reps: input.target_reps,
                milestone: RepMilestone::classify(input.rep_count, input.target_reps),
            });

            timing.was_teased = false;
            timing.idle_count = 0;
            timing.last_rep_time = now;
            timing.last_encourage_time = now;
            return cues;
        }

        let since_rep = timing.since_rep(now);

        if since_rep > self.idle_threshold && timing.since_tease(now) > self.tease_cooldown {
            timing.was_teased = true;
            timing.idle_count += 1;
            timing.last_tease_time = now;
            tracing::debug!(
                "Idle for {:.1}s, teasing (#{})",
                since_rep.as_secs_f64(),
                timing.idle_count
            );
            return vec![Cue::Tease {
                idle_count: timing.idle_count,
            }];
        }

        if since_rep < self.idle_threshold
            && timing.since_encouragement(now) > self.encouragement_interval
        {
            timing.last_encourage_time = now;
            return vec![Cue::Encourage];
        }

        Vec::new()
    }
}

/// Cue played when a session starts
pub fn welcome_cue(exercise: ExerciseType, target_reps: u32) -> Cue {
    Cue::Welcome {
        exercise,
        target_reps,
    }
}

/// Cue played when a session stops
pub fn finish_cue(rep_count: u32, target_reps: u32, duration: Duration) -> Cue {
    Cue::Finish {
        rep_count,
        duration,
        target_reached: rep_count >= target_reps,
    }
}
