//! Workout sessions.
//!
//! A [`WorkoutSession`] owns one [`RepTracker`] and one [`SessionTiming`]
//! and runs the per-sample pipeline: pose frame → phase machine → cue
//! policy. All mutation goes through `&mut self`, so one session can never
//! be driven by two callers at once; independent sessions share nothing and
//! can live on different threads.

use crate::config::{Config, ThresholdConfig};
use crate::cues::{finish_cue, welcome_cue, Cue, CueInput, CuePolicy};
use crate::pose::PoseFrame;
use crate::timing::SessionTiming;
use crate::tracker::{ExerciseState, RepTracker, TrackerEvent};
use crate::{Error, ExerciseType, Phase, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Result of processing one pose frame
#[derive(Clone, Debug, PartialEq)]
pub enum FrameOutcome {
    /// The estimator found no usable body; show "no pose detected"
    NoPose { confidence: f64 },
    /// A body is visible but no workout is running
    Inactive,
    Tracked(SampleReport),
}

/// Everything the presentation layer needs after one tracked sample
#[derive(Clone, Debug, PartialEq)]
pub struct SampleReport {
    pub angle: f64,
    pub phase: Phase,
    pub rep_count: u32,
    pub target_reps: u32,
    pub feedback: String,
    pub progress: f64,
    pub events: Vec<TrackerEvent>,
    /// Rep acknowledgments always come before any idle cue
    pub cues: Vec<Cue>,
}

/// Final record of a stopped session
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkoutSummary {
    pub id: Uuid,
    pub exercise: ExerciseType,
    pub rep_count: u32,
    pub target_reps: u32,
    pub target_reached: bool,
    pub duration_secs: f64,
    pub teases: u32,
    pub finished_at: DateTime<Utc>,
}

impl WorkoutSummary {
    pub fn finish_cue(&self) -> Cue {
        finish_cue(
            self.rep_count,
            self.target_reps,
            Duration::try_from_secs_f64(self.duration_secs).unwrap_or(Duration::ZERO),
        )
    }
}

/// One workout: a phase machine plus its coaching timers
#[derive(Clone, Debug)]
pub struct WorkoutSession {
    id: Uuid,
    tracker: RepTracker,
    timing: SessionTiming,
    policy: CuePolicy,
    teases: u32,
}

impl WorkoutSession {
    /// Create an idle session with built-in thresholds and timings
    pub fn new(exercise: ExerciseType, target_reps: u32, now: Instant) -> Self {
        Self::with_settings(
            exercise,
            target_reps,
            ThresholdConfig::default(),
            CuePolicy::default(),
            now,
        )
    }

    /// Create an idle session from the workout, coaching and threshold config
    pub fn from_config(config: &Config, now: Instant) -> Self {
        Self::with_settings(
            config.workout.exercise,
            config.workout.target_reps(),
            config.thresholds.clone(),
            CuePolicy::new(&config.coaching),
            now,
        )
    }

    pub fn with_settings(
        exercise: ExerciseType,
        target_reps: u32,
        thresholds: ThresholdConfig,
        policy: CuePolicy,
        now: Instant,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            tracker: RepTracker::with_thresholds(exercise, target_reps, thresholds),
            timing: SessionTiming::new(exercise, now),
            policy,
            teases: 0,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> &ExerciseState {
        self.tracker.state()
    }

    pub fn timing(&self) -> &SessionTiming {
        &self.timing
    }

    pub fn is_active(&self) -> bool {
        self.tracker.state().is_active
    }

    pub fn progress(&self) -> f64 {
        self.tracker.progress()
    }

    pub fn duration(&self, now: Instant) -> Duration {
        self.tracker.duration(now)
    }

    /// Pick the exercise for the next `start`
    pub fn set_exercise(&mut self, exercise: ExerciseType) {
        self.tracker.set_exercise(exercise);
        self.timing.selected_exercise = exercise;
    }

    /// Pick the target for the next `start`
    pub fn set_target_reps(&mut self, target_reps: u32) {
        self.tracker.set_target_reps(target_reps);
    }

    /// Start (or restart) the workout and return the welcome cue
    pub fn start(&mut self, now: Instant) -> Vec<Cue> {
        self.tracker.start(now);
        self.timing = SessionTiming::new(self.tracker.selected_exercise(), now);
        self.teases = 0;

        let state = self.tracker.state();
        tracing::info!("Session {} started {}", self.id, state.exercise_type);
        vec![welcome_cue(state.exercise_type, state.target_reps)]
    }

    /// Stop the workout
    ///
    /// Returns the summary the first time; later calls return `None`.
    pub fn stop(&mut self, now: Instant) -> Option<WorkoutSummary> {
        if !self.is_active() {
            return None;
        }
        self.tracker.stop(now);

        let state = self.tracker.state();
        let summary = WorkoutSummary {
            id: self.id,
            exercise: state.exercise_type,
            rep_count: state.rep_count,
            target_reps: state.target_reps,
            target_reached: state.target_reached(),
            duration_secs: self.tracker.duration(now).as_secs_f64(),
            teases: self.teases,
            finished_at: Utc::now(),
        };
        tracing::info!(
            "Session {} finished: {} reps of {}",
            self.id,
            summary.rep_count,
            summary.target_reps
        );
        Some(summary)
    }

    /// Zero the counters without starting
    pub fn reset(&mut self) {
        self.tracker.reset();
    }

    /// Process one frame from the pose estimator
    pub fn process_frame(&mut self, frame: &PoseFrame, now: Instant) -> FrameOutcome {
        if !frame.valid {
            return FrameOutcome::NoPose {
                confidence: frame.confidence,
            };
        }

        let angle = frame.angle_for(self.tracker.state().exercise_type);
        match self.process_angle(angle, now) {
            Some(report) => FrameOutcome::Tracked(report),
            None => FrameOutcome::Inactive,
        }
    }

    /// Run one angle sample through the tracker and the cue policy
    ///
    /// Returns `None` when no workout is running.
    pub fn process_angle(&mut self, angle: f64, now: Instant) -> Option<SampleReport> {
        if !self.is_active() {
            return None;
        }

        let update = self.tracker.update(angle, now);
        let state = self.tracker.state();

        let cues = self.policy.select(
            CueInput {
                rep_delta: update.rep_delta,
                rep_count: state.rep_count,
                target_reps: state.target_reps,
            },
            &mut self.timing,
            now,
        );
        self.teases += cues
            .iter()
            .filter(|c| matches!(c, Cue::Tease { .. }))
            .count() as u32;

        Some(SampleReport {
            angle,
            phase: state.phase,
            rep_count: state.rep_count,
            target_reps: state.target_reps,
            feedback: state.feedback.clone(),
            progress: self.tracker.progress(),
            events: update.events,
            cues,
        })
    }
}

/// Independent sessions keyed by id
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: HashMap<Uuid, WorkoutSession>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a session and return its id
    pub fn open(&mut self, session: WorkoutSession) -> Uuid {
        let id = session.id();
        self.sessions.insert(id, session);
        tracing::debug!("Opened session {} ({} open)", id, self.sessions.len());
        id
    }

    pub fn get(&self, id: Uuid) -> Option<&WorkoutSession> {
        self.sessions.get(&id)
    }

    pub fn get_mut(&mut self, id: Uuid) -> Result<&mut WorkoutSession> {
        self.sessions
            .get_mut(&id)
            .ok_or_else(|| Error::Session(format!("no open session {}", id)))
    }

    /// Stop and discard a session, returning its summary if it was running
    pub fn close(&mut self, id: Uuid, now: Instant) -> Result<Option<WorkoutSummary>> {
        let mut session = self
            .sessions
            .remove(&id)
            .ok_or_else(|| Error::Session(format!("no open session {}", id)))?;
        tracing::debug!("Closed session {}", id);
        Ok(session.stop(now))
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
