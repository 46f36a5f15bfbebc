//! Repetition phase machine.
//!
//! One generic machine serves every exercise type: the exercise only selects
//! a [`ThresholdProfile`]. Each angle sample advances the phase at most one
//! step around `Ready → Moving → Peak → Returning → Ready`, and a rep is
//! counted on the final step only.
//!
//! Leaving `Ready` and leaving `Peak` both require travelling a guard margin
//! past the raw threshold, while falling back into `Ready` or `Peak` only
//! requires touching it. The resulting hysteresis bands keep sensor jitter
//! near a threshold from flapping the phase or inflating the count.

use crate::config::ThresholdConfig;
use crate::{ExerciseType, Phase, ThresholdProfile};
use std::time::{Duration, Instant};

/// Remaining-rep window in which feedback switches to "only N more"
pub const CLOSING_STRETCH: u32 = 3;

/// Every this many reps gets a milestone acknowledgment
pub const MILESTONE_EVERY: u32 = 5;

/// Current state of exercise tracking
#[derive(Clone, Debug, PartialEq)]
pub struct ExerciseState {
    pub exercise_type: ExerciseType,
    pub rep_count: u32,
    pub target_reps: u32,
    pub phase: Phase,
    pub current_angle: f64,
    pub is_active: bool,
    pub started_at: Option<Instant>,
    pub last_rep_at: Option<Instant>,
    pub feedback: String,
}

impl ExerciseState {
    fn fresh(exercise_type: ExerciseType, target_reps: u32) -> Self {
        Self {
            exercise_type,
            rep_count: 0,
            target_reps,
            phase: Phase::Ready,
            current_angle: exercise_type.default_profile().rest,
            is_active: false,
            started_at: None,
            last_rep_at: None,
            feedback: "Get ready!".into(),
        }
    }

    pub fn target_reached(&self) -> bool {
        self.rep_count >= self.target_reps
    }
}

/// How a completed rep relates to the target, in priority order
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RepMilestone {
    /// At or past the target (always the case for a target of 0)
    TargetReached,
    /// Only a few reps left
    ClosingStretch { remaining: u32 },
    FirstRep,
    /// A multiple of [`MILESTONE_EVERY`]
    Milestone,
    Plain,
}

impl RepMilestone {
    /// Classify a rep count against the target
    ///
    /// The closing stretch only applies to targets longer than the stretch
    /// itself; otherwise every rep of a short set would read "only N more".
    pub fn classify(rep_count: u32, target_reps: u32) -> Self {
        if rep_count >= target_reps {
            return RepMilestone::TargetReached;
        }

        let remaining = target_reps - rep_count;
        if target_reps > CLOSING_STRETCH && remaining <= CLOSING_STRETCH {
            RepMilestone::ClosingStretch { remaining }
        } else if rep_count == 1 {
            RepMilestone::FirstRep
        } else if rep_count % MILESTONE_EVERY == 0 {
            RepMilestone::Milestone
        } else {
            RepMilestone::Plain
        }
    }

    fn feedback(&self, rep_count: u32) -> String {
        match self {
            RepMilestone::TargetReached => {
                format!("TARGET REACHED! {} reps! Amazing!", rep_count)
            }
            RepMilestone::ClosingStretch { remaining } => {
                format!("{}! Only {} more! You got this!", rep_count, remaining)
            }
            RepMilestone::FirstRep => "1! Great start! Keep it up!".into(),
            RepMilestone::Milestone => format!("{}! Keep it up! Stay strong!", rep_count),
            RepMilestone::Plain => format!("{}! Good rep!", rep_count),
        }
    }
}

/// Something that happened while processing one angle sample
#[derive(Clone, Debug, PartialEq)]
pub enum TrackerEvent {
    PhaseChanged { from: Phase, to: Phase },
    /// The movement returned to rest without reaching the peak
    RepAborted,
    RepCompleted {
        rep_count: u32,
        milestone: RepMilestone,
    },
    /// Emitted once per run, on the rep that first meets the target
    TargetReached { rep_count: u32 },
}

/// Outcome of [`RepTracker::update`]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RepUpdate {
    /// 0 or 1
    pub rep_delta: u32,
    pub events: Vec<TrackerEvent>,
}

impl RepUpdate {
    pub fn target_reached(&self) -> bool {
        self.events
            .iter()
            .any(|e| matches!(e, TrackerEvent::TargetReached { .. }))
    }
}

/// Tracks repetitions of one exercise from a stream of joint angles
#[derive(Clone, Debug)]
pub struct RepTracker {
    thresholds: ThresholdConfig,
    profile: ThresholdProfile,
    state: ExerciseState,
    selected_exercise: ExerciseType,
    selected_target: u32,
    target_announced: bool,
    stopped_at: Option<Instant>,
}

impl RepTracker {
    /// Create a tracker using the built-in thresholds
    pub fn new(exercise: ExerciseType, target_reps: u32) -> Self {
        Self::with_thresholds(exercise, target_reps, ThresholdConfig::default())
    }

    pub fn with_thresholds(
        exercise: ExerciseType,
        target_reps: u32,
        thresholds: ThresholdConfig,
    ) -> Self {
        Self {
            profile: thresholds.profile_for(exercise),
            thresholds,
            state: ExerciseState::fresh(exercise, target_reps),
            selected_exercise: exercise,
            selected_target: target_reps,
            target_announced: false,
            stopped_at: None,
        }
    }

    pub fn state(&self) -> &ExerciseState {
        &self.state
    }

    pub fn profile(&self) -> &ThresholdProfile {
        &self.profile
    }

    /// Exercise the next `start` (or `reset`) will use
    pub fn selected_exercise(&self) -> ExerciseType {
        self.selected_exercise
    }

    /// Choose the exercise for the next run; the current run is untouched
    pub fn set_exercise(&mut self, exercise: ExerciseType) {
        self.selected_exercise = exercise;
    }

    /// Choose the target for the next run; the current run is untouched
    pub fn set_target_reps(&mut self, target_reps: u32) {
        self.selected_target = target_reps;
    }

    /// Begin a fresh run, discarding any partial rep
    pub fn start(&mut self, now: Instant) {
        self.rebuild();
        self.state.is_active = true;
        self.state.started_at = Some(now);
        self.state.feedback = format!(
            "Let's go! Start your {}!",
            self.state.exercise_type.display_name()
        );
        tracing::info!(
            "Started {} with target {}",
            self.state.exercise_type,
            self.state.target_reps
        );
    }

    /// Stop counting; counts are kept for reporting. Safe to call repeatedly.
    pub fn stop(&mut self, now: Instant) {
        if !self.state.is_active {
            return;
        }

        self.state.is_active = false;
        self.stopped_at = Some(now);
        let duration = self.duration(now);
        self.state.feedback = format!(
            "Great workout! {} reps in {:.0}s",
            self.state.rep_count,
            duration.as_secs_f64()
        );
        tracing::info!(
            "Stopped {} after {} reps ({:.1}s)",
            self.state.exercise_type,
            self.state.rep_count,
            duration.as_secs_f64()
        );
    }

    /// Zero the state without starting a run
    pub fn reset(&mut self) {
        self.rebuild();
    }

    fn rebuild(&mut self) {
        self.profile = self.thresholds.profile_for(self.selected_exercise);
        self.state = ExerciseState::fresh(self.selected_exercise, self.selected_target);
        self.state.current_angle = self.profile.rest;
        self.target_announced = false;
        self.stopped_at = None;
    }

    /// Feed one angle sample
    ///
    /// Inactive trackers and non-finite angles leave the state untouched.
    pub fn update(&mut self, angle: f64, now: Instant) -> RepUpdate {
        let mut update = RepUpdate::default();
        if !self.state.is_active {
            return update;
        }
        if !angle.is_finite() {
            tracing::debug!("Ignoring non-finite angle sample");
            return update;
        }

        self.state.current_angle = angle;

        let travel = self.profile.travel(angle);
        let span = self.profile.span();
        let from = self.state.phase;

        let to = match from {
            Phase::Ready if travel > self.profile.start_margin => Phase::Moving,
            Phase::Moving if travel >= span => Phase::Peak,
            Phase::Moving if travel <= 0.0 => Phase::Ready,
            Phase::Peak if travel < span - self.profile.release_margin => Phase::Returning,
            Phase::Returning if travel <= 0.0 => Phase::Ready,
            Phase::Returning if travel >= span => Phase::Peak,
            _ => return update,
        };

        self.state.phase = to;
        update.events.push(TrackerEvent::PhaseChanged { from, to });
        tracing::debug!("{}: {} -> {} at {:.1}°", self.state.exercise_type, from, to, angle);

        match (from, to) {
            (Phase::Returning, Phase::Ready) => self.complete_rep(now, &mut update),
            (Phase::Moving, Phase::Ready) => {
                update.events.push(TrackerEvent::RepAborted);
                self.state.feedback = phase_feedback(self.state.exercise_type, to, true).into();
            }
            _ => {
                self.state.feedback = phase_feedback(self.state.exercise_type, to, false).into();
            }
        }

        update
    }

    fn complete_rep(&mut self, now: Instant, update: &mut RepUpdate) {
        self.state.rep_count += 1;
        self.state.last_rep_at = Some(now);

        let rep_count = self.state.rep_count;
        let milestone = RepMilestone::classify(rep_count, self.state.target_reps);
        self.state.feedback = milestone.feedback(rep_count);

        update.rep_delta = 1;
        update.events.push(TrackerEvent::RepCompleted {
            rep_count,
            milestone,
        });
        tracing::info!("Rep {} of {}", rep_count, self.state.target_reps);

        if self.state.target_reached() && !self.target_announced {
            self.target_announced = true;
            update.events.push(TrackerEvent::TargetReached { rep_count });
            tracing::info!("Target of {} reached", self.state.target_reps);
        }
    }

    /// Progress toward the target as a percentage in [0, 100]
    pub fn progress(&self) -> f64 {
        if self.state.target_reps == 0 {
            return 100.0;
        }
        (100.0 * self.state.rep_count as f64 / self.state.target_reps as f64).min(100.0)
    }

    /// Time since `start`, frozen once stopped; zero if never started
    pub fn duration(&self, now: Instant) -> Duration {
        match self.state.started_at {
            Some(started) => self.stopped_at.unwrap_or(now).saturating_duration_since(started),
            None => Duration::ZERO,
        }
    }
}

/// Status line shown after entering a phase
fn phase_feedback(exercise: ExerciseType, phase: Phase, aborted: bool) -> &'static str {
    match (exercise, phase, aborted) {
        (ExerciseType::Squat, Phase::Ready, true) => "Go deeper! Aim for parallel.",
        (ExerciseType::Squat, Phase::Moving, _) => "Going down... keep going!",
        (ExerciseType::Squat, Phase::Peak, _) => "Great depth! Now push up!",
        (ExerciseType::Squat, Phase::Returning, _) => "Push! Push! Almost there!",

        (ExerciseType::ArmRaise, Phase::Ready, true) => "Raise them higher! All the way up.",
        (ExerciseType::ArmRaise, Phase::Moving, _) => "Arms going up... reach!",
        (ExerciseType::ArmRaise, Phase::Peak, _) => "Reach for the sky! Now lower.",
        (ExerciseType::ArmRaise, Phase::Returning, _) => "Lower with control!",

        (ExerciseType::JumpingJack, Phase::Ready, true) => "Open wider! Make a big star.",
        (ExerciseType::JumpingJack, Phase::Moving, _) => "Jump out!",
        (ExerciseType::JumpingJack, Phase::Peak, _) => "Full star! Now back in!",
        (ExerciseType::JumpingJack, Phase::Returning, _) => "Bring it back in!",

        (_, Phase::Ready, _) => "Ready!",
    }
}
