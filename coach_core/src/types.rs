//! Core domain types for the Repcoach system.
//!
//! This module defines the fundamental types shared by the tracker,
//! the cue policy and the session layer:
//! - Exercise types and the angle signal each one reads
//! - The four-state repetition phase
//! - Per-exercise threshold profiles

use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Exercise Types
// ============================================================================

/// Movement pattern being tracked
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseType {
    #[default]
    Squat,
    ArmRaise,
    JumpingJack,
}

/// Which joint angle an exercise is measured by
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Signal {
    /// Hip-knee-ankle angle
    Knee,
    /// Hip-shoulder-elbow angle
    ShoulderTorso,
}

impl ExerciseType {
    pub const ALL: [ExerciseType; 3] = [
        ExerciseType::Squat,
        ExerciseType::ArmRaise,
        ExerciseType::JumpingJack,
    ];

    /// Stable identifier used in config files and the journal
    pub fn id(&self) -> &'static str {
        match self {
            ExerciseType::Squat => "squat",
            ExerciseType::ArmRaise => "arm_raise",
            ExerciseType::JumpingJack => "jumping_jack",
        }
    }

    /// Human-readable plural name ("squats", "arm raises", ...)
    pub fn display_name(&self) -> &'static str {
        match self {
            ExerciseType::Squat => "squats",
            ExerciseType::ArmRaise => "arm raises",
            ExerciseType::JumpingJack => "jumping jacks",
        }
    }

    pub fn signal(&self) -> Signal {
        match self {
            ExerciseType::Squat => Signal::Knee,
            ExerciseType::ArmRaise | ExerciseType::JumpingJack => Signal::ShoulderTorso,
        }
    }

    /// Built-in thresholds; overridable through `[thresholds.*]` in the config
    pub fn default_profile(&self) -> ThresholdProfile {
        match self {
            ExerciseType::Squat => ThresholdProfile {
                rest: 160.0,
                peak: 120.0,
                start_margin: 5.0,
                release_margin: 10.0,
            },
            ExerciseType::ArmRaise => ThresholdProfile {
                rest: 50.0,
                peak: 150.0,
                start_margin: 30.0,
                release_margin: 20.0,
            },
            ExerciseType::JumpingJack => ThresholdProfile {
                rest: 40.0,
                peak: 120.0,
                start_margin: 20.0,
                release_margin: 20.0,
            },
        }
    }

    /// Words that identify this exercise in free text such as a speech transcript
    fn keywords(&self) -> &'static [&'static str] {
        match self {
            ExerciseType::Squat => &["squat", "squats", "squad", "squot", "legs", "leg"],
            ExerciseType::ArmRaise => {
                &["arm", "arms", "raise", "raises", "raised", "up", "reach", "sky"]
            }
            ExerciseType::JumpingJack => &["jump", "jumping", "jacks", "jack", "star", "cardio"],
        }
    }
}

impl fmt::Display for ExerciseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.id())
    }
}

impl FromStr for ExerciseType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "squat" | "squats" => Ok(ExerciseType::Squat),
            "arm_raise" | "arm_raises" => Ok(ExerciseType::ArmRaise),
            "jumping_jack" | "jumping_jacks" => Ok(ExerciseType::JumpingJack),
            _ => Err(Error::UnknownExercise(s.to_string())),
        }
    }
}

/// Match free text (e.g. "let's do some jumping jacks") to an exercise
///
/// Each exercise scores one point per keyword contained in the lower-cased
/// text. The highest score wins; ties go to the earlier exercise in
/// [`ExerciseType::ALL`]. Returns `None` when nothing matches.
pub fn match_exercise(text: &str) -> Option<ExerciseType> {
    let text = text.to_lowercase();
    if text.trim().is_empty() {
        return None;
    }

    let mut best: Option<(ExerciseType, usize)> = None;
    for exercise in ExerciseType::ALL {
        let score = exercise
            .keywords()
            .iter()
            .filter(|kw| text.contains(*kw))
            .count();
        if score == 0 {
            continue;
        }
        match best {
            Some((_, top)) if top >= score => {}
            _ => best = Some((exercise, score)),
        }
    }

    best.map(|(exercise, _)| exercise)
}

// ============================================================================
// Phase and Thresholds
// ============================================================================

/// Position within one repetition's movement cycle
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Ready,
    Moving,
    Peak,
    Returning,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Ready => "ready",
            Phase::Moving => "moving",
            Phase::Peak => "peak",
            Phase::Returning => "returning",
        };
        f.pad(s)
    }
}

/// Rest/peak thresholds and guard margins for one exercise, in degrees
///
/// Whether the rest position is the high or the low angle follows from the
/// ordering of `rest` and `peak`: squats rest at a straight knee (high),
/// arm raises and jumping jacks rest with arms down (low).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct ThresholdProfile {
    pub rest: f64,
    pub peak: f64,
    /// Distance past `rest` required to leave `Ready`
    pub start_margin: f64,
    /// Distance back from `peak` required to leave `Peak`
    pub release_margin: f64,
}

impl ThresholdProfile {
    fn direction(&self) -> f64 {
        if self.peak >= self.rest {
            1.0
        } else {
            -1.0
        }
    }

    /// Distance of `angle` from rest, measured toward the peak
    ///
    /// Negative values lie beyond rest on the far side from the peak.
    pub fn travel(&self, angle: f64) -> f64 {
        (angle - self.rest) * self.direction()
    }

    /// Distance from rest to peak
    pub fn span(&self) -> f64 {
        (self.peak - self.rest).abs()
    }

    /// Check that the profile describes a usable hysteresis band
    pub fn validate(&self) -> Result<(), String> {
        if !self.rest.is_finite() || !self.peak.is_finite() {
            return Err("rest and peak must be finite".into());
        }
        if self.span() <= 0.0 {
            return Err(format!("rest and peak must differ (both {})", self.rest));
        }
        if !self.start_margin.is_finite() || !self.release_margin.is_finite() {
            return Err("margins must be finite".into());
        }
        if self.start_margin < 0.0 || self.release_margin < 0.0 {
            return Err("margins must not be negative".into());
        }
        if self.start_margin >= self.span() {
            return Err(format!(
                "start_margin {} does not fit in the {}° rest-peak span",
                self.start_margin,
                self.span()
            ));
        }
        if self.release_margin >= self.span() {
            return Err(format!(
                "release_margin {} does not fit in the {}° rest-peak span",
                self.release_margin,
                self.span()
            ));
        }
        Ok(())
    }
}
