//! Pose frames: the per-frame input contract from the pose estimator.
//!
//! The estimator either hands over a ready [`PoseFrame`] or raw body
//! landmarks, which [`PoseFrame::from_landmarks`] reduces to the knee and
//! shoulder-torso angles the tracker consumes.

use crate::geometry::{angle_at, Point};
use crate::{ExerciseType, Signal};
use serde::{Deserialize, Serialize};

/// Average visibility a limb needs before its angle is trusted
pub const MIN_VISIBILITY: f64 = 0.1;

/// Knee angle reported when no leg could be measured (standing straight)
const DEFAULT_KNEE_ANGLE: f64 = 180.0;

/// Shoulder angle reported when no arm could be measured (arms down)
const DEFAULT_SHOULDER_ANGLE: f64 = 0.0;

/// One frame's worth of pose information
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PoseFrame {
    pub valid: bool,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default = "default_knee_angle")]
    pub knee_angle: f64,
    #[serde(default)]
    pub shoulder_angle: f64,
}

fn default_knee_angle() -> f64 {
    DEFAULT_KNEE_ANGLE
}

impl PoseFrame {
    /// A frame in which no body was found
    pub fn missing(confidence: f64) -> Self {
        Self {
            valid: false,
            confidence,
            knee_angle: DEFAULT_KNEE_ANGLE,
            shoulder_angle: DEFAULT_SHOULDER_ANGLE,
        }
    }

    /// The angle the given exercise is tracked by
    pub fn angle_for(&self, exercise: ExerciseType) -> f64 {
        match exercise.signal() {
            Signal::Knee => self.knee_angle,
            Signal::ShoulderTorso => self.shoulder_angle,
        }
    }

    /// Reduce raw landmarks to a frame
    ///
    /// One visible leg is enough. If neither leg reaches [`MIN_VISIBILITY`]
    /// but some landmark data exists, the more visible leg is used anyway;
    /// with no leg data at all the frame is invalid.
    pub fn from_landmarks(body: &BodyLandmarks) -> Self {
        let left_leg = body.left.leg_visibility();
        let right_leg = body.right.leg_visibility();

        let (mut use_left, mut use_right) =
            (left_leg >= MIN_VISIBILITY, right_leg >= MIN_VISIBILITY);

        if !use_left && !use_right {
            if left_leg > 0.0 || right_leg > 0.0 {
                use_left = left_leg >= right_leg;
                use_right = !use_left;
            } else {
                return Self::missing(left_leg.max(right_leg));
            }
        }

        let knee_angle = average(
            use_left.then(|| body.left.knee_angle()),
            use_right.then(|| body.right.knee_angle()),
        )
        .unwrap_or(DEFAULT_KNEE_ANGLE);

        let left_arm = body.left.arm_visibility();
        let right_arm = body.right.arm_visibility();

        let shoulder_angle = average(
            (left_arm >= MIN_VISIBILITY).then(|| body.left.shoulder_angle()),
            (right_arm >= MIN_VISIBILITY).then(|| body.right.shoulder_angle()),
        )
        .unwrap_or(DEFAULT_SHOULDER_ANGLE);

        Self {
            valid: true,
            confidence: left_leg.max(right_leg).max(left_arm).max(right_arm),
            knee_angle,
            shoulder_angle,
        }
    }
}

fn average(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    match (a, b) {
        (Some(a), Some(b)) => Some((a + b) / 2.0),
        (Some(v), None) | (None, Some(v)) => Some(v),
        (None, None) => None,
    }
}

/// A detected body landmark with the estimator's visibility score
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub visibility: f64,
}

impl Landmark {
    pub fn new(x: f64, y: f64, visibility: f64) -> Self {
        Self { x, y, visibility }
    }

    fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Landmarks for one side of the body
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct SideLandmarks {
    pub shoulder: Landmark,
    pub elbow: Landmark,
    pub hip: Landmark,
    pub knee: Landmark,
    pub ankle: Landmark,
}

impl SideLandmarks {
    fn leg_visibility(&self) -> f64 {
        (self.hip.visibility + self.knee.visibility + self.ankle.visibility) / 3.0
    }

    fn arm_visibility(&self) -> f64 {
        (self.shoulder.visibility + self.elbow.visibility + self.hip.visibility) / 3.0
    }

    fn knee_angle(&self) -> f64 {
        angle_at(self.hip.point(), self.knee.point(), self.ankle.point())
    }

    fn shoulder_angle(&self) -> f64 {
        angle_at(self.hip.point(), self.shoulder.point(), self.elbow.point())
    }
}

/// The landmarks needed for knee and shoulder-torso angles
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct BodyLandmarks {
    pub left: SideLandmarks,
    pub right: SideLandmarks,
}
