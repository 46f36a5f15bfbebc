//! Configuration file support for Repcoach.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/repcoach/config.toml`.

use crate::{Error, ExerciseType, Result, ThresholdProfile};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub workout: WorkoutConfig,

    #[serde(default)]
    pub coaching: CoachingConfig,

    #[serde(default)]
    pub thresholds: ThresholdConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Default workout selection
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkoutConfig {
    #[serde(default)]
    pub exercise: ExerciseType,

    /// Zero or negative means every run counts as complete
    #[serde(default = "default_target_reps")]
    pub target_reps: i32,
}

impl Default for WorkoutConfig {
    fn default() -> Self {
        Self {
            exercise: ExerciseType::default(),
            target_reps: default_target_reps(),
        }
    }
}

impl WorkoutConfig {
    /// Target with negative values coerced to zero
    pub fn target_reps(&self) -> u32 {
        self.target_reps.max(0) as u32
    }
}

/// Idle and encouragement timing for the cue policy
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CoachingConfig {
    /// Seconds without a rep before the user counts as idle
    #[serde(default = "default_idle_threshold")]
    pub idle_threshold_secs: f64,

    /// Minimum seconds between two teases
    #[serde(default = "default_tease_cooldown")]
    pub tease_cooldown_secs: f64,

    /// Minimum seconds between two encouragements
    #[serde(default = "default_encouragement_interval")]
    pub encouragement_interval_secs: f64,
}

impl Default for CoachingConfig {
    fn default() -> Self {
        Self {
            idle_threshold_secs: default_idle_threshold(),
            tease_cooldown_secs: default_tease_cooldown(),
            encouragement_interval_secs: default_encouragement_interval(),
        }
    }
}

impl CoachingConfig {
    pub fn idle_threshold(&self) -> Duration {
        secs(self.idle_threshold_secs)
    }

    pub fn tease_cooldown(&self) -> Duration {
        secs(self.tease_cooldown_secs)
    }

    pub fn encouragement_interval(&self) -> Duration {
        secs(self.encouragement_interval_secs)
    }
}

/// Unrepresentable values (negative, NaN) collapse to zero
fn secs(value: f64) -> Duration {
    Duration::try_from_secs_f64(value).unwrap_or(Duration::ZERO)
}

/// Per-exercise threshold overrides
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ThresholdConfig {
    #[serde(default = "default_squat_profile")]
    pub squat: ThresholdProfile,

    #[serde(default = "default_arm_raise_profile")]
    pub arm_raise: ThresholdProfile,

    #[serde(default = "default_jumping_jack_profile")]
    pub jumping_jack: ThresholdProfile,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            squat: default_squat_profile(),
            arm_raise: default_arm_raise_profile(),
            jumping_jack: default_jumping_jack_profile(),
        }
    }
}

impl ThresholdConfig {
    pub fn profile_for(&self, exercise: ExerciseType) -> ThresholdProfile {
        match exercise {
            ExerciseType::Squat => self.squat,
            ExerciseType::ArmRaise => self.arm_raise,
            ExerciseType::JumpingJack => self.jumping_jack,
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        std::env::var("HOME")
            .map(|home| PathBuf::from(home).join(".local/share"))
            .unwrap_or_else(|_| PathBuf::from("."))
    });
    base.join("repcoach")
}

fn default_target_reps() -> i32 {
    10
}

fn default_idle_threshold() -> f64 {
    8.0
}

fn default_tease_cooldown() -> f64 {
    10.0
}

fn default_encouragement_interval() -> f64 {
    20.0
}

fn default_squat_profile() -> ThresholdProfile {
    ExerciseType::Squat.default_profile()
}

fn default_arm_raise_profile() -> ThresholdProfile {
    ExerciseType::ArmRaise.default_profile()
}

fn default_jumping_jack_profile() -> ThresholdProfile {
    ExerciseType::JumpingJack.default_profile()
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            std::env::var("HOME")
                .map(|home| PathBuf::from(home).join(".config"))
                .unwrap_or_else(|_| PathBuf::from("."))
        });
        base.join("repcoach").join("config.toml")
    }

    /// Reject thresholds and timings the engine cannot work with
    pub fn validate(&self) -> Result<()> {
        for exercise in ExerciseType::ALL {
            self.thresholds
                .profile_for(exercise)
                .validate()
                .map_err(|e| Error::Config(format!("thresholds.{}: {}", exercise, e)))?;
        }

        let timings = [
            ("idle_threshold_secs", self.coaching.idle_threshold_secs),
            ("tease_cooldown_secs", self.coaching.tease_cooldown_secs),
            (
                "encouragement_interval_secs",
                self.coaching.encouragement_interval_secs,
            ),
        ];
        for (name, secs) in timings {
            if !secs.is_finite() || secs <= 0.0 {
                return Err(Error::Config(format!(
                    "coaching.{} must be a positive number of seconds, got {}",
                    name, secs
                )));
            }
        }

        Ok(())
    }

    /// Save the current configuration to the default path
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path();
        self.save_to(&config_path)
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}
