// Topics, velocity scaling, timing, and command-line configuration
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::error::TeleopError;

// Velocity scaling: published value = level * STEP
pub const STEP: f32 = 51.0;

// Levels are clamped to [-MAX_LEVEL, MAX_LEVEL]
pub const MAX_LEVEL: i32 = 5;

// Pause after a handled movement key so held keys don't flood the robot
pub const DEBOUNCE: Duration = Duration::from_millis(100);

// How long a key read waits for input before re-checking its stop flag
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

// Zenoh topics
pub const TOPIC_LINEAR_VELOCITY: &str = "velocity"; // linear level * step
pub const TOPIC_ANGULAR_VELOCITY: &str = "angular_velocity"; // angular level * step

// Ends the run loop; shutdown publishes zero velocity
pub const STOP_KEY: char = 'p';

/// Keyboard teleop: publishes linear/angular velocity levels over Zenoh
#[derive(Debug, Parser)]
#[command(name = "keyboard-velocity-teleop", version, long_about = None)]
pub struct Args {
    /// Zenoh key for linear velocity samples
    #[arg(long, default_value = TOPIC_LINEAR_VELOCITY)]
    pub linear_topic: String,

    /// Zenoh key for angular velocity samples
    #[arg(long, default_value = TOPIC_ANGULAR_VELOCITY)]
    pub angular_topic: String,

    /// Velocity units per level
    #[arg(long, default_value_t = STEP)]
    pub step: f32,

    /// Pause after each handled movement key, in milliseconds
    #[arg(long, default_value_t = DEBOUNCE.as_millis() as u64)]
    pub debounce_ms: u64,

    /// Zenoh JSON5 config file (defaults to the built-in peer config)
    #[arg(long, value_name = "PATH")]
    pub zenoh_config: Option<PathBuf>,
}

/// Validated runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub linear_topic: String,
    pub angular_topic: String,
    pub step: f32,
    pub debounce: Duration,
    pub zenoh_config: Option<PathBuf>,
}

impl TryFrom<Args> for Config {
    type Error = TeleopError;

    fn try_from(args: Args) -> Result<Self, Self::Error> {
        if !(args.step.is_finite() && args.step > 0.0) {
            return Err(TeleopError::Config(format!(
                "step must be a positive number, got {}",
                args.step
            )));
        }
        if args.linear_topic == args.angular_topic {
            return Err(TeleopError::Config(format!(
                "linear and angular topics must differ (both are '{}')",
                args.linear_topic
            )));
        }

        Ok(Self {
            linear_topic: args.linear_topic,
            angular_topic: args.angular_topic,
            step: args.step,
            debounce: Duration::from_millis(args.debounce_ms),
            zenoh_config: args.zenoh_config,
        })
    }
}

impl Config {
    /// Build the Zenoh session config, from file if one was given
    pub fn zenoh(&self) -> Result<zenoh::Config, TeleopError> {
        match &self.zenoh_config {
            Some(path) => Ok(zenoh::Config::from_file(path)?),
            None => Ok(zenoh::Config::default()),
        }
    }
}
