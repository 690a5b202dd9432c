// Key -> velocity level state machine
//
// Each movement key nudges one axis by one level and zeroes the other axis.
// Levels are clamped to [-MAX_LEVEL, MAX_LEVEL] and scaled by the step before
// being published on the linear/angular channels.

use std::future::Future;

use tracing::{debug, info};

use crate::config::MAX_LEVEL;
use crate::error::Result;
use crate::messages::VelocityCommand;

/// Outbound side of the controller: wherever velocity pairs go
pub trait VelocitySink {
    /// Send one (linear, angular) pair. Fire-and-forget, no retries.
    fn publish(&self, cmd: VelocityCommand) -> impl Future<Output = Result<()>>;

    /// Give back the underlying channels. Nothing is published afterwards.
    fn release(&mut self) -> impl Future<Output = Result<()>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Linear,
    Angular,
}

/// Recognized movement keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Forward,   // w
    Backward,  // s
    TurnLeft,  // a
    TurnRight, // d
}

impl Motion {
    /// Map a lowercased key to a motion, if it is one
    pub fn from_key(key: char) -> Option<Self> {
        match key {
            'w' => Some(Self::Forward),
            's' => Some(Self::Backward),
            'a' => Some(Self::TurnLeft),
            'd' => Some(Self::TurnRight),
            _ => None,
        }
    }

    pub fn key(self) -> char {
        match self {
            Self::Forward => 'w',
            Self::Backward => 's',
            Self::TurnLeft => 'a',
            Self::TurnRight => 'd',
        }
    }

    pub fn axis(self) -> Axis {
        match self {
            Self::Forward | Self::Backward => Axis::Linear,
            Self::TurnLeft | Self::TurnRight => Axis::Angular,
        }
    }
}

/// Current integer levels for both axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VelocityLevels {
    pub linear: i32,
    pub angular: i32,
}

impl VelocityLevels {
    pub fn new(linear: i32, angular: i32) -> Self {
        Self { linear, angular }
    }

    /// Clear the level of the axis being switched to when the previous motion
    /// was on the other axis. Repeats on the same axis leave levels untouched.
    pub fn reset_on_axis_switch(&mut self, prev: Option<Motion>, next: Motion) {
        match (prev.map(Motion::axis), next.axis()) {
            (Some(Axis::Linear), Axis::Angular) => self.angular = 0,
            (Some(Axis::Angular), Axis::Linear) => self.linear = 0,
            _ => {}
        }
    }

    /// Move one level in the motion's direction and zero the orthogonal axis
    pub fn apply(&mut self, motion: Motion) {
        match motion {
            Motion::Forward => {
                self.linear = (self.linear + 1).min(MAX_LEVEL);
                self.angular = 0;
            }
            Motion::Backward => {
                self.linear = (self.linear - 1).max(-MAX_LEVEL);
                self.angular = 0;
            }
            Motion::TurnLeft => {
                self.angular = (self.angular - 1).max(-MAX_LEVEL);
                self.linear = 0;
            }
            Motion::TurnRight => {
                self.angular = (self.angular + 1).min(MAX_LEVEL);
                self.linear = 0;
            }
        }
    }

    /// Full transition for one key: axis-switch reset, then the level update
    pub fn step(&mut self, prev: Option<Motion>, motion: Motion) {
        self.reset_on_axis_switch(prev, motion);
        self.apply(motion);
    }
}

/// Result of handing one key to the controller
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeyOutcome {
    /// Levels changed and this command was published
    Moved(VelocityCommand),
    /// Not a movement key; nothing changed, nothing published
    Ignored,
}

/// Owns the level state and the outbound sink
pub struct VelocityController<S> {
    sink: S,
    levels: VelocityLevels,
    prev: Option<Motion>,
    step: f32,
}

impl<S: VelocitySink> VelocityController<S> {
    pub fn new(sink: S, step: f32) -> Self {
        Self {
            sink,
            levels: VelocityLevels::default(),
            prev: None,
            step,
        }
    }

    pub fn levels(&self) -> VelocityLevels {
        self.levels
    }

    /// Last handled movement, used to detect axis switches
    pub fn prev_motion(&self) -> Option<Motion> {
        self.prev
    }

    /// Command for the current levels
    pub fn command(&self) -> VelocityCommand {
        VelocityCommand::from_levels(self.levels.linear, self.levels.angular, self.step)
    }

    /// Apply a lowercased key. Movement keys update levels and publish;
    /// anything else is ignored without touching state.
    pub async fn handle_key(&mut self, key: char) -> Result<KeyOutcome> {
        let Some(motion) = Motion::from_key(key) else {
            debug!("Ignoring key {:?}", key);
            return Ok(KeyOutcome::Ignored);
        };

        self.levels.step(self.prev, motion);
        self.prev = Some(motion);

        let cmd = self.command();
        self.sink.publish(cmd).await?;

        info!(
            "[KEY:{}] Linear: {} | Angular: {}",
            motion.key(),
            cmd.linear,
            cmd.angular
        );
        Ok(KeyOutcome::Moved(cmd))
    }

    /// Publish zero on both channels, whatever the current levels are
    pub async fn publish_zero(&self) -> Result<()> {
        self.sink.publish(VelocityCommand::zero()).await
    }

    pub async fn release(&mut self) -> Result<()> {
        self.sink.release().await
    }
}
