// Keyboard teleop: WASD keys -> bounded velocity levels -> Zenoh
pub mod config;
pub mod controller;
pub mod error;
pub mod keyboard;
pub mod messages;
pub mod publisher;
pub mod runtime;

#[cfg(test)]
mod testing;

pub use controller::{KeyOutcome, Motion, VelocityController, VelocityLevels, VelocitySink};
pub use error::TeleopError;
pub use messages::VelocityCommand;
pub use runtime::{StopReason, Teleop};
