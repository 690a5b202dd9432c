// Message types published by the teleop

use serde::{Deserialize, Serialize};

/// Single scalar sample, one per topic
// Same shape as std_msgs/Float32 so bridges can map it 1:1
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Float32 {
    pub data: f32,
}

impl From<f32> for Float32 {
    fn from(data: f32) -> Self {
        Self { data }
    }
}

/// A (linear, angular) velocity pair, emitted as two separate samples
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VelocityCommand {
    pub linear: f32,
    pub angular: f32,
}

impl VelocityCommand {
    pub fn new(linear: f32, angular: f32) -> Self {
        Self { linear, angular }
    }

    /// Stop the robot on both axes
    pub fn zero() -> Self {
        Self::default()
    }

    /// Scale integer levels into physical velocity units
    pub fn from_levels(linear_level: i32, angular_level: i32, step: f32) -> Self {
        Self {
            linear: linear_level as f32 * step,
            angular: angular_level as f32 * step,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.linear == 0.0 && self.angular == 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float32_wire_format() {
        let json = serde_json::to_string(&Float32::from(153.0)).unwrap();
        assert_eq!(json, r#"{"data":153.0}"#);

        let parsed: Float32 = serde_json::from_str(r#"{"data":-51.0}"#).unwrap();
        assert_eq!(parsed.data, -51.0);
    }

    #[test]
    fn test_from_levels() {
        let cmd = VelocityCommand::from_levels(3, 0, 51.0);
        assert_eq!(cmd, VelocityCommand::new(153.0, 0.0));

        let cmd = VelocityCommand::from_levels(0, -5, 51.0);
        assert_eq!(cmd, VelocityCommand::new(0.0, -255.0));
    }

    #[test]
    fn test_zero() {
        assert!(VelocityCommand::zero().is_zero());
        assert!(VelocityCommand::from_levels(0, 0, 51.0).is_zero());
        assert!(!VelocityCommand::from_levels(1, 0, 51.0).is_zero());
    }
}
