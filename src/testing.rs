// In-memory sinks used by unit tests in place of the Zenoh publishers

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::controller::VelocitySink;
use crate::error::{Result, TeleopError};
use crate::messages::VelocityCommand;
use crate::publisher::ScalarChannel;

#[derive(Debug, Clone, Default)]
pub(crate) struct RecordingSink {
    sent: Arc<Mutex<Vec<VelocityCommand>>>,
    attempts: Arc<Mutex<usize>>,
    released: Arc<AtomicBool>,
    fail: bool,
}

impl RecordingSink {
    /// A sink whose every publish fails like an unreachable transport
    pub(crate) fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Commands that were delivered
    pub(crate) fn sent(&self) -> Vec<VelocityCommand> {
        self.sent.lock().unwrap().clone()
    }

    /// Publish calls, delivered or not
    pub(crate) fn attempts(&self) -> usize {
        *self.attempts.lock().unwrap()
    }

    pub(crate) fn zero_count(&self) -> usize {
        self.sent().iter().filter(|cmd| cmd.is_zero()).count()
    }

    pub(crate) fn is_released(&self) -> bool {
        self.released.load(Ordering::SeqCst)
    }
}

impl VelocitySink for RecordingSink {
    async fn publish(&self, cmd: VelocityCommand) -> Result<()> {
        *self.attempts.lock().unwrap() += 1;
        if self.fail {
            return Err(TeleopError::Transport("sink offline".into()));
        }
        self.sent.lock().unwrap().push(cmd);
        Ok(())
    }

    async fn release(&mut self) -> Result<()> {
        self.released.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// One axis worth of `RecordingSink`, for per-channel failures
#[derive(Debug, Clone, Default)]
pub(crate) struct RecordingChannel {
    sent: Arc<Mutex<Vec<f32>>>,
    attempts: Arc<Mutex<usize>>,
    released: Arc<AtomicBool>,
    fail: bool,
}

impl RecordingChannel {
    pub(crate) fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub(crate) fn sent(&self) -> Vec<f32> {
        self.sent.lock().unwrap().clone()
    }

    pub(crate) fn attempts(&self) -> usize {
        *self.attempts.lock().unwrap()
    }

    pub(crate) fn is_released(&self) -> bool {
        self.released.load(Ordering::SeqCst)
    }
}

impl ScalarChannel for RecordingChannel {
    async fn send(&self, value: f32) -> Result<()> {
        *self.attempts.lock().unwrap() += 1;
        if self.fail {
            return Err(TeleopError::Transport("channel offline".into()));
        }
        self.sent.lock().unwrap().push(value);
        Ok(())
    }

    async fn release(&mut self) -> Result<()> {
        self.released.store(true, Ordering::SeqCst);
        Ok(())
    }
}
