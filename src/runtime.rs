// Teleop control loop and lifecycle
// Keys in, velocity levels out. Whatever ends the loop (stop key, Ctrl-C,
// lost input, transport failure), the robot gets a zero command on the way out.

use std::future::Future;
use std::pin::pin;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{info, warn};

use crate::config::{Config, POLL_INTERVAL, STOP_KEY};
use crate::controller::{KeyOutcome, VelocityController, VelocityLevels, VelocitySink};
use crate::error::Result;
use crate::keyboard::{InputReader, Key, KeySource, TerminalKeys};
use crate::publisher::ZenohVelocitySink;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Running,
    Stopping,
    Stopped,
}

/// Why the control loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The stop key was pressed
    StopKey,
    /// Ctrl-C, either as a keystroke or as a signal
    Interrupted,
    /// The key source ran dry
    InputClosed,
}

pub struct Teleop<S> {
    controller: VelocityController<S>,
    state: Lifecycle,
    debounce: Duration,
}

impl<S: VelocitySink> Teleop<S> {
    pub fn new(controller: VelocityController<S>, debounce: Duration) -> Self {
        Self {
            controller,
            state: Lifecycle::Running,
            debounce,
        }
    }

    pub fn state(&self) -> Lifecycle {
        self.state
    }

    pub fn controller(&self) -> &VelocityController<S> {
        &self.controller
    }

    /// Run until the stop key, an interrupt, or the end of input. Leaves the
    /// lifecycle in `Stopping`; call `shutdown` afterwards in every case.
    pub async fn drive<K, I>(&mut self, keys: &mut K, interrupt: I) -> Result<StopReason>
    where
        K: KeySource,
        I: Future<Output = ()>,
    {
        let outcome = self.run_loop(keys, interrupt).await;
        self.state = Lifecycle::Stopping;
        outcome
    }

    async fn run_loop<K, I>(&mut self, keys: &mut K, interrupt: I) -> Result<StopReason>
    where
        K: KeySource,
        I: Future<Output = ()>,
    {
        let mut interrupt = pin!(interrupt);

        loop {
            let key = tokio::select! {
                biased;
                () = &mut interrupt => {
                    info!("Interrupt received");
                    return Ok(StopReason::Interrupted);
                }
                key = keys.next_key() => key?,
            };

            let key = match key {
                Some(Key::Char(c)) => c.to_ascii_lowercase(),
                Some(Key::Interrupt) => {
                    info!("Ctrl-C received");
                    return Ok(StopReason::Interrupted);
                }
                Some(Key::Other) => continue,
                None => {
                    warn!("Keyboard input closed");
                    return Ok(StopReason::InputClosed);
                }
            };

            if key == STOP_KEY {
                info!("STOP command received. Exiting...");
                return Ok(StopReason::StopKey);
            }

            if let KeyOutcome::Moved(_) = self.controller.handle_key(key).await? {
                // Debounce held keys, but stay responsive to interrupts
                tokio::select! {
                    biased;
                    () = &mut interrupt => {
                        info!("Interrupt received");
                        return Ok(StopReason::Interrupted);
                    }
                    () = sleep(self.debounce) => {}
                }
            }
        }
    }

    /// `Stopping -> Stopped`: publish zero on both channels, then release
    /// them. Both steps are attempted even if the first fails; only the first
    /// call does anything.
    pub async fn shutdown(&mut self) -> Result<()> {
        if self.state == Lifecycle::Stopped {
            return Ok(());
        }
        self.state = Lifecycle::Stopping;

        info!("Publishing zero velocity");
        let zeroed = self.controller.publish_zero().await;
        if let Err(e) = &zeroed {
            warn!("Zero velocity publish failed: {}", e);
        }

        let released = self.controller.release().await;
        if let Err(e) = &released {
            warn!("Failed to release publishers: {}", e);
        }

        self.state = Lifecycle::Stopped;
        zeroed.and(released)
    }
}

fn show_instructions(levels: VelocityLevels) {
    info!(
        "\n\n====== Keyboard Control Mode ======\n\n\
         \x20  [w] : Increase forward speed\n\n\
         \x20  [s] : Increase backward speed\n\n\
         \x20  [a] : Increase left turn speed\n\n\
         \x20  [d] : Increase right turn speed\n\n\
         \x20  [{}] : STOP and exit (Ctrl-C also stops)\n\n\
         -------------------------------------\n\
         Current speed: Linear={}, Angular={}\n",
        STOP_KEY, levels.linear, levels.angular
    );
}

async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

/// Open Zenoh, run the keyboard loop, and always finish with a zero command
pub async fn run(config: Config) -> Result<StopReason> {
    info!("Opening Zenoh session...");
    let session = zenoh::open(config.zenoh()?).await?;

    info!("Setting up publishers...");
    let sink =
        ZenohVelocitySink::declare(&session, &config.linear_topic, &config.angular_topic).await?;
    info!(
        "Publishing to: {}, {} (step {})",
        config.linear_topic, config.angular_topic, config.step
    );

    let mut teleop = Teleop::new(VelocityController::new(sink, config.step), config.debounce);
    show_instructions(teleop.controller().levels());

    let mut keys = TerminalKeys::new(InputReader::new(POLL_INTERVAL));
    let outcome = teleop.drive(&mut keys, ctrl_c()).await;
    if let Err(e) = &outcome {
        warn!("Control loop failed: {}", e);
    }

    // Stop the robot before tearing anything else down
    let stopped = teleop.shutdown().await;

    let input = keys.close().await;
    if let Err(e) = session.close().await {
        warn!("Failed to close Zenoh session: {}", e);
    }
    info!("Teleop stopped");

    let reason = outcome?;
    stopped?;
    input?;
    Ok(reason)
}
