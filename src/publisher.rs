// Zenoh publishers for the linear/angular velocity streams
//
// Each axis is its own scalar stream. A command always goes out on both
// channels, even when one of them fails, so a zero never gets stuck behind
// the other axis.

use std::future::Future;

use tracing::{debug, warn};
use zenoh::Session;
use zenoh::pubsub::Publisher;

use crate::controller::VelocitySink;
use crate::error::{Result, TeleopError};
use crate::messages::{Float32, VelocityCommand};

/// One outbound scalar stream
pub trait ScalarChannel {
    fn send(&self, value: f32) -> impl Future<Output = Result<()>>;

    /// Stop publishing; later sends fail
    fn release(&mut self) -> impl Future<Output = Result<()>>;
}

/// A Zenoh publisher sending JSON `Float32` samples
pub struct ZenohChannel {
    key: String,
    publisher: Option<Publisher<'static>>,
}

impl ZenohChannel {
    pub async fn declare(session: &Session, key: &str) -> Result<Self> {
        let publisher = session.declare_publisher(key.to_owned()).await?;
        Ok(Self {
            key: key.to_owned(),
            publisher: Some(publisher),
        })
    }
}

impl ScalarChannel for ZenohChannel {
    async fn send(&self, value: f32) -> Result<()> {
        let Some(publisher) = &self.publisher else {
            return Err(TeleopError::Transport(
                format!("publisher on {} already released", self.key).into(),
            ));
        };
        let json = serde_json::to_string(&Float32::from(value))?;
        publisher.put(json).await?;
        debug!("Published {} on {}", value, self.key);
        Ok(())
    }

    async fn release(&mut self) -> Result<()> {
        if let Some(publisher) = self.publisher.take() {
            debug!("Undeclaring publisher on {}", self.key);
            publisher.undeclare().await?;
        }
        Ok(())
    }
}

/// Linear and angular channels driven as one velocity sink
pub struct AxisPublishers<C> {
    linear: C,
    angular: C,
}

pub type ZenohVelocitySink = AxisPublishers<ZenohChannel>;

impl<C> AxisPublishers<C> {
    pub fn new(linear: C, angular: C) -> Self {
        Self { linear, angular }
    }
}

impl ZenohVelocitySink {
    /// Declare both publishers on an open session
    pub async fn declare(session: &Session, linear_topic: &str, angular_topic: &str) -> Result<Self> {
        let linear = ZenohChannel::declare(session, linear_topic).await?;
        let angular = ZenohChannel::declare(session, angular_topic).await?;
        Ok(Self::new(linear, angular))
    }
}

// Both results are always produced; the first error wins
fn first_error(what: &str, linear: Result<()>, angular: Result<()>) -> Result<()> {
    if let Err(e) = &linear {
        warn!("Linear velocity {} failed: {}", what, e);
    }
    if let Err(e) = &angular {
        warn!("Angular velocity {} failed: {}", what, e);
    }
    linear.and(angular)
}

impl<C: ScalarChannel> VelocitySink for AxisPublishers<C> {
    async fn publish(&self, cmd: VelocityCommand) -> Result<()> {
        let linear = self.linear.send(cmd.linear).await;
        let angular = self.angular.send(cmd.angular).await;
        first_error("publish", linear, angular)
    }

    async fn release(&mut self) -> Result<()> {
        let linear = self.linear.release().await;
        let angular = self.angular.release().await;
        first_error("release", linear, angular)
    }
}
