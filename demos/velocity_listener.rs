// Velocity listener: prints what the keyboard teleop publishes
use keyboard_velocity_teleop::config::{TOPIC_ANGULAR_VELOCITY, TOPIC_LINEAR_VELOCITY};
use keyboard_velocity_teleop::messages::Float32;
use tracing::{info, warn};
use zenoh::sample::Sample;

fn decode(sample: &Sample) -> Option<f32> {
    let payload = sample.payload().to_bytes();
    match serde_json::from_slice::<Float32>(&payload) {
        Ok(msg) => Some(msg.data),
        Err(e) => {
            warn!("Failed to parse sample on {}: {}", sample.key_expr(), e);
            None
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    info!("Opening Zenoh session...");
    let session = zenoh::open(zenoh::Config::default()).await?;
    let linear = session.declare_subscriber(TOPIC_LINEAR_VELOCITY).await?;
    let angular = session.declare_subscriber(TOPIC_ANGULAR_VELOCITY).await?;
    info!(
        "Listening on {}, {} (Ctrl-C to quit)",
        TOPIC_LINEAR_VELOCITY, TOPIC_ANGULAR_VELOCITY
    );

    loop {
        tokio::select! {
            sample = linear.recv_async() => {
                if let Some(v) = decode(&sample?) {
                    info!("Linear: {}", v);
                }
            }
            sample = angular.recv_async() => {
                if let Some(v) = decode(&sample?) {
                    info!("Angular: {}", v);
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    session.close().await?;
    Ok(())
}
