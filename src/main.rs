use clap::Parser;
use tracing_subscriber::EnvFilter;

use keyboard_velocity_teleop::config::{Args, Config};
use keyboard_velocity_teleop::{StopReason, TeleopError, runtime};

async fn start(args: Args) -> Result<StopReason, TeleopError> {
    let config = Config::try_from(args)?;
    runtime::run(config).await
}

#[tokio::main]
async fn main() {
    // Setup logging (set RUST_LOG=info or debug)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = start(Args::parse()).await {
        eprintln!("Runtime error: {}", e);
        std::process::exit(1);
    }
}
