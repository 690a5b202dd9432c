// Error types for the teleop runtime

/// Anything that can end a teleop run with a failure
#[derive(Debug, thiserror::Error)]
pub enum TeleopError {
    #[error("Zenoh error: {0}")]
    Transport(zenoh::Error),

    #[error("Terminal IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode message: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

// zenoh::Error is a boxed trait object, so it can't go through #[from]
impl From<zenoh::Error> for TeleopError {
    fn from(err: zenoh::Error) -> Self {
        Self::Transport(err)
    }
}

pub type Result<T> = std::result::Result<T, TeleopError>;
