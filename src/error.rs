//! Error types for frame fetching and player lifecycle.

/// Result type for player operations.
pub type PlayerResult<T> = Result<T, PlayerError>;

/// Errors surfaced by the player to its host.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PlayerError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to load frames: {0}")]
    Load(String),
}

impl PlayerError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn load(msg: impl Into<String>) -> Self {
        Self::Load(msg.into())
    }
}

/// Failure to retrieve a single frame.
///
/// These never escape the loader on their own: a failed frame becomes an
/// empty slot. Only when every frame fails is the last one reported as a
/// [`PlayerError::Load`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("frame not found: {0}")]
    NotFound(String),

    #[error("source unavailable: {0}")]
    Unavailable(String),

    #[error("transport error: {0}")]
    Transport(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(PlayerError::config("x")
            .to_string()
            .contains("invalid configuration:"));
        assert_eq!(
            PlayerError::load("source unreachable").to_string(),
            "failed to load frames: source unreachable"
        );
        assert!(FetchError::NotFound("colored/frame_0001.txt".into())
            .to_string()
            .ends_with("colored/frame_0001.txt"));
    }
}
