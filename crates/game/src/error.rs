//! Error type for the game crate.

use std::path::PathBuf;

use renderer::{ModelError, RenderError};

#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config at {path:?}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },

    #[error("could not serialize config: {0}")]
    Serialize(#[from] ron::Error),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Render(#[from] RenderError),
}
