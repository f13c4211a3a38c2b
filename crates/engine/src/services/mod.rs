//! External collaborators
//!
//! Traits for the model catalog, texture service, and language translation
//! collaborators, plus their HTTP implementations. Everything here is a
//! suspension point; the stores are only touched after a call resolves.

pub mod models;
pub mod textures;
pub mod translate;

pub use models::{HttpModelCatalog, ModelCatalog};
pub use textures::{load_texture_catalog, HttpTextureProvider, TextureProvider};
pub use translate::{ClaudeTranslator, CommandTranslator};

use std::time::Duration;

/// Timeout applied to every collaborator request. The upstream protocol
/// does not define one; 10 seconds keeps the single-command pipeline from
/// hanging on a dead service.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Failure talking to an external collaborator
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceError {
    /// Transport-level failure (connection, timeout, bad status)
    Transport(String),
    /// The service answered but reported failure
    Unsuccessful(String),
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceError::Transport(msg) => write!(f, "request failed: {msg}"),
            ServiceError::Unsuccessful(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ServiceError {}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        ServiceError::Transport(err.to_string())
    }
}
