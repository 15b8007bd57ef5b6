use thiserror::Error;

use partquote_core::DomainError;
use partquote_quoting::QuoteError;

use crate::config::ConfigError;
use crate::forms::FormErrors;

/// Application-layer error.
#[derive(Debug, Error)]
pub enum AppError {
    /// Rendered inline next to the offending fields.
    #[error(transparent)]
    Form(#[from] FormErrors),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Quote(#[from] QuoteError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("unknown part reference: {0}")]
    UnknownPart(String),

    #[error("invalid session script: {0}")]
    Script(#[from] serde_json::Error),
}
