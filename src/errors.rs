//! Unified error types and result handling for tokenwatch.
//!
//! Lookup failures follow one taxonomy crate-wide: a missing token (404 or a
//! well-formed body without the expected field) is `moralis::Lookup::NotFound`,
//! while network failures and unexpected gateway statuses surface here as the
//! transient arm, `Error::Http` / `Error::Upstream`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected status {status} from the price gateway")]
    Upstream { status: u16 },

    #[error("Serenity/Poise framework error: {0}")]
    Framework(Box<poise::serenity_prelude::Error>),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Error::Framework(Box::new(value))
    }
}

impl Error {
    /// Whether this error is a transient upstream condition worth retrying
    /// later, as opposed to a local misconfiguration.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Error::Http(_) | Error::Upstream { .. })
    }
}

// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
