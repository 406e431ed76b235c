use thiserror::Error;

/// Error raised while building an authenticator or verifier.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConstructionError {
    #[error("Widget authenticator requires a non-empty bot token")]
    MissingSecret,

    #[error("Widget authenticator requires a verify callback")]
    MissingVerifyCallback,
}
