use thiserror::Error;

/// Failures in the service's own login decision (not client faults).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LoginError {
    #[error("Verified login carries an unusable auth_date: {0}")]
    InvalidAuthDate(String),
}
