use thiserror::Error;

use super::disposition::AuthInfo;
use crate::record::MalformedFieldError;

/// Client errors detected before the application is consulted.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RejectionError {
    #[error(transparent)]
    MalformedField(#[from] MalformedFieldError),

    // Never names the field that failed.
    #[error("data-check-string verification failed")]
    BadHash,
}

impl RejectionError {
    pub fn kind(&self) -> &'static str {
        match self {
            RejectionError::MalformedField(_) => "malformed_field",
            RejectionError::BadHash => "bad_hash",
        }
    }
}

impl From<RejectionError> for AuthInfo {
    fn from(err: RejectionError) -> Self {
        AuthInfo::message(&err).with_kind(err.kind())
    }
}

/// The verify callback let go of its result sink without reporting.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("verify callback dropped its result sink without reporting an outcome")]
pub struct ResultSinkDropped;
