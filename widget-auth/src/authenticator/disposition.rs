use serde::Deserialize;
use serde::Serialize;

/// Diagnostic attached to an accepted or rejected attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Machine readable category of the diagnostic
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl AuthInfo {
    /// Create info carrying only a message.
    pub fn message(message: impl ToString) -> Self {
        Self {
            message: Some(message.to_string()),
            kind: None,
        }
    }

    /// Set the category.
    pub fn with_kind(mut self, kind: impl ToString) -> Self {
        self.kind = Some(kind.to_string());
        self
    }
}

impl From<&str> for AuthInfo {
    fn from(message: &str) -> Self {
        Self::message(message)
    }
}

impl From<String> for AuthInfo {
    fn from(message: String) -> Self {
        Self {
            message: Some(message),
            kind: None,
        }
    }
}

/// Client fault category of a rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectStatus {
    /// Malformed fields or hash mismatch (400)
    BadRequest,

    /// Refused by the application (401)
    Unauthorized,
}

impl RejectStatus {
    pub fn as_u16(&self) -> u16 {
        match self {
            RejectStatus::BadRequest => 400,
            RejectStatus::Unauthorized => 401,
        }
    }
}

/// Terminal outcome of one authentication attempt.
#[derive(Debug)]
pub enum Disposition<U> {
    Accept {
        identity: U,
        info: Option<AuthInfo>,
    },
    Reject {
        info: Option<AuthInfo>,
        status: RejectStatus,
    },
    Abort(anyhow::Error),
}

impl<U> Disposition<U> {
    /// Hand the outcome to the matching sink operation.
    pub fn dispatch<S>(self, sink: S) -> S::Output
    where
        S: DispositionSink<U>,
    {
        match self {
            Disposition::Accept { identity, info } => sink.accept(identity, info),
            Disposition::Reject { info, status } => sink.reject(info, status),
            Disposition::Abort(error) => sink.abort(error),
        }
    }

    pub fn is_accept(&self) -> bool {
        matches!(self, Disposition::Accept { .. })
    }

    /// Rejection status, if this outcome is a rejection.
    pub fn reject_status(&self) -> Option<RejectStatus> {
        match self {
            Disposition::Reject { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Outcome operations supplied by the hosting framework.
///
/// Every operation consumes the sink, so one attempt reaches exactly one of them.
pub trait DispositionSink<U> {
    type Output;

    fn accept(self, identity: U, info: Option<AuthInfo>) -> Self::Output;

    fn reject(self, info: Option<AuthInfo>, status: RejectStatus) -> Self::Output;

    fn abort(self, error: anyhow::Error) -> Self::Output;
}
