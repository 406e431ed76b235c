use async_trait::async_trait;
use tokio::sync::oneshot;

use super::disposition::AuthInfo;
use crate::record::IdentityRecord;

/// What the verify callback reported.
#[derive(Debug)]
pub(crate) enum Verified<U> {
    Error(anyhow::Error),
    Unauthorized(Option<AuthInfo>),
    Success(U, Option<AuthInfo>),
}

/// One-shot channel through which the application reports its decision.
///
/// Each method consumes the sink. Dropping it without reporting ends the
/// attempt with an abort.
#[derive(Debug)]
pub struct ResultSink<U> {
    sender: oneshot::Sender<Verified<U>>,
}

impl<U> ResultSink<U> {
    pub(crate) fn channel() -> (Self, oneshot::Receiver<Verified<U>>) {
        let (sender, receiver) = oneshot::channel();
        (Self { sender }, receiver)
    }

    /// Report a failure in the application's own logic.
    pub fn error(self, error: impl Into<anyhow::Error>) {
        self.send(Verified::Error(error.into()));
    }

    /// Report that the verified identity is not allowed in.
    pub fn unauthorized(self, info: Option<AuthInfo>) {
        self.send(Verified::Unauthorized(info));
    }

    /// Report the application identity to log in.
    pub fn success(self, identity: U, info: Option<AuthInfo>) {
        self.send(Verified::Success(identity, info));
    }

    /// Report in a single call: an error, no identity, or an identity.
    pub fn complete(self, result: Result<Option<U>, anyhow::Error>, info: Option<AuthInfo>) {
        match result {
            Err(error) => self.error(error),
            Ok(None) => self.unauthorized(info),
            Ok(Some(identity)) => self.success(identity, info),
        }
    }

    fn send(self, verified: Verified<U>) {
        if self.sender.send(verified).is_err() {
            tracing::debug!("Authentication attempt ended before the verify callback reported");
        }
    }
}

/// Application hook deciding whether a verified widget identity may log in.
///
/// Called only after the hash has been verified. Must report through `done`
/// at most once; the sink may be moved into a spawned task for deferred work.
#[async_trait]
pub trait VerifyIdentity<R, U>: Send + Sync {
    async fn verify(&self, request: &R, record: IdentityRecord, done: ResultSink<U>);
}

/// Adapter turning a plain closure into a [`VerifyIdentity`] hook.
pub struct FnVerify<F>(F);

/// Wrap a closure `(request, record, done)` as a verify callback.
pub fn verify_fn<R, U, F>(callback: F) -> FnVerify<F>
where
    F: Fn(&R, IdentityRecord, ResultSink<U>) + Send + Sync,
{
    FnVerify(callback)
}

#[async_trait]
impl<R, U, F> VerifyIdentity<R, U> for FnVerify<F>
where
    R: Sync,
    U: Send + 'static,
    F: Fn(&R, IdentityRecord, ResultSink<U>) + Send + Sync,
{
    async fn verify(&self, request: &R, record: IdentityRecord, done: ResultSink<U>) {
        (self.0)(request, record, done)
    }
}
