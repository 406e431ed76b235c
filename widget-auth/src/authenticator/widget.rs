use std::fmt;
use std::sync::Arc;

use super::callback::ResultSink;
use super::callback::Verified;
use super::callback::VerifyIdentity;
use super::disposition::Disposition;
use super::disposition::DispositionSink;
use super::disposition::RejectStatus;
use super::errors::RejectionError;
use super::errors::ResultSinkDropped;
use crate::errors::ConstructionError;
use crate::record::FieldSource;
use crate::record::IdentityRecord;
use crate::verifier::HashVerifier;
use crate::verifier::RecordVerifier;

/// Inbound request carrying login widget fields.
pub trait WidgetRequest: Send + Sync {
    fn field_source(&self) -> &FieldSource;
}

impl WidgetRequest for FieldSource {
    fn field_source(&self) -> &FieldSource {
        self
    }
}

/// Authenticates login widget redirects.
///
/// Holds only the derived signing key and the application verify callback,
/// both read-only after construction. Share one instance behind an `Arc`.
pub struct WidgetAuthenticator<R, U, V = HashVerifier> {
    verifier: V,
    verify: Arc<dyn VerifyIdentity<R, U>>,
}

impl<R, U> WidgetAuthenticator<R, U>
where
    R: WidgetRequest,
    U: Send + 'static,
{
    /// Start building an authenticator.
    pub fn builder() -> WidgetAuthenticatorBuilder<R, U> {
        WidgetAuthenticatorBuilder::default()
    }
}

impl<R, U, V> WidgetAuthenticator<R, U, V>
where
    R: WidgetRequest,
    U: Send + 'static,
    V: RecordVerifier,
{
    pub const NAME: &'static str = "telegram-widget";

    pub fn name(&self) -> &'static str {
        Self::NAME
    }

    /// Run one authentication attempt.
    ///
    /// Validates the request fields, verifies their hash and, once verified,
    /// asks the verify callback for a decision.
    ///
    /// # Arguments
    /// * `request` - Request exposing the widget fields
    ///
    /// # Returns
    /// Exactly one of accept, reject (400 or 401) or abort
    pub async fn authenticate(&self, request: &R) -> Disposition<U> {
        let record = match IdentityRecord::extract(request.field_source()) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(field = e.field(), error = %e, "Rejecting malformed widget data");
                return Self::bad_request(e.into());
            }
        };

        if !self.verifier.verify(&record) {
            tracing::warn!(user_id = record.id(), "Widget data hash verification failed");
            return Self::bad_request(RejectionError::BadHash);
        }

        let user_id = record.id().to_string();
        let (done, outcome) = ResultSink::channel();
        self.verify.verify(request, record, done).await;

        match outcome.await {
            Ok(Verified::Success(identity, info)) => {
                tracing::debug!(user_id = %user_id, "Widget login accepted");
                Disposition::Accept { identity, info }
            }
            Ok(Verified::Unauthorized(info)) => {
                tracing::info!(user_id = %user_id, "Widget login refused by application");
                Disposition::Reject {
                    info,
                    status: RejectStatus::Unauthorized,
                }
            }
            Ok(Verified::Error(error)) => {
                tracing::error!(user_id = %user_id, error = %error, "Verify callback failed");
                Disposition::Abort(error)
            }
            Err(_) => {
                tracing::error!(user_id = %user_id, "Verify callback dropped its result sink");
                Disposition::Abort(ResultSinkDropped.into())
            }
        }
    }

    /// Run one authentication attempt and dispatch the outcome into `sink`.
    pub async fn authenticate_with<S>(&self, request: &R, sink: S) -> S::Output
    where
        S: DispositionSink<U>,
    {
        self.authenticate(request).await.dispatch(sink)
    }

    fn bad_request(error: RejectionError) -> Disposition<U> {
        Disposition::Reject {
            info: Some(error.into()),
            status: RejectStatus::BadRequest,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_verifier<W: RecordVerifier>(self, verifier: W) -> WidgetAuthenticator<R, U, W> {
        WidgetAuthenticator {
            verifier,
            verify: self.verify,
        }
    }
}

impl<R, U, V: fmt::Debug> fmt::Debug for WidgetAuthenticator<R, U, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetAuthenticator")
            .field("verifier", &self.verifier)
            .finish_non_exhaustive()
    }
}

/// Builder enforcing that an authenticator always has a secret and a callback.
pub struct WidgetAuthenticatorBuilder<R, U> {
    secret: Option<Vec<u8>>,
    verify: Option<Arc<dyn VerifyIdentity<R, U>>>,
}

impl<R, U> Default for WidgetAuthenticatorBuilder<R, U> {
    fn default() -> Self {
        Self {
            secret: None,
            verify: None,
        }
    }
}

impl<R, U> WidgetAuthenticatorBuilder<R, U>
where
    R: WidgetRequest,
    U: Send + 'static,
{
    /// Set the bot token shared with the identity provider.
    pub fn secret(mut self, secret: impl AsRef<[u8]>) -> Self {
        self.secret = Some(secret.as_ref().to_vec());
        self
    }

    /// Set the application verify callback.
    pub fn verify<C>(mut self, callback: C) -> Self
    where
        C: VerifyIdentity<R, U> + 'static,
    {
        self.verify = Some(Arc::new(callback));
        self
    }

    /// Finish construction.
    ///
    /// # Errors
    /// * `MissingSecret` - No secret or an empty one was given
    /// * `MissingVerifyCallback` - No verify callback was given
    pub fn build(self) -> Result<WidgetAuthenticator<R, U>, ConstructionError> {
        let secret = self
            .secret
            .filter(|secret| !secret.is_empty())
            .ok_or(ConstructionError::MissingSecret)?;
        let verify = self.verify.ok_or(ConstructionError::MissingVerifyCallback)?;

        Ok(WidgetAuthenticator {
            verifier: HashVerifier::new(secret)?,
            verify,
        })
    }
}
