pub mod callback;
pub mod disposition;
pub mod errors;
pub mod widget;

pub use callback::verify_fn;
pub use callback::FnVerify;
pub use callback::ResultSink;
pub use callback::VerifyIdentity;
pub use disposition::AuthInfo;
pub use disposition::Disposition;
pub use disposition::DispositionSink;
pub use disposition::RejectStatus;
pub use errors::RejectionError;
pub use errors::ResultSinkDropped;
pub use widget::WidgetAuthenticator;
pub use widget::WidgetAuthenticatorBuilder;
pub use widget::WidgetRequest;
