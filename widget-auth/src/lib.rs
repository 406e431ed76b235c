//! Login widget authentication library
//!
//! Verifies the signed profile fields a Telegram login widget hands to a
//! relying application:
//! - Data-check-string construction and HMAC-SHA256 verification
//! - Validation of raw request fields into an identity record
//! - Authentication coordination with an application verify callback
//!
//! The library carries no HTTP machinery. Services supply the request fields,
//! the verify callback and the sink receiving the outcome.
//!
//! # Examples
//!
//! ## Hash Verification
//! ```
//! use widget_auth::build_check_string;
//! use widget_auth::HashVerifier;
//!
//! let verifier = HashVerifier::new("ABC:12345").unwrap();
//!
//! let fields = [
//!     ("id", "123456789"),
//!     ("first_name", "John"),
//!     ("username", "john_doe"),
//!     ("auth_date", "1642203018"),
//! ];
//! let check_string = build_check_string(fields, "hash");
//! assert_eq!(
//!     check_string,
//!     "auth_date=1642203018\nfirst_name=John\nid=123456789\nusername=john_doe"
//! );
//!
//! let hash = verifier.sign(&check_string);
//! let mut signed = fields.to_vec();
//! signed.push(("hash", hash.as_str()));
//! assert!(verifier.verify_fields(signed));
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use widget_auth::verify_fn;
//! use widget_auth::Disposition;
//! use widget_auth::FieldSource;
//! use widget_auth::IdentityRecord;
//! use widget_auth::ResultSink;
//! use widget_auth::WidgetAuthenticator;
//!
//! # tokio_test();
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn tokio_test() {
//! let authenticator: WidgetAuthenticator<FieldSource, String> = WidgetAuthenticator::builder()
//!     .secret("ABC:12345")
//!     .verify(verify_fn(
//!         |_: &FieldSource, record: IdentityRecord, done: ResultSink<String>| {
//!             done.success(record.display_name(), None)
//!         },
//!     ))
//!     .build()
//!     .unwrap();
//!
//! let request = FieldSource::from_pairs([
//!     ("id", "123456789"),
//!     ("first_name", "John"),
//!     ("username", "john_doe"),
//!     ("auth_date", "1642203018"),
//!     ("hash", "b9455a2594df2547a83d2c57b55cd860ddbaebea46681eabe608b818a82382e3"),
//! ]);
//!
//! match authenticator.authenticate(&request).await {
//!     Disposition::Accept { identity, .. } => assert_eq!(identity, "John"),
//!     other => panic!("unexpected outcome: {:?}", other),
//! }
//! # }
//! ```

pub mod authenticator;
pub mod errors;
pub mod record;
pub mod verifier;

// Re-export commonly used items
pub use authenticator::verify_fn;
pub use authenticator::AuthInfo;
pub use authenticator::Disposition;
pub use authenticator::DispositionSink;
pub use authenticator::RejectStatus;
pub use authenticator::RejectionError;
pub use authenticator::ResultSink;
pub use authenticator::VerifyIdentity;
pub use authenticator::WidgetAuthenticator;
pub use authenticator::WidgetRequest;
pub use errors::ConstructionError;
pub use record::FieldSource;
pub use record::FieldValue;
pub use record::IdentityRecord;
pub use record::MalformedFieldError;
pub use verifier::build_check_string;
pub use verifier::HashVerifier;
pub use verifier::RecordVerifier;
pub use verifier::VerificationOutcome;
