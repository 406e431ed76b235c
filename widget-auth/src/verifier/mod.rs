pub mod check_string;
pub mod hash;

pub use check_string::build_check_string;
pub use hash::HashVerifier;
pub use hash::RecordVerifier;
pub use hash::VerificationOutcome;
