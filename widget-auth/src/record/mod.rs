pub mod errors;
pub mod fields;
pub mod identity;

pub use errors::MalformedFieldError;
pub use fields::FieldSource;
pub use fields::FieldValue;
pub use identity::IdentityRecord;
