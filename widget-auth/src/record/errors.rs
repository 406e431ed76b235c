use thiserror::Error;

/// Error for inbound fields that cannot form an identity record.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MalformedFieldError {
    #[error("Login data is missing '{field}'")]
    Missing { field: String },

    #[error("Field '{field}' must be a single string value")]
    NotText { field: String },
}

impl MalformedFieldError {
    /// Name of the offending field.
    pub fn field(&self) -> &str {
        match self {
            MalformedFieldError::Missing { field } | MalformedFieldError::NotText { field } => field,
        }
    }
}
