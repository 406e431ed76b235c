use std::collections::BTreeMap;

use chrono::DateTime;
use chrono::TimeZone;
use chrono::Utc;
use serde::Serialize;

use super::errors::MalformedFieldError;
use super::fields::FieldSource;
use super::fields::FieldValue;

/// Provider field names. These are hashed verbatim and must not be renamed.
pub const ID: &str = "id";
pub const FIRST_NAME: &str = "first_name";
pub const LAST_NAME: &str = "last_name";
pub const USERNAME: &str = "username";
pub const PHOTO_URL: &str = "photo_url";
pub const AUTH_DATE: &str = "auth_date";
pub const HASH: &str = "hash";

/// Fields every well-formed record carries, in the order they are checked.
pub const MANDATORY_FIELDS: [&str; 4] = [ID, AUTH_DATE, HASH, FIRST_NAME];

/// Claimed identity as signed by the login widget.
///
/// All values are strings exactly as the provider sent them. Fields the
/// widget may add in the future are kept in `extra` so they still take part
/// in hash verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentityRecord {
    id: String,
    first_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    photo_url: Option<String>,
    auth_date: String,
    hash: String,
    #[serde(flatten)]
    extra: BTreeMap<String, String>,
}

impl IdentityRecord {
    /// Validate raw inbound fields into an identity record.
    ///
    /// Empty values are dropped. The first non-string value found, in
    /// arrival order, fails the whole record.
    ///
    /// # Arguments
    /// * `source` - Fields as received from the request
    ///
    /// # Returns
    /// IdentityRecord holding every non-empty field
    ///
    /// # Errors
    /// * `NotText` - A field holds repeated or structured data
    /// * `Missing` - One of `id`, `auth_date`, `hash`, `first_name` is absent or empty
    pub fn extract(source: &FieldSource) -> Result<Self, MalformedFieldError> {
        let mut fields = BTreeMap::new();

        for (name, value) in source.iter() {
            if value.is_empty() {
                continue;
            }
            match value {
                FieldValue::Text(text) => {
                    fields.insert(name.to_string(), text.clone());
                }
                FieldValue::Repeated(_) | FieldValue::Structured(_) => {
                    return Err(MalformedFieldError::NotText {
                        field: name.to_string(),
                    });
                }
            }
        }

        Self::from_text_fields(fields)
    }

    /// Build a record from fields already known to be strings.
    ///
    /// # Errors
    /// * `Missing` - A mandatory field is absent or empty
    pub fn from_text_fields(mut fields: BTreeMap<String, String>) -> Result<Self, MalformedFieldError> {
        fields.retain(|_, value| !value.is_empty());

        for name in MANDATORY_FIELDS {
            if !fields.contains_key(name) {
                return Err(MalformedFieldError::Missing {
                    field: name.to_string(),
                });
            }
        }

        let mut take = |name: &str| fields.remove(name).unwrap_or_default();
        let id = take(ID);
        let auth_date = take(AUTH_DATE);
        let hash = take(HASH);
        let first_name = take(FIRST_NAME);

        Ok(Self {
            id,
            first_name,
            last_name: fields.remove(LAST_NAME),
            username: fields.remove(USERNAME),
            photo_url: fields.remove(PHOTO_URL),
            auth_date,
            hash,
            extra: fields,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> Option<&str> {
        self.last_name.as_deref()
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn photo_url(&self) -> Option<&str> {
        self.photo_url.as_deref()
    }

    /// Raw `auth_date` value (Unix timestamp in seconds).
    pub fn auth_date(&self) -> &str {
        &self.auth_date
    }

    /// Claimed hex digest.
    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// Fields outside the known widget set.
    pub fn extra(&self) -> &BTreeMap<String, String> {
        &self.extra
    }

    /// Parse `auth_date` as a UTC timestamp.
    ///
    /// # Returns
    /// None when `auth_date` is not a whole number of seconds
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        let seconds = self.auth_date.parse::<i64>().ok()?;
        Utc.timestamp_opt(seconds, 0).single()
    }

    /// First and last name joined with a space.
    pub fn display_name(&self) -> String {
        match &self.last_name {
            Some(last_name) => format!("{} {}", self.first_name, last_name),
            None => self.first_name.clone(),
        }
    }

    /// Every present field as `(provider name, value)`, hash included.
    pub fn fields(&self) -> Vec<(&str, &str)> {
        let mut fields = vec![
            (ID, self.id.as_str()),
            (FIRST_NAME, self.first_name.as_str()),
            (AUTH_DATE, self.auth_date.as_str()),
            (HASH, self.hash.as_str()),
        ];

        let optional = [
            (LAST_NAME, &self.last_name),
            (USERNAME, &self.username),
            (PHOTO_URL, &self.photo_url),
        ];
        fields.extend(
            optional
                .into_iter()
                .filter_map(|(name, value)| value.as_deref().map(|value| (name, value))),
        );

        fields.extend(
            self.extra
                .iter()
                .map(|(name, value)| (name.as_str(), value.as_str())),
        );
        fields
    }
}
