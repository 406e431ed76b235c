use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;
use widget_auth::FieldSource;
use widget_auth::IdentityRecord;
use widget_auth::WidgetAuthenticator;
use widget_auth::WidgetRequest;

/// Authenticator specialised for this service's request and identity types.
pub type LoginAuthenticator = WidgetAuthenticator<LoginRequest, TelegramUser>;

/// Inbound widget login as seen by the domain.
#[derive(Debug, Clone)]
pub struct LoginRequest {
    fields: FieldSource,
    received_at: DateTime<Utc>,
}

impl LoginRequest {
    /// Wrap fields received now.
    pub fn new(fields: FieldSource) -> Self {
        Self::received_at(fields, Utc::now())
    }

    /// Wrap fields received at a given instant.
    pub fn received_at(fields: FieldSource, received_at: DateTime<Utc>) -> Self {
        Self {
            fields,
            received_at,
        }
    }

    pub fn received_time(&self) -> DateTime<Utc> {
        self.received_at
    }
}

impl WidgetRequest for LoginRequest {
    fn field_source(&self) -> &FieldSource {
        &self.fields
    }
}

/// Application identity produced by a successful widget login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TelegramUser {
    pub id: String,
    pub display_name: String,
    pub first_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    pub authenticated_at: DateTime<Utc>,
}

impl TelegramUser {
    pub fn from_record(record: &IdentityRecord, authenticated_at: DateTime<Utc>) -> Self {
        Self {
            id: record.id().to_string(),
            display_name: record.display_name(),
            first_name: record.first_name().to_string(),
            last_name: record.last_name().map(str::to_string),
            username: record.username().map(str::to_string),
            photo_url: record.photo_url().map(str::to_string),
            authenticated_at,
        }
    }
}
