use std::fmt;

use hmac::digest::Key;
use hmac::digest::KeyInit;
use hmac::Hmac;
use hmac::Mac;
use sha2::Digest;
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::check_string::build_check_string;
use crate::errors::ConstructionError;
use crate::record::identity::HASH;
use crate::record::FieldSource;
use crate::record::IdentityRecord;
use crate::record::MalformedFieldError;

type HmacSha256 = Hmac<Sha256>;

/// Result of checking one set of inbound fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationOutcome {
    /// Hash matches the fields
    Valid(IdentityRecord),

    /// Hash does not match the fields
    Invalid,

    /// Fields could not form a record, nothing was hashed
    Malformed(MalformedFieldError),
}

/// Decides whether a claimed identity was signed by the provider.
#[cfg_attr(test, mockall::automock)]
pub trait RecordVerifier: Send + Sync + 'static {
    fn verify(&self, record: &IdentityRecord) -> bool;
}

/// HMAC-SHA256 verifier for login widget data.
///
/// The HMAC key is `SHA-256(bot_token)`, derived once at construction.
/// The bot token itself is not retained.
#[derive(Clone)]
pub struct HashVerifier {
    mac: HmacSha256,
}

impl HashVerifier {
    /// Create a verifier for the given shared secret.
    ///
    /// # Arguments
    /// * `secret` - Bot token shared with the identity provider
    ///
    /// # Returns
    /// HashVerifier keyed with the derived signing key
    ///
    /// # Errors
    /// * `MissingSecret` - Secret is empty
    pub fn new(secret: impl AsRef<[u8]>) -> Result<Self, ConstructionError> {
        let secret = secret.as_ref();
        if secret.is_empty() {
            return Err(ConstructionError::MissingSecret);
        }

        // HMAC zero pads keys shorter than its block, so the padded block is the same key.
        let signing_key = Sha256::digest(secret);
        let mut key = Key::<HmacSha256>::default();
        key[..signing_key.len()].copy_from_slice(&signing_key);
        let mac = <HmacSha256 as KeyInit>::new(&key);

        Ok(Self { mac })
    }

    /// Compute the lowercase hex digest of a check string.
    pub fn sign(&self, check_string: &str) -> String {
        let mut mac = self.mac.clone();
        mac.update(check_string.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// Verify a record against its claimed hash.
    ///
    /// # Returns
    /// True if the digest of every non-hash field equals the claimed hash
    pub fn verify(&self, record: &IdentityRecord) -> bool {
        let check_string = build_check_string(record.fields(), HASH);
        self.matches(&check_string, record.hash())
    }

    /// Verify raw string fields that include the `hash` field.
    ///
    /// # Returns
    /// False when no `hash` field is present or it does not match
    pub fn verify_fields<'a, I>(&self, fields: I) -> bool
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let fields: Vec<(&str, &str)> = fields.into_iter().collect();
        let Some((_, claimed)) = fields.iter().find(|(name, _)| *name == HASH) else {
            return false;
        };

        let check_string = build_check_string(fields.iter().copied(), HASH);
        self.matches(&check_string, claimed)
    }

    /// Extract a record from raw fields and verify it.
    pub fn check(&self, source: &FieldSource) -> VerificationOutcome {
        match IdentityRecord::extract(source) {
            Ok(record) if self.verify(&record) => VerificationOutcome::Valid(record),
            Ok(_) => VerificationOutcome::Invalid,
            Err(e) => VerificationOutcome::Malformed(e),
        }
    }

    fn matches(&self, check_string: &str, claimed: &str) -> bool {
        let expected = self.sign(check_string);
        expected.as_bytes().ct_eq(claimed.as_bytes()).into()
    }
}

impl RecordVerifier for HashVerifier {
    fn verify(&self, record: &IdentityRecord) -> bool {
        HashVerifier::verify(self, record)
    }
}

impl fmt::Debug for HashVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashVerifier")
            .field("signing_key", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "ABC:12345";
    const CHECK_STRING: &str =
        "auth_date=1642203018\nfirst_name=John\nid=123456789\nusername=john_doe";
    const EXPECTED_HASH: &str = "b9455a2594df2547a83d2c57b55cd860ddbaebea46681eabe608b818a82382e3";

    fn widget_fields(hash: &str) -> FieldSource {
        FieldSource::from_pairs([
            ("id", "123456789"),
            ("first_name", "John"),
            ("username", "john_doe"),
            ("auth_date", "1642203018"),
            ("hash", hash),
        ])
    }

    fn verifier() -> HashVerifier {
        HashVerifier::new(SECRET).expect("Failed to create verifier")
    }

    #[test]
    fn test_sign_known_answer() {
        assert_eq!(verifier().sign(CHECK_STRING), EXPECTED_HASH);
    }

    #[test]
    fn test_verify_valid_record() {
        let record =
            IdentityRecord::extract(&widget_fields(EXPECTED_HASH)).expect("Failed to extract");
        assert!(verifier().verify(&record));
    }

    #[test]
    fn test_verify_wrong_hash() {
        let record = IdentityRecord::extract(&widget_fields("this is just wrong"))
            .expect("Failed to extract");
        assert!(!verifier().verify(&record));
    }

    #[test]
    fn test_verify_is_case_sensitive() {
        let record = IdentityRecord::extract(&widget_fields(&EXPECTED_HASH.to_uppercase()))
            .expect("Failed to extract");
        assert!(!verifier().verify(&record));
    }

    #[test]
    fn test_tampered_value_fails() {
        let mut source = widget_fields(EXPECTED_HASH);
        source.insert("username", "john_doe2");

        let record = IdentityRecord::extract(&source).expect("Failed to extract");
        assert!(!verifier().verify(&record));
    }

    #[test]
    fn test_added_field_fails() {
        let mut source = widget_fields(EXPECTED_HASH);
        source.insert("last_name", "Doe");

        let record = IdentityRecord::extract(&source).expect("Failed to extract");
        assert!(!verifier().verify(&record));
    }

    #[test]
    fn test_different_secret_fails() {
        let other = HashVerifier::new("ABC:12346").expect("Failed to create verifier");
        let record =
            IdentityRecord::extract(&widget_fields(EXPECTED_HASH)).expect("Failed to extract");
        assert!(!other.verify(&record));
    }

    #[test]
    fn test_padded_key_matches_slice_key() {
        let long_secret = "123456789:".to_string() + &"x".repeat(100);
        for secret in [SECRET, long_secret.as_str()] {
            let mut mac = <HmacSha256 as KeyInit>::new_from_slice(&Sha256::digest(secret))
                .expect("Failed to key HMAC");
            mac.update(CHECK_STRING.as_bytes());
            let expected = hex::encode(mac.finalize().into_bytes());

            let verifier = HashVerifier::new(secret).expect("Failed to create verifier");
            assert_eq!(verifier.sign(CHECK_STRING), expected);
        }
    }

    #[test]
    fn test_empty_secret_rejected() {
        let result = HashVerifier::new("");
        assert!(matches!(result, Err(ConstructionError::MissingSecret)));
    }

    #[test]
    fn test_verify_fields() {
        let verifier = verifier();
        let fields = [
            ("username", "john_doe"),
            ("hash", EXPECTED_HASH),
            ("id", "123456789"),
            ("auth_date", "1642203018"),
            ("first_name", "John"),
        ];
        assert!(verifier.verify_fields(fields));

        let without_hash = [("id", "123456789"), ("first_name", "John")];
        assert!(!verifier.verify_fields(without_hash));
    }

    #[test]
    fn test_check_outcomes() {
        let verifier = verifier();

        assert!(matches!(
            verifier.check(&widget_fields(EXPECTED_HASH)),
            VerificationOutcome::Valid(_)
        ));
        assert_eq!(
            verifier.check(&widget_fields("0000")),
            VerificationOutcome::Invalid
        );

        let mut repeated = widget_fields(EXPECTED_HASH);
        repeated.append("id".to_string(), "987654321".to_string());
        assert_eq!(
            verifier.check(&repeated),
            VerificationOutcome::Malformed(MalformedFieldError::NotText {
                field: "id".to_string()
            })
        );
    }

    #[test]
    fn test_debug_redacts_key() {
        let output = format!("{:?}", verifier());
        assert!(output.contains("<redacted>"));
        assert!(!output.contains(SECRET));
    }
}
