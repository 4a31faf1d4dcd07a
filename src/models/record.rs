//! The encrypted record produced by a seal
//!
//! A record is a single-use envelope: one wrapped data key, one nonce and one
//! ciphertext under one master key. Once built it is never mutated.

use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::crypto::SealedPayload;
use crate::error::{VaultError, VaultResult};

/// An envelope-encrypted secret
///
/// Serialized with camelCase field names and standard padded base64 for the
/// binary fields, e.g.:
///
/// ```json
/// {
///   "masterKeyIdentifier": "alias/test-key",
///   "propertyName": "dbPassword",
///   "wrappedDataKey": "AQIDAHh...",
///   "nonce": "k2Jx0n1c5P0bN2fE",
///   "ciphertext": "8f3b...",
///   "createdAt": "2026-10-18T09:30:00Z"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawRecord")]
pub struct EncryptedRecord {
    pub(crate) master_key_identifier: String,
    pub(crate) property_name: String,
    #[serde(with = "base64_serde")]
    pub(crate) wrapped_data_key: Vec<u8>,
    #[serde(with = "base64_serde")]
    pub(crate) nonce: Vec<u8>,
    #[serde(with = "base64_serde")]
    pub(crate) ciphertext: Vec<u8>,
    pub(crate) created_at: DateTime<Utc>,
}

/// Wire shape before identity validation
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRecord {
    master_key_identifier: String,
    property_name: String,
    #[serde(with = "base64_serde")]
    wrapped_data_key: Vec<u8>,
    #[serde(with = "base64_serde")]
    nonce: Vec<u8>,
    #[serde(with = "base64_serde")]
    ciphertext: Vec<u8>,
    created_at: DateTime<Utc>,
}

impl TryFrom<RawRecord> for EncryptedRecord {
    type Error = VaultError;

    fn try_from(raw: RawRecord) -> Result<Self, Self::Error> {
        validate_identity(&raw.master_key_identifier, &raw.property_name)?;
        Ok(Self {
            master_key_identifier: raw.master_key_identifier,
            property_name: raw.property_name,
            wrapped_data_key: raw.wrapped_data_key,
            nonce: raw.nonce,
            ciphertext: raw.ciphertext,
            created_at: raw.created_at,
        })
    }
}

impl EncryptedRecord {
    /// Assemble a record from a fresh seal
    pub(crate) fn new(
        master_key_identifier: &str,
        property_name: &str,
        wrapped_data_key: Vec<u8>,
        sealed: SealedPayload,
        created_at: DateTime<Utc>,
    ) -> VaultResult<Self> {
        validate_identity(master_key_identifier, property_name)?;
        Ok(Self {
            master_key_identifier: master_key_identifier.to_string(),
            property_name: property_name.to_string(),
            wrapped_data_key,
            nonce: sealed.nonce.to_vec(),
            ciphertext: sealed.ciphertext,
            created_at,
        })
    }

    /// Identifier of the master key that wrapped the data key
    pub fn master_key_identifier(&self) -> &str {
        &self.master_key_identifier
    }

    /// Caller-supplied label for the secret
    pub fn property_name(&self) -> &str {
        &self.property_name
    }

    /// Data key ciphertext, only unwrappable by the key service
    pub fn wrapped_data_key(&self) -> &[u8] {
        &self.wrapped_data_key
    }

    pub fn nonce(&self) -> &[u8] {
        &self.nonce
    }

    /// Sealed plaintext with the GCM tag appended
    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Standard base64 of the wrapped data key
    pub fn wrapped_data_key_b64(&self) -> String {
        STANDARD.encode(&self.wrapped_data_key)
    }

    /// Standard base64 of the nonce
    pub fn nonce_b64(&self) -> String {
        STANDARD.encode(&self.nonce)
    }

    /// Standard base64 of the ciphertext
    pub fn ciphertext_b64(&self) -> String {
        STANDARD.encode(&self.ciphertext)
    }
}

/// A record compiled into a program as string literals
///
/// This is the form the Rust snippet renderer emits. The fields hold the
/// same text as the serialized record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticRecord {
    pub master_key_identifier: &'static str,
    pub property_name: &'static str,
    pub wrapped_data_key: &'static str,
    pub nonce: &'static str,
    pub ciphertext: &'static str,
    pub created_at: &'static str,
}

impl StaticRecord {
    /// Decode the literals into a validated [`EncryptedRecord`]
    pub fn decode(&self) -> VaultResult<EncryptedRecord> {
        validate_identity(self.master_key_identifier, self.property_name)?;

        let created_at = DateTime::parse_from_rfc3339(self.created_at)
            .map_err(|e| VaultError::Encoding(format!("Invalid createdAt: {}", e)))?
            .with_timezone(&Utc);

        Ok(EncryptedRecord {
            master_key_identifier: self.master_key_identifier.to_string(),
            property_name: self.property_name.to_string(),
            wrapped_data_key: decode_field("wrappedDataKey", self.wrapped_data_key)?,
            nonce: decode_field("nonce", self.nonce)?,
            ciphertext: decode_field("ciphertext", self.ciphertext)?,
            created_at,
        })
    }
}

fn decode_field(name: &str, value: &str) -> VaultResult<Vec<u8>> {
    STANDARD
        .decode(value)
        .map_err(|e| VaultError::Encoding(format!("Invalid {} encoding: {}", name, e)))
}

/// Check that a property name matches `\w+` (ASCII letters, digits, underscore)
pub fn is_valid_property_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Validate the identity fields shared by every record
pub fn validate_identity(master_key_identifier: &str, property_name: &str) -> VaultResult<()> {
    if master_key_identifier.trim().is_empty() {
        return Err(VaultError::Validation(
            "Master key identifier cannot be empty".to_string(),
        ));
    }

    if !is_valid_property_name(property_name) {
        return Err(VaultError::Validation(format!(
            "Property name '{}' must contain only letters, digits and underscores",
            property_name
        )));
    }

    Ok(())
}

mod base64_serde {
    use base64::{engine::general_purpose::STANDARD, Engine};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        STANDARD.decode(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> EncryptedRecord {
        let sealed = SealedPayload {
            nonce: [7u8; 12],
            ciphertext: vec![1, 2, 3, 4],
        };
        EncryptedRecord::new(
            "alias/test-key",
            "dbPassword",
            vec![9, 9, 9],
            sealed,
            DateTime::parse_from_rfc3339("2026-10-18T09:30:00Z")
                .unwrap()
                .with_timezone(&Utc),
        )
        .unwrap()
    }

    #[test]
    fn test_property_name_validation() {
        assert!(is_valid_property_name("dbPassword"));
        assert!(is_valid_property_name("API_KEY_2"));
        assert!(!is_valid_property_name(""));
        assert!(!is_valid_property_name("db-password"));
        assert!(!is_valid_property_name("db password"));
        assert!(!is_valid_property_name("pässword"));
    }

    #[test]
    fn test_empty_master_key_rejected() {
        let sealed = SealedPayload {
            nonce: [0u8; 12],
            ciphertext: vec![],
        };
        let result = EncryptedRecord::new("  ", "name", vec![1], sealed, Utc::now());
        assert!(matches!(result, Err(VaultError::Validation(_))));
    }

    #[test]
    fn test_serialized_field_names_and_base64() {
        let record = sample_record();
        let json: serde_json::Value = serde_json::to_value(&record).unwrap();

        assert_eq!(json["masterKeyIdentifier"], "alias/test-key");
        assert_eq!(json["propertyName"], "dbPassword");
        assert_eq!(json["wrappedDataKey"], "CQkJ");
        assert_eq!(json["nonce"], STANDARD.encode([7u8; 12]));
        assert_eq!(json["ciphertext"], "AQIDBA==");
        assert_eq!(json["createdAt"], "2026-10-18T09:30:00Z");
    }

    #[test]
    fn test_deserialize_validates_identity() {
        let mut json = serde_json::to_value(sample_record()).unwrap();
        json["propertyName"] = serde_json::Value::String("not-valid".into());

        let result: Result<EncryptedRecord, _> = serde_json::from_value(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_deserialize_rejects_bad_base64() {
        let mut json = serde_json::to_value(sample_record()).unwrap();
        json["nonce"] = serde_json::Value::String("%%%".into());

        let result: Result<EncryptedRecord, _> = serde_json::from_value(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_field_order_irrelevant() {
        let json = r#"{
            "createdAt": "2026-10-18T09:30:00Z",
            "ciphertext": "AQIDBA==",
            "nonce": "BwcHBwcHBwcHBwcH",
            "wrappedDataKey": "CQkJ",
            "propertyName": "dbPassword",
            "masterKeyIdentifier": "alias/test-key"
        }"#;
        let record: EncryptedRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record, sample_record());
    }

    #[test]
    fn test_static_record_decode() {
        let record = sample_record();
        let literal = StaticRecord {
            master_key_identifier: "alias/test-key",
            property_name: "dbPassword",
            wrapped_data_key: "CQkJ",
            nonce: "BwcHBwcHBwcHBwcH",
            ciphertext: "AQIDBA==",
            created_at: "2026-10-18T09:30:00Z",
        };
        assert_eq!(literal.decode().unwrap(), record);
    }

    #[test]
    fn test_static_record_bad_timestamp() {
        let literal = StaticRecord {
            master_key_identifier: "alias/test-key",
            property_name: "dbPassword",
            wrapped_data_key: "CQkJ",
            nonce: "BwcHBwcHBwcHBwcH",
            ciphertext: "AQIDBA==",
            created_at: "yesterday",
        };
        assert!(matches!(literal.decode(), Err(VaultError::Encoding(_))));
    }
}
