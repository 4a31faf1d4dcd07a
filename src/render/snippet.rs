//! Rust source snippet renderer

use chrono::SecondsFormat;

use crate::models::EncryptedRecord;

pub const SNIPPET_BEGIN: &str = "----- BEGIN SNIPPET -----";
pub const SNIPPET_END: &str = "-----  END SNIPPET  -----";

/// Turn a property name into a SCREAMING_SNAKE_CASE static name
///
/// `dbPassword` becomes `DB_PASSWORD` and `myHTTPKey` becomes `MY_HTTP_KEY`.
/// A leading digit gets an underscore prefix so the result is an identifier.
pub fn static_name(property_name: &str) -> String {
    let chars: Vec<char> = property_name.chars().collect();
    let mut out = String::with_capacity(chars.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_ascii_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_ascii_lowercase());
            let boundary = prev.is_ascii_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_ascii_uppercase() && next_is_lower);
            if boundary && !out.ends_with('_') {
                out.push('_');
            }
        }
        out.push(c.to_ascii_uppercase());
    }

    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

/// Render a record as a `StaticRecord` declaration
pub fn render_snippet(record: &EncryptedRecord) -> String {
    let name = static_name(record.property_name());
    let created_at = record
        .created_at()
        .to_rfc3339_opts(SecondsFormat::AutoSi, true);

    let mut out = String::new();
    out.push_str(SNIPPET_BEGIN);
    out.push('\n');
    out.push_str(&format!(
        "// {} sealed under {} at {}\n",
        record.property_name(),
        record.master_key_identifier(),
        created_at
    ));
    out.push_str(&format!(
        "pub static {}: kms_vault::StaticRecord = kms_vault::StaticRecord {{\n",
        name
    ));
    for (field, value) in [
        ("master_key_identifier", record.master_key_identifier().to_string()),
        ("property_name", record.property_name().to_string()),
        ("wrapped_data_key", record.wrapped_data_key_b64()),
        ("nonce", record.nonce_b64()),
        ("ciphertext", record.ciphertext_b64()),
        ("created_at", created_at.clone()),
    ] {
        out.push_str(&format!("    {}: {:?},\n", field, value));
    }
    out.push_str("};\n");
    out.push('\n');
    out.push_str(&format!(
        "// let secret = service.unseal_secret(&{}.decode()?).await?;\n",
        name
    ));
    out.push_str(SNIPPET_END);
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::SealedPayload;
    use chrono::{DateTime, Utc};

    fn record(master: &str, name: &str) -> EncryptedRecord {
        EncryptedRecord::new(
            master,
            name,
            vec![9, 9, 9],
            SealedPayload {
                nonce: [7u8; 12],
                ciphertext: vec![1, 2, 3, 4],
            },
            DateTime::parse_from_rfc3339("2026-10-18T09:30:00Z")
                .unwrap()
                .with_timezone(&Utc),
        )
        .unwrap()
    }

    #[test]
    fn test_static_name() {
        assert_eq!(static_name("dbPassword"), "DB_PASSWORD");
        assert_eq!(static_name("API_KEY_2"), "API_KEY_2");
        assert_eq!(static_name("myHTTPKey"), "MY_HTTP_KEY");
        assert_eq!(static_name("token"), "TOKEN");
        assert_eq!(static_name("v2Secret"), "V2_SECRET");
        assert_eq!(static_name("snake_Case"), "SNAKE_CASE");
        assert_eq!(static_name("2fa"), "_2FA");
    }

    #[test]
    fn test_snippet_layout() {
        let snippet = render_snippet(&record("alias/test-key", "dbPassword"));
        let lines: Vec<&str> = snippet.lines().collect();

        assert_eq!(lines.first(), Some(&SNIPPET_BEGIN));
        assert_eq!(lines.last(), Some(&SNIPPET_END));
        assert!(snippet.contains(
            "pub static DB_PASSWORD: kms_vault::StaticRecord = kms_vault::StaticRecord {"
        ));
        assert!(snippet.contains("    master_key_identifier: \"alias/test-key\",\n"));
        assert!(snippet.contains("    wrapped_data_key: \"CQkJ\",\n"));
        assert!(snippet.contains("    nonce: \"BwcHBwcHBwcHBwcH\",\n"));
        assert!(snippet.contains("    ciphertext: \"AQIDBA==\",\n"));
        assert!(snippet.contains("    created_at: \"2026-10-18T09:30:00Z\",\n"));
        assert!(snippet.contains("DB_PASSWORD.decode()"));
    }

    #[test]
    fn test_snippet_escapes_literals() {
        let snippet = render_snippet(&record("arn:\"quoted\"\\key", "name"));
        assert!(snippet.contains(r#"master_key_identifier: "arn:\"quoted\"\\key","#));
    }
}
