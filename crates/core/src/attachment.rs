//! Attachment key and size rules for purchase-request files.
//!
//! Objects are keyed `{request_id}/{unix_millis}-{filename}` and exposed
//! under a public base URL.

use crate::error::CoreError;

/// Upload size cap (5 MiB).
pub const MAX_ATTACHMENT_BYTES: usize = 5 * 1024 * 1024;

/// Filename used when the client sends none or it sanitizes to nothing.
const FALLBACK_FILENAME: &str = "attachment";

/// Validate an attachment's size.
pub fn validate_attachment_size(len: usize) -> Result<(), CoreError> {
    if len == 0 {
        return Err(CoreError::Validation("Attachment is empty".into()));
    }
    if len > MAX_ATTACHMENT_BYTES {
        return Err(CoreError::Validation(format!(
            "File size exceeds 5MB limit ({len} bytes)"
        )));
    }
    Ok(())
}

/// Reduce a client-supplied filename to a safe single path segment.
///
/// Directory components are dropped and any character outside
/// `[A-Za-z0-9._-]` becomes `_`.
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or("");
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let trimmed = cleaned.trim_start_matches('.');
    if trimmed.is_empty() {
        FALLBACK_FILENAME.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Build the storage key for an attachment.
pub fn attachment_key(request_id: &str, unix_millis: i64, filename: &str) -> String {
    format!("{request_id}/{unix_millis}-{}", sanitize_filename(filename))
}

/// Check that a key is a relative path without traversal.
pub fn validate_key(key: &str) -> Result<(), CoreError> {
    let bad = key.is_empty()
        || key.starts_with('/')
        || key.contains('\\')
        || key.split('/').any(|seg| seg.is_empty() || seg == "." || seg == "..");
    if bad {
        return Err(CoreError::Validation(format!("Invalid attachment key '{key}'")));
    }
    Ok(())
}

/// Public URL for `key` under `base_url`.
pub fn public_url(base_url: &str, key: &str) -> String {
    format!("{}/{key}", base_url.trim_end_matches('/'))
}

/// Recover the storage key from a URL produced by [`public_url`].
pub fn key_from_public_url<'a>(base_url: &str, url: &'a str) -> Option<&'a str> {
    url.strip_prefix(base_url.trim_end_matches('/'))
        .and_then(|rest| rest.strip_prefix('/'))
        .filter(|key| validate_key(key).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_limits() {
        assert!(validate_attachment_size(0).is_err());
        assert!(validate_attachment_size(1).is_ok());
        assert!(validate_attachment_size(MAX_ATTACHMENT_BYTES).is_ok());
        assert!(validate_attachment_size(MAX_ATTACHMENT_BYTES + 1).is_err());
    }

    #[test]
    fn sanitize_strips_directories_and_odd_characters() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("C:\\docs\\quote 1.pdf"), "quote_1.pdf");
        assert_eq!(sanitize_filename("..."), "attachment");
        assert_eq!(sanitize_filename(""), "attachment");
    }

    #[test]
    fn key_layout() {
        assert_eq!(
            attachment_key("PR0042", 1_700_000_000_000, "invoice.pdf"),
            "PR0042/1700000000000-invoice.pdf"
        );
    }

    #[test]
    fn traversal_keys_are_invalid() {
        assert!(validate_key("PR0001/a.pdf").is_ok());
        assert!(validate_key("../secret").is_err());
        assert!(validate_key("/abs/path").is_err());
        assert!(validate_key("PR0001//a.pdf").is_err());
        assert!(validate_key("").is_err());
    }

    #[test]
    fn public_url_round_trips_to_key() {
        let base = "http://localhost:3000/files/";
        let url = public_url(base, "PR0001/1-a.pdf");
        assert_eq!(url, "http://localhost:3000/files/PR0001/1-a.pdf");
        assert_eq!(key_from_public_url(base, &url), Some("PR0001/1-a.pdf"));
        assert_eq!(key_from_public_url(base, "https://elsewhere/x"), None);
    }
}
