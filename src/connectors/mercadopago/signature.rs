//! Verification of the `x-signature` header sent with gateway notifications.
//!
//! The header reads `ts=<unix seconds>,v1=<hex hmac>`; the HMAC-SHA256 is
//! computed with the webhook secret over the manifest
//! `id:<data.id>;request-id:<x-request-id>;ts:<ts>;`, leaving out the parts
//! that were not sent.

use hmac::{Hmac, Mac};
use sha2::Sha256;

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum SignatureError {
    #[error("x-signature header is missing")]
    Missing,
    #[error("x-signature header is malformed")]
    Malformed,
    #[error("signature mismatch")]
    Mismatch,
}

#[derive(Debug, PartialEq, Eq)]
struct SignatureHeader<'a> {
    ts: &'a str,
    v1: &'a str,
}

fn parse_header(header: &str) -> Result<SignatureHeader<'_>, SignatureError> {
    let mut ts = None;
    let mut v1 = None;
    for part in header.split(',') {
        match part.trim().split_once('=') {
            Some(("ts", value)) => ts = Some(value.trim()),
            Some(("v1", value)) => v1 = Some(value.trim()),
            _ => {}
        }
    }

    match (ts, v1) {
        (Some(ts), Some(v1)) if !ts.is_empty() && !v1.is_empty() => Ok(SignatureHeader { ts, v1 }),
        _ => Err(SignatureError::Malformed),
    }
}

pub fn manifest(data_id: Option<&str>, request_id: Option<&str>, ts: &str) -> String {
    let mut manifest = String::new();
    if let Some(id) = data_id.filter(|id| !id.is_empty()) {
        // alphanumeric ids are signed lowercased
        manifest.push_str(&format!("id:{};", id.to_lowercase()));
    }
    if let Some(request_id) = request_id.filter(|r| !r.is_empty()) {
        manifest.push_str(&format!("request-id:{};", request_id));
    }
    manifest.push_str(&format!("ts:{};", ts));
    manifest
}

fn keyed(secret: &str, manifest: &str) -> Result<Hmac<Sha256>, SignatureError> {
    let mut mac =
        Hmac::<Sha256>::new_from_slice(secret.as_bytes()).map_err(|_| SignatureError::Malformed)?;
    mac.update(manifest.as_bytes());
    Ok(mac)
}

pub fn sign(secret: &str, manifest: &str) -> Result<String, SignatureError> {
    Ok(hex::encode(keyed(secret, manifest)?.finalize().into_bytes()))
}

/// Check a notification against the webhook secret
pub fn verify(
    secret: &str,
    header: Option<&str>,
    request_id: Option<&str>,
    data_id: Option<&str>,
) -> Result<(), SignatureError> {
    let header = parse_header(header.ok_or(SignatureError::Missing)?)?;
    let received = hex::decode(header.v1).map_err(|_| SignatureError::Malformed)?;

    keyed(secret, &manifest(data_id, request_id, header.ts))?
        .verify_slice(&received)
        .map_err(|_| SignatureError::Mismatch)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "webhook-secret";

    #[test]
    fn manifest_skips_absent_parts() {
        assert_eq!(
            manifest(Some("123"), Some("req-1"), "1700000000"),
            "id:123;request-id:req-1;ts:1700000000;"
        );
        assert_eq!(manifest(None, Some("req-1"), "1"), "request-id:req-1;ts:1;");
        assert_eq!(manifest(Some("ABC"), None, "1"), "id:abc;ts:1;");
    }

    #[test]
    fn accepts_valid_signature() {
        let v1 = sign(SECRET, "id:123;request-id:req-1;ts:1700000000;").unwrap();
        let header = format!("ts=1700000000,v1={}", v1);

        assert_eq!(verify(SECRET, Some(&header), Some("req-1"), Some("123")), Ok(()));
    }

    #[test]
    fn rejects_tampered_id() {
        let v1 = sign(SECRET, "id:123;request-id:req-1;ts:1700000000;").unwrap();
        let header = format!("ts=1700000000, v1={}", v1);

        assert_eq!(
            verify(SECRET, Some(&header), Some("req-1"), Some("124")),
            Err(SignatureError::Mismatch)
        );
    }

    #[test]
    fn hex_case_does_not_matter() {
        let v1 = sign(SECRET, "id:123;ts:1;").unwrap().to_uppercase();
        let header = format!("ts=1,v1={}", v1);

        assert_eq!(verify(SECRET, Some(&header), None, Some("123")), Ok(()));
    }

    #[test]
    fn rejects_non_hex_or_truncated_digest() {
        let v1 = sign(SECRET, "id:123;ts:1;").unwrap();

        assert_eq!(
            verify(SECRET, Some("ts=1,v1=not-hex"), None, Some("123")),
            Err(SignatureError::Malformed)
        );
        assert_eq!(
            verify(SECRET, Some(&format!("ts=1,v1={}", &v1[..32])), None, Some("123")),
            Err(SignatureError::Mismatch)
        );
    }

    #[test]
    fn rejects_missing_or_malformed_header() {
        assert_eq!(verify(SECRET, None, None, Some("1")), Err(SignatureError::Missing));
        assert_eq!(
            verify(SECRET, Some("v1=abc"), None, Some("1")),
            Err(SignatureError::Malformed)
        );
    }
}
