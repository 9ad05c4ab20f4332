use base64::{engine::general_purpose::URL_SAFE, Engine as _};
use serde::Deserialize;
use tracing::warn;

use crate::auth::error::AuthError;

/// Claims we read out of the Google credential's payload segment.
#[derive(Debug, Deserialize)]
pub struct GoogleClaims {
    pub email: Option<String>,
    pub name: Option<String>,
    /// Google's stable user id; extracted but not yet used.
    pub sub: Option<String>,
}

/// Decodes the payload of a Google ID token (compact JWS layout:
/// `header.payload.signature`, base64url segments).
///
/// The signature, issuer, and audience are NOT verified; the payload
/// is trusted as-is. Known security gap: a hardened deployment must
/// fetch Google's public keys and verify the signature plus
/// `aud`/`iss`/`exp` before trusting any claim in here.
pub fn decode_credential(credential: &str) -> Result<GoogleClaims, AuthError> {
    let parts: Vec<&str> = credential.split('.').collect();
    if parts.len() != 3 {
        return Err(AuthError::MalformedCredential);
    }

    // base64url without padding is the common on-wire form; restore
    // padding to a multiple of 4 before decoding.
    let mut payload = parts[1].to_string();
    while payload.len() % 4 != 0 {
        payload.push('=');
    }
    let decoded = URL_SAFE.decode(payload.as_bytes()).map_err(|e| {
        warn!(error = %e, "google credential payload is not valid base64url");
        AuthError::MalformedCredential
    })?;

    serde_json::from_slice(&decoded).map_err(|e| {
        warn!(error = %e, "google credential payload is not a JSON object");
        AuthError::MalformedCredential
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;

    /// Builds a structurally valid credential around the given payload
    /// JSON. The signature segment is junk, which is exactly what the
    /// decode-only path ignores.
    pub(crate) fn fake_credential(payload_json: &str) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"RS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(payload_json.as_bytes());
        format!("{header}.{payload}.signature")
    }

    #[test]
    fn decodes_email_name_and_sub() {
        let cred = fake_credential(
            r#"{"email":"b@y.com","name":"Bob","sub":"10769150350006150715113082367"}"#,
        );
        let claims = decode_credential(&cred).expect("decode");
        assert_eq!(claims.email.as_deref(), Some("b@y.com"));
        assert_eq!(claims.name.as_deref(), Some("Bob"));
        assert!(claims.sub.is_some());
    }

    #[test]
    fn tolerates_unpadded_payload_segments() {
        // 10-byte payload encodes to 14 chars unpadded, forcing the
        // padding branch.
        let cred = fake_credential(r#"{"email":"a@b.c"}"#);
        assert_ne!(cred.split('.').nth(1).unwrap().len() % 4, 0);
        let claims = decode_credential(&cred).expect("decode");
        assert_eq!(claims.email.as_deref(), Some("a@b.c"));
    }

    #[test]
    fn rejects_wrong_segment_count() {
        for cred in ["", "only-one", "two.segments", "a.b.c.d"] {
            assert!(matches!(
                decode_credential(cred),
                Err(AuthError::MalformedCredential)
            ));
        }
    }

    #[test]
    fn rejects_non_base64_payload() {
        assert!(matches!(
            decode_credential("aGVhZGVy.!!not-base64!!.c2ln"),
            Err(AuthError::MalformedCredential)
        ));
    }

    #[test]
    fn rejects_non_json_payload() {
        let payload = URL_SAFE_NO_PAD.encode(b"plain text, not json");
        let cred = format!("aGVhZGVy.{payload}.c2ln");
        assert!(matches!(
            decode_credential(&cred),
            Err(AuthError::MalformedCredential)
        ));
    }
}
