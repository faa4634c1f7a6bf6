//! `X-Line-Signature` verification

use base64::Engine;
use ring::hmac;

use crate::error::{Error, Result};

/// Checks webhook bodies against base64(HMAC-SHA256(channel secret, body))
pub struct SignatureVerifier {
    key: hmac::Key,
}

impl SignatureVerifier {
    pub fn new(channel_secret: &str) -> Self {
        Self {
            key: hmac::Key::new(hmac::HMAC_SHA256, channel_secret.as_bytes()),
        }
    }

    /// Verify the raw body against the header value in constant time
    pub fn verify(&self, body: &[u8], signature: &str) -> Result<()> {
        let expected = base64::engine::general_purpose::STANDARD
            .decode(signature.trim())
            .map_err(|_| Error::SignatureValidation("signature is not valid base64".to_string()))?;

        hmac::verify(&self.key, body, &expected)
            .map_err(|_| Error::SignatureValidation("signature does not match body".to_string()))
    }

    /// Signature for a body, as the platform would send it
    pub fn sign(&self, body: &[u8]) -> String {
        let tag = hmac::sign(&self.key, body);
        base64::engine::general_purpose::STANDARD.encode(tag.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &[u8] = br#"{"destination":"U1","events":[]}"#;

    #[test]
    fn test_accepts_own_signature() {
        let verifier = SignatureVerifier::new("channel-secret");
        let signature = verifier.sign(BODY);
        assert!(verifier.verify(BODY, &signature).is_ok());
    }

    #[test]
    fn test_known_vector() {
        // RFC 4231 test case 2
        let verifier = SignatureVerifier::new("Jefe");
        assert_eq!(
            verifier.sign(b"what do ya want for nothing?"),
            "W9zBRr9gdU5qBCQmCJV1x1oAPwidJzmDnexYuWTsOEM="
        );
    }

    #[test]
    fn test_rejects_tampered_body() {
        let verifier = SignatureVerifier::new("channel-secret");
        let signature = verifier.sign(BODY);
        let tampered = br#"{"destination":"U2","events":[]}"#;
        assert!(matches!(
            verifier.verify(tampered, &signature),
            Err(Error::SignatureValidation(_))
        ));
    }

    #[test]
    fn test_rejects_wrong_secret_and_garbage() {
        let signature = SignatureVerifier::new("other-secret").sign(BODY);
        let verifier = SignatureVerifier::new("channel-secret");
        assert!(verifier.verify(BODY, &signature).is_err());
        assert!(verifier.verify(BODY, "%%%not-base64").is_err());
        assert!(verifier.verify(BODY, "").is_err());
    }
}
