//! HMAC-SHA256 webhook signature verification, per
//! `original_source/backend/webhook_handler.py`'s `WebhookSignatureVerifier`
//! and `crates/integrations/src/webhooks.rs`'s `verify_webhook_signature`.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use tracing::warn;

type HmacSha256 = Hmac<Sha256>;

const SIGNATURE_PREFIX: &str = "sha256=";

/// Verify a GitHub `X-Hub-Signature-256` header against `body` and
/// `secret`. When `secret` is `None` verification is skipped (development
/// mode) and a warning is logged; this mirrors the fail-open behavior of
/// the original handler rather than rejecting unconfigured deployments.
#[must_use]
pub fn verify(body: &[u8], signature_header: Option<&str>, secret: Option<&str>) -> bool {
    let Some(secret) = secret else {
        warn!("GITHUB_WEBHOOK_SECRET not configured, skipping signature verification");
        return true;
    };

    let Some(signature_header) = signature_header else {
        warn!("webhook request missing X-Hub-Signature-256 header");
        return false;
    };

    let Some(hex_signature) = signature_header.strip_prefix(SIGNATURE_PREFIX) else {
        warn!(signature = signature_header, "webhook signature missing sha256= prefix");
        return false;
    };

    let Ok(signature_bytes) = hex::decode(hex_signature) else {
        warn!("webhook signature is not valid hex");
        return false;
    };

    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        warn!("webhook secret is not a valid HMAC key");
        return false;
    };
    mac.update(body);
    let computed = mac.finalize().into_bytes();

    computed.as_slice().ct_eq(&signature_bytes).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign(body: &[u8], secret: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(body);
        format!("sha256={}", hex::encode(mac.finalize().into_bytes()))
    }

    #[test]
    fn accepts_matching_signature() {
        let body = b"{\"action\":\"opened\"}";
        let signature = sign(body, "s3cr3t");
        assert!(verify(body, Some(&signature), Some("s3cr3t")));
    }

    #[test]
    fn rejects_mismatched_signature() {
        let body = b"{\"action\":\"opened\"}";
        let signature = sign(body, "wrong-secret");
        assert!(!verify(body, Some(&signature), Some("s3cr3t")));
    }

    #[test]
    fn rejects_missing_header() {
        let body = b"{}";
        assert!(!verify(body, None, Some("s3cr3t")));
    }

    #[test]
    fn rejects_non_hex_signature() {
        let body = b"{}";
        assert!(!verify(body, Some("sha256=not-hex"), Some("s3cr3t")));
    }

    #[test]
    fn skips_verification_when_no_secret_configured() {
        assert!(verify(b"anything", None, None));
    }
}
