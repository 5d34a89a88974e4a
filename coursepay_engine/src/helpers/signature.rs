//! HMAC-SHA256 signature checks for both payment notification paths.
//!
//! * The browser callback is signed over `"{gateway_order_id}|{payment_id}"` with the API key secret.
//! * Webhooks are signed over the raw request body, byte for byte, with the separate webhook secret.
//!
//! Signatures are lower-case hex. Comparison is constant-time via [`Mac::verify_slice`]. A signature that is not valid
//! hex, or has the wrong length, is simply a mismatch. The only error is a missing secret, which is a configuration
//! problem rather than a bad request.
use coursepay_common::Secret;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("The signing secret has not been configured")]
    MissingSecret,
}

fn new_mac(secret: &Secret<String>) -> Result<HmacSha256, SignatureError> {
    if secret.is_blank() {
        return Err(SignatureError::MissingSecret);
    }
    // HMAC accepts keys of any length, so this only fails on an empty key, which is excluded above.
    HmacSha256::new_from_slice(secret.reveal().as_bytes()).map_err(|_| SignatureError::MissingSecret)
}

fn verify(message: &[u8], signature: &str, secret: &Secret<String>) -> Result<bool, SignatureError> {
    let mut mac = new_mac(secret)?;
    let Ok(provided) = hex::decode(signature.trim()) else {
        return Ok(false);
    };
    mac.update(message);
    Ok(mac.verify_slice(&provided).is_ok())
}

/// Hex-encoded HMAC-SHA256 of `message`.
pub fn sign_message(message: &[u8], secret: &Secret<String>) -> Result<String, SignatureError> {
    let mut mac = new_mac(secret)?;
    mac.update(message);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

pub fn verify_payment_signature(
    gateway_order_id: &str,
    payment_id: &str,
    signature: &str,
    secret: &Secret<String>,
) -> Result<bool, SignatureError> {
    let message = format!("{gateway_order_id}|{payment_id}");
    verify(message.as_bytes(), signature, secret)
}

pub fn verify_webhook_signature(
    raw_body: &[u8],
    signature: &str,
    secret: &Secret<String>,
) -> Result<bool, SignatureError> {
    verify(raw_body, signature, secret)
}
