use coursepay_common::{Secret, DEFAULT_CURRENCY_CODE};
use log::*;

pub const DEFAULT_RAZORPAY_API_URL: &str = "https://api.razorpay.com/v1";

#[derive(Debug, Clone, Default)]
pub struct RazorpayConfig {
    /// The public key id. This is handed out to browsers so that they can open the checkout widget.
    pub key_id: String,
    pub key_secret: Secret<String>,
    pub webhook_secret: Secret<String>,
    pub currency: String,
    pub api_url: String,
}

impl RazorpayConfig {
    pub fn new(key_id: &str, key_secret: &str, webhook_secret: &str) -> Self {
        Self {
            key_id: key_id.to_string(),
            key_secret: Secret::new(key_secret.to_string()),
            webhook_secret: Secret::new(webhook_secret.to_string()),
            currency: DEFAULT_CURRENCY_CODE.to_string(),
            api_url: DEFAULT_RAZORPAY_API_URL.to_string(),
        }
    }

    pub fn new_from_env_or_default() -> Self {
        let key_id = std::env::var("CPS_RAZORPAY_KEY_ID").unwrap_or_else(|_| {
            warn!("🪛️ CPS_RAZORPAY_KEY_ID not set. Payment intents cannot be created.");
            String::default()
        });
        let key_secret = Secret::new(std::env::var("CPS_RAZORPAY_KEY_SECRET").unwrap_or_else(|_| {
            warn!("🪛️ CPS_RAZORPAY_KEY_SECRET not set. Payment intents cannot be created or verified.");
            String::default()
        }));
        let webhook_secret = Secret::new(std::env::var("CPS_RAZORPAY_WEBHOOK_SECRET").unwrap_or_else(|_| {
            warn!("🪛️ CPS_RAZORPAY_WEBHOOK_SECRET not set. Webhook notifications will be rejected.");
            String::default()
        }));
        let currency = std::env::var("CPS_RAZORPAY_CURRENCY").unwrap_or_else(|_| {
            info!("🪛️ CPS_RAZORPAY_CURRENCY not set, using {DEFAULT_CURRENCY_CODE} as default");
            DEFAULT_CURRENCY_CODE.to_string()
        });
        let api_url = std::env::var("CPS_RAZORPAY_API_URL").unwrap_or_else(|_| DEFAULT_RAZORPAY_API_URL.to_string());
        Self { key_id, key_secret, webhook_secret, currency, api_url }
    }

    /// Names of the settings that must be present before the server can talk to Razorpay.
    pub fn missing_settings(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.key_id.trim().is_empty() {
            missing.push("CPS_RAZORPAY_KEY_ID");
        }
        if self.key_secret.is_blank() {
            missing.push("CPS_RAZORPAY_KEY_SECRET");
        }
        if self.webhook_secret.is_blank() {
            missing.push("CPS_RAZORPAY_WEBHOOK_SECRET");
        }
        missing
    }
}
