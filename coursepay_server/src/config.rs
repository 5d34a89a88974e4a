use std::env;

use coursepay_common::Secret;
use log::*;
use razorpay_tools::RazorpayConfig;

use crate::errors::ServerError;

const DEFAULT_CPS_HOST: &str = "127.0.0.1";
const DEFAULT_CPS_PORT: u16 = 8360;
const DEFAULT_DATABASE_URL: &str = "sqlite://data/coursepay.db";
pub const DEFAULT_SENDER_NAME: &str = "MiniCourse Admin";

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub auth: AuthConfig,
    pub razorpay: RazorpayConfig,
    pub email: EmailConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_CPS_HOST.to_string(),
            port: DEFAULT_CPS_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            auth: AuthConfig::default(),
            razorpay: RazorpayConfig::default(),
            email: EmailConfig::default(),
        }
    }
}

/// Verifies access tokens issued by the account service. Both sides share the same HS256 secret.
#[derive(Clone, Debug, Default)]
pub struct AuthConfig {
    pub jwt_secret: Secret<String>,
}

impl AuthConfig {
    pub fn new(secret: &str) -> Self {
        Self { jwt_secret: Secret::new(secret.to_string()) }
    }

    pub fn from_env_or_default() -> Self {
        let jwt_secret = env::var("CPS_JWT_SECRET").unwrap_or_else(|_| {
            error!("🪛️ CPS_JWT_SECRET is not set. No access tokens can be verified.");
            String::default()
        });
        Self { jwt_secret: Secret::new(jwt_secret) }
    }
}

/// SendGrid settings. E-mail is optional: without an API key and a sender address, no confirmations are sent.
#[derive(Clone, Debug)]
pub struct EmailConfig {
    pub sendgrid_api_key: Secret<String>,
    pub from_address: Option<String>,
    pub sender_name: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self { sendgrid_api_key: Secret::default(), from_address: None, sender_name: DEFAULT_SENDER_NAME.to_string() }
    }
}

impl EmailConfig {
    pub fn from_env_or_default() -> Self {
        let sendgrid_api_key = Secret::new(env::var("CPS_SENDGRID_API_KEY").unwrap_or_default());
        let from_address = env::var("CPS_EMAIL_FROM").ok().filter(|s| !s.trim().is_empty());
        let sender_name = env::var("CPS_EMAIL_SENDER_NAME")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SENDER_NAME.to_string());
        let config = Self { sendgrid_api_key, from_address, sender_name };
        if !config.is_enabled() {
            warn!(
                "🪛️ CPS_SENDGRID_API_KEY and CPS_EMAIL_FROM must both be set to send payment confirmations. E-mail is \
                 disabled."
            );
        }
        config
    }

    pub fn is_enabled(&self) -> bool {
        !self.sendgrid_api_key.is_blank() && self.from_address.is_some()
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("CPS_HOST").ok().unwrap_or_else(|| DEFAULT_CPS_HOST.into());
        let port = env::var("CPS_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for CPS_PORT. {e} Using the default, {DEFAULT_CPS_PORT}, instead."
                    );
                    DEFAULT_CPS_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_CPS_PORT);
        let database_url = env::var("CPS_DATABASE_URL").ok().unwrap_or_else(|| {
            warn!("🪛️ CPS_DATABASE_URL is not set. Using {DEFAULT_DATABASE_URL}.");
            DEFAULT_DATABASE_URL.to_string()
        });
        let auth = AuthConfig::from_env_or_default();
        let razorpay = RazorpayConfig::new_from_env_or_default();
        let email = EmailConfig::from_env_or_default();
        Self { host, port, database_url, auth, razorpay, email }
    }

    /// Names of the required settings that have not been provided.
    pub fn missing_settings(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.auth.jwt_secret.is_blank() {
            missing.push("CPS_JWT_SECRET");
        }
        missing.extend(self.razorpay.missing_settings());
        missing
    }

    /// The server refuses to start without credentials, rather than failing on the first payment.
    pub fn validate(&self) -> Result<(), ServerError> {
        let missing = self.missing_settings();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ServerError::ConfigurationError(format!("Missing required settings: {}", missing.join(", "))))
        }
    }
}
