use std::sync::Arc;

use coursepay_engine::notifications::{EmailError, EmailMessage, EmailTransport};
use log::*;
use reqwest::{Client, StatusCode};
use serde::Serialize;

use crate::{config::EmailConfig, errors::ServerError};

pub const SENDGRID_MAIL_SEND_URL: &str = "https://api.sendgrid.com/v3/mail/send";

/// [`EmailTransport`] over the SendGrid v3 Mail Send API.
#[derive(Clone)]
pub struct SendGridMailer {
    config: EmailConfig,
    url: String,
    client: Arc<Client>,
}

#[derive(Debug, Serialize)]
struct MailAddress<'a> {
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct Personalization<'a> {
    to: Vec<MailAddress<'a>>,
}

#[derive(Debug, Serialize)]
struct MailContent<'a> {
    #[serde(rename = "type")]
    content_type: &'static str,
    value: &'a str,
}

#[derive(Debug, Serialize)]
struct MailSendRequest<'a> {
    personalizations: Vec<Personalization<'a>>,
    from: MailAddress<'a>,
    subject: &'a str,
    content: Vec<MailContent<'a>>,
}

impl SendGridMailer {
    pub fn new(config: EmailConfig) -> Result<Self, ServerError> {
        Self::new_with_url(config, SENDGRID_MAIL_SEND_URL)
    }

    pub fn new_with_url(config: EmailConfig, url: &str) -> Result<Self, ServerError> {
        let client = Client::builder().build().map_err(|e| ServerError::InitializeError(e.to_string()))?;
        Ok(Self { config, url: url.to_string(), client: Arc::new(client) })
    }

    fn request_body<'a>(&'a self, from: &'a str, message: &'a EmailMessage) -> MailSendRequest<'a> {
        MailSendRequest {
            personalizations: vec![Personalization { to: vec![MailAddress { email: &message.to, name: None }] }],
            from: MailAddress { email: from, name: Some(&self.config.sender_name) },
            subject: &message.subject,
            content: vec![
                MailContent { content_type: "text/plain", value: &message.text },
                MailContent { content_type: "text/html", value: &message.html },
            ],
        }
    }
}

impl EmailTransport for SendGridMailer {
    fn is_enabled(&self) -> bool {
        self.config.is_enabled()
    }

    fn sender_name(&self) -> String {
        self.config.sender_name.clone()
    }

    async fn send(&self, message: EmailMessage) -> Result<(), EmailError> {
        let from = match (&self.config.from_address, self.config.sendgrid_api_key.is_blank()) {
            (Some(from), false) => from.as_str(),
            _ => return Err(EmailError::NotConfigured),
        };
        let body = self.request_body(from, &message);
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(self.config.sendgrid_api_key.reveal())
            .json(&body)
            .send()
            .await
            .map_err(|e| EmailError::TransportError(e.without_url().to_string()))?;
        let status = response.status();
        if status.is_success() {
            debug!("📧️ SendGrid accepted the message \"{}\" ({status})", message.subject);
            return Ok(());
        }
        let detail = response.text().await.unwrap_or_default();
        warn!("📧️ SendGrid rejected the message \"{}\" ({status}). {detail}", message.subject);
        Err(rejection(status, &detail))
    }
}

fn rejection(status: StatusCode, detail: &str) -> EmailError {
    match status {
        StatusCode::UNAUTHORIZED => EmailError::Rejected("SendGrid rejected the API key".to_string()),
        StatusCode::FORBIDDEN => EmailError::Rejected(
            "SendGrid refused to send the message. Check that the API key has Mail Send permission and that the \
             sender address is verified"
                .to_string(),
        ),
        _ if detail.trim().is_empty() => EmailError::Rejected(format!("SendGrid responded with {status}")),
        _ => EmailError::Rejected(format!("SendGrid responded with {status}: {}", detail.trim())),
    }
}
