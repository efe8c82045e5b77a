//! Outgoing mail through the EmailJS REST API.

use crate::i18n::Language;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

const SEND_TIMEOUT: Duration = Duration::from_secs(15);

/// Template parameters shared by suggestions and subscriptions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MailParams {
    pub place_name: String,
    pub place_address: String,
    pub place_link: String,
}

/// Something that can deliver a [`MailParams`] message.
pub trait MailDispatcher: Send + Sync {
    fn send(&self, params: &MailParams) -> Result<(), MailError>;
}

/// Delivery failure, bucketed the way the user is told about it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MailError {
    #[error("mail service rejected the data: {0}")]
    InvalidData(String),
    #[error("mail service configuration: {0}")]
    Configuration(String),
    #[error("mail delivery failed: {0}")]
    Failed(String),
}

impl MailError {
    /// 422 is bad input, 400 a misconfigured account; anything else is generic.
    pub fn from_status(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        match status {
            422 => Self::InvalidData(body),
            400 => Self::Configuration(body),
            _ => Self::Failed(format!("HTTP {}: {}", status, body)),
        }
    }

    pub fn user_message(&self, lang: Language) -> &'static str {
        let m = lang.messages();
        match self {
            Self::InvalidData(_) => m.mail_invalid_data,
            Self::Configuration(_) => m.mail_configuration,
            Self::Failed(_) => m.mail_failed,
        }
    }
}

/// EmailJS account settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailJsConfig {
    pub endpoint: String,
    pub service_id: String,
    pub template_id: String,
    pub public_key: String,
}

impl Default for EmailJsConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.emailjs.com/api/v1.0/email/send".into(),
            service_id: String::new(),
            template_id: String::new(),
            public_key: String::new(),
        }
    }
}

impl EmailJsConfig {
    pub fn is_complete(&self) -> bool {
        ![&self.endpoint, &self.service_id, &self.template_id, &self.public_key]
            .iter()
            .any(|s| s.trim().is_empty())
    }
}

#[derive(Serialize)]
struct SendRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    template_params: &'a MailParams,
}

/// Production dispatcher.
pub struct EmailJs {
    config: EmailJsConfig,
}

impl EmailJs {
    pub fn new(config: EmailJsConfig) -> Self {
        Self { config }
    }
}

impl MailDispatcher for EmailJs {
    fn send(&self, params: &MailParams) -> Result<(), MailError> {
        if !self.config.is_complete() {
            return Err(MailError::Configuration("EmailJS ids are not set".into()));
        }

        let request = SendRequest {
            service_id: &self.config.service_id,
            template_id: &self.config.template_id,
            user_id: &self.config.public_key,
            template_params: params,
        };

        match ureq::post(&self.config.endpoint)
            .timeout(SEND_TIMEOUT)
            .send_json(&request)
        {
            Ok(_) => {
                info!(place = %params.place_name, "mail sent");
                Ok(())
            }
            Err(ureq::Error::Status(status, response)) => {
                let body = response.into_string().unwrap_or_default();
                warn!(status, body = %body, "mail rejected");
                Err(MailError::from_status(status, body))
            }
            Err(e) => {
                warn!(error = %e, "mail transport error");
                Err(MailError::Failed(e.to_string()))
            }
        }
    }
}
