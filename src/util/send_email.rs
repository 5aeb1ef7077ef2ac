use crate::config::config::EmailConfig;
use async_trait::async_trait;
use log::info;
use rusoto_core::Region;
use rusoto_ses::{Destination, SendTemplatedEmailRequest, Ses, SesClient};
use serde::Serialize;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("unknown AWS region: {0}")]
    InvalidRegion(String),
    #[error("no recipient address for team {0}")]
    NoRecipients(String),
    #[error("error sending mail: {0}")]
    SendError(String),
}

/// What the captain and vice-captain are told about their registration.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RegistrationNotice {
    pub team_id: String,
    pub team_name: String,
    pub church_name: String,
    pub captain_name: String,
    #[serde(skip)]
    pub recipients: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn registration_confirmed(&self, notice: &RegistrationNotice) -> Result<(), NotifyError>;
    async fn registration_rejected(&self, notice: &RegistrationNotice) -> Result<(), NotifyError>;
}

pub struct SesNotifier {
    client: SesClient,
    sender: String,
    confirmed_template: String,
    rejected_template: String,
}

impl SesNotifier {
    pub fn new(config: &EmailConfig) -> Result<Self, NotifyError> {
        let region = Region::from_str(&config.aws_region)
            .map_err(|_| NotifyError::InvalidRegion(config.aws_region.to_owned()))?;
        Ok(SesNotifier {
            client: SesClient::new(region),
            sender: config.sender.to_owned(),
            confirmed_template: config.confirmed_template.to_owned(),
            rejected_template: config.rejected_template.to_owned(),
        })
    }

    async fn send_templated(&self, template: &str, notice: &RegistrationNotice) -> Result<(), NotifyError> {
        if notice.recipients.is_empty() {
            return Err(NotifyError::NoRecipients(notice.team_id.to_owned()));
        }
        let destination = Destination {
            to_addresses: Some(notice.recipients.clone()),
            ..Default::default()
        };
        let template_data =
            serde_json::to_string(notice).map_err(|e| NotifyError::SendError(e.to_string()))?;

        let ses_request = SendTemplatedEmailRequest {
            destination,
            source: self.sender.to_owned(),
            template: template.to_string(),
            template_data,
            ..Default::default()
        };

        self.client
            .send_templated_email(ses_request)
            .await
            .map_err(|e| NotifyError::SendError(format!("{:?}", e)))?;
        Ok(())
    }
}

#[async_trait]
impl Notifier for SesNotifier {
    async fn registration_confirmed(&self, notice: &RegistrationNotice) -> Result<(), NotifyError> {
        self.send_templated(&self.confirmed_template, notice).await
    }

    async fn registration_rejected(&self, notice: &RegistrationNotice) -> Result<(), NotifyError> {
        self.send_templated(&self.rejected_template, notice).await
    }
}

/// Used when email is disabled; only writes the notification to the log.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn registration_confirmed(&self, notice: &RegistrationNotice) -> Result<(), NotifyError> {
        info!(
            "Email disabled, skipping confirmation mail for team {} to {:?}",
            notice.team_id, notice.recipients
        );
        Ok(())
    }

    async fn registration_rejected(&self, notice: &RegistrationNotice) -> Result<(), NotifyError> {
        info!(
            "Email disabled, skipping rejection mail for team {} to {:?}",
            notice.team_id, notice.recipients
        );
        Ok(())
    }
}
