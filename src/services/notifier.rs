// Envoi du token de récupération par email (SMTP)

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::config::SmtpConfig;
use crate::error::{AppError, AppResult};

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_recover_token(&self, email: &str, token: &str) -> AppResult<()>;
}

pub struct EmailNotifier {
    transport: Option<(AsyncSmtpTransport<Tokio1Executor>, Mailbox)>,
    recover_uri: String,
    token_minutes: i64,
}

impl EmailNotifier {
    /// Sans config SMTP le notifier existe quand même, mais chaque envoi échoue
    pub fn new(smtp: Option<&SmtpConfig>, recover_uri: &str, token_minutes: i64) -> AppResult<Self> {
        let transport = match smtp {
            Some(config) => {
                let transport = AsyncSmtpTransport::<Tokio1Executor>::from_url(&config.url)
                    .map_err(|e| AppError::Config(format!("Invalid SMTP_URL: {}", e)))?
                    .build();
                let from = config
                    .from_address
                    .parse::<Mailbox>()
                    .map_err(|e| AppError::Config(format!("Invalid MAIL_FROM: {}", e)))?;
                Some((transport, from))
            }
            None => {
                tracing::warn!("SMTP not configured, recover emails will not be delivered");
                None
            }
        };

        Ok(Self {
            transport,
            recover_uri: recover_uri.to_string(),
            token_minutes,
        })
    }
}

pub fn recover_email_body(recover_uri: &str, token: &str, token_minutes: i64) -> String {
    format!(
        "Access the link to set a new password:\n\n{}{}\n\nValid for {} minutes.",
        recover_uri, token, token_minutes
    )
}

#[async_trait]
impl Notifier for EmailNotifier {
    async fn send_recover_token(&self, email: &str, token: &str) -> AppResult<()> {
        let (transport, from) = self
            .transport
            .as_ref()
            .ok_or_else(|| AppError::Notifier("SMTP not configured".to_string()))?;

        let to = email
            .parse::<Mailbox>()
            .map_err(|e| AppError::Notifier(format!("Invalid recipient: {}", e)))?;

        let message = Message::builder()
            .from(from.clone())
            .to(to)
            .subject("Password recovery")
            .header(ContentType::TEXT_PLAIN)
            .body(recover_email_body(&self.recover_uri, token, self.token_minutes))
            .map_err(|e| AppError::Notifier(format!("Failed to build email: {}", e)))?;

        transport
            .send(message)
            .await
            .map_err(|e| AppError::Notifier(format!("SMTP send failed: {}", e)))?;

        Ok(())
    }
}
