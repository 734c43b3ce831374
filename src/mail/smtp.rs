use crate::config::{Config, SMTP_PASSWORD_ENV};
use crate::errors::{AppError, AppResult};
use crate::mail::{Mailer, OutgoingEmail};
use lettre::message::header::ContentType;
use lettre::message::{Attachment as LettreAttachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use std::time::Duration;

/// SMTP delivery over STARTTLS (blocking transport).
///
/// Settings come from the config file, the password from the environment.
/// Missing credentials are reported when a message is sent, not at startup,
/// so commands that never email keep working without SMTP set up.
pub struct SmtpMailer {
    host: String,
    port: u16,
    username: String,
    sender: String,
    password: Option<String>,
    timeout: Duration,
}

impl SmtpMailer {
    pub fn from_config(cfg: &Config) -> Self {
        let sender = if cfg.sender_email.is_empty() {
            cfg.smtp_username.clone()
        } else {
            cfg.sender_email.clone()
        };

        Self {
            host: cfg.smtp_host.clone(),
            port: cfg.smtp_port,
            username: cfg.smtp_username.clone(),
            sender,
            password: Config::smtp_password(),
            timeout: Duration::from_secs(cfg.smtp_timeout_secs),
        }
    }

    fn transport(&self) -> AppResult<SmtpTransport> {
        let password = self.password.clone().ok_or_else(|| {
            AppError::Transport(format!("SMTP password not set (export {SMTP_PASSWORD_ENV})"))
        })?;

        if self.username.is_empty() {
            return Err(AppError::Transport(
                "smtp_username is not configured".to_string(),
            ));
        }

        let transport = SmtpTransport::starttls_relay(&self.host)
            .map_err(|e| AppError::Transport(e.to_string()))?
            .port(self.port)
            .credentials(Credentials::new(self.username.clone(), password))
            .timeout(Some(self.timeout))
            .build();

        Ok(transport)
    }

    fn build_message(&self, email: &OutgoingEmail) -> AppResult<Message> {
        let from: Mailbox = self
            .sender
            .parse()
            .map_err(|e| AppError::Transport(format!("invalid sender '{}': {e}", self.sender)))?;
        let to: Mailbox = email
            .to
            .parse()
            .map_err(|e| AppError::Validation(format!("invalid recipient '{}': {e}", email.to)))?;

        let mut body = MultiPart::mixed().singlepart(SinglePart::html(email.html_body.clone()));

        for a in &email.attachments {
            let content_type = ContentType::parse(&a.content_type).map_err(|e| {
                AppError::Transport(format!("invalid content type '{}': {e}", a.content_type))
            })?;
            log::debug!("attaching {} ({} bytes)", a.filename, a.data.len());
            body = body.singlepart(
                LettreAttachment::new(a.filename.clone()).body(a.data.clone(), content_type),
            );
        }

        Message::builder()
            .from(from)
            .to(to)
            .subject(email.subject.clone())
            .multipart(body)
            .map_err(|e| AppError::Transport(e.to_string()))
    }
}

impl Mailer for SmtpMailer {
    fn send(&self, email: &OutgoingEmail) -> AppResult<()> {
        let message = self.build_message(email)?;
        let transport = self.transport()?;

        transport.send(&message).map_err(|e| {
            log::error!("SMTP delivery to {} failed: {e}", email.to);
            AppError::Transport(e.to_string())
        })?;

        log::info!("report email sent to {}", email.to);
        Ok(())
    }
}
