//! Outbound email capability.

pub mod smtp;

use crate::errors::AppResult;

/// A file attached to an outgoing email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// A fully rendered email, ready for dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub html_body: String,
    pub attachments: Vec<Attachment>,
}

/// Email transport. Implementations must be safe to share across request threads.
pub trait Mailer: Send + Sync {
    fn send(&self, email: &OutgoingEmail) -> AppResult<()>;
}
