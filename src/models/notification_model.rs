use serde::Serialize;

pub const NOTIFICATION_TITLE: &str = "HoyoDaily Report";

/// Canales configurados para avisar al usuario.
#[derive(Debug, Clone)]
pub enum NotificationChannel {
    /// Siempre activo: deja el aviso en el log.
    Log,
    Webhook { url: String },
    Email(EmailConfig),
}

impl NotificationChannel {
    pub fn name(&self) -> &'static str {
        match self {
            NotificationChannel::Log => "log",
            NotificationChannel::Webhook { .. } => "webhook",
            NotificationChannel::Email(_) => "email",
        }
    }
}

/// Config de email
#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_user: String,
    pub smtp_pass: String,
    pub recipients: Vec<String>,
}

/// Payload del webhook
#[derive(Debug, Clone, Serialize)]
pub struct WebhookPayload<'a> {
    pub title: &'a str,
    pub message: &'a str,
    pub priority: u8,
}
