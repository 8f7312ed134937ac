use std::future::Future;

use anyhow::{anyhow, Context, Result};
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use reqwest::Client;

use crate::models::checkin_model::{ERROR_MARKER, SUCCESS_MARKER};
use crate::models::notification_model::{EmailConfig, NotificationChannel, WebhookPayload};

/// Avisar solo si hubo un reclamo nuevo ("✅ Success") o algún error ("❌").
/// Si todo es el "✅" pelado (ya reclamado) no se molesta al usuario cada hora.
pub fn should_notify(status_text: &str) -> bool {
    status_text.contains(SUCCESS_MARKER) || status_text.contains(ERROR_MARKER)
}

#[derive(Clone)]
pub struct NotificationService {
    channels: Vec<NotificationChannel>,
    http_client: Client,
}

impl NotificationService {
    pub fn new(channels: Vec<NotificationChannel>) -> Self {
        Self {
            channels,
            http_client: Client::new(),
        }
    }

    pub fn channels(&self) -> &[NotificationChannel] {
        &self.channels
    }

    /// Envía por todos los canales. Un canal que falla se loguea y no corta al resto.
    pub async fn notify(&self, title: &str, message: &str) {
        for channel in &self.channels {
            let result = match channel {
                NotificationChannel::Log => {
                    log::info!("(notify) [{}] {}", title, message);
                    Ok(())
                }
                NotificationChannel::Webhook { url } => {
                    self.send_via_webhook(url, title, message).await
                }
                NotificationChannel::Email(cfg) => self.send_via_email(cfg, title, message).await,
            };

            if let Err(e) = result {
                log::error!(
                    "(notify) Error al enviar por canal '{}': {:?}",
                    channel.name(),
                    e
                );
            }
        }
    }

    async fn send_via_webhook(&self, url: &str, title: &str, message: &str) -> Result<()> {
        let payload = WebhookPayload {
            title,
            message,
            priority: 2,
        };

        let r = self
            .http_client
            .post(url)
            .json(&payload)
            .send()
            .await
            .context("(send_via_webhook) Fallo al hacer POST")?;

        if !r.status().is_success() {
            let status = r.status();
            let e = r.text().await.unwrap_or_default();
            return Err(anyhow!("Webhook respondió {}: {}", status, e));
        }

        log::info!("(send_via_webhook) Aviso enviado a {}", url);
        Ok(())
    }

    async fn send_via_email(&self, cfg: &EmailConfig, title: &str, message: &str) -> Result<()> {
        let from: Mailbox = format!("HoyoDaily <{}>", cfg.smtp_user)
            .parse()
            .context("Invalid from address")?;

        let tls_params = TlsParameters::new(cfg.smtp_host.clone())?;
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(&cfg.smtp_host)?
            .port(cfg.smtp_port)
            .credentials(Credentials::new(
                cfg.smtp_user.clone(),
                cfg.smtp_pass.clone(),
            ))
            .tls(Tls::Required(tls_params))
            .build();

        let (mailer, from) = (&mailer, &from);
        send_to_each(&cfg.recipients, move |recip_str| async move {
            let to: Mailbox = recip_str.parse().context("Invalid recipient address")?;
            let email = Message::builder()
                .from(from.clone())
                .to(to)
                .subject(title)
                .header(ContentType::TEXT_PLAIN)
                .body(message.to_string())?;

            tokio::time::timeout(std::time::Duration::from_secs(30), mailer.send(email))
                .await??;
            Ok::<(), anyhow::Error>(())
        })
        .await?;

        log::info!(
            "(send_via_email) Aviso enviado a {} destinatarios",
            cfg.recipients.len()
        );
        Ok(())
    }
}

/// Envía a cada destinatario; uno que falla se loguea y no corta al resto.
async fn send_to_each<F, Fut>(recipients: &[String], mut send: F) -> Result<()>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<()>>,
{
    let mut failed = Vec::new();
    for recip in recipients {
        if let Err(e) = send(recip.clone()).await {
            log::error!("(send_to_each) Error al enviar a '{}': {:?}", recip, e);
            failed.push(recip.as_str());
        }
    }

    if failed.is_empty() {
        Ok(())
    } else {
        Err(anyhow!(
            "Fallo el envío a {} de {} destinatarios: {}",
            failed.len(),
            recipients.len(),
            failed.join(", ")
        ))
    }
}
