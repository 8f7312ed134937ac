//! config/app_config.rs
//! Configuración de la app leída de variables de entorno (o de un .env).

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};

use crate::models::notification_model::{EmailConfig, NotificationChannel};

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// De dónde salen las cookies de sesión.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CookieSourceConfig {
    /// Export Netscape (cookies.txt) del navegador
    JarFile(PathBuf),
    /// Header `Cookie:` crudo
    Raw(String),
    None,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub check_interval: Duration,
    pub cookie_source: CookieSourceConfig,
    pub user_agent: String,
    pub notification_channels: Vec<NotificationChannel>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            bind_addr: "127.0.0.1".to_string(),
            port: 5022,
            data_dir: PathBuf::from("data"),
            check_interval: Duration::from_secs(60 * 60),
            cookie_source: CookieSourceConfig::None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            notification_channels: vec![NotificationChannel::Log],
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Construye la config a partir de una función de búsqueda (env, mapa en tests...).
    /// Valores vacíos cuentan como ausentes.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = AppConfig::default();

        let port = match get("HOYO_PORT") {
            Some(v) => v
                .trim()
                .parse::<u16>()
                .with_context(|| format!("HOYO_PORT inválido: {}", v))?,
            None => defaults.port,
        };

        let check_interval = match get("HOYO_CHECK_INTERVAL_MINUTES") {
            Some(v) => {
                let minutes = v
                    .trim()
                    .parse::<u64>()
                    .with_context(|| format!("HOYO_CHECK_INTERVAL_MINUTES inválido: {}", v))?;
                if minutes == 0 {
                    return Err(anyhow!("HOYO_CHECK_INTERVAL_MINUTES debe ser mayor que 0"));
                }
                Duration::from_secs(minutes * 60)
            }
            None => defaults.check_interval,
        };

        // El archivo tiene prioridad sobre el header crudo
        let cookie_source = match (get("HOYO_COOKIE_FILE"), get("HOYO_COOKIES")) {
            (Some(path), _) => CookieSourceConfig::JarFile(PathBuf::from(path)),
            (None, Some(raw)) => CookieSourceConfig::Raw(raw),
            (None, None) => CookieSourceConfig::None,
        };

        let mut notification_channels = vec![NotificationChannel::Log];
        if let Some(url) = get("NOTIFY_WEBHOOK_URL") {
            notification_channels.push(NotificationChannel::Webhook { url });
        }
        if let Some(email) = Self::email_from_lookup(&get)? {
            notification_channels.push(NotificationChannel::Email(email));
        }

        Ok(AppConfig {
            bind_addr: get("HOYO_BIND_ADDR").unwrap_or(defaults.bind_addr),
            port,
            data_dir: get("HOYO_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            check_interval,
            cookie_source,
            user_agent: get("HOYO_USER_AGENT").unwrap_or(defaults.user_agent),
            notification_channels,
        })
    }

    fn email_from_lookup<F>(get: &F) -> Result<Option<EmailConfig>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let (host, user, pass, to) = match (
            get("SMTP_HOST"),
            get("SMTP_USER"),
            get("SMTP_PASS"),
            get("NOTIFY_EMAIL_TO"),
        ) {
            (Some(h), Some(u), Some(p), Some(t)) => (h, u, p, t),
            _ => return Ok(None),
        };

        let smtp_port = match get("SMTP_PORT") {
            Some(v) => v
                .trim()
                .parse::<u16>()
                .with_context(|| format!("SMTP_PORT inválido: {}", v))?,
            None => 587,
        };

        let recipients: Vec<String> = to
            .split(',')
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .collect();

        Ok(Some(EmailConfig {
            smtp_host: host,
            smtp_port,
            smtp_user: user,
            smtp_pass: pass,
            recipients,
        }))
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join("hoyodaily.db")
    }
}
