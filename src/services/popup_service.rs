//! services/popup_service.rs
//! Controlador del popup: muestra el último status y permite un chequeo manual.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use reqwest::Client;

use crate::models::checkin_model::{ManualCheckResponse, StatusResponse};

pub const NO_DATA_TEXT: &str = "No data available";
pub const NEVER_TEXT: &str = "Never";
pub const CHECK_LABEL: &str = "Check In Now";
pub const CHECKING_LABEL: &str = "Checking...";
pub const COMPLETE_MESSAGE: &str = "Check-in Complete!";

/// Espera para que el store refleje la corrida antes de releerlo.
pub const SETTLE_DELAY: Duration = Duration::from_secs(1);
/// Cuánto dura visible el mensaje de confirmación.
pub const MESSAGE_TTL: Duration = Duration::from_secs(3);

/// Lo que ve el usuario en el popup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupView {
    pub status_text: String,
    pub last_check: String,
    pub button_enabled: bool,
    pub button_label: String,
    pub message: String,
}

impl Default for PopupView {
    fn default() -> Self {
        PopupView {
            status_text: NO_DATA_TEXT.to_string(),
            last_check: NEVER_TEXT.to_string(),
            button_enabled: true,
            button_label: CHECK_LABEL.to_string(),
            message: String::new(),
        }
    }
}

/// Lo que el popup necesita del proceso que hace los check-ins.
#[allow(async_fn_in_trait)]
pub trait PopupBackend {
    async fn read_status(&self) -> Result<StatusResponse>;
    /// Devuelve cuando la corrida terminó (acuse de recibo).
    async fn request_manual_check(&self) -> Result<ManualCheckResponse>;
}

/// Backend que habla con la API de control por HTTP.
#[derive(Clone)]
pub struct HttpPopupBackend {
    base_url: String,
    http_client: Client,
}

impl HttpPopupBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http_client: Client::new(),
        }
    }
}

impl PopupBackend for HttpPopupBackend {
    async fn read_status(&self) -> Result<StatusResponse> {
        let url = format!("{}/api/status", self.base_url);
        let resp = self
            .http_client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Fallo al hacer GET {}", url))?;
        if !resp.status().is_success() {
            return Err(anyhow!("GET {} respondió {}", url, resp.status()));
        }
        Ok(resp.json::<StatusResponse>().await?)
    }

    async fn request_manual_check(&self) -> Result<ManualCheckResponse> {
        let url = format!("{}/api/check", self.base_url);
        let resp = self
            .http_client
            .post(&url)
            .send()
            .await
            .with_context(|| format!("Fallo al hacer POST {}", url))?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(anyhow!("POST {} respondió {}: {}", url, status, body));
        }
        Ok(resp.json::<ManualCheckResponse>().await?)
    }
}

pub struct PopupController<B: PopupBackend> {
    backend: B,
    view: Arc<Mutex<PopupView>>,
    settle_delay: Duration,
    message_ttl: Duration,
}

impl<B: PopupBackend> PopupController<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            view: Arc::new(Mutex::new(PopupView::default())),
            settle_delay: SETTLE_DELAY,
            message_ttl: MESSAGE_TTL,
        }
    }

    pub fn view(&self) -> PopupView {
        self.lock_view().clone()
    }

    /// Carga el status guardado; placeholders si no hay nada.
    pub async fn open(&self) -> Result<()> {
        let status = self.backend.read_status().await?;
        self.render_status(status);
        Ok(())
    }

    pub async fn manual_check(&self) {
        {
            let mut view = self.lock_view();
            view.button_enabled = false;
            view.button_label = CHECKING_LABEL.to_string();
            view.message.clear();
        }

        let outcome = match self.backend.request_manual_check().await {
            Ok(ack) => {
                log::info!(
                    "(manual_check) Acuse recibido run_id={} status={}",
                    ack.run_id,
                    ack.status
                );
                tokio::time::sleep(self.settle_delay).await;
                self.backend.read_status().await.map(|s| self.render_status(s))
            }
            Err(e) => Err(e),
        };

        let message = match outcome {
            Ok(()) => COMPLETE_MESSAGE.to_string(),
            Err(e) => {
                log::error!("(manual_check) Error en chequeo manual: {:?}", e);
                format!("Check-in failed: {}", e)
            }
        };

        {
            let mut view = self.lock_view();
            view.button_enabled = true;
            view.button_label = CHECK_LABEL.to_string();
            view.message = message;
        }
        self.schedule_message_clear();
    }

    fn render_status(&self, status: StatusResponse) {
        let mut view = self.lock_view();
        view.status_text = status.status.unwrap_or_else(|| NO_DATA_TEXT.to_string());
        view.last_check = status.last_check.unwrap_or_else(|| NEVER_TEXT.to_string());
    }

    fn schedule_message_clear(&self) {
        let view = Arc::clone(&self.view);
        let ttl = self.message_ttl;
        tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            view.lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .message
                .clear();
        });
    }

    fn lock_view(&self) -> MutexGuard<'_, PopupView> {
        self.view.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
