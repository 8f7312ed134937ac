//! services/checkin_service.rs
//! Una corrida completa del check-in: cookies -> reclamos -> status -> aviso.

use anyhow::Result;
use chrono::Local;
use uuid::Uuid;

use crate::models::checkin_model::{
    RunReport, ServiceConfig, StatusRecord, FRAGMENT_SEPARATOR, NOT_LOGGED_IN_STATUS,
};
use crate::models::notification_model::NOTIFICATION_TITLE;
use crate::services::{
    claim_service::ClaimService,
    cookie_service::CookieService,
    notification_service::{should_notify, NotificationService},
    status_store::StatusStore,
};

#[derive(Clone)]
pub struct CheckInService {
    services: Vec<ServiceConfig>,
    cookie_service: CookieService,
    claim_service: ClaimService,
    status_store: StatusStore,
    notification_service: NotificationService,
}

impl CheckInService {
    pub fn new(
        services: Vec<ServiceConfig>,
        cookie_service: CookieService,
        claim_service: ClaimService,
        status_store: StatusStore,
        notification_service: NotificationService,
    ) -> Self {
        Self {
            services,
            cookie_service,
            claim_service,
            status_store,
            notification_service,
        }
    }

    pub fn status_store(&self) -> &StatusStore {
        &self.status_store
    }

    /// Solo falla si no se pudo persistir el status; los errores de cada
    /// servicio quedan dentro del texto agregado.
    pub async fn perform_check_in(&self) -> Result<RunReport> {
        let run_id = Uuid::new_v4().to_string();
        log::info!("(perform_check_in) Iniciando check-in run_id={}...", run_id);

        // 1) Cookies
        let Some(creds) = self.cookie_service.get_credentials() else {
            log::warn!(
                "(perform_check_in) No se encontraron cookies. ¿El usuario no inició sesión? run_id={}",
                run_id
            );
            let status = StatusRecord {
                status_text: NOT_LOGGED_IN_STATUS.to_string(),
                last_check_time: clock_now(),
            };
            self.status_store.write(&status).await?;
            self.notification_service
                .notify(NOTIFICATION_TITLE, &status.status_text)
                .await;
            return Ok(RunReport {
                run_id,
                status,
                notified: true,
            });
        };

        // 2) Un reclamo por servicio, en orden de configuración
        let mut fragments = Vec::with_capacity(self.services.len());
        for service in &self.services {
            let result = self.claim_service.claim(&creds, service).await;
            fragments.push(format!("{}: {}", service.display_name, result.marker()));
        }

        // 3) y 4) Status agregado, se escribe siempre
        let status = StatusRecord {
            status_text: fragments.join(FRAGMENT_SEPARATOR),
            last_check_time: clock_now(),
        };
        self.status_store.write(&status).await?;
        log::info!(
            "(perform_check_in) run_id={} status='{}' a las {}",
            run_id,
            status.status_text,
            status.last_check_time
        );

        // 5) Aviso
        let notified = should_notify(&status.status_text);
        if notified {
            self.notification_service
                .notify(NOTIFICATION_TITLE, &status.status_text)
                .await;
        } else {
            log::info!("(perform_check_in) Todo ya reclamado, no se notifica.");
        }

        Ok(RunReport {
            run_id,
            status,
            notified,
        })
    }
}

/// Hora local corta, "HH:MM".
fn clock_now() -> String {
    Local::now().format("%H:%M").to_string()
}
