//! services/claim_service.rs
//! Un intento de reclamo contra un servicio. Nunca propaga errores.

use anyhow::{Context, Result};
use reqwest::header::{CONTENT_TYPE, COOKIE, ORIGIN, REFERER, USER_AGENT};
use reqwest::Client;

use crate::config::services_config::{API_ORIGIN, API_REFERER};
use crate::models::checkin_model::{
    CheckInResult, ClaimRequest, ClaimResponse, CredentialPair, ServiceConfig,
};

#[derive(Clone)]
pub struct ClaimService {
    http_client: Client,
    user_agent: String,
}

impl ClaimService {
    pub fn new(user_agent: String) -> Self {
        Self {
            http_client: Client::new(),
            user_agent,
        }
    }

    /// Un solo intento, sin reintentos. Fallos de transporte o de parseo => NetworkError.
    pub async fn claim(&self, creds: &CredentialPair, service: &ServiceConfig) -> CheckInResult {
        match self.post_claim(creds, service).await {
            Ok(resp) => {
                let result = CheckInResult::from_retcode(resp.retcode);
                log::info!(
                    "(claim) {} -> retcode={} message={:?} => {:?}",
                    service.service_id,
                    resp.retcode,
                    resp.message,
                    result
                );
                result
            }
            Err(e) => {
                log::error!("(claim) Network Error ({}): {:?}", service.service_id, e);
                CheckInResult::NetworkError
            }
        }
    }

    async fn post_claim(
        &self,
        creds: &CredentialPair,
        service: &ServiceConfig,
    ) -> Result<ClaimResponse> {
        let resp = self
            .http_client
            .post(&service.request_url)
            .header(CONTENT_TYPE, "application/json")
            .header(REFERER, API_REFERER)
            .header(ORIGIN, API_ORIGIN)
            .header(USER_AGENT, &self.user_agent)
            .header(COOKIE, creds.cookie_header())
            .json(&ClaimRequest {
                act_id: &service.act_id,
            })
            .send()
            .await
            .with_context(|| format!("Fallo al hacer POST a {}", service.request_url))?;

        log::debug!(
            "(post_claim) {} respondió status={}",
            service.service_id,
            resp.status()
        );

        // El status HTTP no se mira: decide el retcode del body
        let body = resp.text().await.context("Fallo leyendo el body")?;
        serde_json::from_str::<ClaimResponse>(&body)
            .with_context(|| format!("Respuesta sin retcode válido: {}", body))
    }
}
