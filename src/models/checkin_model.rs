use serde::{Deserialize, Serialize};

/// Marcadores de texto que componen el status agregado.
/// La política de notificación depende del texto exacto.
pub const SUCCESS_MARKER: &str = "✅ Success";
pub const CLAIMED_MARKER: &str = "✅";
pub const ERROR_MARKER: &str = "❌";
pub const NOT_LOGGED_IN_STATUS: &str = "❌ Failed: Not logged in at Hoyolab.com";
pub const FRAGMENT_SEPARATOR: &str = " | ";

/// Retcode que devuelve la API cuando la recompensa del día ya fue reclamada.
pub const RETCODE_ALREADY_CLAIMED: i64 = -5003;

/// Un programa de recompensas (un juego) configurado estáticamente.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub service_id: String,
    pub request_url: String,
    pub act_id: String,
    pub display_name: String,
}

/// Par de cookies de sesión (ltuid / ltoken). Nunca se persiste.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialPair {
    pub session_id: String,
    pub session_token: String,
}

impl std::fmt::Debug for CredentialPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // el token no debe terminar en los logs
        f.debug_struct("CredentialPair")
            .field("session_id", &self.session_id)
            .field("session_token", &"***")
            .finish()
    }
}

impl CredentialPair {
    /// Cookie header que espera la API: `ltoken_v2=...; ltuid_v2=...;`
    pub fn cookie_header(&self) -> String {
        format!(
            "ltoken_v2={}; ltuid_v2={};",
            self.session_token, self.session_id
        )
    }
}

/// Resultado clasificado de un intento de reclamo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckInResult {
    Success,
    AlreadyClaimed,
    ApiError(i64),
    NetworkError,
}

impl CheckInResult {
    pub fn from_retcode(retcode: i64) -> Self {
        match retcode {
            0 => CheckInResult::Success,
            RETCODE_ALREADY_CLAIMED => CheckInResult::AlreadyClaimed,
            other => CheckInResult::ApiError(other),
        }
    }

    /// Texto que se muestra en el status agregado.
    pub fn marker(&self) -> String {
        match self {
            CheckInResult::Success => SUCCESS_MARKER.to_string(),
            CheckInResult::AlreadyClaimed => CLAIMED_MARKER.to_string(),
            CheckInResult::ApiError(code) => format!("{} Err({})", ERROR_MARKER, code),
            CheckInResult::NetworkError => format!("{} NetErr", ERROR_MARKER),
        }
    }
}

/// Registro persistido con el resultado de la última corrida.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusRecord {
    pub status_text: String,
    pub last_check_time: String,
}

/// Lo que devuelve una corrida completa del workflow.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub run_id: String,
    pub status: StatusRecord,
    pub notified: bool,
}

/// Body que se envía en el POST de reclamo.
#[derive(Debug, Clone, Serialize)]
pub struct ClaimRequest<'a> {
    pub act_id: &'a str,
}

/// Forma mínima de la respuesta de la API: `{retcode: <int>, ...}`
#[derive(Debug, Clone, Deserialize)]
pub struct ClaimResponse {
    pub retcode: i64,
    #[serde(default)]
    pub message: Option<String>,
}

/// GET /api/status
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: Option<String>,
    pub last_check: Option<String>,
}

impl From<Option<StatusRecord>> for StatusResponse {
    fn from(record: Option<StatusRecord>) -> Self {
        match record {
            Some(r) => StatusResponse {
                status: Some(r.status_text),
                last_check: Some(r.last_check_time),
            },
            None => StatusResponse {
                status: None,
                last_check: None,
            },
        }
    }
}

/// POST /api/check, acuse de recibo del chequeo manual.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManualCheckResponse {
    pub status: String,
    pub run_id: String,
    pub notified: bool,
}
