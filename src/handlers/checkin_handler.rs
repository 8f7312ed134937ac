//! handlers/checkin_handler.rs
//! Superficie de control: status guardado y chequeo manual.
use actix_web::{web, HttpResponse};

use crate::models::checkin_model::{ManualCheckResponse, StatusResponse};
use crate::services::checkin_service::CheckInService;

/// GET /api/status
pub async fn get_status_endpoint(checkin_service: web::Data<CheckInService>) -> HttpResponse {
    match checkin_service.status_store().read().await {
        Ok(record) => HttpResponse::Ok().json(StatusResponse::from(record)),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": "Internal server error",
            "details": format!("{:?}", e)
        })),
    }
}

/// POST /api/check
/// Responde recién cuando la corrida terminó.
pub async fn manual_check_endpoint(checkin_service: web::Data<CheckInService>) -> HttpResponse {
    log::info!("(manual_check_endpoint) Chequeo manual solicitado");

    match checkin_service.perform_check_in().await {
        Ok(report) => HttpResponse::Ok().json(ManualCheckResponse {
            status: "Done".to_string(),
            run_id: report.run_id,
            notified: report.notified,
        }),
        Err(e) => {
            log::error!("(manual_check_endpoint) Error en check-in: {:?}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Check-in failed",
                "details": format!("{:?}", e)
            }))
        }
    }
}
