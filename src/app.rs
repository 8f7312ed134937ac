//! app.rs
use crate::handlers::checkin_handler;
use actix_web::web;

pub fn init_app(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/status", web::get().to(checkin_handler::get_status_endpoint))
            .route("/check", web::post().to(checkin_handler::manual_check_endpoint)),
    );
}
