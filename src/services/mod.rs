//! services/mod.rs
//! Módulo que agrupa distintos "servicios" o "capas de negocio" de la app.

pub mod checkin_service;
pub mod claim_service;
pub mod cookie_service;
pub mod notification_service;
pub mod popup_service;
pub mod scheduler_service;
pub mod status_store;
