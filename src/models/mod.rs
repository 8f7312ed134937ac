//! models/mod.rs
//! Módulo raíz para modelos/estructuras compartidas.

pub mod checkin_model;
pub mod notification_model;
