//! config/mod.rs
//! Configuración global: variables de entorno y servicios conocidos.

pub mod app_config;
pub mod services_config;
