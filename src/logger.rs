//! logger.rs
//! Configuración del logger usando env_logger.

/// Filtro por defecto si no hay RUST_LOG: info para la app, warn para sqlx
/// (loguea cada query en info).
const DEFAULT_FILTER: &str = "info,sqlx=warn";

pub fn init_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(DEFAULT_FILTER))
        .format_timestamp_secs()
        .init();
}
