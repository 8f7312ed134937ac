//! config/services_config.rs
//! Lista estática de servicios (juegos) a reclamar, en orden fijo.

use crate::models::checkin_model::ServiceConfig;

pub const COOKIE_ORIGIN: &str = "https://www.hoyolab.com";
pub const API_REFERER: &str = "https://act.hoyolab.com/";
pub const API_ORIGIN: &str = "https://act.hoyolab.com";

/// Servicios de referencia. El orden define el orden del status agregado.
pub fn default_services() -> Vec<ServiceConfig> {
    vec![
        ServiceConfig {
            service_id: "genshin".to_string(),
            request_url: "https://sg-hk4e-api.hoyolab.com/event/sol/sign?lang=en-us".to_string(),
            act_id: "e202102251931481".to_string(),
            display_name: "Genshin Impact".to_string(),
        },
        ServiceConfig {
            service_id: "starrail".to_string(),
            request_url: "https://sg-public-api.hoyolab.com/event/luna/os/sign?lang=en-us"
                .to_string(),
            act_id: "e202303301540311".to_string(),
            display_name: "Honkai: Star Rail".to_string(),
        },
    ]
}
