//! tests/support.rs
//! Helpers compartidos: API HoYoLAB falsa, store en memoria, armado de servicios.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use sqlx::sqlite::SqlitePoolOptions;

use crate::config::services_config::default_services;
use crate::models::checkin_model::ServiceConfig;
use crate::models::notification_model::NotificationChannel;
use crate::services::checkin_service::CheckInService;
use crate::services::claim_service::ClaimService;
use crate::services::cookie_service::{CookieService, StaticCookieSource};
use crate::services::notification_service::NotificationService;
use crate::services::status_store::StatusStore;

pub const TEST_USER_AGENT: &str = "HoyoDailyTest/1.0";

/// Un POST recibido por la API falsa.
#[derive(Debug, Clone)]
pub struct RecordedClaim {
    pub game: String,
    pub cookie: Option<String>,
    pub referer: Option<String>,
    pub origin: Option<String>,
    pub user_agent: Option<String>,
    pub content_type: Option<String>,
    pub body: serde_json::Value,
}

/// Estado de la API falsa: qué body responder por juego y qué se recibió.
#[derive(Default)]
pub struct FakeApi {
    responses: Mutex<HashMap<String, String>>,
    claims: Mutex<Vec<RecordedClaim>>,
    webhooks: Mutex<Vec<serde_json::Value>>,
}

impl FakeApi {
    pub fn respond_retcode(&self, game: &str, retcode: i64) {
        self.respond_raw(
            game,
            &serde_json::json!({ "retcode": retcode, "message": "fake", "data": null }).to_string(),
        );
    }

    pub fn respond_raw(&self, game: &str, body: &str) {
        self.responses
            .lock()
            .unwrap()
            .insert(game.to_string(), body.to_string());
    }

    pub fn claims(&self) -> Vec<RecordedClaim> {
        self.claims.lock().unwrap().clone()
    }

    pub fn webhooks(&self) -> Vec<serde_json::Value> {
        self.webhooks.lock().unwrap().clone()
    }
}

fn header(req: &HttpRequest, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

async fn fake_sign(
    api: web::Data<FakeApi>,
    req: HttpRequest,
    path: web::Path<String>,
    body: web::Bytes,
) -> HttpResponse {
    let game = path.into_inner();
    api.claims.lock().unwrap().push(RecordedClaim {
        game: game.clone(),
        cookie: header(&req, "cookie"),
        referer: header(&req, "referer"),
        origin: header(&req, "origin"),
        user_agent: header(&req, "user-agent"),
        content_type: header(&req, "content-type"),
        body: serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null),
    });

    let response = api
        .responses
        .lock()
        .unwrap()
        .get(&game)
        .cloned()
        .unwrap_or_else(|| r#"{"retcode":0}"#.to_string());
    HttpResponse::Ok()
        .content_type("application/json")
        .body(response)
}

async fn fake_webhook(
    api: web::Data<FakeApi>,
    body: web::Json<serde_json::Value>,
) -> HttpResponse {
    api.webhooks.lock().unwrap().push(body.into_inner());
    HttpResponse::Ok().finish()
}

/// Levanta la API falsa en un puerto efímero y devuelve su URL base.
pub fn start_fake_api(api: Arc<FakeApi>) -> String {
    let data = web::Data::from(api);
    let server = HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .route("/sign/{game}", web::post().to(fake_sign))
            .route("/webhook", web::post().to(fake_webhook))
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .expect("no se pudo abrir puerto para la API falsa");

    let addr = server.addrs()[0];
    actix_rt::spawn(server.run());
    format!("http://{}", addr)
}

/// Servicios de referencia apuntando a la API falsa, mismo orden y nombres.
pub fn fake_services(base_url: &str) -> Vec<ServiceConfig> {
    default_services()
        .into_iter()
        .map(|mut s| {
            s.request_url = format!("{}/sign/{}", base_url, s.service_id);
            s
        })
        .collect()
}

pub async fn memory_store() -> StatusStore {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("no se pudo abrir SQLite en memoria");
    let store = StatusStore::new(pool);
    store.run_migrations().await.expect("migraciones");
    store
}

pub fn checkin_service(
    services: Vec<ServiceConfig>,
    raw_cookies: &str,
    store: StatusStore,
    webhook_url: Option<String>,
) -> CheckInService {
    let mut channels = vec![NotificationChannel::Log];
    if let Some(url) = webhook_url {
        channels.push(NotificationChannel::Webhook { url });
    }
    CheckInService::new(
        services,
        CookieService::new(Arc::new(StaticCookieSource::new(raw_cookies))),
        ClaimService::new(TEST_USER_AGENT.to_string()),
        store,
        NotificationService::new(channels),
    )
}
