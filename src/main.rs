use actix_web::{web, App, HttpServer};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use sqlx::{Pool, Sqlite};

use crate::config::app_config::AppConfig;
use crate::config::services_config::default_services;
use crate::logger::init_logger;
use crate::services::checkin_service::CheckInService;
use crate::services::claim_service::ClaimService;
use crate::services::cookie_service::{cookie_source_from_config, CookieService};
use crate::services::notification_service::NotificationService;
use crate::services::popup_service::{HttpPopupBackend, PopupController, PopupView};
use crate::services::scheduler_service::{spawn_check_in_trigger, Scheduler};
use crate::services::status_store::StatusStore;

mod app;
mod config;
mod handlers;
mod logger;
mod models;
mod services;
#[cfg(test)]
mod tests;

#[derive(Parser, Debug)]
#[command(author, version, about = "HoyoDaily: check-in diario automático en HoYoLAB")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Corre el scheduler y la API de control (por defecto)
    Serve,
    /// Muestra el último status; con --check pide un check-in manual
    Popup {
        #[arg(long, default_value = "http://127.0.0.1:5022")]
        server: String,
        #[arg(long)]
        check: bool,
    },
}

async fn setup_database(config: &AppConfig) -> Result<Pool<Sqlite>> {
    std::fs::create_dir_all(&config.data_dir)
        .with_context(|| format!("No se pudo crear directorio {}", config.data_dir.display()))?;

    let db_url = format!("sqlite:{}?mode=rwc", config.database_path().to_string_lossy());
    log::info!("Conectando a SQLite en {}", db_url);

    Pool::<Sqlite>::connect(&db_url)
        .await
        .context("No se pudo conectar a la base de datos SQLite.")
}

async fn serve(config: AppConfig) -> Result<()> {
    let db_pool = setup_database(&config).await?;

    let status_store = StatusStore::new(db_pool);
    status_store.run_migrations().await?;

    let notification_service = NotificationService::new(config.notification_channels.clone());
    log::info!(
        "Canales de aviso: {:?}",
        notification_service
            .channels()
            .iter()
            .map(|c| c.name())
            .collect::<Vec<_>>()
    );

    let checkin_service = CheckInService::new(
        default_services(),
        CookieService::new(cookie_source_from_config(&config.cookie_source)),
        ClaimService::new(config.user_agent.clone()),
        status_store,
        notification_service,
    );

    let scheduler = Scheduler::new(
        config.check_interval,
        spawn_check_in_trigger(checkin_service.clone()),
    );
    log::info!("HoyoDaily iniciado. Inicializando scheduler...");
    scheduler.on_install();

    log::info!(
        "Levantando API de control en {}:{}",
        config.bind_addr,
        config.port
    );
    let result = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(checkin_service.clone()))
            .configure(app::init_app)
    })
    .workers(1)
    .bind((config.bind_addr.as_str(), config.port))
    .context("No se pudo abrir el puerto de la API")?
    .run()
    .await;

    scheduler.shutdown();
    result.context("El servidor terminó con error")
}

async fn popup(server: String, check: bool) -> Result<()> {
    let controller = PopupController::new(HttpPopupBackend::new(server));
    controller.open().await?;
    if check {
        print_view(&controller.view());
        controller.manual_check().await;
    }
    print_view(&controller.view());
    Ok(())
}

fn print_view(view: &PopupView) {
    println!("Status:     {}", view.status_text);
    println!("Last check: {}", view.last_check);
    if !view.message.is_empty() {
        println!("{}", view.message);
    }
}

#[actix_web::main]
async fn main() -> Result<()> {
    dotenv().ok(); // Cargar .env al inicio
    init_logger();

    let cli = Cli::parse();
    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(AppConfig::from_env()?).await,
        Command::Popup { server, check } => popup(server, check).await,
    }
}
