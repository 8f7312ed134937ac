//! services/scheduler_service.rs
//! Timer periódico que dispara el check-in (equivalente a una alarma del navegador).

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::services::checkin_service::CheckInService;

pub const DAILY_CHECK_TIMER: &str = "dailyCheck";

/// Dispara una corrida sin esperar a que termine.
pub type RunTrigger = Arc<dyn Fn() + Send + Sync>;

/// Trigger de producción: lanza `perform_check_in` en una tarea aparte.
pub fn spawn_check_in_trigger(checkin_service: CheckInService) -> RunTrigger {
    Arc::new(move || {
        let service = checkin_service.clone();
        tokio::spawn(async move {
            if let Err(e) = service.perform_check_in().await {
                log::error!("(scheduler) Error en check-in programado: {:?}", e);
            }
        });
    })
}

#[derive(Clone)]
pub struct Scheduler {
    timer_name: String,
    period: Duration,
    trigger: RunTrigger,
    timer: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl Scheduler {
    pub fn new(period: Duration, trigger: RunTrigger) -> Self {
        Self {
            timer_name: DAILY_CHECK_TIMER.to_string(),
            period,
            trigger,
            timer: Arc::new(Mutex::new(None)),
        }
    }

    /// Registra (o re-arma) el timer y corre un check-in inmediato.
    pub fn on_install(&self) {
        log::info!(
            "(on_install) Registrando timer '{}' cada {:?}...",
            self.timer_name,
            self.period
        );
        self.register_timer();
        (self.trigger)();
    }

    pub fn on_timer_fire(&self, timer_name: &str) {
        if timer_name == self.timer_name {
            log::info!("(on_timer_fire) Timer '{}' disparado", timer_name);
            (self.trigger)();
        } else {
            log::debug!("(on_timer_fire) Timer desconocido '{}', ignorado", timer_name);
        }
    }

    pub fn shutdown(&self) {
        if let Some(handle) = self.lock_timer().take() {
            handle.abort();
        }
    }

    fn register_timer(&self) {
        let scheduler = self.clone();
        let period = self.period;
        let start = Instant::now() + period;
        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(start, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                scheduler.on_timer_fire(&scheduler.timer_name);
            }
        });

        // re-registrar reemplaza al timer anterior
        if let Some(previous) = self.lock_timer().replace(handle) {
            previous.abort();
        }
    }

    fn lock_timer(&self) -> std::sync::MutexGuard<'_, Option<JoinHandle<()>>> {
        self.timer.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
