use std::sync::{Mutex, MutexGuard, OnceLock};

use crate::core::{config::Settings, state::AppState};

/// Serializes tests that read or mutate process environment variables.
pub(crate) fn env_lock() -> MutexGuard<'static, ()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(())).lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// App state over a lazy pool: no connection is made until a query runs,
/// so router tests that never touch the database need no Postgres.
pub(crate) fn build_state() -> AppState {
    let settings = Settings::load().expect("settings");
    let db = sqlx::PgPool::connect_lazy(&settings.database().database_url()).expect("lazy pool");
    AppState::new(settings, db)
}
