use crate::{models::DiagnosticsResponse, routes::auth_middleware::Caller, state::AppState};
use axum::{extract::{State, Extension}, http::StatusCode, Json};
use std::sync::Arc;
use std::sync::{Mutex, OnceLock};
use sysinfo::System;
use tracing::info;

static SYSTEM_MONITOR: OnceLock<Mutex<System>> = OnceLock::new();

/// Report room, connection and host statistics
pub async fn diagnostics(
    State(app_state): State<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
) -> (StatusCode, Json<DiagnosticsResponse>) {

    // Aggregate diagnostics from the registry
    let stats = app_state.registry.stats().await;
    let n_conn = stats.connections as u32;
    let n_rooms = stats.rooms as u32;
    let n_locked_rooms = stats.locked_rooms as u32;

    // System stats
    let (cpu_usage, memory_alloc, memory_free, memory_total) = {
        let sys_lock = SYSTEM_MONITOR.get_or_init(|| {
            Mutex::new(System::new_all())
        });
        match sys_lock.lock() {
            Ok(mut sys) => {
                sys.refresh_cpu();
                sys.refresh_memory();
                (
                    sys.global_cpu_info().cpu_usage(),
                    sys.used_memory(),
                    sys.free_memory(),
                    sys.total_memory(),
                )
            }
            Err(_) => (0.0, 0, 0, 0)
        }
    };

    info!(
        "Diagnostics for {}: CPU: {:.2}%, Mem: {}/{} MB (Free: {} MB), Conn: {}, Rooms: {} ({} locked)",
        caller.0,
        cpu_usage,
        memory_alloc / 1024 / 1024,
        memory_total / 1024 / 1024,
        memory_free / 1024 / 1024,
        n_conn,
        n_rooms,
        n_locked_rooms
    );

    (
        StatusCode::OK,
        Json(DiagnosticsResponse {
            n_conn,
            n_rooms,
            n_locked_rooms,
            cpu_usage,
            memory_alloc,
            memory_total,
            memory_free,
        }),
    )
}
