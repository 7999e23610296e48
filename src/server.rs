//! HTTP endpoint serving the current [`Snapshot`] as JSON.
//!
//! There is one read-only route. It never fails: when nothing is known yet
//! the response is the empty snapshot.

use axum::{Json, Router, extract::State, routing::get};
use tokio::net::TcpListener;

use crate::snapshot::Snapshot;
use crate::state::SharedMonitor;
use crate::timer::wall_clock_now;

/// Path polled by the wallpaper renderer.
pub const SNAPSHOT_PATH: &str = "/BGMName/";

pub fn router(monitor: SharedMonitor) -> Router {
    Router::new()
        .route(SNAPSHOT_PATH, get(handle_snapshot))
        .with_state(monitor)
}

/// Serve until the listener fails.
pub async fn serve(listener: TcpListener, monitor: SharedMonitor) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("serving lyrics on http://{}{}", addr, SNAPSHOT_PATH);
    }
    axum::serve(listener, router(monitor)).await
}

async fn handle_snapshot(State(monitor): State<SharedMonitor>) -> Json<Snapshot> {
    let snapshot = monitor.lock().await.snapshot(wall_clock_now());
    Json(snapshot)
}
