// src/session/sweeper.rs

use std::time::Duration;

use crate::state::AppState;

/// Drives the countdowns: one tick per second over every live attempt.
/// Spawned once at startup and runs for the lifetime of the process.
pub async fn run(state: AppState) {
    let mut interval = tokio::time::interval(Duration::from_secs(1));
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    loop {
        interval.tick().await;
        sweep(&state).await;
    }
}

/// One pass: tick all sessions under the registry lock, then persist
/// any auto-submitted attempts after releasing it. A failed write is
/// logged and left for the student's own submit call to retry (result
/// writes are idempotent upserts).
pub async fn sweep(state: &AppState) {
    for record in state.attempts.tick_all() {
        tracing::info!(
            "Attempt {} auto-submitted on timer expiry (score {}/{})",
            record.attempt_id,
            record.result.total_score,
            record.result.max_score
        );
        if let Err(e) = state.store.save_result(&record).await {
            tracing::error!(
                "Failed to persist auto-submitted attempt {}: {:?}",
                record.attempt_id,
                e
            );
        }
    }
}
