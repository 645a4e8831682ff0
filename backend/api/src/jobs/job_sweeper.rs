//! Expired-job sweeper
//!
//! Transitions approved jobs past their expiry to `closed` on a fixed
//! interval, and prunes expired session rows while it is at it. The
//! jobs listing also closes lazily, so the sweep only has to keep the
//! table tidy between requests.

use crate::db::{job_repo, session_repo};
use sqlx::PgPool;
use std::time::{Duration, Instant};
use tokio::time::sleep;

pub async fn start_job_sweeper(db: PgPool, interval: Duration) {
    tracing::info!(
        interval_secs = interval.as_secs(),
        "starting expired-job sweeper"
    );

    loop {
        sleep(interval).await;

        let cycle_start = Instant::now();
        match run_sweep(&db).await {
            Ok((closed_jobs, pruned_sessions)) => {
                tracing::info!(
                    closed_jobs,
                    pruned_sessions,
                    duration_ms = cycle_start.elapsed().as_millis(),
                    "sweep cycle completed"
                );
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    duration_ms = cycle_start.elapsed().as_millis(),
                    "sweep cycle failed"
                );
            }
        }
    }
}

async fn run_sweep(db: &PgPool) -> Result<(u64, u64), sqlx::Error> {
    let closed_jobs = job_repo::close_expired(db).await?;
    let pruned_sessions = session_repo::cleanup_expired(db).await?;

    Ok((closed_jobs, pruned_sessions))
}
