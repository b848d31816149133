//! Background jobs.
//!
//! The weekly draw normally runs on the first page load after the Monday
//! boundary. This task makes it happen even when nobody opens the page.

use crate::models::DrawOutcome;
use crate::services::LotteryService;
use chrono::Utc;

/// Spawn the draw poller. Detaches via `tokio::spawn`; does not block.
pub fn spawn_all(lottery_service: LotteryService, poll_interval_secs: u64) {
    let interval = std::time::Duration::from_secs(poll_interval_secs.max(1));
    tokio::spawn(async move {
        loop {
            match lottery_service.run_draw_if_due(Utc::now()).await {
                Ok(DrawOutcome::Executed {
                    draw_time,
                    winners,
                    reserves,
                }) => log::info!(
                    "Scheduled draw {draw_time} done: {winners} winners, {reserves} reserves"
                ),
                Ok(outcome) => log::debug!("Scheduled draw check: {outcome:?}"),
                Err(e) => log::error!("Scheduled draw failed: {e:?}"),
            }
            tokio::time::sleep(interval).await;
        }
    });
}
