//! Periodic refresh broadcast for relative time labels

use std::time::Duration;
use tokio::{sync::broadcast, time::interval};
use tracing::{debug, info};

/// Background task that pulses `tx` every `period`, independent of the countdown
pub async fn live_ticker_task(tx: broadcast::Sender<u64>, period: Duration) {
    info!("Starting live ticker every {}s", period.as_secs());

    let mut interval = interval(period);
    // The first tick completes immediately.
    interval.tick().await;

    let mut pulse: u64 = 0;
    loop {
        interval.tick().await;
        pulse += 1;

        // No subscribers just means no view is listening right now.
        if tx.send(pulse).is_err() {
            debug!("Live ticker pulse {} had no subscribers", pulse);
        }
    }
}
