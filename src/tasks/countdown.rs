//! Countdown ticker background task

use std::{sync::Arc, time::Duration};
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::state::{AppState, Tick};

/// Time between two ticks of a running countdown
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Background task that ticks the countdown once per second until it leaves Running
///
/// Spawned by [`AppState`] when the timer starts; `epoch` ties it to that start so
/// a cancelled ticker can never advance a later countdown.
pub async fn countdown_task(state: Arc<AppState>, epoch: u64) {
    debug!("Countdown ticker {} running", epoch);

    let mut interval = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;

        match state.tick(epoch) {
            Ok(Tick::Counting(remaining)) => {
                debug!("Countdown tick, {}s remaining", remaining);
            }
            Ok(Tick::Expired) => {
                info!("Countdown finished, ticker {} stopping", epoch);
                break;
            }
            Ok(Tick::Ignored) => {
                debug!("Ticker {} no longer current, stopping", epoch);
                break;
            }
            Err(e) => {
                error!("Failed to tick countdown: {}", e);
                break;
            }
        }
    }
}
