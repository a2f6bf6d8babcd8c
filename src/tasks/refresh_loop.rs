//! Refresh loop background task

use std::sync::Arc;
use tokio::sync::broadcast::{error::RecvError, Receiver};
use tracing::{debug, info, warn};

use crate::{
    countdown::Clock,
    state::{AppState, Phase, RefreshMachine, TargetChange},
};

/// Background task that validates target edits and refreshes the countdown
/// on every tick until the target is reached.
///
/// Ends when the target channel closes.
pub async fn refresh_loop_task(
    state: Arc<AppState>,
    mut target_rx: Receiver<TargetChange>,
    clock: Arc<dyn Clock>,
    mut machine: RefreshMachine,
) {
    info!("Starting refresh loop");
    state.publish(machine.snapshot());

    loop {
        tokio::select! {
            // Tick of the armed ticker - refresh against the clock
            _ = machine.next_tick() => {
                let display = machine.tick(clock.now());
                if display.phase == Phase::Completed {
                    info!("Countdown reached zero");
                }
                state.publish(display);
            }

            // Target edit - revalidate, replacing any armed ticker
            change = target_rx.recv() => {
                match change {
                    Ok(change) => {
                        debug!("Refresh loop received {} edit: {}", change.action, change.target);
                        let display = machine.set_target(change.target, clock.now());
                        state.publish(display);
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!("Refresh loop skipped {} target edits", skipped);
                    }
                    Err(RecvError::Closed) => {
                        info!("Target channel closed, stopping refresh loop");
                        break;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::countdown::{ManualClock, TargetInput, Zone};
    use chrono::{Duration, TimeZone, Utc};

    #[tokio::test(start_paused = true)]
    async fn publishes_idle_state_first() {
        let now = Utc.timestamp_opt(1_800_000_000, 0).unwrap();
        let state = Arc::new(AppState::new(TargetInput::showing(now, Zone::Utc), Zone::Utc));
        let mut display_rx = state.subscribe_display();
        let target_rx = state.subscribe_targets();
        let clock: Arc<dyn Clock> = Arc::new(ManualClock::new(now));

        let handle = tokio::spawn(refresh_loop_task(
            Arc::clone(&state),
            target_rx,
            clock,
            RefreshMachine::default(),
        ));

        display_rx.changed().await.unwrap();
        assert_eq!(display_rx.borrow().phase, Phase::Idle);

        state.set_offset(now, Duration::seconds(30)).unwrap();
        display_rx.changed().await.unwrap();
        assert_eq!(display_rx.borrow().phase, Phase::Running);

        handle.abort();
    }
}
