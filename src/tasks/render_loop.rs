//! Render loop and completion watching

use tokio::sync::watch::Receiver;
use tracing::{debug, error};

use crate::{
    error::Result,
    render::Renderer,
    state::{DisplayState, Phase},
};

/// Background task drawing every published display state.
///
/// Draws the current state immediately, then each change. Ends once the
/// sender is gone and the last state has been drawn.
pub async fn render_loop_task(
    mut display_rx: Receiver<DisplayState>,
    mut renderer: Box<dyn Renderer + Send>,
) -> Result<()> {
    loop {
        let display = display_rx.borrow_and_update().clone();
        if let Err(e) = renderer.render(&display) {
            error!("Failed to render display: {}", e);
            return Err(e);
        }

        if display_rx.changed().await.is_err() {
            debug!("Display channel closed, stopping render loop");
            return Ok(());
        }
    }
}

/// Wait until the countdown settles: `Completed`, or `Invalid` when
/// `stop_on_invalid` is set. Returns `None` if the channel closes first.
pub async fn wait_for_settled(
    display_rx: &mut Receiver<DisplayState>,
    stop_on_invalid: bool,
) -> Option<DisplayState> {
    loop {
        {
            let display = display_rx.borrow_and_update();
            match display.phase {
                Phase::Completed => return Some(display.clone()),
                Phase::Invalid if stop_on_invalid => return Some(display.clone()),
                _ => {}
            }
        }

        if display_rx.changed().await.is_err() {
            return None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tokio::sync::watch;

    struct Recorder(Arc<Mutex<Vec<Phase>>>);

    impl Renderer for Recorder {
        fn render(&mut self, display: &DisplayState) -> Result<()> {
            self.0.lock().unwrap().push(display.phase);
            Ok(())
        }
    }

    #[tokio::test]
    async fn draws_last_state_before_stopping() {
        let (tx, rx) = watch::channel(DisplayState::new());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let handle = tokio::spawn(render_loop_task(rx, Box::new(Recorder(Arc::clone(&seen)))));

        tx.send(DisplayState { phase: Phase::Completed, ..DisplayState::new() }).unwrap();
        drop(tx);
        handle.await.unwrap().unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.last(), Some(&Phase::Completed));
    }

    #[tokio::test]
    async fn settles_on_invalid_only_when_asked() {
        let (tx, mut rx) = watch::channel(DisplayState { phase: Phase::Invalid, ..DisplayState::new() });
        assert_eq!(wait_for_settled(&mut rx, true).await.map(|d| d.phase), Some(Phase::Invalid));

        let waiter = tokio::spawn(async move { wait_for_settled(&mut rx, false).await });
        tx.send(DisplayState { phase: Phase::Running, ..DisplayState::new() }).unwrap();
        tx.send(DisplayState { phase: Phase::Completed, ..DisplayState::new() }).unwrap();
        assert_eq!(waiter.await.unwrap().map(|d| d.phase), Some(Phase::Completed));
    }
}
