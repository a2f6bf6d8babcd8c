//! Countdown Clock - count down to a date and time in the terminal
//!
//! This is the main entry point for the countdown-clock application.

use std::{future::pending, io, sync::Arc};

use anyhow::Context;
use tokio::{io::BufReader, task::JoinHandle};
use tracing::{debug, error, info};

use countdown_clock::{
    config::Config,
    countdown::TargetInput,
    error::CountdownError,
    render::renderer_for,
    state::{AppState, DisplayState, Phase, RefreshMachine},
    tasks::{input_reader_task, refresh_loop_task, render_loop_task, wait_for_settled, InputOutcome},
    utils::shutdown_signal,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Logs go to stderr, stdout belongs to the renderer
    tracing_subscriber::fmt()
        .with_env_filter(format!("countdown_clock={}", config.log_level()))
        .with_writer(io::stderr)
        .init();

    info!("Starting countdown-clock v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: format={:?}, zone={:?}, clock={:?}, bar_width={}",
        config.format,
        config.zone(),
        config.clock,
        config.bar_width
    );

    let clock = config.clock();
    let zone = config.zone();

    // Fields start out showing now; nothing is armed until they are edited
    let state = Arc::new(AppState::new(TargetInput::showing(clock.now(), zone), zone));
    let fields = state.get_input()?;
    info!("Fields show {} {}", fields.date(), fields.time());

    // Subscribe before the first edit so the refresh loop sees it
    let target_rx = state.subscribe_targets();
    let mut settled_rx = state.subscribe_display();

    let renderer = renderer_for(config.format, io::stdout(), config.bar_width, zone, config.redraw());
    let render = tokio::spawn(render_loop_task(state.subscribe_display(), renderer));

    let refresh = tokio::spawn(refresh_loop_task(
        Arc::clone(&state),
        target_rx,
        Arc::clone(&clock),
        RefreshMachine::default(),
    ));

    config
        .apply_startup_edits(&state)
        .context("invalid --date or --time")?;

    let mut input = (!config.no_input).then(|| {
        tokio::spawn(input_reader_task(
            Arc::clone(&state),
            BufReader::new(tokio::io::stdin()),
            Arc::clone(&clock),
        ))
    });

    // Without stdin nothing can replace an invalid target
    let stop_on_invalid = config.no_input;

    let exit_code = tokio::select! {
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
            0
        }
        _ = wait_for_quit(&mut input) => 0,
        settled = wait_for_settled(&mut settled_rx, stop_on_invalid), if config.exit_on_complete => {
            match settled {
                Some(DisplayState { phase: Phase::Invalid, target: Some(target), .. }) => {
                    error!("{}", CountdownError::PastTarget { target });
                    1
                }
                _ => 0,
            }
        }
    };

    // Stop everything holding the session so the renderer drains and ends
    refresh.abort();
    let _ = refresh.await;
    if let Some(handle) = input.take() {
        handle.abort();
        let _ = handle.await;
    }
    drop(settled_rx);
    drop(state);

    match render.await {
        Ok(Ok(())) => debug!("Renderer finished"),
        Ok(Err(e)) => error!("Renderer failed: {}", e),
        Err(e) => error!("Render task failed: {}", e),
    }

    info!("Shutdown complete");
    // A pending stdin read would keep the runtime from shutting down
    std::process::exit(exit_code);
}

/// Resolve when the input task reads `quit`. Pends forever otherwise.
/// Clears `input` once the task has finished.
async fn wait_for_quit(input: &mut Option<JoinHandle<InputOutcome>>) {
    let Some(handle) = input.as_mut() else {
        return pending().await;
    };

    let outcome = handle.await;
    // A finished handle must not be awaited again
    *input = None;

    match outcome {
        Ok(InputOutcome::Quit) => {}
        Ok(InputOutcome::EndOfInput) => {
            debug!("No more commands, waiting for completion or a signal");
            pending::<()>().await
        }
        Err(e) => {
            error!("Input task failed: {}", e);
            pending::<()>().await
        }
    }
}
