//! Shared session state: the input fields and the notification channels

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use tokio::sync::{broadcast, watch};
use tracing::{info, warn};

use super::DisplayState;
use crate::{
    countdown::{TargetInput, Zone},
    error::{CountdownError, Result},
};

/// A committed edit of the input fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetChange {
    /// What was edited, e.g. "date" or "time"
    pub action: &'static str,
    pub input: TargetInput,
    pub target: DateTime<Utc>,
}

/// Session state shared between the input, refresh and render tasks
#[derive(Debug)]
pub struct AppState {
    /// Date and time fields as last successfully edited
    pub input: Arc<Mutex<TargetInput>>,
    /// Zone the fields are read in
    pub zone: Zone,
    /// Channel announcing every committed target edit
    pub target_change_tx: broadcast::Sender<TargetChange>,
    /// Channel carrying the latest display state
    pub display_tx: watch::Sender<DisplayState>,
    /// Keep the receiver alive to prevent channel closure
    pub _display_rx: watch::Receiver<DisplayState>,
}

impl AppState {
    /// Create the session with fields showing `input`. Nothing is armed yet.
    pub fn new(input: TargetInput, zone: Zone) -> Self {
        let (target_change_tx, _) = broadcast::channel(16);
        let (display_tx, display_rx) = watch::channel(DisplayState::new());

        Self {
            input: Arc::new(Mutex::new(input)),
            zone,
            target_change_tx,
            display_tx,
            _display_rx: display_rx,
        }
    }

    /// Apply `editor` to a copy of the fields and commit it if the result
    /// resolves to an instant. The fields are untouched on error.
    pub fn edit<F>(&self, action: &'static str, editor: F) -> Result<TargetChange>
    where
        F: FnOnce(&mut TargetInput) -> Result<()>,
    {
        let mut input = self
            .input
            .lock()
            .map_err(|e| CountdownError::StateLock(format!("input fields: {}", e)))?;

        let mut edited = *input;
        editor(&mut edited)?;
        let target = edited.resolve(self.zone)?;
        *input = edited;
        drop(input); // Release the lock early

        let change = TargetChange {
            action,
            input: edited,
            target,
        };
        info!("Target set by {} edit: {}", action, edited.combined());

        // Notify the refresh loop
        if let Err(e) = self.target_change_tx.send(change.clone()) {
            warn!("Failed to send target change notification: {}", e);
        }

        Ok(change)
    }

    /// Edit the date field
    pub fn set_date(&self, raw: &str) -> Result<TargetChange> {
        self.edit("date", |input| input.set_date(raw))
    }

    /// Edit the time field
    pub fn set_time(&self, raw: &str) -> Result<TargetChange> {
        self.edit("time", |input| input.set_time(raw))
    }

    /// Edit both fields as a single change
    pub fn set_date_time(&self, raw_date: &str, raw_time: &str) -> Result<TargetChange> {
        self.edit("date-time", |input| input.set_date_time(raw_date, raw_time))
    }

    /// Point both fields at `now + offset`, rounded up to the next whole second.
    /// Offsets landing outside the representable calendar are rejected.
    pub fn set_offset(&self, now: DateTime<Utc>, offset: Duration) -> Result<TargetChange> {
        let zone = self.zone;
        let out_of_range = || CountdownError::OffsetOutOfRange(offset.to_string());
        self.edit("offset", |input| {
            let target = now.checked_add_signed(offset).ok_or_else(out_of_range)?;
            let shown = TargetInput::showing(target, zone);
            *input = if shown.resolve(zone)? < target {
                let rounded = target
                    .checked_add_signed(Duration::seconds(1))
                    .ok_or_else(out_of_range)?;
                TargetInput::showing(rounded, zone)
            } else {
                shown
            };
            Ok(())
        })
    }

    /// Current field values
    pub fn get_input(&self) -> Result<TargetInput> {
        self.input
            .lock()
            .map(|input| *input)
            .map_err(|e| CountdownError::StateLock(format!("input fields: {}", e)))
    }

    /// Subscribe to committed target edits
    pub fn subscribe_targets(&self) -> broadcast::Receiver<TargetChange> {
        self.target_change_tx.subscribe()
    }

    /// Subscribe to display states
    pub fn subscribe_display(&self) -> watch::Receiver<DisplayState> {
        self.display_tx.subscribe()
    }

    /// Publish a new display state
    pub fn publish(&self, display: DisplayState) {
        if let Err(e) = self.display_tx.send(display) {
            warn!("Failed to send display update: {}", e);
        }
    }

    /// Announce the current display state again so renderers redraw it
    pub fn republish(&self) {
        self.display_tx.send_modify(|_| {});
    }

    /// Latest published display state
    pub fn get_display(&self) -> DisplayState {
        self.display_tx.borrow().clone()
    }
}
