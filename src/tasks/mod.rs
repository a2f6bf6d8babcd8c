//! Background tasks module
//!
//! This module contains the cooperative tasks that make up a countdown
//! session: reading edits, refreshing the countdown and rendering it.

pub mod input_reader;
pub mod refresh_loop;
pub mod render_loop;

// Re-export main functions
pub use input_reader::{apply_command, input_reader_task, Command, CommandOutcome, InputOutcome};
pub use refresh_loop::refresh_loop_task;
pub use render_loop::{render_loop_task, wait_for_settled};
