//! Rendering module
//!
//! Renderers turn display states into output. They are the only part of the
//! crate that writes to stdout.

pub mod json;
pub mod text;

use std::io::Write;

use clap::ValueEnum;

use crate::{countdown::Zone, error::Result, state::DisplayState};

pub use json::JsonRenderer;
pub use text::TextRenderer;

/// Something that can draw a display state
pub trait Renderer {
    fn render(&mut self, display: &DisplayState) -> Result<()>;
}

/// Output formats selectable on the command line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Counters, progress bar and confetti for a terminal
    #[default]
    Text,
    /// One JSON object per update
    Json,
}

/// Build the renderer for `format` writing to `out`
pub fn renderer_for<W>(
    format: OutputFormat,
    out: W,
    bar_width: usize,
    zone: Zone,
    redraw: bool,
) -> Box<dyn Renderer + Send>
where
    W: Write + Send + 'static,
{
    match format {
        OutputFormat::Text => Box::new(
            TextRenderer::new(out, bar_width, zone)
                .with_redraw(redraw)
                .with_viewport_width(text::terminal_width()),
        ),
        OutputFormat::Json => Box::new(JsonRenderer::new(out)),
    }
}
