//! JSON lines renderer

use std::io::Write;

use super::Renderer;
use crate::{error::Result, state::DisplayState};

/// Writes each display state as one line of JSON
pub struct JsonRenderer<W: Write> {
    out: W,
}

impl<W: Write> JsonRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for JsonRenderer<W> {
    fn render(&mut self, display: &DisplayState) -> Result<()> {
        serde_json::to_writer(&mut self.out, display).map_err(std::io::Error::from)?;
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }
}
