//! Terminal renderer: labeled counters, progress bar and a confetti burst

use std::io::Write;

use crossterm::{
    cursor::MoveToPreviousLine,
    terminal::{self, Clear, ClearType},
    QueueableCommand,
};

use super::Renderer;
use crate::{
    countdown::{Breakdown, Zone},
    error::Result,
    state::{DisplayState, Phase},
};

pub const INVALID_TARGET_NOTICE: &str = "Please select a future date.";
pub const COMPLETED_MESSAGE: &str = "Time's up!";

const FALLBACK_WIDTH: u16 = 80;
const CONFETTI_ROWS: usize = 3;
const CONFETTI_GLYPHS: [char; 8] = ['*', '+', 'o', '.', '~', ' ', ' ', ' '];

/// Width of the terminal, or a fallback when it can't be queried
pub fn terminal_width() -> u16 {
    terminal::size().map(|(width, _)| width).unwrap_or(FALLBACK_WIDTH)
}

/// `1 day  0 hours  12 minutes  1 second`
pub fn counters_line(breakdown: &Breakdown) -> String {
    breakdown
        .labeled()
        .iter()
        .map(|(value, label)| format!("{} {}", value, label))
        .collect::<Vec<_>>()
        .join("  ")
}

/// A `[████░░░░]  50%` bar with `width` cells between the brackets
pub fn progress_bar(percent: f64, width: usize) -> String {
    let percent = percent.clamp(0.0, 100.0);
    let filled = ((width as f64) * percent / 100.0).round() as usize;
    let filled = filled.min(width);

    format!(
        "[{}{}] {:3.0}%",
        "█".repeat(filled),
        "░".repeat(width - filled),
        percent
    )
}

/// Rows of confetti exactly `width` cells wide
pub fn confetti(width: u16, rows: usize) -> Vec<String> {
    (0..rows)
        .map(|row| {
            (0..width as usize)
                .map(|col| {
                    let spread = (row * 31 + col * 17 + (col / 3) * 7) % CONFETTI_GLYPHS.len();
                    CONFETTI_GLYPHS[spread]
                })
                .collect()
        })
        .collect()
}

/// Draws display states as a block of text, optionally redrawing in place
pub struct TextRenderer<W: Write> {
    out: W,
    bar_width: usize,
    zone: Zone,
    viewport_width: u16,
    redraw: bool,
    lines_drawn: u16,
    celebrated: bool,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W, bar_width: usize, zone: Zone) -> Self {
        Self {
            out,
            bar_width,
            zone,
            viewport_width: FALLBACK_WIDTH,
            redraw: false,
            lines_drawn: 0,
            celebrated: false,
        }
    }

    /// Erase the previous frame before drawing the next one
    pub fn with_redraw(mut self, redraw: bool) -> Self {
        self.redraw = redraw;
        self
    }

    /// Width the confetti is sized to
    pub fn with_viewport_width(mut self, width: u16) -> Self {
        self.viewport_width = width;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Lines of one frame, without the celebration
    pub fn frame(&self, display: &DisplayState) -> Vec<String> {
        let mut lines = Vec::with_capacity(5);

        let shown = display
            .target
            .map(|target| self.zone.naive_of(target).format("%Y-%m-%d %H:%M:%S").to_string());
        match (display.phase, shown) {
            (Phase::Idle, _) | (_, None) => lines.push("Pick a date and time to start".to_string()),
            (Phase::Invalid, Some(shown)) => lines.push(format!("Target {}", shown)),
            (_, Some(shown)) => lines.push(format!("Counting down to {}", shown)),
        }
        if display.show_error {
            lines.push(INVALID_TARGET_NOTICE.to_string());
        }
        lines.push(counters_line(&display.breakdown));
        lines.push(progress_bar(display.progress, self.bar_width));
        if display.phase == Phase::Completed {
            lines.push(COMPLETED_MESSAGE.to_string());
        }

        lines
    }
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn render(&mut self, display: &DisplayState) -> Result<()> {
        if self.redraw && self.lines_drawn > 0 {
            self.out
                .queue(MoveToPreviousLine(self.lines_drawn))?
                .queue(Clear(ClearType::FromCursorDown))?;
        }

        let mut lines = self.frame(display);
        // One burst per completion
        if display.show_celebration && !self.celebrated {
            lines.extend(confetti(self.viewport_width, CONFETTI_ROWS));
        }
        self.celebrated = display.show_celebration;

        for line in &lines {
            writeln!(self.out, "{}", line)?;
        }
        self.out.flush()?;
        self.lines_drawn = lines.len() as u16;

        Ok(())
    }
}
