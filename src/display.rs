//! Live terminal view of the guitar state.

use std::io::Write;

use embassy_time::{Duration, Instant};
use guitar_core::{OutputError, OutputSink, SnapshotEvent};
use guitar_proto::{AnalogInput, DigitalInput, GuitarState};

/// Minimum time between two redraws.
pub const REFRESH_INTERVAL: Duration = Duration::from_millis(30);

/// Redraws the current state in place on a VT100 terminal.
pub struct TerminalDisplay<W: Write> {
    out: W,
    lines: Vec<String>,
    last_draw: Option<Instant>,
    last_flush: Option<Instant>,
}

impl<W: Write> TerminalDisplay<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            lines: Vec::new(),
            last_draw: None,
            last_flush: None,
        }
    }

    /// Draw `event` if the last redraw is old enough.
    ///
    /// A flushed event also restarts the "last flush" clock. A reader that
    /// keeps up flushes on nearly every record, so flushed events are drawn
    /// like any other. Returns whether anything was written.
    pub fn render(&mut self, event: &SnapshotEvent, now: Instant) -> std::io::Result<bool> {
        if event.flushed {
            self.last_flush = Some(now);
        }
        if let Some(last) = self.last_draw {
            if now.saturating_duration_since(last) < REFRESH_INTERVAL {
                return Ok(false);
            }
        }

        let since_flush = self.last_flush.map(|at| now.saturating_duration_since(at));
        let mut lines = format_lines(&event.state, since_flush);

        // Blank out whatever the previous frame left beyond the new text.
        for (line, old) in lines.iter_mut().zip(&self.lines) {
            let (new_len, old_len) = (line.chars().count(), old.chars().count());
            if new_len < old_len {
                line.extend(std::iter::repeat(' ').take(old_len - new_len));
            }
        }

        let mut frame = String::new();
        if !self.lines.is_empty() {
            frame.push_str(&format!("\x1B[{}A", self.lines.len()));
        }
        for line in &lines {
            frame.push_str(line);
            frame.push('\n');
        }

        self.out.write_all(frame.as_bytes())?;
        self.out.flush()?;

        self.lines = lines;
        self.last_draw = Some(now);
        Ok(true)
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Text lines for one state.
pub fn format_lines(state: &GuitarState, since_flush: Option<Duration>) -> Vec<String> {
    let mut lines = Vec::with_capacity(DigitalInput::ALL.len() + AnalogInput::ALL.len() + 2);

    lines.push(format!("Uptime: {}", state.uptime));
    for input in DigitalInput::ALL {
        let status = if state.digital(input) { "Active" } else { "Inactive" };
        lines.push(format!("DIO {}: {}", input.name(), status));
    }
    for input in AnalogInput::ALL {
        lines.push(format!("AIO {}: {:.4}", input.name(), state.analog(input)));
    }
    if let Some(elapsed) = since_flush {
        lines.push(format!("Last flush: {} ms ago", elapsed.as_millis()));
    }

    lines
}

impl<W: Write> OutputSink for TerminalDisplay<W> {
    async fn send(&mut self, event: &SnapshotEvent) -> Result<(), OutputError> {
        self.render(event, Instant::now())
            .map(|_| ())
            .map_err(|e| {
                log::warn!("Display write failed: {}", e);
                OutputError::Io
            })
    }

    fn is_ready(&self) -> bool {
        true
    }
}
