// GestureWatch - Serial Reporter
//
// Formats one text line per event into a fixed stack buffer and hands it to
// a blocking line sink (the report UART on the device, stdout on the host).
// Lines never exceed REPORT_LINE_MAX bytes: overlong content is cut and the
// "\r\n" terminator is always kept.

use core::fmt::{self, Write};

use heapless::String;

use crate::classifier::Classification;
use crate::config::REPORT_LINE_MAX;

const TERMINATOR: &str = "\r\n";

/// Character sink with a blocking-write contract: `write_line` returns once
/// the whole line is out, or with an error.
pub trait LineSink {
    fn write_line(&mut self, line: &str) -> anyhow::Result<()>;
}

impl<S: LineSink + ?Sized> LineSink for &mut S {
    fn write_line(&mut self, line: &str) -> anyhow::Result<()> {
        (**self).write_line(line)
    }
}

/// Adapter for anything implementing `std::io::Write`.
pub struct IoSink<W>(pub W);

impl<W: std::io::Write> LineSink for IoSink<W> {
    fn write_line(&mut self, line: &str) -> anyhow::Result<()> {
        self.0.write_all(line.as_bytes())?;
        self.0.flush()?;
        Ok(())
    }
}

/// Bounded line buffer. Writes past the content limit are dropped
/// (char-aligned) instead of failing, so a long score dump degrades to a
/// truncated line.
pub struct Line {
    buf: String<REPORT_LINE_MAX>,
    truncated: bool,
}

impl Line {
    /// Bytes available for content; the rest is reserved for the terminator.
    pub const CONTENT_MAX: usize = REPORT_LINE_MAX - TERMINATOR.len();

    pub fn new() -> Self {
        Self {
            buf: String::new(),
            truncated: false,
        }
    }

    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// Append the terminator and return the finished line.
    pub fn finish(mut self) -> String<REPORT_LINE_MAX> {
        // CONTENT_MAX leaves room, this cannot fail.
        let _ = self.buf.push_str(TERMINATOR);
        self.buf
    }
}

impl Default for Line {
    fn default() -> Self {
        Self::new()
    }
}

impl Write for Line {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            if self.buf.len() + c.len_utf8() > Self::CONTENT_MAX {
                self.truncated = true;
                break;
            }
            let _ = self.buf.push(c);
        }
        Ok(())
    }
}

pub struct Reporter<S> {
    sink: S,
    labels: &'static [&'static str],
}

impl<S: LineSink> Reporter<S> {
    pub fn new(sink: S, labels: &'static [&'static str]) -> Self {
        Self { sink, labels }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    fn emit(&mut self, line: Line) -> anyhow::Result<()> {
        if line.is_truncated() {
            log::warn!("report line truncated to {} bytes", REPORT_LINE_MAX);
        }
        let line = line.finish();
        self.sink.write_line(&line)
    }

    /// Single fixed message.
    pub fn text(&mut self, msg: &str) -> anyhow::Result<()> {
        let mut line = Line::new();
        let _ = line.write_str(msg);
        self.emit(line)
    }

    pub fn who_am_i(&mut self, value: u8) -> anyhow::Result<()> {
        let mut line = Line::new();
        let _ = write!(line, "MPU9250 WHO_AM_I = 0x{:02X}", value);
        self.emit(line)
    }

    pub fn recording_started(&mut self) -> anyhow::Result<()> {
        self.text("Recording...")
    }

    /// Data-collection run header, parsed by `capture_log`.
    pub fn new_run(&mut self) -> anyhow::Result<()> {
        self.text(crate::capture_log::RUN_HEADER)
    }

    /// One comma separated sample row (data-collection mode).
    pub fn sample(&mut self, values: &[f32]) -> anyhow::Result<()> {
        let mut line = Line::new();
        for (i, v) in values.iter().enumerate() {
            if i > 0 {
                let _ = line.write_str(", ");
            }
            let _ = write!(line, "{:.3}", v);
        }
        self.emit(line)
    }

    pub fn no_samples(&mut self) -> anyhow::Result<()> {
        self.text("No samples captured")
    }

    pub fn error(&mut self, err: &dyn fmt::Display) -> anyhow::Result<()> {
        let mut line = Line::new();
        let _ = write!(line, "Error: {}", err);
        self.emit(line)
    }

    /// `Class: <label> (Prob: p) | <label>: p <label>: p ...`, scores listed
    /// highest first. `short` carries the sample count of a capture that had
    /// to be stretched well beyond its length.
    pub fn result(&mut self, result: &Classification, short: Option<usize>) -> anyhow::Result<()> {
        let mut line = Line::new();
        let _ = write!(line, "Class: {}", result.label(self.labels));
        if let Some(p) = result.confidence() {
            let _ = write!(line, " (Prob: {:.2})", p);
        }
        if let Some(n) = short {
            let _ = write!(line, " [short: {}]", n);
        }
        let _ = line.write_str(" |");

        for idx in result.ranked() {
            let label = self.labels.get(idx).copied().unwrap_or("?");
            let _ = write!(line, " {}: {:.2}", label, result.scores[idx]);
        }
        self.emit(line)
    }
}
