//! Single-line terminal chart: readout, target and a sparkline of the window.

use std::io::Write;

use tracing::warn;

use sensorlab_core::preset::EMPTY_HISTORY_HINT;
use sensorlab_core::{ReadingBand, Snapshot};
use sensorlab_runtime::DisplayAdapter;

const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

pub struct TerminalDisplay<W: Write + Send> {
    out: W,
    title: &'static str,
}

impl<W: Write + Send> TerminalDisplay<W> {
    pub fn new(out: W, title: &'static str) -> Self {
        Self { out, title }
    }

    /// Ends the status line.
    pub fn finish(&mut self) {
        let _ = writeln!(self.out);
    }

    fn line(&self, snapshot: &Snapshot) -> String {
        if snapshot.history.is_empty() {
            return format!("{}: {}", self.title, EMPTY_HISTORY_HINT);
        }
        let readout = snapshot.readout();
        let band = match readout.band {
            Some(band) => format!(" ({})", band_label(band)),
            None => String::new(),
        };
        format!(
            "{} {}: {}{} target {:.1}{} noise {:.0} {}{}\x1b[0m {}",
            if snapshot.running { "▶" } else { "❚❚" },
            self.title,
            readout,
            band,
            snapshot.target_value,
            snapshot.unit,
            snapshot.noise_level,
            ansi_color(snapshot.color),
            sparkline(snapshot),
            snapshot.history.len(),
        )
    }
}

impl<W: Write + Send> DisplayAdapter for TerminalDisplay<W> {
    fn render(&mut self, snapshot: &Snapshot) {
        let line = self.line(snapshot);
        if let Err(e) = write!(self.out, "\r\x1b[2K{line}").and_then(|_| self.out.flush()) {
            warn!("Failed to draw simulation: {e}");
        }
    }
}

fn band_label(band: ReadingBand) -> &'static str {
    match band {
        ReadingBand::Cold => "cold",
        ReadingBand::Cool => "cool",
        ReadingBand::Warm => "warm",
        ReadingBand::Hot => "hot",
    }
}

/// 24-bit foreground escape for a `#rrggbb` colour; empty when unparseable.
fn ansi_color(hex: &str) -> String {
    let Some(digits) = hex.strip_prefix('#').filter(|d| d.len() == 6) else {
        return String::new();
    };
    let channel = |i: usize| u8::from_str_radix(digits.get(i..i + 2)?, 16).ok();
    match (channel(0), channel(2), channel(4)) {
        (Some(r), Some(g), Some(b)) => format!("\x1b[38;2;{r};{g};{b}m"),
        _ => String::new(),
    }
}

/// One bar per sample, scaled to the fixed axis range rather than the data.
pub fn sparkline(snapshot: &Snapshot) -> String {
    let span = snapshot.max - snapshot.min;
    snapshot
        .history
        .iter()
        .map(|sample| {
            let level = ((sample.value - snapshot.min) / span).clamp(0.0, 1.0);
            BARS[(level * (BARS.len() - 1) as f64).round() as usize]
        })
        .collect()
}
