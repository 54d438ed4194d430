//! Terminal progress bar fed by the engine's progress callback.

use std::time::Duration;

use edgefetch_download::{ProgressCallback, throttled};
use indicatif::{HumanBytes, ProgressBar, ProgressState, ProgressStyle};

/// Minimum time between redraws.
pub const REDRAW_INTERVAL: Duration = Duration::from_millis(100);

const MAX_LABEL: usize = 40;

/// One progress bar per transferred file.
pub struct TransferProgress {
    bar: ProgressBar,
}

impl TransferProgress {
    /// Bar labelled with `label`, starting as a spinner until a total is known.
    pub fn new(label: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(spinner_style());
        bar.set_message(format_label(label));
        bar.enable_steady_tick(REDRAW_INTERVAL);
        Self { bar }
    }

    /// Hidden bar, for non-interactive output.
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    /// Throttled callback that drives this bar.
    pub fn callback(&self) -> ProgressCallback {
        let bar = self.bar.clone();
        let raw: ProgressCallback = std::sync::Arc::new(move |downloaded, total| {
            apply(&bar, downloaded, total);
        });
        throttled(raw, REDRAW_INTERVAL)
    }

    /// Remove the bar from the terminal.
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }

    #[cfg(test)]
    fn position(&self) -> (u64, Option<u64>) {
        (self.bar.position(), self.bar.length())
    }
}

fn apply(bar: &ProgressBar, downloaded: u64, total: Option<u64>) {
    match total {
        Some(total) if total > 0 => {
            if bar.length() != Some(total) {
                if bar.length().is_none() {
                    bar.set_style(bar_style());
                }
                bar.set_length(total);
            }
            bar.set_position(downloaded.min(total));
        }
        _ => bar.set_position(downloaded),
    }
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner} {msg} {human_bytes}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .with_key("human_bytes", |state: &ProgressState, w: &mut dyn std::fmt::Write| {
            let _ = write!(w, "{}", HumanBytes(state.pos()));
        })
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template(
        "{msg} {bar:28.cyan/blue} {human_bytes:>9} / {human_total:>9} ({percent:>3}%) @ {binary_bytes_per_sec} ETA {eta}",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .with_key("human_bytes", |state: &ProgressState, w: &mut dyn std::fmt::Write| {
        let _ = write!(w, "{}", HumanBytes(state.pos()));
    })
    .with_key("human_total", |state: &ProgressState, w: &mut dyn std::fmt::Write| {
        let value = state
            .len()
            .map_or_else(|| "?".to_string(), |len| HumanBytes(len).to_string());
        let _ = write!(w, "{value}");
    })
}

fn format_label(raw: &str) -> String {
    if raw.chars().count() <= MAX_LABEL {
        return raw.to_string();
    }
    let mut buf: String = raw.chars().take(MAX_LABEL - 1).collect();
    buf.push('…');
    buf
}
