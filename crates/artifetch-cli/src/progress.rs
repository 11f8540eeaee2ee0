//! Progress spinner for extraction.

use artifetch_core::ProgressCallback;
use console::Term;
use indicatif::ProgressBar;
use indicatif::ProgressStyle;
use std::path::Path;
use std::time::Duration;

/// CLI spinner implementing `ProgressCallback`.
///
/// A tar stream's entry count is only known at the end, so this shows a
/// spinner with the running entry count and bytes written instead of a bar.
pub struct CliProgress {
    bar: ProgressBar,
    label: String,
    bytes_written: u64,
}

impl CliProgress {
    /// Creates a spinner labelled with `message` (e.g. "Extracting").
    #[must_use]
    pub fn new(message: &str) -> Self {
        let bar = ProgressBar::new_spinner();

        // Template: "⠋ Extracting (15.2 MB) 42 entries a/b.txt"
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg} {pos} entries {prefix:.dim}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));

        Self {
            bar,
            label: message.to_string(),
            bytes_written: 0,
        }
    }

    /// Progress is only drawn on an interactive terminal.
    #[must_use]
    pub fn should_show(quiet: bool) -> bool {
        !quiet && Term::stderr().is_term()
    }
}

impl Drop for CliProgress {
    fn drop(&mut self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressCallback for CliProgress {
    fn on_entry_start(&mut self, path: &Path, _current: usize) {
        self.bar.set_prefix(path.display().to_string());
    }

    fn on_bytes_written(&mut self, bytes: u64) {
        self.bytes_written += bytes;
        self.bar.set_message(format!(
            "{} ({})",
            self.label,
            humanize_bytes(self.bytes_written)
        ));
    }

    fn on_entry_complete(&mut self, _path: &Path) {
        self.bar.inc(1);
    }

    fn on_complete(&mut self) {
        self.bar.finish_and_clear();
    }
}

/// Converts bytes to human-readable format (KB, MB, GB, TB).
pub fn humanize_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;
    const TB: u64 = GB * 1024;

    if bytes >= TB {
        format!("{:.1} TB", bytes as f64 / TB as f64)
    } else if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}
