use arrsync_core::RunObserver;
use arrsync_models::{EntryOutcome, WatchlistEntry};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;

/// Per-entry progress for one environment.
///
/// Interactive terminals get a progress bar; otherwise progress is logged.
pub struct SyncUI {
    bar: ProgressBar,
    environment: String,
    interactive: bool,
}

impl SyncUI {
    pub fn new(environment: &str, enabled: bool) -> Self {
        let interactive = enabled && is_interactive();

        let bar = if interactive {
            let bar = ProgressBar::new_spinner();
            bar.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.green} [{elapsed_precise}] {pos}/{len} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner())
                    .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
            );
            bar.set_message(format!("{}: fetching watchlist...", environment));
            bar.enable_steady_tick(std::time::Duration::from_millis(100));
            bar
        } else {
            tracing::debug!(
                operation = "ui_init",
                mode = "non_interactive",
                "Progress bar disabled, using structured logging"
            );
            ProgressBar::hidden()
        };

        Self {
            bar,
            environment: environment.to_string(),
            interactive,
        }
    }

    pub fn finish(&self) {
        if self.interactive {
            self.bar.finish_and_clear();
        }
    }
}

impl RunObserver for SyncUI {
    fn on_fetched(&self, total: usize) {
        self.bar.set_length(total as u64);
        self.bar.set_position(0);
    }

    fn on_entry_started(&self, _index: usize, entry: &WatchlistEntry) {
        if self.interactive {
            self.bar.set_message(format!("{}: {}", self.environment, entry.title));
        }
    }

    fn on_entry_finished(&self, index: usize, entry: &WatchlistEntry, outcome: &EntryOutcome) {
        self.bar.inc(1);
        if !self.interactive {
            tracing::info!(
                operation = "progress",
                environment = %self.environment,
                current = index + 1,
                title = %entry.title,
                outcome = %outcome,
                "Entry processed"
            );
        }
    }
}

pub fn is_interactive() -> bool {
    std::io::stdout().is_terminal() && std::io::stderr().is_terminal()
}
