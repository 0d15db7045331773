use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinner shown while a dashboard load is in flight
pub struct LoadSpinner {
    bar: Option<ProgressBar>,
}

impl LoadSpinner {
    /// Start a spinner, or a no-op when `enabled` is false
    pub fn start(enabled: bool, message: &str) -> Self {
        if !enabled {
            return Self { bar: None };
        }

        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            bar.set_style(style);
        }
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(120));
        Self { bar: Some(bar) }
    }

    pub fn is_active(&self) -> bool {
        self.bar.is_some()
    }

    /// Stop and erase the spinner
    pub fn finish(self) {
        if let Some(bar) = self.bar {
            bar.finish_and_clear();
        }
    }
}
