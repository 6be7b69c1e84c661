use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Sink for status updates while revisions are being loaded.
///
/// Callers may stop and start the sink any number of times; the last message
/// set is shown again on the next `start`.
pub trait Progress {
    fn start(&mut self);
    fn set_message(&mut self, message: String);
    fn stop(&mut self);
}

/// Terminal spinner drawn on stderr.
pub struct Spinner {
    bar: Option<ProgressBar>,
    message: String,
}

impl Spinner {
    pub fn new() -> Self {
        Self {
            bar: None,
            message: String::new(),
        }
    }
}

impl Progress for Spinner {
    fn start(&mut self) {
        if self.bar.is_some() {
            return;
        }
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            bar.set_style(style);
        }
        bar.set_message(self.message.clone());
        bar.enable_steady_tick(Duration::from_millis(100));
        self.bar = Some(bar);
    }

    fn set_message(&mut self, message: String) {
        if let Some(bar) = &self.bar {
            bar.set_message(message.clone());
        }
        self.message = message;
    }

    fn stop(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}

/// Discards every update. Used with `--quiet`.
pub struct Silent;

impl Progress for Silent {
    fn start(&mut self) {}
    fn set_message(&mut self, _message: String) {}
    fn stop(&mut self) {}
}
