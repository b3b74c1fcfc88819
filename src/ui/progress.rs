use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinner shown while a form submission is in flight.
///
/// indicatif hides the bar on its own when stderr is not a terminal, so
/// scripted runs stay quiet.
pub struct SubmitSpinner {
    bar: ProgressBar,
}

impl SubmitSpinner {
    pub fn start(message: &str) -> Self {
        let style = ProgressStyle::default_spinner()
            .template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());

        let bar = ProgressBar::new_spinner();
        bar.set_style(style);
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar }
    }

    /// Stop ticking and erase the spinner line.
    pub fn finish(self) {
        self.bar.finish_and_clear();
    }
}

impl Drop for SubmitSpinner {
    fn drop(&mut self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}
