//! Progress display.
//!
//! Provides text progress bars and a spinner shown while `gh` runs.

use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};

use super::colors::*;

const SPINNER_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// Make a progress bar string.
pub fn make_progress_bar(completed: usize, total: usize, width: usize) -> String {
    if total == 0 {
        return " ".repeat(width);
    }
    let filled = (completed.min(total) * width) / total;
    let empty = width - filled;
    format!(
        "{GREEN}{}{RESET}{GRAY}{}{RESET}",
        "█".repeat(filled),
        "░".repeat(empty)
    )
}

/// Format a duration as `1m 5s` or `850ms`.
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs == 0 {
        return format!("{}ms", duration.as_millis());
    }
    let mins = secs / 60;
    if mins == 0 {
        format!("{}s", secs)
    } else {
        format!("{}m {}s", mins, secs % 60)
    }
}

/// Spinner displayed while a blocking external call runs.
///
/// The spinner is cleared when dropped, so early returns leave no residue.
pub struct Spinner {
    bar: ProgressBar,
    message: String,
    start_time: Instant,
}

impl Spinner {
    pub fn start(message: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .tick_chars(SPINNER_CHARS)
            .template("{spinner:.cyan} {msg}")
        {
            bar.set_style(style);
        }
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(80));

        Self {
            bar,
            message: message.to_string(),
            start_time: Instant::now(),
        }
    }

    pub fn finish_success(&self) {
        self.bar.finish_and_clear();
        println!(
            "{GREEN}✓{RESET} {} {GRAY}({}){RESET}",
            self.message,
            format_duration(self.start_time.elapsed())
        );
    }

    pub fn finish_error(&self, error: &str) {
        self.bar.finish_and_clear();
        println!("{RED}✗{RESET} {} {GRAY}- {}{RESET}", self.message, error);
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_bar_empty_total() {
        assert_eq!(make_progress_bar(0, 0, 8), " ".repeat(8));
    }

    #[test]
    fn test_progress_bar_fill() {
        let bar = make_progress_bar(1, 2, 10);
        assert_eq!(bar.matches('█').count(), 5);
        assert_eq!(bar.matches('░').count(), 5);
    }

    #[test]
    fn test_progress_bar_clamps_overflow() {
        let bar = make_progress_bar(5, 2, 4);
        assert_eq!(bar.matches('█').count(), 4);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(250)), "250ms");
        assert_eq!(format_duration(Duration::from_secs(42)), "42s");
        assert_eq!(format_duration(Duration::from_secs(125)), "2m 5s");
    }

    #[test]
    fn test_spinner_finish_and_drop() {
        let spinner = Spinner::start("Listing issues");
        spinner.finish_success();
        let spinner = Spinner::start("Creating release");
        spinner.finish_error("HTTP 502");
        let _dropped = Spinner::start("Abandoned");
    }
}
