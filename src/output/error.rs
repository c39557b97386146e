//! Error panel display.
//!
//! Provides boxed error display with wrapped message and suggested remedies.

use super::colors::*;

const ERROR_PANEL_WIDTH: usize = 60;

/// Print a boxed error panel: a header naming the failure category, the
/// message, and optional remedies.
pub fn print_error_panel(category: &str, message: &str, remedies: &[String]) {
    for line in format_error_panel(category, message, remedies) {
        println!("{RED}{}{RESET}", line);
    }
}

/// Build the panel lines without color so they can be tested.
pub fn format_error_panel(category: &str, message: &str, remedies: &[String]) -> Vec<String> {
    let top_border = format!("╔{}╗", "═".repeat(ERROR_PANEL_WIDTH - 2));
    let bottom_border = format!("╚{}╝", "═".repeat(ERROR_PANEL_WIDTH - 2));
    let separator = format!("╟{}╢", "─".repeat(ERROR_PANEL_WIDTH - 2));

    let mut lines = vec![top_border];

    let header = format!(" ERROR: {} ", category);
    let header_padding = (ERROR_PANEL_WIDTH - 2).saturating_sub(header.chars().count());
    let left_pad = header_padding / 2;
    let right_pad = header_padding - left_pad;
    lines.push(format!(
        "║{}{}{}║",
        " ".repeat(left_pad),
        header,
        " ".repeat(right_pad)
    ));
    lines.push(separator.clone());

    for chunk in wrap(message.trim(), ERROR_PANEL_WIDTH - 4) {
        lines.push(panel_line(&chunk));
    }

    if !remedies.is_empty() {
        lines.push(separator);
        lines.push(panel_line("Try:"));
        for remedy in remedies {
            for chunk in wrap(remedy, ERROR_PANEL_WIDTH - 8) {
                lines.push(panel_line(&format!("  - {}", chunk)));
            }
        }
    }

    lines.push(bottom_border);
    lines
}

fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut out = Vec::new();
    for line in text.lines() {
        let mut current = String::new();
        for word in line.split_whitespace() {
            let needed = if current.is_empty() {
                word.chars().count()
            } else {
                current.chars().count() + 1 + word.chars().count()
            };
            if needed > width && !current.is_empty() {
                out.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }
        out.push(current);
    }
    out
}

fn panel_line(text: &str) -> String {
    let max_width = ERROR_PANEL_WIDTH - 4;
    let display: String = text.chars().take(max_width).collect();
    let padding = max_width.saturating_sub(display.chars().count());
    format!("║ {}{} ║", display, " ".repeat(padding))
}
