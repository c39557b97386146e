//! Basic message output functions.
//!
//! Provides simple warning, success, and info message display.

use super::colors::*;

/// Print a warning message.
pub fn print_warning(msg: &str) {
    println!("{YELLOW}Warning:{RESET} {}", msg);
}

/// Print an info message.
pub fn print_info(msg: &str) {
    println!("{CYAN}Info:{RESET} {}", msg);
}

/// Print a success message.
pub fn print_success(msg: &str) {
    println!("{GREEN}✓{RESET} {}", msg);
}

/// Print an indented remedy or suggestion.
pub fn print_hint(msg: &str) {
    println!("  {GRAY}→{RESET} {}", msg);
}

/// Print info about what will happen.
pub fn print_action(message: &str) {
    println!("{CYAN}→{RESET} {}", message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_helpers_smoke() {
        print_warning("linking skipped");
        print_info("3 issues found");
        print_success("release created");
        print_hint("run 'gh auth login'");
        print_action("creating parent issue");
    }
}
