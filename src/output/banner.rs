//! Header and section banners.
//!
//! Banners adapt to the terminal width, clamped to a readable range.

use terminal_size::{terminal_size, Width};

use super::colors::*;

const DEFAULT_TERMINAL_WIDTH: u16 = 80;
const MIN_BANNER_WIDTH: usize = 20;
const MAX_BANNER_WIDTH: usize = 72;

/// Color options for section banners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BannerColor {
    /// Cyan - used for menus and starting an operation
    Cyan,
    /// Green - used for successful completion
    Green,
    /// Red - used for failure
    Red,
    /// Yellow - used for dry runs and warnings
    Yellow,
}

impl BannerColor {
    /// Get the ANSI color code for this banner color.
    pub fn ansi_code(&self) -> &'static str {
        match self {
            BannerColor::Cyan => CYAN,
            BannerColor::Green => GREEN,
            BannerColor::Red => RED,
            BannerColor::Yellow => YELLOW,
        }
    }
}

fn banner_width() -> usize {
    terminal_size()
        .map(|(Width(w), _)| w as usize)
        .unwrap_or(DEFAULT_TERMINAL_WIDTH as usize)
        .clamp(MIN_BANNER_WIDTH, MAX_BANNER_WIDTH)
}

/// Format a banner line: `━━━ TITLE ━━━` padded to `width`.
pub fn format_banner(title: &str, width: usize) -> String {
    let title_with_spaces = format!(" {} ", title);
    let remaining = width.saturating_sub(title_with_spaces.chars().count());
    let left = remaining / 2;
    let right = remaining - left;
    format!("{}{}{}", "━".repeat(left), title_with_spaces, "━".repeat(right))
}

/// Print a color-coded section banner.
pub fn print_section_banner(title: &str, color: BannerColor) {
    println!(
        "{}{BOLD}{}{RESET}",
        color.ansi_code(),
        format_banner(title, banner_width())
    );
}

/// Print the tool header with its version.
pub fn print_header(tool: &str) {
    let width = banner_width();
    let inner = width.saturating_sub(2);
    let label = format!("  {} v{}", tool, env!("CARGO_PKG_VERSION"));
    let padding = inner.saturating_sub(label.chars().count());

    println!("{CYAN}{BOLD}");
    println!("+{}+", "-".repeat(inner));
    println!("|{}{}|", label, " ".repeat(padding));
    println!("+{}+", "-".repeat(inner));
    println!("{RESET}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_banner_pads_to_width() {
        let banner = format_banner("RELEASE", 30);
        assert_eq!(banner.chars().count(), 30);
        assert!(banner.contains(" RELEASE "));
    }

    #[test]
    fn test_format_banner_longer_than_width() {
        let banner = format_banner("A VERY LONG SECTION TITLE", 10);
        assert_eq!(banner, " A VERY LONG SECTION TITLE ");
    }

    #[test]
    fn test_banner_color_codes() {
        assert_eq!(BannerColor::Cyan.ansi_code(), CYAN);
        assert_eq!(BannerColor::Red.ansi_code(), RED);
    }
}
