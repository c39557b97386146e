//! Terminal output formatting.
//!
//! This module provides consistent, colored terminal output for every
//! command and wizard screen. Functions are organized by domain:
//!
//! - [`banner`] - Header banner and section banners
//! - [`messages`] - Warning, success, info and hint lines
//! - [`table`] - Aligned tables and key/value listings
//! - [`progress`] - Text progress bars and spinners around `gh` calls
//! - [`error`] - Error panels with remedies

pub mod banner;
pub mod error;
pub mod messages;
pub mod progress;
pub mod table;

/// ANSI color codes for terminal output.
pub mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const RED: &str = "\x1b[31m";
    pub const GRAY: &str = "\x1b[90m";
}

pub use colors::*;

pub use banner::{print_header, print_section_banner, BannerColor};
pub use error::print_error_panel;
pub use messages::{print_action, print_hint, print_info, print_success, print_warning};
pub use progress::{make_progress_bar, Spinner};
pub use table::{format_table, print_key_values, print_table};
