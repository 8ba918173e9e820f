//! Formatting utilities used for CLI outputs.

use crate::utils::colors::{CYAN, GREEN, GREY, MAGENTA, RED, RESET, YELLOW};

/// ANSI color for a status string of any view
/// (day status, manager status or a session label).
pub fn status_color(code: &str) -> &'static str {
    match code {
        "completed" | "full_day" => GREEN,
        "half_day" | "incomplete" => YELLOW,
        "active" => CYAN,
        "absent" | "expired" => RED,
        "finalized" => MAGENTA,
        "locked" => GREY,
        _ => RESET,
    }
}

/// Colored badge for a status string.
pub fn badge(code: &str) -> String {
    format!("{}{code}{RESET}", status_color(code))
}
