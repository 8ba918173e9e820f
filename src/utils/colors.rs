/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";

pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";
pub const MAGENTA: &str = "\x1b[35m";

/// Wraps empty-looking values ("", "--:--", "0") in GREY.
pub fn colorize_optional(value: &str) -> String {
    let v = value.trim();
    if v.is_empty() || v == "--:--" || v == "0" {
        format!("{GREY}{value}{RESET}")
    } else {
        value.to_string()
    }
}

/// Punch-in green, punch-out red, missing grey.
pub fn colorize_in_out(value: &str, is_in: bool) -> String {
    if value.trim().is_empty() || value.trim() == "--:--" {
        return format!("{GREY}{value}{RESET}");
    }

    if is_in {
        format!("{GREEN}{value}{RESET}")
    } else {
        format!("{RED}{value}{RESET}")
    }
}
