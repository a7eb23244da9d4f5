//! Formatting and printing of user-facing messages.
//!
//! Results go to stdout unstyled so they can be piped. Everything else goes
//! to stderr, styled with `console` when the terminal supports it.

use crate::boundary::BoundaryWarning;
use console::style;

/// Format an error message with a red `ERROR:` marker.
pub fn format_error(message: &str) -> String {
    format!("{} {}", style("ERROR:").red().bold(), message)
}

/// Format a boundary warning with a yellow marker.
pub fn format_boundary_warning(warning: &BoundaryWarning) -> String {
    format!("{} {}", style("⚠ WARNING:").yellow(), warning)
}

/// Format the `--diff` line naming the last version.
pub fn format_last_version(last_version: Option<&str>) -> String {
    format!("Last version: {}", last_version.unwrap_or("none"))
}

/// Print an error message in red on stderr.
pub fn display_error(message: &str) {
    eprintln!("{}", format_error(message));
}

/// Print a boundary warning on stderr.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{}", format_boundary_warning(warning));
}

/// Print a success message with a green checkmark on stderr.
pub fn display_success(message: &str) {
    eprintln!("{} {}", style("✓").green(), message);
}

/// Print the last version on stdout.
pub fn display_last_version(last_version: Option<&str>) {
    println!("{}", format_last_version(last_version));
}

/// Print a result (version or changelog) on stdout, newline-terminated.
pub fn display_result(text: &str) {
    if text.ends_with('\n') {
        print!("{}", text);
    } else {
        println!("{}", text);
    }
}
