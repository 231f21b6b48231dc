//! Utilities module - Console output helpers

use colored::*;
use std::fmt::Display;

/// Print a step message
pub fn print_step(message: &str) {
    println!("   {} {}", "→".bright_blue(), message);
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("   {} {}", "✓".bright_green(), message);
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("   {} {}", "✗".bright_red(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("   {} {}", "⚠".bright_yellow(), message);
}

/// Print a labelled value (paths go through `Path::display`)
pub fn print_info(label: &str, value: impl Display) {
    println!("   {} {}: {}", "ℹ".bright_cyan(), label, value.to_string().bright_green());
}
