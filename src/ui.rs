//! Console output helpers shared by commands
//!
//! Plain prefixed lines (`[OK]`, `[WARN]`, ...) styled with `console`;
//! styling is dropped automatically when stdout is not a terminal.

use console::style;
use std::io::{self, Write};

/// Display a section header
pub fn section(title: &str) {
    println!("{}", style(title).bold());
}

/// Display a success step
pub fn step_ok(message: &str) {
    println!("  {} {}", style("[OK]").green(), message);
}

/// Display a success step with detail
pub fn step_ok_detail(message: &str, detail: &str) {
    println!("  {} {} ({})", style("[OK]").green(), message, style(detail).dim());
}

/// Display a step that changed nothing
pub fn step_skip(message: &str) {
    println!("  {} {}", style("[-]").dim(), message);
}

/// Display a warning step with hint
pub fn step_warn_hint(message: &str, hint: &str) {
    println!("  {} {} - {}", style("[WARN]").yellow(), message, hint);
}

/// Print styled key-value pair
pub fn key_value(key: &str, value: &str) {
    println!("  {}: {}", style(key).dim(), value);
}

/// Ask a yes/no question on stdin, defaulting to no
pub fn confirm(prompt: &str) -> bool {
    print!("{} [y/N] ", prompt);
    let _ = io::stdout().flush();

    let mut input = String::new();
    if io::stdin().read_line(&mut input).is_err() {
        return false;
    }
    matches!(input.trim().to_lowercase().as_str(), "y" | "yes")
}
