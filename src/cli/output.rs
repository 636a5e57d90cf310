//! Astral-style CLI output formatting.
//!
//! Reports go to stdout with colored symbols; errors go to stderr. Colors
//! follow `--color` and fall back to terminal detection.

use std::fmt::Display;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::{OwoColorize, Stream};

use super::command::ColorChoice;

/// Apply the `--color` choice to every later write.
pub fn configure(color: ColorChoice) {
    match color {
        ColorChoice::Auto => owo_colors::unset_override(),
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
    }
}

/// Print the application header with name and version.
pub fn header(title: &str) {
    println!(
        "{} {} {}",
        "zeabur-ops".if_supports_color(Stream::Stdout, |t| t.bold()),
        env!("CARGO_PKG_VERSION").if_supports_color(Stream::Stdout, |t| t.dimmed()),
        title
    );
}

/// Print a section header.
pub fn section(title: &str) {
    println!();
    println!("{}", title.if_supports_color(Stream::Stdout, |t| t.bold()));
}

/// Print a labeled value.
pub fn field(label: &str, value: impl Display) {
    println!(
        "  {:<14} {}",
        label.if_supports_color(Stream::Stdout, |t| t.dimmed()),
        value
    );
}

/// Print a success line.
pub fn success(message: &str) {
    println!(
        "  {} {}",
        "✓".if_supports_color(Stream::Stdout, |t| t.green()),
        message
    );
}

/// Print a warning line.
pub fn warning(message: &str) {
    println!(
        "  {} {}",
        "⚠".if_supports_color(Stream::Stdout, |t| t.yellow()),
        message
    );
}

/// Print a failure line that belongs to the report.
pub fn failure(message: &str) {
    println!(
        "  {} {}",
        "×".if_supports_color(Stream::Stdout, |t| t.red()),
        message
    );
}

/// Print an error line.
pub fn error(message: &str) {
    eprintln!(
        "  {} {}",
        "×".if_supports_color(Stream::Stderr, |t| t.red()),
        message
    );
}

/// Print a note/hint.
pub fn note(message: &str) {
    println!(
        "  {}",
        message.if_supports_color(Stream::Stdout, |t| t.dimmed())
    );
}

/// Print an indented bullet.
pub fn item(message: impl Display) {
    println!("    - {message}");
}

/// Print preformatted multi-line text, such as a rendered table.
pub fn lines(text: &str) {
    for line in text.lines() {
        println!("  {line}");
    }
}

/// Format a highlighted value in cyan.
pub fn highlight(value: impl Display) -> String {
    value
        .if_supports_color(Stream::Stdout, |t| t.cyan())
        .to_string()
}

/// Format a dimmed/muted value.
pub fn muted(value: impl Display) -> String {
    value
        .if_supports_color(Stream::Stdout, |t| t.dimmed())
        .to_string()
}

/// Braille spinner animation frames (Astral-style).
const BRAILLE_SPINNER: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Start a progress spinner on stderr. Hidden when stderr is not a terminal.
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_strings(BRAILLE_SPINNER)
        .template("  {spinner:.cyan} {msg}")
    {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}

/// Clear a spinner once its step is done; the report prints the result.
pub fn spinner_done(pb: &ProgressBar) {
    pb.finish_and_clear();
}
