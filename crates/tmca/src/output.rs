//! Terminal output utilities

use console::{measure_text_width, style, Style};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Print a success message
pub fn success(msg: &str) {
    println!("{} {}", style("✓").green().bold(), msg);
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{} {}", style("✗").red().bold(), msg);
}

/// Print a warning message
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("⚠").yellow().bold(), msg);
}

/// Print an info message
pub fn info(msg: &str) {
    println!("{} {}", style("ℹ").blue().bold(), msg);
}

/// Print a progress line
pub fn status(msg: &str) {
    println!("{} {}", style("###").cyan().bold(), msg);
}

/// Print a header
pub fn header(msg: &str) {
    println!("\n{}", style(msg).bold().underlined());
}

/// Print a key-value pair
pub fn kv(key: &str, value: &str) {
    println!("  {}: {}", style(key).dim(), value);
}

/// Create a spinner
pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Print `lines` inside a frame titled `title`
pub fn boxed(title: &str, color: Style, lines: &[String]) {
    let width = lines
        .iter()
        .map(|l| measure_text_width(l))
        .chain(std::iter::once(measure_text_width(title)))
        .max()
        .unwrap_or(0)
        + 2;

    let rule = "═".repeat(width);
    println!("{}", color.apply_to(format!("╔{}╗", rule)));
    println!("{}", color.apply_to(format!("║ {:<w$} ║", title, w = width - 2)));
    println!("{}", color.apply_to(format!("╟{}╢", "─".repeat(width))));
    for line in lines {
        let pad = width - 2 - measure_text_width(line);
        println!(
            "{} {}{} {}",
            color.apply_to("║"),
            line,
            " ".repeat(pad),
            color.apply_to("║")
        );
    }
    println!("{}", color.apply_to(format!("╚{}╝", rule)));
}
