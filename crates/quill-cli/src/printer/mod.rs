//! Terminal printer implementations.
//!
//! Two variants of the core `Printer` trait: plain colored text and
//! markdown with syntax-highlighted code blocks. Both share the spinner
//! shown while a static (non-streaming) print drains the response.

pub mod markdown;
pub mod text;

pub use markdown::MarkdownPrinter;
pub use text::TextPrinter;

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Spinner shown while waiting for a non-streamed response.
pub(crate) fn loading_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    spinner.set_message("thinking...");
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

/// Map a configured color name to a console style. Unknown names fall
/// back to cyan.
pub(crate) fn accent_style(name: &str) -> console::Style {
    let style = console::Style::new();
    match name.to_lowercase().as_str() {
        "cyan" => style.cyan(),
        "green" => style.green(),
        "yellow" => style.yellow(),
        "blue" => style.blue(),
        "magenta" => style.magenta(),
        "red" => style.red(),
        "white" => style.white(),
        _ => style.cyan(),
    }
}

/// Same mapping for termimad's skin colors.
pub(crate) fn accent_color(name: &str) -> termimad::crossterm::style::Color {
    use termimad::crossterm::style::Color;
    match name.to_lowercase().as_str() {
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "red" => Color::Red,
        "white" => Color::White,
        _ => Color::Cyan,
    }
}
