//! Plain-text printer with a configurable accent color.

use std::io::Write;

use futures_util::StreamExt;
use indicatif::ProgressBar;

use quill_core::llm::FragmentStream;
use quill_core::printer::Printer;
use quill_types::error::CompletionError;

use super::{accent_style, loading_spinner};

/// Prints fragments as they arrive, colored, with no reflowing.
pub struct TextPrinter {
    style: console::Style,
    spinner: Option<ProgressBar>,
}

impl TextPrinter {
    pub fn new(color: &str) -> Self {
        Self {
            style: accent_style(color),
            spinner: None,
        }
    }
}

impl Printer for TextPrinter {
    async fn live_print(&mut self, mut stream: FragmentStream) -> Result<String, CompletionError> {
        let mut full = String::new();
        while let Some(fragment) = stream.next().await {
            let fragment = fragment?;
            print!("{}", self.style.apply_to(&fragment));
            let _ = std::io::stdout().flush();
            full.push_str(&fragment);
        }
        println!();
        Ok(full)
    }

    fn static_print(&mut self, text: &str) {
        println!("{}", self.style.apply_to(text));
    }

    fn loading_started(&mut self) {
        self.spinner = Some(loading_spinner());
    }

    fn loading_finished(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }
}
