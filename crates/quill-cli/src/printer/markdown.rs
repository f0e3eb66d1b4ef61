//! Markdown printer with syntax-highlighted code blocks.
//!
//! Combines `termimad` for prose and `syntect` for fenced code. Live mode
//! re-renders the entire accumulated text in place after each fragment,
//! so partially-streamed markdown is always shown fully formatted.
//!
//! Code lines carry the theme's background color: one background escape
//! opening per line, trailing whitespace trimmed, no vertical padding
//! after the last line. An unknown language tag falls back to plain-text
//! syntax and an unknown theme name to un-highlighted lines; neither is
//! an error.

use std::io::Write;

use crossterm::{cursor, execute, terminal};
use futures_util::StreamExt;
use indicatif::ProgressBar;
use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::parsing::SyntaxSet;
use syntect::util::as_24_bit_terminal_escaped;
use termimad::MadSkin;

use quill_core::llm::FragmentStream;
use quill_core::printer::Printer;
use quill_types::error::CompletionError;

use super::{accent_color, loading_spinner};

pub struct MarkdownPrinter {
    skin: MadSkin,
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
    spinner: Option<ProgressBar>,
}

impl MarkdownPrinter {
    pub fn new(color: &str, code_theme: &str) -> Self {
        let mut skin = MadSkin::default_dark();
        let accent = accent_color(color);
        skin.bold.set_fg(accent);
        skin.headers[0].set_fg(accent);
        skin.headers[1].set_fg(accent);
        skin.inline_code
            .set_fg(termimad::crossterm::style::Color::Yellow);

        Self {
            skin,
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme_name: code_theme.to_string(),
            spinner: None,
        }
    }

    /// Render markdown to a terminal-escaped string. Fenced code goes
    /// through syntect; everything else through termimad.
    pub fn render(&self, markdown: &str) -> String {
        let mut output = String::new();
        let mut in_code_block = false;
        let mut code_lang = String::new();
        let mut code_buf = String::new();

        for line in markdown.lines() {
            if line.starts_with("```") && !in_code_block {
                in_code_block = true;
                code_lang = line.trim_start_matches('`').trim().to_string();
                code_buf.clear();
            } else if line.starts_with("```") && in_code_block {
                in_code_block = false;
                output.push_str(&self.highlight_code(&code_buf, &code_lang));
            } else if in_code_block {
                code_buf.push_str(line);
                code_buf.push('\n');
            } else {
                let rendered = self.skin.term_text(line);
                output.push_str(&format!("{rendered}"));
            }
        }

        // Unclosed fence at end of (possibly still streaming) input.
        if in_code_block && !code_buf.is_empty() {
            output.push_str(&self.highlight_code(&code_buf, &code_lang));
        }

        output
    }

    /// Highlight a code block, one escaped line per source line.
    fn highlight_code(&self, code: &str, lang: &str) -> String {
        let syntax = if lang.is_empty() {
            self.syntax_set.find_syntax_plain_text()
        } else {
            self.syntax_set
                .find_syntax_by_token(lang)
                .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text())
        };

        let Some(theme) = self.theme_set.themes.get(&self.theme_name) else {
            // Unknown theme name: keep the code readable, drop the styling.
            let mut output = String::new();
            for line in code.lines() {
                output.push_str(line.trim_end());
                output.push('\n');
            }
            return output;
        };

        let background = theme.settings.background;
        let mut highlighter = HighlightLines::new(syntax, theme);

        let mut output = String::new();
        for line in code.lines() {
            let Ok(ranges) = highlighter.highlight_line(line, &self.syntax_set) else {
                continue;
            };
            let escaped = as_24_bit_terminal_escaped(&ranges[..], false);
            match background {
                Some(bg) => output.push_str(&format!(
                    "\x1b[48;2;{};{};{}m{}\x1b[0m\n",
                    bg.r,
                    bg.g,
                    bg.b,
                    escaped.trim_end()
                )),
                None => output.push_str(&format!("{}\x1b[0m\n", escaped.trim_end())),
            }
        }

        output
    }

    /// Rows the rendered text occupies, accounting for soft wrapping.
    fn rendered_rows(text: &str) -> u16 {
        let width = terminal::size().map(|(w, _)| w).unwrap_or(80).max(1) as usize;
        text.lines()
            .map(|line| {
                let cells = console::measure_text_width(line).max(1);
                cells.div_ceil(width) as u16
            })
            .sum()
    }
}

impl Printer for MarkdownPrinter {
    async fn live_print(&mut self, mut stream: FragmentStream) -> Result<String, CompletionError> {
        let mut stdout = std::io::stdout();
        let mut full = String::new();
        let mut rows: u16 = 0;

        while let Some(fragment) = stream.next().await {
            full.push_str(&fragment?);
            let rendered = self.render(&full);

            if rows > 0 {
                let _ = execute!(
                    stdout,
                    cursor::MoveUp(rows),
                    cursor::MoveToColumn(0),
                    terminal::Clear(terminal::ClearType::FromCursorDown),
                );
            }
            let _ = write!(stdout, "{rendered}");
            let _ = stdout.flush();
            rows = Self::rendered_rows(&rendered);
        }

        Ok(full)
    }

    fn static_print(&mut self, text: &str) {
        print!("{}", self.render(text));
        let _ = std::io::stdout().flush();
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

#[cfg(test)]
mod tests {
    use super::*;

    const BG_ESCAPE: &str = "\x1b[48;2;";

    fn printer() -> MarkdownPrinter {
        MarkdownPrinter::new("cyan", "base16-ocean.dark")
    }

    #[test]
    fn test_code_block_one_background_escape_per_line_no_trailing_ws() {
        let rendered = printer().render("```python\nprint('hi')   \n```");

        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].matches(BG_ESCAPE).count(), 1);
        assert!(!lines[0].ends_with(' '));
        assert!(!lines[0].ends_with('\t'));
        assert!(lines[0].contains("print"));
        // No vertical padding after the last code line.
        assert!(!rendered.ends_with("\n\n"));
    }

    #[test]
    fn test_multi_line_code_block() {
        let rendered = printer().render("```python\na = 1\nb = 2\n```");
        let code_lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(code_lines.len(), 2);
        for line in &code_lines {
            assert_eq!(line.matches(BG_ESCAPE).count(), 1);
            assert!(!line.ends_with(' '));
        }
    }

    #[test]
    fn test_unknown_language_falls_back_to_plain_text() {
        let rendered = printer().render("```nosuchlang\nhello world\n```");
        assert!(rendered.contains("hello world"));
        assert_eq!(rendered.lines().count(), 1);
    }

    #[test]
    fn test_unknown_theme_renders_unhighlighted() {
        let printer = MarkdownPrinter::new("cyan", "no-such-theme");
        let rendered = printer.render("```python\nprint('hi')\n```");
        assert!(!rendered.contains(BG_ESCAPE));
        assert_eq!(rendered, "print('hi')\n");
    }

    #[test]
    fn test_unclosed_fence_still_renders() {
        let rendered = printer().render("```python\nprint('hi')");
        assert_eq!(rendered.matches(BG_ESCAPE).count(), 1);
        assert!(rendered.contains("print"));
    }

    #[test]
    fn test_prose_passes_through_termimad() {
        let rendered = printer().render("plain words");
        assert!(console::strip_ansi_codes(&rendered).contains("plain words"));
    }
}
