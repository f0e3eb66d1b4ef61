//! Printer trait: incremental rendering of a fragment stream.
//!
//! `print` is the single entry point. Live mode hands the stream to the
//! variant's `live_print`; static mode drains the stream behind a
//! loading indicator and renders once. Terminal implementations live in
//! `quill-cli`; the trait itself knows nothing about glyph rendering.

use futures_util::StreamExt;

use quill_types::error::CompletionError;

use crate::llm::FragmentStream;

pub trait Printer: Send {
    /// Consume fragments one at a time, rendering the accumulated text
    /// after each, and return the full concatenated text.
    fn live_print(
        &mut self,
        stream: FragmentStream,
    ) -> impl std::future::Future<Output = Result<String, CompletionError>> + Send;

    /// Render a complete text once.
    fn static_print(&mut self, text: &str);

    /// Hook shown while a static print drains the stream.
    fn loading_started(&mut self) {}

    /// Hook cleared before the static render.
    fn loading_finished(&mut self) {}

    /// Render a fragment stream, live or static, returning the full
    /// response text.
    fn print(
        &mut self,
        stream: FragmentStream,
        live: bool,
    ) -> impl std::future::Future<Output = Result<String, CompletionError>> + Send {
        async move {
            if live {
                return self.live_print(stream).await;
            }

            self.loading_started();
            let mut stream = stream;
            let mut full = String::new();
            while let Some(fragment) = stream.next().await {
                match fragment {
                    Ok(fragment) => full.push_str(&fragment),
                    Err(err) => {
                        self.loading_finished();
                        return Err(err);
                    }
                }
            }
            self.loading_finished();
            self.static_print(&full);
            Ok(full)
        }
    }
}
