//! Stored-conversation introspection: `--list-chats` and `--show-chat`.

use console::style;

use quill_core::role::APPLY_MARKDOWN;
use quill_core::session::SessionStore;
use quill_infra::storage::FileSessionStore;
use quill_types::chat::MessageRole;
use quill_types::config::GlobalConfig;

use crate::printer::{accent_style, MarkdownPrinter};

/// Print all stored conversation ids, oldest first.
pub async fn list_chats(store: &FileSessionStore) -> anyhow::Result<()> {
    for handle in store.list().await? {
        println!(
            "{}  {}",
            style(&handle.id).cyan(),
            style(handle.modified_at.format("%Y-%m-%d %H:%M")).dim()
        );
    }
    Ok(())
}

/// Accent color on even message indices, green on odd ones.
fn running_style(accent: &console::Style, index: usize) -> console::Style {
    if index % 2 == 0 {
        accent.clone()
    } else {
        console::Style::new().green()
    }
}

/// Print a stored conversation.
///
/// When the conversation's persona asked for markdown and `--md` is in
/// effect, assistant messages are rendered as markdown and the rest in
/// the accent color. Otherwise every message line alternates between the
/// accent color and green.
pub async fn show_chat(
    store: &FileSessionStore,
    chat_id: &str,
    config: &GlobalConfig,
    markdown: bool,
) -> anyhow::Result<()> {
    let messages = store.read(chat_id).await?;
    if messages.is_empty() {
        anyhow::bail!("no conversation stored under '{chat_id}'");
    }

    let accent = accent_style(&config.default_color);

    if markdown && messages[0].content.contains(APPLY_MARKDOWN) {
        let renderer = MarkdownPrinter::new(&config.default_color, &config.code_theme);
        for message in &messages {
            if message.role == MessageRole::Assistant {
                println!("{}:", accent.apply_to(&message.role));
                print!("{}", renderer.render(&message.content));
            } else {
                println!(
                    "{}",
                    accent.apply_to(format!("{}: {}", message.role, message.content))
                );
            }
            println!();
        }
        return Ok(());
    }

    for (index, message) in messages.iter().enumerate() {
        println!(
            "{}",
            running_style(&accent, index)
                .apply_to(format!("{}: {}", message.role, message.content))
        );
    }
    Ok(())
}
