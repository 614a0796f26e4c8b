use anyhow::{Context, Result};
use arboard::Clipboard;

/// Place text on the OS clipboard. This is the program's only output surface.
pub fn set_text(text: &str) -> Result<()> {
    let mut clipboard = Clipboard::new().context("Failed to access clipboard")?;
    clipboard
        .set_text(text)
        .context("Failed to copy text to clipboard")?;
    Ok(())
}

/// Read the current clipboard text, used when a prompt references it.
///
/// An empty or non-text clipboard is not an error here - the splice just
/// substitutes an empty string.
pub fn get_text() -> Result<String> {
    let mut clipboard = Clipboard::new().context("Failed to access clipboard")?;
    match clipboard.get_text() {
        Ok(text) => Ok(text),
        Err(arboard::Error::ContentNotAvailable) => Ok(String::new()),
        Err(e) => Err(e).context("Failed to read clipboard text"),
    }
}
