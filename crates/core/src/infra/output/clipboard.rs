use super::OutputTarget;
use crate::domain::error::AppError;

/// クリップボード出力（結果のコピー）
#[derive(Debug, Default)]
pub struct ClipboardOutput;

impl ClipboardOutput {
    pub fn new() -> Self {
        Self
    }
}

impl OutputTarget for ClipboardOutput {
    fn deliver(&self, text: &str) -> Result<(), AppError> {
        let mut ctx = arboard::Clipboard::new()
            .map_err(|e| AppError::internal(format!("Clipboard unavailable: {e}")))?;
        ctx.set_text(text)
            .map_err(|e| AppError::internal(format!("Clipboard write failed: {e}")))?;
        log::info!("Copied {} characters to the clipboard", text.chars().count());
        Ok(())
    }

    fn name(&self) -> &str {
        "clipboard"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clipboard_name() {
        assert_eq!(ClipboardOutput::new().name(), "clipboard");
    }
}
