use crate::error::ClipboardError;

pub trait Clipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// The desktop clipboard. Opened lazily so headless runs that never copy
/// do not need a display server.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
    hold: bool,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// For processes that exit right after copying. On Linux the selection
    /// is owned by the copying process, so `set_text` blocks until another
    /// application takes the clipboard over.
    pub fn holding() -> Self {
        Self {
            inner: None,
            hold: true,
        }
    }

    pub fn holds_selection(&self) -> bool {
        self.hold
    }

    fn handle(&mut self) -> Result<&mut arboard::Clipboard, ClipboardError> {
        if self.inner.is_none() {
            let clipboard =
                arboard::Clipboard::new().map_err(|e| ClipboardError(e.to_string()))?;
            self.inner = Some(clipboard);
        }
        self.inner
            .as_mut()
            .ok_or_else(|| ClipboardError("clipboard not initialised".to_string()))
    }
}

impl Clipboard for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        let hold = self.hold;
        let clipboard = self.handle()?;
        let result = if hold {
            set_and_hold(clipboard, text)
        } else {
            clipboard.set_text(text.to_string())
        };
        result.map_err(|e| ClipboardError(e.to_string()))
    }
}

#[cfg(target_os = "linux")]
fn set_and_hold(clipboard: &mut arboard::Clipboard, text: &str) -> Result<(), arboard::Error> {
    use arboard::SetExtLinux;
    clipboard.set().wait().text(text.to_string())
}

#[cfg(not(target_os = "linux"))]
fn set_and_hold(clipboard: &mut arboard::Clipboard, text: &str) -> Result<(), arboard::Error> {
    clipboard.set_text(text.to_string())
}
