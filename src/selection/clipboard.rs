//! Host selection source backed by the `arboard` crate.
//!
//! On Linux the *primary* selection (the text currently highlighted, no copy
//! needed) is read.  Other platforms have no primary selection, so the
//! regular clipboard is used instead.
//!
//! A short-lived [`arboard::Clipboard`] handle is created per read because
//! the handle is not `Send` on all platforms.

use arboard::Clipboard;

use super::SelectionSource;

/// Reads the host's primary selection.
#[derive(Debug, Default, Clone, Copy)]
pub struct PrimarySelection;

impl PrimarySelection {
    pub fn new() -> Self {
        Self
    }
}

impl SelectionSource for PrimarySelection {
    fn read_selection(&self) -> Option<String> {
        let mut clipboard = match Clipboard::new() {
            Ok(c) => c,
            Err(e) => {
                log::debug!("selection: cannot open clipboard: {e}");
                return None;
            }
        };
        // `text` errors when the selection is empty or non-text; both mean
        // "nothing selected" here.
        read_primary(&mut clipboard).ok()
    }
}

#[cfg(target_os = "linux")]
fn read_primary(clipboard: &mut Clipboard) -> Result<String, arboard::Error> {
    use arboard::{GetExtLinux, LinuxClipboardKind};
    clipboard
        .get()
        .clipboard(LinuxClipboardKind::Primary)
        .text()
}

#[cfg(not(target_os = "linux"))]
fn read_primary(clipboard: &mut Clipboard) -> Result<String, arboard::Error> {
    clipboard.get_text()
}
