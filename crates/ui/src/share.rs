use std::sync::Mutex;

use mentor_chat::{Clipboard, ShareError};

/// System clipboard backed by arboard.
///
/// The handle is opened on first use and then kept for the rest of the session, since
/// some Linux clipboards drop their contents once the owning handle goes away.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Mutex<Option<arboard::Clipboard>>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clipboard for SystemClipboard {
    fn write_text(&self, text: &str) -> Result<(), ShareError> {
        let mut guard = self.inner.lock().map_err(|_| ShareError::Clipboard {
            stage: "lock-clipboard",
            message: "clipboard handle poisoned".to_string(),
        })?;

        if guard.is_none() {
            let clipboard = arboard::Clipboard::new().map_err(|error| ShareError::Clipboard {
                stage: "open-clipboard",
                message: error.to_string(),
            })?;
            *guard = Some(clipboard);
        }

        let Some(clipboard) = guard.as_mut() else {
            return Err(ShareError::Clipboard {
                stage: "open-clipboard",
                message: "clipboard handle missing".to_string(),
            });
        };

        clipboard
            .set_text(text.to_owned())
            .map_err(|error| ShareError::Clipboard {
                stage: "write-clipboard",
                message: error.to_string(),
            })
    }
}
