use std::sync::Arc;

use mentor_llm::BoxFuture;
use snafu::Snafu;

use crate::copy;
use crate::message::Transcript;

/// What gets handed to the platform share sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharePayload {
    pub title: String,
    pub text: String,
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ShareError {
    #[snafu(display("native share failed on `{stage}`: {message}"))]
    NativeShare {
        stage: &'static str,
        message: String,
    },
    #[snafu(display("clipboard unavailable on `{stage}`: {message}"))]
    Clipboard {
        stage: &'static str,
        message: String,
    },
}

/// Platform share capability, when the platform has one.
pub trait NativeShare: Send + Sync {
    fn share<'a>(&'a self, payload: &'a SharePayload) -> BoxFuture<'a, Result<(), ShareError>>;
}

pub trait Clipboard: Send + Sync {
    fn write_text(&self, text: &str) -> Result<(), ShareError>;
}

/// Result of one share request, reported back to the state owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareOutcome {
    NothingToShare,
    Shared,
    ShareFailed,
    Copied,
    CopyFailed,
}

impl ShareOutcome {
    /// Notice to toast for this outcome. Native share results stay silent.
    pub fn notice(self) -> Option<&'static str> {
        match self {
            Self::NothingToShare => Some(copy::NOTHING_TO_SHARE),
            Self::Copied => Some(copy::COPIED),
            Self::CopyFailed => Some(copy::COPY_FAILED),
            Self::Shared | Self::ShareFailed => None,
        }
    }
}

/// Flattens everything after the opening entry as `<label>: <content>` blocks.
///
/// Returns `None` when there is nothing beyond the opening entry.
pub fn format_transcript(transcript: &Transcript) -> Option<String> {
    let exchanges = transcript.exchanges();
    if exchanges.is_empty() {
        return None;
    }

    Some(
        exchanges
            .iter()
            .map(|message| format!("{}: {}", message.role().share_label(), message.content()))
            .collect::<Vec<_>>()
            .join("\n\n"),
    )
}

/// Routes a transcript to native share when available, else to the clipboard.
#[derive(Clone)]
pub struct ShareService {
    native: Option<Arc<dyn NativeShare>>,
    clipboard: Arc<dyn Clipboard>,
}

impl ShareService {
    pub fn new(native: Option<Arc<dyn NativeShare>>, clipboard: Arc<dyn Clipboard>) -> Self {
        Self { native, clipboard }
    }

    pub async fn share(&self, transcript: &Transcript) -> ShareOutcome {
        let Some(text) = format_transcript(transcript) else {
            return ShareOutcome::NothingToShare;
        };

        if let Some(native) = &self.native {
            let payload = SharePayload {
                title: copy::SHARE_TITLE.to_string(),
                text,
            };
            return match native.share(&payload).await {
                Ok(()) => ShareOutcome::Shared,
                Err(error) => {
                    tracing::error!(error = %error, "share failed");
                    ShareOutcome::ShareFailed
                }
            };
        }

        match self.clipboard.write_text(&text) {
            Ok(()) => {
                tracing::debug!(chars = text.chars().count(), "copied transcript to clipboard");
                ShareOutcome::Copied
            }
            Err(error) => {
                tracing::error!(error = %error, "failed to copy");
                ShareOutcome::CopyFailed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::message::Message;
    use crate::state::{AppState, ChatEvent, Effect};

    #[derive(Default)]
    struct RecordingClipboard {
        written: Mutex<Vec<String>>,
        fail: bool,
    }

    impl Clipboard for RecordingClipboard {
        fn write_text(&self, text: &str) -> Result<(), ShareError> {
            if self.fail {
                return ClipboardSnafu {
                    stage: "test-clipboard",
                    message: "no display",
                }
                .fail();
            }
            self.written
                .lock()
                .expect("clipboard lock")
                .push(text.to_string());
            Ok(())
        }
    }

    #[derive(Default)]
    struct CountingShare {
        calls: AtomicUsize,
        fail: bool,
    }

    impl NativeShare for CountingShare {
        fn share<'a>(
            &'a self,
            payload: &'a SharePayload,
        ) -> BoxFuture<'a, Result<(), ShareError>> {
            Box::pin(async move {
                self.calls.fetch_add(1, Ordering::SeqCst);
                assert_eq!(payload.title, copy::SHARE_TITLE);
                if self.fail {
                    return NativeShareSnafu {
                        stage: "test-share",
                        message: "AbortError",
                    }
                    .fail();
                }
                Ok(())
            })
        }
    }

    fn one_exchange() -> Transcript {
        let mut transcript = Transcript::seeded(Message::model("greeting"));
        transcript.push(Message::user("A"));
        transcript.push(Message::model("B"));
        transcript
    }

    #[test]
    fn formats_everything_after_the_opening_entry() {
        assert_eq!(
            format_transcript(&one_exchange()).as_deref(),
            Some("나: A\n\nAI 선생님: B")
        );
    }

    #[test]
    fn greeting_alone_has_nothing_to_share() {
        let transcript = Transcript::seeded(Message::model("greeting"));
        assert_eq!(format_transcript(&transcript), None);
    }

    #[tokio::test]
    async fn nothing_to_share_touches_neither_native_nor_clipboard() {
        let native = Arc::new(CountingShare::default());
        let clipboard = Arc::new(RecordingClipboard::default());
        let service = ShareService::new(Some(native.clone()), clipboard.clone());

        let outcome = service
            .share(&Transcript::seeded(Message::model("greeting")))
            .await;

        assert_eq!(outcome, ShareOutcome::NothingToShare);
        assert_eq!(outcome.notice(), Some(copy::NOTHING_TO_SHARE));
        assert_eq!(native.calls.load(Ordering::SeqCst), 0);
        assert!(clipboard.written.lock().expect("clipboard lock").is_empty());
    }

    #[tokio::test]
    async fn native_share_is_preferred_and_failure_is_silent() {
        let native = Arc::new(CountingShare {
            fail: true,
            ..CountingShare::default()
        });
        let clipboard = Arc::new(RecordingClipboard::default());
        let service = ShareService::new(Some(native.clone()), clipboard.clone());

        let outcome = service.share(&one_exchange()).await;

        assert_eq!(outcome, ShareOutcome::ShareFailed);
        assert_eq!(outcome.notice(), None);
        assert_eq!(native.calls.load(Ordering::SeqCst), 1);
        assert!(clipboard.written.lock().expect("clipboard lock").is_empty());
    }

    #[tokio::test]
    async fn clipboard_fallback_copies_and_reports() {
        let clipboard = Arc::new(RecordingClipboard::default());
        let service = ShareService::new(None, clipboard.clone());

        let outcome = service.share(&one_exchange()).await;

        assert_eq!(outcome, ShareOutcome::Copied);
        assert_eq!(outcome.notice(), Some(copy::COPIED));
        assert_eq!(
            clipboard.written.lock().expect("clipboard lock").as_slice(),
            ["나: A\n\nAI 선생님: B".to_string()]
        );
    }

    #[tokio::test]
    async fn clipboard_failure_shows_failure_notice() {
        let clipboard = Arc::new(RecordingClipboard {
            fail: true,
            ..RecordingClipboard::default()
        });
        let service = ShareService::new(None, clipboard);

        let outcome = service.share(&one_exchange()).await;

        assert_eq!(outcome, ShareOutcome::CopyFailed);
        assert_eq!(outcome.notice(), Some(copy::COPY_FAILED));
    }

    #[tokio::test]
    async fn share_notice_flows_through_reducer_as_toast() {
        let service = ShareService::new(None, Arc::new(RecordingClipboard::default()));
        let mut state = AppState::new();
        state.apply(ChatEvent::SessionFailed);

        let outcome = service.share(state.transcript()).await;
        let text = outcome.notice().expect("nothing-to-share notice");
        let effect = state.apply(ChatEvent::ShowToast {
            text: text.to_string(),
            at: std::time::Instant::now(),
        });

        assert!(matches!(effect, Some(Effect::DismissToast { .. })));
        assert_eq!(
            state.toast().current().map(|toast| toast.text.as_str()),
            Some(copy::NOTHING_TO_SHARE)
        );
    }
}
