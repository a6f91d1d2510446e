#![deny(unsafe_code)]

/// Counselling session domain, independent of any UI toolkit.
///
/// Everything the window shows is derived from [`state::AppState`], which only changes
/// through [`state::AppState::apply`]. Asynchronous work (opening the session, sending a
/// message, sharing) is described by [`state::Effect`]s and reports back as events.
pub mod config;
/// Fixed user-facing texts and the counsellor persona.
pub mod copy;
pub mod dispatch;
pub mod message;
pub mod share;
pub mod state;
pub mod toast;

pub use config::{ConfigError, MentorConfig};
pub use dispatch::{bootstrap, dispatch, start_session};
pub use message::{Message, Role, Transcript};
pub use share::{
    Clipboard, NativeShare, ShareError, ShareOutcome, SharePayload, ShareService,
    format_transcript,
};
pub use state::{AppState, ChatEvent, Effect, SessionState};
pub use toast::{TOAST_DURATION, Toast, ToastId, ToastState};
