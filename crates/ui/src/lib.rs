#![deny(unsafe_code)]

/// Career-counselling chat window.
///
/// This crate provides the desktop front end built with GPUI and gpui-component. All
/// conversation state lives in `mentor_chat::AppState`; the views here only render it and
/// forward user intent as events.
pub mod app;
/// Chat transcript, input and the view that coordinates them.
pub mod chat;
/// Platform clipboard used by the share action.
pub mod share;
