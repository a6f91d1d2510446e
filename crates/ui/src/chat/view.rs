use std::sync::Arc;
use std::time::Instant;

use gpui::*;
use gpui_component::{ActiveTheme, v_flex};
use gpui_tokio_bridge::Tokio;
use mentor_chat::{
    AppState, ChatEvent, Effect, MentorConfig, ShareOutcome, ShareService, bootstrap, dispatch,
};

use crate::chat::events::Submit;
use crate::chat::{MessageInput, MessageList};
use crate::share::SystemClipboard;

/// Owns the conversation state and runs the effects its transitions ask for.
///
/// Child views never hold their own copy of the conversation; they are refreshed from
/// [`AppState`] after every event.
pub struct ChatView {
    state: AppState,
    message_list: Entity<MessageList>,
    message_input: Entity<MessageInput>,
    share_service: ShareService,
    bootstrap_task: Option<Task<()>>,
    send_task: Option<Task<()>>,
    share_task: Option<Task<()>>,
    toast_task: Option<Task<()>>,
}

impl ChatView {
    pub fn new(window: &mut Window, cx: &mut Context<Self>) -> Self {
        let message_list = cx.new(MessageList::new);
        let message_input = cx.new(|cx| MessageInput::new(window, cx));

        cx.subscribe(&message_input, |this, _, event: &Submit, cx| {
            this.apply(ChatEvent::Submit(event.content.clone()), cx);
        })
        .detach();

        let mut this = Self {
            state: AppState::new(),
            message_list,
            message_input,
            share_service: ShareService::new(None, Arc::new(SystemClipboard::new())),
            bootstrap_task: None,
            send_task: None,
            share_task: None,
            toast_task: None,
        };

        this.start_bootstrap(MentorConfig::load(), cx);
        this
    }

    /// Text of the notice currently on screen, if any.
    pub fn toast_text(&self) -> Option<&str> {
        self.state.toast().current().map(|toast| toast.text.as_str())
    }

    pub fn share_transcript(&mut self, cx: &mut Context<Self>) {
        let service = self.share_service.clone();
        let transcript = self.state.transcript().clone();
        let task = Tokio::spawn(cx, async move { service.share(&transcript).await });

        self.share_task = Some(cx.spawn(async move |this, cx| {
            let outcome = match task.await {
                Ok(outcome) => outcome,
                Err(error) => {
                    tracing::error!(error = %error, "share task aborted");
                    ShareOutcome::CopyFailed
                }
            };

            let _ = this.update(cx, |this, cx| {
                this.share_task = None;
                this.handle_share_outcome(outcome, cx);
            });
        }));
    }

    fn handle_share_outcome(&mut self, outcome: ShareOutcome, cx: &mut Context<Self>) {
        tracing::debug!(?outcome, "share finished");

        if let Some(notice) = outcome.notice() {
            self.apply(
                ChatEvent::ShowToast {
                    text: notice.to_string(),
                    at: Instant::now(),
                },
                cx,
            );
        }
    }

    fn start_bootstrap(&mut self, config: MentorConfig, cx: &mut Context<Self>) {
        tracing::info!(provider = %config.provider, "opening counselling session");
        let task = Tokio::spawn(cx, bootstrap(config));

        self.bootstrap_task = Some(cx.spawn(async move |this, cx| {
            let event = match task.await {
                Ok(event) => event,
                Err(error) => {
                    tracing::error!(error = %error, "session bootstrap task aborted");
                    ChatEvent::SessionFailed
                }
            };

            let _ = this.update(cx, |this, cx| {
                this.bootstrap_task = None;
                this.apply(event, cx);
            });
        }));
    }

    fn apply(&mut self, event: ChatEvent, cx: &mut Context<Self>) {
        tracing::debug!(?event, "chat event");

        if let Some(effect) = self.state.apply(event) {
            self.run_effect(effect, cx);
        }

        self.sync_children(cx);
        cx.notify();
    }

    fn run_effect(&mut self, effect: Effect, cx: &mut Context<Self>) {
        match effect {
            Effect::Send { session, text } => {
                let task = Tokio::spawn(cx, dispatch(session, text));

                self.send_task = Some(cx.spawn(async move |this, cx| {
                    let event = match task.await {
                        Ok(event) => event,
                        Err(error) => {
                            tracing::error!(error = %error, "send task aborted");
                            ChatEvent::ReplyFailed
                        }
                    };

                    let _ = this.update(cx, |this, cx| {
                        this.send_task = None;
                        this.apply(event, cx);
                    });
                }));
            }
            Effect::DismissToast { id, after } => {
                // Replacing the task drops the timer of any toast this one superseded.
                self.toast_task = Some(cx.spawn(async move |this, cx| {
                    cx.background_executor().timer(after).await;

                    let _ = this.update(cx, |this, cx| {
                        this.toast_task = None;
                        this.apply(ChatEvent::ToastExpired(id), cx);
                    });
                }));
            }
        }
    }

    fn sync_children(&mut self, cx: &mut Context<Self>) {
        let messages = self.state.transcript().messages().to_vec();
        let show_typing = self.state.shows_typing_indicator();
        let loading = self.state.is_loading();

        self.message_list.update(cx, |list, cx| {
            list.set_transcript(messages, show_typing, cx);
        });
        self.message_input.update(cx, |input, cx| {
            input.set_loading(loading, cx);
        });
    }
}

impl Render for ChatView {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.theme();

        v_flex()
            .id("chat-view")
            .relative()
            .size_full()
            .min_h_0()
            .overflow_hidden()
            .bg(theme.background)
            .child(
                div()
                    .id("chat-view-message-list")
                    .flex_1()
                    .min_h_0()
                    .child(self.message_list.clone()),
            )
            .child(
                div()
                    .id("chat-view-message-input")
                    .flex_shrink_0()
                    .w_full()
                    .child(self.message_input.clone()),
            )
    }
}
