use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use mentor_llm::ChatSession;

use crate::copy;
use crate::message::{Message, Transcript};
use crate::toast::{TOAST_DURATION, ToastId, ToastState};

/// Lifecycle of the one chat session opened per launch.
///
/// `Ready` and `Failed` are terminal: nothing moves the state back to `Uninitialized`.
#[derive(Clone, Default)]
pub enum SessionState {
    #[default]
    Uninitialized,
    Ready(Arc<dyn ChatSession>),
    Failed,
}

impl SessionState {
    pub fn session(&self) -> Option<&Arc<dyn ChatSession>> {
        match self {
            Self::Ready(session) => Some(session),
            Self::Uninitialized | Self::Failed => None,
        }
    }

    pub fn is_settled(&self) -> bool {
        !matches!(self, Self::Uninitialized)
    }
}

impl fmt::Debug for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uninitialized => f.write_str("Uninitialized"),
            Self::Ready(session) => f.debug_tuple("Ready").field(session).finish(),
            Self::Failed => f.write_str("Failed"),
        }
    }
}

/// Inputs to [`AppState::apply`].
#[derive(Clone)]
pub enum ChatEvent {
    SessionReady(Arc<dyn ChatSession>),
    SessionFailed,
    Submit(String),
    ReplyReceived(String),
    ReplyFailed,
    ShowToast { text: String, at: Instant },
    ToastExpired(ToastId),
}

impl fmt::Debug for ChatEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SessionReady(session) => f.debug_tuple("SessionReady").field(session).finish(),
            Self::SessionFailed => f.write_str("SessionFailed"),
            Self::Submit(text) => f.debug_tuple("Submit").field(text).finish(),
            Self::ReplyReceived(text) => f.debug_tuple("ReplyReceived").field(text).finish(),
            Self::ReplyFailed => f.write_str("ReplyFailed"),
            Self::ShowToast { text, .. } => {
                f.debug_struct("ShowToast").field("text", text).finish()
            }
            Self::ToastExpired(id) => f.debug_tuple("ToastExpired").field(id).finish(),
        }
    }
}

/// Work the state owner must start after a transition. Each effect reports back as
/// exactly one [`ChatEvent`].
#[derive(Clone)]
pub enum Effect {
    /// Send `text` on `session`; answer with `ReplyReceived` or `ReplyFailed`.
    Send {
        session: Arc<dyn ChatSession>,
        text: String,
    },
    /// Fire `ToastExpired(id)` once `after` has elapsed.
    DismissToast { id: ToastId, after: Duration },
}

impl fmt::Debug for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Send { text, .. } => f.debug_struct("Send").field("text", text).finish(),
            Self::DismissToast { id, after } => f
                .debug_struct("DismissToast")
                .field("id", id)
                .field("after", after)
                .finish(),
        }
    }
}

/// Whole view state of the counselling window.
#[derive(Debug, Clone)]
pub struct AppState {
    session: SessionState,
    transcript: Transcript,
    loading: bool,
    toast: ToastState,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    /// Starts in the bootstrap phase: no transcript yet and input locked until the
    /// session settles.
    pub fn new() -> Self {
        Self {
            session: SessionState::Uninitialized,
            transcript: Transcript::default(),
            loading: true,
            toast: ToastState::default(),
        }
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// True while the input field and its send button are locked: before the session
    /// settles and while a reply is outstanding.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn toast(&self) -> &ToastState {
        &self.toast
    }

    /// Whether the ephemeral typing bubble should follow the transcript.
    pub fn shows_typing_indicator(&self) -> bool {
        self.loading && self.transcript.len() > 1
    }

    /// Applies one transition and returns the side effect it requires, if any.
    pub fn apply(&mut self, event: ChatEvent) -> Option<Effect> {
        match event {
            ChatEvent::SessionReady(session) => {
                self.settle(SessionState::Ready(session), copy::GREETING);
                None
            }
            ChatEvent::SessionFailed => {
                self.settle(SessionState::Failed, copy::INIT_ERROR);
                None
            }
            ChatEvent::Submit(text) => self.submit(text),
            ChatEvent::ReplyReceived(reply) => {
                self.finish_reply(Message::model(reply));
                None
            }
            ChatEvent::ReplyFailed => {
                self.finish_reply(Message::model(copy::SEND_ERROR));
                None
            }
            ChatEvent::ShowToast { text, at } => {
                let id = self.toast.show(text, at);
                Some(Effect::DismissToast {
                    id,
                    after: TOAST_DURATION,
                })
            }
            ChatEvent::ToastExpired(id) => {
                self.toast.dismiss(id);
                None
            }
        }
    }

    fn settle(&mut self, session: SessionState, opening: &str) {
        if self.session.is_settled() {
            tracing::warn!(current = ?self.session, "ignoring repeated session bootstrap result");
            return;
        }

        self.session = session;
        self.transcript = Transcript::seeded(Message::model(opening));
        self.loading = false;
    }

    fn submit(&mut self, text: String) -> Option<Effect> {
        let text = text.trim();
        if text.is_empty() || self.loading {
            return None;
        }

        let session = self.session.session()?.clone();
        let text = text.to_string();

        self.transcript.push(Message::user(text.clone()));
        self.loading = true;
        Some(Effect::Send { session, text })
    }

    fn finish_reply(&mut self, reply: Message) {
        if !self.loading || !self.session.is_settled() {
            tracing::warn!("dropping reply that arrived without an outstanding send");
            return;
        }

        self.transcript.push(reply);
        self.loading = false;
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use mentor_llm::{BoxFuture, ProviderResult};

    use super::*;
    use crate::message::Role;

    #[derive(Debug, Default)]
    pub(crate) struct ScriptedSession;

    impl ChatSession for ScriptedSession {
        fn model_id(&self) -> &str {
            "scripted"
        }

        fn send<'a>(&'a self, text: String) -> BoxFuture<'a, ProviderResult<String>> {
            Box::pin(async move { Ok(format!("echo: {text}")) })
        }
    }

    fn ready_state() -> AppState {
        let mut state = AppState::new();
        state.apply(ChatEvent::SessionReady(Arc::new(ScriptedSession)));
        state
    }

    #[test]
    fn bootstrap_success_seeds_greeting_and_unlocks_input() {
        let state = ready_state();

        assert_eq!(state.transcript().messages(), &[Message::model(copy::GREETING)]);
        assert!(!state.is_loading());
    }

    #[test]
    fn bootstrap_failure_seeds_apology_and_stays_inert() {
        let mut state = AppState::new();
        state.apply(ChatEvent::SessionFailed);

        assert_eq!(state.transcript().messages(), &[Message::model(copy::INIT_ERROR)]);
        assert!(!state.is_loading());

        assert!(state.apply(ChatEvent::Submit("hello".into())).is_none());
        assert_eq!(state.transcript().len(), 1);
    }

    #[test]
    fn session_state_is_terminal() {
        let mut state = AppState::new();
        state.apply(ChatEvent::SessionFailed);
        state.apply(ChatEvent::SessionReady(Arc::new(ScriptedSession)));

        assert!(matches!(state.session(), SessionState::Failed));
        assert_eq!(state.transcript().len(), 1);
    }

    #[test]
    fn submit_before_bootstrap_settles_is_rejected() {
        let mut state = AppState::new();

        assert!(state.apply(ChatEvent::Submit("too early".into())).is_none());
        assert!(state.transcript().is_empty());
        assert!(state.is_loading());
    }

    #[test]
    fn blank_submissions_do_nothing() {
        let mut state = ready_state();

        for blank in ["", "   ", "\n\t"] {
            assert!(state.apply(ChatEvent::Submit(blank.into())).is_none());
        }
        assert_eq!(state.transcript().len(), 1);
        assert!(!state.is_loading());
    }

    #[test]
    fn submit_appends_optimistically_and_requests_send() {
        let mut state = ready_state();

        let effect = state.apply(ChatEvent::Submit("  진로가 고민이에요  ".into()));

        assert!(matches!(
            effect,
            Some(Effect::Send { ref text, .. }) if text == "진로가 고민이에요"
        ));
        assert_eq!(
            state.transcript().messages().last(),
            Some(&Message::user("진로가 고민이에요"))
        );
        assert!(state.is_loading());
        assert!(state.shows_typing_indicator());
        assert!(state.apply(ChatEvent::Submit("again".into())).is_none());
    }

    #[test]
    fn input_controls_stay_locked_until_the_reply_lands() {
        let mut state = AppState::new();
        assert!(state.is_loading());

        state.apply(ChatEvent::SessionReady(Arc::new(ScriptedSession)));
        assert!(!state.is_loading());

        state.apply(ChatEvent::Submit("질문".into()));
        assert!(state.is_loading());

        state.apply(ChatEvent::ReplyReceived("답변".into()));
        assert!(!state.is_loading());
    }

    #[test]
    fn failed_reply_becomes_model_apology_and_conversation_continues() {
        let mut state = ready_state();
        state.apply(ChatEvent::Submit("first".into()));
        state.apply(ChatEvent::ReplyFailed);

        assert_eq!(
            state.transcript().messages().last(),
            Some(&Message::model(copy::SEND_ERROR))
        );
        assert!(!state.is_loading());

        assert!(state.apply(ChatEvent::Submit("second".into())).is_some());
        state.apply(ChatEvent::ReplyReceived("answer".into()));
        assert_eq!(state.transcript().len(), 5);
    }

    #[test]
    fn n_exchanges_yield_alternating_transcript_of_two_n_plus_one() {
        let mut state = ready_state();
        let rounds = 6;

        for round in 0..rounds {
            state.apply(ChatEvent::Submit(format!("question {round}")));
            if round % 3 == 0 {
                state.apply(ChatEvent::ReplyFailed);
            } else {
                state.apply(ChatEvent::ReplyReceived(format!("answer {round}")));
            }
        }

        let messages = state.transcript().messages();
        assert_eq!(messages.len(), 2 * rounds + 1);
        for (index, message) in messages.iter().enumerate() {
            let expected = if index % 2 == 0 { Role::Model } else { Role::User };
            assert_eq!(message.role(), expected, "entry {index}");
        }
    }

    #[test]
    fn stray_reply_without_outstanding_send_is_dropped() {
        let mut state = ready_state();
        state.apply(ChatEvent::ReplyReceived("unsolicited".into()));

        assert_eq!(state.transcript().len(), 1);
    }

    #[test]
    fn typing_indicator_is_derived_not_stored() {
        let mut state = AppState::new();
        assert!(state.is_loading());
        assert!(!state.shows_typing_indicator());

        state.apply(ChatEvent::SessionReady(Arc::new(ScriptedSession)));
        state.apply(ChatEvent::Submit("hi".into()));
        assert!(state.shows_typing_indicator());
        assert_eq!(state.transcript().len(), 2);

        state.apply(ChatEvent::ReplyReceived("hello".into()));
        assert!(!state.shows_typing_indicator());
        assert_eq!(state.transcript().len(), 3);
    }

    #[test]
    fn toast_schedules_its_own_dismissal() {
        let mut state = ready_state();
        let now = Instant::now();

        let effect = state.apply(ChatEvent::ShowToast {
            text: copy::COPIED.into(),
            at: now,
        });
        let Some(Effect::DismissToast { id, after }) = effect else {
            panic!("expected a dismiss effect, got {effect:?}");
        };
        assert_eq!(after, TOAST_DURATION);
        assert_eq!(state.toast().visible_at(now), Some(copy::COPIED));

        state.apply(ChatEvent::ToastExpired(id));
        assert!(state.toast().current().is_none());
    }
}
