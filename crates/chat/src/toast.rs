use std::time::{Duration, Instant};

/// How long a notice stays on screen.
pub const TOAST_DURATION: Duration = Duration::from_millis(3_000);

/// Identifies one shown notice so a stale dismiss timer cannot hide a newer one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ToastId(pub u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: ToastId,
    pub text: String,
    pub shown_at: Instant,
}

impl Toast {
    pub fn expires_at(&self) -> Instant {
        self.shown_at + TOAST_DURATION
    }
}

/// Single-slot notice holder. Showing a notice replaces whatever was visible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToastState {
    current: Option<Toast>,
    next_id: u64,
}

impl ToastState {
    pub fn show(&mut self, text: impl Into<String>, now: Instant) -> ToastId {
        self.next_id = self.next_id.saturating_add(1);
        let id = ToastId(self.next_id);
        self.current = Some(Toast {
            id,
            text: text.into(),
            shown_at: now,
        });
        id
    }

    /// Clears the notice if `id` is still the one on screen. Returns whether it was.
    pub fn dismiss(&mut self, id: ToastId) -> bool {
        if self.current.as_ref().is_some_and(|toast| toast.id == id) {
            self.current = None;
            return true;
        }
        false
    }

    pub fn current(&self) -> Option<&Toast> {
        self.current.as_ref()
    }

    /// Text visible at `now`, treating a notice past its lifetime as already gone even if
    /// its dismiss timer has not fired yet.
    pub fn visible_at(&self, now: Instant) -> Option<&str> {
        self.current
            .as_ref()
            .filter(|toast| now < toast.expires_at())
            .map(|toast| toast.text.as_str())
    }
}
