use gpui::ScrollHandle;

/// Keeps the transcript pinned to its newest entry.
///
/// Scroll requests are recorded when content changes and applied on the next render,
/// after the new rows exist in the layout.
pub struct ScrollManager {
    scroll_handle: ScrollHandle,
    pending_scroll_to_bottom: bool,
    last_row_count: usize,
}

impl ScrollManager {
    pub fn new() -> Self {
        Self {
            scroll_handle: ScrollHandle::new(),
            pending_scroll_to_bottom: false,
            last_row_count: 0,
        }
    }

    pub fn handle(&self) -> &ScrollHandle {
        &self.scroll_handle
    }

    pub fn request_scroll_to_bottom(&mut self) {
        self.pending_scroll_to_bottom = true;
    }

    /// Requests a scroll when the number of rendered rows changed since the last call.
    pub fn track_row_count(&mut self, row_count: usize) {
        if row_count != self.last_row_count {
            self.last_row_count = row_count;
            self.pending_scroll_to_bottom = true;
        }
    }

    pub fn apply_pending_scroll(&mut self) -> bool {
        let should_scroll = self.pending_scroll_to_bottom;
        if should_scroll {
            self.scroll_handle.scroll_to_bottom();
        }

        self.pending_scroll_to_bottom = false;
        should_scroll
    }
}

impl Default for ScrollManager {
    fn default() -> Self {
        Self::new()
    }
}
