use gpui::*;
use gpui_component::{ActiveTheme, h_flex, label::Label, v_flex};
use mentor_chat::copy;
use mentor_chat::{Message, Role};

use crate::chat::scroll_manager::ScrollManager;

const CONTENT_MAX_WIDTH: Pixels = px(896.);
const BUBBLE_MAX_WIDTH: Pixels = px(512.);
const BUBBLE_PADDING_X: Pixels = px(16.);
const BUBBLE_PADDING_Y: Pixels = px(12.);
const AVATAR_SIZE: Pixels = px(40.);

/// Transcript renderer. Rows are plain bubbles; the typing placeholder is drawn from a
/// flag and never becomes part of `messages`.
pub struct MessageList {
    messages: Vec<Message>,
    show_typing: bool,
    scroll_manager: ScrollManager,
}

impl MessageList {
    pub fn new(_cx: &mut Context<Self>) -> Self {
        Self {
            messages: Vec::new(),
            show_typing: false,
            scroll_manager: ScrollManager::new(),
        }
    }

    pub fn set_transcript(
        &mut self,
        messages: Vec<Message>,
        show_typing: bool,
        cx: &mut Context<Self>,
    ) {
        if messages != self.messages {
            self.scroll_manager.request_scroll_to_bottom();
        }

        self.messages = messages;
        self.show_typing = show_typing;
        cx.notify();
    }

    fn row_count(&self) -> usize {
        self.messages.len() + usize::from(self.show_typing)
    }

    fn render_message_row(&self, message: &Message, id: ElementId, cx: &Context<Self>) -> AnyElement {
        let theme = cx.theme();
        let content = message.content().to_string();

        match message.role() {
            Role::User => h_flex()
                .id(id)
                .w_full()
                .justify_end()
                .child(
                    div()
                        .max_w(BUBBLE_MAX_WIDTH)
                        .px(BUBBLE_PADDING_X)
                        .py(BUBBLE_PADDING_Y)
                        .rounded_lg()
                        .bg(theme.accent)
                        .text_color(theme.accent_foreground)
                        .child(Label::new(content).text_sm()),
                )
                .into_any_element(),
            Role::Model => h_flex()
                .id(id)
                .w_full()
                .items_start()
                .justify_start()
                .gap_3()
                .child(
                    div()
                        .size(AVATAR_SIZE)
                        .flex_shrink_0()
                        .rounded_full()
                        .bg(theme.primary)
                        .flex()
                        .items_center()
                        .justify_center()
                        .text_sm()
                        .font_weight(FontWeight::BOLD)
                        .text_color(theme.background)
                        .child("AI"),
                )
                .child(
                    div()
                        .max_w(BUBBLE_MAX_WIDTH)
                        .px(BUBBLE_PADDING_X)
                        .py(BUBBLE_PADDING_Y)
                        .rounded_lg()
                        .border_1()
                        .border_color(theme.border)
                        .bg(theme.background)
                        .text_color(theme.foreground)
                        .child(Label::new(content).text_sm()),
                )
                .into_any_element(),
        }
    }
}

impl Render for MessageList {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let row_count = self.row_count();
        self.scroll_manager.track_row_count(row_count);
        self.scroll_manager.apply_pending_scroll();

        let mut rows = self
            .messages
            .iter()
            .enumerate()
            .map(|(index, message)| {
                self.render_message_row(message, ("message", index).into(), cx)
            })
            .collect::<Vec<_>>();

        if self.show_typing {
            rows.push(self.render_message_row(
                &Message::model(copy::TYPING),
                "typing-indicator".into(),
                cx,
            ));
        }

        div()
            .id("message-list")
            .size_full()
            .min_h_0()
            .overflow_y_scroll()
            .track_scroll(self.scroll_manager.handle())
            .child(
                h_flex().w_full().justify_center().child(
                    v_flex()
                        .w_full()
                        .max_w(CONTENT_MAX_WIDTH)
                        .px_4()
                        .py_3()
                        .gap_4()
                        .children(rows),
                ),
            )
    }
}

