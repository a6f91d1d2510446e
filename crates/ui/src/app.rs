use gpui::prelude::FluentBuilder;
use gpui::*;
use gpui_component::{
    ActiveTheme, IconName, Sizable,
    button::{Button, ButtonVariants},
    h_flex, v_flex,
};
use mentor_chat::copy;

use crate::chat::ChatView;

#[cfg(target_os = "macos")]
const WINDOW_TOOLBAR_LEFT_SAFE_PADDING: f32 = 78.0;
#[cfg(not(target_os = "macos"))]
const WINDOW_TOOLBAR_LEFT_SAFE_PADDING: f32 = 16.0;
#[cfg(target_os = "windows")]
const WINDOW_TOOLBAR_RIGHT_SAFE_PADDING: f32 = 120.0;
#[cfg(not(target_os = "windows"))]
const WINDOW_TOOLBAR_RIGHT_SAFE_PADDING: f32 = 16.0;

const TOAST_BOTTOM_OFFSET: Pixels = px(96.);

/// Header height scales with the rem size so the title keeps up with font scaling.
fn window_toolbar_height(window: &Window) -> Pixels {
    (2.5 * window.rem_size()).max(px(44.0))
}

gpui::actions!(shell, [ShareTranscript, Quit]);

/// Window root: header with the share action, the chat view, and the notice overlay.
pub struct MentorShell {
    chat_view: Entity<ChatView>,
    title_bar_should_move: bool,
}

impl MentorShell {
    pub fn new(window: &mut Window, cx: &mut Context<Self>) -> Self {
        let chat_view = cx.new(|cx| ChatView::new(window, cx));

        // The toast lives in the chat state; repaint the overlay whenever it changes.
        cx.observe(&chat_view, |_, _, cx| cx.notify()).detach();

        Self {
            chat_view,
            title_bar_should_move: false,
        }
    }

    fn share_transcript(&mut self, cx: &mut Context<Self>) {
        self.chat_view
            .update(cx, |chat_view, cx| chat_view.share_transcript(cx));
    }
}

impl Render for MentorShell {
    fn render(&mut self, window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.theme();
        let toolbar_height = window_toolbar_height(window);
        let toast = self
            .chat_view
            .read(cx)
            .toast_text()
            .map(ToString::to_string);

        div()
            .id("mentor-shell")
            .size_full()
            .relative()
            .bg(theme.background)
            .on_action(cx.listener(|this, _: &ShareTranscript, _window, cx| {
                this.share_transcript(cx);
            }))
            .child(
                v_flex()
                    .size_full()
                    .child(self.render_top_bar(window, toolbar_height, cx))
                    .child(
                        div()
                            .id("main-content")
                            .flex_1()
                            .w_full()
                            .min_h_0()
                            .overflow_hidden()
                            .child(self.chat_view.clone()),
                    ),
            )
            .when_some(toast, |shell, text| shell.child(render_toast(text, cx)))
    }
}

impl MentorShell {
    fn render_top_bar(
        &self,
        window: &Window,
        toolbar_height: Pixels,
        cx: &Context<Self>,
    ) -> impl IntoElement {
        let theme = cx.theme();

        h_flex()
            .id("app-top-bar")
            .window_control_area(WindowControlArea::Drag)
            .on_mouse_down_out(cx.listener(|this, _, _window, _cx| {
                this.title_bar_should_move = false;
            }))
            .on_mouse_up(
                MouseButton::Left,
                cx.listener(|this, _, _window, _cx| {
                    this.title_bar_should_move = false;
                }),
            )
            .on_mouse_down(
                MouseButton::Left,
                cx.listener(|this, _, _window, _cx| {
                    this.title_bar_should_move = true;
                }),
            )
            .on_mouse_move(cx.listener(|this, _, window, _cx| {
                if this.title_bar_should_move {
                    this.title_bar_should_move = false;
                    window.start_window_move();
                }
            }))
            .w_full()
            .h(toolbar_height)
            .flex_shrink_0()
            .pl(px(WINDOW_TOOLBAR_LEFT_SAFE_PADDING))
            .pr(px(WINDOW_TOOLBAR_RIGHT_SAFE_PADDING))
            .items_center()
            .justify_between()
            .bg(theme.background)
            .border_b_1()
            .border_color(theme.border)
            .child(
                div()
                    .id("app-title")
                    .text_lg()
                    .font_weight(FontWeight::BOLD)
                    .text_color(theme.foreground)
                    .child(copy::APP_TITLE),
            )
            .child(
                h_flex()
                    .gap_2()
                    .items_center()
                    .on_mouse_down(MouseButton::Left, |_, _, cx| cx.stop_propagation())
                    .child(
                        Button::new("share-transcript")
                            .small()
                            .primary()
                            .icon(IconName::Copy)
                            .child(copy::SHARE_BUTTON_LABEL)
                            .on_click(cx.listener(|this, _, _window, cx| {
                                this.share_transcript(cx);
                            })),
                    )
                    .child(self.render_linux_window_controls(window, cx)),
            )
            .when(
                cfg!(target_os = "linux") && window.window_controls().window_menu,
                |title_bar| {
                    title_bar.on_mouse_down(MouseButton::Right, |event, window, _| {
                        window.show_window_menu(event.position);
                    })
                },
            )
    }

    fn render_linux_window_controls(&self, window: &Window, cx: &Context<Self>) -> AnyElement {
        #[cfg(target_os = "linux")]
        {
            let maximize_icon = if window.is_maximized() {
                IconName::WindowRestore
            } else {
                IconName::WindowMaximize
            };

            h_flex()
                .id("linux-window-controls")
                .items_center()
                .on_mouse_down(MouseButton::Right, |_, _, cx| cx.stop_propagation())
                .gap_2()
                .ml_2()
                .child(
                    Button::new("linux-window-minimize")
                        .ghost()
                        .small()
                        .icon(IconName::WindowMinimize)
                        .on_click(cx.listener(|_, _, window, _| {
                            window.minimize_window();
                        })),
                )
                .child(
                    Button::new("linux-window-maximize")
                        .ghost()
                        .small()
                        .icon(maximize_icon)
                        .on_click(cx.listener(|_, _, window, _| {
                            window.zoom_window();
                        })),
                )
                .child(
                    Button::new("linux-window-close")
                        .ghost()
                        .small()
                        .icon(IconName::WindowClose)
                        .on_click(cx.listener(|_, _, window, _| {
                            window.remove_window();
                        })),
                )
                .into_any_element()
        }

        #[cfg(not(target_os = "linux"))]
        {
            let _ = (window, cx);
            div().into_any_element()
        }
    }
}

fn render_toast(text: String, cx: &Context<MentorShell>) -> impl IntoElement {
    let theme = cx.theme();

    h_flex()
        .id("toast-layer")
        .absolute()
        .left_0()
        .right_0()
        .bottom(TOAST_BOTTOM_OFFSET)
        .justify_center()
        .child(
            div()
                .id("toast")
                .px_4()
                .py_2()
                .rounded_lg()
                .shadow_lg()
                .bg(theme.foreground)
                .text_sm()
                .text_color(theme.background)
                .child(text),
        )
}
