pub mod helpers;
mod render;
pub mod theme;

pub use render::render;

use crate::chat::ChatSession;
use crate::config::Config;
use crate::session::SessionState;
use crate::upload::UploadRules;
use crate::view::ViewController;
use std::time::Instant;

/// Modal overlays drawn above everything else
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Overlay {
    #[default]
    None,
    Help,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToastKind {
    #[default]
    Info,
    Success,
    Error,
}

impl ToastKind {
    /// Duration in seconds before toast expires
    pub fn duration_secs(&self) -> u64 {
        match self {
            ToastKind::Info => 4,
            ToastKind::Success => 3,
            ToastKind::Error => 10, // Errors stay longer
        }
    }
}

/// Toast notification
pub struct Toast {
    pub message: String,
    pub created_at: Instant,
    pub kind: ToastKind,
}

impl Toast {
    pub fn new(message: &str) -> Self {
        // Auto-detect toast type - check success indicators BEFORE error keywords
        let kind = if message.starts_with('+') {
            ToastKind::Success
        } else if message.contains("failed")
            || message.contains("error")
            || message.contains("Error")
        {
            ToastKind::Error
        } else {
            ToastKind::Info
        };

        Self {
            message: message.to_string(),
            created_at: Instant::now(),
            kind,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed().as_secs() >= self.kind.duration_secs()
    }
}

/// Everything the UI loop owns
pub struct App {
    pub config: Config,
    pub state: SessionState,
    pub chat: ChatSession,
    pub view: ViewController,
    pub upload_rules: UploadRules,

    pub overlay: Overlay,
    pub toast: Option<Toast>,
    pub should_quit: bool,

    /// Animation tick for the typing indicator
    pub loading_frame: usize,
}

impl App {
    /// Start with the chat panel showing
    pub fn new(config: Config) -> Self {
        let mut state = SessionState::new();
        let mut view = ViewController::new();
        view.show_chat(&mut state);

        Self {
            chat: ChatSession::new(config.send_policy),
            upload_rules: config.upload_rules(),
            config,
            state,
            view,
            overlay: Overlay::None,
            toast: None,
            should_quit: false,
            loading_frame: 0,
        }
    }

    pub fn show_toast(&mut self, message: &str) {
        self.toast = Some(Toast::new(message));
    }

    /// Advance animations and expire toasts; called once per frame
    pub fn tick(&mut self) {
        self.loading_frame = self.loading_frame.wrapping_add(1);
        if self.toast.as_ref().is_some_and(|t| t.is_expired()) {
            self.toast = None;
        }
    }

    /// Label for the assistant's messages
    pub fn assistant_name(&self) -> &str {
        self.state.business_name().unwrap_or("Assistant")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Panel;

    #[test]
    fn test_app_starts_on_chat() {
        let app = App::new(Config::default());
        assert_eq!(app.state.active_panel(), Some(Panel::Chat));
        assert_eq!(app.view.highlighted(), Some(Panel::Chat));
        assert!(app.chat.input().is_focused());
        assert_eq!(app.assistant_name(), "Assistant");
    }

    #[test]
    fn test_toast_kind_detection() {
        assert_eq!(Toast::new("+ Documents processed").kind, ToastKind::Success);
        assert_eq!(Toast::new("Upload failed: bad file").kind, ToastKind::Error);
        assert_eq!(Toast::new("Upload your documents first").kind, ToastKind::Info);
    }
}
