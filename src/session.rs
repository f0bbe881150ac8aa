//! Session state shared by the chat and the view controller
//!
//! Fields are private; the accessors keep the two invariants the rest of
//! the client relies on: at most one chat send is in flight, and at most
//! one panel is active.

use crate::util::sanitize_display;
use serde::{Deserialize, Serialize};

/// The mutually exclusive content views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Panel {
    Chat,
    Faq,
    Products,
    Upload,
}

impl Panel {
    /// Navigation order
    pub const ALL: [Panel; 4] = [Panel::Chat, Panel::Faq, Panel::Products, Panel::Upload];

    pub fn label(&self) -> &'static str {
        match self {
            Panel::Chat => "Chat",
            Panel::Faq => "FAQs",
            Panel::Products => "Products",
            Panel::Upload => "Upload",
        }
    }

    /// Function key that toggles this panel (F1..F4)
    pub fn function_key(&self) -> u8 {
        match self {
            Panel::Chat => 1,
            Panel::Faq => 2,
            Panel::Products => 3,
            Panel::Upload => 4,
        }
    }

    pub fn from_function_key(n: u8) -> Option<Panel> {
        Panel::ALL.into_iter().find(|p| p.function_key() == n)
    }
}

#[derive(Debug, Clone, Default)]
pub struct SessionState {
    is_sending: bool,
    active_panel: Option<Panel>,
    business_name: Option<String>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_sending(&self) -> bool {
        self.is_sending
    }

    /// Claim the single send slot. Returns false if a send is already in flight.
    pub fn try_begin_send(&mut self) -> bool {
        if self.is_sending {
            return false;
        }
        self.is_sending = true;
        true
    }

    pub fn finish_send(&mut self) {
        self.is_sending = false;
    }

    pub fn active_panel(&self) -> Option<Panel> {
        self.active_panel
    }

    pub fn is_active(&self, panel: Panel) -> bool {
        self.active_panel == Some(panel)
    }

    /// Replace the active panel, returning the previous one.
    pub fn set_active_panel(&mut self, panel: Option<Panel>) -> Option<Panel> {
        std::mem::replace(&mut self.active_panel, panel)
    }

    pub fn business_name(&self) -> Option<&str> {
        self.business_name.as_deref()
    }

    pub fn has_business(&self) -> bool {
        self.business_name.is_some()
    }

    /// Record the active business. The name is shown in the header, so it
    /// is folded to a single sanitized line. Blank names are ignored; returns
    /// whether the stored name changed.
    pub fn set_business_name(&mut self, name: &str) -> bool {
        let name = sanitize_display(&name.split_whitespace().collect::<Vec<_>>().join(" "));
        if name.is_empty() || self.business_name.as_deref() == Some(name.as_str()) {
            return false;
        }
        self.business_name = Some(name);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_send_slot() {
        let mut state = SessionState::new();
        assert!(state.try_begin_send());
        assert!(state.is_sending());
        assert!(!state.try_begin_send());
        state.finish_send();
        assert!(!state.is_sending());
        assert!(state.try_begin_send());
    }

    #[test]
    fn test_active_panel_is_exclusive() {
        let mut state = SessionState::new();
        assert_eq!(state.set_active_panel(Some(Panel::Faq)), None);
        assert_eq!(state.set_active_panel(Some(Panel::Upload)), Some(Panel::Faq));
        assert!(state.is_active(Panel::Upload));
        assert!(!state.is_active(Panel::Faq));
        state.set_active_panel(None);
        assert_eq!(state.active_panel(), None);
    }

    #[test]
    fn test_business_name_ignores_blank() {
        let mut state = SessionState::new();
        assert!(!state.set_business_name("   "));
        assert!(!state.has_business());
        assert!(state.set_business_name(" Acme "));
        assert_eq!(state.business_name(), Some("Acme"));
        assert!(!state.set_business_name("Acme"));
        assert!(state.set_business_name("Acme\n  Bakery\u{1b}"));
        assert_eq!(state.business_name(), Some("Acme Bakery\u{FFFD}"));
    }

    #[test]
    fn test_function_keys_round_trip() {
        for panel in Panel::ALL {
            assert_eq!(Panel::from_function_key(panel.function_key()), Some(panel));
        }
        assert_eq!(Panel::from_function_key(9), None);
    }
}
