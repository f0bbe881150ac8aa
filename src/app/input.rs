//! Input handling for the bizchat TUI
//!
//! Global keys (quit, panel switching, scrolling, help) are handled here;
//! everything else goes to the chat input or, while the upload panel is
//! active, to the upload form.

use crate::app::background;
use crate::app::RuntimeContext;
use crate::session::Panel;
use crate::ui::{App, Overlay};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

mod chat;
mod upload;


use chat::handle_chat_input;
use upload::handle_upload_input;

const PAGE: usize = 10;

// ═══════════════════════════════════════════════════════════════════════════
//  MAIN INPUT DISPATCHER
// ═══════════════════════════════════════════════════════════════════════════

/// Main key event handler - dispatches to panel-specific handlers
pub fn handle_key_event(app: &mut App, key: KeyEvent, ctx: &RuntimeContext) -> Result<()> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') => {
                app.should_quit = true;
                return Ok(());
            }
            KeyCode::Char('t') => return activate_panel(app, Panel::Chat, ctx),
            KeyCode::Char('f') => return activate_panel(app, Panel::Faq, ctx),
            KeyCode::Char('p') => return activate_panel(app, Panel::Products, ctx),
            KeyCode::Char('u') => return activate_panel(app, Panel::Upload, ctx),
            _ => {}
        }
    }

    if app.overlay != Overlay::None {
        if matches!(key.code, KeyCode::Esc | KeyCode::F(10) | KeyCode::Enter) {
            app.overlay = Overlay::None;
        }
        return Ok(());
    }

    match key.code {
        KeyCode::F(10) => {
            app.overlay = Overlay::Help;
            return Ok(());
        }
        KeyCode::F(n) => {
            if let Some(panel) = Panel::from_function_key(n) {
                return activate_panel(app, panel, ctx);
            }
            return Ok(());
        }
        KeyCode::PageUp => {
            scroll_up(app, PAGE);
            return Ok(());
        }
        KeyCode::PageDown => {
            scroll_down(app, PAGE);
            return Ok(());
        }
        KeyCode::Esc if app.state.active_panel() != Some(Panel::Chat) => {
            app.view.show_chat(&mut app.state);
            return Ok(());
        }
        _ => {}
    }

    if app.state.is_active(Panel::Upload) {
        return handle_upload_input(app, key, ctx);
    }
    handle_chat_input(app, key, ctx)
}

/// Bracketed paste goes wherever typed characters would go
pub fn handle_paste(app: &mut App, text: &str) {
    if app.overlay != Overlay::None {
        return;
    }
    if app.state.is_active(Panel::Upload) {
        if let Some(form) = app.view.upload_form_mut() {
            for c in text.chars().filter(|c| !c.is_control()) {
                form.push_char(c);
            }
        }
        return;
    }
    if app.chat.input_enabled(&app.state) {
        app.chat.input_mut().push_str(&text.replace("\r\n", "\n"));
    }
}

/// Switch panels and kick off whatever the panel needs to load
pub fn activate_panel(app: &mut App, panel: Panel, ctx: &RuntimeContext) -> Result<()> {
    let load = app.view.activate(&mut app.state, panel);
    background::spawn_panel_load(ctx, load);
    Ok(())
}

fn scroll_up(app: &mut App, lines: usize) {
    match app.state.active_panel() {
        Some(Panel::Faq) | Some(Panel::Products) => app.view.scroll_up(lines),
        _ => app.chat.transcript_mut().scroll_up(lines),
    }
}

fn scroll_down(app: &mut App, lines: usize) {
    match app.state.active_panel() {
        Some(Panel::Faq) | Some(Panel::Products) => app.view.scroll_down(lines),
        _ => app.chat.transcript_mut().scroll_down(lines),
    }
}
