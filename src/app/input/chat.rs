use crate::app::background;
use crate::app::RuntimeContext;
use crate::ui::App;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Handle key events for the message input box
pub(super) fn handle_chat_input(app: &mut App, key: KeyEvent, ctx: &RuntimeContext) -> Result<()> {
    match key.code {
        KeyCode::Up => super::scroll_up(app, 1),
        KeyCode::Down => super::scroll_down(app, 1),
        KeyCode::Enter if is_newline_chord(key.modifiers) => {
            if app.chat.input_enabled(&app.state) {
                app.chat.input_mut().newline();
            }
        }
        KeyCode::Enter => submit_message(app, ctx),
        KeyCode::Backspace => {
            if app.chat.input_enabled(&app.state) {
                app.chat.input_mut().pop();
            }
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            if app.chat.input_enabled(&app.state) {
                app.chat.input_mut().push(c);
            }
        }
        _ => {}
    }
    Ok(())
}

/// Shift+Enter or Alt+Enter inserts a newline instead of sending
fn is_newline_chord(modifiers: KeyModifiers) -> bool {
    modifiers.intersects(KeyModifiers::SHIFT | KeyModifiers::ALT)
}

/// Send the input box contents to the assistant
fn submit_message(app: &mut App, ctx: &RuntimeContext) {
    match app.chat.begin_send_from_input(&mut app.state, &mut app.view) {
        Ok(pending) => background::spawn_chat_send(ctx, pending),
        Err(rejected) => {
            if let Some(guidance) = rejected.guidance() {
                app.show_toast(guidance);
            }
        }
    }
}
