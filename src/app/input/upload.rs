use crate::app::background;
use crate::app::RuntimeContext;
use crate::ui::App;
use crate::upload::UploadPanel;
use crate::view::PanelContent;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Handle key events while the upload panel is active
pub(super) fn handle_upload_input(
    app: &mut App,
    key: KeyEvent,
    ctx: &RuntimeContext,
) -> Result<()> {
    let stage = match app.view.content() {
        PanelContent::Upload(UploadPanel::Form(_)) => Stage::Form,
        PanelContent::Upload(UploadPanel::Uploading { .. }) => Stage::Uploading,
        PanelContent::Upload(UploadPanel::Succeeded { .. }) => Stage::Succeeded,
        PanelContent::Upload(UploadPanel::Failed { .. }) => Stage::Failed,
        _ => return Ok(()),
    };

    match stage {
        Stage::Form => handle_form_input(app, key, ctx),
        Stage::Uploading => {}
        Stage::Succeeded => match key.code {
            KeyCode::Enter => app.view.show_chat(&mut app.state),
            KeyCode::Char('n') => {
                app.view.reset_upload_form();
            }
            _ => {}
        },
        Stage::Failed => {
            if matches!(key.code, KeyCode::Enter | KeyCode::Char('r')) {
                app.view.retry_upload();
            }
        }
    }
    Ok(())
}

enum Stage {
    Form,
    Uploading,
    Succeeded,
    Failed,
}

fn handle_form_input(app: &mut App, key: KeyEvent, ctx: &RuntimeContext) {
    match key.code {
        KeyCode::Enter => {
            if let Some(job) = app.view.submit_upload(&app.state, &app.upload_rules) {
                background::spawn_upload(ctx, job);
            }
        }
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
            if let Some(form) = app.view.upload_form_mut() {
                form.toggle_focus();
            }
        }
        KeyCode::Backspace => {
            if let Some(form) = app.view.upload_form_mut() {
                form.pop_char();
            }
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            if let Some(form) = app.view.upload_form_mut() {
                form.push_char(c);
            }
        }
        _ => {}
    }
}
