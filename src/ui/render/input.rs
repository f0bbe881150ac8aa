use crate::session::Panel;
use crate::ui::helpers::wrap_text;
use crate::ui::theme::Theme;
use crate::ui::{App, Overlay};
use ratatui::{
    layout::{Position, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

const MAX_VISIBLE_LINES: usize = 4;

fn text_width(box_width: u16) -> usize {
    (box_width as usize).saturating_sub(4).max(1)
}

/// Height of the message box, growing with multi-line drafts
pub(super) fn input_height(app: &App, width: u16) -> u16 {
    let lines = wrap_text(app.chat.input().text(), text_width(width)).len();
    (lines.clamp(1, MAX_VISIBLE_LINES) + 2) as u16
}

pub(super) fn render_input(frame: &mut Frame, area: Rect, app: &App) {
    let enabled = app.chat.input_enabled(&app.state);
    let on_chat = app.state.is_active(Panel::Chat);

    let title = if app.state.is_sending() {
        " Waiting for reply "
    } else {
        " Message "
    };
    let block = Block::default()
        .title(title)
        .title_style(if enabled {
            Theme::text()
        } else {
            Theme::text_dim()
        })
        .borders(Borders::ALL)
        .border_style(if enabled && on_chat {
            Theme::border_active()
        } else {
            Theme::border()
        });
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let text = app.chat.input().text();
    if text.is_empty() {
        let hint = if !on_chat {
            "Press F1 or Esc to return to the chat"
        } else if app.state.has_business() {
            "Ask a question  ·  Enter to send, Shift+Enter for a new line"
        } else {
            "Upload your business documents first (F4), then ask away"
        };
        let placeholder = Paragraph::new(Line::from(Span::styled(
            format!(" {}", hint),
            Theme::text_dim(),
        )));
        frame.render_widget(placeholder, inner);
        if enabled && on_chat && app.overlay == Overlay::None {
            frame.set_cursor_position(Position::new(inner.x + 1, inner.y));
        }
        return;
    }

    let wrapped = wrap_text(text, text_width(area.width));
    // Keep the end of the draft in view
    let skip = wrapped.len().saturating_sub(MAX_VISIBLE_LINES);
    let visible: Vec<&String> = wrapped.iter().skip(skip).collect();
    let style = if enabled {
        Theme::text()
    } else {
        Theme::text_muted()
    };
    let lines: Vec<Line> = visible
        .iter()
        .map(|line| Line::from(Span::styled(format!(" {}", line), style)))
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);

    if enabled && on_chat && app.overlay == Overlay::None {
        let last = visible.last().map(|l| l.width()).unwrap_or(0);
        let row = visible.len().saturating_sub(1) as u16;
        let col = (last as u16 + 1).min(inner.width.saturating_sub(1));
        frame.set_cursor_position(Position::new(inner.x + col, inner.y + row));
    }
}
