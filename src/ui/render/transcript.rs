use crate::chat::Sender;
use crate::spinner::typing_frame;
use crate::ui::helpers::wrap_text;
use crate::ui::theme::Theme;
use crate::ui::App;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

const INDENT: &str = "   ";

/// Returns the furthest the transcript can scroll up
pub(super) fn render_transcript(frame: &mut Frame, area: Rect, app: &App) -> usize {
    let transcript = app.chat.transcript();
    let width = (area.width as usize).saturating_sub(INDENT.len() * 2);

    let mut lines: Vec<Line> = Vec::new();
    for message in transcript.messages() {
        let (label, label_style) = match message.sender {
            Sender::User => ("You", Theme::user_label()),
            Sender::Ai => (app.assistant_name(), Theme::ai_label()),
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{}{}", INDENT, label), label_style),
            Span::styled(
                format!("  {}", message.at.format("%H:%M")),
                Theme::text_dim(),
            ),
        ]));
        for line in wrap_text(&message.text, width) {
            lines.push(Line::from(Span::styled(
                format!("{}{}", INDENT, line),
                Theme::text(),
            )));
        }
        lines.push(Line::from(""));
    }

    // Typing placeholder: drawn after the messages, never stored as one
    if transcript.is_typing() {
        lines.push(Line::from(vec![
            Span::styled(format!("{}{}", INDENT, app.assistant_name()), Theme::ai_label()),
            Span::styled(
                format!("  {}", typing_frame(app.loading_frame)),
                Theme::text_muted(),
            ),
        ]));
    }

    // Follow the newest entry unless the user scrolled up
    let height = area.height as usize;
    let max_top = lines.len().saturating_sub(height);
    let from_bottom = transcript.scroll_from_bottom().min(max_top);
    let top = max_top - from_bottom;

    let paragraph = Paragraph::new(lines).scroll((top.min(u16::MAX as usize) as u16, 0));
    frame.render_widget(paragraph, area);
    max_top
}
