use crate::ui::theme::Theme;
use crate::ui::App;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

pub(super) fn render_footer(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![Span::styled(
        format!("  {}", app.config.server_url),
        Theme::text_dim(),
    )];

    if app.state.is_sending() {
        spans.push(Span::styled(
            format!("  {}  waiting for reply", Theme::DOT_SEPARATOR),
            Theme::text_muted(),
        ));
    } else if app.view.is_uploading() {
        spans.push(Span::styled(
            format!("  {}  uploading", Theme::DOT_SEPARATOR),
            Theme::text_muted(),
        ));
    }

    let hints: [(&str, &str); 3] = [("F1-F4", "panels"), ("F10", "help"), ("^C", "quit")];
    let hint_width: usize = hints
        .iter()
        .map(|(key, desc)| key.len() + desc.len() + 4)
        .sum();
    let used: usize = spans.iter().map(|s| s.width()).sum();
    let gap = (area.width as usize).saturating_sub(used + hint_width + 1);
    spans.push(Span::raw(" ".repeat(gap)));

    for (key, desc) in hints {
        spans.push(Span::styled(format!(" {} ", key), Theme::key_badge()));
        spans.push(Span::styled(format!(" {} ", desc), Theme::text_dim()));
    }

    let footer = Paragraph::new(Line::from(spans)).style(Style::default().bg(Theme::GREY_800));
    frame.render_widget(footer, area);
}
