use crate::session::Panel;
use crate::ui::theme::Theme;
use crate::ui::App;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

pub(super) fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let mut title = vec![Span::styled(
        format!("   {}", Theme::LOGO),
        Style::default()
            .fg(Theme::WHITE)
            .add_modifier(Modifier::BOLD),
    )];
    match app.state.business_name() {
        Some(name) => {
            title.push(Span::styled(
                format!("  {}  ", Theme::DOT_SEPARATOR),
                Style::default().fg(Theme::GREY_500),
            ));
            title.push(Span::styled(name.to_string(), Theme::bold()));
        }
        None => {
            title.push(Span::styled(
                "   no business documents yet",
                Theme::text_dim(),
            ));
        }
    }

    // Navigation bar; the active panel is highlighted
    let mut nav = vec![Span::raw("   ")];
    for panel in Panel::ALL {
        let label = format!(" F{} {} ", panel.function_key(), panel.label());
        let style = if app.view.highlighted() == Some(panel) {
            Theme::nav_active()
        } else {
            Theme::nav_inactive()
        };
        nav.push(Span::styled(label, style));
        nav.push(Span::raw(" "));
    }

    let lines = vec![Line::from(title), Line::from(""), Line::from(nav)];
    let header = Paragraph::new(lines).style(Style::default().bg(Theme::BG));
    frame.render_widget(header, area);
}
