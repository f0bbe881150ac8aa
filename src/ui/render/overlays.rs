use crate::ui::helpers::centered_rect;
use crate::ui::theme::Theme;
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

pub(super) fn render_help(frame: &mut Frame) {
    let area = centered_rect(55, 80, frame.area());
    frame.render_widget(Clear, area);

    fn section_start(title: &str) -> Vec<Line<'static>> {
        vec![
            Line::from(""),
            Line::from(vec![
                Span::styled("    ╭─ ".to_string(), Style::default().fg(Theme::GREY_600)),
                Span::styled(
                    title.to_string(),
                    Style::default()
                        .fg(Theme::WHITE)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    " ─────────────────────────╮".to_string(),
                    Style::default().fg(Theme::GREY_600),
                ),
            ]),
            Line::from(Span::styled(
                "    │".to_string(),
                Style::default().fg(Theme::GREY_600),
            )),
        ]
    }

    fn key_row(key: &str, desc: &str) -> Line<'static> {
        Line::from(vec![
            Span::styled("    │  ".to_string(), Style::default().fg(Theme::GREY_600)),
            Span::styled(
                format!(" {} ", key),
                Style::default().fg(Theme::GREY_900).bg(Theme::GREY_300),
            ),
            Span::styled(format!("  {}", desc), Style::default().fg(Theme::GREY_200)),
        ])
    }

    fn section_end() -> Vec<Line<'static>> {
        vec![
            Line::from(Span::styled(
                "    │".to_string(),
                Style::default().fg(Theme::GREY_600),
            )),
            Line::from(Span::styled(
                "    ╰─────────────────────────────────────╯".to_string(),
                Style::default().fg(Theme::GREY_600),
            )),
        ]
    }

    let mut help_text: Vec<Line<'static>> = vec![Line::from("")];

    help_text.extend(section_start("Panels"));
    help_text.push(key_row("F1 ^T", "Chat"));
    help_text.push(key_row("F2 ^F", "FAQs (again to close)"));
    help_text.push(key_row("F3 ^P", "Products (again to close)"));
    help_text.push(key_row("F4 ^U", "Upload documents"));
    help_text.push(key_row("Esc", "Back to chat"));
    help_text.extend(section_end());

    help_text.extend(section_start("Chat"));
    help_text.push(key_row("↵", "Send message"));
    help_text.push(key_row("⇧↵", "New line (Alt+Enter also works)"));
    help_text.push(key_row("↑↓", "Scroll one line"));
    help_text.push(key_row("PgUp/Dn", "Page scroll"));
    help_text.extend(section_end());

    help_text.extend(section_start("Upload"));
    help_text.push(key_row("Tab", "Switch field"));
    help_text.push(key_row("↵", "Upload / back to chat"));
    help_text.push(key_row("r", "Retry a failed upload"));
    help_text.push(key_row("n", "Upload another document"));
    help_text.extend(section_end());

    help_text.extend(section_start("General"));
    help_text.push(key_row("F10", "Toggle this help"));
    help_text.push(key_row("^C ^Q", "Quit"));
    help_text.extend(section_end());

    let block = Paragraph::new(help_text).block(
        Block::default()
            .title(" Help ")
            .title_style(Style::default().fg(Theme::GREY_100))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Theme::GREY_400))
            .style(Style::default().bg(Theme::GREY_900)),
    );

    frame.render_widget(block, area);
}
