mod footer;
mod header;
mod input;
mod overlays;
mod panels;
mod toast;
mod transcript;

use crate::session::Panel;
use crate::ui::theme::Theme;
use crate::ui::{App, Overlay};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::Style,
    widgets::Block,
    Frame,
};

use footer::render_footer;
use header::render_header;
use input::{input_height, render_input};
use overlays::render_help;
use panels::{render_idle, render_panel};
use toast::render_toast;
use transcript::render_transcript;

/// Main render function
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Clear with dark background
    frame.render_widget(Block::default().style(Style::default().bg(Theme::BG)), area);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),                             // Header + navigation
            Constraint::Min(5),                                // Transcript or panel
            Constraint::Length(input_height(app, area.width)), // Message input
            Constraint::Length(1),                             // Footer
        ])
        .split(area);

    render_header(frame, layout[0], app);
    // Keep scroll offsets within what this frame can show
    match app.state.active_panel() {
        Some(Panel::Chat) => {
            let max_top = render_transcript(frame, layout[1], app);
            app.chat.transcript_mut().clamp_scroll(max_top);
        }
        Some(panel) => {
            let max_top = render_panel(frame, layout[1], app, panel);
            app.view.clamp_scroll(max_top);
        }
        None => render_idle(frame, layout[1]),
    }
    render_input(frame, layout[2], app);
    render_footer(frame, layout[3], app);

    if app.overlay == Overlay::Help {
        render_help(frame);
    }

    // Toast
    if let Some(toast) = &app.toast {
        render_toast(frame, toast);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Faq;
    use crate::config::Config;
    use ratatui::{backend::TestBackend, Terminal};

    fn draw(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        buffer
            .content()
            .chunks(width)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_chat_shows_messages_and_business() {
        let mut app = App::new(Config::default());
        app.state.set_business_name("Acme");
        app.chat.greet(&app.state);
        let screen = draw(&mut app);
        assert!(screen.contains("Acme"));
        assert!(screen.contains("Ask me anything"));
        assert!(screen.contains("F2 FAQs"));
    }

    #[test]
    fn test_faq_markup_is_drawn_literally() {
        let mut app = App::new(Config::default());
        app.view.activate(&mut app.state, Panel::Faq);
        app.view.apply_faqs(
            &app.state,
            Ok(vec![Faq {
                question: "Do you sell <b>cake</b>?".into(),
                answer: "Yes & more".into(),
            }]),
        );
        let screen = draw(&mut app);
        assert!(screen.contains("1. Do you sell <b>cake</b>?"));
        assert!(screen.contains("Yes & more"));
    }

    #[test]
    fn test_transcript_scroll_is_clamped_after_draw() {
        let mut app = App::new(Config::default());
        app.chat.greet(&app.state);
        app.chat.transcript_mut().scroll_up(1_000);
        draw(&mut app);
        // A single greeting fits on screen, so there is nothing to scroll
        assert_eq!(app.chat.transcript().scroll_from_bottom(), 0);
    }

    #[test]
    fn test_panel_scroll_is_clamped_after_draw() {
        let mut app = App::new(Config::default());
        app.view.activate(&mut app.state, Panel::Faq);
        let faqs = (0..30)
            .map(|i| Faq {
                question: format!("Question {}?", i),
                answer: "Yes".into(),
            })
            .collect();
        app.view.apply_faqs(&app.state, Ok(faqs));
        app.view.scroll_down(1_000);
        draw(&mut app);
        let max = app.view.scroll();
        assert!(max > 0 && max < 1_000);

        // One page up moves the view right away
        app.view.scroll_up(10);
        assert_eq!(app.view.scroll(), max - 10);
    }

    #[test]
    fn test_idle_and_help_render() {
        let mut app = App::new(Config::default());
        app.view.collapse(&mut app.state);
        assert!(draw(&mut app).contains("Nothing open."));

        app.overlay = Overlay::Help;
        assert!(draw(&mut app).contains("Send message"));
    }
}
