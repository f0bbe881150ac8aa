use crate::session::Panel;
use crate::spinner::typing_frame;
use crate::ui::helpers::wrap_text;
use crate::ui::theme::Theme;
use crate::ui::App;
use crate::upload::{format_size, UploadField, UploadForm, UploadPanel, UploadRules};
use crate::view::PanelContent;
use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Shown when every panel is collapsed
pub(super) fn render_idle(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("Nothing open.", Theme::text_muted())),
        Line::from(""),
        Line::from(Span::styled(
            "F1 chat  ·  F2 FAQs  ·  F3 products  ·  F4 upload",
            Theme::text_dim(),
        )),
    ];
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

/// Returns the furthest the panel can scroll down
pub(super) fn render_panel(frame: &mut Frame, area: Rect, app: &App, panel: Panel) -> usize {
    let block = Block::default()
        .title(format!(" {} ", panel.label()))
        .title_style(Style::default().fg(Theme::GREY_100))
        .borders(Borders::ALL)
        .border_style(Theme::border());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let width = (inner.width as usize).saturating_sub(4);
    let lines = match app.view.content() {
        PanelContent::Empty => Vec::new(),
        PanelContent::Loading => vec![
            Line::from(""),
            Line::from(Span::styled(
                format!(
                    "  {} Loading {}",
                    typing_frame(app.loading_frame),
                    panel.label().to_lowercase()
                ),
                Theme::text_muted(),
            )),
        ],
        PanelContent::Faqs(faqs) => {
            let mut lines = vec![Line::from("")];
            for (i, faq) in faqs.iter().enumerate() {
                let ordinal = format!("  {}. ", i + 1);
                let pad = " ".repeat(ordinal.len());
                for (j, line) in wrap_text(&faq.question, width.saturating_sub(ordinal.len()))
                    .into_iter()
                    .enumerate()
                {
                    let prefix = if j == 0 { ordinal.clone() } else { pad.clone() };
                    lines.push(Line::from(Span::styled(
                        format!("{}{}", prefix, line),
                        Theme::bold(),
                    )));
                }
                for line in wrap_text(&faq.answer, width.saturating_sub(pad.len())) {
                    lines.push(Line::from(Span::styled(
                        format!("{}{}", pad, line),
                        Theme::text(),
                    )));
                }
                lines.push(Line::from(""));
            }
            lines
        }
        PanelContent::Products(products) => {
            let mut lines = vec![Line::from("")];
            for product in products {
                let mut heading = vec![Span::styled(
                    format!("  {} {}", Theme::ARROW_RIGHT, product.name),
                    Theme::bold(),
                )];
                if !product.price.is_empty() {
                    heading.push(Span::styled(
                        format!("   {}", product.price),
                        Theme::text_muted(),
                    ));
                }
                lines.push(Line::from(heading));
                if !product.description.is_empty() {
                    for line in wrap_text(&product.description, width.saturating_sub(2)) {
                        lines.push(Line::from(Span::styled(
                            format!("    {}", line),
                            Theme::text(),
                        )));
                    }
                }
                lines.push(Line::from(""));
            }
            lines
        }
        PanelContent::Notice(text) => text_block(text, width, Theme::text_muted()),
        PanelContent::Error(text) => text_block(text, width, Theme::error()),
        PanelContent::Upload(upload) => {
            upload_lines(upload, &app.upload_rules, width, app.loading_frame)
        }
    };

    let max_top = lines.len().saturating_sub(inner.height as usize);
    let top = app.view.scroll().min(max_top);
    let paragraph = Paragraph::new(lines).scroll((top.min(u16::MAX as usize) as u16, 0));
    frame.render_widget(paragraph, inner);
    max_top
}

fn text_block(text: &str, width: usize, style: Style) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from("")];
    for line in wrap_text(text, width) {
        lines.push(Line::from(Span::styled(format!("  {}", line), style)));
    }
    lines
}

fn upload_lines(
    upload: &UploadPanel,
    rules: &UploadRules,
    width: usize,
    tick: usize,
) -> Vec<Line<'static>> {
    match upload {
        UploadPanel::Form(form) => form_lines(form, rules, width),
        UploadPanel::Uploading {
            file_name,
            business_name,
            note,
        } => {
            let mut lines = vec![
                Line::from(""),
                Line::from(Span::styled(
                    format!(
                        "  {} Uploading {} for {}",
                        typing_frame(tick),
                        file_name,
                        business_name
                    ),
                    Theme::text(),
                )),
                Line::from(Span::styled(
                    "    Processing can take a minute for larger documents.",
                    Theme::text_dim(),
                )),
            ];
            if let Some(note) = note {
                lines.push(Line::from(""));
                for line in wrap_text(note, width) {
                    lines.push(Line::from(Span::styled(format!("  {}", line), Theme::warning())));
                }
            }
            lines
        }
        UploadPanel::Succeeded {
            business_name,
            message,
        } => {
            let mut lines = vec![
                Line::from(""),
                Line::from(Span::styled(
                    format!("  {} {}", Theme::CHECK_MARK, business_name),
                    Theme::success(),
                )),
            ];
            let message = message
                .as_deref()
                .unwrap_or("Documents uploaded and processed. The assistant is ready.");
            for line in wrap_text(message, width) {
                lines.push(Line::from(Span::styled(format!("    {}", line), Theme::text())));
            }
            lines.push(Line::from(""));
            lines.push(hint_line(&[("↵", "back to chat"), ("n", "upload another")]));
            lines
        }
        UploadPanel::Failed { message, .. } => {
            let mut lines = vec![Line::from("")];
            for (i, line) in wrap_text(message, width.saturating_sub(2)).into_iter().enumerate() {
                let prefix = if i == 0 {
                    format!("  {} ", Theme::CROSS_MARK)
                } else {
                    "    ".to_string()
                };
                lines.push(Line::from(Span::styled(
                    format!("{}{}", prefix, line),
                    Theme::error(),
                )));
            }
            lines.push(Line::from(""));
            lines.push(hint_line(&[("r", "retry")]));
            lines
        }
    }
}

fn form_lines(form: &UploadForm, rules: &UploadRules, width: usize) -> Vec<Line<'static>> {
    let field = |label: &str, value: &str, focused: bool| -> Line<'static> {
        let marker = if focused { Theme::ARROW_RIGHT } else { ' ' };
        let cursor = if focused { "▏" } else { "" };
        Line::from(vec![
            Span::styled(
                format!("  {} {:<15}", marker, label),
                if focused {
                    Theme::bold()
                } else {
                    Theme::text_muted()
                },
            ),
            Span::styled(format!("{}{}", value, cursor), Theme::text()),
        ])
    };

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "  Upload a document about your business. The assistant answers from it.",
            Theme::text_muted(),
        )),
        Line::from(""),
        field("File", &form.file_path, form.focus == UploadField::File),
        field(
            "Business name",
            &form.business_name,
            form.focus == UploadField::BusinessName,
        ),
        Line::from(""),
        Line::from(Span::styled(
            format!(
                "  Accepted: {}  {}  up to {}",
                rules.accepted_extensions.join(", "),
                Theme::DOT_SEPARATOR,
                format_size(rules.max_bytes)
            ),
            Theme::text_dim(),
        )),
    ];

    if let Some(error) = &form.error {
        lines.push(Line::from(""));
        for line in wrap_text(error, width) {
            lines.push(Line::from(Span::styled(format!("  {}", line), Theme::error())));
        }
    }

    lines.push(Line::from(""));
    lines.push(hint_line(&[("Tab", "switch field"), ("↵", "upload")]));
    lines
}

fn hint_line(hints: &[(&str, &str)]) -> Line<'static> {
    let mut spans = vec![Span::raw("  ")];
    for (key, desc) in hints {
        spans.push(Span::styled(format!(" {} ", key), Theme::key_badge()));
        spans.push(Span::styled(format!(" {}  ", desc), Theme::text_dim()));
    }
    Line::from(spans)
}
