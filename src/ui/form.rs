use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};
use ratatui_image::{StatefulImage, protocol::StatefulProtocol};

use crate::survey::{FormField, Submission, SurveyForm};

use super::widgets::titled_block;

pub fn render_form_view(
    frame: &mut Frame,
    area: Rect,
    form: &SurveyForm,
    submission: Option<&Submission>,
    form_error: Option<&str>,
    portrait: Option<&mut StatefulProtocol>,
    accent: Color,
) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    render_fields(frame, chunks[0], form, accent);
    match portrait {
        Some(portrait) => {
            let right = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(8), Constraint::Percentage(50)])
                .split(chunks[1]);
            render_result(frame, right[0], submission, form_error, accent);
            render_portrait(frame, right[1], portrait, accent);
        }
        None => render_result(frame, chunks[1], submission, form_error, accent),
    }
}

fn render_portrait(frame: &mut Frame, area: Rect, portrait: &mut StatefulProtocol, accent: Color) {
    let block = titled_block("Favorite character", accent);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_stateful_widget(StatefulImage::default(), inner, portrait);
}

fn render_fields(frame: &mut Frame, area: Rect, form: &SurveyForm, accent: Color) {
    let lines: Vec<Line> = FormField::ALL
        .iter()
        .map(|field| {
            let focused = *field == form.focus;
            let marker = if focused { "▶ " } else { "  " };
            let label_style = if focused {
                Style::default().fg(accent).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };

            let value = form.display_value(*field);
            let value_span = if field.is_select() {
                Span::styled(format!("◀ {} ▶", value), Style::default().fg(Color::Cyan))
            } else if focused {
                Span::styled(format!("{}█", value), Style::default().fg(Color::White))
            } else {
                Span::styled(value.to_string(), Style::default().fg(Color::White))
            };

            Line::from(vec![
                Span::styled(marker, label_style),
                Span::styled(format!("{:<32}", field.label()), label_style),
                value_span,
            ])
        })
        .collect();

    let paragraph = Paragraph::new(lines).block(titled_block("Anime Fan Survey", accent));
    frame.render_widget(paragraph, area);
}

fn render_result(
    frame: &mut Frame,
    area: Rect,
    submission: Option<&Submission>,
    form_error: Option<&str>,
    accent: Color,
) {
    let lines: Vec<Line> = if let Some(err) = form_error {
        vec![Line::styled(err.to_string(), Style::default().fg(Color::Red))]
    } else if let Some(submission) = submission {
        let mut lines = vec![
            Line::styled(
                "Form submitted!",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Line::raw(""),
        ];
        lines.extend(submission.summary().into_iter().map(|(label, value)| {
            Line::from(vec![
                Span::styled(
                    format!("{}: ", label),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw(value),
            ])
        }));
        lines
    } else {
        vec![Line::styled(
            "Fill in the form and press Enter to send it.",
            Style::default().fg(Color::DarkGray),
        )]
    };

    let paragraph = Paragraph::new(lines)
        .block(titled_block("Submission", accent))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}
