use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

use super::widgets::titled_block;

pub const TRAILER_URL: &str = "https://youtu.be/wyiZWYMilgk";

pub fn render_about_view(frame: &mut Frame, area: Rect, accent: Color) {
    let lines = vec![
        Line::styled(
            "About this app",
            Style::default().fg(accent).add_modifier(Modifier::BOLD),
        ),
        Line::raw(""),
        Line::raw(
            "This app is a survey form for anime fans at the UNM campus. \
             It is meant to find out how many fans there are, so that a campus \
             community can be started.",
        ),
        Line::raw(""),
        Line::raw(
            "I built it because I am an anime fan too. Thank you for visiting \
             and filling in the form! Arigatouu.",
        ),
        Line::raw(""),
        Line::from(vec![
            Span::styled("Trailer, Kimetsu no Yaiba: ", Style::default().fg(Color::DarkGray)),
            Span::styled(TRAILER_URL, Style::default().fg(Color::Cyan)),
        ]),
    ];

    let paragraph = Paragraph::new(lines)
        .block(titled_block("About", accent))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}
