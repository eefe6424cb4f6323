use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell as TableCell, Paragraph, Row, Table, TableState},
};

use crate::catalog::{AnimeStats, FetchError, ProjectedRow};
use crate::dataset::{AnimeDataset, RowSource};

use super::widgets::{titled_block, truncate};

pub fn render_data_view(
    frame: &mut Frame,
    area: Rect,
    data: &AnimeDataset,
    upload_input: &str,
    editing_upload: bool,
    table_state: &mut TableState,
    accent: Color,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(5),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(area);

    render_status_line(frame, chunks[0], data);
    render_table(frame, chunks[1], data.rows(), data.source(), table_state, accent);
    render_metrics(frame, chunks[2], &data.stats(), accent);
    render_upload_input(
        frame,
        chunks[3],
        upload_input,
        editing_upload,
        data.upload_error.as_deref(),
        accent,
    );
}

fn render_status_line(frame: &mut Frame, area: Rect, data: &AnimeDataset) {
    let line = if data.loading {
        Line::styled(
            " Fetching anime data from the Jikan API...",
            Style::default().fg(Color::Yellow),
        )
    } else if let Some(err) = &data.fetch_error {
        // Missing data is a warning, a failed request is an error
        let (label, color) = match err {
            FetchError::NoData { .. } => ("⚠ No anime data found", Color::Yellow),
            FetchError::FetchFailed { .. } => ("✖ Failed to fetch data from the Jikan API", Color::Red),
        };
        Line::from(vec![
            Span::styled(
                format!(" {} ", label),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("({}; showing {} rows)", err, data.fetched.len()),
                Style::default().fg(Color::DarkGray),
            ),
        ])
    } else {
        Line::styled(
            format!(
                " {} rows from {} page(s)",
                data.fetched.len(),
                data.pages_fetched
            ),
            Style::default().fg(Color::DarkGray),
        )
    };

    frame.render_widget(Paragraph::new(line), area);
}

fn render_table(
    frame: &mut Frame,
    area: Rect,
    rows: &[ProjectedRow],
    source: RowSource,
    table_state: &mut TableState,
    accent: Color,
) {
    let title = format!("Anime ({})", source.as_display());

    if rows.is_empty() {
        let empty = Paragraph::new("No anime yet. Press r to fetch.")
            .block(titled_block(&title, accent))
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, area);
        return;
    }

    let title_width = area.width.saturating_sub(70).max(12) as usize;

    let table_rows: Vec<Row> = rows
        .iter()
        .map(|r| {
            let score_color = match r.score.value() {
                Some(s) if *s >= 8.0 => Color::Green,
                Some(s) if *s >= 6.5 => Color::Yellow,
                Some(_) => Color::Red,
                None => Color::DarkGray,
            };
            Row::new(vec![
                TableCell::from(truncate(&r.title, title_width)),
                TableCell::from(r.score.to_string())
                    .style(Style::default().fg(score_color)),
                TableCell::from(truncate(&r.genres, 24)),
                TableCell::from(r.year.to_string()),
                TableCell::from(r.episodes.to_string()),
                TableCell::from(r.kind.clone()),
                TableCell::from(r.status.clone()),
            ])
        })
        .collect();

    let widths = [
        Constraint::Min(12),
        Constraint::Length(6),
        Constraint::Length(24),
        Constraint::Length(8),
        Constraint::Length(9),
        Constraint::Length(8),
        Constraint::Length(18),
    ];

    let table = Table::new(table_rows, widths)
        .header(
            Row::new(vec![
                "Title", "Score", "Genres", "Year", "Episodes", "Type", "Status",
            ])
            .style(Style::default().fg(accent).add_modifier(Modifier::BOLD)),
        )
        .block(titled_block(&title, accent))
        .row_highlight_style(
            Style::default()
                .bg(accent)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");

    frame.render_stateful_widget(table, area, table_state);
}

fn render_metrics(frame: &mut Frame, area: Rect, stats: &AnimeStats, accent: Color) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    let metrics = [
        ("Mean score", format_metric(stats.mean_score, 2)),
        (
            "Oldest release year",
            stats
                .oldest_year
                .map(|y| y.to_string())
                .unwrap_or_else(|| "N/A".to_string()),
        ),
        ("Mean episodes", format_metric(stats.mean_episodes, 1)),
    ];

    for ((label, value), chunk) in metrics.into_iter().zip(chunks.iter()) {
        let metric = Paragraph::new(Line::from(vec![Span::styled(
            value,
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(format!(" {} ", label))
                .title_style(Style::default().fg(accent)),
        );
        frame.render_widget(metric, *chunk);
    }
}

pub fn format_metric(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", decimals, v),
        None => "N/A".to_string(),
    }
}

fn render_upload_input(
    frame: &mut Frame,
    area: Rect,
    input: &str,
    editing: bool,
    upload_error: Option<&str>,
    accent: Color,
) {
    let title = match upload_error {
        Some(err) => format!(" Upload CSV: {} ", err),
        None => " Upload CSV (u to edit path, Enter to load) ".to_string(),
    };
    let border_color = if upload_error.is_some() {
        Color::Red
    } else if editing {
        accent
    } else {
        Color::DarkGray
    };

    let input_widget = Paragraph::new(input)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border_color))
                .title(title),
        )
        .style(Style::default().fg(Color::White));

    frame.render_widget(input_widget, area);

    if editing {
        frame.set_cursor_position(input_cursor(area, input));
    }
}

/// Cursor just after the typed text, kept inside the bordered input box
fn input_cursor(area: Rect, input: &str) -> (u16, u16) {
    let typed = u16::try_from(input.chars().count()).unwrap_or(u16::MAX);
    let last_col = area.right().saturating_sub(2).max(area.x);
    let x = area.x.saturating_add(1).saturating_add(typed).min(last_col);
    (x, area.y.saturating_add(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_metric() {
        assert_eq!(format_metric(Some(7.4567), 2), "7.46");
        assert_eq!(format_metric(Some(24.26), 1), "24.3");
        assert_eq!(format_metric(None, 2), "N/A");
    }

    #[test]
    fn test_input_cursor_stays_inside_box() {
        let area = Rect::new(2, 10, 20, 3);
        assert_eq!(input_cursor(area, "abc"), (6, 11));

        let long_path = "x".repeat(70_000);
        assert_eq!(input_cursor(area, &long_path), (20, 11));

        let edge = Rect::new(u16::MAX - 10, 0, 10, 3);
        assert_eq!(input_cursor(edge, &long_path).0, edge.right() - 2);
    }
}
