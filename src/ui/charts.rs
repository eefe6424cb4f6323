use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::Line,
    widgets::{
        Axis, Bar, BarChart, BarGroup, Cell as TableCell, Chart, Dataset, GraphType, List,
        ListItem, ListState, Paragraph, Row, Sparkline, Table,
        canvas::{Canvas, Circle, Line as CanvasLine, Rectangle},
    },
};

use crate::charts::{
    ChartKind, DemoData, GENRE_SHARES, HISTOGRAM_BINS, Table3, correlation_matrix, density_curve,
    five_number_summary, histogram, share_percentages, value_bounds,
};

use super::widgets::titled_block;

const SERIES_COLORS: [Color; 3] = [Color::Cyan, Color::Yellow, Color::LightMagenta];
const GENRE_COLORS: [Color; 5] = [
    Color::Rgb(0xff, 0x99, 0x99),
    Color::Rgb(0x66, 0xb3, 0xff),
    Color::Rgb(0x99, 0xff, 0x99),
    Color::Rgb(0xff, 0xcc, 0x99),
    Color::Rgb(0xc2, 0xc2, 0xf0),
];

pub fn render_charts_view(
    frame: &mut Frame,
    area: Rect,
    data: &DemoData,
    selected: ChartKind,
    accent: Color,
) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(28), Constraint::Min(20)])
        .split(area);

    render_chart_list(frame, chunks[0], selected, accent);

    let area = chunks[1];
    let title = selected.as_display();
    match selected {
        ChartKind::Line => render_series(frame, area, title, &data.table, GraphType::Line, accent),
        ChartKind::Bar => render_series(frame, area, title, &data.table, GraphType::Bar, accent),
        ChartKind::GenreShare => render_genre_share(frame, area, title, accent),
        ChartKind::Histogram => render_histogram(frame, area, title, &data.histogram_samples, accent),
        ChartKind::BoxPlot => render_box_plot(frame, area, title, &data.table, accent),
        ChartKind::Scatter => render_scatter(frame, area, title, &data.table, accent),
        ChartKind::Heatmap => render_heatmap(frame, area, title, &data.table, accent),
        ChartKind::Violin => render_violin(frame, area, title, &data.table, accent),
        ChartKind::Area => render_area(frame, area, title, &data.area, accent),
        ChartKind::StackedBar => render_grouped_bars(frame, area, title, &data.stacked, accent),
        ChartKind::Bubble => render_bubbles(frame, area, title, data, accent),
    }
}

fn render_chart_list(frame: &mut Frame, area: Rect, selected: ChartKind, accent: Color) {
    let items: Vec<ListItem> = ChartKind::ALL
        .iter()
        .map(|k| ListItem::new(k.as_display()))
        .collect();

    let list = List::new(items)
        .block(titled_block("Charts", accent))
        .highlight_style(Style::default().fg(accent).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(Some(selected.index()));
    frame.render_stateful_widget(list, area, &mut state);
}

fn axis_labels(bounds: [f64; 2]) -> Vec<String> {
    let mid = (bounds[0] + bounds[1]) / 2.0;
    vec![
        format!("{:.1}", bounds[0]),
        format!("{:.1}", mid),
        format!("{:.1}", bounds[1]),
    ]
}

fn render_series(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    table: &Table3,
    graph: GraphType,
    accent: Color,
) {
    // Bars of the three series are nudged apart so they don't overlap
    let offset = if graph == GraphType::Bar { 0.3 } else { 0.0 };
    let points: Vec<Vec<(f64, f64)>> = table
        .columns
        .iter()
        .enumerate()
        .map(|(s, column)| {
            column
                .iter()
                .enumerate()
                .map(|(i, v)| (i as f64 + s as f64 * offset, *v))
                .collect()
        })
        .collect();

    let datasets: Vec<Dataset> = points
        .iter()
        .zip(table.names.iter())
        .zip(SERIES_COLORS.iter())
        .map(|((pts, name), color)| {
            Dataset::default()
                .name(*name)
                .marker(Marker::Braille)
                .graph_type(graph)
                .style(Style::default().fg(*color))
                .data(pts)
        })
        .collect();

    let x_bounds = [0.0, table.len() as f64];
    let y_bounds = value_bounds(table.columns.iter().flatten().copied());

    let chart = Chart::new(datasets)
        .block(titled_block(title, accent))
        .x_axis(
            Axis::default()
                .title("index")
                .bounds(x_bounds)
                .labels(axis_labels(x_bounds)),
        )
        .y_axis(Axis::default().bounds(y_bounds).labels(axis_labels(y_bounds)));

    frame.render_widget(chart, area);
}

fn render_genre_share(frame: &mut Frame, area: Rect, title: &str, accent: Color) {
    let shares = share_percentages(&GENRE_SHARES);
    let bars: Vec<Bar> = GENRE_SHARES
        .iter()
        .zip(shares.iter())
        .zip(GENRE_COLORS.iter())
        .map(|(((label, size), (_, pct)), color)| {
            Bar::default()
                .label(Line::from(*label))
                .value(*size)
                .text_value(format!("{:.1}%", pct))
                .style(Style::default().fg(*color))
        })
        .collect();

    let chart = BarChart::default()
        .block(titled_block(title, accent))
        .bar_width(9)
        .bar_gap(2)
        .data(BarGroup::default().bars(&bars));

    frame.render_widget(chart, area);
}

fn render_histogram(frame: &mut Frame, area: Rect, title: &str, samples: &[f64], accent: Color) {
    let bins = histogram(samples, HISTOGRAM_BINS);
    let width = if bins.len() > 1 { bins[1].0 - bins[0].0 } else { 1.0 };
    let points: Vec<(f64, f64)> = bins
        .iter()
        .map(|(start, count)| (start + width / 2.0, *count as f64))
        .collect();

    let x_bounds = value_bounds(points.iter().map(|(x, _)| *x));
    let y_bounds = [0.0, value_bounds(points.iter().map(|(_, y)| *y))[1]];

    let chart = Chart::new(vec![
        Dataset::default()
            .name("frequency")
            .marker(Marker::HalfBlock)
            .graph_type(GraphType::Bar)
            .style(Style::default().fg(Color::Magenta))
            .data(&points),
    ])
    .block(titled_block(title, accent))
    .x_axis(
        Axis::default()
            .title("value")
            .bounds(x_bounds)
            .labels(axis_labels(x_bounds)),
    )
    .y_axis(
        Axis::default()
            .title("frequency")
            .bounds(y_bounds)
            .labels(axis_labels(y_bounds)),
    );

    frame.render_widget(chart, area);
}

fn render_box_plot(frame: &mut Frame, area: Rect, title: &str, table: &Table3, accent: Color) {
    let stats: Vec<_> = table
        .columns
        .iter()
        .filter_map(|c| five_number_summary(c))
        .collect();
    let y_bounds = value_bounds(stats.iter().flat_map(|s| [s.min, s.max]));

    let canvas = Canvas::default()
        .block(titled_block(title, accent))
        .marker(Marker::Braille)
        .x_bounds([0.0, 3.0])
        .y_bounds(y_bounds)
        .paint(move |ctx| {
            for (i, s) in stats.iter().enumerate() {
                let center = i as f64 + 0.5;
                let color = SERIES_COLORS[i % SERIES_COLORS.len()];
                ctx.draw(&Rectangle {
                    x: center - 0.25,
                    y: s.q1,
                    width: 0.5,
                    height: s.q3 - s.q1,
                    color,
                });
                ctx.draw(&CanvasLine {
                    x1: center - 0.25,
                    y1: s.median,
                    x2: center + 0.25,
                    y2: s.median,
                    color: Color::White,
                });
                ctx.draw(&CanvasLine {
                    x1: center,
                    y1: s.min,
                    x2: center,
                    y2: s.q1,
                    color,
                });
                ctx.draw(&CanvasLine {
                    x1: center,
                    y1: s.q3,
                    x2: center,
                    y2: s.max,
                    color,
                });
            }
            for (i, name) in ["a", "b", "c"].iter().enumerate() {
                ctx.print(i as f64 + 0.5, y_bounds[0], Line::from(*name));
            }
        });

    frame.render_widget(canvas, area);
}

fn render_scatter(frame: &mut Frame, area: Rect, title: &str, table: &Table3, accent: Color) {
    let points: Vec<(f64, f64)> = table.columns[0]
        .iter()
        .zip(table.columns[1].iter())
        .map(|(a, b)| (*a, *b))
        .collect();
    let x_bounds = value_bounds(points.iter().map(|(x, _)| *x));
    let y_bounds = value_bounds(points.iter().map(|(_, y)| *y));

    let chart = Chart::new(vec![
        Dataset::default()
            .name("a vs b")
            .marker(Marker::Dot)
            .graph_type(GraphType::Scatter)
            .style(Style::default().fg(Color::Red))
            .data(&points),
    ])
    .block(titled_block(title, accent))
    .x_axis(
        Axis::default()
            .title("a")
            .bounds(x_bounds)
            .labels(axis_labels(x_bounds)),
    )
    .y_axis(
        Axis::default()
            .title("b")
            .bounds(y_bounds)
            .labels(axis_labels(y_bounds)),
    );

    frame.render_widget(chart, area);
}

/// Blue for negative, red for positive, brighter with magnitude
fn coolwarm(value: f64) -> Color {
    let t = value.clamp(-1.0, 1.0);
    let strength = (t.abs() * 200.0) as u8;
    if t >= 0.0 {
        Color::Rgb(55 + strength, 60, 70)
    } else {
        Color::Rgb(50, 60, 55 + strength)
    }
}

fn render_heatmap(frame: &mut Frame, area: Rect, title: &str, table: &Table3, accent: Color) {
    let matrix = correlation_matrix(&table.columns);

    let rows: Vec<Row> = matrix
        .iter()
        .zip(table.names.iter())
        .map(|(values, name)| {
            let mut cells = vec![TableCell::from(*name).style(Style::default().add_modifier(Modifier::BOLD))];
            cells.extend(values.iter().map(|v| match v {
                Some(r) => TableCell::from(format!("{:>6.2}", r))
                    .style(Style::default().bg(coolwarm(*r)).fg(Color::White)),
                None => TableCell::from("   n/a"),
            }));
            Row::new(cells).height(2)
        })
        .collect();

    let mut header = vec![""];
    header.extend(table.names.iter().copied());

    let heatmap = Table::new(
        rows,
        [
            Constraint::Length(4),
            Constraint::Length(8),
            Constraint::Length(8),
            Constraint::Length(8),
        ],
    )
    .header(Row::new(header).style(Style::default().fg(accent).add_modifier(Modifier::BOLD)))
    .block(titled_block(title, accent));

    frame.render_widget(heatmap, area);
}

fn render_violin(frame: &mut Frame, area: Rect, title: &str, table: &Table3, accent: Color) {
    let curves: Vec<Vec<(f64, f64)>> = table
        .columns
        .iter()
        .map(|c| density_curve(c, 20))
        .collect();

    let datasets: Vec<Dataset> = curves
        .iter()
        .zip(table.names.iter())
        .zip(SERIES_COLORS.iter())
        .map(|((curve, name), color)| {
            Dataset::default()
                .name(*name)
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(*color))
                .data(curve)
        })
        .collect();

    let x_bounds = value_bounds(curves.iter().flatten().map(|(x, _)| *x));
    let y_bounds = [0.0, value_bounds(curves.iter().flatten().map(|(_, y)| *y))[1]];

    let chart = Chart::new(datasets)
        .block(titled_block(title, accent))
        .x_axis(
            Axis::default()
                .title("value")
                .bounds(x_bounds)
                .labels(axis_labels(x_bounds)),
        )
        .y_axis(
            Axis::default()
                .title("density")
                .bounds(y_bounds)
                .labels(axis_labels(y_bounds)),
        );

    frame.render_widget(chart, area);
}

fn render_area(frame: &mut Frame, area: Rect, title: &str, values: &[f64], accent: Color) {
    // Sparklines are unsigned, so the series is shifted up by its minimum
    let [min, _] = value_bounds(values.iter().copied());
    let heights: Vec<u64> = values
        .iter()
        .map(|v| ((v - min) * 100.0).round() as u64)
        .collect();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(area);

    let sparkline = Sparkline::default()
        .block(titled_block(title, accent))
        .style(Style::default().fg(Color::Cyan))
        .data(heights);
    frame.render_widget(sparkline, chunks[0]);

    let note = Paragraph::new(format!(" baseline {:.2}", min)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(note, chunks[1]);
}

fn render_grouped_bars(frame: &mut Frame, area: Rect, title: &str, table: &Table3, accent: Color) {
    if table.is_empty() {
        frame.render_widget(titled_block(title, accent), area);
        return;
    }

    let mut chart = BarChart::default()
        .block(titled_block(title, accent))
        .bar_width(3)
        .bar_gap(0)
        .group_gap(2);

    for row in 0..table.len() {
        let bars: Vec<Bar> = table
            .columns
            .iter()
            .zip(SERIES_COLORS.iter())
            .map(|(column, color)| {
                let v = column[row];
                // Negative values are drawn by magnitude in a dimmed style
                let style = if v >= 0.0 {
                    Style::default().fg(*color)
                } else {
                    Style::default().fg(*color).add_modifier(Modifier::DIM)
                };
                Bar::default()
                    .value((v.abs() * 100.0).round() as u64)
                    .text_value(format!("{:+.1}", v))
                    .style(style)
            })
            .collect();
        chart = chart.data(
            BarGroup::default()
                .label(Line::from(row.to_string()))
                .bars(&bars),
        );
    }

    frame.render_widget(chart, area);
}

fn render_bubbles(frame: &mut Frame, area: Rect, title: &str, data: &DemoData, accent: Color) {
    let canvas = Canvas::default()
        .block(titled_block(title, accent))
        .marker(Marker::Braille)
        .x_bounds([0.0, 1.0])
        .y_bounds([0.0, 1.0])
        .paint(|ctx| {
            for (i, b) in data.bubbles.iter().enumerate() {
                ctx.draw(&Circle {
                    x: b.x,
                    y: b.y,
                    radius: b.size.sqrt() / 600.0,
                    color: SERIES_COLORS[i % SERIES_COLORS.len()],
                });
            }
        });

    frame.render_widget(canvas, area);
}
