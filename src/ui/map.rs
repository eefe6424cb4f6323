use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::canvas::{Canvas, Points},
};

use crate::config::MapConfig;
use crate::map::{Location, view_bounds};

use super::widgets::titled_block;

pub fn render_map_view(
    frame: &mut Frame,
    area: Rect,
    points: &[Location],
    config: &MapConfig,
    accent: Color,
) {
    let coords: Vec<(f64, f64)> = points.iter().map(|p| (p.longitude, p.latitude)).collect();
    let (x_bounds, y_bounds) = view_bounds(config);
    let title = format!("Anime Fans around Makassar ({} points)", points.len());

    let canvas = Canvas::default()
        .block(titled_block(&title, accent))
        .marker(Marker::Braille)
        .x_bounds(x_bounds)
        .y_bounds(y_bounds)
        .paint(|ctx| {
            ctx.draw(&Points {
                coords: &coords,
                color: Color::Rgb(0, 100, 255),
            });
            ctx.print(
                config.center_lon,
                config.center_lat,
                Line::from(Span::styled("✚", Style::default().fg(accent))),
            );
            ctx.print(
                x_bounds[0],
                y_bounds[0],
                Line::from(Span::styled(
                    format!("{:.4}, {:.4}", config.center_lat, config.center_lon),
                    Style::default().fg(Color::DarkGray),
                )),
            );
        });

    frame.render_widget(canvas, area);
}
