//! CPU and RAM load lines on one chart.

use chrono::Local;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols::Marker,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
};
use sysload::assembler::Series;

const COLORS: [Color; 2] = [Color::Cyan, Color::Magenta];

/// Plots each series by index. Windows of unequal length are not
/// re-aligned; the x labels are wall-clock time at render.
pub fn draw_load_chart(f: &mut ratatui::Frame<'_>, area: Rect, series: &[Series], capacity: usize) {
    let points: Vec<Vec<(f64, f64)>> = series
        .iter()
        .map(|s| {
            s.data
                .iter()
                .enumerate()
                .map(|(i, &v)| (i as f64, v.clamp(0.0, 100.0)))
                .collect()
        })
        .collect();

    let datasets: Vec<Dataset<'_>> = series
        .iter()
        .zip(points.iter())
        .zip(COLORS)
        .map(|((s, pts), color)| {
            let now = s.data.last().map(|v| format!(" {v:>5.1}%")).unwrap_or_default();
            Dataset::default()
                .name(format!("{}{now}", s.name))
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(color))
                .data(pts)
        })
        .collect();

    let x_max = capacity.saturating_sub(1).max(1) as f64;
    let now = Local::now().format("%H:%M:%S").to_string();
    let chart = Chart::new(datasets)
        .block(Block::default().borders(Borders::ALL).title("System Load"))
        .x_axis(
            Axis::default()
                .bounds([0.0, x_max])
                .labels(vec![Span::raw("oldest"), Span::raw(now)]),
        )
        .y_axis(
            Axis::default()
                .bounds([0.0, 100.0])
                .labels(vec![Span::raw("0%"), Span::raw("50%"), Span::raw("100%")]),
        );
    f.render_widget(chart, area);
}
