use ratatui::{
    prelude::*,
    symbols::Marker,
    widgets::{Axis, Bar, BarChart, BarGroup, Block, Borders, Dataset, GraphType, Paragraph, Wrap},
};

use crate::models::{Chart, ChartKind};

use super::hex_color;

/// Bars carry one decimal place in integer form.
const BAR_SCALE: f64 = 10.0;

pub fn render(frame: &mut Frame, area: Rect, chart: &Chart) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Color::DarkGray)
        .title(chart.title.clone().unwrap_or_default())
        .title_style(Style::default().fg(Color::White).bold());

    match chart.kind {
        ChartKind::Comparison => render_bars(frame, area, chart, block),
        ChartKind::Timeline => render_lines(frame, area, chart, block),
        ChartKind::Journey => {
            if chart.point_notes.is_empty() {
                render_lines(frame, area, chart, block);
                return;
            }
            let chunks = Layout::vertical([
                Constraint::Min(8),
                Constraint::Length(chart.point_notes.len() as u16),
            ])
            .split(area);
            render_lines(frame, chunks[0], chart, block);
            render_notes(frame, chunks[1], chart);
        }
    }
}

fn render_bars(frame: &mut Frame, area: Rect, chart: &Chart, block: Block) {
    let Some(series) = chart.series.first() else {
        return;
    };
    let suffix = chart.value_suffix.as_deref().unwrap_or("");
    let bars: Vec<Bar> = series
        .values
        .iter()
        .enumerate()
        .map(|(i, value)| {
            let label = chart.labels.get(i).cloned().unwrap_or_default();
            Bar::default()
                .value((value * BAR_SCALE).round() as u64)
                .text_value(format!("{}{}", value, suffix))
                .label(Line::from(label))
                .style(Style::default().fg(hex_color(series.color_at(i))))
                .value_style(Style::default().fg(Color::Black).bold())
        })
        .collect();

    let widget = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .bar_width(12)
        .bar_gap(4)
        .max((chart.y_max * BAR_SCALE).round() as u64);
    frame.render_widget(widget, area);
}

fn render_lines(frame: &mut Frame, area: Rect, chart: &Chart, block: Block) {
    let points: Vec<Vec<(f64, f64)>> = chart
        .series
        .iter()
        .map(|s| {
            s.values
                .iter()
                .enumerate()
                .map(|(x, y)| (x as f64, *y))
                .collect()
        })
        .collect();

    let datasets = chart
        .series
        .iter()
        .zip(&points)
        .map(|(series, data)| {
            Dataset::default()
                .name(series.name.clone())
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(hex_color(series.color_at(0))))
                .data(data)
        })
        .collect::<Vec<_>>();

    let x_max = chart.labels.len().saturating_sub(1).max(1) as f64;
    let y_max = chart.y_max;
    let widget = ratatui::widgets::Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .style(Style::default().fg(Color::DarkGray))
                .bounds([0.0, x_max])
                .labels(chart.labels.clone()),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::DarkGray))
                .bounds([0.0, y_max])
                .labels(vec!["0".to_string(), format!("{}", y_max)]),
        );
    frame.render_widget(widget, area);
}

fn render_notes(frame: &mut Frame, area: Rect, chart: &Chart) {
    let lines: Vec<Line> = chart
        .labels
        .iter()
        .zip(&chart.point_notes)
        .map(|(label, note)| {
            Line::from(vec![
                Span::styled(format!(" {}: ", label), Style::default().fg(Color::Cyan)),
                Span::styled(note.as_str(), Style::default().fg(Color::Gray)),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), area);
}

#[cfg(test)]
mod tests {
    use ratatui::{backend::TestBackend, Terminal};

    use super::*;
    use crate::models::{ChartSpec, PATH_A_COLOR, PATH_B_COLOR};

    fn draw(chart: &Chart) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.area();
                render(frame, area, chart)
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_comparison_shows_multiplier() {
        let chart = ChartSpec::comparison("chartPathA1", PATH_A_COLOR).build();
        assert!(draw(&chart).contains("4.5x"));
    }

    #[test]
    fn test_journey_lists_milestones() {
        let chart = ChartSpec::journey(
            "chartResultsB",
            PATH_B_COLOR,
            "Your journey",
            &["Week 1", "Week 2"],
            &["Relief begins", "Comfort returns"],
        )
        .build();
        let screen = draw(&chart);
        assert!(screen.contains("Relief begins"));
        assert!(screen.contains("Comfort returns"));
    }
}
