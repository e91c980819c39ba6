use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Gauge, Paragraph},
};

use crate::app::App;
use crate::models::{path_color, StepDef, StepKind};

use super::hex_color;

pub fn render(frame: &mut Frame, area: Rect, app: &App, step: &StepDef) {
    let StepKind::Loading { path } = step.kind else {
        return;
    };
    let loading = app.controller().view().loading(path);
    let percent = loading.map_or(0, |l| l.percent);
    let text = loading.map_or("", |l| l.text.as_str());
    let color = hex_color(path_color(path));

    let chunks = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(2),
        Constraint::Length(3),
        Constraint::Length(2),
        Constraint::Fill(1),
    ])
    .horizontal_margin(8)
    .split(area);

    let title = Paragraph::new(step.title.as_str())
        .alignment(Alignment::Center)
        .fg(Color::White)
        .bold();
    frame.render_widget(title, chunks[1]);

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Color::DarkGray),
        )
        .gauge_style(Style::default().fg(color).bg(Color::Black))
        .percent(u16::from(percent));
    frame.render_widget(gauge, chunks[2]);

    let status = Paragraph::new(text)
        .alignment(Alignment::Center)
        .fg(Color::Gray);
    frame.render_widget(status, chunks[3]);
}
