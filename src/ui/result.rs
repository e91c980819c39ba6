use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};

use crate::app::App;
use crate::flow::Answer;
use crate::models::{path_color, StepDef, StepKind};

use super::hex_color;

pub fn render(frame: &mut Frame, area: Rect, app: &App, step: &StepDef) {
    let StepKind::Results { path } = step.kind else {
        return;
    };
    let controller = app.controller();
    let chart = step
        .chart
        .as_ref()
        .and_then(|spec| controller.view().chart(&spec.canvas));

    let chunks = Layout::vertical([
        Constraint::Length(6),
        Constraint::Min(12),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .margin(1)
    .split(area);

    render_summary(frame, chunks[0], step, hex_color(path_color(path)));
    if let Some(chart) = chart {
        super::chart::render(frame, chunks[1], chart);
    }
    render_answers(frame, chunks[2], app);
    render_controls(frame, chunks[3]);
}

fn render_summary(frame: &mut Frame, area: Rect, step: &StepDef, color: Color) {
    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            step.title.as_str(),
            Style::default().fg(color).bold(),
        )),
        Line::from(""),
        Line::from(step.body.as_deref().unwrap_or("").fg(Color::Gray)),
    ];

    let widget = Paragraph::new(content)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Color::DarkGray),
        );
    frame.render_widget(widget, area);
}

/// What the user picked, in the order the steps were visited.
fn render_answers(frame: &mut Frame, area: Rect, app: &App) {
    let controller = app.controller();
    let funnel = controller.funnel();

    let lines: Vec<Line> = controller
        .step_history()
        .iter()
        .filter_map(|id| {
            let step = funnel.step(id)?;
            let answer = controller.answer(id)?;
            let labels = match answer {
                Answer::Single(value) => label_for(step, value).to_string(),
                Answer::Multi(values) => values
                    .iter()
                    .map(|v| label_for(step, v))
                    .collect::<Vec<_>>()
                    .join(", "),
            };
            Some(Line::from(vec![
                Span::styled(" + ", Style::default().fg(Color::Green)),
                Span::styled(format!("{}  ", step.title), Style::default().fg(Color::DarkGray)),
                Span::styled(labels, Style::default().fg(Color::Gray)),
            ]))
        })
        .collect();

    let widget = Paragraph::new(lines)
        .block(Block::default().padding(Padding::horizontal(1)))
        .scroll((controller.view().scroll(), 0));
    frame.render_widget(widget, area);
}

fn label_for<'a>(step: &'a StepDef, value: &'a str) -> &'a str {
    step.options
        .iter()
        .find(|o| o.value == value)
        .map_or(value, |o| o.label.as_str())
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let widget = Paragraph::new("j/k scroll  ·  r restart  ·  q quit")
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
