use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};

use crate::app::{App, Row};
use crate::models::{StepDef, StepKind};

pub fn render(frame: &mut Frame, area: Rect, app: &App, step: &StepDef) {
    let view = app.controller().view();
    let chart = step.chart.as_ref().and_then(|spec| view.chart(&spec.canvas));

    let mut constraints = vec![Constraint::Length(2), Constraint::Length(3)];
    if chart.is_some() {
        constraints.push(Constraint::Min(12));
    }
    constraints.push(Constraint::Fill(1));
    constraints.push(Constraint::Length(1));
    let chunks = Layout::vertical(constraints).margin(1).split(area);

    render_title(frame, chunks[0], &step.title);
    render_body(frame, chunks[1], step.body.as_deref().unwrap_or(""));

    let mut next = 2;
    if let Some(chart) = chart {
        super::chart::render(frame, chunks[next], chart);
        next += 1;
    }
    render_rows(frame, chunks[next], app, step);
    render_controls(frame, chunks[next + 1], step.kind);
}

fn render_title(frame: &mut Frame, area: Rect, title: &str) {
    let widget = Paragraph::new(title)
        .wrap(Wrap { trim: true })
        .fg(Color::White)
        .bold();
    frame.render_widget(widget, area);
}

fn render_body(frame: &mut Frame, area: Rect, body: &str) {
    let widget = Paragraph::new(body)
        .wrap(Wrap { trim: true })
        .fg(Color::Gray);
    frame.render_widget(widget, area);
}

fn render_rows(frame: &mut Frame, area: Rect, app: &App, step: &StepDef) {
    let view = app.controller().view();
    let focused = app.focused_row();
    let mut lines: Vec<Line> = Vec::new();

    for row in app.rows() {
        let is_focused = focused == Some(row);
        let marker = if is_focused { ">" } else { " " };

        match row {
            Row::Option(index) => {
                let option = &step.options[index];
                let is_selected = view.is_option_selected(&step.id, &option.value);
                let check = match (step.kind, is_selected) {
                    (StepKind::Multi, true) => "[x]",
                    (StepKind::Multi, false) => "[ ]",
                    (_, true) => "(*)",
                    (_, false) => "( )",
                };
                let style = match (is_focused, is_selected) {
                    (true, _) => Style::default().fg(Color::Cyan).bold(),
                    (false, true) => Style::default().fg(Color::Green),
                    (false, false) => Style::default().fg(Color::Gray),
                };
                lines.push(Line::from(vec![
                    Span::styled(format!(" {} ", marker), style),
                    Span::styled(format!("{} ", check), style),
                    Span::styled(option.label.as_str(), style),
                ]));
                lines.push(Line::from(""));
            }
            Row::Continue => {
                let enabled = view.is_continue_enabled(&step.id);
                let style = match (is_focused, enabled) {
                    (_, false) => Style::default().fg(Color::DarkGray),
                    (true, true) => Style::default().fg(Color::Black).bg(Color::Cyan).bold(),
                    (false, true) => Style::default().fg(Color::Cyan).bold(),
                };
                lines.push(Line::from(vec![
                    Span::styled(format!(" {} ", marker), style),
                    Span::styled(" Continue ", style),
                ]));
            }
        }
    }

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(Color::DarkGray)
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect, kind: StepKind) {
    let hint = match kind {
        StepKind::Multi => "j/k navigate  ·  space toggle  ·  enter continue  ·  q quit",
        StepKind::Info => "enter continue  ·  q quit",
        _ => "j/k navigate  ·  enter select  ·  q quit",
    };
    let widget = Paragraph::new(hint)
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
