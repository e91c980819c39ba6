mod chart;
mod loading;
mod question;
mod result;

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Gauge},
};

use crate::app::{App, Screen};

pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    frame.render_widget(Block::default().bg(Color::Reset), area);

    let chunks = Layout::vertical([Constraint::Length(3), Constraint::Fill(1)]).split(area);
    render_progress(frame, chunks[0], app);

    let Some(step) = app.current_step() else {
        return;
    };
    match app.screen() {
        Screen::Question => question::render(frame, chunks[1], app, step),
        Screen::Loading => loading::render(frame, chunks[1], app, step),
        Screen::Result => result::render(frame, chunks[1], app, step),
    }
}

fn render_progress(frame: &mut Frame, area: Rect, app: &App) {
    let percent = app.controller().view().progress();
    let widget = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Color::DarkGray)
                .title(format!(" {} ", app.controller().funnel().title))
                .title_style(Style::default().fg(Color::Cyan).bold()),
        )
        .gauge_style(Style::default().fg(Color::Cyan).bg(Color::Black))
        .percent(u16::from(percent));
    frame.render_widget(widget, area);
}

/// Parse a `#RRGGBB` colour, falling back to cyan.
fn hex_color(hex: &str) -> Color {
    hex.parse().unwrap_or(Color::Cyan)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use ratatui::{backend::TestBackend, Terminal};

    use super::*;
    use crate::config::FunnelConfig;
    use crate::data::nuora_funnel;
    use crate::flow::ManualClock;

    fn draw(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect::<String>()
    }

    #[test]
    fn test_renders_first_step() {
        let app = App::with_clock(
            nuora_funnel(),
            FunnelConfig::default(),
            Arc::new(ManualClock::new()),
        );
        let screen = draw(&app);
        assert!(screen.contains("What brings you to Nuora today?"));
        assert!(screen.contains("I'm just exploring"));
    }

    #[test]
    fn test_renders_loading_and_results() {
        let clock = ManualClock::new();
        let mut app = App::with_clock(
            nuora_funnel(),
            FunnelConfig::default(),
            Arc::new(clock.clone()),
        );
        app.activate();
        clock.advance_ms(300);
        app.tick();
        app.activate();
        app.select_previous_row();
        app.activate();
        assert_eq!(app.controller().current_step().as_str(), "step3a");

        let mut guard = 0;
        while app.screen() == Screen::Question {
            let multi = app.rows().len() > 1
                && app.rows().last() == Some(&crate::app::Row::Continue);
            app.activate();
            if multi {
                app.select_previous_row();
                app.activate();
            }
            clock.advance_ms(300);
            app.tick();
            guard += 1;
            assert!(guard < 50);
        }
        clock.advance_ms(1200);
        app.tick();
        assert!(draw(&app).contains("Matching responses to research..."));

        clock.advance_ms(5000);
        while app.tick() > 0 {}
        assert_eq!(app.screen(), Screen::Result);
        assert!(draw(&app).contains("Your freshness plan is ready"));
    }

    #[test]
    fn test_hex_color() {
        assert_eq!(hex_color("#FAC515"), Color::Rgb(0xFA, 0xC5, 0x15));
        assert_eq!(hex_color("not a colour"), Color::Cyan);
    }
}
