mod popup;
mod repository;

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::app::App;

pub fn render(frame: &mut Frame, app: &App) {
    if let Some(error) = &app.fatal {
        render_fatal(frame, app, error);
        return;
    }

    // Nothing but the loading banner until the first load lands
    if app.state.is_initial_loading {
        render_loading(frame);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    repository::render(frame, app, chunks[1]);
    render_status_bar(frame, app, chunks[2]);
}

fn render_loading(frame: &mut Frame) {
    let area = popup::centered_rect(20, 1, frame.area());
    let loading = Paragraph::new(Span::styled(
        "Loading...",
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center);
    frame.render_widget(loading, area);
}

fn render_fatal(frame: &mut Frame, app: &App, error: &str) {
    let lines = vec![
        Line::from(Span::styled(
            format!("Could not load {}", app.repo_id),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(error.to_string()),
        Line::from(""),
        Line::from(Span::styled("q: quit", Style::default().fg(Color::Gray))),
    ];

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Error "))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, frame.area());
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let title = format!("repo-issues - {} ({})", app.repo_id, app.source_name());

    let header = Paragraph::new(Line::from(vec![Span::styled(
        title,
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )]))
    .style(Style::default().bg(Color::DarkGray));

    frame.render_widget(header, area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let status = if let Some(error) = &app.error {
        Line::from(vec![Span::styled(
            format!("Error: {}", error),
            Style::default().fg(Color::Red),
        )])
    } else if app.state.is_issues_refreshing() {
        Line::from(vec![Span::styled(
            "Loading...",
            Style::default().fg(Color::Yellow),
        )])
    } else {
        let help = if app.filter_popup.is_some() {
            "j/k: nav | Enter: select | Esc: close"
        } else {
            "f/1-3: filter | p/n: page | j/k: nav | Enter: open | q: back"
        };
        Line::from(vec![Span::styled(help, Style::default().fg(Color::Gray))])
    };

    let status_bar = Paragraph::new(status).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status_bar, area);
}
