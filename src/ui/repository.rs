use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use ratatui::Frame;

use super::popup;
use crate::app::App;
use crate::types::{IssueSummary, Query, FILTER_OPTIONS};

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Which pagination buttons accept input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationControls {
    pub page: u32,
    pub previous_enabled: bool,
    /// The total page count is unknown locally, so this is always true.
    pub next_enabled: bool,
}

pub fn pagination_controls(query: &Query) -> PaginationControls {
    PaginationControls {
        page: query.page,
        previous_enabled: query.page > 1,
        next_enabled: true,
    }
}

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    render_owner(frame, app, chunks[0]);
    render_filter(frame, app, chunks[1]);
    if app.state.is_issues_refreshing() {
        render_spinner(frame, app, chunks[2]);
    } else {
        render_issues(frame, app, chunks[2]);
    }
    render_pagination(frame, app, chunks[3]);

    if let Some(selected) = app.filter_popup {
        let names: Vec<&str> = FILTER_OPTIONS.iter().map(|o| o.display_name).collect();
        popup::render_select(
            frame,
            "Filter issues",
            &names,
            selected,
            Some(app.state.query.filter),
        );
    }
}

fn render_owner(frame: &mut Frame, app: &App, area: Rect) {
    let Some(repo) = &app.state.repository else {
        return;
    };

    let lines = vec![
        Line::from(Span::styled(
            "← Back to repositories (q)",
            Style::default().fg(Color::Blue),
        )),
        Line::from(Span::styled(
            format!("@{}", repo.owner.login),
            Style::default().fg(Color::Magenta),
        )),
        Line::from(Span::styled(
            repo.name.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            repo.description.clone().unwrap_or_default(),
            Style::default().fg(Color::Gray),
        )),
    ];

    let header = Paragraph::new(lines).block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, area);
}

fn render_filter(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::raw(" ")];
    for (i, option) in FILTER_OPTIONS.iter().enumerate() {
        let label = format!(" {} {} ", i + 1, option.display_name);
        // The active option is highlighted and cannot be picked again
        let style = if i == app.state.query.filter {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(label, style));
        spans.push(Span::raw(" "));
    }

    let filter = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Filter [f]"),
    );
    frame.render_widget(filter, area);
}

fn render_spinner(frame: &mut Frame, app: &App, area: Rect) {
    let frame_symbol = SPINNER[app.spinner_frame % SPINNER.len()];
    let block = Block::default().borders(Borders::ALL).title("Issues");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let spinner = Paragraph::new(Span::styled(
        format!("{} Loading issues", frame_symbol),
        Style::default().fg(Color::Yellow),
    ))
    .alignment(Alignment::Center);
    frame.render_widget(spinner, popup::centered_rect(inner.width, 1, inner));
}

fn render_issues(frame: &mut Frame, app: &App, area: Rect) {
    let title = format!(
        "Issues - {} (page {})",
        app.state.query.filter_option().display_name,
        app.state.query.page
    );

    if app.state.issues.is_empty() {
        let empty = Paragraph::new("No issues on this page")
            .block(Block::default().borders(Borders::ALL).title(title))
            .style(Style::default().fg(Color::Gray));
        frame.render_widget(empty, area);
        return;
    }

    let width = area.width.saturating_sub(4) as usize;
    let items: Vec<ListItem> = app
        .state
        .issues
        .iter()
        .enumerate()
        .map(|(i, issue)| issue_item(issue, i == app.issue_index, width))
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().bg(Color::DarkGray));

    let mut state = ListState::default();
    state.select(Some(app.issue_index));

    frame.render_stateful_widget(list, area, &mut state);
}

fn issue_item(issue: &IssueSummary, selected: bool, width: usize) -> ListItem<'static> {
    let title_style = if selected {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };

    let mut title_line = vec![Span::styled(truncate(&issue.title, width), title_style)];
    for label in &issue.labels {
        title_line.push(Span::raw(" "));
        title_line.push(Span::styled(
            format!("[{}]", label.name),
            Style::default().fg(Color::Black).bg(Color::Gray),
        ));
    }

    ListItem::new(vec![
        Line::from(title_line),
        Line::from(Span::styled(
            format!("  {}", issue.author.login),
            Style::default().fg(Color::DarkGray),
        )),
    ])
}

fn render_pagination(frame: &mut Frame, app: &App, area: Rect) {
    let controls = pagination_controls(&app.state.query);
    let button = |text: &'static str, enabled: bool| {
        if enabled {
            Span::styled(text, Style::default().fg(Color::Cyan))
        } else {
            Span::styled(
                text,
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::DIM),
            )
        }
    };

    let line = Line::from(vec![
        button("◀ Previous [p]", controls.previous_enabled),
        Span::raw(format!("   Page {}   ", controls.page)),
        button("Next [n] ▶", controls.next_enabled),
    ]);

    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}
