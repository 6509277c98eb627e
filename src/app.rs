use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::action::Action;
use crate::event::Event;
use crate::source::IssueSource;
use crate::state::{Effect, ViewState};
use crate::types::{IssueSummary, Query, RepositoryIdentifier, FILTER_OPTIONS};

pub struct App {
    pub repo_id: RepositoryIdentifier,
    pub state: ViewState,
    pub issue_index: usize,
    /// Highlighted entry while the filter popup is open.
    pub filter_popup: Option<usize>,
    pub spinner_frame: usize,
    pub error: Option<String>,
    /// Initial load failure. The page shows only this once set.
    pub fatal: Option<String>,
    pub should_quit: bool,
    source: Arc<dyn IssueSource>,
    action_tx: mpsc::UnboundedSender<Action>,
}

impl App {
    pub fn new(
        repo_id: RepositoryIdentifier,
        source: Arc<dyn IssueSource>,
        action_tx: mpsc::UnboundedSender<Action>,
    ) -> Self {
        Self {
            repo_id,
            state: ViewState::new(),
            issue_index: 0,
            filter_popup: None,
            spinner_frame: 0,
            error: None,
            fatal: None,
            should_quit: false,
            source,
            action_tx,
        }
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    pub fn selected_issue(&self) -> Option<&IssueSummary> {
        self.state.issues.get(self.issue_index)
    }

    pub fn handle_event(&self, event: Event) -> Action {
        match event {
            Event::Mount => Action::Mount,
            Event::Tick => Action::Tick,
            Event::Key(key) => self.handle_key(key),
            Event::Render => Action::None,
        }
    }

    fn handle_key(&self, key: KeyEvent) -> Action {
        if self.filter_popup.is_some() {
            return match key.code {
                KeyCode::Char('j') | KeyCode::Down => Action::PopupDown,
                KeyCode::Char('k') | KeyCode::Up => Action::PopupUp,
                KeyCode::Enter => Action::PopupSelect,
                KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('f') => Action::Back,
                _ => Action::None,
            };
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Action::Back,
            KeyCode::Char('j') | KeyCode::Down => Action::ScrollDown,
            KeyCode::Char('k') | KeyCode::Up => Action::ScrollUp,
            KeyCode::Enter => Action::OpenIssue,
            KeyCode::Char('f') => Action::ShowFilterSelect,
            KeyCode::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                if index < FILTER_OPTIONS.len() {
                    Action::SelectFilter(index)
                } else {
                    Action::None
                }
            }
            KeyCode::Char('n') | KeyCode::Right => Action::NextPage,
            KeyCode::Char('p') | KeyCode::Left => Action::PreviousPage,
            _ => Action::None,
        }
    }

    pub fn update(&mut self, action: Action) {
        if self.error.is_some() && is_user_input(&action) {
            self.error = None;
        }

        match action {
            Action::Back => {
                if self.filter_popup.is_some() {
                    self.filter_popup = None;
                } else {
                    self.should_quit = true;
                }
            }
            Action::Tick => {
                self.spinner_frame = self.spinner_frame.wrapping_add(1);
            }
            Action::ScrollUp => {
                if self.issue_index > 0 {
                    self.issue_index -= 1;
                }
            }
            Action::ScrollDown => {
                if !self.state.issues.is_empty() && self.issue_index < self.state.issues.len() - 1
                {
                    self.issue_index += 1;
                }
            }
            Action::OpenIssue => {
                if self.state.is_issues_refreshing() {
                    return;
                }
                if let Some(issue) = self.selected_issue() {
                    if let Err(e) = open::that(&issue.url) {
                        self.error = Some(format!("Failed to open browser: {}", e));
                    }
                }
            }

            // Lifecycle
            Action::Mount => {
                if let Some(effect) = self.state.mount() {
                    self.run(effect);
                }
            }
            Action::InitialLoaded {
                repository,
                issues,
                seq,
            } => {
                self.state.apply_initial(seq, *repository, issues);
                self.issue_index = 0;
            }
            Action::InitialFailed(msg) => {
                self.fatal = Some(msg);
            }

            // Filter
            Action::ShowFilterSelect => {
                if self.state.controls_enabled() {
                    self.filter_popup = Some(self.state.query.filter);
                }
            }
            Action::SelectFilter(index) => {
                self.filter_popup = None;
                if let Some(effect) = self.state.select_filter(index) {
                    self.run(effect);
                }
            }

            // Pagination
            Action::NextPage => {
                if let Some(effect) = self.state.next_page() {
                    self.run(effect);
                }
            }
            Action::PreviousPage => {
                if let Some(effect) = self.state.previous_page() {
                    self.run(effect);
                }
            }

            Action::IssuesLoaded(issues, seq) => {
                if self.state.apply_issues(seq, issues) {
                    self.issue_index = 0;
                }
            }
            Action::IssuesFailed(msg, seq) => {
                self.state.fail_issues(seq);
                self.error = Some(msg);
            }

            // Popup navigation
            Action::PopupUp => {
                if let Some(i) = self.filter_popup.as_mut() {
                    *i = i.saturating_sub(1);
                }
            }
            Action::PopupDown => {
                if let Some(i) = self.filter_popup.as_mut() {
                    if *i + 1 < FILTER_OPTIONS.len() {
                        *i += 1;
                    }
                }
            }
            Action::PopupSelect => {
                // The active filter is disabled in the popup.
                if let Some(i) = self.filter_popup {
                    if i != self.state.query.filter {
                        self.update(Action::SelectFilter(i));
                    }
                }
            }

            Action::None => {}
        }
    }

    fn run(&self, effect: Effect) {
        debug!(?effect, "running effect");
        match effect {
            Effect::LoadInitial { seq, query } => self.spawn_load_initial(seq, query),
            Effect::LoadIssues { seq, query } => self.spawn_load_issues(seq, query),
        }
    }

    fn spawn_load_initial(&self, seq: u64, query: Query) {
        let tx = self.action_tx.clone();
        let source = Arc::clone(&self.source);
        let id = self.repo_id.clone();
        tokio::spawn(async move {
            // Both must settle before anything is shown
            let (repo_result, issues_result) = tokio::join!(
                source.load_repository(&id),
                source.load_issues(&id, &query)
            );

            match (repo_result, issues_result) {
                (Ok(repository), Ok(issues)) => {
                    tx.send(Action::InitialLoaded {
                        repository: Box::new(repository),
                        issues,
                        seq,
                    })
                    .ok();
                }
                (Err(e), _) | (_, Err(e)) => {
                    warn!(repo = %id, error = %e, "initial load failed");
                    tx.send(Action::InitialFailed(e.to_string())).ok();
                }
            }
        });
    }

    fn spawn_load_issues(&self, seq: u64, query: Query) {
        let tx = self.action_tx.clone();
        let source = Arc::clone(&self.source);
        let id = self.repo_id.clone();
        tokio::spawn(async move {
            match source.load_issues(&id, &query).await {
                Ok(issues) => {
                    tx.send(Action::IssuesLoaded(issues, seq)).ok();
                }
                Err(e) => {
                    warn!(repo = %id, seq, error = %e, "issue refresh failed");
                    tx.send(Action::IssuesFailed(e.to_string(), seq)).ok();
                }
            }
        });
    }
}

fn is_user_input(action: &Action) -> bool {
    matches!(
        action,
        Action::ScrollUp
            | Action::ScrollDown
            | Action::OpenIssue
            | Action::ShowFilterSelect
            | Action::SelectFilter(_)
            | Action::NextPage
            | Action::PreviousPage
    )
}
