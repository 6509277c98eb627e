//! Repository page state and its filter/page transitions.
//!
//! Every transition is a plain function on [`ViewState`] that returns the
//! network call the shell should run next, if any. Issue requests are tagged
//! with an increasing sequence number so a slow, older response can never
//! overwrite the result of a newer request.

use tracing::{debug, warn};

use crate::types::{IssueSummary, Query, RepositorySummary, FILTER_OPTIONS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefreshState {
    #[default]
    Idle,
    Refreshing,
}

/// Side effect requested by a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Fetch repository and first issue page together.
    LoadInitial { seq: u64, query: Query },
    LoadIssues { seq: u64, query: Query },
}

#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub repository: Option<RepositorySummary>,
    pub issues: Vec<IssueSummary>,
    pub query: Query,
    pub is_initial_loading: bool,
    pub refresh: RefreshState,
    mounted: bool,
    latest_issued: u64,
    latest_settled: u64,
}

impl ViewState {
    pub fn new() -> Self {
        Self {
            is_initial_loading: true,
            ..Self::default()
        }
    }

    pub fn is_issues_refreshing(&self) -> bool {
        self.refresh == RefreshState::Refreshing
    }

    /// Filter and page controls only respond once the first load has landed.
    pub fn controls_enabled(&self) -> bool {
        !self.is_initial_loading
    }

    fn next_seq(&mut self) -> u64 {
        self.latest_issued += 1;
        self.latest_issued
    }

    /// Start the page. Yields the combined load the first time only.
    pub fn mount(&mut self) -> Option<Effect> {
        if self.mounted {
            return None;
        }
        self.mounted = true;
        let seq = self.next_seq();
        Some(Effect::LoadInitial {
            seq,
            query: self.query,
        })
    }

    pub fn select_filter(&mut self, index: usize) -> Option<Effect> {
        if !self.controls_enabled() || index >= FILTER_OPTIONS.len() || index == self.query.filter
        {
            return None;
        }
        self.query.filter = index;
        self.query.page = 1;
        debug!(filter = %FILTER_OPTIONS[index].api_value, "filter selected");
        Some(self.start_refresh())
    }

    /// Pages below 1 clamp to 1. There is no upper bound; the server may return an empty page.
    pub fn request_page(&mut self, page: u32) -> Option<Effect> {
        let page = page.max(1);
        if !self.controls_enabled() || page == self.query.page {
            return None;
        }
        self.query.page = page;
        debug!(page, "page requested");
        Some(self.start_refresh())
    }

    pub fn next_page(&mut self) -> Option<Effect> {
        self.request_page(self.query.page.saturating_add(1))
    }

    pub fn previous_page(&mut self) -> Option<Effect> {
        self.request_page(self.query.page.saturating_sub(1))
    }

    fn start_refresh(&mut self) -> Effect {
        self.refresh = RefreshState::Refreshing;
        Effect::LoadIssues {
            seq: self.next_seq(),
            query: self.query,
        }
    }

    pub fn apply_initial(
        &mut self,
        seq: u64,
        repository: RepositorySummary,
        issues: Vec<IssueSummary>,
    ) {
        if !self.is_initial_loading {
            warn!(seq, "initial load applied twice, ignoring");
            return;
        }
        self.repository = Some(repository);
        self.issues = issues;
        self.latest_settled = self.latest_settled.max(seq);
        self.is_initial_loading = false;
        self.refresh = RefreshState::Idle;
    }

    /// Returns false when the page was discarded as stale.
    pub fn apply_issues(&mut self, seq: u64, issues: Vec<IssueSummary>) -> bool {
        if seq < self.latest_settled {
            warn!(seq, latest = self.latest_settled, "discarding stale issue page");
            return false;
        }
        self.issues = issues;
        self.settle(seq);
        true
    }

    /// A failed refresh keeps the current rows and only ends the spinner.
    /// Older requests still in flight become stale.
    pub fn fail_issues(&mut self, seq: u64) {
        self.settle(seq);
    }

    fn settle(&mut self, seq: u64) {
        self.latest_settled = self.latest_settled.max(seq);
        if seq == self.latest_issued {
            self.refresh = RefreshState::Idle;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::build_params;
    use crate::types::{Author, IssueState, Owner};

    fn repo() -> RepositorySummary {
        RepositorySummary {
            name: "react".to_string(),
            description: None,
            owner: Owner {
                login: "facebook".to_string(),
                avatar_url: String::new(),
            },
        }
    }

    fn issue(id: u64) -> IssueSummary {
        IssueSummary {
            id,
            title: format!("Issue {}", id),
            url: String::new(),
            labels: vec![],
            author: Author {
                login: "octocat".to_string(),
                avatar_url: String::new(),
            },
        }
    }

    fn loaded() -> ViewState {
        let mut state = ViewState::new();
        let Some(Effect::LoadInitial { seq, .. }) = state.mount() else {
            panic!("expected initial load");
        };
        state.apply_initial(seq, repo(), vec![issue(1)]);
        state
    }

    fn issues_seq(effect: Option<Effect>) -> (u64, Query) {
        match effect {
            Some(Effect::LoadIssues { seq, query }) => (seq, query),
            other => panic!("expected issue load, got {:?}", other),
        }
    }

    #[test]
    fn mount_loads_once() {
        let mut state = ViewState::new();
        assert!(state.is_initial_loading);
        assert_eq!(
            state.mount(),
            Some(Effect::LoadInitial {
                seq: 1,
                query: Query::default()
            })
        );
        assert_eq!(state.mount(), None);
    }

    #[test]
    fn initial_loading_clears_exactly_once() {
        let mut state = loaded();
        assert!(!state.is_initial_loading);
        assert_eq!(state.repository, Some(repo()));

        state.apply_initial(9, repo(), vec![issue(5)]);
        assert!(!state.is_initial_loading);
        assert_eq!(state.issues, vec![issue(1)]);
    }

    #[test]
    fn controls_are_gated_until_loaded() {
        let mut state = ViewState::new();
        state.mount();
        assert_eq!(state.select_filter(2), None);
        assert_eq!(state.next_page(), None);
        assert_eq!(state.query, Query::default());
    }

    #[test]
    fn initial_query_is_all_page_one() {
        let mut state = ViewState::new();
        let Some(Effect::LoadInitial { query, .. }) = state.mount() else {
            panic!("expected initial load");
        };
        let params = build_params(&query);
        assert_eq!(params.state, IssueState::All);
        assert_eq!(params.page, 1);
        assert_eq!(params.per_page, 5);
    }

    #[test]
    fn filter_change_resets_page() {
        for start in [1, 2, 3, 10] {
            let mut state = loaded();
            state.select_filter(1);
            state.apply_issues(state.latest_issued, vec![]);
            state.request_page(start);

            let (_, query) = issues_seq(state.select_filter(2));
            assert_eq!(query.page, 1);
            assert_eq!(build_params(&query).state, IssueState::Closed);
            assert!(state.is_issues_refreshing());
        }
    }

    #[test]
    fn open_page_three_to_closed_requests_page_one() {
        let mut state = loaded();
        state.select_filter(1);
        state.request_page(3);
        assert_eq!(state.query, Query { filter: 1, page: 3 });

        let (_, query) = issues_seq(state.select_filter(2));
        let pairs = build_params(&query).to_query_pairs();
        assert_eq!(pairs[0], ("state", "closed".to_string()));
        assert_eq!(pairs[1], ("per_page", "5".to_string()));
        assert_eq!(pairs[2], ("page", "1".to_string()));
    }

    #[test]
    fn selecting_active_filter_is_noop() {
        let mut state = loaded();
        assert_eq!(state.select_filter(0), None);
        assert!(!state.is_issues_refreshing());

        state.select_filter(1);
        assert_eq!(state.select_filter(1), None);
    }

    #[test]
    fn out_of_range_filter_is_ignored() {
        let mut state = loaded();
        assert_eq!(state.select_filter(3), None);
        assert_eq!(state.query.filter, 0);
    }

    #[test]
    fn next_from_first_page_refreshes_until_applied() {
        let mut state = loaded();
        let (seq, query) = issues_seq(state.next_page());
        assert_eq!(query.page, 2);
        assert!(state.is_issues_refreshing());

        state.apply_issues(seq, vec![issue(6), issue(7)]);
        assert!(!state.is_issues_refreshing());
        assert_eq!(state.issues, vec![issue(6), issue(7)]);
    }

    #[test]
    fn previous_on_first_page_is_noop() {
        let mut state = loaded();
        assert_eq!(state.previous_page(), None);
        assert_eq!(state.request_page(0), None);
        assert_eq!(state.query.page, 1);
    }

    #[test]
    fn stale_response_is_discarded() {
        let mut state = loaded();
        let (first, _) = issues_seq(state.next_page());
        let (second, _) = issues_seq(state.next_page());

        state.apply_issues(second, vec![issue(11)]);
        state.apply_issues(first, vec![issue(6)]);

        assert_eq!(state.issues, vec![issue(11)]);
        assert!(!state.is_issues_refreshing());
    }

    #[test]
    fn older_response_keeps_spinner_for_newer_request() {
        let mut state = loaded();
        let (first, _) = issues_seq(state.next_page());
        let (second, _) = issues_seq(state.next_page());

        state.apply_issues(first, vec![issue(6)]);
        assert_eq!(state.issues, vec![issue(6)]);
        assert!(state.is_issues_refreshing());

        state.apply_issues(second, vec![issue(11)]);
        assert!(!state.is_issues_refreshing());
    }

    #[test]
    fn older_success_after_newest_failure_is_discarded() {
        let mut state = loaded();
        let (open, _) = issues_seq(state.select_filter(1));
        let (closed, _) = issues_seq(state.select_filter(2));

        state.fail_issues(closed);
        assert!(!state.apply_issues(open, vec![issue(99)]));

        assert_eq!(state.query.filter, 2);
        assert_eq!(state.issues, vec![issue(1)]);
        assert!(!state.is_issues_refreshing());
    }

    #[test]
    fn failed_refresh_keeps_rows() {
        let mut state = loaded();
        let (seq, _) = issues_seq(state.select_filter(2));
        state.fail_issues(seq);

        assert!(!state.is_issues_refreshing());
        assert_eq!(state.issues, vec![issue(1)]);
        assert_eq!(state.query.filter, 2);
    }
}
