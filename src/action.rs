use crate::types::{IssueSummary, RepositorySummary};

#[derive(Debug, Clone)]
pub enum Action {
    Back,
    Tick,
    ScrollUp,
    ScrollDown,
    OpenIssue,

    // Lifecycle
    Mount,
    InitialLoaded {
        repository: Box<RepositorySummary>,
        issues: Vec<IssueSummary>,
        seq: u64,
    },
    InitialFailed(String),

    // Filter
    ShowFilterSelect,
    SelectFilter(usize),

    // Pagination
    NextPage,
    PreviousPage,

    IssuesLoaded(Vec<IssueSummary>, u64),
    IssuesFailed(String, u64),

    // Popup navigation
    PopupUp,
    PopupDown,
    PopupSelect,

    None,
}
