use std::fmt;

/// Issues shown per page.
pub const PAGE_SIZE: u32 = 5;

/// Decoded `owner/name` pair taken from the navigation route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryIdentifier {
    full_name: String,
    split: usize,
}

impl RepositoryIdentifier {
    /// Returns `None` unless `full_name` is exactly `owner/name` with both parts non-empty.
    pub fn new(full_name: impl Into<String>) -> Option<Self> {
        let full_name = full_name.into();
        let split = full_name.find('/')?;
        let (owner, rest) = full_name.split_at(split);
        let name = &rest[1..];
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return None;
        }
        Some(Self { full_name, split })
    }

    pub fn owner(&self) -> &str {
        &self.full_name[..self.split]
    }

    pub fn name(&self) -> &str {
        &self.full_name[self.split + 1..]
    }

    pub fn as_str(&self) -> &str {
        &self.full_name
    }
}

impl fmt::Display for RepositoryIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Server-side issue state selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueState {
    All,
    Open,
    Closed,
}

impl IssueState {
    pub fn as_api_str(&self) -> &'static str {
        match self {
            IssueState::All => "all",
            IssueState::Open => "open",
            IssueState::Closed => "closed",
        }
    }
}

impl fmt::Display for IssueState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_api_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterOption {
    pub display_name: &'static str,
    pub api_value: IssueState,
}

/// The filter dropdown entries, in display order. The selected filter is an index into this.
pub const FILTER_OPTIONS: [FilterOption; 3] = [
    FilterOption {
        display_name: "All",
        api_value: IssueState::All,
    },
    FilterOption {
        display_name: "Open",
        api_value: IssueState::Open,
    },
    FilterOption {
        display_name: "Closed",
        api_value: IssueState::Closed,
    },
];

/// Current issue selection: filter index plus 1-indexed page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Query {
    pub filter: usize,
    pub page: u32,
}

impl Query {
    pub fn filter_option(&self) -> FilterOption {
        FILTER_OPTIONS[self.filter]
    }

    pub fn page_size(&self) -> u32 {
        PAGE_SIZE
    }
}

impl Default for Query {
    fn default() -> Self {
        Self { filter: 0, page: 1 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Owner {
    pub login: String,
    #[allow(dead_code)]
    pub avatar_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositorySummary {
    pub name: String,
    pub description: Option<String>,
    pub owner: Owner,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    #[allow(dead_code)]
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub login: String,
    #[allow(dead_code)]
    pub avatar_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueSummary {
    #[allow(dead_code)]
    pub id: u64,
    pub title: String,
    pub url: String,
    pub labels: Vec<Label>,
    pub author: Author,
}
