use crate::types::{IssueState, Query};

/// Request parameters for the issues endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IssueParams {
    pub state: IssueState,
    pub per_page: u32,
    pub page: u32,
}

impl IssueParams {
    /// `state=all` is sent as-is; the API treats it as its own value, not as "no filter".
    pub fn to_query_pairs(&self) -> [(&'static str, String); 3] {
        [
            ("state", self.state.as_api_str().to_string()),
            ("per_page", self.per_page.to_string()),
            ("page", self.page.to_string()),
        ]
    }
}

pub fn build_params(query: &Query) -> IssueParams {
    IssueParams {
        state: query.filter_option().api_value,
        per_page: query.page_size(),
        page: query.page,
    }
}
