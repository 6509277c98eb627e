use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::query::build_params;
use crate::source::IssueSource;
use crate::types::{
    Author, IssueSummary, Label, Owner, Query, RepositoryIdentifier, RepositorySummary,
};

const USER_AGENT: &str = concat!("repo-issues/", env!("CARGO_PKG_VERSION"));

pub struct GitHub {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl std::fmt::Debug for GitHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHub")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl GitHub {
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/');
        if !(base_url.starts_with("https://") || base_url.starts_with("http://")) {
            return Err(Error::Config(format!(
                "API base URL must be http(s): '{}'",
                base_url
            )));
        }

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::Config(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
            token,
        })
    }

    fn repo_url(&self, id: &RepositoryIdentifier) -> String {
        format!(
            "{}/repos/{}/{}",
            self.base_url,
            urlencoding::encode(id.owner()),
            urlencoding::encode(id.name())
        )
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        debug!(url, ?query, "GET");

        let mut request = self
            .client
            .get(url)
            .query(query)
            .header("Accept", "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(not_found(status, url));
        }

        response
            .json()
            .await
            .map_err(|e| Error::Decode(e.to_string()))
    }
}

fn not_found(status: StatusCode, url: &str) -> Error {
    Error::NotFound {
        status: status.as_u16(),
        url: url.to_string(),
    }
}

// GitHub API response types

#[derive(Deserialize)]
struct GhRepo {
    name: String,
    description: Option<String>,
    owner: GhUser,
}

#[derive(Deserialize)]
struct GhUser {
    login: String,
    avatar_url: String,
}

#[derive(Deserialize)]
struct GhIssue {
    id: u64,
    title: String,
    html_url: String,
    user: GhUser,
    #[serde(default)]
    labels: Vec<GhLabel>,
}

#[derive(Deserialize)]
struct GhLabel {
    id: u64,
    name: String,
}

impl From<GhRepo> for RepositorySummary {
    fn from(repo: GhRepo) -> Self {
        RepositorySummary {
            name: repo.name,
            description: repo.description.filter(|d| !d.is_empty()),
            owner: Owner {
                login: repo.owner.login,
                avatar_url: repo.owner.avatar_url,
            },
        }
    }
}

impl From<GhIssue> for IssueSummary {
    fn from(issue: GhIssue) -> Self {
        IssueSummary {
            id: issue.id,
            title: issue.title,
            url: issue.html_url,
            labels: issue
                .labels
                .into_iter()
                .map(|l| Label {
                    id: l.id,
                    name: l.name,
                })
                .collect(),
            author: Author {
                login: issue.user.login,
                avatar_url: issue.user.avatar_url,
            },
        }
    }
}

#[async_trait]
impl IssueSource for GitHub {
    fn name(&self) -> &str {
        "GitHub"
    }

    async fn load_repository(&self, id: &RepositoryIdentifier) -> Result<RepositorySummary> {
        let url = self.repo_url(id);
        let repo: GhRepo = self.get_json(&url, &[]).await?;
        Ok(repo.into())
    }

    async fn load_issues(
        &self,
        id: &RepositoryIdentifier,
        query: &Query,
    ) -> Result<Vec<IssueSummary>> {
        let url = format!("{}/issues", self.repo_url(id));
        let params = build_params(query).to_query_pairs();
        let issues: Vec<GhIssue> = self.get_json(&url, &params).await?;
        Ok(issues.into_iter().map(IssueSummary::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn react() -> RepositoryIdentifier {
        RepositoryIdentifier::new("facebook/react").unwrap()
    }

    fn issue_json(id: u64, title: &str) -> serde_json::Value {
        json!({
            "id": id,
            "number": id,
            "title": title,
            "html_url": format!("https://github.com/facebook/react/issues/{}", id),
            "user": { "login": "octocat", "avatar_url": "https://avatars.example/octocat" },
            "labels": [{ "id": 7, "name": "bug", "color": "d73a4a" }],
            "state": "open"
        })
    }

    #[tokio::test]
    async fn load_repository_maps_fields() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/facebook/react"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 10270250,
                "name": "react",
                "description": "The library for web and native user interfaces.",
                "owner": { "login": "facebook", "avatar_url": "https://avatars.example/fb" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let github = GitHub::new(&server.uri(), None).unwrap();
        let repo = github.load_repository(&react()).await.unwrap();

        assert_eq!(repo.name, "react");
        assert_eq!(
            repo.description.as_deref(),
            Some("The library for web and native user interfaces.")
        );
        assert_eq!(repo.owner.login, "facebook");
        assert_eq!(repo.owner.avatar_url, "https://avatars.example/fb");
    }

    #[tokio::test]
    async fn load_issues_sends_filter_and_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/facebook/react/issues"))
            .and(query_param("state", "all"))
            .and(query_param("per_page", "5"))
            .and(query_param("page", "1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([issue_json(1, "First"), issue_json(2, "Second")])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let github = GitHub::new(&server.uri(), None).unwrap();
        let issues = github
            .load_issues(&react(), &Query::default())
            .await
            .unwrap();

        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].title, "First");
        assert_eq!(issues[0].url, "https://github.com/facebook/react/issues/1");
        assert_eq!(issues[0].author.login, "octocat");
        assert_eq!(
            issues[0].labels,
            vec![Label {
                id: 7,
                name: "bug".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn load_issues_closed_third_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/facebook/react/issues"))
            .and(query_param("state", "closed"))
            .and(query_param("page", "3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let github = GitHub::new(&server.uri(), None).unwrap();
        let issues = github
            .load_issues(&react(), &Query { filter: 2, page: 3 })
            .await
            .unwrap();

        assert!(issues.is_empty());
    }

    #[tokio::test]
    async fn token_is_sent_as_bearer() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/facebook/react/issues"))
            .and(header("authorization", "Bearer secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let github = GitHub::new(&server.uri(), Some("secret".to_string())).unwrap();
        github
            .load_issues(&react(), &Query::default())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn missing_repository_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/facebook/react"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "message": "Not Found"
            })))
            .mount(&server)
            .await;

        let github = GitHub::new(&server.uri(), None).unwrap();
        let err = github.load_repository(&react()).await.unwrap_err();

        assert!(matches!(err, Error::NotFound { status: 404, .. }));
    }

    #[tokio::test]
    async fn malformed_issue_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/facebook/react/issues"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": 1 }])))
            .mount(&server)
            .await;

        let github = GitHub::new(&server.uri(), None).unwrap();
        let err = github
            .load_issues(&react(), &Query::default())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Decode(_)));
    }

    #[tokio::test]
    async fn unreachable_server_is_network_error() {
        let github = GitHub::new("http://127.0.0.1:1", None).unwrap();
        let err = github.load_repository(&react()).await.unwrap_err();

        assert!(matches!(err, Error::Network(_)));
    }

    #[test]
    fn rejects_non_http_base_url() {
        assert!(matches!(
            GitHub::new("api.github.com", None),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let github = GitHub::new("https://api.github.com/", None).unwrap();
        assert_eq!(
            github.repo_url(&react()),
            "https://api.github.com/repos/facebook/react"
        );
    }
}
