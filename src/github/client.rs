use crate::error::{PrDailyError, Result};
use crate::github::{
    Comment, PullRequest, PullRequestActivity, PullRequestCandidate, RepoSlug, Review,
    SearchResponse, User,
};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

const API_VERSION: &str = "2022-11-28";
const PER_PAGE: &str = "100";

/// The GitHub operations the collector depends on
#[allow(async_fn_in_trait)]
pub trait GitHubApi {
    /// Login of the token owner
    async fn authenticated_user(&self) -> Result<String>;

    /// Open PRs authored by `author` across all accessible repositories
    async fn search_open_pull_requests(&self, author: &str) -> Result<Vec<PullRequestCandidate>>;

    /// All open PRs of one repository
    async fn list_open_pull_requests(&self, repo: &RepoSlug) -> Result<Vec<PullRequestCandidate>>;

    /// Comments, review comments and reviews of one PR
    async fn pull_request_activity(&self, pr: &PullRequestCandidate) -> Result<PullRequestActivity>;
}

/// GitHub REST API client
pub struct GitHubClient {
    client: Client,
    base_url: String,
}

impl GitHubClient {
    /// Create a new client authenticated with a personal access token
    pub fn new(token: &str, base_url: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| PrDailyError::config("GitHub token contains invalid characters"))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert("x-github-api-version", HeaderValue::from_static(API_VERSION));

        let client = Client::builder()
            .user_agent(concat!("pr-daily/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "GET");

        let response = self.client.get(&url).query(query).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&text)
                .map(|body| body.message)
                .unwrap_or(text);
            return Err(PrDailyError::GitHubApi { status, message });
        }

        Ok(response.json().await?)
    }

    pub async fn issue_comments(&self, pr: &PullRequestCandidate) -> Result<Vec<Comment>> {
        let path = format!("/repos/{}/issues/{}/comments", pr.repo, pr.number);
        self.get_json(&path, &[("per_page", PER_PAGE)]).await
    }

    pub async fn review_comments(&self, pr: &PullRequestCandidate) -> Result<Vec<Comment>> {
        let path = format!("/repos/{}/pulls/{}/comments", pr.repo, pr.number);
        self.get_json(&path, &[("per_page", PER_PAGE)]).await
    }

    pub async fn reviews(&self, pr: &PullRequestCandidate) -> Result<Vec<Review>> {
        let path = format!("/repos/{}/pulls/{}/reviews", pr.repo, pr.number);
        self.get_json(&path, &[("per_page", PER_PAGE)]).await
    }
}

impl GitHubApi for GitHubClient {
    async fn authenticated_user(&self) -> Result<String> {
        let user: User = self.get_json("/user", &[]).await?;
        Ok(user.login)
    }

    async fn search_open_pull_requests(&self, author: &str) -> Result<Vec<PullRequestCandidate>> {
        let query = format!("is:pr is:open author:{}", author);
        let results: SearchResponse = self
            .get_json(
                "/search/issues",
                &[
                    ("q", query.as_str()),
                    ("sort", "updated"),
                    ("order", "desc"),
                    ("per_page", PER_PAGE),
                ],
            )
            .await?;

        debug!(total = results.total_count, returned = results.items.len(), "search results");

        Ok(results
            .items
            .into_iter()
            .filter(|item| item.pull_request.is_some())
            .filter_map(|item| {
                let url = item.html_url.clone();
                let candidate = PullRequestCandidate::from_search_item(item);
                if candidate.is_none() {
                    warn!(%url, "skipping pull request with unrecognized repository");
                }
                candidate
            })
            .collect())
    }

    async fn list_open_pull_requests(&self, repo: &RepoSlug) -> Result<Vec<PullRequestCandidate>> {
        let path = format!("/repos/{}/pulls", repo);
        let pulls: Vec<PullRequest> = self
            .get_json(&path, &[("state", "open"), ("per_page", PER_PAGE)])
            .await?;

        Ok(pulls
            .into_iter()
            .filter_map(|pr| {
                let url = pr.html_url.clone();
                let candidate = PullRequestCandidate::from_pull_request(pr);
                if candidate.is_none() {
                    warn!(%url, "skipping pull request with unrecognized repository");
                }
                candidate
            })
            .collect())
    }

    async fn pull_request_activity(&self, pr: &PullRequestCandidate) -> Result<PullRequestActivity> {
        Ok(PullRequestActivity {
            issue_comments: self.issue_comments(pr).await?,
            review_comments: self.review_comments(pr).await?,
            reviews: self.reviews(pr).await?,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}
