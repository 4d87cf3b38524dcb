pub mod client;

use crate::error::PrDailyError;
use crate::report::ReviewState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use client::{GitHubApi, GitHubClient};

/// Repository identifier in `owner/name` form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RepoSlug {
    /// Repository owner/organization
    pub owner: String,
    /// Repository name
    pub name: String,
}

impl RepoSlug {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Parse the trailing `owner/name` of an API repository URL,
    /// e.g. `https://api.github.com/repos/owner/name`
    pub fn from_api_url(url: &str) -> Option<Self> {
        let mut segments = url.trim_end_matches('/').rsplit('/');
        let name = segments.next()?;
        let owner = segments.next()?;
        if owner.is_empty() || name.is_empty() {
            return None;
        }
        Some(Self::new(owner, name))
    }
}

impl fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl FromStr for RepoSlug {
    type Err = PrDailyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().split_once('/') {
            Some((owner, name))
                if !owner.is_empty() && !name.is_empty() && !name.contains('/') =>
            {
                Ok(Self::new(owner, name))
            }
            _ => Err(PrDailyError::config(format!(
                "invalid repository '{}', expected owner/name",
                s
            ))),
        }
    }
}

impl TryFrom<String> for RepoSlug {
    type Error = PrDailyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RepoSlug> for String {
    fn from(slug: RepoSlug) -> Self {
        slug.to_string()
    }
}

/// GitHub account as embedded in API payloads
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub login: String,
    /// `User`, `Bot` or `Organization`
    #[serde(rename = "type", default)]
    pub account_type: String,
}

impl User {
    pub fn is_bot(&self) -> bool {
        self.account_type == "Bot" || self.login.ends_with("[bot]")
    }
}

/// Login GitHub shows for deleted accounts
pub const GHOST_LOGIN: &str = "ghost";

/// Login of a possibly-deleted account
pub fn login_of(user: &Option<User>) -> String {
    user.as_ref()
        .map(|u| u.login.clone())
        .unwrap_or_else(|| GHOST_LOGIN.to_string())
}

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    pub total_count: u64,
    pub items: Vec<SearchItem>,
}

/// Issue search hit; pull requests carry a `pull_request` object
#[derive(Debug, Deserialize)]
pub struct SearchItem {
    pub number: u64,
    pub title: String,
    pub html_url: String,
    pub repository_url: String,
    pub state: String,
    #[serde(default)]
    pub draft: Option<bool>,
    pub body: Option<String>,
    pub user: Option<User>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub pull_request: Option<serde_json::Value>,
}

/// Entry of `GET /repos/{owner}/{repo}/pulls`
#[derive(Debug, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    pub html_url: String,
    pub state: String,
    #[serde(default)]
    pub draft: bool,
    pub body: Option<String>,
    pub user: Option<User>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub base: PullRequestBase,
}

#[derive(Debug, Deserialize)]
pub struct PullRequestBase {
    pub repo: BaseRepository,
}

#[derive(Debug, Deserialize)]
pub struct BaseRepository {
    pub full_name: String,
}

/// Issue comment or review comment
#[derive(Debug, Clone, Deserialize)]
pub struct Comment {
    pub user: Option<User>,
    #[serde(default)]
    pub body: Option<String>,
    pub created_at: DateTime<Utc>,
    pub html_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Review {
    pub user: Option<User>,
    pub state: ReviewState,
    /// Absent while the review is still pending
    pub submitted_at: Option<DateTime<Utc>>,
    pub html_url: String,
}

impl Review {
    pub fn is_bot(&self) -> bool {
        self.user.as_ref().map(User::is_bot).unwrap_or(false)
    }
}

/// Open pull request as seen by the collector, whichever endpoint it came from
#[derive(Debug, Clone)]
pub struct PullRequestCandidate {
    pub repo: RepoSlug,
    pub number: u64,
    pub title: String,
    pub url: String,
    pub state: String,
    pub draft: bool,
    pub body: Option<String>,
    pub author: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PullRequestCandidate {
    pub fn short_ref(&self) -> String {
        format!("{}#{}", self.repo, self.number)
    }

    pub fn from_search_item(item: SearchItem) -> Option<Self> {
        let repo = RepoSlug::from_api_url(&item.repository_url)?;
        Some(Self {
            repo,
            number: item.number,
            author: login_of(&item.user),
            title: item.title,
            url: item.html_url,
            state: item.state,
            draft: item.draft.unwrap_or(false),
            body: item.body,
            created_at: item.created_at,
            updated_at: item.updated_at,
        })
    }

    pub fn from_pull_request(pr: PullRequest) -> Option<Self> {
        let repo = pr.base.repo.full_name.parse().ok()?;
        Some(Self {
            repo,
            number: pr.number,
            author: login_of(&pr.user),
            title: pr.title,
            url: pr.html_url,
            state: pr.state,
            draft: pr.draft,
            body: pr.body,
            created_at: pr.created_at,
            updated_at: pr.updated_at,
        })
    }
}

/// Unfiltered comments and reviews of one pull request
#[derive(Debug, Clone, Default)]
pub struct PullRequestActivity {
    pub issue_comments: Vec<Comment>,
    pub review_comments: Vec<Comment>,
    pub reviews: Vec<Review>,
}
