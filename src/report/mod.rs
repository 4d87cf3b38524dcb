pub mod preview;
pub mod recency;
pub mod review;

use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub use preview::PreviewDetector;
pub use recency::{days_open, RecencyWindow};
pub use review::{classify_review_status, ReviewSignal, ReviewState, ReviewStatus};

/// Snapshot of a user's open pull requests, handed from `collect` to `generate`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    pub user: String,
    #[serde(rename = "totalPRs")]
    pub total_prs: usize,
    pub pull_requests: Vec<PullRequestRecord>,
}

impl Report {
    pub fn new(user: String, generated_at: DateTime<Utc>, pull_requests: Vec<PullRequestRecord>) -> Self {
        Self {
            generated_at,
            user,
            total_prs: pull_requests.len(),
            pull_requests,
        }
    }

    /// Write the report as pretty JSON, replacing any previous file
    pub fn write_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// One open pull request with its derived review state and last-24h activity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequestRecord {
    pub number: u64,
    pub title: String,
    /// `owner/name`
    pub repository: String,
    pub url: String,
    pub state: String,
    pub draft: bool,
    pub review_status: ReviewStatus,
    #[serde(rename = "statusChangedInLast24h")]
    pub status_changed_in_last_24h: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub otf_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub days_open: u64,
    pub recent_activity: RecentActivity,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentActivity {
    issue_comments: Vec<CommentEntry>,
    review_comments: Vec<CommentEntry>,
    reviews: Vec<ReviewEntry>,
    total_count: usize,
}

impl RecentActivity {
    pub fn new(
        issue_comments: Vec<CommentEntry>,
        review_comments: Vec<CommentEntry>,
        reviews: Vec<ReviewEntry>,
    ) -> Self {
        let total_count = issue_comments.len() + review_comments.len() + reviews.len();
        Self {
            issue_comments,
            review_comments,
            reviews,
            total_count,
        }
    }

    pub fn issue_comments(&self) -> &[CommentEntry] {
        &self.issue_comments
    }

    pub fn review_comments(&self) -> &[CommentEntry] {
        &self.review_comments
    }

    pub fn reviews(&self) -> &[ReviewEntry] {
        &self.reviews
    }

    pub fn total_count(&self) -> usize {
        self.total_count
    }

    pub fn is_empty(&self) -> bool {
        self.total_count == 0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentEntry {
    pub author: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub url: String,
}

impl CommentEntry {
    /// First `max` characters of the body on a single line, with an ellipsis when cut
    pub fn excerpt(&self, max: usize) -> String {
        let flat = self.body.replace(['\r', '\n'], " ");
        let mut chars = flat.chars();
        let head: String = chars.by_ref().take(max).collect();
        if chars.next().is_some() {
            format!("{}...", head)
        } else {
            head
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewEntry {
    pub author: String,
    pub state: ReviewState,
    pub submitted_at: DateTime<Utc>,
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn comment(author: &str) -> CommentEntry {
        CommentEntry {
            author: author.to_string(),
            body: "hello".to_string(),
            created_at: Utc::now(),
            url: "https://github.com/acme/widgets/pull/1#issuecomment-1".to_string(),
        }
    }

    fn record(otf_url: Option<String>) -> PullRequestRecord {
        PullRequestRecord {
            number: 1,
            title: "Add widgets".to_string(),
            repository: "acme/widgets".to_string(),
            url: "https://github.com/acme/widgets/pull/1".to_string(),
            state: "open".to_string(),
            draft: false,
            review_status: ReviewStatus::ChangesRequested,
            status_changed_in_last_24h: true,
            otf_url,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            days_open: 3,
            recent_activity: RecentActivity::new(vec![comment("alice")], vec![], vec![]),
        }
    }

    #[test]
    fn test_total_count_is_sum_of_lists() {
        let activity = RecentActivity::new(
            vec![comment("alice"), comment("bob")],
            vec![comment("carol")],
            vec![ReviewEntry {
                author: "dave".to_string(),
                state: ReviewState::Approved,
                submitted_at: Utc::now(),
                url: String::new(),
            }],
        );
        assert_eq!(activity.total_count(), 4);
        assert!(!activity.is_empty());
        assert!(RecentActivity::default().is_empty());
    }

    #[test]
    fn test_comment_excerpt() {
        let mut entry = comment("alice");
        entry.body = "x".repeat(100);
        assert_eq!(entry.excerpt(80), format!("{}...", "x".repeat(80)));

        entry.body = "short\nreply".to_string();
        assert_eq!(entry.excerpt(80), "short reply");

        entry.body = "é".repeat(80);
        assert_eq!(entry.excerpt(80), "é".repeat(80));
    }

    #[test]
    fn test_report_json_field_names() {
        let report = Report::new("octocat".to_string(), Utc::now(), vec![record(None)]);
        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(value["totalPRs"], 1);
        assert_eq!(value["user"], "octocat");
        assert!(value["generatedAt"].is_string());

        let pr = &value["pullRequests"][0];
        assert_eq!(pr["reviewStatus"], "changes_requested");
        assert_eq!(pr["statusChangedInLast24h"], true);
        assert_eq!(pr["daysOpen"], 3);
        assert!(pr.get("otfUrl").is_none());
        assert_eq!(pr["recentActivity"]["totalCount"], 1);
        assert_eq!(pr["recentActivity"]["issueComments"][0]["author"], "alice");
        assert!(pr["recentActivity"]["issueComments"][0]["createdAt"].is_string());
    }

    #[test]
    fn test_otf_url_serialized_when_present() {
        let record = record(Some("https://fe-42-app.playplay.dev/".to_string()));
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["otfUrl"], "https://fe-42-app.playplay.dev/");
    }

    #[test]
    fn test_empty_report_is_written() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out").join("pr-report.json");

        let report = Report::new("octocat".to_string(), Utc::now(), vec![]);
        report.write_to(&path).unwrap();

        let written = Report::from_json(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written.total_prs, 0);
        assert!(written.pull_requests.is_empty());
        assert_eq!(written.user, "octocat");
    }

    #[test]
    fn test_write_overwrites_previous_report() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("pr-report.json");

        Report::new("a".to_string(), Utc::now(), vec![record(None)])
            .write_to(&path)
            .unwrap();
        Report::new("b".to_string(), Utc::now(), vec![])
            .write_to(&path)
            .unwrap();

        let written = Report::from_json(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written.user, "b");
        assert_eq!(written.total_prs, 0);
    }
}
