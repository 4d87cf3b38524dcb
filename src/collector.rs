use crate::error::Result;
use crate::github::{login_of, GitHubApi, GHOST_LOGIN, PullRequestActivity, PullRequestCandidate, RepoSlug};
use crate::report::{
    classify_review_status, days_open, CommentEntry, PreviewDetector, PullRequestRecord,
    RecencyWindow, RecentActivity, Report, ReviewEntry, ReviewSignal,
};
use chrono::{DateTime, Utc};
use tracing::{info, warn};

/// Where candidate pull requests come from, decided once per run
#[derive(Debug, Clone)]
pub enum PrScope {
    /// List a single repository's open PRs; works for private repos the search index hides
    Repository(RepoSlug),
    /// Search every repository the token can see
    Search,
}

impl PrScope {
    pub fn from_repo(repo: Option<RepoSlug>) -> Self {
        match repo {
            Some(repo) => Self::Repository(repo),
            None => Self::Search,
        }
    }
}

/// Collects a user's open pull requests into a [`Report`]
pub struct Collector<'a, A: GitHubApi> {
    api: &'a A,
    detector: PreviewDetector,
}

impl<'a, A: GitHubApi> Collector<'a, A> {
    pub fn new(api: &'a A) -> Result<Self> {
        Ok(Self {
            api,
            detector: PreviewDetector::new()?,
        })
    }

    /// The explicit user, or whoever owns the token
    pub async fn resolve_user(&self, user: Option<&str>) -> Result<String> {
        match user {
            Some(user) => Ok(user.to_string()),
            None => self.api.authenticated_user().await,
        }
    }

    /// Open PRs authored by `user`, in source order
    pub async fn candidates(&self, user: &str, scope: &PrScope) -> Result<Vec<PullRequestCandidate>> {
        match scope {
            PrScope::Repository(repo) => {
                let prs = self.api.list_open_pull_requests(repo).await?;
                Ok(prs
                    .into_iter()
                    .filter(|pr| pr.author.eq_ignore_ascii_case(user))
                    .collect())
            }
            PrScope::Search => self.api.search_open_pull_requests(user).await,
        }
    }

    /// Fetch activity for each candidate in turn and assemble the report.
    /// `on_progress` is invoked after each PR with the record just built.
    pub async fn collect<F>(
        &self,
        user: String,
        candidates: Vec<PullRequestCandidate>,
        now: DateTime<Utc>,
        mut on_progress: F,
    ) -> Report
    where
        F: FnMut(&PullRequestRecord),
    {
        let window = RecencyWindow::last_24h(now);
        let mut records = Vec::with_capacity(candidates.len());

        for pr in candidates {
            let activity = match self.api.pull_request_activity(&pr).await {
                Ok(activity) => Some(activity),
                Err(e) => {
                    warn!(pr = %pr.short_ref(), error = %e, "failed to fetch activity, treating as empty");
                    None
                }
            };

            let record = self.build_record(pr, activity, &window, now);
            on_progress(&record);
            records.push(record);
        }

        info!(user = %user, count = records.len(), "collected pull requests");
        Report::new(user, now, records)
    }

    /// Derive a report entry from a PR and its activity; `None` means the lookup failed
    pub fn build_record(
        &self,
        pr: PullRequestCandidate,
        activity: Option<PullRequestActivity>,
        window: &RecencyWindow,
        now: DateTime<Utc>,
    ) -> PullRequestRecord {
        let activity_found = activity.is_some();
        let activity = activity.unwrap_or_default();

        let signals: Vec<ReviewSignal<'_>> = activity
            .reviews
            .iter()
            .map(|review| ReviewSignal {
                reviewer: review
                    .user
                    .as_ref()
                    .map_or(GHOST_LOGIN, |user| user.login.as_str()),
                state: review.state.clone(),
                is_bot: review.is_bot(),
            })
            .collect();
        let review_status = classify_review_status(pr.draft, &signals);

        let otf_url = if activity_found {
            let blobs = std::iter::once(pr.body.as_deref()).chain(
                activity
                    .issue_comments
                    .iter()
                    .chain(&activity.review_comments)
                    .map(|c| c.body.as_deref()),
            );
            self.detector.detect(blobs)
        } else {
            None
        };

        let recent_comments = |comments: &[crate::github::Comment]| -> Vec<CommentEntry> {
            comments
                .iter()
                .filter(|c| window.contains(&c.created_at))
                .map(|c| CommentEntry {
                    author: login_of(&c.user),
                    body: c.body.clone().unwrap_or_default(),
                    created_at: c.created_at,
                    url: c.html_url.clone(),
                })
                .collect()
        };
        let issue_comments = recent_comments(&activity.issue_comments);
        let review_comments = recent_comments(&activity.review_comments);

        let mut status_changed = false;
        let reviews: Vec<ReviewEntry> = activity
            .reviews
            .iter()
            .filter_map(|review| {
                let submitted_at = review.submitted_at?;
                if !window.contains(&submitted_at) {
                    return None;
                }
                let state = review.state.clone();
                if state.is_verdict() && !review.is_bot() {
                    status_changed = true;
                }
                Some(ReviewEntry {
                    author: login_of(&review.user),
                    state,
                    submitted_at,
                    url: review.html_url.clone(),
                })
            })
            .collect();

        PullRequestRecord {
            number: pr.number,
            repository: pr.repo.to_string(),
            days_open: days_open(pr.created_at, now),
            title: pr.title,
            url: pr.url,
            state: pr.state,
            draft: pr.draft,
            review_status,
            status_changed_in_last_24h: status_changed,
            otf_url,
            created_at: pr.created_at,
            updated_at: pr.updated_at,
            recent_activity: RecentActivity::new(issue_comments, review_comments, reviews),
        }
    }
}
