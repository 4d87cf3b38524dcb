use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Overall review state of a pull request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    Draft,
    Pending,
    Approved,
    ChangesRequested,
}

impl ReviewStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::ChangesRequested => "changes requested",
        }
    }
}

/// State of a single submitted review, as GitHub reports it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewState {
    Approved,
    ChangesRequested,
    Commented,
    Dismissed,
    Pending,
    #[serde(other)]
    Unknown,
}

impl ReviewState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approved => "APPROVED",
            Self::ChangesRequested => "CHANGES_REQUESTED",
            Self::Commented => "COMMENTED",
            Self::Dismissed => "DISMISSED",
            Self::Pending => "PENDING",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Approvals and change requests; everything else leaves a reviewer's verdict alone
    pub fn is_verdict(&self) -> bool {
        matches!(self, Self::Approved | Self::ChangesRequested)
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::Approved => "✅",
            Self::ChangesRequested => "🔄",
            _ => "💭",
        }
    }
}

/// One review event as the classifier sees it
#[derive(Debug, Clone)]
pub struct ReviewSignal<'a> {
    pub reviewer: &'a str,
    pub state: ReviewState,
    pub is_bot: bool,
}

/// Classify a PR from its draft flag and its full review history in submission order
pub fn classify_review_status(draft: bool, reviews: &[ReviewSignal<'_>]) -> ReviewStatus {
    if draft {
        return ReviewStatus::Draft;
    }
    if reviews.is_empty() {
        return ReviewStatus::Pending;
    }

    // Later verdicts from the same reviewer replace earlier ones
    let mut latest: HashMap<&str, &ReviewState> = HashMap::new();
    for review in reviews {
        if review.is_bot || !review.state.is_verdict() {
            continue;
        }
        latest.insert(review.reviewer, &review.state);
    }

    if latest.values().any(|s| **s == ReviewState::ChangesRequested) {
        ReviewStatus::ChangesRequested
    } else if !latest.is_empty() && latest.values().all(|s| **s == ReviewState::Approved) {
        ReviewStatus::Approved
    } else {
        ReviewStatus::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn human<'a>(reviewer: &'a str, state: ReviewState) -> ReviewSignal<'a> {
        ReviewSignal {
            reviewer,
            state,
            is_bot: false,
        }
    }

    fn bot<'a>(reviewer: &'a str, state: ReviewState) -> ReviewSignal<'a> {
        ReviewSignal {
            reviewer,
            state,
            is_bot: true,
        }
    }

    #[test]
    fn test_draft_short_circuits() {
        let reviews = vec![human("alice", ReviewState::Approved)];
        assert_eq!(classify_review_status(true, &reviews), ReviewStatus::Draft);
        assert_eq!(classify_review_status(true, &[]), ReviewStatus::Draft);
    }

    #[test]
    fn test_no_reviews_is_pending() {
        assert_eq!(classify_review_status(false, &[]), ReviewStatus::Pending);
    }

    #[test]
    fn test_latest_review_wins() {
        let reviews = vec![
            human("alice", ReviewState::ChangesRequested),
            human("alice", ReviewState::Approved),
        ];
        assert_eq!(classify_review_status(false, &reviews), ReviewStatus::Approved);

        let reviews = vec![
            human("alice", ReviewState::Approved),
            human("alice", ReviewState::ChangesRequested),
        ];
        assert_eq!(
            classify_review_status(false, &reviews),
            ReviewStatus::ChangesRequested
        );
    }

    #[test]
    fn test_any_change_request_blocks() {
        let reviews = vec![
            human("alice", ReviewState::Approved),
            human("bob", ReviewState::ChangesRequested),
        ];
        assert_eq!(
            classify_review_status(false, &reviews),
            ReviewStatus::ChangesRequested
        );
    }

    #[test]
    fn test_comment_does_not_reset_verdict() {
        let reviews = vec![
            human("alice", ReviewState::Approved),
            human("alice", ReviewState::Commented),
        ];
        assert_eq!(classify_review_status(false, &reviews), ReviewStatus::Approved);

        let reviews = vec![
            human("alice", ReviewState::ChangesRequested),
            human("alice", ReviewState::Dismissed),
        ];
        assert_eq!(
            classify_review_status(false, &reviews),
            ReviewStatus::ChangesRequested
        );
    }

    #[test]
    fn test_comment_only_reviews_are_pending() {
        let reviews = vec![
            human("alice", ReviewState::Commented),
            human("bob", ReviewState::Commented),
        ];
        assert_eq!(classify_review_status(false, &reviews), ReviewStatus::Pending);
    }

    #[test]
    fn test_bot_reviews_are_ignored() {
        let reviews = vec![bot("linter[bot]", ReviewState::ChangesRequested)];
        assert_eq!(classify_review_status(false, &reviews), ReviewStatus::Pending);

        let reviews = vec![
            human("alice", ReviewState::Approved),
            bot("linter[bot]", ReviewState::ChangesRequested),
        ];
        assert_eq!(classify_review_status(false, &reviews), ReviewStatus::Approved);
    }

    #[test]
    fn test_review_state_serde() {
        assert_eq!(
            serde_json::from_str::<ReviewState>("\"APPROVED\"").unwrap(),
            ReviewState::Approved
        );
        assert_eq!(
            serde_json::to_string(&ReviewState::Dismissed).unwrap(),
            format!("\"{}\"", ReviewState::Dismissed.as_str())
        );
        assert_eq!(
            serde_json::to_string(&ReviewState::ChangesRequested).unwrap(),
            "\"CHANGES_REQUESTED\""
        );
        assert_eq!(
            serde_json::from_str::<ReviewState>("\"SOMETHING_NEW\"").unwrap(),
            ReviewState::Unknown
        );
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(
            serde_json::to_string(&ReviewStatus::ChangesRequested).unwrap(),
            "\"changes_requested\""
        );
        assert_eq!(serde_json::to_string(&ReviewStatus::Draft).unwrap(), "\"draft\"");
    }
}
