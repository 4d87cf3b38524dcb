use crate::error::Result;
use regex::Regex;

/// Deploy-bot announcement of an on-the-fly frontend environment
const OTF_ANNOUNCEMENT: &str = r"(?s)bot: Deploy on-the-fly env.*?playplay/frontend#(\d+)";

/// Finds the on-the-fly preview environment announced for a PR
pub struct PreviewDetector {
    pattern: Regex,
}

impl PreviewDetector {
    pub fn new() -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(OTF_ANNOUNCEMENT)?,
        })
    }

    /// Scan blobs in order and build the URL from the first announcement found
    pub fn detect<'a, I>(&self, blobs: I) -> Option<String>
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        blobs
            .into_iter()
            .flatten()
            .find_map(|text| self.pattern.captures(text))
            .and_then(|caps| caps.get(1))
            .map(|id| preview_url(id.as_str()))
    }
}

fn preview_url(id: &str) -> String {
    format!("https://fe-{}-app.playplay.dev/", id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_announcement() {
        let detector = PreviewDetector::new().unwrap();
        let body = "🤖 bot: Deploy on-the-fly env for playplay/frontend#42 is ready";
        assert_eq!(
            detector.detect([Some(body)]),
            Some("https://fe-42-app.playplay.dev/".to_string())
        );
    }

    #[test]
    fn test_announcement_spanning_lines() {
        let detector = PreviewDetector::new().unwrap();
        let body = "bot: Deploy on-the-fly env\n\nSource: playplay/frontend#1337";
        assert_eq!(
            detector.detect([Some(body)]),
            Some("https://fe-1337-app.playplay.dev/".to_string())
        );
    }

    #[test]
    fn test_no_match_is_none() {
        let detector = PreviewDetector::new().unwrap();
        let blobs = [Some("LGTM"), Some("playplay/frontend#42 without the bot"), Some("")];
        assert_eq!(detector.detect(blobs), None);
    }

    #[test]
    fn test_first_blob_takes_precedence() {
        let detector = PreviewDetector::new().unwrap();
        let description = "bot: Deploy on-the-fly env playplay/frontend#1";
        let comment = "bot: Deploy on-the-fly env playplay/frontend#2";
        assert_eq!(
            detector.detect([Some(description), Some(comment)]),
            Some("https://fe-1-app.playplay.dev/".to_string())
        );
    }

    #[test]
    fn test_tolerates_missing_blobs() {
        let detector = PreviewDetector::new().unwrap();
        let comment = "bot: Deploy on-the-fly env playplay/frontend#9";
        assert_eq!(
            detector.detect([None, Some(""), Some(comment)]),
            Some("https://fe-9-app.playplay.dev/".to_string())
        );
        assert_eq!(detector.detect(Vec::<Option<&str>>::new()), None);
    }
}
