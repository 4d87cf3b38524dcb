pub mod format;
pub mod webhook;

use crate::error::{PrDailyError, Result};
use chrono::NaiveDateTime;
use format::{chunk_lines, SlackFormatter, CHUNK_LIMIT};
use serde::Serialize;

pub use webhook::WebhookClient;

const REPORT_TITLE: &str = "📊 Daily PR Report";

/// Incoming-webhook payload: fallback text plus Block Kit blocks
#[derive(Debug, Clone, Serialize)]
pub struct SlackMessage {
    pub text: String,
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Header { text: TextObject },
    Context { elements: Vec<TextObject> },
    Divider,
    Section { text: TextObject },
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TextObject {
    PlainText { text: String, emoji: bool },
    Mrkdwn { text: String },
}

impl SlackMessage {
    /// Header, generation time and a divider, then one section per chunk
    pub fn daily_report(chunks: Vec<String>, generated_at: NaiveDateTime) -> Self {
        let date = generated_at.format("%Y-%m-%d");
        let time = generated_at.format("%H:%M:%S");

        let mut blocks = vec![
            Block::Header {
                text: TextObject::PlainText {
                    text: REPORT_TITLE.to_string(),
                    emoji: true,
                },
            },
            Block::Context {
                elements: vec![TextObject::Mrkdwn {
                    text: format!("Generated on {} at {}", date, time),
                }],
            },
            Block::Divider,
        ];
        blocks.extend(chunks.into_iter().map(|chunk| Block::Section {
            text: TextObject::Mrkdwn { text: chunk },
        }));

        Self {
            text: format!("{} - {}", REPORT_TITLE, date),
            blocks,
        }
    }

    /// Convert a Markdown report into a ready-to-post message
    pub fn from_markdown(markdown: &str, generated_at: NaiveDateTime) -> Result<Self> {
        let formatted = SlackFormatter::new()?.format(markdown);
        if formatted.is_empty() {
            return Err(PrDailyError::config("the daily report is empty, nothing to send"));
        }
        let chunks = chunk_lines(&formatted, CHUNK_LIMIT);
        Ok(Self::daily_report(chunks, generated_at))
    }

    pub fn section_count(&self) -> usize {
        self.blocks
            .iter()
            .filter(|b| matches!(b, Block::Section { .. }))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 15)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    #[test]
    fn test_payload_shape() {
        let message = SlackMessage::daily_report(vec!["one\n".to_string(), "two\n".to_string()], at());
        let value = serde_json::to_value(&message).unwrap();

        assert_eq!(value["text"], "📊 Daily PR Report - 2024-06-15");

        let blocks = value["blocks"].as_array().unwrap();
        assert_eq!(blocks.len(), 5);
        assert_eq!(blocks[0]["type"], "header");
        assert_eq!(blocks[0]["text"]["type"], "plain_text");
        assert_eq!(blocks[0]["text"]["emoji"], true);
        assert_eq!(blocks[1]["type"], "context");
        assert_eq!(blocks[1]["elements"][0]["type"], "mrkdwn");
        assert_eq!(blocks[1]["elements"][0]["text"], "Generated on 2024-06-15 at 09:30:00");
        assert_eq!(blocks[2], serde_json::json!({"type": "divider"}));
        assert_eq!(blocks[3]["type"], "section");
        assert_eq!(blocks[3]["text"]["text"], "one\n");
        assert_eq!(blocks[4]["text"]["text"], "two\n");
    }

    #[test]
    fn test_from_markdown_splits_long_reports() {
        let markdown: String = (0..200)
            .map(|i| format!("- **PR {}** needs review: [link](https://github.com/acme/widgets/pull/{})", i, i))
            .collect::<Vec<_>>()
            .join("\n");

        let message = SlackMessage::from_markdown(&markdown, at()).unwrap();
        assert!(message.section_count() > 1);

        for block in &message.blocks {
            if let Block::Section {
                text: TextObject::Mrkdwn { text },
            } = block
            {
                assert!(text.chars().count() <= CHUNK_LIMIT);
                assert!(!text.contains("**"));
            }
        }
    }

    #[test]
    fn test_from_markdown_rejects_empty_report() {
        assert!(SlackMessage::from_markdown("  \n\n", at()).is_err());
    }
}
