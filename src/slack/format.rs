use crate::error::Result;
use regex::Regex;
use tracing::warn;

/// Slack rejects section text above 3000 characters; stay below with some headroom
pub const CHUNK_LIMIT: usize = 2800;

/// Rewrites Markdown into Slack `mrkdwn`
pub struct SlackFormatter {
    fence: Regex,
    h1: Regex,
    h2: Regex,
    h3: Regex,
    bold: Regex,
    link: Regex,
    blank_runs: Regex,
}

impl SlackFormatter {
    pub fn new() -> Result<Self> {
        Ok(Self {
            fence: Regex::new(r"(?s)\A```\w*\n(.*?)\n```\z")?,
            h1: Regex::new(r"(?m)^# (.*?)$")?,
            h2: Regex::new(r"(?m)^## (.*?)$")?,
            h3: Regex::new(r"(?m)^### (.*?)$")?,
            bold: Regex::new(r"\*\*(.*?)\*\*")?,
            link: Regex::new(r"\[(.*?)\]\((.*?)\)")?,
            blank_runs: Regex::new(r"\n{3,}")?,
        })
    }

    pub fn format(&self, markdown: &str) -> String {
        let text = markdown.replace("\r\n", "\n");
        let text = text.trim();

        // Models sometimes wrap the whole answer in a code fence
        let text = match self.fence.captures(text) {
            Some(caps) => caps.get(1).map_or("", |m| m.as_str()),
            None => text,
        };

        let text = self.h1.replace_all(text, "*${1}*\n");
        let text = self.h2.replace_all(&text, "\n*${1}*");
        let text = self.h3.replace_all(&text, "_${1}_");
        let text = self.bold.replace_all(&text, "*${1}*");
        let text = self.link.replace_all(&text, "<${2}|${1}>");
        let text = self.blank_runs.replace_all(&text, "\n\n");

        text.trim().to_string()
    }
}

/// Split on line boundaries so that no chunk exceeds `limit` characters.
///
/// Every line keeps its trailing newline, so concatenating the chunks yields the
/// input followed by a single `\n`. A line that alone exceeds the limit gets a chunk
/// of its own.
pub fn chunk_lines(text: &str, limit: usize) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for line in text.split('\n') {
        let line_len = line.chars().count() + 1;
        if line_len > limit {
            warn!(length = line_len, limit, "line exceeds Slack section limit");
        }

        if current_len + line_len > limit && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }

        current.push_str(line);
        current.push('\n');
        current_len += line_len;
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}
