pub mod gemini;
pub mod prompt;

use crate::error::Result;
use gemini::GeminiClient;
use prompt::PromptInputs;
use std::fs;
use std::path::Path;
use tracing::info;

/// Turns a collected PR report into a narrative daily report
pub struct ReportGenerator {
    client: GeminiClient,
}

impl ReportGenerator {
    pub fn new(client: GeminiClient) -> Self {
        Self { client }
    }

    /// Ask the model for the report and write its text to `output`
    pub async fn generate(&self, inputs: &PromptInputs, output: &Path) -> Result<String> {
        info!(model = %self.client.model(), "generating daily report");
        let text = self.client.generate_content(inputs.build_prompt()).await?;

        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(output, &text)?;

        Ok(text)
    }
}
