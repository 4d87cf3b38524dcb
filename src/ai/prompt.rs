use crate::error::{PrDailyError, Result};
use crate::report::Report;
use std::fs;
use std::path::Path;

/// Template and report text ready to be combined into a prompt
#[derive(Debug, Clone)]
pub struct PromptInputs {
    pub template: String,
    pub report_json: String,
}

impl PromptInputs {
    /// Read both inputs, failing before any network call if either is missing or the
    /// report is not valid
    pub fn load(report_path: &Path, template_path: &Path) -> Result<Self> {
        if !report_path.exists() {
            return Err(PrDailyError::missing_input(
                report_path,
                "Run `pr-daily collect` first.",
            ));
        }
        if !template_path.exists() {
            return Err(PrDailyError::missing_input(
                template_path,
                "Create the report instructions template or pass --prompt.",
            ));
        }

        let template = fs::read_to_string(template_path)?;
        let report_json = fs::read_to_string(report_path)?;

        // Parse only to validate; the raw text is what gets sent
        Report::from_json(&report_json)?;

        Ok(Self {
            template,
            report_json,
        })
    }

    /// Instructions, a separator, then the report JSON verbatim
    pub fn build_prompt(&self) -> String {
        format!(
            "{}\n\n---\n\nHere is the JSON data to transform into a report:\n\n{}",
            self.template, self.report_json
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tempfile::TempDir;

    fn write_report(dir: &Path) -> std::path::PathBuf {
        let path = dir.join("pr-report.json");
        Report::new("octocat".to_string(), Utc::now(), vec![])
            .write_to(&path)
            .unwrap();
        path
    }

    #[test]
    fn test_build_prompt() {
        let inputs = PromptInputs {
            template: "# Instructions\nBe brief.".to_string(),
            report_json: "{\"totalPRs\": 0}".to_string(),
        };
        let prompt = inputs.build_prompt();
        assert!(prompt.starts_with("# Instructions\nBe brief.\n\n---\n\n"));
        assert!(prompt.contains("Here is the JSON data to transform into a report:"));
        assert!(prompt.ends_with("{\"totalPRs\": 0}"));
    }

    #[test]
    fn test_same_inputs_same_prompt() {
        let temp_dir = TempDir::new().unwrap();
        let report = write_report(temp_dir.path());
        let template = temp_dir.path().join("prompt.md");
        fs::write(&template, "Summarize my PRs").unwrap();

        let first = PromptInputs::load(&report, &template).unwrap().build_prompt();
        let second = PromptInputs::load(&report, &template).unwrap().build_prompt();
        assert_eq!(first, second);
        assert!(first.contains("\"totalPRs\": 0"));
    }

    #[test]
    fn test_missing_report() {
        let temp_dir = TempDir::new().unwrap();
        let template = temp_dir.path().join("prompt.md");
        fs::write(&template, "Summarize").unwrap();

        let err = PromptInputs::load(&temp_dir.path().join("pr-report.json"), &template).unwrap_err();
        assert!(matches!(err, PrDailyError::MissingInput { .. }));
        assert!(err.to_string().contains("pr-daily collect"));
    }

    #[test]
    fn test_missing_template() {
        let temp_dir = TempDir::new().unwrap();
        let report = write_report(temp_dir.path());

        let err = PromptInputs::load(&report, &temp_dir.path().join("prompt.md")).unwrap_err();
        assert!(matches!(err, PrDailyError::MissingInput { .. }));
    }

    #[test]
    fn test_corrupt_report() {
        let temp_dir = TempDir::new().unwrap();
        let report = temp_dir.path().join("pr-report.json");
        fs::write(&report, "{ not json").unwrap();
        let template = temp_dir.path().join("prompt.md");
        fs::write(&template, "Summarize").unwrap();

        assert!(matches!(
            PromptInputs::load(&report, &template),
            Err(PrDailyError::Json(_))
        ));
    }
}
