use crate::error::{PrDailyError, Result};
use crate::slack::SlackMessage;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Posts messages to a Slack incoming webhook
pub struct WebhookClient {
    client: Client,
    url: String,
}

impl WebhookClient {
    pub fn new(url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            url: url.to_string(),
        })
    }

    pub async fn post(&self, message: &SlackMessage) -> Result<()> {
        debug!(blocks = message.blocks.len(), "posting to Slack webhook");

        let response = self.client.post(&self.url).json(message).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(PrDailyError::Webhook { status, body });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn message() -> SlackMessage {
        let at = NaiveDate::from_ymd_opt(2024, 6, 15)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        SlackMessage::daily_report(vec!["hello\n".to_string()], at)
    }

    #[tokio::test]
    async fn test_post_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/services/T000/B000/XXX"))
            .and(body_partial_json(serde_json::json!({
                "text": "📊 Daily PR Report - 2024-06-15"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .expect(1)
            .mount(&server)
            .await;

        let client = WebhookClient::new(&format!("{}/services/T000/B000/XXX", server.uri())).unwrap();
        client.post(&message()).await.unwrap();
    }

    #[tokio::test]
    async fn test_post_failure_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(404).set_body_string("no_service"))
            .mount(&server)
            .await;

        let client = WebhookClient::new(&server.uri()).unwrap();
        match client.post(&message()).await {
            Err(PrDailyError::Webhook { status, body }) => {
                assert_eq!(status, 404);
                assert_eq!(body, "no_service");
            }
            other => panic!("unexpected result: {:?}", other.map(|_| ())),
        }
    }
}
