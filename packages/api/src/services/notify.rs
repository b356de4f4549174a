use database::models::SkillRequest;
use serde_json::json;

/// Posts a JSON notification to the admin webhook when a new skill request
/// lands. Delivery is fire-and-forget: failures are logged, never surfaced
/// to the submitting client.
pub struct AdminNotifier {
    client: reqwest::Client,
    webhook_url: Option<String>,
}

impl AdminNotifier {
    pub fn new(webhook_url: Option<String>) -> Self {
        if webhook_url.is_none() {
            tracing::warn!("ADMIN_WEBHOOK_URL not set, skill request notifications disabled");
        }

        Self {
            client: reqwest::Client::new(),
            webhook_url,
        }
    }

    pub fn notify_new_request(&self, request: &SkillRequest) {
        let Some(url) = self.webhook_url.clone() else {
            return;
        };

        let client = self.client.clone();
        let request_id = request.id;
        let payload = json!({
            "type": "INSERT",
            "table": "skill_requests",
            "record": request,
        });

        tokio::spawn(async move {
            match client.post(&url).json(&payload).send().await {
                Ok(resp) if resp.status().is_success() => {
                    tracing::info!("Notified admin webhook of skill request {}", request_id);
                }
                Ok(resp) => {
                    tracing::warn!(
                        "Admin webhook returned {} for skill request {}",
                        resp.status(),
                        request_id
                    );
                }
                Err(e) => {
                    tracing::warn!("Admin webhook call failed for {}: {}", request_id, e);
                }
            }
        });
    }
}
