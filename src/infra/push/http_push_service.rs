use crate::domain::ports::PushService;
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::error;

/// Best-effort push channel. Delivery errors surface as AppError::Delivery
/// and callers are expected to log and move on.
pub struct HttpPushService {
    client: Client,
    api_url: String,
    api_key: String,
}

impl HttpPushService {
    pub fn new(api_url: String, api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .unwrap_or_else(|_| Client::new()),
            api_url,
            api_key,
        }
    }
}

#[derive(Serialize)]
struct PushNotification {
    title: String,
    body: String,
}

#[derive(Serialize)]
struct PushData {
    event_id: String,
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Serialize)]
struct PushPayload {
    token: String,
    notification: PushNotification,
    data: PushData,
}

#[async_trait]
impl PushService for HttpPushService {
    async fn send(&self, device_token: &str, title: &str, body: &str, event_id: &str, kind: &str) -> Result<(), AppError> {
        let payload = PushPayload {
            token: device_token.to_string(),
            notification: PushNotification {
                title: title.to_string(),
                body: body.to_string(),
            },
            data: PushData {
                event_id: event_id.to_string(),
                kind: kind.to_string(),
            },
        };

        let res = self.client.post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                let msg = format!("Push service connection error: {}", e);
                error!("{}", msg);
                AppError::Delivery(msg)
            })?;

        if !res.status().is_success() {
            let status = res.status();
            let msg = format!("Push service failed. Status: {}", status);
            error!("{}", msg);
            return Err(AppError::Delivery(msg));
        }

        Ok(())
    }
}
