//! FCM-style HTTP push client.
//!
//! One POST per device token:
//! `{"message": {"token", "notification": {"title", "body"}, "data": {..}}}`

use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Config;
use crate::notification::gateway::{PushGateway, SendOutcome};
use crate::notification::payload::PushMessage;

/// Provider error codes meaning the token is dead for good.
const PERMANENT_CODES: &[&str] = &["UNREGISTERED", "INVALID_ARGUMENT", "NOT_FOUND"];

#[derive(Clone)]
pub struct FcmGateway {
    client: reqwest::Client,
    endpoint: String,
    access_token: String,
}

impl FcmGateway {
    pub fn new(endpoint: String, access_token: String, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent("leave-desk-push/0.1")
            .build()
            .context("failed to build push HTTP client")?;

        Ok(Self {
            client,
            endpoint,
            access_token,
        })
    }

    /// `None` unless both the endpoint and the access token are configured.
    pub fn from_config(config: &Config) -> anyhow::Result<Option<Self>> {
        config
            .fcm_credentials()
            .map(|(endpoint, token)| {
                Self::new(
                    endpoint.to_string(),
                    token.to_string(),
                    Duration::from_secs(config.fcm_timeout_secs),
                )
            })
            .transpose()
    }

    async fn send_one(&self, token: &str, message: &PushMessage) -> SendOutcome {
        let request = FcmRequest {
            message: FcmMessage {
                token,
                notification: FcmNotification {
                    title: &message.title,
                    body: &message.body,
                },
                data: &message.data,
            },
        };

        let resp = match self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.access_token)
            .json(&request)
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                return SendOutcome::Failed {
                    permanent: false,
                    reason: e.to_string(),
                };
            }
        };

        let status = resp.status();
        if status.is_success() {
            return SendOutcome::Delivered;
        }

        let body = resp.text().await.unwrap_or_default();
        debug!(status = status.as_u16(), body = %body, "Push provider rejected message");
        classify_failure(status.as_u16(), &body)
    }
}

#[async_trait]
impl PushGateway for FcmGateway {
    async fn send_each(
        &self,
        tokens: &[String],
        message: &PushMessage,
    ) -> anyhow::Result<Vec<SendOutcome>> {
        let sends = tokens.iter().map(|t| self.send_one(t, message));
        Ok(futures::future::join_all(sends).await)
    }
}

fn classify_failure(status: u16, body: &str) -> SendOutcome {
    let parsed = serde_json::from_str::<FcmErrorBody>(body).ok();
    let permanent = parsed.as_ref().is_some_and(|b| b.error.is_permanent());
    let reason = parsed
        .and_then(|b| b.error.message)
        .unwrap_or_else(|| format!("HTTP {status}"));

    SendOutcome::Failed { permanent, reason }
}

#[derive(Serialize)]
struct FcmRequest<'a> {
    message: FcmMessage<'a>,
}

#[derive(Serialize)]
struct FcmMessage<'a> {
    token: &'a str,
    notification: FcmNotification<'a>,
    data: &'a BTreeMap<String, String>,
}

#[derive(Serialize)]
struct FcmNotification<'a> {
    title: &'a str,
    body: &'a str,
}

#[derive(Deserialize)]
struct FcmErrorBody {
    error: FcmError,
}

#[derive(Deserialize)]
struct FcmError {
    message: Option<String>,
    status: Option<String>,
    #[serde(default)]
    details: Vec<FcmErrorDetail>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FcmErrorDetail {
    error_code: Option<String>,
}

impl FcmError {
    fn is_permanent(&self) -> bool {
        self.details
            .iter()
            .filter_map(|d| d.error_code.as_deref())
            .chain(self.status.as_deref())
            .any(|code| PERMANENT_CODES.contains(&code))
    }
}
