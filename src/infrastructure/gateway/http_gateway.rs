use crate::application::ports::remote_gateway::{PushOutcome, RemoteGateway};
use crate::domain::value_objects::{RecordPayload, RecordType};
use crate::shared::error::{AppError, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

/// reqwest-backed push client. One POST per record against the endpoint
/// mapped from the record type; the per-request timeout keeps a single
/// unreachable entry from stalling a whole sync pass.
pub struct HttpRemoteGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRemoteGateway {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to build push client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, record_type: RecordType) -> String {
        format!("{}{}", self.base_url, record_type.endpoint_path())
    }
}

fn remote_id_from_body(body: &Value) -> Option<String> {
    match body.get("id") {
        Some(Value::String(id)) => Some(id.clone()),
        Some(Value::Number(id)) => Some(id.to_string()),
        _ => None,
    }
}

#[async_trait]
impl RemoteGateway for HttpRemoteGateway {
    async fn push(
        &self,
        record_type: RecordType,
        payload: &RecordPayload,
    ) -> Result<PushOutcome> {
        let response = self
            .client
            .post(self.endpoint(record_type))
            .json(payload.as_json())
            .send()
            .await
            .map_err(|e| AppError::Network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            // The assigned remote id is informational; sync only needs
            // success/failure.
            let remote_id = response
                .json::<Value>()
                .await
                .ok()
                .as_ref()
                .and_then(remote_id_from_body);
            Ok(PushOutcome::Accepted { remote_id })
        } else {
            let detail = response.text().await.ok().filter(|body| !body.is_empty());
            Ok(PushOutcome::Rejected {
                status: status.as_u16(),
                detail,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload() -> RecordPayload {
        RecordPayload::new(json!({"productName": "Tomatoes", "price": 22.5})).unwrap()
    }

    #[tokio::test]
    async fn accepted_push_extracts_remote_id() {
        let mut server = mockito::Server::new_async().await;
        let push = server
            .mock("POST", "/api/marketplace")
            .match_header("content-type", "application/json")
            .with_status(201)
            .with_body(r#"{"id": 42, "message": "Listing created"}"#)
            .create_async()
            .await;

        let gateway =
            HttpRemoteGateway::new(&server.url(), Duration::from_secs(10)).unwrap();
        let outcome = gateway
            .push(RecordType::Marketplace, &payload())
            .await
            .unwrap();

        assert_eq!(
            outcome,
            PushOutcome::Accepted {
                remote_id: Some("42".to_string())
            }
        );
        push.assert_async().await;
    }

    #[tokio::test]
    async fn non_success_status_is_a_rejection_not_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/identifications")
            .with_status(500)
            .with_body("internal error")
            .create_async()
            .await;

        let gateway =
            HttpRemoteGateway::new(&server.url(), Duration::from_secs(10)).unwrap();
        let outcome = gateway
            .push(RecordType::Identification, &payload())
            .await
            .unwrap();

        assert_eq!(
            outcome,
            PushOutcome::Rejected {
                status: 500,
                detail: Some("internal error".to_string())
            }
        );
    }

    #[tokio::test]
    async fn transport_failure_is_an_error() {
        let gateway =
            HttpRemoteGateway::new("http://127.0.0.1:9", Duration::from_millis(500)).unwrap();
        let err = gateway.push(RecordType::Marketplace, &payload()).await;
        assert!(matches!(err, Err(AppError::Network(_))));
    }
}
