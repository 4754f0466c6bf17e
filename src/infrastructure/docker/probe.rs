//! Container status via the n8n health endpoint

use std::time::Duration;

use tracing::debug;

use crate::domain::docker::{ContainerStatus, DockerOptions};
use crate::domain::DomainError;

#[derive(Debug, Clone)]
pub struct ContainerProbe {
    client: reqwest::Client,
}

impl ContainerProbe {
    pub fn new(timeout: Duration) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                DomainError::configuration(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self { client })
    }

    /// Running when `GET /healthz` answers with a success status
    pub async fn status(&self, options: &DockerOptions) -> ContainerStatus {
        let base_url = options.base_url();
        let url = format!("{}/healthz", base_url);

        match self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => ContainerStatus::running(base_url),
            Ok(response) => {
                debug!(status = response.status().as_u16(), "n8n health check failed");
                ContainerStatus::stopped()
            }
            Err(e) => {
                debug!(error = %e, "n8n health check unreachable");
                ContainerStatus::stopped()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::docker::ContainerState;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn options_for(server: &MockServer) -> DockerOptions {
        let address = server.address();
        DockerOptions {
            host: address.ip().to_string(),
            port: address.port(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_running_container() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/healthz"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "status": "ok" })),
            )
            .mount(&server)
            .await;

        let options = options_for(&server);
        let status = ContainerProbe::new(Duration::from_secs(2))
            .unwrap()
            .status(&options)
            .await;

        assert!(status.running);
        assert_eq!(status.status, ContainerState::Running);
        assert_eq!(status.url, Some(options.base_url()));
    }

    #[tokio::test]
    async fn test_unhealthy_container() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/healthz"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let status = ContainerProbe::new(Duration::from_secs(2))
            .unwrap()
            .status(&options_for(&server))
            .await;

        assert_eq!(status, ContainerStatus::stopped());
    }
}
