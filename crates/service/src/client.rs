use crate::config::ServiceConfig;
use crate::error::ServiceError;
use crate::protocol::{ScrambleResponse, SolveRequest, SolveResponse};
use cubespace_kernel::FaceletState;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;

/// The external scramble/solve collaborator.
pub trait SolverService {
    /// Raw scramble output text, as returned by the service.
    fn fetch_scramble(&self) -> Result<String, ServiceError>;

    /// Solution text for `state`. Display only.
    fn request_solution(&self, state: &FaceletState) -> Result<String, ServiceError>;
}

/// [`SolverService`] over HTTP/JSON.
///
/// Calls block the caller on a private runtime, so this must not be used from
/// inside another async runtime.
pub struct HttpSolverService {
    config: ServiceConfig,
    client: Client,
    runtime: Arc<Runtime>,
}

impl HttpSolverService {
    pub fn new(config: ServiceConfig) -> Result<Self, ServiceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        let runtime = Arc::new(Runtime::new()?);
        Ok(Self {
            config,
            client,
            runtime,
        })
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }
}

fn decode<T: serde::de::DeserializeOwned>(body: &str) -> Result<T, ServiceError> {
    serde_json::from_str(body).map_err(|e| ServiceError::Malformed(e.to_string()))
}

impl SolverService for HttpSolverService {
    fn fetch_scramble(&self) -> Result<String, ServiceError> {
        let url = self.config.endpoint("scramble");
        let _span = tracing::info_span!("fetch_scramble", %url).entered();
        let client = self.client.clone();
        let (status, body) = self.runtime.block_on(async move {
            let response = client.get(&url).send().await?;
            let status = response.status();
            let body = response.text().await?;
            Ok::<_, ServiceError>((status, body))
        })?;
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "scramble request failed");
            return Err(ServiceError::Status {
                status: status.as_u16(),
                body,
            });
        }
        decode::<ScrambleResponse>(&body)?
            .scramble
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ServiceError::Malformed("scramble response has no scramble".to_string()))
    }

    fn request_solution(&self, state: &FaceletState) -> Result<String, ServiceError> {
        let url = self.config.endpoint("solve");
        let _span = tracing::info_span!("request_solution", %url).entered();
        let client = self.client.clone();
        let request = SolveRequest { cube_state: *state };
        let (status, body) = self.runtime.block_on(async move {
            let response = client.post(&url).json(&request).send().await?;
            let status = response.status();
            let body = response.text().await?;
            Ok::<_, ServiceError>((status, body))
        })?;
        // Error replies come with 4xx/5xx and an `error` body; prefer that
        // message over the bare status.
        match decode::<SolveResponse>(&body) {
            Ok(reply) => reply.into_result(),
            Err(_) if !status.is_success() => Err(ServiceError::Status {
                status: status.as_u16(),
                body,
            }),
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_with_default_config() {
        let service = HttpSolverService::new(ServiceConfig::default()).unwrap();
        assert_eq!(service.config().endpoint("solve"), "http://localhost:5000/api/solve");
    }

    #[test]
    fn decode_reports_malformed_bodies() {
        let err = decode::<SolveResponse>("<html>oops</html>").unwrap_err();
        assert!(matches!(err, ServiceError::Malformed(_)));
    }
}
