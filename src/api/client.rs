//! HTTP client for the TurboCloud backend.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use super::{
    ApiError, Backend, Environment, Machine, MachineStats, NewEnvironment, NewMachine, NewService,
    Service,
};
use crate::config::ApiCfg;

/// Talks JSON over HTTP to the backend with a bounded per-request timeout.
#[derive(Clone)]
pub struct HttpBackend {
    /// Shared client; carries the timeout.
    http: Client,
    /// Base URL without a trailing slash.
    base_url: String,
}

impl HttpBackend {
    /// Build a client for `base_url` whose requests give up after `timeout`.
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Build a client from the `[api]` config section.
    pub fn from_config(cfg: &ApiCfg) -> anyhow::Result<Self> {
        Self::new(&cfg.base_url, Duration::from_secs(cfg.timeout_secs))
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Send the request and return the body of a 2xx response.
    async fn send(&self, req: RequestBuilder) -> Result<String, ApiError> {
        let resp = req.send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: body.trim().to_string(),
            });
        }
        Ok(body)
    }

    async fn get_list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, ApiError> {
        let body = self.send(self.http.get(self.url(path))).await?;
        // Go encodes an empty slice as `null`.
        Ok(serde_json::from_str::<Option<Vec<T>>>(&body)?.unwrap_or_default())
    }

    async fn send_json<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ApiError> {
        let body = self.send(req).await?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Percent-encode an id for use as a path segment.
fn seg(id: &str) -> String {
    urlencoding::encode(id).into_owned()
}

#[async_trait]
impl Backend for HttpBackend {
    async fn list_machines(&self) -> Result<Vec<Machine>, ApiError> {
        self.get_list("machine").await
    }

    async fn machine_stats(&self) -> Result<Vec<MachineStats>, ApiError> {
        self.get_list("machine/stats").await
    }

    async fn create_machine(&self, req: &NewMachine) -> Result<Machine, ApiError> {
        self.send_json(self.http.post(self.url("machine")).json(req))
            .await
    }

    async fn delete_machine(&self, id: &str) -> Result<(), ApiError> {
        let url = self.url(&format!("machine/{}", seg(id)));
        self.send(self.http.delete(url)).await.map(|_| ())
    }

    async fn list_services(&self) -> Result<Vec<Service>, ApiError> {
        self.get_list("service").await
    }

    async fn create_service(&self, req: &NewService) -> Result<Service, ApiError> {
        self.send_json(self.http.post(self.url("service")).json(req))
            .await
    }

    async fn list_environments(&self, service_id: &str) -> Result<Vec<Environment>, ApiError> {
        self.get_list(&format!("service/{}/environment", seg(service_id)))
            .await
    }

    async fn create_environment(&self, req: &NewEnvironment) -> Result<Environment, ApiError> {
        self.send_json(self.http.post(self.url("environment")).json(req))
            .await
    }

    async fn update_environment(&self, env: &Environment) -> Result<Environment, ApiError> {
        self.send_json(self.http.put(self.url("environment")).json(env))
            .await
    }

    async fn delete_environment(&self, id: &str) -> Result<(), ApiError> {
        let url = self.url(&format!("environment/{}", seg(id)));
        self.send(self.http.delete(url)).await.map(|_| ())
    }

    async fn trigger_deployment(&self, environment_id: &str) -> Result<(), ApiError> {
        let url = self.url(&format!("deploy/environment/{}", seg(environment_id)));
        self.send(self.http.get(url)).await.map(|_| ())
    }
}
