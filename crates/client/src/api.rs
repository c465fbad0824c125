// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Production control-plane client over reqwest.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use patrol_core::{ClientId, Command, CommandId, CommandOutcome, HostIdentity, HostSample};

use crate::protocol::{
    AckResponse, CommandResultRequest, HeartbeatRequest, HeartbeatResponse,
    PendingCommandsResponse, SystemDataRequest,
};
use crate::traits::{ControlPlane, Fetcher};

/// Per-request timeout, shared by API calls and resource fetches.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected status: {status} body={body}")]
    UnexpectedStatus { status: reqwest::StatusCode, body: String },
    #[error("endpoint error: {0}")]
    Endpoint(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// HTTP client bound to one control plane's `/api` base.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    api_base: String,
}

impl ApiClient {
    /// Build a client for `server_url` (e.g. `http://localhost:5000`).
    pub fn new(server_url: &str) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { http, api_base: format!("{}/api", server_url.trim_end_matches('/')) })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_base, path)
    }

    /// Decode a response body, mapping HTTP-level failures to
    /// `UnexpectedStatus` with the body preserved for the log.
    async fn decode<T: DeserializeOwned>(res: reqwest::Response) -> Result<T, ClientError> {
        if res.status().is_success() {
            Ok(res.json::<T>().await?)
        } else {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            Err(ClientError::UnexpectedStatus { status, body })
        }
    }

    fn check_envelope(status: &str, call: &str) -> Result<(), ClientError> {
        if status == "ok" {
            Ok(())
        } else {
            Err(ClientError::Endpoint(format!("{call} returned status {status:?}")))
        }
    }
}

#[async_trait]
impl ControlPlane for ApiClient {
    async fn heartbeat(&self, host: &HostIdentity) -> Result<ClientId, ClientError> {
        let req = HeartbeatRequest {
            hostname: host.hostname.clone(),
            ip_address: host.ip_address.clone(),
            port: host.port,
        };
        let res = self.http.post(self.url("heartbeat")).json(&req).send().await?;
        let resp: HeartbeatResponse = Self::decode(res).await?;
        Self::check_envelope(&resp.status, "heartbeat")?;
        let client_id = resp
            .client_id
            .ok_or_else(|| ClientError::Endpoint("heartbeat reply carried no client_id".into()))?;
        debug!(%client_id, "heartbeat acknowledged");
        Ok(client_id)
    }

    async fn upload_telemetry(
        &self,
        id: ClientId,
        sample: &HostSample,
    ) -> Result<(), ClientError> {
        let req = SystemDataRequest {
            client_id: id,
            cpu_usage: sample.cpu_usage,
            memory_usage: sample.memory_usage,
            disk_usage: sample.disk_usage,
        };
        let res = self.http.post(self.url("system_data")).json(&req).send().await?;
        let resp: AckResponse = Self::decode(res).await?;
        Self::check_envelope(&resp.status, "system_data")
    }

    async fn upload_screenshot(&self, id: ClientId, image: Vec<u8>) -> Result<(), ClientError> {
        let part = multipart::Part::bytes(image)
            .file_name("screenshot.jpg")
            .mime_str("image/jpeg")?;
        let form = multipart::Form::new().text("client_id", id.to_string()).part("file", part);
        let res = self.http.post(self.url("screenshots")).multipart(form).send().await?;
        let resp: AckResponse = Self::decode(res).await?;
        Self::check_envelope(&resp.status, "screenshots")
    }

    async fn pending_commands(&self, id: ClientId) -> Result<Vec<Command>, ClientError> {
        let res = self.http.get(self.url(&format!("commands/pending/{id}"))).send().await?;
        let resp: PendingCommandsResponse = Self::decode(res).await?;
        Self::check_envelope(&resp.status, "commands/pending")?;
        debug!(count = resp.commands.len(), "fetched pending commands");
        Ok(resp.commands.into_iter().map(Command::from).collect())
    }

    async fn report_result(
        &self,
        id: CommandId,
        outcome: &CommandOutcome,
    ) -> Result<(), ClientError> {
        let req = CommandResultRequest {
            status: outcome.status.as_str().to_string(),
            result: outcome.result.clone(),
        };
        let res =
            self.http.post(self.url(&format!("commands/result/{id}"))).json(&req).send().await?;
        let resp: AckResponse = Self::decode(res).await?;
        Self::check_envelope(&resp.status, "commands/result")
    }
}

#[async_trait]
impl Fetcher for ApiClient {
    async fn fetch_to_file(&self, url: &str, dest: &Path) -> Result<(), ClientError> {
        debug!(url, dest = %dest.display(), "fetching remote resource");
        let res = self.http.get(url).send().await?;
        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(ClientError::UnexpectedStatus { status, body });
        }
        let bytes = res.bytes().await?;
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(dest, &bytes).await?;
        Ok(())
    }
}
