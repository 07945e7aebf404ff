//! Remote Entry API Client
//!
//! The one remote call the sync core needs: create an entry in a book.

use crate::client::config::Config;
use crate::client::offline::Payload;
use crate::client::sync::SyncTarget;
use crate::shared::error::ApiError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Endpoint path, relative to the target server
pub const CREATE_ENTRY_PATH: &str = "/api/entry/add";

/// Response code meaning the server stored the entry
pub const SUCCESS_CODE: i64 = 200;

/// Body returned by the create-entry endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateEntryResponse {
    #[serde(alias = "statusCode")]
    pub code: i64,
    #[serde(default)]
    pub message: Option<String>,
}

impl CreateEntryResponse {
    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }
}

/// Remote side of the reconciler
#[async_trait]
pub trait EntryApi: Send + Sync {
    /// Submit one entry body to the target book
    async fn create_entry(
        &self,
        target: &SyncTarget,
        body: &Payload,
    ) -> Result<CreateEntryResponse, ApiError>;
}

/// `EntryApi` over HTTP
#[derive(Debug, Clone)]
pub struct HttpEntryApi {
    client: Client,
    token: Option<String>,
}

impl HttpEntryApi {
    /// Build a client whose every request times out after `timeout`
    pub fn new(timeout: Duration, token: Option<String>) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, token })
    }

    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        Self::new(config.request_timeout(), config.get_token().map(str::to_string))
    }

    fn endpoint(target: &SyncTarget) -> Result<String, ApiError> {
        let base = target.server_url.trim_end_matches('/');
        if base.is_empty() {
            return Err(ApiError::InvalidUrl(target.server_url.clone()));
        }
        Ok(format!("{}{}", base, CREATE_ENTRY_PATH))
    }
}

#[async_trait]
impl EntryApi for HttpEntryApi {
    async fn create_entry(
        &self,
        target: &SyncTarget,
        body: &Payload,
    ) -> Result<CreateEntryResponse, ApiError> {
        let url = Self::endpoint(target)?;

        let mut request = self.client.post(&url).json(body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| status.to_string());
            return Err(ApiError::status(status.as_u16(), error_text));
        }

        Ok(response.json::<CreateEntryResponse>().await?)
    }
}
