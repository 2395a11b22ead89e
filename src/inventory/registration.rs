//! Inventory API registration client
//!
//! Devices are registered in two calls: `POST /devices` creates a bare
//! envelope and returns its uid, then `PUT /devices/{uid}/status` attaches
//! the observed state. The uid only ever comes from the API.

use crate::config::CollectorConfig;
use crate::error::{InventoryError, Result};
use crate::inventory::models::{CreateDeviceRequest, DeviceResponse, DeviceStatus, StatusUpdateRequest};
use crate::network;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};

/// Two-phase device registration
#[async_trait]
pub trait InventoryApi: Send + Sync {
    /// Create a named envelope and return its assigned uid
    async fn create_envelope(&self, name: &str) -> Result<String>;

    /// Attach a status to an existing envelope
    async fn attach_status(&self, uid: &str, status: &DeviceStatus) -> Result<()>;
}

/// HTTP client for the inventory API
#[derive(Clone)]
pub struct InventoryClient {
    client: Client,
    base_url: String,
}

impl InventoryClient {
    /// Create a client for the configured inventory host
    pub fn new(config: &CollectorConfig) -> Result<Self> {
        let client = Client::builder()
            .use_preconfigured_tls(network::default_client_config()?)
            .build()
            .map_err(|e| {
                InventoryError::config(format!("Failed to create inventory client: {}", e))
            })?;

        Ok(Self::with_client(client, &config.inventory_host))
    }

    /// Create a client against an explicit base address
    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Inventory API base address
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl InventoryApi for InventoryClient {
    async fn create_envelope(&self, name: &str) -> Result<String> {
        let url = format!("{}/devices", self.base_url);
        let request = CreateDeviceRequest {
            name: name.to_string(),
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| InventoryError::transport(&url, e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK && status != StatusCode::CREATED {
            return Err(InventoryError::envelope(
                name,
                format!("{} returned HTTP {}", url, status.as_u16()),
            ));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| InventoryError::transport(&url, e.to_string()))?;
        let created: DeviceResponse = serde_json::from_slice(&body)
            .map_err(|e| InventoryError::envelope(name, format!("unreadable response: {}", e)))?;

        match created.uid() {
            Some(uid) => Ok(uid.to_string()),
            None => Err(InventoryError::envelope(name, "response has no metadata.uid")),
        }
    }

    async fn attach_status(&self, uid: &str, status: &DeviceStatus) -> Result<()> {
        let url = format!("{}/devices/{}/status", self.base_url, uid);
        let request = StatusUpdateRequest {
            status: status.clone(),
        };
        let body = serde_json::to_vec(&request)?;

        let response = self
            .client
            .put(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| InventoryError::transport(&url, e.to_string()))?;

        if response.status() != StatusCode::OK {
            return Err(InventoryError::StatusUpdate {
                uid: uid.to_string(),
                status: response.status().as_u16(),
            });
        }

        Ok(())
    }
}
