//! Redfish resource client
//!
//! Issues authenticated GET requests against a BMC. Paths are resolved
//! against the service base (`https://<target>/redfish/v1`): an empty path
//! is the service root, a path starting with `/` is taken from the origin
//! (that is how `@odata.id` references look), anything else is relative to
//! the base.

use crate::config::{CollectorConfig, Credentials};
use crate::error::{InventoryError, Result};
use crate::network;
use async_trait::async_trait;
use reqwest::header::{HeaderValue, ACCEPT};
use reqwest::{Client, StatusCode};

/// Read access to a Redfish resource tree
#[async_trait]
pub trait ResourceFetch: Send + Sync {
    /// Fetch the raw body of a resource
    async fn get(&self, path: &str) -> Result<Vec<u8>>;
}

/// HTTP client for one BMC
pub struct RedfishClient {
    client: Client,
    base_url: String,
    origin: String,
    credentials: Credentials,
}

impl RedfishClient {
    /// Create a client for the configured target
    pub fn new(config: &CollectorConfig) -> Result<Self> {
        let tls = match &config.bmc_ca_cert {
            Some(path) => network::pinned_client_config_from_file(path)?,
            None => network::insecure_client_config()?,
        };

        let client = Client::builder()
            .use_preconfigured_tls(tls)
            .build()
            .map_err(|e| InventoryError::config(format!("Failed to create BMC client: {}", e)))?;

        Self::with_client(client, &config.redfish_base(), config.credentials.clone())
    }

    /// Create a client against an explicit base address
    pub fn with_client(client: Client, base_url: &str, credentials: Credentials) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_string();
        let origin = origin_of(&base_url)
            .ok_or_else(|| InventoryError::config(format!("Invalid Redfish base URL: {}", base_url)))?;

        Ok(Self {
            client,
            base_url,
            origin,
            credentials,
        })
    }

    /// Base address requests are resolved against
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolve a resource path to a full URL
    pub fn resolve(&self, path: &str) -> String {
        let path = path.trim();
        if path.is_empty() {
            self.base_url.clone()
        } else if path.starts_with("https://") || path.starts_with("http://") {
            path.to_string()
        } else if path.starts_with('/') {
            format!("{}{}", self.origin, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

#[async_trait]
impl ResourceFetch for RedfishClient {
    async fn get(&self, path: &str) -> Result<Vec<u8>> {
        let url = self.resolve(path);
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .basic_auth(&self.credentials.username, Some(&self.credentials.password))
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .send()
            .await
            .map_err(|e| InventoryError::transport(&url, e.to_string()))?;

        if response.status() != StatusCode::OK {
            return Err(InventoryError::unexpected_status(&url, response.status().as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| InventoryError::transport(&url, e.to_string()))?;

        Ok(body.to_vec())
    }
}

/// `scheme://authority` part of a URL
fn origin_of(url: &str) -> Option<String> {
    let (scheme, rest) = url.split_once("://")?;
    let authority = rest.split('/').next().unwrap_or_default();
    if scheme.is_empty() || authority.is_empty() {
        return None;
    }
    Some(format!("{}://{}", scheme, authority))
}
