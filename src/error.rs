//! Error types for inventory gathering
//!
//! This module defines every error that can surface while walking a BMC's
//! Redfish tree or registering devices with the inventory API. Discovery
//! code catches most of these at branch boundaries; registration code
//! propagates them.

use thiserror::Error;

/// Main error type for inventory operations
#[derive(Error, Debug)]
pub enum InventoryError {
    /// Request could not be sent or no response was received
    #[error("Transport error for '{url}': {message}")]
    Transport { url: String, message: String },

    /// Response received with a status outside the accepted set
    #[error("Unexpected HTTP status {status} from '{url}'")]
    UnexpectedStatus { url: String, status: u16 },

    /// Response body does not match the expected schema
    #[error("Failed to decode '{uri}': {message}")]
    Decode { uri: String, message: String },

    /// The inventory API did not hand back a usable envelope identifier
    #[error("Envelope creation failed for '{name}': {reason}")]
    EnvelopeCreation { name: String, reason: String },

    /// The inventory API rejected a status update
    #[error("Status update for '{uid}' returned HTTP {status}")]
    StatusUpdate { uid: String, status: u16 },

    /// Discovery finished without producing a single device
    #[error("No devices found on BMC '{target}'")]
    NoDevicesFound { target: String },

    /// Registration of one device failed; the run is aborted
    #[error("Failed to register {name}{}: {source}", dangling_suffix(.uid))]
    Registration {
        name: String,
        /// Envelope left behind without a status, if one was created
        uid: Option<String>,
        #[source]
        source: Box<InventoryError>,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<InventoryError>,
    },
}

fn dangling_suffix(uid: &Option<String>) -> String {
    match uid {
        Some(uid) => format!(" (envelope {} left without status)", uid),
        None => String::new(),
    }
}

impl InventoryError {
    /// Create a transport error
    pub fn transport(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transport {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create an unexpected status error
    pub fn unexpected_status(url: impl Into<String>, status: u16) -> Self {
        Self::UnexpectedStatus {
            url: url.into(),
            status,
        }
    }

    /// Create a decode error
    pub fn decode(uri: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            uri: uri.into(),
            message: message.into(),
        }
    }

    /// Create an envelope creation error
    pub fn envelope(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::EnvelopeCreation {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Wrap a registration failure with the device's temporary name
    pub fn registration(name: impl Into<String>, uid: Option<String>, source: InventoryError) -> Self {
        Self::Registration {
            name: name.into(),
            uid,
            source: Box::new(source),
        }
    }

    /// Innermost error, skipping context and registration wrappers
    pub fn root_cause(&self) -> &InventoryError {
        match self {
            Self::WithContext { source, .. } | Self::Registration { source, .. } => {
                source.root_cause()
            }
            other => other,
        }
    }

    /// Check if this error came from the transport layer
    pub fn is_transport(&self) -> bool {
        matches!(
            self.root_cause(),
            Self::Transport { .. } | Self::UnexpectedStatus { .. }
        )
    }

    /// Check if a discovery branch may skip this error and keep walking
    pub fn is_recoverable_in_discovery(&self) -> bool {
        matches!(
            self.root_cause(),
            Self::Transport { .. } | Self::UnexpectedStatus { .. } | Self::Decode { .. }
        )
    }

    /// Envelope identifier left without a status by a failed registration
    pub fn dangling_uid(&self) -> Option<&str> {
        match self {
            Self::Registration { uid: Some(uid), .. } => Some(uid),
            Self::Registration { source, .. } | Self::WithContext { source, .. } => {
                source.dangling_uid()
            }
            _ => None,
        }
    }
}

/// Result type alias for inventory operations
pub type Result<T> = std::result::Result<T, InventoryError>;

impl From<serde_json::Error> for InventoryError {
    fn from(err: serde_json::Error) -> Self {
        InventoryError::Decode {
            uri: String::new(),
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for InventoryError {
    fn from(err: reqwest::Error) -> Self {
        let url = err.url().map(|u| u.to_string()).unwrap_or_default();
        InventoryError::Transport {
            url,
            message: err.to_string(),
        }
    }
}
