//! # inventory-gather - Redfish Hardware Inventory Collector
//!
//! Discovers compute nodes, processors and memory modules from a BMC's
//! Redfish service and registers each one with an inventory API.
//!
//! ## Features
//!
//! - **Redfish Traversal**: `Systems -> Processors / Memory`, tolerant of
//!   partial failures below the systems collection
//! - **Schema Normalization**: one device record for every resource type,
//!   with model-as-part-number fallback
//! - **Two-Phase Registration**: create envelope, then attach status
//! - **Self-Signed BMCs**: certificate verification off by default, or
//!   pinned to an operator-supplied CA bundle
//!
//! ## Quick Start
//!
//! ```no_run
//! use inventory_gather::config::CollectorConfig;
//! use inventory_gather::core::collect_and_post;
//!
//! # async fn example() -> inventory_gather::Result<()> {
//! let config = CollectorConfig::from_env("10.0.0.5");
//! let report = collect_and_post(&config).await?;
//! report.print_summary();
//! # Ok(())
//! # }
//! ```
//!
//! ## Custom Clients
//!
//! ```no_run
//! use inventory_gather::config::CollectorConfig;
//! use inventory_gather::core::Collector;
//! use inventory_gather::inventory::InventoryClient;
//! use inventory_gather::redfish::RedfishClient;
//!
//! # async fn example() -> inventory_gather::Result<()> {
//! let config = CollectorConfig::from_env("10.0.0.5");
//! let collector = Collector::with_clients(
//!     &config.target,
//!     RedfishClient::new(&config)?,
//!     InventoryClient::new(&config)?,
//! );
//!
//! let discovered = collector.discover_only().await?;
//! discovered.print_summary();
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod core;
pub mod error;
pub mod inventory;
pub mod network;
pub mod redfish;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use config::{CollectorConfig, Credentials};
pub use core::{collect_and_post, CollectionReport, Collector};
pub use error::{InventoryError, Result};
pub use inventory::{DeviceType, DiscoveredDevice};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    //! Convenient re-exports for common usage
    //!
    //! ```no_run
    //! use inventory_gather::prelude::*;
    //! ```

    pub use crate::config::{CollectorConfig, Credentials};
    pub use crate::core::{collect_and_post, CollectionReport, Collector, DiscoveryReport};
    pub use crate::error::{InventoryError, Result};
    pub use crate::inventory::{DeviceStatus, DeviceType, DiscoveredDevice, InventoryApi, InventoryClient};
    pub use crate::redfish::{Discoverer, RedfishClient, ResourceFetch};
}
