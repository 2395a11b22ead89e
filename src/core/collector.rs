//! Collection orchestration
//!
//! Runs discovery against the BMC, then registers every discovered device
//! with the inventory API, strictly one after another:
//!
//! ```text
//! Start -> Discover -> NoDevicesFound                      (error)
//!                   -> DevicesFound -> RegisterNext* -> Done
//! ```
//!
//! Any registration failure ends the run. Devices registered before the
//! failure stay registered; nothing is rolled back.

use crate::config::CollectorConfig;
use crate::error::{InventoryError, Result};
use crate::inventory::{DeviceStatus, DeviceType, DiscoveredDevice, InventoryApi, InventoryClient};
use crate::redfish::{Discoverer, DiscoverySummary, RedfishClient, ResourceFetch};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One successfully registered device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    /// Temporary name the envelope was created with
    pub name: String,
    /// Identifier assigned by the inventory API
    pub uid: String,
    /// Device kind
    pub device_type: DeviceType,
    /// Redfish path the device was read from
    pub redfish_uri: String,
}

/// Outcome of a completed collection run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionReport {
    /// BMC address
    pub target: String,
    /// Discovery counters
    pub discovery: DiscoverySummary,
    /// Registered devices in registration order (the name -> uid map)
    pub registrations: Vec<Registration>,
    /// Run start
    pub started_at: DateTime<Utc>,
    /// Run end
    pub finished_at: DateTime<Utc>,
}

impl CollectionReport {
    /// Uid assigned to a temporary device name
    pub fn uid_for(&self, name: &str) -> Option<&str> {
        self.registrations
            .iter()
            .find(|r| r.name == name)
            .map(|r| r.uid.as_str())
    }

    /// Wall-clock duration of the run
    pub fn duration(&self) -> std::time::Duration {
        (self.finished_at - self.started_at)
            .to_std()
            .unwrap_or_default()
    }

    /// Print summary to console
    pub fn print_summary(&self) {
        println!("\n=== Inventory Collection Summary ===");
        println!("BMC:             {}", self.target);
        println!("Systems:         {}", self.discovery.systems_listed);
        println!("Skipped systems: {}", self.discovery.systems_skipped);
        println!("Warnings:        {}", self.discovery.warnings);
        println!("Registered:      {}", self.registrations.len());
        println!(
            "Duration:        {}",
            humantime::format_duration(round_to_millis(self.duration()))
        );

        if !self.registrations.is_empty() {
            println!();
            for registration in &self.registrations {
                println!(
                    "  {:<32} {:<24} {}",
                    registration.name, registration.uid, registration.redfish_uri
                );
            }
        }
    }
}

fn round_to_millis(duration: std::time::Duration) -> std::time::Duration {
    std::time::Duration::from_millis(duration.as_millis() as u64)
}

/// Devices found by a discovery-only run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryReport {
    /// BMC address
    pub target: String,
    /// Discovery counters
    pub discovery: DiscoverySummary,
    /// Devices in registration order
    pub devices: Vec<DiscoveredDevice>,
}

impl DiscoveryReport {
    /// Print discovered devices to console
    pub fn print_summary(&self) {
        println!("\n=== Discovered Devices ({}) ===", self.target);
        for (index, device) in self.devices.iter().enumerate() {
            println!(
                "  {:<32} {:<16} {:<24} {}",
                device.temp_name(index),
                device.manufacturer,
                device.part_number,
                device.redfish_uri
            );
        }
        println!("\nDevices:  {}", self.devices.len());
        println!("Warnings: {}", self.discovery.warnings);
    }
}

/// Discovers a BMC's hardware and registers it with the inventory API
pub struct Collector<F, I> {
    target: String,
    fetcher: F,
    inventory: I,
}

impl Collector<RedfishClient, InventoryClient> {
    /// Create a collector with HTTP clients built from configuration
    pub fn new(config: &CollectorConfig) -> Result<Self> {
        config.validate().map_err(InventoryError::Config)?;
        Ok(Self::with_clients(
            &config.target,
            RedfishClient::new(config)?,
            InventoryClient::new(config)?,
        ))
    }
}

impl<F: ResourceFetch, I: InventoryApi> Collector<F, I> {
    /// Create a collector over arbitrary clients
    pub fn with_clients(target: impl Into<String>, fetcher: F, inventory: I) -> Self {
        Self {
            target: target.into(),
            fetcher,
            inventory,
        }
    }

    /// Inventory client
    pub fn inventory(&self) -> &I {
        &self.inventory
    }

    /// Discover and register every device
    pub async fn run(&self) -> Result<CollectionReport> {
        let started_at = Utc::now();
        tracing::info!("Starting inventory collection for BMC {}", self.target);

        let (devices, discovery) = self.discover().await?;
        let mut registrations = Vec::with_capacity(devices.len());

        for (index, device) in devices.iter().enumerate() {
            let name = device.temp_name(index);
            let uid = self.register(&name, device).await?;
            registrations.push(Registration {
                name,
                uid,
                device_type: device.device_type,
                redfish_uri: device.redfish_uri.clone(),
            });
        }

        tracing::info!(
            "Inventory collection for {} completed: {} devices registered",
            self.target,
            registrations.len()
        );

        Ok(CollectionReport {
            target: self.target.clone(),
            discovery,
            registrations,
            started_at,
            finished_at: Utc::now(),
        })
    }

    /// Discover devices without registering them
    pub async fn discover_only(&self) -> Result<DiscoveryReport> {
        let (devices, discovery) = self.discover().await?;
        Ok(DiscoveryReport {
            target: self.target.clone(),
            discovery,
            devices,
        })
    }

    async fn discover(&self) -> Result<(Vec<DiscoveredDevice>, DiscoverySummary)> {
        let mut discoverer = Discoverer::new(&self.fetcher);
        let devices = discoverer
            .discover()
            .await
            .map_err(|e| e.with_context(format!("Redfish discovery on {} failed", self.target)))?;

        if devices.is_empty() {
            return Err(InventoryError::NoDevicesFound {
                target: self.target.clone(),
            });
        }

        tracing::info!("Redfish discovery found {} devices", devices.len());
        Ok((devices, discoverer.summary().clone()))
    }

    /// Create the envelope, then attach the status
    async fn register(&self, name: &str, device: &DiscoveredDevice) -> Result<String> {
        tracing::info!("Creating resource envelope for {} ({})", name, device.device_type);
        let uid = self
            .inventory
            .create_envelope(name)
            .await
            .map_err(|e| InventoryError::registration(name, None, e))?;

        tracing::info!("Updating status for {} (uid {})", name, uid);
        self.inventory
            .attach_status(&uid, &DeviceStatus::from(device))
            .await
            .map_err(|e| InventoryError::registration(name, Some(uid.clone()), e))?;

        tracing::info!("Registered device {} as {}", name, uid);
        Ok(uid)
    }
}

/// Collect inventory from one BMC and post it, using the given configuration
pub async fn collect_and_post(config: &CollectorConfig) -> Result<CollectionReport> {
    Collector::new(config)?.run().await
}
