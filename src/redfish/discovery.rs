//! Redfish discovery traversal
//!
//! Walks `Systems -> {Processors, Memory}` and turns every resource into a
//! [`DiscoveredDevice`]. Only the systems collection is fatal; anything
//! below it that fails to fetch or decode is logged and skipped so one bad
//! DIMM does not hide the rest of the machine. Errors that are not
//! transport or decode failures still abort the walk.

use crate::config::SYSTEMS_PATH;
use crate::error::Result;
use crate::inventory::{DeviceType, DiscoveredDevice, SystemInventory};
use crate::redfish::client::ResourceFetch;
use crate::redfish::schema::{
    decode_collection, decode_resource, map_device, HasCommonProperties, RedfishMemory,
    RedfishProcessor, RedfishSystem,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Counters for one traversal
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoverySummary {
    /// Systems listed in the systems collection
    pub systems_listed: usize,
    /// Systems that could not be read and were skipped
    pub systems_skipped: usize,
    /// Devices produced
    pub devices: usize,
    /// Skipped collections or members below a system
    pub warnings: usize,
}

/// Walks a BMC's resource tree
pub struct Discoverer<'a, F: ResourceFetch + ?Sized> {
    fetcher: &'a F,
    summary: DiscoverySummary,
}

impl<'a, F: ResourceFetch + ?Sized> Discoverer<'a, F> {
    /// Create a traverser over a fetcher
    pub fn new(fetcher: &'a F) -> Self {
        Self {
            fetcher,
            summary: DiscoverySummary::default(),
        }
    }

    /// Counters collected so far
    pub fn summary(&self) -> &DiscoverySummary {
        &self.summary
    }

    /// Discover every device as one ordered list
    pub async fn discover(&mut self) -> Result<Vec<DiscoveredDevice>> {
        let systems = self.discover_systems().await?;
        Ok(systems
            .into_iter()
            .flat_map(SystemInventory::into_devices)
            .collect())
    }

    /// Discover devices grouped per system.
    ///
    /// Fails only if the systems collection itself cannot be read.
    pub async fn discover_systems(&mut self) -> Result<Vec<SystemInventory>> {
        let body = self.fetcher.get(SYSTEMS_PATH).await?;
        let collection = decode_collection(SYSTEMS_PATH, &body)?;
        self.summary.systems_listed = collection.members.len();

        let mut systems = Vec::with_capacity(collection.members.len());
        for system_uri in collection.member_uris() {
            match self.discover_system(system_uri).await {
                Ok(inventory) => {
                    self.summary.devices += inventory.device_count();
                    systems.push(inventory);
                }
                Err(e) if e.is_recoverable_in_discovery() => {
                    tracing::warn!("Skipping system {}: {}", system_uri, e);
                    self.summary.systems_skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }

        tracing::info!(
            systems = self.summary.systems_listed,
            skipped = self.summary.systems_skipped,
            devices = self.summary.devices,
            warnings = self.summary.warnings,
            "Redfish discovery finished"
        );
        Ok(systems)
    }

    async fn discover_system(&mut self, system_uri: &str) -> Result<SystemInventory> {
        let system: RedfishSystem = self.fetch_resource(system_uri).await?;
        // Parent references stay empty for nodes
        let mut inventory = SystemInventory::new(map_device(DeviceType::Node, &system, system_uri, ""));

        if let Some(uri) = system.processors_uri() {
            inventory.processors = self
                .discover_members::<RedfishProcessor>(uri, DeviceType::Cpu, system_uri)
                .await?;
        }
        if let Some(uri) = system.memory_uri() {
            inventory.memory_modules = self
                .discover_members::<RedfishMemory>(uri, DeviceType::Dimm, system_uri)
                .await?;
        }

        Ok(inventory)
    }

    /// Read every member of a sub-collection, skipping the ones that fail
    async fn discover_members<R>(
        &mut self,
        collection_uri: &str,
        device_type: DeviceType,
        parent_uri: &str,
    ) -> Result<Vec<DiscoveredDevice>>
    where
        R: DeserializeOwned + HasCommonProperties,
    {
        let collection = match self.fetcher.get(collection_uri).await {
            Ok(body) => decode_collection(collection_uri, &body),
            Err(e) => Err(e),
        };
        let collection = match collection {
            Ok(collection) => collection,
            Err(e) if e.is_recoverable_in_discovery() => {
                tracing::warn!("Skipping {} collection {}: {}", device_type, collection_uri, e);
                self.summary.warnings += 1;
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };

        let mut devices = Vec::with_capacity(collection.members.len());
        for member_uri in collection.member_uris() {
            match self.fetch_resource::<R>(member_uri).await {
                Ok(resource) => {
                    devices.push(map_device(device_type, &resource, member_uri, parent_uri));
                }
                Err(e) if e.is_recoverable_in_discovery() => {
                    tracing::warn!("Skipping {} {}: {}", device_type, member_uri, e);
                    self.summary.warnings += 1;
                }
                Err(e) => return Err(e),
            }
        }
        Ok(devices)
    }

    async fn fetch_resource<T: DeserializeOwned>(&self, uri: &str) -> Result<T> {
        let body = self.fetcher.get(uri).await?;
        decode_resource(uri, &body)
    }
}
