//! Device and inventory API data models
//!
//! `DiscoveredDevice` is the normalized record produced by discovery.
//! The remaining types are the request/response bodies of the inventory
//! API, kept as explicit structs so a malformed body fails at
//! serialization time instead of on the wire.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of hardware a device record describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceType {
    /// Compute node (Redfish ComputerSystem)
    Node,
    /// Processor
    #[serde(rename = "CPU")]
    Cpu,
    /// Memory module
    #[serde(rename = "DIMM")]
    Dimm,
}

impl DeviceType {
    /// Name used by the inventory API and in temporary device names
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Node => "Node",
            Self::Cpu => "CPU",
            Self::Dimm => "DIMM",
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized device record built during discovery
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveredDevice {
    /// Device kind
    pub device_type: DeviceType,
    /// Manufacturer (empty if the BMC did not report one)
    pub manufacturer: String,
    /// Part number, or the model when no part number was reported
    pub part_number: String,
    /// Serial number (empty if the BMC did not report one)
    pub serial_number: String,
    /// Redfish path of the logical parent; empty for nodes
    pub parent_uri: String,
    /// Redfish path this record was read from
    pub redfish_uri: String,
}

impl DiscoveredDevice {
    /// Temporary name used to create the envelope.
    ///
    /// `index` is the device's position in the flattened discovery list.
    pub fn temp_name(&self, index: usize) -> String {
        format!("{}-{}-{}", self.device_type, index, self.serial_number)
    }
}

/// Devices discovered under one ComputerSystem
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemInventory {
    /// The system itself
    pub node: DiscoveredDevice,
    /// Processors in collection order
    pub processors: Vec<DiscoveredDevice>,
    /// Memory modules in collection order
    pub memory_modules: Vec<DiscoveredDevice>,
}

impl SystemInventory {
    /// Create an inventory holding only the node
    pub fn new(node: DiscoveredDevice) -> Self {
        Self {
            node,
            processors: Vec::new(),
            memory_modules: Vec::new(),
        }
    }

    /// Number of devices, node included
    pub fn device_count(&self) -> usize {
        1 + self.processors.len() + self.memory_modules.len()
    }

    /// Flatten into node, processors, then memory modules
    pub fn into_devices(self) -> Vec<DiscoveredDevice> {
        let mut devices = Vec::with_capacity(self.device_count());
        devices.push(self.node);
        devices.extend(self.processors);
        devices.extend(self.memory_modules);
        devices
    }
}

/// Body of `POST /devices`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateDeviceRequest {
    /// Temporary device name
    pub name: String,
}

/// Resource metadata assigned by the inventory API
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// Remote identifier
    #[serde(default)]
    pub uid: Option<String>,
}

/// Response body of `POST /devices`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceResponse {
    /// Resource metadata
    #[serde(default)]
    pub metadata: Metadata,
}

impl DeviceResponse {
    /// Assigned identifier, if present and non-empty
    pub fn uid(&self) -> Option<&str> {
        self.metadata
            .uid
            .as_deref()
            .filter(|uid| !uid.trim().is_empty())
    }
}

/// Extra properties attached to a device status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceProperties {
    /// Redfish path the device was read from
    pub redfish_uri: String,
}

/// Observed state of a device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceStatus {
    /// Device kind
    pub device_type: DeviceType,
    /// Manufacturer
    pub manufacturer: String,
    /// Part number
    pub part_number: String,
    /// Serial number
    pub serial_number: String,
    /// Source properties
    pub properties: DeviceProperties,
}

impl From<&DiscoveredDevice> for DeviceStatus {
    fn from(device: &DiscoveredDevice) -> Self {
        // parent_uri is not forwarded until parents can be resolved to uids
        Self {
            device_type: device.device_type,
            manufacturer: device.manufacturer.clone(),
            part_number: device.part_number.clone(),
            serial_number: device.serial_number.clone(),
            properties: DeviceProperties {
                redfish_uri: device.redfish_uri.clone(),
            },
        }
    }
}

/// Body of `PUT /devices/{uid}/status`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdateRequest {
    /// Wrapped status
    pub status: DeviceStatus,
}
