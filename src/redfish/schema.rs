//! Redfish resource schemas and the device mapper
//!
//! Only the fields needed to build a device record are modeled. Every
//! concrete schema carries the same common property subset and exposes it
//! through [`HasCommonProperties`], so the mapper never looks at
//! resource-specific fields.

use crate::error::{InventoryError, Result};
use crate::inventory::{DeviceType, DiscoveredDevice};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Reference to another Redfish resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceLink {
    /// Resource path
    #[serde(rename = "@odata.id", default)]
    pub odata_id: String,
}

impl ResourceLink {
    /// Path of the referenced resource, if the link carries one
    pub fn target(&self) -> Option<&str> {
        Some(self.odata_id.as_str()).filter(|id| !id.trim().is_empty())
    }
}

/// A collection resource (e.g. `/redfish/v1/Systems`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceCollection {
    /// Member references in service order
    #[serde(rename = "Members")]
    pub members: Vec<ResourceLink>,
}

impl ResourceCollection {
    /// Member paths in order, skipping members without a path
    pub fn member_uris(&self) -> impl Iterator<Item = &str> {
        self.members.iter().filter_map(ResourceLink::target)
    }
}

/// Properties shared by systems, processors and memory modules
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommonProperties {
    /// Manufacturer
    #[serde(rename = "Manufacturer", default)]
    pub manufacturer: Option<String>,
    /// Model name
    #[serde(rename = "Model", default)]
    pub model: Option<String>,
    /// Part number
    #[serde(rename = "PartNumber", default)]
    pub part_number: Option<String>,
    /// Serial number
    #[serde(rename = "SerialNumber", default)]
    pub serial_number: Option<String>,
}

impl CommonProperties {
    /// Part number, falling back to the model when absent or empty
    pub fn effective_part_number(&self) -> &str {
        match self.part_number.as_deref() {
            Some(part) if !part.is_empty() => part,
            _ => self.model.as_deref().unwrap_or_default(),
        }
    }
}

/// Access to the common property subset of a Redfish resource
pub trait HasCommonProperties {
    /// Common properties of this resource
    fn common(&self) -> &CommonProperties;
}

/// ComputerSystem resource (a node)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedfishSystem {
    /// Common properties
    #[serde(flatten)]
    pub common: CommonProperties,
    /// Processor collection reference
    #[serde(rename = "Processors", default)]
    pub processors: Option<ResourceLink>,
    /// Memory collection reference
    #[serde(rename = "Memory", default)]
    pub memory: Option<ResourceLink>,
}

/// Processor resource (a CPU)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedfishProcessor {
    /// Common properties
    #[serde(flatten)]
    pub common: CommonProperties,
}

/// Memory resource (a DIMM)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedfishMemory {
    /// Common properties
    #[serde(flatten)]
    pub common: CommonProperties,
}

impl RedfishSystem {
    /// Processor collection path; an empty link counts as absent
    pub fn processors_uri(&self) -> Option<&str> {
        self.processors.as_ref().and_then(ResourceLink::target)
    }

    /// Memory collection path; an empty link counts as absent
    pub fn memory_uri(&self) -> Option<&str> {
        self.memory.as_ref().and_then(ResourceLink::target)
    }
}

impl HasCommonProperties for RedfishSystem {
    fn common(&self) -> &CommonProperties {
        &self.common
    }
}

impl HasCommonProperties for RedfishProcessor {
    fn common(&self) -> &CommonProperties {
        &self.common
    }
}

impl HasCommonProperties for RedfishMemory {
    fn common(&self) -> &CommonProperties {
        &self.common
    }
}

/// Decode a resource body into a concrete schema
pub fn decode_resource<T: DeserializeOwned>(uri: &str, body: &[u8]) -> Result<T> {
    serde_json::from_slice(body).map_err(|e| InventoryError::decode(uri, e.to_string()))
}

/// Decode a collection body
pub fn decode_collection(uri: &str, body: &[u8]) -> Result<ResourceCollection> {
    decode_resource(uri, body)
}

/// Project a decoded resource into a device record
pub fn map_device<R: HasCommonProperties>(
    device_type: DeviceType,
    resource: &R,
    redfish_uri: &str,
    parent_uri: &str,
) -> DiscoveredDevice {
    let common = resource.common();
    DiscoveredDevice {
        device_type,
        manufacturer: common.manufacturer.clone().unwrap_or_default(),
        part_number: common.effective_part_number().to_string(),
        serial_number: common.serial_number.clone().unwrap_or_default(),
        parent_uri: parent_uri.to_string(),
        redfish_uri: redfish_uri.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SYSTEM: &str = r#"{
        "@odata.id": "/redfish/v1/Systems/1",
        "Id": "1",
        "Manufacturer": "HPE",
        "Model": "ProLiant BL460c Gen10",
        "SerialNumber": "ABC0001",
        "PowerState": "On",
        "Processors": {"@odata.id": "/redfish/v1/Systems/1/Processors"},
        "Memory": {"@odata.id": "/redfish/v1/Systems/1/Memory"}
    }"#;

    #[test]
    fn test_decode_system() {
        let system: RedfishSystem = decode_resource("/redfish/v1/Systems/1", SYSTEM.as_bytes()).unwrap();
        assert_eq!(system.common.manufacturer.as_deref(), Some("HPE"));
        assert_eq!(
            system.processors.unwrap().odata_id,
            "/redfish/v1/Systems/1/Processors"
        );
        assert_eq!(system.memory.unwrap().odata_id, "/redfish/v1/Systems/1/Memory");
    }

    #[test]
    fn test_decode_system_without_links() {
        let system: RedfishSystem =
            decode_resource("/redfish/v1/Systems/1", br#"{"SerialNumber":"X"}"#).unwrap();
        assert!(system.processors.is_none());
        assert!(system.memory.is_none());
    }

    #[test]
    fn test_empty_links_are_absent() {
        let system: RedfishSystem = decode_resource(
            "/redfish/v1/Systems/1",
            br#"{"SerialNumber":"X","Processors":{},"Memory":{"@odata.id":""}}"#,
        )
        .unwrap();
        assert!(system.processors.is_some());
        assert_eq!(system.processors_uri(), None);
        assert_eq!(system.memory_uri(), None);

        let system: RedfishSystem = decode_resource("/redfish/v1/Systems/1", SYSTEM.as_bytes()).unwrap();
        assert_eq!(system.processors_uri(), Some("/redfish/v1/Systems/1/Processors"));
        assert_eq!(system.memory_uri(), Some("/redfish/v1/Systems/1/Memory"));
    }

    #[test]
    fn test_decode_collection() {
        let body = br#"{"Members@odata.count":2,"Members":[
            {"@odata.id":"/redfish/v1/Systems/1"},
            {"@odata.id":"/redfish/v1/Systems/2"}
        ]}"#;
        let collection = decode_collection("/redfish/v1/Systems", body).unwrap();
        let uris: Vec<&str> = collection.member_uris().collect();
        assert_eq!(uris, vec!["/redfish/v1/Systems/1", "/redfish/v1/Systems/2"]);
    }

    #[test]
    fn test_decode_errors_are_reported() {
        let err = decode_collection("/redfish/v1/Systems", b"<html>login</html>").unwrap_err();
        assert!(matches!(err, InventoryError::Decode { ref uri, .. } if uri == "/redfish/v1/Systems"));

        // Wrong shape: Members missing
        let err = decode_collection("/redfish/v1/Systems", br#"{"Name":"Systems"}"#).unwrap_err();
        assert!(matches!(err, InventoryError::Decode { .. }));

        // Wrong type for a common field
        let err = decode_resource::<RedfishProcessor>("/p/1", br#"{"SerialNumber":42}"#).unwrap_err();
        assert!(matches!(err, InventoryError::Decode { .. }));
    }

    #[test]
    fn test_map_device_from_system() {
        let system: RedfishSystem = decode_resource("/redfish/v1/Systems/1", SYSTEM.as_bytes()).unwrap();
        let device = map_device(DeviceType::Node, &system, "/redfish/v1/Systems/1", "");
        assert_eq!(device.manufacturer, "HPE");
        assert_eq!(device.part_number, "ProLiant BL460c Gen10");
        assert_eq!(device.serial_number, "ABC0001");
        assert_eq!(device.parent_uri, "");
        assert_eq!(device.redfish_uri, "/redfish/v1/Systems/1");
    }

    #[test]
    fn test_map_device_missing_fields_are_empty() {
        let memory: RedfishMemory = decode_resource("/m/1", b"{}").unwrap();
        let device = map_device(DeviceType::Dimm, &memory, "/m/1", "/s/1");
        assert_eq!(device.manufacturer, "");
        assert_eq!(device.part_number, "");
        assert_eq!(device.serial_number, "");
        assert_eq!(device.parent_uri, "/s/1");
    }

    #[test]
    fn test_empty_part_number_falls_back_to_model() {
        let cpu: RedfishProcessor =
            decode_resource("/p/1", br#"{"Model":"Xeon Gold 6240","PartNumber":""}"#).unwrap();
        assert_eq!(cpu.common.effective_part_number(), "Xeon Gold 6240");
    }

    #[test]
    fn test_model_never_replaced_by_part_number() {
        let props = CommonProperties {
            model: None,
            part_number: Some("32GB-DDR4-2666".to_string()),
            ..Default::default()
        };
        assert_eq!(props.effective_part_number(), "32GB-DDR4-2666");
        assert_eq!(props.model, None);
    }

    fn system_json(model: &str, part: Option<&str>) -> Vec<u8> {
        let mut value = serde_json::json!({"Manufacturer": "HPE", "Model": model});
        if let Some(part) = part {
            value["PartNumber"] = serde_json::Value::String(part.to_string());
        }
        serde_json::to_vec(&value).unwrap()
    }

    proptest! {
        #[test]
        fn prop_model_substitutes_missing_part_number(model in "[A-Za-z0-9 -]{0,32}") {
            let system: RedfishSystem = decode_resource("/s/1", &system_json(&model, None)).unwrap();
            let device = map_device(DeviceType::Node, &system, "/s/1", "");
            prop_assert_eq!(device.part_number, model);
        }

        #[test]
        fn prop_part_number_takes_precedence(
            model in "[A-Za-z0-9 -]{0,32}",
            part in "[A-Za-z0-9-]{1,32}",
        ) {
            let system: RedfishSystem = decode_resource("/s/1", &system_json(&model, Some(&part))).unwrap();
            let device = map_device(DeviceType::Node, &system, "/s/1", "");
            prop_assert_eq!(device.part_number, part);
        }
    }
}
