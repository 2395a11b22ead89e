//! In-memory stand-ins for the BMC and the inventory API

use crate::config::SYSTEMS_PATH;
use crate::error::{InventoryError, Result};
use crate::inventory::{DeviceStatus, InventoryApi};
use crate::redfish::ResourceFetch;
use async_trait::async_trait;
use serde_json::json;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// In-memory Redfish tree
#[derive(Default)]
pub(crate) struct FakeBmc {
    resources: HashMap<String, Vec<u8>>,
    failures: HashMap<String, u16>,
    misconfigured: HashSet<String>,
    pub(crate) requests: Mutex<Vec<String>>,
}

impl FakeBmc {
    pub(crate) fn resource(mut self, path: &str, body: serde_json::Value) -> Self {
        self.resources.insert(path.to_string(), serde_json::to_vec(&body).unwrap());
        self
    }

    pub(crate) fn raw(mut self, path: &str, body: &[u8]) -> Self {
        self.resources.insert(path.to_string(), body.to_vec());
        self
    }

    pub(crate) fn failing(mut self, path: &str, status: u16) -> Self {
        self.failures.insert(path.to_string(), status);
        self
    }

    /// Fail `path` with an error that is neither transport nor decode
    pub(crate) fn misconfigured(mut self, path: &str) -> Self {
        self.misconfigured.insert(path.to_string());
        self
    }

    pub(crate) fn collection(self, path: &str, members: &[&str]) -> Self {
        let members: Vec<_> = members.iter().map(|m| json!({"@odata.id": m})).collect();
        self.resource(path, json!({"Members": members}))
    }

    /// One HPE system with Intel processors and Micron memory modules
    pub(crate) fn system(self, id: &str, serial: &str, cpus: &[&str], dimms: &[&str]) -> Self {
        let base = format!("/redfish/v1/Systems/{}", id);
        let cpu_uris: Vec<String> = cpus.iter().map(|c| format!("{}/Processors/{}", base, c)).collect();
        let dimm_uris: Vec<String> = dimms.iter().map(|d| format!("{}/Memory/{}", base, d)).collect();

        let mut bmc = self
            .resource(
                &base,
                json!({
                    "Manufacturer": "HPE",
                    "Model": "ProLiant-BL460c-Gen10",
                    "SerialNumber": serial,
                    "Processors": {"@odata.id": format!("{}/Processors", base)},
                    "Memory": {"@odata.id": format!("{}/Memory", base)}
                }),
            )
            .collection(
                &format!("{}/Processors", base),
                &cpu_uris.iter().map(String::as_str).collect::<Vec<_>>(),
            )
            .collection(
                &format!("{}/Memory", base),
                &dimm_uris.iter().map(String::as_str).collect::<Vec<_>>(),
            );

        for (uri, serial) in cpu_uris.iter().zip(cpus) {
            bmc = bmc.resource(
                uri,
                json!({"Manufacturer": "Intel", "Model": "Xeon-Gold-6240", "SerialNumber": serial}),
            );
        }
        for (uri, serial) in dimm_uris.iter().zip(dimms) {
            bmc = bmc.resource(
                uri,
                json!({"Manufacturer": "Micron", "PartNumber": "32GB-DDR4-2666", "SerialNumber": serial}),
            );
        }
        bmc
    }

    /// Single system `1` with one CPU and one DIMM
    pub(crate) fn single_node() -> Self {
        Self::default()
            .collection(SYSTEMS_PATH, &["/redfish/v1/Systems/1"])
            .system("1", "ABC0001", &["CPU0002"], &["DIMM0003"])
    }
}

#[async_trait]
impl ResourceFetch for FakeBmc {
    async fn get(&self, path: &str) -> Result<Vec<u8>> {
        self.requests.lock().unwrap().push(path.to_string());
        if self.misconfigured.contains(path) {
            return Err(InventoryError::config(format!("no credentials for {}", path)));
        }
        if let Some(status) = self.failures.get(path) {
            return Err(InventoryError::unexpected_status(path, *status));
        }
        self.resources
            .get(path)
            .cloned()
            .ok_or_else(|| InventoryError::unexpected_status(path, 404))
    }
}

/// One call seen by [`FakeInventory`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum InventoryCall {
    Create(String),
    Attach(String, DeviceStatus),
}

/// Recording inventory API handing out `dev-<n>` uids
#[derive(Default)]
pub(crate) struct FakeInventory {
    pub(crate) calls: Mutex<Vec<InventoryCall>>,
    missing_uid_for: HashSet<String>,
    reject_status_for: HashSet<String>,
}

impl FakeInventory {
    /// Answer creation of `name` without a uid
    pub(crate) fn without_uid_for(mut self, name: &str) -> Self {
        self.missing_uid_for.insert(name.to_string());
        self
    }

    /// Reject the status update for `uid`
    pub(crate) fn rejecting_status_for(mut self, uid: &str) -> Self {
        self.reject_status_for.insert(uid.to_string());
        self
    }

    pub(crate) fn calls(&self) -> Vec<InventoryCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl InventoryApi for FakeInventory {
    async fn create_envelope(&self, name: &str) -> Result<String> {
        let mut calls = self.calls.lock().unwrap();
        calls.push(InventoryCall::Create(name.to_string()));
        if self.missing_uid_for.contains(name) {
            return Err(InventoryError::envelope(name, "response has no metadata.uid"));
        }
        let created = calls
            .iter()
            .filter(|c| matches!(c, InventoryCall::Create(_)))
            .count();
        Ok(format!("dev-{}", created))
    }

    async fn attach_status(&self, uid: &str, status: &DeviceStatus) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(InventoryCall::Attach(uid.to_string(), status.clone()));
        if self.reject_status_for.contains(uid) {
            return Err(InventoryError::StatusUpdate {
                uid: uid.to_string(),
                status: 500,
            });
        }
        Ok(())
    }
}
