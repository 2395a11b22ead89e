//! Redfish discovery module
//!
//! Reads hardware inventory from a BMC's Redfish service:
//! - `client`: authenticated GETs against `https://<bmc>/redfish/v1`
//! - `schema`: typed System / Processor / Memory resources and the
//!   mapping to device records
//! - `discovery`: the `Systems -> Processors / Memory` walk
//!
//! ## Resource Graph
//!
//! ```text
//! /redfish/v1/Systems                    collection
//!   /redfish/v1/Systems/{id}             -> Node
//!     .../Processors/{id}                -> CPU
//!     .../Memory/{id}                    -> DIMM
//! ```

mod client;
mod discovery;
mod schema;

pub use client::*;
pub use discovery::*;
pub use schema::*;
