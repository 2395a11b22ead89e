//! Inventory API module
//!
//! Device records and the client that registers them.
//!
//! ## API Endpoints
//!
//! | Endpoint | Method | Description |
//! |----------|--------|-------------|
//! | `/devices` | POST | Create a device envelope, returns `metadata.uid` |
//! | `/devices/{uid}/status` | PUT | Attach observed status to an envelope |

mod models;
mod registration;

pub use models::*;
pub use registration::*;
