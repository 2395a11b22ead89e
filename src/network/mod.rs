//! Network transport module
//!
//! TLS setup shared by the Redfish client and the inventory API client.
//!
//! | Peer | Verification | Why |
//! |------|--------------|-----|
//! | BMC | None, or pinned CA bundle | Controllers ship self-signed certs |
//! | Inventory API | webpki roots | Regular service certificate |

mod tls;

pub use tls::*;
