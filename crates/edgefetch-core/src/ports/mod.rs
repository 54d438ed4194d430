//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces that the acquisition engine expects from
//! infrastructure. They contain no implementation details and use only domain
//! types.

pub mod hub;
pub mod system_download;

pub use hub::HubClientPort;
pub use system_download::{
    SystemDownloadRequest, SystemDownloadService, SystemJobId, SystemJobStatus,
};
