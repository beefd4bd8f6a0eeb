//! 业务逻辑层（Service）

mod govee_client;
mod snapshot_service;

pub use govee_client::GoveeClient;
pub use snapshot_service::{Snapshot, SnapshotService};
