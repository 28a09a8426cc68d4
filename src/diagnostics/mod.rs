//! Non-manifest snapshots collected alongside the resources.

pub mod alerts;
pub mod etcd;
