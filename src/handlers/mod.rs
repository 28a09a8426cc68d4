// Handler modules
pub mod alerts;
pub mod describe;
pub mod etcd;
pub mod events;
pub mod get;
pub mod haproxy;
pub mod logs;
pub mod mustgather;
pub mod node_logs;
pub mod project;
pub mod version;

// Re-export all handler functions
pub use alerts::handle_alert;
pub use describe::handle_describe;
pub use etcd::handle_etcd;
pub use events::handle_events;
pub use get::handle_get;
pub use haproxy::handle_haproxy;
pub use logs::handle_logs;
pub use mustgather::{handle_mg, handle_use};
pub use node_logs::handle_node_logs;
pub use project::{handle_project, handle_projects};
pub use version::handle_version;
