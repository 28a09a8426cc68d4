pub mod session;

pub use session::{Session, no_resources_message};
