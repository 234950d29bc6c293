//! Port traits: abstract interfaces for external dependencies.

pub mod config_port;
pub mod dataset_port;
pub mod render_port;
