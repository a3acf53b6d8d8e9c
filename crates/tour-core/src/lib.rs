pub mod allowlist;
pub mod anchor;
pub mod bus;
pub mod catalog;
pub mod config;
pub mod error;
pub mod keys;
pub mod navigation;
pub mod orchestrator;
pub mod runtime;
pub mod schema;
pub mod step;
pub mod store;
pub mod trigger;
pub mod types;

pub use error::{Result, TourError};
