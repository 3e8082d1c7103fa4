//! Logistics Data -- network definitions from RON, TOML or JSON files.

pub mod loader;
pub mod schema;

pub use loader::{load_network, load_network_dir, DataLoadError, LoadedNetwork};
