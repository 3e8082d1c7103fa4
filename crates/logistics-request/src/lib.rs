//! Logistics Request -- resolving item requests against a supply network.
//!
//! [`network::Network`] describes who holds what and who can craft what.
//! [`resolver::Resolver`] turns a request into a
//! [`logistics_core::tree::RequestTree`], and [`manager::RequestManager`]
//! commits complete plans or reports what is missing.

pub mod config;
pub mod manager;
pub mod network;
pub mod resolver;

pub use config::ResolverConfig;
pub use manager::{RequestManager, RequestOutcome, Simulation};
pub use network::{Crafter, Delivery, Network, NetworkError, Recipe, StockProvider};
pub use resolver::Resolver;
