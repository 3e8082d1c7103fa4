//! Logistics Core -- request trees for an item-logistics network.
//!
//! A request for some quantity of an item is decomposed into a tree: the
//! root asks for the item itself, and whenever the item is crafted each
//! ingredient becomes a sub-request. Providers attach promises of supply to
//! nodes; crafters may also leave surplus behind as extra promises that
//! other nodes in the same tree can claim.
//!
//! # Lifecycle
//!
//! 1. **Build** -- a resolver creates nodes and attaches promises.
//! 2. **Query** -- [`tree::RequestTree::total_promised`] and
//!    [`tree::RequestTree::extras_for`] answer how much is already spoken
//!    for while building.
//! 3. **Commit** -- [`tree::RequestTree::fulfill_all`] hands every promise to
//!    a [`provider::ProviderNetwork`] exactly once.
//! 4. **Report** -- missing and used items go to a [`log::RequestLog`],
//!    compressed to one entry per item.
//!
//! Everything is single-threaded and synchronous; a tree belongs to one
//! request and is dropped after commit.
//!
//! # Key Types
//!
//! - [`item::ItemIdentity`] / [`item::ItemQuantity`] -- what, and how many.
//! - [`promise::Promise`] / [`promise::ExtraPromise`] -- supply commitments.
//! - [`tree::RequestTree`] -- arena-backed request tree.
//! - [`log::ItemMessage`] -- one line of a request report.

pub mod id;
pub mod item;
pub mod log;
pub mod promise;
pub mod provider;
pub mod tree;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
