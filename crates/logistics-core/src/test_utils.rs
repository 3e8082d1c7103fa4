//! Shared test helpers for unit and integration tests.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]` so dependent
//! crates can reuse them through the `test-utils` feature.

use crate::id::*;
use crate::item::ItemIdentity;
use crate::promise::{Promise, ProviderRef};
use crate::provider::ProviderNetwork;

// ===========================================================================
// Item constructors
// ===========================================================================

pub fn logs() -> ItemIdentity {
    ItemIdentity::plain(17, 0)
}
pub fn planks() -> ItemIdentity {
    ItemIdentity::plain(5, 0)
}
pub fn sticks() -> ItemIdentity {
    ItemIdentity::plain(280, 0)
}
pub fn chest() -> ItemIdentity {
    ItemIdentity::plain(54, 0)
}
pub fn cobblestone() -> ItemIdentity {
    ItemIdentity::plain(4, 0)
}
pub fn furnace() -> ItemIdentity {
    ItemIdentity::plain(61, 0)
}
pub fn iron_ingot() -> ItemIdentity {
    ItemIdentity::plain(265, 0)
}
pub fn piston() -> ItemIdentity {
    ItemIdentity::plain(33, 0)
}

// ===========================================================================
// Entity constructors
// ===========================================================================

pub fn requester() -> RequesterId {
    RequesterId(0)
}

pub fn supplier(id: u32) -> ProviderRef {
    ProviderRef::supplier(ProviderId(id))
}

pub fn crafter(id: u32) -> ProviderRef {
    ProviderRef::crafter(ProviderId(id))
}

// ===========================================================================
// Recording provider network
// ===========================================================================

/// A [`ProviderNetwork`] that only records the calls it receives.
#[derive(Debug, Default)]
pub struct RecordingNetwork {
    /// (item, quantity, provider, requester) per `fulfill` call.
    pub fulfilled: Vec<(ItemIdentity, u32, ProviderId, RequesterId)>,
    /// (provider, quantity) per `register_extras` call.
    pub registered: Vec<(ProviderId, u32)>,
}

impl ProviderNetwork for RecordingNetwork {
    fn fulfill(&mut self, promise: &Promise, requester: RequesterId) {
        self.fulfilled
            .push((promise.item, promise.quantity, promise.provider.id, requester));
    }

    fn register_extras(&mut self, provider: ProviderId, quantity: u32) {
        self.registered.push((provider, quantity));
    }
}
