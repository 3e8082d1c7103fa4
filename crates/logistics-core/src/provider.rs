//! The seam between a request tree and the entities that move items.

use crate::id::{ProviderId, RequesterId};
use crate::promise::Promise;

/// Outbound calls made while committing a request tree.
///
/// Both calls are fire-and-forget: the tree neither waits for nor inspects
/// the outcome. Transport, retries and vanished entities are the
/// implementor's concern.
pub trait ProviderNetwork {
    /// Deliver the promised items to `requester`.
    fn fulfill(&mut self, promise: &Promise, requester: RequesterId);

    /// Tell a crafting provider that `quantity` of its surplus output is
    /// reserved by the committed tree.
    fn register_extras(&mut self, provider: ProviderId, quantity: u32);
}
