use crate::id::ProviderId;
use crate::item::ItemIdentity;
use serde::{Deserialize, Serialize};

/// A reference to a providing entity plus its capabilities.
///
/// Crafting support is carried as a flag so commit and reporting can query it
/// instead of inspecting the provider itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProviderRef {
    pub id: ProviderId,
    pub crafts: bool,
}

impl ProviderRef {
    /// A plain supplier: hands out items it already holds.
    pub const fn supplier(id: ProviderId) -> Self {
        Self { id, crafts: false }
    }

    /// A crafting-capable provider.
    pub const fn crafter(id: ProviderId) -> Self {
        Self { id, crafts: true }
    }
}

/// Where a promise's supply comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PromiseKind {
    /// Supply the provider already has or will produce for this request.
    Ordinary,
    /// Supply taken from another request's surplus. `provided` marks
    /// surplus that has already been accounted for and must not be
    /// subtracted from the shared pool again.
    Extra { provided: bool },
}

/// A provider's commitment to deliver `quantity` of `item` to a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Promise {
    pub item: ItemIdentity,
    pub quantity: u32,
    pub provider: ProviderRef,
    pub kind: PromiseKind,
}

impl Promise {
    pub fn ordinary(item: ItemIdentity, quantity: u32, provider: ProviderRef) -> Self {
        Self {
            item,
            quantity,
            provider,
            kind: PromiseKind::Ordinary,
        }
    }

    /// Claim (part of) a surplus as a promise to another request.
    pub fn from_extra(extra: &ExtraPromise) -> Self {
        Self {
            item: extra.item,
            quantity: extra.quantity,
            provider: extra.provider,
            kind: PromiseKind::Extra {
                provided: extra.provided,
            },
        }
    }

    pub fn is_extra(&self) -> bool {
        matches!(self.kind, PromiseKind::Extra { .. })
    }

    /// Extra promise whose quantity still draws from the shared surplus.
    pub fn is_unprovided_extra(&self) -> bool {
        matches!(self.kind, PromiseKind::Extra { provided: false })
    }
}

/// Surplus a crafting provider will produce beyond what its request needs.
///
/// Sibling requests in the same tree may claim it. `Clone` produces an
/// independent copy, so handing copies out never touches the stored value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraPromise {
    pub item: ItemIdentity,
    pub quantity: u32,
    pub provider: ProviderRef,
    pub provided: bool,
}

impl ExtraPromise {
    pub fn new(item: ItemIdentity, quantity: u32, provider: ProviderRef) -> Self {
        Self {
            item,
            quantity,
            provider,
            provided: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glass() -> ItemIdentity {
        ItemIdentity::plain(20, 0)
    }

    #[test]
    fn ordinary_promise_is_not_extra() {
        let p = Promise::ordinary(glass(), 4, ProviderRef::supplier(ProviderId(1)));
        assert!(!p.is_extra());
        assert!(!p.is_unprovided_extra());
    }

    #[test]
    fn promise_from_extra_keeps_provider_and_flag() {
        let mut extra = ExtraPromise::new(glass(), 3, ProviderRef::crafter(ProviderId(7)));
        let p = Promise::from_extra(&extra);
        assert!(p.is_unprovided_extra());
        assert_eq!(p.provider, ProviderRef::crafter(ProviderId(7)));
        assert_eq!(p.quantity, 3);

        extra.provided = true;
        let p = Promise::from_extra(&extra);
        assert!(p.is_extra());
        assert!(!p.is_unprovided_extra());
    }

    #[test]
    fn extra_copy_is_independent() {
        let original = ExtraPromise::new(glass(), 5, ProviderRef::crafter(ProviderId(2)));
        let mut copy = original.clone();
        copy.quantity = 0;
        assert_eq!(original.quantity, 5);
    }

    #[test]
    fn provider_ref_constructors() {
        assert!(!ProviderRef::supplier(ProviderId(0)).crafts);
        assert!(ProviderRef::crafter(ProviderId(0)).crafts);
    }
}
