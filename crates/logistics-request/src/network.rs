use logistics_core::id::{ProviderId, RequesterId};
use logistics_core::item::{ItemIdentity, ItemQuantity};
use logistics_core::promise::{Promise, ProviderRef};
use logistics_core::provider::ProviderNetwork;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors raised while registering network members.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NetworkError {
    #[error("duplicate provider id: {0:?}")]
    DuplicateProvider(ProviderId),
    #[error("provider not found: {0:?}")]
    ProviderNotFound(ProviderId),
    #[error("provider {0:?} is not a crafter")]
    NotACrafter(ProviderId),
    #[error("provider {0:?} is not a supplier")]
    NotASupplier(ProviderId),
    #[error("recipe for {0} has zero output")]
    EmptyRecipe(ItemIdentity),
}

// ---------------------------------------------------------------------------
// Members
// ---------------------------------------------------------------------------

/// A recipe a crafter can run: ingredients in, `output` out, per craft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub output: ItemQuantity,
    pub ingredients: Vec<ItemQuantity>,
}

/// A provider holding items in an inventory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockProvider {
    pub stock: BTreeMap<ItemIdentity, u32>,
}

impl StockProvider {
    pub fn available(&self, item: ItemIdentity) -> u32 {
        self.stock.get(&item).copied().unwrap_or(0)
    }
}

/// A provider that crafts items on demand.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crafter {
    pub recipes: Vec<Recipe>,
    /// Surplus output reserved by committed requests.
    pub reserved_extras: u32,
}

impl Crafter {
    pub fn recipe_for(&self, item: ItemIdentity) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.output.item() == item)
    }
}

/// An item handed to a requester during commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub provider: ProviderId,
    pub requester: RequesterId,
    pub stack: ItemQuantity,
    /// True when the items are produced by crafting rather than taken from stock.
    pub crafted: bool,
}

// ---------------------------------------------------------------------------
// Network
// ---------------------------------------------------------------------------

/// Every provider reachable by a request, in registration order.
///
/// Order matters: the resolver asks suppliers and crafters in the order they
/// were added. Implements [`ProviderNetwork`] by debiting stock and
/// recording deliveries, standing in for the transport layer.
#[derive(Debug, Clone, Default)]
pub struct Network {
    suppliers: Vec<(ProviderId, StockProvider)>,
    crafters: Vec<(ProviderId, Crafter)>,
    deliveries: Vec<Delivery>,
}

impl Network {
    pub fn new() -> Self {
        Self::default()
    }

    fn contains(&self, id: ProviderId) -> bool {
        self.suppliers.iter().any(|(s, _)| *s == id) || self.crafters.iter().any(|(c, _)| *c == id)
    }

    // -- Registration --

    pub fn add_supplier(&mut self, id: ProviderId) -> Result<(), NetworkError> {
        if self.contains(id) {
            return Err(NetworkError::DuplicateProvider(id));
        }
        self.suppliers.push((id, StockProvider::default()));
        Ok(())
    }

    pub fn add_crafter(&mut self, id: ProviderId) -> Result<(), NetworkError> {
        if self.contains(id) {
            return Err(NetworkError::DuplicateProvider(id));
        }
        self.crafters.push((id, Crafter::default()));
        Ok(())
    }

    /// Add items to a supplier's inventory.
    pub fn add_stock(&mut self, id: ProviderId, stack: ItemQuantity) -> Result<(), NetworkError> {
        let supplier = self.supplier_mut(id)?;
        let entry = supplier.stock.entry(stack.item()).or_insert(0);
        *entry = entry.saturating_add(stack.quantity());
        Ok(())
    }

    pub fn add_recipe(&mut self, id: ProviderId, recipe: Recipe) -> Result<(), NetworkError> {
        if recipe.output.is_empty() {
            return Err(NetworkError::EmptyRecipe(recipe.output.item()));
        }
        let Some(index) = self.crafters.iter().position(|(c, _)| *c == id) else {
            return Err(self.missing_member(id, NetworkError::NotACrafter));
        };
        self.crafters[index].1.recipes.push(recipe);
        Ok(())
    }

    fn supplier_mut(&mut self, id: ProviderId) -> Result<&mut StockProvider, NetworkError> {
        match self.suppliers.iter().position(|(s, _)| *s == id) {
            Some(index) => Ok(&mut self.suppliers[index].1),
            None => Err(self.missing_member(id, NetworkError::NotASupplier)),
        }
    }

    /// `wrong_kind` when `id` is registered as the other kind of member.
    fn missing_member(
        &self,
        id: ProviderId,
        wrong_kind: fn(ProviderId) -> NetworkError,
    ) -> NetworkError {
        if self.contains(id) {
            wrong_kind(id)
        } else {
            NetworkError::ProviderNotFound(id)
        }
    }

    // -- Queries --

    /// Suppliers with their inventories, in registration order.
    pub fn suppliers(&self) -> impl Iterator<Item = (ProviderRef, &StockProvider)> {
        self.suppliers
            .iter()
            .map(|(id, s)| (ProviderRef::supplier(*id), s))
    }

    /// Crafters with their recipes, in registration order.
    pub fn crafters(&self) -> impl Iterator<Item = (ProviderRef, &Crafter)> {
        self.crafters
            .iter()
            .map(|(id, c)| (ProviderRef::crafter(*id), c))
    }

    pub fn supplier(&self, id: ProviderId) -> Option<&StockProvider> {
        self.suppliers.iter().find(|(s, _)| *s == id).map(|(_, s)| s)
    }

    pub fn crafter(&self, id: ProviderId) -> Option<&Crafter> {
        self.crafters.iter().find(|(c, _)| *c == id).map(|(_, c)| c)
    }

    /// Items held by `id`, zero for unknown providers and crafters.
    pub fn stock_of(&self, id: ProviderId, item: ItemIdentity) -> u32 {
        self.supplier(id).map_or(0, |s| s.available(item))
    }

    /// Every delivery made so far, in commit order.
    pub fn deliveries(&self) -> &[Delivery] {
        &self.deliveries
    }

    /// Take the recorded deliveries, leaving the log empty.
    pub fn drain_deliveries(&mut self) -> Vec<Delivery> {
        std::mem::take(&mut self.deliveries)
    }
}

impl ProviderNetwork for Network {
    fn fulfill(&mut self, promise: &Promise, requester: RequesterId) {
        let crafted = promise.provider.crafts;
        if !crafted {
            match self.suppliers.iter_mut().find(|(s, _)| *s == promise.provider.id) {
                Some((_, supplier)) => {
                    let held = supplier.available(promise.item);
                    if held < promise.quantity {
                        tracing::warn!(
                            provider = promise.provider.id.0,
                            item = %promise.item,
                            held,
                            promised = promise.quantity,
                            "supplier holds less than promised"
                        );
                    }
                    let left = held.saturating_sub(promise.quantity);
                    if left == 0 {
                        supplier.stock.remove(&promise.item);
                    } else {
                        supplier.stock.insert(promise.item, left);
                    }
                }
                None => {
                    tracing::warn!(provider = promise.provider.id.0, "fulfill for unknown supplier");
                    return;
                }
            }
        }
        self.deliveries.push(Delivery {
            provider: promise.provider.id,
            requester,
            stack: promise.item.stack(promise.quantity),
            crafted,
        });
    }

    fn register_extras(&mut self, provider: ProviderId, quantity: u32) {
        match self.crafters.iter_mut().find(|(c, _)| *c == provider) {
            Some((_, crafter)) => {
                crafter.reserved_extras = crafter.reserved_extras.saturating_add(quantity);
            }
            None => tracing::warn!(provider = provider.0, "extras registered for unknown crafter"),
        }
    }
}
