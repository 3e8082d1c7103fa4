//! Builds request trees against a [`Network`].
//!
//! Each node is satisfied in three passes, stopping as soon as nothing is
//! missing:
//!
//! 1. **Surplus** -- claim extra promises other crafts in the tree left behind.
//! 2. **Stock** -- ask suppliers in registration order, minus whatever the
//!    tree already promised from them.
//! 3. **Crafting** -- hand the remainder to the first crafter with a recipe,
//!    record any overshoot as an extra promise, and recurse into one
//!    sub-request per ingredient.
//!
//! Shortfalls stay in the tree as missing counts.

use crate::config::ResolverConfig;
use crate::network::{Network, Recipe};
use logistics_core::id::{RequestNodeId, RequesterId};
use logistics_core::item::{ItemIdentity, ItemQuantity};
use logistics_core::promise::{ExtraPromise, Promise, ProviderRef};
use logistics_core::tree::{RequestError, RequestNode, RequestTree};

/// Turns a top-level request into a resolved [`RequestTree`].
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    network: &'a Network,
    config: ResolverConfig,
}

impl<'a> Resolver<'a> {
    pub fn new(network: &'a Network, config: ResolverConfig) -> Self {
        Self { network, config }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Build and resolve the tree for `request`.
    pub fn build(
        &self,
        request: ItemQuantity,
        requester: RequesterId,
    ) -> Result<RequestTree, RequestError> {
        tracing::debug!(%request, "resolving request");
        let mut tree = RequestTree::with_max_depth(request, requester, self.config.max_depth);
        let root = tree.root();
        self.resolve(&mut tree, root)?;
        Ok(tree)
    }

    fn resolve(&self, tree: &mut RequestTree, node: RequestNodeId) -> Result<(), RequestError> {
        let item = node_of(tree, node)?.item();
        // Never claim surplus of an item still being crafted up the chain.
        let looped = tree.ancestors(node).any(|(_, a)| a.item() == item);

        if self.config.use_extras && !looped {
            self.claim_extras(tree, node, item)?;
        }
        self.take_stock(tree, node, item)?;
        if self.config.allow_crafting {
            self.craft(tree, node, item)?;
        }
        Ok(())
    }

    fn claim_extras(
        &self,
        tree: &mut RequestTree,
        node: RequestNodeId,
        item: ItemIdentity,
    ) -> Result<(), RequestError> {
        for extra in tree.extras_for(item) {
            let missing = node_of(tree, node)?.missing_count();
            if missing == 0 {
                break;
            }
            let take = extra.quantity.min(missing);
            if take == 0 {
                continue;
            }
            let claim = ExtraPromise {
                quantity: take,
                ..extra
            };
            tracing::debug!(provider = claim.provider.id.0, %item, take, "claiming surplus");
            tree.add_promise(node, Promise::from_extra(&claim))?;
        }
        Ok(())
    }

    fn take_stock(
        &self,
        tree: &mut RequestTree,
        node: RequestNodeId,
        item: ItemIdentity,
    ) -> Result<(), RequestError> {
        for (provider, stock) in self.network.suppliers() {
            let missing = node_of(tree, node)?.missing_count();
            if missing == 0 {
                break;
            }
            let available = stock
                .available(item)
                .saturating_sub(tree.total_promised(provider.id, item));
            let take = available.min(missing);
            if take > 0 {
                tracing::debug!(provider = provider.id.0, %item, take, "promising stock");
                tree.add_promise(node, Promise::ordinary(item, take, provider))?;
            }
        }
        Ok(())
    }

    fn craft(
        &self,
        tree: &mut RequestTree,
        node: RequestNodeId,
        item: ItemIdentity,
    ) -> Result<(), RequestError> {
        let (missing, depth, requester) = {
            let n = node_of(tree, node)?;
            (n.missing_count(), n.depth(), n.requester())
        };
        if missing == 0 {
            return Ok(());
        }
        let Some((crafter, recipe)) = self.find_recipe(item) else {
            return Ok(());
        };
        if depth >= self.config.max_depth {
            tracing::warn!(%item, depth, "crafting chain too deep, leaving request short");
            return Ok(());
        }
        if tree.ancestors(node).any(|(_, a)| a.item() == item) {
            tracing::warn!(%item, "recipe loops back on itself, leaving request short");
            return Ok(());
        }

        let per_craft = recipe.output.quantity();
        let crafts = missing.div_ceil(per_craft);
        let produced = crafts.saturating_mul(per_craft);
        tracing::debug!(provider = crafter.id.0, %item, crafts, "planning craft");

        tree.add_promise(node, Promise::ordinary(item, missing, crafter))?;
        if produced > missing {
            tree.add_extra_promise(node, ExtraPromise::new(item, produced - missing, crafter))?;
        }

        for ingredient in &recipe.ingredients {
            let needed = ingredient.quantity().saturating_mul(crafts);
            if needed == 0 {
                continue;
            }
            let child = tree.add_child(node, ingredient.with_quantity(needed), requester)?;
            self.resolve(tree, child)?;
        }
        Ok(())
    }

    /// The first crafter, in registration order, able to make `item`.
    fn find_recipe(&self, item: ItemIdentity) -> Option<(ProviderRef, &'a Recipe)> {
        self.network
            .crafters()
            .find_map(|(provider, crafter)| crafter.recipe_for(item).map(|r| (provider, r)))
    }
}

fn node_of(tree: &RequestTree, id: RequestNodeId) -> Result<&RequestNode, RequestError> {
    tree.node(id).ok_or(RequestError::NodeNotFound(id))
}
