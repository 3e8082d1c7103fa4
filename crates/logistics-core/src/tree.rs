use crate::id::*;
use crate::item::{ItemIdentity, ItemQuantity};
use crate::log::{ItemMessage, RequestLog};
use crate::promise::{ExtraPromise, Promise};
use crate::provider::ProviderNetwork;
use slotmap::SlotMap;

/// Default limit on how many crafting levels a tree may nest.
pub const DEFAULT_MAX_DEPTH: usize = 16;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors raised while building a request tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    #[error("request node not found: {0:?}")]
    NodeNotFound(RequestNodeId),
    #[error("sub-request at depth {depth} exceeds the limit of {max_depth}")]
    DepthExceeded { depth: usize, max_depth: usize },
}

// ---------------------------------------------------------------------------
// Nodes
// ---------------------------------------------------------------------------

/// One requested item and everything promised towards it.
#[derive(Debug, Clone)]
pub struct RequestNode {
    request: ItemQuantity,
    requester: RequesterId,
    parent: Option<RequestNodeId>,
    depth: usize,
    /// Supply satisfying this request, in the order it was promised.
    promises: Vec<Promise>,
    /// Surplus this node's crafting will produce for the rest of the tree.
    extra_promises: Vec<ExtraPromise>,
    /// One sub-request per crafting ingredient.
    children: Vec<RequestNodeId>,
}

impl RequestNode {
    fn new(
        request: ItemQuantity,
        requester: RequesterId,
        parent: Option<RequestNodeId>,
        depth: usize,
    ) -> Self {
        Self {
            request,
            requester,
            parent,
            depth,
            promises: Vec::new(),
            extra_promises: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn request(&self) -> &ItemQuantity {
        &self.request
    }

    pub fn item(&self) -> ItemIdentity {
        self.request.item()
    }

    pub fn requester(&self) -> RequesterId {
        self.requester
    }

    pub fn parent(&self) -> Option<RequestNodeId> {
        self.parent
    }

    /// Number of crafting levels above this node. The root is at depth 0.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn promises(&self) -> &[Promise] {
        &self.promises
    }

    pub fn extra_promises(&self) -> &[ExtraPromise] {
        &self.extra_promises
    }

    pub fn children(&self) -> &[RequestNodeId] {
        &self.children
    }

    /// Total quantity promised directly to this node.
    pub fn promised_count(&self) -> u32 {
        self.promises
            .iter()
            .fold(0u32, |acc, p| acc.saturating_add(p.quantity))
    }

    /// Requested quantity not covered by any promise.
    pub fn missing_count(&self) -> u32 {
        self.request.quantity().saturating_sub(self.promised_count())
    }

    /// Quantity promised by plain suppliers, i.e. taken from existing stock.
    pub fn used_count(&self) -> u32 {
        self.promises
            .iter()
            .filter(|p| !p.provider.crafts)
            .fold(0u32, |acc, p| acc.saturating_add(p.quantity))
    }
}

// ---------------------------------------------------------------------------
// RequestTree
// ---------------------------------------------------------------------------

/// Summary of a committed tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitSummary {
    /// Number of `fulfill` calls made.
    pub fulfilled: usize,
    /// Number of `register_extras` calls made.
    pub extras_registered: usize,
}

/// The decomposition of one top-level request into itself plus the
/// sub-requests for its crafting ingredients.
///
/// Nodes live in a `SlotMap` arena and refer to each other by
/// [`RequestNodeId`]; parents own the ordered list of their children. Every
/// traversal visits a parent before its children and children in insertion
/// order, since extras reconciliation depends on that order.
#[derive(Debug, Clone)]
pub struct RequestTree {
    nodes: SlotMap<RequestNodeId, RequestNode>,
    root: RequestNodeId,
    max_depth: usize,
}

impl RequestTree {
    /// Create a tree holding only the root request.
    pub fn new(request: ItemQuantity, requester: RequesterId) -> Self {
        Self::with_max_depth(request, requester, DEFAULT_MAX_DEPTH)
    }

    /// Like [`RequestTree::new`], with a custom limit on sub-request depth.
    pub fn with_max_depth(request: ItemQuantity, requester: RequesterId, max_depth: usize) -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(RequestNode::new(request, requester, None, 0));
        Self {
            nodes,
            root,
            max_depth,
        }
    }

    // -- Construction --

    /// Attach a sub-request under `parent`.
    pub fn add_child(
        &mut self,
        parent: RequestNodeId,
        request: ItemQuantity,
        requester: RequesterId,
    ) -> Result<RequestNodeId, RequestError> {
        let depth = self
            .nodes
            .get(parent)
            .ok_or(RequestError::NodeNotFound(parent))?
            .depth
            + 1;
        if depth > self.max_depth {
            return Err(RequestError::DepthExceeded {
                depth,
                max_depth: self.max_depth,
            });
        }

        let child = self
            .nodes
            .insert(RequestNode::new(request, requester, Some(parent), depth));
        self.node_mut(parent)?.children.push(child);
        Ok(child)
    }

    /// Record a promise satisfying `node` directly.
    pub fn add_promise(&mut self, node: RequestNodeId, promise: Promise) -> Result<(), RequestError> {
        self.node_mut(node)?.promises.push(promise);
        Ok(())
    }

    /// Record surplus produced while satisfying `node`.
    pub fn add_extra_promise(
        &mut self,
        node: RequestNodeId,
        extra: ExtraPromise,
    ) -> Result<(), RequestError> {
        self.node_mut(node)?.extra_promises.push(extra);
        Ok(())
    }

    fn node_mut(&mut self, id: RequestNodeId) -> Result<&mut RequestNode, RequestError> {
        self.nodes.get_mut(id).ok_or(RequestError::NodeNotFound(id))
    }

    // -- Structure queries --

    pub fn root(&self) -> RequestNodeId {
        self.root
    }

    pub fn root_node(&self) -> &RequestNode {
        &self.nodes[self.root]
    }

    pub fn node(&self, id: RequestNodeId) -> Option<&RequestNode> {
        self.nodes.get(id)
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a tree holds at least its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Walk from `id` up to the root, starting with `id`'s parent.
    pub fn ancestors(&self, id: RequestNodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.nodes.get(id).and_then(|n| n.parent),
        }
    }

    /// Visit every node, parents before children, children in insertion order.
    pub fn iter_preorder(&self) -> Preorder<'_> {
        Preorder {
            tree: self,
            stack: vec![self.root],
        }
    }

    /// True when no node in the tree is missing anything.
    pub fn is_complete(&self) -> bool {
        self.iter_preorder().all(|(_, node)| node.missing_count() == 0)
    }

    // -- Aggregate queries --

    /// Sum of every promise in the tree made by `provider` for `item`.
    pub fn total_promised(&self, provider: ProviderId, item: ItemIdentity) -> u32 {
        self.iter_preorder()
            .flat_map(|(_, node)| node.promises.iter())
            .filter(|p| p.provider.id == provider && p.item == item)
            .fold(0u32, |acc, p| acc.saturating_add(p.quantity))
    }

    /// Surplus of `item` still available to claim, one entry per extra
    /// promise in the tree.
    ///
    /// Returned entries are copies. Every unprovided extra promise already
    /// claimed somewhere in the tree is subtracted from the entries of the
    /// same provider, in list order: an entry that covers the claim is
    /// lowered and the walk stops, a smaller one is drained to zero and the
    /// remainder carries to the next entry.
    pub fn extras_for(&self, item: ItemIdentity) -> Vec<ExtraPromise> {
        let mut extras: Vec<ExtraPromise> = self
            .iter_preorder()
            .flat_map(|(_, node)| node.extra_promises.iter())
            .filter(|extra| extra.item == item)
            .cloned()
            .collect();

        let claims = self
            .iter_preorder()
            .flat_map(|(_, node)| node.promises.iter())
            .filter(|p| p.item == item && p.is_unprovided_extra());
        for claim in claims {
            let mut used = claim.quantity;
            for extra in extras
                .iter_mut()
                .filter(|e| e.provider.id == claim.provider.id)
            {
                if extra.quantity >= used {
                    extra.quantity -= used;
                    break;
                }
                used -= extra.quantity;
                extra.quantity = 0;
            }
        }

        extras
    }

    // -- Commit --

    /// Commit every promise in the tree.
    ///
    /// Each promise is handed to `providers.fulfill` with its node's
    /// requester; each extra promise from a crafting provider is registered
    /// with `providers.register_extras`. Consumes the tree so a plan cannot
    /// be committed twice.
    pub fn fulfill_all<P>(self, providers: &mut P) -> CommitSummary
    where
        P: ProviderNetwork + ?Sized,
    {
        let mut summary = CommitSummary::default();
        for (_, node) in self.iter_preorder() {
            for promise in &node.promises {
                tracing::debug!(
                    provider = promise.provider.id.0,
                    item = %promise.item,
                    quantity = promise.quantity,
                    "fulfilling promise"
                );
                providers.fulfill(promise, node.requester);
                summary.fulfilled += 1;
            }
            for extra in node.extra_promises.iter().filter(|e| e.provider.crafts) {
                providers.register_extras(extra.provider.id, extra.quantity);
                summary.extras_registered += 1;
            }
        }
        tracing::info!(
            item = %self.root_node().item(),
            fulfilled = summary.fulfilled,
            extras = summary.extras_registered,
            "request tree committed"
        );
        summary
    }

    // -- Reporting --

    /// One compressed entry per item some node is still missing.
    pub fn missing_messages(&self) -> Vec<ItemMessage> {
        let mut missing: Vec<ItemMessage> = self
            .iter_preorder()
            .filter(|(_, node)| node.missing_count() != 0)
            .map(|(_, node)| ItemMessage::new(node.request.with_quantity(node.missing_count())))
            .collect();
        ItemMessage::compress(&mut missing);
        missing
    }

    /// One compressed entry per item taken from plain suppliers.
    pub fn used_messages(&self) -> Vec<ItemMessage> {
        let mut used: Vec<ItemMessage> = self
            .iter_preorder()
            .filter(|(_, node)| node.used_count() != 0)
            .map(|(_, node)| ItemMessage::new(node.request.with_quantity(node.used_count())))
            .collect();
        ItemMessage::compress(&mut used);
        used
    }

    /// Deliver the missing items to `log`.
    pub fn report_missing<L>(&self, log: &mut L)
    where
        L: RequestLog + ?Sized,
    {
        log.handle_missing_items(self.missing_messages());
    }

    /// Deliver the items used from stock, then the missing items, to `log`.
    pub fn report_used_and_missing<L>(&self, log: &mut L)
    where
        L: RequestLog + ?Sized,
    {
        let used = self.used_messages();
        let missing = self.missing_messages();
        log.handle_successful_request(used);
        log.handle_missing_items(missing);
    }
}

// ---------------------------------------------------------------------------
// Iterators
// ---------------------------------------------------------------------------

/// Depth-first pre-order walk over a [`RequestTree`].
pub struct Preorder<'a> {
    tree: &'a RequestTree,
    stack: Vec<RequestNodeId>,
}

impl<'a> Iterator for Preorder<'a> {
    type Item = (RequestNodeId, &'a RequestNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.stack.pop() {
            if let Some(node) = self.tree.nodes.get(id) {
                self.stack.extend(node.children.iter().rev().copied());
                return Some((id, node));
            }
        }
        None
    }
}

/// Walk from a node's parent up to the root.
pub struct Ancestors<'a> {
    tree: &'a RequestTree,
    next: Option<RequestNodeId>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = (RequestNodeId, &'a RequestNode);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        let node = self.tree.nodes.get(id)?;
        self.next = node.parent;
        Some((id, node))
    }
}
