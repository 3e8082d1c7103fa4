//! Property-based tests for request trees.
//!
//! Generates random tree shapes with random promises, then checks the
//! aggregation, accounting, reporting and commit invariants.

use logistics_core::id::*;
use logistics_core::item::ItemIdentity;
use logistics_core::log::ItemMessage;
use logistics_core::promise::{ExtraPromise, Promise, ProviderRef};
use logistics_core::test_utils::*;
use logistics_core::tree::RequestTree;
use proptest::prelude::*;

// ===========================================================================
// Generators
// ===========================================================================

/// A node to add: (parent index into already-built nodes, item kind, quantity).
type NodeSpec = (usize, u32, u32);
/// A promise to add: (node index, item kind, quantity, provider id, crafts).
type PromiseSpec = (usize, u32, u32, u32, bool);

fn item(kind: u32) -> ItemIdentity {
    ItemIdentity::plain(kind, 0)
}

fn arb_nodes() -> impl Strategy<Value = Vec<NodeSpec>> {
    proptest::collection::vec((0..16usize, 0..4u32, 1..64u32), 0..12)
}

fn arb_promises() -> impl Strategy<Value = Vec<PromiseSpec>> {
    proptest::collection::vec((0..16usize, 0..4u32, 0..32u32, 0..3u32, any::<bool>()), 0..24)
}

/// Build a tree; node and promise indices wrap onto what exists.
fn build(nodes: &[NodeSpec], promises: &[PromiseSpec]) -> (RequestTree, Vec<RequestNodeId>) {
    let mut tree = RequestTree::new(item(0).stack(32), requester());
    let mut ids = vec![tree.root()];
    for &(parent, kind, quantity) in nodes {
        let parent = ids[parent % ids.len()];
        let id = tree.add_child(parent, item(kind).stack(quantity), requester()).unwrap();
        ids.push(id);
    }
    for &(node, kind, quantity, provider, crafts) in promises {
        let provider = if crafts {
            ProviderRef::crafter(ProviderId(provider))
        } else {
            ProviderRef::supplier(ProviderId(provider))
        };
        tree.add_promise(ids[node % ids.len()], Promise::ordinary(item(kind), quantity, provider))
            .unwrap();
    }
    (tree, ids)
}

// ===========================================================================
// Properties
// ===========================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Promised plus missing covers the request whenever nothing is over-promised.
    #[test]
    fn promised_plus_missing_equals_requested(nodes in arb_nodes(), promises in arb_promises()) {
        let (tree, _) = build(&nodes, &promises);
        for (_, node) in tree.iter_preorder() {
            let requested = node.request().quantity();
            if node.promised_count() <= requested {
                prop_assert_eq!(node.promised_count() + node.missing_count(), requested);
            } else {
                prop_assert_eq!(node.missing_count(), 0);
            }
        }
    }

    /// total_promised equals a brute-force sum over the generated promises.
    #[test]
    fn total_promised_matches_manual_sum(
        nodes in arb_nodes(),
        promises in arb_promises(),
        provider in 0..3u32,
        kind in 0..4u32,
    ) {
        let (tree, _) = build(&nodes, &promises);
        let expected: u32 = promises
            .iter()
            .filter(|p| p.3 == provider && p.1 == kind)
            .map(|p| p.2)
            .sum();
        prop_assert_eq!(tree.total_promised(ProviderId(provider), item(kind)), expected);
    }

    /// Compressing a report twice gives the same list as compressing once.
    #[test]
    fn compress_is_idempotent(entries in proptest::collection::vec((0..6u32, 0..50u32), 0..30)) {
        let mut list: Vec<ItemMessage> = entries
            .iter()
            .map(|&(kind, quantity)| ItemMessage::new(item(kind).stack(quantity)))
            .collect();
        ItemMessage::compress(&mut list);
        let once = list.clone();
        ItemMessage::compress(&mut list);
        prop_assert_eq!(list, once);
    }

    /// Compression is unique by identity and preserves the total.
    #[test]
    fn compress_preserves_totals(entries in proptest::collection::vec((0..6u32, 0..50u32), 0..30)) {
        let mut list: Vec<ItemMessage> = entries
            .iter()
            .map(|&(kind, quantity)| ItemMessage::new(item(kind).stack(quantity)))
            .collect();
        ItemMessage::compress(&mut list);
        for kind in 0..6u32 {
            let expected: u32 = entries.iter().filter(|e| e.0 == kind).map(|e| e.1).sum();
            let found: Vec<_> = list.iter().filter(|m| m.item() == item(kind)).collect();
            prop_assert!(found.len() <= 1);
            prop_assert_eq!(found.first().map_or(0, |m| m.quantity()), expected);
        }
    }

    /// Commit calls fulfill exactly once per promise.
    #[test]
    fn commit_fulfills_each_promise_once(nodes in arb_nodes(), promises in arb_promises()) {
        let (tree, _) = build(&nodes, &promises);
        let mut net = RecordingNetwork::default();
        let summary = tree.fulfill_all(&mut net);
        prop_assert_eq!(summary.fulfilled, promises.len());
        prop_assert_eq!(net.fulfilled.len(), promises.len());
    }

    /// Surplus never goes negative and never exceeds what was offered.
    #[test]
    fn extras_stay_within_offer(
        offers in proptest::collection::vec(0..10u32, 1..5),
        claims in proptest::collection::vec(0..10u32, 0..5),
    ) {
        let mut tree = RequestTree::new(sticks().stack(1), requester());
        let root = tree.root();
        for &q in &offers {
            tree.add_extra_promise(root, ExtraPromise::new(sticks(), q, crafter(1))).unwrap();
        }
        for &q in &claims {
            tree.add_promise(root, Promise::from_extra(&ExtraPromise::new(sticks(), q, crafter(1))))
                .unwrap();
        }
        let offered: u32 = offers.iter().sum();
        let claimed: u32 = claims.iter().sum();
        let remaining: u32 = tree.extras_for(sticks()).iter().map(|e| e.quantity).sum();
        prop_assert_eq!(remaining, offered.saturating_sub(claimed));
    }
}
