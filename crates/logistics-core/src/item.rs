use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors raised by quantity arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ItemError {
    #[error("cannot lower {item} by {by}: only {available} present")]
    QuantityUnderflow {
        item: ItemIdentity,
        available: u32,
        by: u32,
    },
}

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Identity of an item type, independent of any count.
///
/// `kind` is the base item, `variant` distinguishes sub-types of the same
/// kind (damage values, colours, ...) and `tag` separates otherwise equal
/// items that carry unique data. Ordered lexicographically over the three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemIdentity {
    pub kind: u32,
    pub variant: u32,
    #[serde(default)]
    pub tag: u32,
}

impl ItemIdentity {
    pub const fn new(kind: u32, variant: u32, tag: u32) -> Self {
        Self { kind, variant, tag }
    }

    /// Shorthand for an untagged item.
    pub const fn plain(kind: u32, variant: u32) -> Self {
        Self::new(kind, variant, 0)
    }

    /// Pair this identity with a count.
    pub fn stack(self, quantity: u32) -> ItemQuantity {
        ItemQuantity::new(self, quantity)
    }
}

impl fmt::Display for ItemIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.variant)?;
        if self.tag != 0 {
            write!(f, "#{}", self.tag)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Quantity
// ---------------------------------------------------------------------------

/// An item identity paired with a mutable count.
///
/// The identity is fixed at construction; only the count changes. Equality
/// and ordering consider the identity first and the count second. Comparing
/// a quantity with a bare identity does not compile; compare against
/// [`ItemQuantity::item`] instead.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemQuantity {
    item: ItemIdentity,
    quantity: u32,
}

impl ItemQuantity {
    pub fn new(item: ItemIdentity, quantity: u32) -> Self {
        Self { item, quantity }
    }

    pub fn item(&self) -> ItemIdentity {
        self.item
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity;
    }

    /// A copy of this stack with the count replaced.
    pub fn with_quantity(&self, quantity: u32) -> Self {
        Self::new(self.item, quantity)
    }

    /// Decrement the count in place. The count never goes below zero.
    pub fn lower_quantity(&mut self, by: u32) -> Result<(), ItemError> {
        self.quantity = self
            .quantity
            .checked_sub(by)
            .ok_or(ItemError::QuantityUnderflow {
                item: self.item,
                available: self.quantity,
                by,
            })?;
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.quantity == 0
    }
}

impl fmt::Display for ItemQuantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x {}", self.quantity, self.item)
    }
}

// ---------------------------------------------------------------------------
// Comparators
// ---------------------------------------------------------------------------

/// Compare by identity only, ignoring counts.
pub fn cmp_identity(a: &ItemQuantity, b: &ItemQuantity) -> Ordering {
    a.item.cmp(&b.item)
}

/// Compare by kind and variant only, ignoring tag and count.
pub fn cmp_kind_variant(a: &ItemQuantity, b: &ItemQuantity) -> Ordering {
    (a.item.kind, a.item.variant).cmp(&(b.item.kind, b.item.variant))
}

/// Listing order: identity ascending, then larger stacks first.
pub fn cmp_listing(a: &ItemQuantity, b: &ItemQuantity) -> Ordering {
    a.item
        .cmp(&b.item)
        .then_with(|| b.quantity.cmp(&a.quantity))
}

/// Sum stacks sharing an identity. Keeps first-seen order.
pub fn merge_by_identity<I>(stacks: I) -> Vec<ItemQuantity>
where
    I: IntoIterator<Item = ItemQuantity>,
{
    let mut merged: Vec<ItemQuantity> = Vec::new();
    for stack in stacks {
        if let Some(existing) = merged.iter_mut().find(|s| s.item == stack.item) {
            existing.quantity = existing.quantity.saturating_add(stack.quantity);
        } else {
            merged.push(stack);
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cobble() -> ItemIdentity {
        ItemIdentity::plain(4, 0)
    }

    fn wool(colour: u32) -> ItemIdentity {
        ItemIdentity::plain(35, colour)
    }

    #[test]
    fn identity_orders_lexicographically() {
        assert!(ItemIdentity::new(1, 9, 9) < ItemIdentity::new(2, 0, 0));
        assert!(ItemIdentity::new(1, 1, 9) < ItemIdentity::new(1, 2, 0));
        assert!(ItemIdentity::new(1, 1, 1) < ItemIdentity::new(1, 1, 2));
    }

    #[test]
    fn quantity_equality_needs_both_parts() {
        assert_eq!(cobble().stack(4), cobble().stack(4));
        assert_ne!(cobble().stack(4), cobble().stack(5));
        assert_ne!(cobble().stack(4), wool(0).stack(4));
    }

    #[test]
    fn quantity_orders_by_identity_then_count() {
        let mut stacks = vec![wool(1).stack(1), cobble().stack(9), cobble().stack(2)];
        stacks.sort();
        assert_eq!(
            stacks,
            vec![cobble().stack(2), cobble().stack(9), wool(1).stack(1)]
        );
    }

    #[test]
    fn listing_order_puts_larger_stacks_first() {
        let mut stacks = vec![cobble().stack(2), wool(0).stack(1), cobble().stack(9)];
        stacks.sort_by(cmp_listing);
        assert_eq!(
            stacks,
            vec![cobble().stack(9), cobble().stack(2), wool(0).stack(1)]
        );
    }

    #[test]
    fn kind_variant_comparator_ignores_tag() {
        let a = ItemIdentity::new(7, 1, 0).stack(1);
        let b = ItemIdentity::new(7, 1, 42).stack(3);
        assert_eq!(cmp_kind_variant(&a, &b), Ordering::Equal);
        assert_eq!(cmp_identity(&a, &b), Ordering::Less);
    }

    #[test]
    fn lower_quantity_in_place() {
        let mut stack = cobble().stack(10);
        stack.lower_quantity(4).unwrap();
        assert_eq!(stack.quantity(), 6);
        assert_eq!(stack.item(), cobble());
    }

    #[test]
    fn lower_quantity_below_zero_fails() {
        let mut stack = cobble().stack(3);
        let err = stack.lower_quantity(5).unwrap_err();
        assert_eq!(
            err,
            ItemError::QuantityUnderflow {
                item: cobble(),
                available: 3,
                by: 5,
            }
        );
        assert_eq!(stack.quantity(), 3);
    }

    #[test]
    fn with_quantity_keeps_identity() {
        let stack = wool(14).stack(64);
        let copy = stack.with_quantity(3);
        assert_eq!(copy.item(), wool(14));
        assert_eq!(copy.quantity(), 3);
        assert_eq!(stack.quantity(), 64);
    }

    #[test]
    fn display_formats() {
        assert_eq!(cobble().stack(12).to_string(), "12x 4:0");
        assert_eq!(ItemIdentity::new(1, 2, 3).to_string(), "1:2#3");
    }

    #[test]
    fn merge_sums_same_identity_in_first_seen_order() {
        let merged = merge_by_identity(vec![
            wool(2).stack(1),
            cobble().stack(5),
            wool(2).stack(3),
        ]);
        assert_eq!(merged, vec![wool(2).stack(4), cobble().stack(5)]);
    }
}
