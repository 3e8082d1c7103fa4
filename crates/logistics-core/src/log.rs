//! Report messages and the sinks that receive them.

use crate::item::{merge_by_identity, ItemIdentity, ItemQuantity};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One line of a request report: an item and how many of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemMessage {
    pub stack: ItemQuantity,
}

impl ItemMessage {
    pub fn new(stack: ItemQuantity) -> Self {
        Self { stack }
    }

    pub fn item(&self) -> ItemIdentity {
        self.stack.item()
    }

    pub fn quantity(&self) -> u32 {
        self.stack.quantity()
    }

    /// Merge messages for the same item into one summed entry.
    ///
    /// The result is sorted by identity and holds no zero-quantity entries,
    /// so it does not depend on input order and compressing twice is the
    /// same as compressing once.
    pub fn compress(messages: &mut Vec<ItemMessage>) {
        messages.sort_by_key(|m| m.item());
        let stacks: Vec<ItemQuantity> = messages
            .drain(..)
            .map(|m| m.stack)
            .filter(|s| !s.is_empty())
            .collect();
        *messages = merge_by_identity(stacks)
            .into_iter()
            .map(ItemMessage::new)
            .collect();
    }
}

impl fmt::Display for ItemMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.stack, f)
    }
}

impl From<ItemQuantity> for ItemMessage {
    fn from(stack: ItemQuantity) -> Self {
        Self::new(stack)
    }
}

/// Receives the outcome of a request.
pub trait RequestLog {
    /// Items that could not be promised.
    fn handle_missing_items(&mut self, items: Vec<ItemMessage>);

    /// Items taken from plain suppliers for a request that went through.
    fn handle_successful_request(&mut self, items: Vec<ItemMessage>);
}

/// Sink that keeps every delivered list in memory.
#[derive(Debug, Clone, Default)]
pub struct RecordingLog {
    pub missing: Vec<Vec<ItemMessage>>,
    pub successful: Vec<Vec<ItemMessage>>,
}

impl RecordingLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently delivered missing list, if any.
    pub fn last_missing(&self) -> Option<&[ItemMessage]> {
        self.missing.last().map(Vec::as_slice)
    }

    /// The most recently delivered successful list, if any.
    pub fn last_successful(&self) -> Option<&[ItemMessage]> {
        self.successful.last().map(Vec::as_slice)
    }
}

impl RequestLog for RecordingLog {
    fn handle_missing_items(&mut self, items: Vec<ItemMessage>) {
        self.missing.push(items);
    }

    fn handle_successful_request(&mut self, items: Vec<ItemMessage>) {
        self.successful.push(items);
    }
}

/// Sink that turns each report into `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLog;

impl RequestLog for TracingLog {
    fn handle_missing_items(&mut self, items: Vec<ItemMessage>) {
        for msg in &items {
            tracing::warn!(item = %msg.item(), quantity = msg.quantity(), "missing");
        }
    }

    fn handle_successful_request(&mut self, items: Vec<ItemMessage>) {
        for msg in &items {
            tracing::info!(item = %msg.item(), quantity = msg.quantity(), "used");
        }
    }
}
