//! Pending-message storage keyed by device id.

use crate::error::{Error, Result};
use crate::message::Message;
use crate::sequence::earliest_index;
use std::collections::HashMap;

/// Decoded messages waiting to be collected, grouped per device.
///
/// Arrival order within a device is irrelevant to callers: `pop_next` always
/// returns the earliest pending sequence under wraparound ordering. Selection is a
/// linear scan, which is fine for the small per-device backlogs the ordering
/// rules already assume.
#[derive(Debug, Default)]
pub struct MessageStore {
    pending: HashMap<u16, Vec<Message>>,
    len: usize,
}

impl MessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: Message) {
        self.pending
            .entry(message.device_id())
            .or_default()
            .push(message);
        self.len += 1;
    }

    pub fn has_message(&self, device_id: u16) -> bool {
        self.pending(device_id) > 0
    }

    /// Number of messages pending for `device_id`.
    pub fn pending(&self, device_id: u16) -> usize {
        self.pending.get(&device_id).map_or(0, Vec::len)
    }

    /// Total pending messages across all devices.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Devices that currently have pending messages, in no particular order.
    pub fn device_ids(&self) -> impl Iterator<Item = u16> + '_ {
        self.pending.keys().copied()
    }

    /// The message `pop_next` would return, without removing it.
    pub fn peek_next(&self, device_id: u16) -> Option<&Message> {
        let queue = self.pending.get(&device_id)?;
        earliest_index(queue.iter().map(Message::sequence)).map(|idx| &queue[idx])
    }

    /// Removes and returns the earliest pending message for `device_id`.
    pub fn pop_next(&mut self, device_id: u16) -> Result<Message> {
        let queue = self
            .pending
            .get_mut(&device_id)
            .ok_or(Error::NoMessage { device_id })?;
        let idx = earliest_index(queue.iter().map(Message::sequence))
            .ok_or(Error::NoMessage { device_id })?;
        // `remove` keeps arrival order for the remaining scan.
        let message = queue.remove(idx);
        if queue.is_empty() {
            self.pending.remove(&device_id);
        }
        self.len -= 1;
        Ok(message)
    }

    pub fn clear(&mut self) {
        self.pending.clear();
        self.len = 0;
    }
}
