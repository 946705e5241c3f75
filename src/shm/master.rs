//! Master Record
//!
//! The single shared structure describing arena occupancy, persisted as JSON
//! in the reserved slot.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Slot reserved for the master record
pub const MASTER_SLOT: u32 = 1;

/// First slot id handed out to keys
pub const FIRST_DATA_SLOT: u32 = 2;

fn first_data_slot() -> u32 {
    FIRST_DATA_SLOT
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasterRecord {
    /// Key -> slot id
    #[serde(default)]
    pub keys: HashMap<String, u32>,
    /// Sum of the byte lengths of every mapped slot
    #[serde(default)]
    pub used_size: u64,
    /// Next slot id to allocate; ids are never reused
    #[serde(default = "first_data_slot")]
    pub next_slot_id: u32,
}

impl Default for MasterRecord {
    fn default() -> Self {
        Self::empty()
    }
}

impl MasterRecord {
    pub fn empty() -> Self {
        Self {
            keys: HashMap::new(),
            used_size: 0,
            next_slot_id: FIRST_DATA_SLOT,
        }
    }

    /// Parses a persisted record, `None` when unreadable.
    ///
    /// A record whose allocation counter trails its own mappings is repaired
    /// so fresh allocations can never collide with a live slot.
    pub fn decode(bytes: &[u8]) -> Option<Self> {
        let mut record: MasterRecord = serde_json::from_slice(bytes).ok()?;
        let floor = record
            .keys
            .values()
            .copied()
            .max()
            .map_or(FIRST_DATA_SLOT, |max| max.saturating_add(1));
        record.next_slot_id = record.next_slot_id.max(floor).max(FIRST_DATA_SLOT);
        Some(record)
    }

    pub fn encode(&self) -> Vec<u8> {
        // A map of strings to integers always serializes.
        serde_json::to_vec(self).unwrap_or_default()
    }

    /// Assigns the next slot id to `key`.
    pub fn allocate(&mut self, key: &str) -> u32 {
        let slot = self.next_slot_id;
        self.next_slot_id = self.next_slot_id.saturating_add(1);
        self.keys.insert(key.to_string(), slot);
        slot
    }

    pub fn slot(&self, key: &str) -> Option<u32> {
        self.keys.get(key).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocation_is_monotonic() {
        let mut record = MasterRecord::empty();

        assert_eq!(record.allocate("a"), 2);
        assert_eq!(record.allocate("b"), 3);
        record.keys.remove("a");
        assert_eq!(record.allocate("a"), 4, "ids are never reused");
    }

    #[test]
    fn test_decode_garbage_is_none() {
        assert!(MasterRecord::decode(b"").is_none());
        assert!(MasterRecord::decode(b"\xff\x00").is_none());
        assert!(MasterRecord::decode(b"[1,2,3]").is_none());
    }

    #[test]
    fn test_decode_fills_missing_fields() {
        let record = MasterRecord::decode(br#"{"keys":{"a":7}}"#).unwrap();
        assert_eq!(record.used_size, 0);
        assert_eq!(record.next_slot_id, 8);
    }

    #[test]
    fn test_encode_decode() {
        let mut record = MasterRecord::empty();
        record.allocate("key");
        record.used_size = 42;

        assert_eq!(MasterRecord::decode(&record.encode()), Some(record));
    }
}
