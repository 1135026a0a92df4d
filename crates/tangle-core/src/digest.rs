//! Canonical state digest over the whole store.
//!
//! Two stores holding the same objects (same handles, tags, and bindings)
//! digest identically regardless of the operation order that produced them.
//! Drivers use this to fingerprint a graph, compare runs, or detect
//! divergence between replicas of a simulation.

use blake3::Hasher;

use crate::ident::Hash;
use crate::store::ObjectStore;

/// Domain-separation header for the digest traversal. Changing the traversal
/// in any way is a breaking change to state identity and must bump this.
const STATE_HASH_HEADER: &[u8] = b"TANGLE_STATE_HASH_V1\0";

impl ObjectStore {
    /// Computes a canonical BLAKE3 digest of the entire store.
    ///
    /// The traversal is strictly deterministic:
    /// 1. Header: `b"TANGLE_STATE_HASH_V1\0"`
    /// 2. Object count (u64 LE)
    /// 3. Objects in ascending [`Oid`](crate::Oid) order:
    ///    `b"O\0"` + oid + tag count + tags (sorted, length-prefixed)
    ///    + slot count + (slot, target oid) pairs (sorted, length-prefixed)
    ///
    /// All counts and lengths are 8-byte little-endian; oids are their raw
    /// u64 values in little-endian.
    #[must_use]
    pub fn canonical_state_hash(&self) -> Hash {
        let mut hasher = Hasher::new();
        hasher.update(STATE_HASH_HEADER);

        hasher.update(&(self.objects.len() as u64).to_le_bytes());
        for (oid, record) in &self.objects {
            hasher.update(b"O\0");
            hasher.update(&oid.value().to_le_bytes());

            hasher.update(&(record.tags.len() as u64).to_le_bytes());
            for tag in &record.tags {
                update_label(&mut hasher, tag.as_str());
            }

            hasher.update(&(record.slots.len() as u64).to_le_bytes());
            for (slot, target) in &record.slots {
                update_label(&mut hasher, slot.as_str());
                hasher.update(&target.value().to_le_bytes());
            }
        }

        *hasher.finalize().as_bytes()
    }
}

fn update_label(hasher: &mut Hasher, label: &str) {
    hasher.update(&(label.len() as u64).to_le_bytes());
    hasher.update(label.as_bytes());
}

/// Renders the first 8 bytes of a digest as lowercase hex, for log lines and
/// receipts where the full 32 bytes would drown the signal.
#[must_use]
pub fn short_hex(hash: &Hash) -> String {
    hex::encode(&hash[..8])
}
