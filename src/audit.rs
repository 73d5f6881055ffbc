//! Tamper-evident audit primitives: a rolling hash chain and a Merkle
//! root over committed batches.
//!
//! Hashes are plain `u64` modular arithmetic over a large prime — the
//! goal is deterministic tamper *detection* over an append-only record,
//! not cryptographic secrecy. This module owns the validation functions;
//! entry storage belongs to the caller, and remediation after a detected
//! tamper is the caller's decision.

use serde::{Deserialize, Serialize};

/// Large prime bounding hash magnitude.
pub const CHAIN_MODULUS: u64 = 1_000_000_007;

/// Genesis value preceding the first chain entry.
pub const GENESIS_HASH: u64 = 0;

const HASH_MULTIPLIER: u128 = 31;

/// Rolling checksum of a payload's bytes, modulo [`CHAIN_MODULUS`].
pub fn payload_checksum(payload: &str) -> u64 {
    let mut checksum: u128 = 0;
    for byte in payload.bytes() {
        checksum = (checksum * HASH_MULTIPLIER + byte as u128) % CHAIN_MODULUS as u128;
    }
    checksum as u64
}

/// Deterministic link hash: the previous hash folded with the payload
/// checksum.
///
/// # Examples
///
/// ```
/// use ledger_engine::audit::append_hash;
///
/// let h1 = append_hash(0, "batch-1");
/// let h2 = append_hash(h1, "batch-2");
/// assert_ne!(h1, h2);
/// assert_eq!(h2, append_hash(h1, "batch-2")); // deterministic
/// ```
pub fn append_hash(prev_hash: u64, payload: &str) -> u64 {
    let folded =
        (prev_hash as u128 * HASH_MULTIPLIER + payload_checksum(payload) as u128 + 1)
            % CHAIN_MODULUS as u128;
    folded as u64
}

/// One link of the audit chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub hash: u64,
    pub prev_hash: u64,
    pub payload: String,
    /// Strictly increasing across the entry set.
    pub sequence: u64,
}

/// Append-only builder for audit entries. Historical entries are never
/// mutated in place.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditChain {
    entries: Vec<AuditEntry>,
}

impl AuditChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a committed batch payload, linking it to the current head.
    pub fn append(&mut self, payload: impl Into<String>) -> &AuditEntry {
        let payload = payload.into();
        let prev_hash = self.head_hash();
        let sequence = self.entries.last().map(|e| e.sequence + 1).unwrap_or(0);
        let hash = append_hash(prev_hash, &payload);

        self.entries.push(AuditEntry {
            hash,
            prev_hash,
            payload,
            sequence,
        });
        self.entries.last().expect("entry just pushed")
    }

    /// Hash of the newest entry, or [`GENESIS_HASH`] when empty.
    pub fn head_hash(&self) -> u64 {
        self.entries.last().map(|e| e.hash).unwrap_or(GENESIS_HASH)
    }

    pub fn entries(&self) -> &[AuditEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Recompute every link and compare against stored values.
///
/// Detects any single-field tamper: a mutated payload, hash, or prev-hash
/// breaks recomputation or linkage, and a reordered or reused sequence
/// number breaks monotonicity. An empty chain is trivially valid.
pub fn verify_chain_integrity(entries: &[AuditEntry]) -> bool {
    for (i, entry) in entries.iter().enumerate() {
        if entry.hash != append_hash(entry.prev_hash, &entry.payload) {
            return false;
        }
        if i > 0 {
            let prev = &entries[i - 1];
            if entry.prev_hash != prev.hash || entry.sequence <= prev.sequence {
                return false;
            }
        }
    }
    true
}

/// Combine two Merkle nodes into their parent.
pub fn hash_pair(left: u64, right: u64) -> u64 {
    ((left as u128 * HASH_MULTIPLIER + right as u128 + 1) % CHAIN_MODULUS as u128) as u64
}

/// Pairwise-combine leaf hashes bottom-up into a Merkle root.
///
/// When a level holds an odd count, the unpaired node is duplicated and
/// paired with itself — applied consistently at every level, not just the
/// first. A single leaf is its own root; no leaves yield `None`.
pub fn merkle_root(leaves: &[u64]) -> Option<u64> {
    if leaves.is_empty() {
        return None;
    }

    let mut level: Vec<u64> = leaves.to_vec();
    while level.len() > 1 {
        let mut next = Vec::with_capacity(level.len().div_ceil(2));
        for pair in level.chunks(2) {
            let left = pair[0];
            let right = if pair.len() == 2 { pair[1] } else { pair[0] };
            next.push(hash_pair(left, right));
        }
        level = next;
    }
    Some(level[0])
}

/// True when the leaves recompute to `expected_root`.
pub fn merkle_audit_verify(leaves: &[u64], expected_root: u64) -> bool {
    merkle_root(leaves) == Some(expected_root)
}
