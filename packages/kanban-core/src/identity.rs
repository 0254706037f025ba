/// Card id minting.
///
/// Ids are 12 symbols from a 64-symbol URL-safe alphabet. Each id hashes an
/// atomic counter together with a nanosecond timestamp via SHA-256, so ids
/// are unique within a process and uniformly distributed.
use std::sync::atomic::{AtomicU64, Ordering};

use sha2::{Digest, Sha256};

use crate::types::CardId;

const ALPHABET: &[u8; 64] = b"0123456789abcdefghijklmnopqrstuvwxyz_ABCDEFGHIJKLMNOPQRSTUVWXYZ-";
const ID_LEN: usize = 12;

static ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generate a fresh card id.
pub fn generate_card_id() -> CardId {
    let seq = ID_COUNTER.fetch_add(1, Ordering::Relaxed);
    let ts = std::time::SystemTime::now()
        .duration_since(std::time::SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let mut hasher = Sha256::new();
    hasher.update(seq.to_le_bytes());
    hasher.update(ts.to_le_bytes());
    let hash = hasher.finalize();
    let id: String = hash[..ID_LEN]
        .iter()
        .map(|byte| ALPHABET[(byte & 63) as usize] as char)
        .collect();
    CardId(id)
}
