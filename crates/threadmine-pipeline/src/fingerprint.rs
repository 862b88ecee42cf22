//! Deterministic thread fingerprints used as dedup keys.

use sha2::{Digest, Sha256};

use crate::types::Thread;

/// Replies included in a thread's content hash.
pub const FINGERPRINT_REPLIES: usize = 5;

/// SHA-256 over the title, body and the first `replies` reply bodies, as
/// lower-case hex (64 chars).
///
/// Each part is length-prefixed, so text moved between title, body and
/// replies always produces a different digest, even across embedded newlines.
#[must_use]
pub fn thread_fingerprint(thread: &Thread, replies: usize) -> String {
    let mut hasher = Sha256::new();
    update_part(&mut hasher, &thread.title);
    update_part(&mut hasher, &thread.body);
    for reply in thread.replies.iter().take(replies) {
        update_part(&mut hasher, &reply.body);
    }
    format!("{:x}", hasher.finalize())
}

fn update_part(hasher: &mut Sha256, part: &str) {
    hasher.update((part.len() as u64).to_le_bytes());
    hasher.update(part.as_bytes());
}

/// Fingerprint of the root post only. Available before replies are fetched.
#[must_use]
pub fn root_fingerprint(thread: &Thread) -> String {
    thread_fingerprint(thread, 0)
}

/// Full content hash: title, body and the first [`FINGERPRINT_REPLIES`] replies.
#[must_use]
pub fn content_hash(thread: &Thread) -> String {
    thread_fingerprint(thread, FINGERPRINT_REPLIES)
}
