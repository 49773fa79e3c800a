//! Content-derived topic ids.
//!
//! An id is `"t"` followed by the first ten lowercase hex characters of the
//! SHA-1 digest of `"<title>|<category>"`. The digest is pinned so ids stay
//! compatible with topic lists generated by earlier tooling.

use sha1::{Digest, Sha1};

/// Literal prefix of every topic id
pub const TOPIC_ID_PREFIX: &str = "t";
/// Number of hex digest characters kept after the prefix
pub const TOPIC_ID_HEX_LEN: usize = 10;

/// Compute the id of a `(title, category)` pair
pub fn topic_id(title: &str, category: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(title.as_bytes());
    hasher.update(b"|");
    hasher.update(category.as_bytes());
    let digest = hex::encode(hasher.finalize());
    format!("{}{}", TOPIC_ID_PREFIX, &digest[..TOPIC_ID_HEX_LEN])
}
