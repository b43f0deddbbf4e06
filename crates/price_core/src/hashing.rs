//! Stable, unseeded hashing for cache keys and heuristic variance.
//!
//! Values are identical across processes and platforms, unlike the
//! randomly seeded `std::collections::hash_map::DefaultHasher`.

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Separator fed between the title and description of a cache key.
const FIELD_SEPARATOR: u8 = 0x1f;

/// 64-bit FNV-1a hash state.
#[derive(Copy, Clone, Debug)]
pub struct StableHasher(u64);

impl StableHasher {
    /// Create a new hash state with the FNV offset basis.
    pub fn new() -> Self {
        Self(FNV_OFFSET_BASIS)
    }

    /// Feed bytes into the hash function.
    pub fn update(&mut self, bytes: &[u8]) {
        for b in bytes {
            self.0 = (self.0 ^ u64::from(*b)).wrapping_mul(FNV_PRIME);
        }
    }

    /// Finalise the hash.
    pub fn finish(&self) -> u64 {
        self.0
    }
}

impl Default for StableHasher {
    fn default() -> Self {
        Self::new()
    }
}

/// Hash a single string.
pub fn stable_hash(text: &str) -> u64 {
    let mut hasher = StableHasher::new();
    hasher.update(text.as_bytes());
    hasher.finish()
}

/// Cache key for a `(title, description)` pair.
pub fn cache_key(title: &str, description: &str) -> u64 {
    let mut hasher = StableHasher::new();
    hasher.update(title.as_bytes());
    hasher.update(&[FIELD_SEPARATOR]);
    hasher.update(description.as_bytes());
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_fnv_vectors() {
        assert_eq!(stable_hash(""), 0xcbf2_9ce4_8422_2325);
        assert_eq!(stable_hash("a"), 0xaf63_dc4c_8601_ec8c);
        assert_eq!(stable_hash("foobar"), 0x8594_4171_f739_67e8);
    }

    #[test]
    fn test_cache_key_separates_fields() {
        assert_ne!(cache_key("ab", "c"), cache_key("a", "bc"));
        assert_eq!(cache_key("ab", "c"), cache_key("ab", "c"));
    }

    #[test]
    fn test_incremental_matches_one_shot() {
        let mut hasher = StableHasher::new();
        hasher.update(b"foo");
        hasher.update(b"bar");
        assert_eq!(hasher.finish(), stable_hash("foobar"));
    }
}
