//! Content hashing using FxHash.
//!
//! Compiled stylesheets are hashed so identical pushes can be skipped.
//!
//! ```ignore
//! use crate::utils::hash;
//!
//! let h = hash::compute(css.as_bytes()); // -> u64
//! let fp = hash::fingerprint(&css);      // -> "a1b2c3d4"
//! ```

use rustc_hash::FxHasher;
use std::hash::Hasher;

/// Compute 64-bit hash from byte data.
#[inline]
pub fn compute<T: AsRef<[u8]> + ?Sized>(data: &T) -> u64 {
    let mut hasher = FxHasher::default();
    hasher.write(data.as_ref());
    hasher.finish()
}

/// Compute hash and return as 8-char hex fingerprint.
#[inline]
pub fn fingerprint<T: AsRef<[u8]> + ?Sized>(value: &T) -> String {
    format!("{:016x}", compute(value))[..8].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_is_stable() {
        assert_eq!(compute("body { color: red; }"), compute("body { color: red; }"));
        assert_ne!(compute("a"), compute("b"));
    }

    #[test]
    fn test_fingerprint_length() {
        assert_eq!(fingerprint(":root {}").len(), 8);
    }
}
