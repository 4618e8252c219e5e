//! The string hash used to place keys in a [`Table`](crate::Table).

/// Seed of the djb2 family.
const SEED: u32 = 5381;

/// Hashes a string with the djb2 recurrence `hash * 33 + unit`.
///
/// The recurrence runs over the UTF-16 code units of `key` with 32-bit
/// wrapping arithmetic, so ASCII keys hash exactly like byte-wise djb2 and
/// non-ASCII keys hash like they would in a UTF-16 string runtime.
///
/// # Examples
///
/// ```rust
/// use probe_table::hash::hash_str;
///
/// assert_eq!(hash_str(""), 5381);
/// assert_eq!(hash_str("a"), 177670);
/// assert_eq!(hash_str("Hobbit"), hash_str("Hobbit"));
/// ```
#[inline]
pub fn hash_str(key: &str) -> u32 {
    key.encode_utf16().fold(SEED, |hash, unit| {
        (hash << 5).wrapping_add(hash).wrapping_add(u32::from(unit))
    })
}
