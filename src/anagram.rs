//! Grouping words that are anagrams of each other.

use alloc::borrow::ToOwned;
use alloc::string::String;
use alloc::vec::Vec;

use crate::hash_table::Table;

/// The sorted letters of `word`, shared by all of its anagrams.
pub fn signature(word: &str) -> String {
    let mut letters: Vec<char> = word.chars().collect();
    letters.sort_unstable();
    letters.into_iter().collect()
}

/// Groups `words` by [`signature`].
///
/// Groups come back in the order their signature was first seen, and the
/// words within a group keep their input order. Only words with identical
/// letter multisets share a group, so `"acre"` (`"acer"`) and `"arcs"`
/// (`"acrs"`) end up apart.
///
/// # Examples
///
/// ```rust
/// use probe_table::anagram::group_anagrams;
///
/// let groups = group_anagrams(&["east", "cars", "acre", "arcs", "teas", "eats", "race"]);
/// assert_eq!(
///     groups,
///     vec![
///         vec!["east", "teas", "eats"],
///         vec!["cars", "arcs"],
///         vec!["acre", "race"],
///     ]
/// );
/// ```
pub fn group_anagrams<S: AsRef<str>>(words: &[S]) -> Vec<Vec<String>> {
    // Signature to position in `groups`.
    let mut positions: Table<usize> = Table::new();
    let mut groups: Vec<Vec<String>> = Vec::new();

    for word in words {
        let word = word.as_ref();
        let position = *positions.entry(signature(word)).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[position].push(word.to_owned());
    }

    groups
}
