//! Checking whether a string is a permutation of a palindrome.

use crate::hash_table::Table;

/// Returns `true` if the characters of `s` can be rearranged into a
/// palindrome, i.e. at most one character occurs an odd number of times.
///
/// Characters are compared exactly: case and whitespace count.
///
/// # Examples
///
/// ```rust
/// use probe_table::permutation::is_palindrome_permutation;
///
/// assert!(is_palindrome_permutation("acecarr"));
/// assert!(!is_palindrome_permutation("north"));
/// ```
pub fn is_palindrome_permutation(s: &str) -> bool {
    let mut counts: Table<usize> = Table::new();
    let mut buf = [0u8; 4];

    for c in s.chars() {
        let key: &str = c.encode_utf8(&mut buf);
        match counts.get_mut(key) {
            Ok(count) => *count += 1,
            Err(_) => {
                counts.set(key, 1);
            }
        }
    }

    counts.values().filter(|&&count| count % 2 == 1).count() <= 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palindromes_and_their_permutations() {
        for s in ["", "a", "aa", "racecar", "carrace", "aab", "tacocat", "éé"] {
            assert!(is_palindrome_permutation(s), "{s}");
        }
    }

    #[test]
    fn rejects_two_odd_counts() {
        for s in ["ab", "abc", "aabbcd", "Aa"] {
            assert!(!is_palindrome_permutation(s), "{s}");
        }
    }

    #[test]
    fn long_input() {
        let s: alloc::string::String = ('a'..='z').chain('a'..='z').chain(['q']).collect();
        assert!(is_palindrome_permutation(&s));
    }
}
