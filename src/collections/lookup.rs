//! One-to-many key lookup under a comparer.
//!
//! Groups are kept in a `Vec` in order of each key's first occurrence; a
//! hash index maps comparer hashes to group positions. Values within a
//! group keep insertion order.

use std::collections::HashMap;

use crate::comparer::EqualityComparer;

/// A key together with every value filed under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grouping<K, V> {
    key: K,
    elements: Vec<V>,
}

impl<K, V> Grouping<K, V> {
    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn elements(&self) -> &[V] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn into_parts(self) -> (K, Vec<V>) {
        (self.key, self.elements)
    }
}

impl<K, V> IntoIterator for Grouping<K, V> {
    type Item = V;
    type IntoIter = std::vec::IntoIter<V>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.into_iter()
    }
}

/// Key-to-values multimap under comparer `C`.
///
/// # Examples
/// ```
/// use u_seqkit::collections::Lookup;
/// use u_seqkit::comparer::StructuralEquality;
///
/// let words = ["apple", "avocado", "banana", "blueberry", "cherry"];
/// let lookup = Lookup::from_iter_with(words, |w: &&str| w.as_bytes()[0], StructuralEquality);
/// assert_eq!(lookup.get(&b'b'), Some(&["banana", "blueberry"][..]));
/// assert_eq!(lookup.get(&b'z'), None);
/// assert_eq!(lookup.len(), 3);
/// ```
#[derive(Clone)]
pub struct Lookup<K, V, C> {
    groups: Vec<Grouping<K, V>>,
    index: HashMap<u64, Vec<usize>>,
    comparer: C,
}

impl<K, V, C: EqualityComparer<K>> Lookup<K, V, C> {
    pub fn new(comparer: C) -> Self {
        Self {
            groups: Vec::new(),
            index: HashMap::new(),
            comparer,
        }
    }

    /// Files every value of `values` under `key(&value)`.
    pub fn from_iter_with<I, F>(values: I, mut key: F, comparer: C) -> Self
    where
        I: IntoIterator<Item = V>,
        F: FnMut(&V) -> K,
    {
        let mut lookup = Self::new(comparer);
        for value in values {
            let k = key(&value);
            lookup.push(k, value);
        }
        lookup
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Returns `true` if no key has been filed.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Files `value` under `key`, creating the group on first sight of the key.
    pub fn push(&mut self, key: K, value: V) {
        match self.position(&key) {
            Some(pos) => self.groups[pos].elements.push(value),
            None => {
                let hash = self.comparer.hash(&key);
                self.index.entry(hash).or_default().push(self.groups.len());
                self.groups.push(Grouping {
                    key,
                    elements: vec![value],
                });
            }
        }
    }

    /// Position of the group equal to `key`, in first-occurrence order.
    pub fn position(&self, key: &K) -> Option<usize> {
        self.index
            .get(&self.comparer.hash(key))?
            .iter()
            .copied()
            .find(|&pos| self.comparer.equals(&self.groups[pos].key, key))
    }

    /// Values filed under `key`, or `None` if the key is unknown.
    pub fn get(&self, key: &K) -> Option<&[V]> {
        self.position(key).map(|pos| self.groups[pos].elements())
    }

    /// The group at `pos` (as returned by [`position`](Self::position)).
    ///
    /// # Panics
    /// Panics if `pos >= len()`.
    pub fn group(&self, pos: usize) -> &Grouping<K, V> {
        &self.groups[pos]
    }

    /// Consumes the lookup, yielding groups in first-occurrence order.
    pub fn into_groups(self) -> Vec<Grouping<K, V>> {
        self.groups
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparer::{from_equality_with_hash, structural_hash, StructuralEquality};

    #[test]
    fn test_groups_in_first_occurrence_order() {
        let lookup = Lookup::from_iter_with(
            [3, 1, 4, 1, 5, 9, 2, 6, 5, 3],
            |x: &i32| x % 3,
            StructuralEquality,
        );
        let groups: Vec<(i32, Vec<i32>)> = lookup
            .into_groups()
            .into_iter()
            .map(Grouping::into_parts)
            .collect();
        assert_eq!(
            groups,
            vec![
                (0, vec![3, 9, 6, 3]),
                (1, vec![1, 4, 1]),
                (2, vec![5, 2, 5]),
            ]
        );
    }

    #[test]
    fn test_get_and_position() {
        let mut lookup = Lookup::new(StructuralEquality);
        lookup.push("x", 1);
        lookup.push("y", 2);
        lookup.push("x", 3);
        assert_eq!(lookup.position(&"y"), Some(1));
        assert_eq!(lookup.get(&"x"), Some(&[1, 3][..]));
        assert_eq!(lookup.group(0).key(), &"x");
        assert_eq!(lookup.get(&"z"), None);
    }

    #[test]
    fn test_custom_equality_merges_keys() {
        let nocase = from_equality_with_hash(
            |a: &String, b: &String| a.eq_ignore_ascii_case(b),
            |s: &String| structural_hash(&s.to_ascii_lowercase()),
        );
        let lookup = Lookup::from_iter_with(
            ["Apple", "APPLE", "pear"],
            |s: &&str| s.to_string(),
            nocase,
        );
        assert_eq!(lookup.len(), 2);
        // The first-seen spelling names the group.
        assert_eq!(lookup.group(0).key(), "Apple");
        assert_eq!(lookup.group(0).elements(), &["Apple", "APPLE"]);
    }

    #[test]
    fn test_colliding_hashes_stay_separate() {
        let lookup = Lookup::from_iter_with(
            0..6,
            |x: &u8| *x % 2,
            from_equality_with_hash(|a: &u8, b: &u8| a == b, |_: &u8| 1),
        );
        assert_eq!(lookup.len(), 2);
        assert_eq!(lookup.get(&1), Some(&[1, 3, 5][..]));
    }

    #[test]
    fn test_grouping_accessors() {
        let mut lookup = Lookup::new(StructuralEquality);
        lookup.push('k', "v");
        let group = lookup.into_groups().remove(0);
        assert_eq!(group.len(), 1);
        assert!(!group.is_empty());
        assert_eq!(group.into_iter().collect::<Vec<_>>(), vec!["v"]);
    }
}
