//! Insertion Order Module
//!
//! Tracks keys in the order they were first inserted, for FIFO overflow
//! eviction and for the expiration sweep.

use std::collections::VecDeque;

// == Insertion Order ==
/// Keys in insertion order.
///
/// Keys are stored in a VecDeque where:
/// - Front = Oldest insertion
/// - Back = Newest insertion
///
/// Replacing a value never moves its key; only removal and re-insertion do.
#[derive(Debug)]
pub struct InsertionOrder<K> {
    order: VecDeque<K>,
}

impl<K> Default for InsertionOrder<K> {
    fn default() -> Self {
        Self {
            order: VecDeque::new(),
        }
    }
}

impl<K: PartialEq> InsertionOrder<K> {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    // == Push ==
    /// Appends a newly inserted key at the back.
    ///
    /// Callers guarantee the key is not already tracked.
    pub fn push_back(&mut self, key: K) {
        self.order.push_back(key);
    }

    // == Remove ==
    /// Removes a key, returning whether it was tracked.
    pub fn remove(&mut self, key: &K) -> bool {
        match self.order.iter().position(|k| k == key) {
            Some(index) => {
                self.order.remove(index);
                true
            }
            None => false,
        }
    }

    // == Pop Oldest ==
    /// Removes and returns the oldest key other than `keep`.
    ///
    /// Returns None once `keep` is the only key left (or the order is empty).
    pub fn pop_oldest_except(&mut self, keep: &K) -> Option<K> {
        let index = self.order.iter().position(|k| k != keep)?;
        self.order.remove(index)
    }

    // == Retain ==
    /// Keeps only the keys for which `f` returns true, oldest first.
    pub fn retain<F>(&mut self, f: F)
    where
        F: FnMut(&K) -> bool,
    {
        self.order.retain(f);
    }

    // == Peek Oldest ==
    #[allow(dead_code)]
    pub fn peek_oldest(&self) -> Option<&K> {
        self.order.front()
    }

    // == Iter ==
    /// Iterates keys from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &K> {
        self.order.iter()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    #[allow(dead_code)]
    pub fn contains(&self, key: &K) -> bool {
        self.order.iter().any(|k| k == key)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn order_of(keys: &[&'static str]) -> InsertionOrder<&'static str> {
        let mut order = InsertionOrder::new();
        for key in keys {
            order.push_back(*key);
        }
        order
    }

    #[test]
    fn test_order_new() {
        let order: InsertionOrder<String> = InsertionOrder::new();
        assert!(order.is_empty());
        assert_eq!(order.len(), 0);
    }

    #[test]
    fn test_order_push_back() {
        let order = order_of(&["key1", "key2", "key3"]);

        assert_eq!(order.len(), 3);
        assert_eq!(order.peek_oldest(), Some(&"key1"));
    }

    #[test]
    fn test_order_remove() {
        let mut order = order_of(&["key1", "key2", "key3"]);

        assert!(order.remove(&"key2"));

        assert_eq!(order.len(), 2);
        assert!(!order.contains(&"key2"));
        assert!(order.contains(&"key1"));
        assert!(order.contains(&"key3"));
    }

    #[test]
    fn test_order_remove_nonexistent_key() {
        let mut order = order_of(&["key1", "key2"]);

        assert!(!order.remove(&"nonexistent"));
        assert_eq!(order.len(), 2);
    }

    #[test]
    fn test_pop_oldest_except_takes_front() {
        let mut order = order_of(&["a", "b", "c"]);

        assert_eq!(order.pop_oldest_except(&"c"), Some("a"));
        assert_eq!(order.pop_oldest_except(&"c"), Some("b"));
        assert_eq!(order.pop_oldest_except(&"c"), None);
        assert_eq!(order.len(), 1);
    }

    #[test]
    fn test_pop_oldest_except_skips_kept_key() {
        let mut order = order_of(&["a", "b", "c"]);

        // 'a' is oldest but protected, so 'b' goes first
        assert_eq!(order.pop_oldest_except(&"a"), Some("b"));
        assert_eq!(order.iter().copied().collect::<Vec<_>>(), vec!["a", "c"]);
    }

    #[test]
    fn test_pop_oldest_except_empty() {
        let mut order: InsertionOrder<&str> = InsertionOrder::new();
        assert_eq!(order.pop_oldest_except(&"a"), None);
    }

    #[test]
    fn test_retain_preserves_order() {
        let mut order = order_of(&["a", "b", "c", "d"]);

        order.retain(|k| *k != "b" && *k != "d");

        assert_eq!(order.iter().copied().collect::<Vec<_>>(), vec!["a", "c"]);
    }
}
