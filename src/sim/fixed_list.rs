//! Fixed-capacity ordered entity storage
//!
//! Live entries always occupy a contiguous prefix: removal shifts every later
//! entry one slot towards the front, preserving order.

use std::ops::{Deref, DerefMut};

/// Ordered list holding at most `N` entries
#[derive(Debug, Clone, PartialEq)]
pub struct FixedList<T, const N: usize> {
    items: Vec<T>,
}

impl<T, const N: usize> Default for FixedList<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize> FixedList<T, N> {
    pub fn new() -> Self {
        Self {
            items: Vec::with_capacity(N),
        }
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= N
    }

    /// Append to the first free slot; hands the item back when full
    pub fn push(&mut self, item: T) -> Result<(), T> {
        if self.is_full() {
            return Err(item);
        }
        self.items.push(item);
        Ok(())
    }

    /// Remove the entry at `index`, compacting the tail
    pub fn remove(&mut self, index: usize) -> Option<T> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Keep only entries matching `keep`, preserving order
    pub fn retain(&mut self, keep: impl FnMut(&T) -> bool) {
        self.items.retain(keep);
    }
}

impl<T, const N: usize> Deref for FixedList<T, N> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.items
    }
}

impl<T, const N: usize> DerefMut for FixedList<T, N> {
    fn deref_mut(&mut self) -> &mut [T] {
        &mut self.items
    }
}

impl<'a, T, const N: usize> IntoIterator for &'a FixedList<T, N> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<'a, T, const N: usize> IntoIterator for &'a mut FixedList<T, N> {
    type Item = &'a mut T;
    type IntoIter = std::slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_push_rejects_when_full() {
        let mut list: FixedList<u32, 2> = FixedList::new();
        assert!(list.push(1).is_ok());
        assert!(list.push(2).is_ok());
        assert_eq!(list.push(3), Err(3));
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_remove_shifts_left() {
        let mut list: FixedList<u32, 5> = FixedList::new();
        for n in 0..5 {
            list.push(n).unwrap();
        }
        assert_eq!(list.remove(1), Some(1));
        assert_eq!(&list[..], &[0, 2, 3, 4]);
        assert_eq!(list.remove(9), None);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Push(u32),
        Remove(usize),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            any::<u32>().prop_map(Op::Push),
            (0usize..25).prop_map(Op::Remove),
        ]
    }

    proptest! {
        #[test]
        fn prop_matches_compacted_model(ops in prop::collection::vec(op(), 0..200)) {
            let mut list: FixedList<u32, 20> = FixedList::new();
            let mut model: Vec<u32> = Vec::new();
            for op in ops {
                match op {
                    Op::Push(v) => {
                        let accepted = list.push(v).is_ok();
                        prop_assert_eq!(accepted, model.len() < 20);
                        if accepted {
                            model.push(v);
                        }
                    }
                    Op::Remove(i) => {
                        let removed = list.remove(i);
                        let expected = (i < model.len()).then(|| model.remove(i));
                        prop_assert_eq!(removed, expected);
                    }
                }
                prop_assert!(list.len() <= 20);
                prop_assert_eq!(&list[..], &model[..]);
            }
        }
    }
}
