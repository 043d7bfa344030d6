use std::collections::TryReserveError;
use std::fmt;
use std::mem;

// Multiplier of the host string hash: h = 31 * h + unit over UTF-16 code units.
const HASH_MULTIPLIER: i32 = 31;

/// An entity that lives in a bucket chain: it has a key and owns the link to
/// the next entity hashing to the same slot.
pub trait Chained: Sized {
    fn key(&self) -> &str;

    fn link(&self) -> &Option<Box<Self>>;

    fn link_mut(&mut self) -> &mut Option<Box<Self>>;
}

/// Separate-chaining table of intrusive singly-linked chains.
///
/// Each slot owns the head of its chain; every entity owns its successor.
/// New entities always go to the head of their chain.
pub struct Table<T: Chained> {
    slots: Vec<Option<Box<T>>>,
}

impl<T: Chained> Table<T> {
    pub fn new(size: usize) -> Self {
        let mut slots = Vec::with_capacity(size);
        slots.resize_with(size, || None);
        Self { slots }
    }

    /// Stable 32-bit polynomial string hash, bit-compatible with the
    /// `String.hashCode` family of hashes.
    #[inline(always)]
    pub fn hash(key: &str) -> i32 {
        key.encode_utf16().fold(0i32, |hash, unit| {
            hash.wrapping_mul(HASH_MULTIPLIER).wrapping_add(unit as i32)
        })
    }

    /// `|hash| mod size`. The absolute value is taken unsigned so that
    /// `i32::MIN` lands on a valid slot instead of wrapping negative.
    #[inline(always)]
    pub fn slot_for(key: &str, size: usize) -> usize {
        Self::hash(key).unsigned_abs() as usize % size
    }

    #[inline(always)]
    pub fn slot(&self, key: &str) -> usize {
        Self::slot_for(key, self.slots.len())
    }

    /// Number of slots, not entities.
    pub fn size(&self) -> usize {
        self.slots.len()
    }

    pub fn head(&self, slot: usize) -> Option<&T> {
        self.slots.get(slot).and_then(|head| head.as_deref())
    }

    pub fn chain(&self, slot: usize) -> Chain<'_, T> {
        Chain {
            next: self.head(slot),
        }
    }

    /// Every entity, slot ascending then head to tail.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.slots.iter().flat_map(|head| Chain {
            next: head.as_deref(),
        })
    }

    pub fn lookup(&self, key: &str) -> Option<&T> {
        self.chain(self.slot(key)).find(|node| node.key() == key)
    }

    pub fn lookup_mut(&mut self, key: &str) -> Option<&mut T> {
        let slot = self.slot(key);
        let mut cursor = self.slots[slot].as_deref_mut();

        while let Some(node) = cursor {
            if node.key() == key {
                return Some(node);
            }
            cursor = node.link_mut().as_deref_mut();
        }

        None
    }

    /// Links `node` in at the head of its chain. Does not check for an
    /// existing entity with the same key.
    pub fn push_front(&mut self, mut node: Box<T>) -> &mut T {
        let slot = self.slot(node.key());
        *node.link_mut() = self.slots[slot].take();
        self.slots[slot].insert(node)
    }

    /// Returns the entity for `key`, pushing `make()` onto the head of its
    /// chain first if there is none.
    pub fn get_or_insert_with(&mut self, key: &str, make: impl FnOnce() -> Box<T>) -> &mut T {
        let slot = self.slot(key);
        let mut cursor = self.slots[slot].as_deref_mut();

        while let Some(node) = cursor {
            if node.key() == key {
                let node: *mut T = node;
                // SAFETY: `node` is borrowed from `&mut self` and nothing else
                // touches the table before it is returned with that lifetime.
                return unsafe { &mut *node };
            }
            cursor = node.link_mut().as_deref_mut();
        }

        self.push_front(make())
    }

    /// Visits every entity mutably, in the same order as [`Table::iter`].
    /// Callers must not rewire the links.
    pub fn for_each_mut(&mut self, mut f: impl FnMut(&mut T)) {
        for head in &mut self.slots {
            let mut cursor = head.as_deref_mut();
            while let Some(node) = cursor {
                f(node);
                cursor = node.link_mut().as_deref_mut();
            }
        }
    }

    /// Moves every entity into a fresh slot array of `size` slots.
    ///
    /// Old slots are drained left to right, each chain head to tail, and each
    /// entity is pushed onto the head of its new chain, so entities that stay
    /// together end up in reverse relative order. Entities are relinked, never
    /// copied. On allocation failure the table is left untouched.
    pub fn rehash(&mut self, size: usize) -> Result<(), TryReserveError> {
        let mut slots = Vec::new();
        slots.try_reserve_exact(size)?;
        slots.resize_with(size, || None);

        let old = mem::replace(&mut self.slots, slots);

        for mut head in old {
            while let Some(mut node) = head {
                head = node.link_mut().take();
                let slot = Self::slot_for(node.key(), size);
                *node.link_mut() = self.slots[slot].take();
                self.slots[slot] = Some(node);
            }
        }

        Ok(())
    }
}

impl<T: Chained> Drop for Table<T> {
    fn drop(&mut self) {
        for head in &mut self.slots {
            let mut cursor = head.take();
            while let Some(mut node) = cursor {
                cursor = node.link_mut().take();
            }
        }
    }
}

impl<T: Chained> fmt::Debug for Table<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(
                (0..self.size()).map(|slot| self.chain(slot).map(|n| n.key()).collect::<Vec<_>>()),
            )
            .finish()
    }
}

pub struct Chain<'a, T> {
    next: Option<&'a T>,
}

impl<'a, T: Chained> Iterator for Chain<'a, T> {
    type Item = &'a T;

    #[inline(always)]
    fn next(&mut self) -> Option<Self::Item> {
        let node = self.next?;
        self.next = node.link().as_deref();
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Node {
        key: String,
        value: u32,
        next: Option<Box<Node>>,
    }

    impl Node {
        fn boxed(key: &str, value: u32) -> Box<Self> {
            Box::new(Self {
                key: key.to_string(),
                value,
                next: None,
            })
        }
    }

    impl Chained for Node {
        fn key(&self) -> &str {
            &self.key
        }

        fn link(&self) -> &Option<Box<Self>> {
            &self.next
        }

        fn link_mut(&mut self) -> &mut Option<Box<Self>> {
            &mut self.next
        }
    }

    fn keys(tbl: &Table<Node>, slot: usize) -> Vec<&str> {
        tbl.chain(slot).map(|n| n.key()).collect()
    }

    #[test]
    fn test_hash() {
        assert_eq!(Table::<Node>::hash(""), 0);
        assert_eq!(Table::<Node>::hash("CA"), 2142);
        assert_eq!(Table::<Node>::hash("hello"), 99162322);
        assert_eq!(Table::<Node>::hash("Orange"), -1924984242);
        assert_eq!(Table::<Node>::hash("Bāgepalli"), 2114321243);
    }

    #[test]
    fn test_slot_of_min_hash() {
        assert_eq!(Table::<Node>::hash("polygenelubricants"), i32::MIN);
        assert_eq!(Table::<Node>::slot_for("polygenelubricants", 10), 8);
    }

    #[test]
    fn test_slot_negative_hash() {
        // |-1924984242| % 10
        assert_eq!(Table::<Node>::slot_for("Orange", 10), 2);
        assert_eq!(Table::<Node>::slot_for("LA", 10), 1);
    }

    #[test]
    fn test_push_front_and_lookup() {
        let mut tbl = Table::new(10);

        tbl.push_front(Node::boxed("CA", 1));
        tbl.push_front(Node::boxed("hello", 2));
        tbl.push_front(Node::boxed("LA", 3));

        // "CA" and "hello" share slot 2; the newest is at the head.
        assert_eq!(keys(&tbl, 2), vec!["hello", "CA"]);
        assert_eq!(keys(&tbl, 1), vec!["LA"]);

        assert_eq!(tbl.lookup("CA").map(|n| n.value), Some(1));
        assert_eq!(tbl.lookup("hello").map(|n| n.value), Some(2));
        assert!(tbl.lookup("Orange").is_none());

        tbl.lookup_mut("CA").unwrap().value = 10;
        assert_eq!(tbl.lookup("CA").unwrap().value, 10);
    }

    #[test]
    fn test_get_or_insert_with() {
        let mut tbl = Table::new(10);

        tbl.get_or_insert_with("CA", || Node::boxed("CA", 1)).value += 1;
        tbl.get_or_insert_with("CA", || Node::boxed("CA", 100)).value += 1;
        tbl.get_or_insert_with("hello", || Node::boxed("hello", 5));

        assert_eq!(keys(&tbl, 2), vec!["hello", "CA"]);
        assert_eq!(tbl.lookup("CA").unwrap().value, 3);
    }

    #[test]
    fn test_get_or_insert_with_deep_in_chain() {
        let mut tbl = Table::new(1);
        for (i, key) in ["a", "b", "c", "d"].iter().enumerate() {
            tbl.push_front(Node::boxed(key, i as u32));
        }

        let node = tbl.get_or_insert_with("a", || panic!("\"a\" is already linked"));
        node.value = 40;

        assert_eq!(keys(&tbl, 0), vec!["d", "c", "b", "a"]);
        assert_eq!(tbl.lookup("a").unwrap().value, 40);

        tbl.get_or_insert_with("e", || Node::boxed("e", 5));
        assert_eq!(keys(&tbl, 0), vec!["e", "d", "c", "b", "a"]);
    }

    #[test]
    fn test_iter_order() {
        let mut tbl = Table::new(10);
        for (i, key) in ["CA", "LA", "hello", "Ohio"].iter().enumerate() {
            tbl.push_front(Node::boxed(key, i as u32));
        }

        let order: Vec<_> = tbl.iter().map(|n| n.key()).collect();
        assert_eq!(order, vec!["LA", "hello", "CA", "Ohio"]);
    }

    #[test]
    fn test_for_each_mut() {
        let mut tbl = Table::new(4);
        for (i, key) in ["a", "b", "c", "d", "e"].iter().enumerate() {
            tbl.push_front(Node::boxed(key, i as u32));
        }

        tbl.for_each_mut(|n| n.value *= 2);

        let sum: u32 = tbl.iter().map(|n| n.value).sum();
        assert_eq!(sum, 20);
    }

    #[test]
    fn test_rehash_reverses_chain() {
        let mut tbl = Table::new(1);
        for key in ["a", "b", "c"] {
            tbl.push_front(Node::boxed(key, 0));
        }
        assert_eq!(keys(&tbl, 0), vec!["c", "b", "a"]);

        // Everything still collides in a single slot, so relinking walks
        // c, b, a and pushes each to the head.
        tbl.rehash(1).unwrap();
        assert_eq!(keys(&tbl, 0), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_rehash_disperses() {
        let mut tbl = Table::new(2);
        let names = ["CA", "LA", "hello", "Ohio", "Texas", "New York"];
        for name in names {
            tbl.push_front(Node::boxed(name, 0));
        }

        tbl.rehash(4).unwrap();
        assert_eq!(tbl.size(), 4);

        for name in names {
            let slot = Table::<Node>::slot_for(name, 4);
            assert!(keys(&tbl, slot).contains(&name));
        }
        assert_eq!(tbl.iter().count(), names.len());
    }

    #[test]
    fn test_rehash_capacity_overflow() {
        let mut tbl = Table::new(2);
        tbl.push_front(Node::boxed("CA", 7));

        assert!(tbl.rehash(usize::MAX).is_err());
        assert_eq!(tbl.size(), 2);
        assert_eq!(tbl.lookup("CA").unwrap().value, 7);
    }

    #[test]
    fn test_drop_long_chain() {
        let mut tbl = Table::new(1);
        for i in 0..200_000 {
            tbl.push_front(Node::boxed(&i.to_string(), i));
        }
        drop(tbl);
    }
}
