//! tern_map — open-addressing hash map over the ABI containers.
//!
//! Slot storage is an `OwnedSlice` of tagged options, so the whole table
//! is itself layout-stable and crosses the boundary like any other
//! container. Linear probing from the hash slot, capacity doubling above
//! a 3/4 load factor, no deletion.

use anyhow::anyhow;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::mem;
use std::slice::Iter;

use tern_opt::Option;
use tern_own::{OwnedSlice, OwnedStr};

#[derive(Clone)]
#[repr(C)]
pub struct KeyValue<K, V> {
    key: K,
    value: V,
}

impl<K, V> KeyValue<K, V> {
    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn value(&self) -> &V {
        &self.value
    }
}

#[repr(C)]
pub struct HashMap<K, V> {
    data: OwnedSlice<Option<KeyValue<K, V>>>,
    n_items: usize,
    capacity: usize,
}

#[inline]
fn hash<K: Hash>(s: &K) -> u64 {
    let mut hasher = DefaultHasher::new();
    s.hash(&mut hasher);
    hasher.finish()
}

/// The hash the producer uses for string keys; the native side must use
/// the same one, so `tern_rt` re-exports it.
pub fn hash_owned_str(s: &OwnedStr) -> u64 {
    hash(s)
}

impl<K: Clone + Hash + Eq, V: Clone> HashMap<K, V> {
    pub fn new() -> Self {
        Self::new_with_capacity(64)
    }

    pub fn new_with_capacity(capacity: usize) -> Self {
        let data = OwnedSlice::from(vec![Option::None; capacity]);
        HashMap {
            data,
            n_items: 0,
            capacity,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.n_items
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.n_items == 0
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Inserts or updates. The probe visits every slot at most once, so
    /// a full table reports an error instead of spinning.
    pub fn insert(&mut self, key: &K, value: V) -> Result<(), anyhow::Error> {
        if self.n_items > 3 * self.capacity / 4 {
            self.double_capacity()
        }
        let index = (hash(key) % self.capacity as u64) as usize;
        for i in 0..self.capacity {
            let slot = &mut self.data[(index + i) % self.capacity];
            match slot.as_mut() {
                Option::Some(entry) if entry.key == *key => {
                    entry.value = value;
                    return Ok(());
                }
                Option::Some(_) => {}
                Option::None => {
                    *slot = Option::Some(KeyValue {
                        key: key.clone(),
                        value,
                    });
                    self.n_items += 1;
                    return Ok(());
                }
            }
        }
        Err(anyhow!("failed to find an empty slot in the table"))
    }

    pub fn get(&self, key: &K) -> std::option::Option<&V> {
        let index = (hash(key) % self.capacity as u64) as usize;
        for i in 0..self.capacity {
            match &self.data[(index + i) % self.capacity] {
                Option::Some(entry) if entry.key == *key => return Some(&entry.value),
                Option::Some(_) => {}
                // No deletion exists, so a hole ends every probe chain.
                Option::None => return None,
            }
        }
        None
    }

    pub fn iter(&self) -> Iter<'_, Option<KeyValue<K, V>>> {
        self.data.iter()
    }

    fn double_capacity(&mut self) {
        self.capacity *= 2;
        let new_data = OwnedSlice::from(vec![Option::None; self.capacity]);
        let old_data = mem::replace(&mut self.data, new_data);
        self.n_items = 0;
        for entry in old_data
            .into_iter()
            .filter_map(|x| Into::<std::option::Option<KeyValue<K, V>>>::into(x))
        {
            self.insert(&entry.key, entry.value)
                .expect("doubled table should have room for every entry")
        }
    }
}

impl<K: Clone + Hash + Eq, V: Clone> Default for HashMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
