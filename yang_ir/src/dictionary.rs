//! The string-interning dictionary is an external collaborator (spec §1, §6):
//! the core only ever holds a `&dyn StringDictionary` and never owns the
//! storage. [`SimpleDictionary`] is a reference implementation good enough
//! to drive the rest of this workspace's tests; production callers plug in
//! their own (typically the same interner the external parser uses, so
//! P-form and C-form strings are trivially comparable by handle).

use crate::StringId;
use rustc_hash::FxHashMap;
use std::cell::RefCell;

/// `intern`/`release` surface a string dictionary must provide (spec §6).
///
/// Every handle is refcounted; `intern`-ing an already-known string bumps
/// the count and returns the existing handle, `release` decrements it, and
/// the dictionary is free to recycle a handle once its count reaches zero.
pub trait StringDictionary {
    /// Intern `s`, returning a stable handle. Bumps the refcount if `s` was
    /// already interned.
    fn intern(&self, s: &str) -> StringId;

    /// Resolve a handle back to its string content.
    ///
    /// # Panics
    /// May panic if `id` was never interned or was already fully released.
    fn resolve(&self, id: StringId) -> String;

    /// Decrement `id`'s refcount, freeing the slot at zero.
    fn release(&self, id: StringId);
}

#[derive(Default)]
struct Slot {
    content: Box<str>,
    refcount: u32,
}

#[derive(Default)]
struct Inner {
    map: FxHashMap<Box<str>, u32>,
    slots: Vec<Slot>,
    free: Vec<u32>,
}

/// Reference [`StringDictionary`] implementation: single-threaded,
/// `RefCell`-guarded, refcounted, with slot reuse once a string's count
/// drops to zero. Matches the single-threaded, synchronous core (spec §5).
#[derive(Default)]
pub struct SimpleDictionary {
    inner: RefCell<Inner>,
}

impl SimpleDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current refcount for `id`, or 0 if unknown/freed. For tests.
    pub fn refcount(&self, id: StringId) -> u32 {
        let inner = self.inner.borrow();
        inner
            .slots
            .get(id.index())
            .map(|s| s.refcount)
            .unwrap_or(0)
    }
}

impl StringDictionary for SimpleDictionary {
    fn intern(&self, s: &str) -> StringId {
        let mut inner = self.inner.borrow_mut();
        if let Some(&idx) = inner.map.get(s) {
            inner.slots[idx as usize].refcount += 1;
            return StringId::new(idx);
        }
        let boxed: Box<str> = s.into();
        let idx = if let Some(idx) = inner.free.pop() {
            inner.slots[idx as usize] = Slot {
                content: boxed.clone(),
                refcount: 1,
            };
            idx
        } else {
            let idx = inner.slots.len() as u32;
            inner.slots.push(Slot {
                content: boxed.clone(),
                refcount: 1,
            });
            idx
        };
        inner.map.insert(boxed, idx);
        StringId::new(idx)
    }

    fn resolve(&self, id: StringId) -> String {
        let inner = self.inner.borrow();
        inner.slots[id.index()].content.to_string()
    }

    fn release(&self, id: StringId) {
        if id.is_none() {
            return;
        }
        let mut inner = self.inner.borrow_mut();
        let idx = id.index();
        assert!(inner.slots[idx].refcount > 0, "double release of {id:?}");
        inner.slots[idx].refcount -= 1;
        if inner.slots[idx].refcount == 0 {
            let content = std::mem::take(&mut inner.slots[idx].content);
            inner.map.remove(&content);
            inner.free.push(idx as u32);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intern_dedups_and_refcounts() {
        let dict = SimpleDictionary::new();
        let a = dict.intern("container");
        let b = dict.intern("container");
        assert_eq!(a, b);
        assert_eq!(dict.refcount(a), 2);
        assert_eq!(dict.resolve(a), "container");
    }

    #[test]
    fn release_frees_slot_for_reuse() {
        let dict = SimpleDictionary::new();
        let a = dict.intern("x");
        dict.release(a);
        assert_eq!(dict.refcount(a), 0);
        let b = dict.intern("y");
        assert_eq!(a, b, "freed slot should be recycled");
        assert_eq!(dict.resolve(b), "y");
    }

    #[test]
    #[should_panic(expected = "double release")]
    fn double_release_panics() {
        let dict = SimpleDictionary::new();
        let a = dict.intern("z");
        dict.release(a);
        dict.release(a);
    }
}
