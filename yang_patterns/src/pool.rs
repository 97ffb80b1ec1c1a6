//! Refcounted pattern storage (spec §4.5, §9): derivation inherits every
//! parent pattern by reference rather than recompiling it, so patterns are
//! shared across a typedef chain the same way compiled types are.

use crate::engine::{CompiledRegex, PatternEngine};
use crate::translate::translate;
use yang_diagnostic::{Error, Result};
use yang_ir::{PatternId, SchemaPath, StringId};

/// One compiled pattern: its XSD source (for dumps/diagnostics), the
/// translated PCRE text, the inverted flag, and the engine's opaque handle.
#[derive(Debug)]
pub struct CompiledPattern {
    pub source: StringId,
    pub pcre: String,
    pub inverted: bool,
    pub engine: Box<dyn CompiledRegex>,
}

struct Slot {
    pattern: CompiledPattern,
    refcount: u32,
}

/// Arena of compiled patterns addressed by [`PatternId`], refcounted so a
/// derived type can inherit a parent's patterns without recompiling them.
#[derive(Default)]
pub struct PatternPool {
    slots: Vec<Option<Slot>>,
    free: Vec<u32>,
}

impl PatternPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Translate `xsd` and insert it with refcount 1. `inverted` comes from
    /// the P-form pattern's own flag (`PatternP::inverted`).
    pub fn compile(
        &mut self,
        xsd: &str,
        inverted: bool,
        source: StringId,
        engine: &dyn PatternEngine,
    ) -> PatternId {
        let pcre = translate(xsd);
        let compiled = engine.compile(&pcre);
        self.insert(CompiledPattern {
            source,
            pcre,
            inverted,
            engine: compiled,
        })
    }

    pub fn insert(&mut self, pattern: CompiledPattern) -> PatternId {
        let slot = Slot {
            pattern,
            refcount: 1,
        };
        if let Some(idx) = self.free.pop() {
            self.slots[idx as usize] = Some(slot);
            PatternId::new(idx)
        } else {
            let idx = self.slots.len() as u32;
            self.slots.push(Some(slot));
            PatternId::new(idx)
        }
    }

    pub fn retain(&mut self, id: PatternId) {
        if let Some(slot) = self.slots[id.index()].as_mut() {
            slot.refcount += 1;
        }
    }

    pub fn release(&mut self, id: PatternId) -> Result<()> {
        let slot = self.slots[id.index()]
            .as_mut()
            .ok_or_else(|| Error::internal(SchemaPath::new(), "release of already-freed pattern"))?;
        slot.refcount -= 1;
        if slot.refcount == 0 {
            self.slots[id.index()] = None;
            self.free.push(id.raw());
        }
        Ok(())
    }

    pub fn get(&self, id: PatternId) -> Result<&CompiledPattern> {
        Ok(&self.slots[id.index()]
            .as_ref()
            .ok_or_else(|| Error::internal(SchemaPath::new(), "pattern id freed"))?
            .pattern)
    }

    pub fn refcount(&self, id: PatternId) -> u32 {
        self.slots[id.index()].as_ref().map_or(0, |s| s.refcount)
    }
}

/// Derivation inherits every parent pattern (refcount bump, no recompile)
/// then appends its own freshly compiled ones (spec §4.5).
pub fn inherit(pool: &mut PatternPool, parent: &[PatternId], own: Vec<PatternId>) -> Vec<PatternId> {
    let mut list = Vec::with_capacity(parent.len() + own.len());
    for &id in parent {
        pool.retain(id);
        list.push(id);
    }
    list.extend(own);
    list
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::PassthroughPatternEngine;

    #[test]
    fn compile_and_fetch_roundtrip() {
        let mut pool = PatternPool::new();
        let engine = PassthroughPatternEngine;
        let id = pool.compile("[a-z]+", false, StringId::new(0), &engine);
        assert!(!pool.get(id).unwrap().inverted);
        assert_eq!(pool.get(id).unwrap().pcre, "([a-z]+)$");
    }

    #[test]
    fn inverted_flag_is_kept_separately_from_the_translation() {
        let mut pool = PatternPool::new();
        let engine = PassthroughPatternEngine;
        let id = pool.compile("[a-z]+", true, StringId::new(0), &engine);
        assert!(pool.get(id).unwrap().inverted);
        assert_eq!(pool.get(id).unwrap().pcre, "([a-z]+)$");
    }

    #[test]
    fn inherit_bumps_parent_refcount_and_appends_own() {
        let mut pool = PatternPool::new();
        let engine = PassthroughPatternEngine;
        let parent_id = pool.compile("a", false, StringId::new(0), &engine);
        let own_id = pool.compile("b", false, StringId::new(1), &engine);
        let list = inherit(&mut pool, &[parent_id], vec![own_id]);
        assert_eq!(list, vec![parent_id, own_id]);
        assert_eq!(pool.refcount(parent_id), 2);
    }

    #[test]
    fn release_frees_slot_for_reuse() {
        let mut pool = PatternPool::new();
        let engine = PassthroughPatternEngine;
        let id = pool.compile("a", false, StringId::new(0), &engine);
        pool.release(id).unwrap();
        let id2 = pool.compile("b", false, StringId::new(1), &engine);
        assert_eq!(id2, id);
    }
}
