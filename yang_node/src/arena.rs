//! Per-module arena of compiled nodes (spec §3, §9): indices instead of
//! owning pointers, so the sibling list's back-link is a plain `NodeId`
//! and teardown is a linear `Vec` drop.

use yang_ir::{NodeId, StringDictionary};

use crate::cnode::CNode;

#[derive(Default)]
pub struct NodeArena {
    nodes: Vec<CNode>,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: NodeId) -> &CNode {
        &self.nodes[id.index()]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut CNode {
        &mut self.nodes[id.index()]
    }

    /// Allocate `node`'s slot. `node.prev`/`node.next` are overwritten by
    /// [`Self::append_sibling`] right after; the caller doesn't need to
    /// set them.
    pub fn insert(&mut self, node: CNode) -> NodeId {
        let id = NodeId::new(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Current slot count, usable as a rollback mark: every id allocated
    /// after a `len()` call is discardable with [`Self::truncate`] as long
    /// as nothing outside the arena has observed those ids yet.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Drop every node allocated since `mark` (spec §7: "the node compiler
    /// frees the in-flight node on error") — used to unwind a `compile_node`
    /// call that reserved a slot, and possibly a whole subtree under it,
    /// before a later step failed.
    pub fn truncate(&mut self, mark: usize) {
        self.nodes.truncate(mark);
    }

    /// Append the already-allocated `new_id` to the sibling list whose
    /// first element is `*head` (spec §3: "sibling list is doubly linked
    /// but circular on `prev` only ... to allow O(1) append without a
    /// tail pointer").
    pub fn append_sibling(&mut self, head: &mut Option<NodeId>, new_id: NodeId) {
        match *head {
            None => {
                self.nodes[new_id.index()].prev = new_id;
                self.nodes[new_id.index()].next = None;
                *head = Some(new_id);
            }
            Some(first) => {
                let last = self.nodes[first.index()].prev;
                self.nodes[last.index()].next = Some(new_id);
                self.nodes[new_id.index()].prev = last;
                self.nodes[new_id.index()].next = None;
                self.nodes[first.index()].prev = new_id;
            }
        }
    }

    /// Walk a sibling list front to back.
    pub fn siblings(&self, head: Option<NodeId>) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(head, move |&id| self.nodes[id.index()].next)
    }

    /// Find a direct child of `head`'s list by name.
    pub fn find_by_name(&self, head: Option<NodeId>, dict: &dyn StringDictionary, name: &str) -> Option<NodeId> {
        self.siblings(head).find(|&id| dict.resolve(self.nodes[id.index()].name) == name)
    }

    /// Unlink `id` from the sibling list whose first element is `*head`
    /// (deviation §4.20.3 `not-supported`). Re-threads the prev-circular
    /// invariant whether `id` is the head, the tail, or in the middle.
    pub fn remove_sibling(&mut self, head: &mut Option<NodeId>, id: NodeId) {
        let next = self.nodes[id.index()].next;
        let prev = self.nodes[id.index()].prev;
        let is_head = *head == Some(id);

        if let Some(n) = next {
            self.nodes[n.index()].prev = prev;
        } else if let Some(h) = *head {
            // id was the tail; the new tail's prev-link on the head must
            // point at whatever came before id.
            self.nodes[h.index()].prev = prev;
        }

        if !is_head {
            self.nodes[prev.index()].next = next;
        }

        *head = if is_head { next } else { *head };
    }
}
