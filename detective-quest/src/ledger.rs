//! Ordered, duplicate-free notebook of collected clues.
//!
//! The ledger is a plain (unbalanced) binary search tree keyed by clue text and
//! compared byte-wise. Insertion consumes the ledger and hands back the new one, so the
//! caller always continues with the latest value.

use std::cmp::Ordering;
use std::fmt;

struct ClueNode {
    text: String,
    left: Option<Box<ClueNode>>,
    right: Option<Box<ClueNode>>,
}

impl ClueNode {
    fn new(text: &str) -> Box<Self> {
        Box::new(Self {
            text: text.to_string(),
            left: None,
            right: None,
        })
    }
}

#[derive(Default)]
pub struct ClueLedger {
    root: Option<Box<ClueNode>>,
    len: usize,
}

impl ClueLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `clue` and returns the updated ledger together with whether the clue
    /// was new. Inserting a clue that is already present leaves the ledger unchanged.
    #[must_use]
    pub fn insert(mut self, clue: &str) -> (Self, bool) {
        let inserted = Self::link(&mut self.root, clue);
        if inserted {
            self.len += 1;
        }
        (self, inserted)
    }

    fn link(mut slot: &mut Option<Box<ClueNode>>, clue: &str) -> bool {
        while let Some(node) = slot {
            slot = match clue.cmp(node.text.as_str()) {
                Ordering::Less => &mut node.left,
                Ordering::Greater => &mut node.right,
                Ordering::Equal => return false,
            };
        }
        *slot = Some(ClueNode::new(clue));
        true
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Lazily yields every clue in ascending order. Can be called any number of times.
    pub fn in_order(&self) -> InOrder<'_> {
        let mut iter = InOrder { stack: Vec::new() };
        iter.descend(self.root.as_deref());
        iter
    }
}

impl fmt::Debug for ClueLedger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.in_order()).finish()
    }
}

impl Drop for ClueLedger {
    // Sorted insertions degenerate into a list, unlink iteratively.
    fn drop(&mut self) {
        let mut pending: Vec<Box<ClueNode>> = self.root.take().into_iter().collect();
        while let Some(mut node) = pending.pop() {
            pending.extend(node.left.take());
            pending.extend(node.right.take());
        }
    }
}

impl<'a> IntoIterator for &'a ClueLedger {
    type Item = &'a str;
    type IntoIter = InOrder<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.in_order()
    }
}

pub struct InOrder<'a> {
    stack: Vec<&'a ClueNode>,
}

impl<'a> InOrder<'a> {
    fn descend(&mut self, mut node: Option<&'a ClueNode>) {
        while let Some(current) = node {
            self.stack.push(current);
            node = current.left.as_deref();
        }
    }
}

impl<'a> Iterator for InOrder<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.descend(node.right.as_deref());
        Some(node.text.as_str())
    }
}
