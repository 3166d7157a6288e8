use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use super::tree::HuffmanNode;

/// Heap entry carrying the insertion sequence for internal node ties
struct QueueEntry {
    node: HuffmanNode,
    seq: u64,
}

impl QueueEntry {
    /// Ordering key: weight, then leaves before internal nodes, then byte value
    /// for leaves and insertion order for internal nodes
    fn key(&self) -> (u64, bool, u16, u64) {
        match &self.node {
            HuffmanNode::Leaf { value, weight } => (*weight, false, *value as u16, 0),
            HuffmanNode::Internal { weight, .. } => (*weight, true, 0, self.seq),
        }
    }
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}
impl Eq for QueueEntry {}
impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

/// Min-priority queue of tree nodes with a total, deterministic order
pub struct NodeQueue {
    heap: BinaryHeap<Reverse<QueueEntry>>,
    next_seq: u64,
}

impl NodeQueue {
    pub fn new() -> Self {
        Self { heap: BinaryHeap::new(), next_seq: 0 }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { heap: BinaryHeap::with_capacity(capacity), next_seq: 0 }
    }

    pub fn insert(&mut self, node: HuffmanNode) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(QueueEntry { node, seq }));
    }

    /// Remove and return the lowest-ordered node
    pub fn extract_min(&mut self) -> Option<HuffmanNode> {
        self.heap.pop().map(|Reverse(entry)| entry.node)
    }

    pub fn size(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

impl Default for NodeQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(value: u8, weight: u64) -> HuffmanNode {
        HuffmanNode::Leaf { value, weight }
    }

    fn internal(weight: u64) -> HuffmanNode {
        HuffmanNode::Internal {
            weight,
            left: Box::new(leaf(0, weight)),
            right: Some(Box::new(leaf(1, 0))),
        }
    }

    #[test]
    fn test_ascending_weight() {
        let mut queue = NodeQueue::new();
        queue.insert(leaf(1, 30));
        queue.insert(leaf(2, 10));
        queue.insert(leaf(3, 20));
        assert_eq!(queue.size(), 3);
        assert_eq!(queue.extract_min().map(|n| n.weight()), Some(10));
        assert_eq!(queue.extract_min().map(|n| n.weight()), Some(20));
        assert_eq!(queue.extract_min().map(|n| n.weight()), Some(30));
        assert!(queue.extract_min().is_none());
        assert!(queue.is_empty());
    }

    #[test]
    fn test_leaf_before_internal_on_tie() {
        let mut queue = NodeQueue::new();
        queue.insert(internal(5));
        queue.insert(leaf(200, 5));
        assert_eq!(queue.extract_min().and_then(|n| n.value()), Some(200));
        assert_eq!(queue.extract_min().and_then(|n| n.value()), None);
    }

    #[test]
    fn test_leaves_by_value_on_tie() {
        let mut queue = NodeQueue::new();
        for value in [9, 3, 7, 1] {
            queue.insert(leaf(value, 4));
        }
        let order: Vec<u8> =
            std::iter::from_fn(|| queue.extract_min()).filter_map(|n| n.value()).collect();
        assert_eq!(order, vec![1, 3, 7, 9]);
    }

    #[test]
    fn test_internal_ties_in_insertion_order() {
        let mut queue = NodeQueue::new();
        let first = HuffmanNode::Internal {
            weight: 2,
            left: Box::new(leaf(10, 1)),
            right: Some(Box::new(leaf(11, 1))),
        };
        let second = HuffmanNode::Internal {
            weight: 2,
            left: Box::new(leaf(20, 1)),
            right: Some(Box::new(leaf(21, 1))),
        };
        queue.insert(second.clone());
        queue.insert(first.clone());
        assert_eq!(queue.extract_min(), Some(second));
        assert_eq!(queue.extract_min(), Some(first));
    }
}
