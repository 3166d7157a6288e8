//! Huffman tree construction, decoding and (de)serialization.
//!
//! The tree is an owned recursive value. On the wire it is a nested record
//! `{ "value", "weight", "left", "right" }` with `null` for absent fields;
//! weights are carried for diagnostics only.

use serde::{Deserialize, Serialize};

use super::frequency::FrequencyTable;
use super::queue::NodeQueue;
use crate::bits::BitReader;
use crate::error::{Error, Result};

/// A node of the Huffman tree
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HuffmanNode {
    Leaf {
        value: u8,
        weight: u64,
    },
    /// `right` is absent only at the root of a single-symbol tree
    Internal {
        weight: u64,
        left: Box<HuffmanNode>,
        right: Option<Box<HuffmanNode>>,
    },
}

impl HuffmanNode {
    pub fn weight(&self) -> u64 {
        match self {
            Self::Leaf { weight, .. } | Self::Internal { weight, .. } => *weight,
        }
    }

    /// Byte value for leaves, `None` for internal nodes
    pub fn value(&self) -> Option<u8> {
        match self {
            Self::Leaf { value, .. } => Some(*value),
            Self::Internal { .. } => None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf { .. })
    }

    fn merge(left: HuffmanNode, right: HuffmanNode) -> Self {
        Self::Internal {
            weight: left.weight() + right.weight(),
            left: Box::new(left),
            right: Some(Box::new(right)),
        }
    }

    fn depth(&self) -> usize {
        match self {
            Self::Leaf { .. } => 0,
            Self::Internal { left, right, .. } => {
                1 + left.depth().max(right.as_ref().map_or(0, |r| r.depth()))
            }
        }
    }

    fn leaf_count(&self) -> usize {
        match self {
            Self::Leaf { .. } => 1,
            Self::Internal { left, right, .. } => {
                left.leaf_count() + right.as_ref().map_or(0, |r| r.leaf_count())
            }
        }
    }
}

/// Huffman prefix-code tree
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "NodeRecord", try_from = "NodeRecord")]
pub struct HuffmanTree {
    root: HuffmanNode,
}

impl HuffmanTree {
    /// Build a tree from a frequency table. Returns `None` for an empty table.
    pub fn build(frequencies: &FrequencyTable) -> Option<Self> {
        let mut leaves = frequencies.iter().map(|(value, weight)| HuffmanNode::Leaf { value, weight });

        // Special case: only one symbol. The lone leaf hangs off the left of the root.
        if frequencies.distinct() == 1 {
            let leaf = leaves.next()?;
            return Some(Self {
                root: HuffmanNode::Internal {
                    weight: leaf.weight(),
                    left: Box::new(leaf),
                    right: None,
                },
            });
        }

        let mut queue = NodeQueue::with_capacity(frequencies.distinct());
        for leaf in leaves {
            queue.insert(leaf);
        }

        // Combine the two lowest nodes until one remains
        while queue.size() > 1 {
            let left = queue.extract_min()?;
            let right = queue.extract_min()?;
            queue.insert(HuffmanNode::merge(left, right));
        }

        queue.extract_min().map(|root| Self { root })
    }

    pub fn root(&self) -> &HuffmanNode {
        &self.root
    }

    /// Total weight at the root
    pub fn weight(&self) -> u64 {
        self.root.weight()
    }

    /// Longest root-to-leaf path
    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    /// Number of distinct byte values in the tree
    pub fn leaf_count(&self) -> usize {
        self.root.leaf_count()
    }

    /// Decode every symbol in `bits` by walking from the root
    pub fn decode(&self, bits: &mut BitReader<'_>, size_hint: usize) -> Result<Vec<u8>> {
        let mut output = Vec::with_capacity(size_hint);
        let mut current = &self.root;

        while let Some(bit) = bits.read_bit() {
            let next = match current {
                HuffmanNode::Internal { left, right, .. } => {
                    if bit {
                        right.as_deref()
                    } else {
                        Some(left.as_ref())
                    }
                }
                HuffmanNode::Leaf { .. } => None,
            };

            let next = next.ok_or(Error::DecodeTraversal { bit_position: bits.bit_position() - 1 })?;

            if let HuffmanNode::Leaf { value, .. } = next {
                output.push(*value);
                current = &self.root;
            } else {
                current = next;
            }
        }

        if !std::ptr::eq(current, &self.root) {
            return Err(Error::TruncatedCode { bit_position: bits.bit_position() });
        }

        Ok(output)
    }

    /// Serialize the tree record as JSON bytes
    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| Error::Internal(e.to_string()))
    }

    /// Parse a tree record from JSON bytes
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| Error::InvalidTree(e.to_string()))
    }
}

/// Wire shape of a tree node
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeRecord {
    pub value: Option<u8>,
    pub weight: u64,
    pub left: Option<Box<NodeRecord>>,
    pub right: Option<Box<NodeRecord>>,
}

impl From<&HuffmanNode> for NodeRecord {
    fn from(node: &HuffmanNode) -> Self {
        match node {
            HuffmanNode::Leaf { value, weight } => {
                Self { value: Some(*value), weight: *weight, left: None, right: None }
            }
            HuffmanNode::Internal { weight, left, right } => Self {
                value: None,
                weight: *weight,
                left: Some(Box::new(Self::from(left.as_ref()))),
                right: right.as_ref().map(|r| Box::new(Self::from(r.as_ref()))),
            },
        }
    }
}

impl From<HuffmanTree> for NodeRecord {
    fn from(tree: HuffmanTree) -> Self {
        Self::from(&tree.root)
    }
}

impl TryFrom<NodeRecord> for HuffmanTree {
    type Error = Error;

    fn try_from(record: NodeRecord) -> Result<Self> {
        let mut seen = [false; 256];
        let root = node_from_record(record, true, &mut seen)?;
        if root.is_leaf() {
            return Err(Error::InvalidTree("root must be an internal node".to_string()));
        }
        Ok(Self { root })
    }
}

fn node_from_record(record: NodeRecord, is_root: bool, seen: &mut [bool; 256]) -> Result<HuffmanNode> {
    match (record.value, record.left, record.right) {
        (Some(value), None, None) => {
            if std::mem::replace(&mut seen[value as usize], true) {
                return Err(Error::InvalidTree(format!("duplicate leaf value {}", value)));
            }
            Ok(HuffmanNode::Leaf { value, weight: record.weight })
        }
        (Some(value), _, _) => Err(Error::InvalidTree(format!("leaf {} has children", value))),
        (None, Some(left), right) => {
            let left = node_from_record(*left, false, seen)?;
            let right = match right {
                Some(right) => Some(Box::new(node_from_record(*right, false, seen)?)),
                None if is_root && left.is_leaf() => None,
                None => {
                    return Err(Error::InvalidTree("internal node missing right child".to_string()))
                }
            };
            Ok(HuffmanNode::Internal { weight: record.weight, left: Box::new(left), right })
        }
        (None, None, _) => Err(Error::InvalidTree("internal node missing left child".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits::pack_bits;

    fn bits(s: &str) -> Vec<bool> {
        s.chars().map(|c| c == '1').collect()
    }

    #[test]
    fn test_empty_table() {
        assert!(HuffmanTree::build(&FrequencyTable::new()).is_none());
    }

    #[test]
    fn test_single_symbol_shape() {
        let tree = HuffmanTree::build(&FrequencyTable::from_counts([(7, 5)])).unwrap();
        match tree.root() {
            HuffmanNode::Internal { weight, left, right } => {
                assert_eq!(*weight, 5);
                assert_eq!(**left, HuffmanNode::Leaf { value: 7, weight: 5 });
                assert!(right.is_none());
            }
            other => panic!("unexpected root {:?}", other),
        }
        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.leaf_count(), 1);
    }

    #[test]
    fn test_two_symbols() {
        let tree = HuffmanTree::build(&FrequencyTable::from_counts([(1, 3), (2, 1)])).unwrap();
        match tree.root() {
            HuffmanNode::Internal { left, right, .. } => {
                assert_eq!(left.value(), Some(2));
                assert_eq!(right.as_ref().and_then(|r| r.value()), Some(1));
            }
            other => panic!("unexpected root {:?}", other),
        }
        assert_eq!(tree.weight(), 4);
    }

    #[test]
    fn test_equal_weights_shape() {
        // {255:1, 5:1, 65:1, 66:1}: leaves pair off in ascending byte order
        let table = FrequencyTable::from_bytes(&[255, 5, 65, 66]);
        let tree = HuffmanTree::build(&table).unwrap();
        let HuffmanNode::Internal { left, right: Some(right), .. } = tree.root() else {
            panic!("root must be full internal node");
        };
        let HuffmanNode::Internal { left: ll, right: Some(lr), .. } = left.as_ref() else {
            panic!("left must be internal");
        };
        let HuffmanNode::Internal { left: rl, right: Some(rr), .. } = right.as_ref() else {
            panic!("right must be internal");
        };
        assert_eq!((ll.value(), lr.value()), (Some(5), Some(65)));
        assert_eq!((rl.value(), rr.value()), (Some(66), Some(255)));
        assert_eq!(tree.leaf_count(), 4);
        assert_eq!(tree.depth(), 2);
    }

    #[test]
    fn test_build_is_deterministic() {
        let table = FrequencyTable::from_bytes(b"abracadabra alakazam");
        assert_eq!(HuffmanTree::build(&table), HuffmanTree::build(&table));
    }

    #[test]
    fn test_json_round_trip() {
        let table = FrequencyTable::from_bytes(b"hello huffman");
        let tree = HuffmanTree::build(&table).unwrap();
        let json = tree.to_json().unwrap();
        assert_eq!(HuffmanTree::from_json(&json).unwrap(), tree);
    }

    #[test]
    fn test_json_shape_single_symbol() {
        let tree = HuffmanTree::build(&FrequencyTable::from_counts([(7, 5)])).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&tree.to_json().unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "value": null,
                "weight": 5,
                "left": { "value": 7, "weight": 5, "left": null, "right": null },
                "right": null
            })
        );
    }

    #[test]
    fn test_reject_bad_records() {
        let cases = [
            r#"{"value":1,"weight":1,"left":null,"right":null}"#,
            r#"{"value":null,"weight":1,"left":null,"right":null}"#,
            r#"{"value":2,"weight":1,"left":{"value":1,"weight":1},"right":null}"#,
            r#"{"value":null,"weight":2,"left":{"value":1,"weight":1},"right":{"value":1,"weight":1}}"#,
            r#"{"value":null,"weight":2,"left":{"value":null,"weight":1,"left":{"value":1,"weight":1}},"right":{"value":2,"weight":1}}"#,
            r#"{"value":300,"weight":1,"left":null,"right":null}"#,
            r#"not json"#,
        ];
        for case in cases {
            let err = HuffmanTree::from_json(case.as_bytes()).unwrap_err();
            assert!(err.is_malformed_container(), "{} -> {:?}", case, err);
        }
    }

    #[test]
    fn test_decode() {
        // left=2 ("0"), right=1 ("1")
        let tree = HuffmanTree::build(&FrequencyTable::from_counts([(1, 3), (2, 1)])).unwrap();
        let payload = pack_bits(&bits("1101"));
        let mut reader = BitReader::from_payload(&payload);
        assert_eq!(tree.decode(&mut reader, 4).unwrap(), vec![1, 1, 2, 1]);
    }

    #[test]
    fn test_decode_single_symbol_rejects_right_turn() {
        let tree = HuffmanTree::build(&FrequencyTable::from_counts([(7, 2)])).unwrap();
        let payload = pack_bits(&bits("001"));
        let mut reader = BitReader::from_payload(&payload);
        let err = tree.decode(&mut reader, 3).unwrap_err();
        assert!(matches!(err, Error::DecodeTraversal { bit_position: 2 }));
    }

    #[test]
    fn test_decode_truncated_code() {
        // Three symbols: codes are two bits deep on one side
        let table = FrequencyTable::from_counts([(1, 1), (2, 1), (3, 4)]);
        let tree = HuffmanTree::build(&table).unwrap();
        // One-bit prefix of a two-bit code
        let deep_prefix = match tree.root() {
            HuffmanNode::Internal { left, .. } if !left.is_leaf() => "0",
            _ => "1",
        };
        let payload = pack_bits(&bits(deep_prefix));
        let mut reader = BitReader::from_payload(&payload);
        let err = tree.decode(&mut reader, 1).unwrap_err();
        assert!(matches!(err, Error::TruncatedCode { .. }));
    }
}
