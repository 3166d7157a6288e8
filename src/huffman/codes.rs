use std::collections::BTreeMap;
use std::fmt;

use super::tree::{HuffmanNode, HuffmanTree};

/// A prefix code: path bits from the root, `false` = left, `true` = right
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Code {
    bits: Vec<bool>,
}

impl Code {
    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn is_prefix_of(&self, other: &Code) -> bool {
        other.bits.starts_with(&self.bits)
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.bits {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Byte value to prefix code mapping
#[derive(Clone, Debug, Default)]
pub struct CodeTable {
    codes: BTreeMap<u8, Code>,
}

impl CodeTable {
    /// Label every root-to-leaf path of `tree`
    pub fn from_tree(tree: &HuffmanTree) -> Self {
        let mut table = Self::default();
        let mut path = Vec::new();
        table.walk(tree.root(), &mut path);
        table
    }

    fn walk(&mut self, node: &HuffmanNode, path: &mut Vec<bool>) {
        match node {
            HuffmanNode::Leaf { value, .. } => {
                // Empty path only for a bare leaf root
                let bits = if path.is_empty() { vec![false] } else { path.clone() };
                self.codes.insert(*value, Code { bits });
            }
            HuffmanNode::Internal { left, right, .. } => {
                path.push(false);
                self.walk(left, path);
                path.pop();
                if let Some(right) = right {
                    path.push(true);
                    self.walk(right, path);
                    path.pop();
                }
            }
        }
    }

    pub fn get(&self, value: u8) -> Option<&Code> {
        self.codes.get(&value)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, &Code)> {
        self.codes.iter().map(|(&v, c)| (v, c))
    }

    /// Dense lookup table indexed by byte value
    pub fn to_lookup(&self) -> Vec<Option<&Code>> {
        (0..=255u8).map(|v| self.codes.get(&v)).collect()
    }

    /// Whether no code is a prefix of another and none is empty
    pub fn is_prefix_free(&self) -> bool {
        let codes: Vec<&Code> = self.codes.values().collect();
        codes.iter().all(|c| !c.is_empty())
            && codes.iter().enumerate().all(|(i, a)| {
                codes.iter().enumerate().all(|(j, b)| i == j || !a.is_prefix_of(b))
            })
    }
}
