pub mod codes;
pub mod frequency;
pub mod queue;
pub mod tree;

pub use codes::{Code, CodeTable};
pub use frequency::FrequencyTable;
pub use queue::NodeQueue;
pub use tree::{HuffmanNode, HuffmanTree, NodeRecord};
