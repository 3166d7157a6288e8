#![no_main]

use libfuzzer_sys::fuzz_target;
use rlehuff::{CodeTable, HuffmanTree};

fuzz_target!(|data: &[u8]| {
    // Any tree that validates must yield a prefix-free code table
    if let Ok(tree) = HuffmanTree::from_json(data) {
        let codes = CodeTable::from_tree(&tree);
        assert!(codes.is_prefix_free());
        assert_eq!(codes.len(), tree.leaf_count());
    }
});
