/// Byte frequency table for Huffman tree construction
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrequencyTable {
    /// Occurrence count per byte value
    counts: [u64; 256],
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self { counts: [0; 256] }
    }

    /// Count occurrences of every byte value in `data`
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut table = Self::new();
        for &byte in data {
            table.counts[byte as usize] += 1;
        }
        table
    }

    /// Build a table from explicit (value, count) pairs
    pub fn from_counts<I: IntoIterator<Item = (u8, u64)>>(pairs: I) -> Self {
        let mut table = Self::new();
        for (value, count) in pairs {
            table.counts[value as usize] = count;
        }
        table
    }

    pub fn count(&self, value: u8) -> u64 {
        self.counts[value as usize]
    }

    /// Number of byte values with a non-zero count
    pub fn distinct(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    /// Sum of all counts
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&c| c == 0)
    }

    /// Present (value, count) pairs in ascending byte order
    pub fn iter(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts.iter().enumerate().filter(|(_, &c)| c > 0).map(|(v, &c)| (v as u8, c))
    }

    /// Copy of this table with every present marker byte scaled by `factor` and floored.
    ///
    /// Markers are a set: repeated bytes are boosted once. Absent markers stay at
    /// zero so they never enter the tree, and a present byte never drops below 1.
    pub fn boosted(&self, markers: &[u8], factor: f64) -> Self {
        let mut is_marker = [false; 256];
        for &marker in markers {
            is_marker[marker as usize] = true;
        }

        let mut boosted = self.clone();
        for (count, _) in boosted.counts.iter_mut().zip(is_marker).filter(|(c, m)| *m && **c > 0) {
            *count = ((*count as f64 * factor).floor() as u64).max(1);
        }
        boosted
    }

    /// Shannon entropy in bits per symbol, with probabilities taken over `total_len` symbols
    pub fn entropy(&self, total_len: u64) -> f64 {
        if total_len == 0 {
            return 0.0;
        }
        let total = total_len as f64;
        -self
            .iter()
            .map(|(_, count)| {
                let p = count as f64 / total;
                p * p.log2()
            })
            .sum::<f64>()
    }
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}
