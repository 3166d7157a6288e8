/// Two little-endian u32 block lengths (metadata, tree)
pub const CONTAINER_HEADER_SIZE: usize = 8;

/// Format version written into every metadata block
pub const FORMAT_VERSION: &str = "1.0";

/// Major version this build can read
pub const SUPPORTED_MAJOR_VERSION: &str = "1";

/// Conventional file extension for containers
pub const CONTAINER_EXTENSION: &str = "huf";
