//! Tuning knobs shared by sessions, node streams and readers.

/// Default read size for [`crate::NodeReader`].
pub const DEFAULT_BLOCK_SIZE: usize = 4096;

/// Parser options.
///
/// ```
/// use flexml_core::Options;
///
/// let opts = Options::default().block_size(16 * 1024).compact_threshold(64 * 1024);
/// assert_eq!(opts.get_block_size(), 16 * 1024);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    block_size: usize,
    initial_capacity: usize,
    compact_threshold: Option<usize>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            initial_capacity: 0,
            compact_threshold: None,
        }
    }
}

impl Options {
    /// Bytes requested per read when pulling from a `Read` source.
    /// Zero is treated as one.
    pub fn block_size(mut self, size: usize) -> Self {
        self.block_size = size.max(1);
        self
    }

    /// Bytes to preallocate for the session buffer.
    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Discard consumed input once the committed position passes this many
    /// bytes. Off by default, so the buffer only grows.
    pub fn compact_threshold(mut self, threshold: usize) -> Self {
        self.compact_threshold = Some(threshold);
        self
    }

    pub fn get_block_size(&self) -> usize {
        self.block_size
    }

    pub fn get_initial_capacity(&self) -> usize {
        self.initial_capacity
    }

    pub fn get_compact_threshold(&self) -> Option<usize> {
        self.compact_threshold
    }
}
