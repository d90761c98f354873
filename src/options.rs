/// Settings for `serialize_with()` and `deserialize_with()`.
///
/// ```
/// let options = protowire::Options::default().reserve_capacity(64).max_depth(8);
/// assert_eq!(options.get_max_depth(), 8);
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Options {
    reserve_capacity: usize,
    max_depth: usize,
}

/// Default initial capacity of the output buffer of `serialize()`.
pub const DEFAULT_RESERVE_CAPACITY: usize = 1024;
/// Default limit on nested structures during decode.
pub const DEFAULT_MAX_DEPTH: usize = 100;

impl Default for Options {
    fn default() -> Self {
        Self {
            reserve_capacity: DEFAULT_RESERVE_CAPACITY,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Options {
    /// Sets the number of bytes reserved up front for serialized output.
    pub fn reserve_capacity(mut self, bytes: usize) -> Self {
        self.reserve_capacity = bytes;
        self
    }

    /// Sets how many levels of nested structures a decode may enter. The top-level record is
    /// depth 0.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn get_reserve_capacity(&self) -> usize {
        self.reserve_capacity
    }

    pub fn get_max_depth(&self) -> usize {
        self.max_depth
    }
}
