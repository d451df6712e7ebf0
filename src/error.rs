/// Failures reported by the container layer.
///
/// Every variant is recoverable; callers decide whether to propagate or to
/// treat the condition as an empty result.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ContainerError {
    #[error("key not found")]
    KeyNotFound,

    #[error("heap is empty")]
    EmptyHeap,

    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("load factor must be in [0.1, 1.0), got {0}")]
    InvalidLoadFactor(f64),

    #[error("capacity must be at most {max} buckets, got {0}", max = crate::hash_table::MAX_CAPACITY)]
    InvalidCapacity(usize),
}

pub type Result<T> = std::result::Result<T, ContainerError>;
