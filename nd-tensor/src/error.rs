/// Errors raised by tensor construction, indexing and algebra operations.
///
/// Every error is detected before any buffer is mutated.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TensorError {
    /// Incompatible shapes: broadcasting, rank or range of a multi-index, view size, axis index.
    #[error("Shape Mismatch: {0}")]
    ShapeMismatch(String),

    /// A linear offset or slice index outside of valid bounds.
    #[error("Index Out of Bounds: {0}")]
    IndexOutOfBounds(String),

    /// The operation is not defined for the given operands.
    #[error("Unsupported Operation: {0}")]
    UnsupportedOperation(String),

    /// Operands violate the preconditions of an operation (e.g. dot product shapes).
    #[error("Contract Violation: {0}")]
    ContractViolation(String),
}
