/// Errors raised by polynomial and rational function operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FunctionsError {
    /// Division by zero: a zero denominator, divisor or evaluated denominator.
    #[error("Arithmetic Error: {0}")]
    Arithmetic(String),

    /// A polynomial of positive degree was used where a constant is required.
    #[error("Not Constant: {0}")]
    NotConstant(String),
}
