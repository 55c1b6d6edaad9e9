use thiserror::Error;

/// An operand fell outside the domain of the selected operation.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum DomainError {
    #[error("Division by zero!")]
    DivisionByZero,
    #[error("Modulus by zero!")]
    ModulusByZero,
    #[error("Square root of negative number!")]
    NegativeSquareRoot,
    #[error("Logarithm of non-positive number!")]
    NonPositiveLogarithm,
    #[error("Factorial requires a non-negative integer!")]
    InvalidFactorial,
    #[error("Power is undefined for these operands!")]
    InvalidPower,
}

/// Every recoverable failure the interactive loop can report to the user.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("'{0}' is not a valid number")]
    InvalidNumber(String),

    #[error("expected {expected} {}, got {found}", noun(.expected))]
    OperandCount { expected: usize, found: usize },

    #[error("Unknown operation '{0}'! Please try again.")]
    UnknownSelector(String),
}

fn noun(count: &usize) -> &'static str {
    if *count == 1 { "number" } else { "numbers" }
}

impl CalcError {
    /// Domain failures are counted apart from malformed input.
    pub fn is_domain(&self) -> bool {
        matches!(self, CalcError::Domain(_))
    }
}
