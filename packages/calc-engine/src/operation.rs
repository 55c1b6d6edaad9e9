use crate::error::{CalcError, DomainError};

/// Largest n for which n! is finite in an `f64`.
pub const MAX_FINITE_FACTORIAL: u32 = 170;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Unary,
    Binary,
}

impl Arity {
    pub fn operand_count(self) -> usize {
        match self {
            Arity::Unary => 1,
            Arity::Binary => 2,
        }
    }
}

/// The compute function of an operation. Validation lives inside the function,
/// so a kernel either yields a number or the reason the operands were rejected.
#[derive(Clone, Copy)]
pub enum Kernel {
    Unary(fn(f64) -> Result<f64, DomainError>),
    Binary(fn(f64, f64) -> Result<f64, DomainError>),
}

impl std::fmt::Debug for Kernel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Kernel::Unary(_) => f.write_str("Kernel::Unary"),
            Kernel::Binary(_) => f.write_str("Kernel::Binary"),
        }
    }
}

/// A named operation reachable from the menu by its selector.
#[derive(Debug, Clone, Copy)]
pub struct Operation {
    pub selector: char,
    pub name: &'static str,
    pub kernel: Kernel,
}

impl Operation {
    pub const fn unary(
        selector: char,
        name: &'static str,
        f: fn(f64) -> Result<f64, DomainError>,
    ) -> Self {
        Self {
            selector,
            name,
            kernel: Kernel::Unary(f),
        }
    }

    pub const fn binary(
        selector: char,
        name: &'static str,
        f: fn(f64, f64) -> Result<f64, DomainError>,
    ) -> Self {
        Self {
            selector,
            name,
            kernel: Kernel::Binary(f),
        }
    }

    pub fn arity(&self) -> Arity {
        match self.kernel {
            Kernel::Unary(_) => Arity::Unary,
            Kernel::Binary(_) => Arity::Binary,
        }
    }

    /// Runs the operation. `b` must be present exactly when the operation is binary.
    pub fn apply(&self, a: f64, b: Option<f64>) -> Result<f64, CalcError> {
        match (self.kernel, b) {
            (Kernel::Unary(f), None) => Ok(f(a)?),
            (Kernel::Binary(f), Some(b)) => Ok(f(a, b)?),
            (Kernel::Unary(_), Some(_)) => Err(CalcError::OperandCount {
                expected: 1,
                found: 2,
            }),
            (Kernel::Binary(_), None) => Err(CalcError::OperandCount {
                expected: 2,
                found: 1,
            }),
        }
    }

    /// Runs the operation over a parsed operand list.
    pub fn apply_slice(&self, operands: &[f64]) -> Result<f64, CalcError> {
        let expected = self.arity().operand_count();
        match operands {
            [a] if expected == 1 => self.apply(*a, None),
            [a, b] if expected == 2 => self.apply(*a, Some(*b)),
            _ => Err(CalcError::OperandCount {
                expected,
                found: operands.len(),
            }),
        }
    }
}

pub fn add(a: f64, b: f64) -> Result<f64, DomainError> {
    Ok(a + b)
}

pub fn subtract(a: f64, b: f64) -> Result<f64, DomainError> {
    Ok(a - b)
}

pub fn multiply(a: f64, b: f64) -> Result<f64, DomainError> {
    Ok(a * b)
}

pub fn divide(a: f64, b: f64) -> Result<f64, DomainError> {
    if b == 0.0 {
        return Err(DomainError::DivisionByZero);
    }
    Ok(a / b)
}

/// Real-valued remainder carrying the sign of the dividend.
pub fn modulus(a: f64, b: f64) -> Result<f64, DomainError> {
    if b == 0.0 {
        return Err(DomainError::ModulusByZero);
    }
    Ok(a % b)
}

pub fn power(a: f64, b: f64) -> Result<f64, DomainError> {
    if a < 0.0 && b.fract() != 0.0 {
        return Err(DomainError::InvalidPower);
    }
    if a == 0.0 && b < 0.0 {
        return Err(DomainError::InvalidPower);
    }
    Ok(a.powf(b))
}

pub fn absolute(a: f64) -> Result<f64, DomainError> {
    Ok(a.abs())
}

pub fn square(a: f64) -> Result<f64, DomainError> {
    Ok(a * a)
}

pub fn square_root(a: f64) -> Result<f64, DomainError> {
    if a < 0.0 {
        return Err(DomainError::NegativeSquareRoot);
    }
    Ok(a.sqrt())
}

pub fn natural_log(a: f64) -> Result<f64, DomainError> {
    if a <= 0.0 {
        return Err(DomainError::NonPositiveLogarithm);
    }
    Ok(a.ln())
}

pub fn log10(a: f64) -> Result<f64, DomainError> {
    if a <= 0.0 {
        return Err(DomainError::NonPositiveLogarithm);
    }
    Ok(a.log10())
}

pub fn factorial(a: f64) -> Result<f64, DomainError> {
    // fract() of a non-finite value is NaN, which also lands here.
    if a < 0.0 || a.fract() != 0.0 {
        return Err(DomainError::InvalidFactorial);
    }
    if a > MAX_FINITE_FACTORIAL as f64 {
        return Ok(f64::INFINITY);
    }
    let n = a as u32;
    Ok((2..=n).map(f64::from).product())
}
