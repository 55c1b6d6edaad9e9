pub mod config;
pub mod error;
pub mod interaction;
pub mod operation;
pub mod registry;
pub mod session;

pub use config::CalcConfig;
pub use error::{CalcError, DomainError};
pub use interaction::{CalculatorInteraction, LineInteraction};
pub use operation::{Arity, Operation};
pub use registry::Registry;
pub use session::{Session, SessionSummary};
