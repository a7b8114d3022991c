//! Error types for QASM3 emission.

use thiserror::Error;

/// Errors that can occur while emitting a circuit.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EmitError {
    /// A condition names a classical register the circuit does not declare.
    #[error("Condition on undeclared register '{0}'")]
    UnknownRegister(String),

    /// A condition value does not fit in its register.
    #[error("Condition value {value} does not fit in register '{register}' of size {size}")]
    ConditionOverflow {
        register: String,
        value: u64,
        size: u32,
    },

    /// An instruction refers to a qubit the circuit does not have.
    #[error("Qubit {0} not declared")]
    QubitNotFound(u32),

    /// An instruction refers to a classical bit the circuit does not have.
    #[error("Classical bit {0} not declared")]
    ClbitNotFound(u32),
}

/// Result type for emission.
pub type EmitResult<T> = Result<T, EmitError>;
