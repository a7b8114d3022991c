//! Clifford gate set used by syndrome extraction.

use serde::{Deserialize, Serialize};

/// Gates a syndrome circuit may contain.
///
/// `I` is kept as an explicit operation: syndrome builders use it to mark
/// that a node took part in a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StandardGate {
    I,
    X,
    Y,
    Z,
    H,
    S,
    Sdg,
    CX,
    CZ,
    Swap,
}

impl StandardGate {
    /// OpenQASM 3 `stdgates.inc` name and arity.
    #[inline]
    const fn spec(self) -> (&'static str, u32) {
        match self {
            StandardGate::I => ("id", 1),
            StandardGate::X => ("x", 1),
            StandardGate::Y => ("y", 1),
            StandardGate::Z => ("z", 1),
            StandardGate::H => ("h", 1),
            StandardGate::S => ("s", 1),
            StandardGate::Sdg => ("sdg", 1),
            StandardGate::CX => ("cx", 2),
            StandardGate::CZ => ("cz", 2),
            StandardGate::Swap => ("swap", 2),
        }
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.spec().0
    }

    #[inline]
    pub fn num_qubits(&self) -> u32 {
        self.spec().1
    }
}

/// Fire the gate only when register `register`, read as an unsigned
/// integer with bit 0 least significant, equals `value`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassicalCondition {
    pub register: String,
    pub value: u64,
}

impl ClassicalCondition {
    pub fn new(register: impl Into<String>, value: u64) -> Self {
        Self {
            register: register.into(),
            value,
        }
    }
}

/// A gate application, optionally classically conditioned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Gate {
    pub kind: StandardGate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<ClassicalCondition>,
}

impl Gate {
    /// An unconditional gate.
    pub fn standard(kind: StandardGate) -> Self {
        Self { kind, condition: None }
    }

    /// Attach a classical condition.
    #[must_use]
    pub fn with_condition(self, condition: ClassicalCondition) -> Self {
        Self {
            condition: Some(condition),
            ..self
        }
    }

    pub fn name(&self) -> &str {
        self.kind.name()
    }

    pub fn num_qubits(&self) -> u32 {
        self.kind.num_qubits()
    }
}

impl From<StandardGate> for Gate {
    fn from(kind: StandardGate) -> Self {
        Gate::standard(kind)
    }
}
