//! Qubit, classical bit and register types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Defines a `u32` newtype id with a display prefix.
macro_rules! bit_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub u32);

        impl $name {
            /// The id as a `usize`, for indexing arenas.
            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }

        impl From<u32> for $name {
            fn from(id: u32) -> Self {
                $name(id)
            }
        }

        impl From<usize> for $name {
            fn from(id: usize) -> Self {
                $name(u32::try_from(id).expect(concat!(stringify!($name), " overflow: exceeds u32::MAX")))
            }
        }
    };
}

/// Defines a bit record: an id plus optional register membership.
macro_rules! bit_record {
    ($(#[$meta:meta])* $name:ident, $id:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name {
            /// The unique identifier.
            pub id: $id,
            /// Owning register, if any.
            pub register: Option<String>,
            /// Offset inside the owning register.
            pub index: Option<u32>,
        }

        impl $name {
            /// A bit outside any register.
            pub fn new(id: $id) -> Self {
                Self {
                    id,
                    register: None,
                    index: None,
                }
            }

            /// A bit at `index` inside `register`.
            pub fn with_register(id: $id, register: impl Into<String>, index: u32) -> Self {
                Self {
                    id,
                    register: Some(register.into()),
                    index: Some(index),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match (&self.register, self.index) {
                    (Some(reg), Some(idx)) => write!(f, "{reg}[{idx}]"),
                    _ => write!(f, "{}", self.id),
                }
            }
        }
    };
}

bit_id!(
    /// Qubit index within a circuit. On generated circuits this equals the lattice node index.
    QubitId,
    "q"
);
bit_id!(
    /// Classical bit index within a circuit.
    ClbitId,
    "c"
);

bit_record!(
    /// A qubit with optional register membership.
    Qubit,
    QubitId
);
bit_record!(
    /// A classical bit with optional register membership.
    Clbit,
    ClbitId
);

/// A named, contiguous block of qubits or classical bits.
///
/// Registers never overlap: `start..start + size` is the id range they own.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Register {
    /// Register name.
    pub name: String,
    /// First id in the block.
    pub start: u32,
    /// Number of bits in the block.
    pub size: u32,
}

impl Register {
    /// Create a register description.
    pub fn new(name: impl Into<String>, start: u32, size: u32) -> Self {
        Self {
            name: name.into(),
            start,
            size,
        }
    }

    /// Whether `id` falls inside this register.
    #[inline]
    pub fn contains(&self, id: u32) -> bool {
        id >= self.start && id < self.start + self.size
    }
}
