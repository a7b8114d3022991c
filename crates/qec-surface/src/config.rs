//! YAML experiment files.
//!
//! An experiment names a lattice, optionally defines logical qubits on it,
//! and lists program steps. Building it yields one circuit that runs the
//! steps back to back, each step's measurements in fresh registers.
//!
//! ```yaml
//! name: braid
//! lattice:
//!   kind: square
//!   width: 9
//!   height: 9
//! logical:
//!   - { measurement: 65, ancilla: 47, cut: z }
//!   - { measurement: 41, ancilla: 43, cut: x }
//! program:
//!   - initialize: 0
//!   - correct: 0
//!   - initialize: 1
//!   - rounds: 2
//!   - braid: [0, 1]
//!   - measure: 0
//!   - measure: 1
//! ```

use qec_ir::{Circuit, QubitId};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::cycle::cycle_for;
use crate::error::{QecError, QecResult};
use crate::lattice::{Lattice, LatticeSpec};
use crate::logical::{CutType, LogicalQubit};

fn default_name() -> String {
    "experiment".to_string()
}

fn default_rounds() -> usize {
    1
}

/// A logical qubit declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogicalSpec {
    /// Measurement node index.
    pub measurement: usize,
    /// Ancilla node index.
    pub ancilla: usize,
    /// Cut type.
    pub cut: CutType,
}

/// One program step. Qubit arguments index the `logical` list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Syndrome rounds over the whole lattice.
    Rounds(usize),
    /// Initialize a logical qubit.
    Initialize(usize),
    /// Conditional fix-up on the qubit's latest initialize outcome.
    Correct(usize),
    /// Logical X.
    X(usize),
    /// Logical Z.
    Z(usize),
    /// Move a qubit's ancilla defect.
    Move {
        /// Logical qubit.
        qubit: usize,
        /// Destination node.
        to: usize,
    },
    /// Braid the first qubit's ancilla around the second's measurement node.
    Braid(usize, usize),
    /// Measure a logical qubit.
    Measure(usize),
}

/// A complete experiment description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperimentConfig {
    /// Circuit name.
    #[serde(default = "default_name")]
    pub name: String,
    /// Lattice geometry.
    pub lattice: LatticeSpec,
    /// Rounds to run when `program` is empty.
    #[serde(default = "default_rounds")]
    pub rounds: usize,
    /// Logical qubits.
    #[serde(default)]
    pub logical: Vec<LogicalSpec>,
    /// Program steps.
    #[serde(default)]
    pub program: Vec<Step>,
}

impl ExperimentConfig {
    /// Parse an experiment from YAML.
    pub fn from_yaml(source: &str) -> QecResult<Self> {
        Ok(serde_yaml_ng::from_str(source)?)
    }

    /// Serialize back to YAML.
    pub fn to_yaml(&self) -> QecResult<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Build the lattice and run the program into one circuit.
    #[instrument(skip(self), fields(name = %self.name, steps = self.program.len()))]
    pub fn build(&self) -> QecResult<Circuit> {
        let mut lattice = Lattice::from_spec(&self.lattice)?;
        let cycle = cycle_for(&lattice)?;
        let mut qubits = self
            .logical
            .iter()
            .map(|l| LogicalQubit::new(&lattice, l.measurement, l.ancilla, l.cut))
            .collect::<QecResult<Vec<_>>>()?;

        if self.program.is_empty() {
            let mut circuit = cycle.circuit(&lattice, self.rounds)?;
            circuit = rename(circuit, &self.name)?;
            return Ok(circuit);
        }

        let mut total = Circuit::new(&self.name);
        total.add_qreg("q", QubitId::from(lattice.num_nodes()).0);
        // Latest initialize outcome register per logical qubit.
        let mut outcome_register: FxHashMap<usize, String> = FxHashMap::default();

        for (i, step) in self.program.iter().enumerate() {
            debug!(step = i, ?step, "running program step");
            let part = match *step {
                Step::Rounds(n) => cycle.circuit(&lattice, n)?,
                Step::Initialize(q) => {
                    let part = pick(&mut qubits, q)?.initialize(&mut lattice)?;
                    // `concat` below allocates the register right after the current ones.
                    outcome_register.insert(q, next_register_name(&total, &part));
                    part
                }
                Step::Correct(q) => {
                    let qubit = pick(&mut qubits, q)?;
                    let register = outcome_register.get(&q).cloned().ok_or_else(|| {
                        QecError::InvalidState {
                            measurement: qubit.measurement(),
                            operation: "correct",
                            state: qubit.state().to_string(),
                        }
                    })?;
                    qubit.correction(&lattice, &register)?
                }
                Step::X(q) => pick(&mut qubits, q)?.x(&lattice)?,
                Step::Z(q) => pick(&mut qubits, q)?.z(&lattice)?,
                Step::Move { qubit, to } => {
                    pick(&mut qubits, qubit)?.move_ancilla(&mut lattice, cycle.as_ref(), to)?
                }
                Step::Braid(a, b) => {
                    let other = pick(&mut qubits, b)?.clone();
                    if a == b {
                        return Err(QecError::SelfBraid {
                            index: a,
                            measurement: other.measurement(),
                        });
                    }
                    pick(&mut qubits, a)?.braid_zx(&other, &mut lattice, cycle.as_ref())?
                }
                Step::Measure(q) => pick(&mut qubits, q)?.measure(&mut lattice)?,
            };
            total.concat(&part)?;
        }

        info!(
            qubits = total.num_qubits(),
            clbits = total.num_clbits(),
            ops = total.num_ops(),
            "built experiment"
        );
        Ok(total)
    }
}

fn pick(qubits: &mut [LogicalQubit], index: usize) -> QecResult<&mut LogicalQubit> {
    let count = qubits.len();
    qubits
        .get_mut(index)
        .ok_or(QecError::UnknownLogicalQubit { index, count })
}

/// Name `concat` will give the first register of `part` inside `total`.
fn next_register_name(total: &Circuit, part: &Circuit) -> String {
    let base = part.cregs().first().map(|r| r.name.as_str()).unwrap_or_default();
    total.fresh_creg_name(base)
}

fn rename(circuit: Circuit, name: &str) -> QecResult<Circuit> {
    let mut named = Circuit::new(name);
    named.add_qreg("q", QubitId::from(circuit.num_qubits()).0);
    named.concat(&circuit)?;
    Ok(named)
}
