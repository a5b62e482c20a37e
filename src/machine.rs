//! Per-run machine state.

use std::collections::{BTreeMap, VecDeque};

use serde::{Deserialize, Serialize};

use crate::program::Program;
use crate::resolver::{JumpTable, LoopTable};

/// The registers, memory, and control-flow state threaded through a run.
///
/// A machine owns everything a run needs, which makes it a complete
/// checkpoint: serialize it mid-run, bring it back later, and hand it to
/// [`Interpreter::resume`](crate::Interpreter::resume) to pick up where it
/// left off.
///
/// Registers start unset rather than zeroed. Which instructions treat an
/// unset register as zero and which skip their effect entirely is part of
/// each instruction's contract; see the [`Opcode`](crate::Opcode) variant
/// docs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Machine {
    pub(crate) program: Program,
    /// Integer accumulator, set by non-negative code values and `ftoi`.
    pub(crate) i: Option<i64>,
    /// Float working register, the operand of most instructions.
    pub(crate) f: Option<f64>,
    /// Sparse data memory addressed by `I`. Negative addresses are legal.
    pub(crate) memory: BTreeMap<i64, f64>,
    /// Positions recorded by `label`, keyed by the `I` they were taken at.
    pub(crate) labels: BTreeMap<i64, usize>,
    /// Position of the next instruction to execute.
    pub(crate) counter: usize,
    /// Remaining input values, consumed front to back.
    pub(crate) input: VecDeque<f64>,
    /// Values emitted by `output`, in emission order.
    pub(crate) output: Vec<f64>,
    /// Instructions executed so far in this machine's lifetime.
    pub(crate) steps: u64,
    /// Remaining iterations per active `loop`, keyed by opener position.
    pub(crate) loop_counters: BTreeMap<usize, i64>,
    pub(crate) jump_table: Option<JumpTable>,
    pub(crate) loop_table: Option<LoopTable>,
}

impl Machine {
    /// Fresh state positioned at the first instruction.
    pub fn new(program: Program, input: impl IntoIterator<Item = f64>) -> Self {
        Self {
            program,
            i: None,
            f: None,
            memory: BTreeMap::new(),
            labels: BTreeMap::new(),
            counter: 0,
            input: input.into_iter().collect(),
            output: Vec::new(),
            steps: 0,
            loop_counters: BTreeMap::new(),
            jump_table: None,
            loop_table: None,
        }
    }

    /// The program this machine is executing.
    pub fn program(&self) -> &Program {
        &self.program
    }

    /// Accumulator register `I`, unset until the first literal or `ftoi`.
    pub fn i(&self) -> Option<i64> {
        self.i
    }

    /// Working register `F`.
    pub fn f(&self) -> Option<f64> {
        self.f
    }

    /// Position of the next instruction to execute.
    pub fn counter(&self) -> usize {
        self.counter
    }

    /// Instructions executed so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Output accumulated so far.
    pub fn output(&self) -> &[f64] {
        &self.output
    }

    /// Reads memory slot `index`, `None` when it was never written.
    pub fn memory(&self, index: i64) -> Option<f64> {
        self.memory.get(&index).copied()
    }

    /// True once the counter has run off the end of the program.
    pub fn is_finished(&self) -> bool {
        self.counter >= self.program.len()
    }

    /// Consumes the machine, keeping only its output.
    pub fn into_output(self) -> Vec<f64> {
        self.output
    }

    pub(crate) fn set_accumulator(&mut self, value: i64) {
        self.i = Some(value);
    }

    /// `D[I]`, `None` when either the accumulator or the slot is unset.
    pub(crate) fn memory_at_i(&self) -> Option<f64> {
        self.i.and_then(|i| self.memory.get(&i).copied())
    }

    /// Jump table, built on first use and cached for the machine's life.
    pub(crate) fn jump_table(&mut self) -> &JumpTable {
        let program = &self.program;
        self.jump_table.get_or_insert_with(|| JumpTable::build(program))
    }

    /// Loop table, built on first use and cached for the machine's life.
    pub(crate) fn loop_table(&mut self) -> &LoopTable {
        let program = &self.program;
        self.loop_table.get_or_insert_with(|| LoopTable::build(program))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opcode::Opcode;

    #[test]
    fn test_new_machine_starts_unset() {
        let machine = Machine::new(Program::new(vec![1, 2, 3]), [4.5]);
        assert_eq!(machine.i(), None);
        assert_eq!(machine.f(), None);
        assert_eq!(machine.counter(), 0);
        assert_eq!(machine.steps(), 0);
        assert!(machine.output().is_empty());
        assert!(!machine.is_finished());
    }

    #[test]
    fn test_memory_accepts_negative_addresses() {
        let mut machine = Machine::new(Program::default(), []);
        machine.memory.insert(-3, 1.25);
        assert_eq!(machine.memory(-3), Some(1.25));
        assert_eq!(machine.memory(3), None);
    }

    #[test]
    fn test_tables_are_built_once_and_cached() {
        let program = Program::new(vec![Opcode::Jumpifn.id(), Opcode::Jumphere.id()]);
        let mut machine = Machine::new(program, []);
        assert!(machine.jump_table.is_none());
        assert_eq!(machine.jump_table().target(0), Some(1));
        assert!(machine.jump_table.is_some());
    }

    #[test]
    fn test_table_accessors_do_not_reset_loop_counters() {
        let program = Program::new(vec![Opcode::Loop.id(), Opcode::Endloop.id()]);
        let mut machine = Machine::new(program, []);
        machine.loop_table();
        machine.loop_counters.insert(0, 2);
        machine.loop_table();
        assert_eq!(machine.loop_counters.get(&0), Some(&2));
    }

    #[test]
    fn test_serde_round_trip_preserves_mid_run_state() {
        let mut machine = Machine::new(Program::new(vec![5, Opcode::Itof.id()]), [1.0, 2.0]);
        machine.i = Some(5);
        machine.f = Some(-0.5);
        machine.counter = 1;
        machine.steps = 1;
        machine.memory.insert(-1, 9.0);
        machine.labels.insert(0, 1);
        machine.loop_counters.insert(0, 3);

        let json = serde_json::to_string(&machine).unwrap();
        let restored: Machine = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.i(), Some(5));
        assert_eq!(restored.f(), Some(-0.5));
        assert_eq!(restored.counter(), 1);
        assert_eq!(restored.steps(), 1);
        assert_eq!(restored.memory(-1), Some(9.0));
        assert_eq!(restored.labels, machine.labels);
        assert_eq!(restored.loop_counters, machine.loop_counters);
        assert_eq!(restored.input, machine.input);
    }
}
