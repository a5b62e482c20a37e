//! The fetch-decode-execute loop and its public entry points.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace};

use crate::control::Execution;
use crate::error::{Error, Result};
use crate::machine::Machine;
use crate::opcode::Opcode;
use crate::program::Program;
use crate::registry::handler_for;

/// Tunables for a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterpreterConfig {
    /// Hard ceiling on executed instructions. `None` runs until the
    /// program ends or a stop is requested, which for adversarial code
    /// can be never.
    pub max_steps: Option<u64>,
}

/// Executes Slash/A programs.
///
/// The interpreter is stateless between runs; everything mutable lives in
/// a [`Machine`]. That split is what makes pausing a run, persisting the
/// machine, and resuming it later possible without any cooperation from
/// the interpreter itself.
#[derive(Debug, Clone, Default)]
pub struct Interpreter {
    config: InterpreterConfig,
}

impl Interpreter {
    /// An interpreter with the default configuration: no step limit.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: InterpreterConfig) -> Self {
        Self { config }
    }

    /// Runs `program` against `input` to completion and returns the
    /// accumulated output.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StepLimitExceeded`] when a configured step budget
    /// runs out before the program ends.
    pub fn run(&self, program: &Program, input: &[f64]) -> Result<Vec<f64>> {
        let mut execution = Execution::new();
        self.run_with(program, input, &mut execution)
    }

    /// Like [`run`](Interpreter::run), with an execution controller
    /// observing the run and able to stop it.
    pub fn run_with(
        &self,
        program: &Program,
        input: &[f64],
        execution: &mut Execution<'_>,
    ) -> Result<Vec<f64>> {
        let mut machine = Machine::new(program.clone(), input.iter().copied());
        self.resume_with(&mut machine, execution)?;
        Ok(machine.into_output())
    }

    /// Continues `machine` from wherever its counter points, until the
    /// program ends or the step budget runs out. Freshly constructed and
    /// deserialized machines are both fine; a finished machine returns
    /// immediately.
    pub fn resume(&self, machine: &mut Machine) -> Result<()> {
        let mut execution = Execution::new();
        self.resume_with(machine, &mut execution)
    }

    /// Continues `machine` under an execution controller.
    ///
    /// The controller's stop flag is honored between instructions, and
    /// observers see one event per executed instruction plus a final
    /// finish event. A run that stops early still fires the finish event;
    /// a run that errors does not.
    #[instrument(skip_all, fields(code_len = machine.program.len(), counter = machine.counter))]
    pub fn resume_with(&self, machine: &mut Machine, execution: &mut Execution<'_>) -> Result<()> {
        debug!(
            remaining_input = machine.input.len(),
            steps = machine.steps,
            "run started"
        );
        while machine.counter < machine.program.len() && !execution.is_stopped() {
            if let Some(limit) = self.config.max_steps {
                if machine.steps >= limit {
                    debug!(limit, counter = machine.counter, "step budget exhausted");
                    return Err(Error::StepLimitExceeded { limit });
                }
            }

            let Some(value) = machine.program.get(machine.counter) else {
                break;
            };
            if value >= 0 {
                trace!(counter = machine.counter, value, "literal into accumulator");
                machine.set_accumulator(value);
            } else if let Some(opcode) = Opcode::from_id(value) {
                trace!(counter = machine.counter, opcode = %opcode, "execute");
                handler_for(opcode)(machine)?;
            } else {
                trace!(counter = machine.counter, id = value, "unassigned id skipped");
            }

            // Jump handlers leave the target position in the counter, so
            // this increment lands one past it.
            machine.counter += 1;
            machine.steps += 1;
            execution.notify_step(machine.steps);
        }

        debug!(
            steps = machine.steps,
            outputs = machine.output.len(),
            stopped = execution.is_stopped(),
            "run finished"
        );
        execution.notify_finish(&machine.output);
        Ok(())
    }
}

/// Runs `program` against `input` with the default configuration.
///
/// Convenience for one-shot callers; see [`Interpreter::run`].
pub fn run(program: &Program, input: &[f64]) -> Result<Vec<f64>> {
    Interpreter::new().run(program, input)
}

/// Like [`run`], with an execution controller observing the run.
pub fn run_with(
    program: &Program,
    input: &[f64],
    execution: &mut Execution<'_>,
) -> Result<Vec<f64>> {
    Interpreter::new().run_with(program, input, execution)
}
