//! Bytecode interpreter for the Slash/A programming language.
//!
//! Slash/A code is a flat sequence of signed 64-bit integers with a
//! sign-disambiguated encoding: a non-negative value loads itself into
//! the integer accumulator `I`, a negative value selects an instruction.
//! Programs compute through two registers (`I` and the float working
//! register `F`), a sparse memory `D` addressed by `I`, and structured
//! control flow resolved by bracket matching. Any integer sequence is
//! runnable, which is what makes the language a fit for program evolution
//! and other search-over-code experiments.
//!
//! # Architecture
//!
//! - [`opcode`]: instruction ids and mnemonics
//! - [`program`]: the validated code container
//! - [`machine`]: registers, memory, and control-flow state for one run
//! - [`resolver`]: bracket matchers for skips and loops, cached per machine
//! - [`interpreter`]: the dispatch loop and its entry points
//! - [`control`]: observers and cooperative cancellation
//! - [`error`]: validation and runtime failures
//!
//! # Example
//!
//! ```
//! use slasha::{run, Opcode, Program};
//!
//! // x^4: seed D[0] with the exponent, read x, raise, emit.
//! let program = Program::new(vec![
//!     4,
//!     Opcode::Itof.id(),
//!     0,
//!     Opcode::Save.id(),
//!     Opcode::Input.id(),
//!     Opcode::Pow.id(),
//!     Opcode::Output.id(),
//! ]);
//! let output = run(&program, &[2.0])?;
//! assert_eq!(output, vec![16.0]);
//! # Ok::<(), slasha::Error>(())
//! ```

pub mod control;
pub mod error;
mod handlers;
pub mod interpreter;
pub mod machine;
pub mod opcode;
pub mod program;
mod registry;
pub mod resolver;

pub use control::{Execution, Observer, StopFlag};
pub use error::{Error, Result};
pub use interpreter::{run, run_with, Interpreter, InterpreterConfig};
pub use machine::Machine;
pub use opcode::Opcode;
pub use program::Program;
pub use resolver::{JumpTable, LoopTable};
