//! Instruction set definitions.
//!
//! Slash/A code is a flat sequence of signed 64-bit integers. Non-negative
//! values are not instructions at all: the dispatch loop loads them
//! straight into the accumulator register. Negative values select an
//! instruction by id, and ids with no assigned instruction are skipped, so
//! decoding is total and a program can never be "malformed" at this layer.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A Slash/A instruction, identified on the wire by a small negative id.
///
/// Variants are declared in id order, so the discriminant and the wire id
/// are two views of the same number: `id = -(discriminant + 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Opcode {
    /// `F = I`, copying absence if `I` is unset.
    Itof,
    /// `I = round(|F|)`, an unset `F` reading as 0.
    Ftoi,
    /// `F += 1`, an unset `F` reading as 0.
    Inc,
    /// `F -= 1`, an unset `F` reading as 0.
    Dec,
    /// `F = D[I]` when the slot is set.
    Load,
    /// `D[I] = F` when both registers are set.
    Save,
    /// Exchanges `F` and `D[I]` when both registers and the slot are set.
    Swap,
    /// `F = 0` if `F` equals `D[I]`, `-1` otherwise.
    Cmp,
    /// Records the current position under label `I`.
    Label,
    /// Jumps to label `I` when `F >= 0`.
    Gotoifp,
    /// Skips past the matching `jumphere` when `F < 0`.
    Jumpifn,
    /// Closing marker for `jumpifn`.
    Jumphere,
    /// Opens a counted loop of `I` iterations.
    Loop,
    /// Closing marker for `loop`, jumping back while iterations remain.
    Endloop,
    /// Pops the next input value into `F`.
    Input,
    /// Appends `F` to the output.
    Output,
    /// `F += D[I]`.
    Add,
    /// `F -= D[I]`.
    Sub,
    /// `F *= D[I]`.
    Mul,
    /// `F /= D[I]`.
    Div,
    /// `F = |F|`.
    Abs,
    /// `F = -F`.
    Sign,
    /// `F = e^F`.
    Exp,
    /// `F = ln(F)`.
    Log,
    /// `F = sin(F)`.
    Sin,
    /// `F = F^D[I]`.
    Pow,
    /// `F =` uniform random in `[0, 1)`.
    Ran,
    /// Does nothing.
    Nop,
}

impl Opcode {
    /// Number of defined instructions.
    pub const COUNT: usize = 28;

    /// Every instruction, in id order.
    pub const ALL: [Opcode; Opcode::COUNT] = [
        Opcode::Itof,
        Opcode::Ftoi,
        Opcode::Inc,
        Opcode::Dec,
        Opcode::Load,
        Opcode::Save,
        Opcode::Swap,
        Opcode::Cmp,
        Opcode::Label,
        Opcode::Gotoifp,
        Opcode::Jumpifn,
        Opcode::Jumphere,
        Opcode::Loop,
        Opcode::Endloop,
        Opcode::Input,
        Opcode::Output,
        Opcode::Add,
        Opcode::Sub,
        Opcode::Mul,
        Opcode::Div,
        Opcode::Abs,
        Opcode::Sign,
        Opcode::Exp,
        Opcode::Log,
        Opcode::Sin,
        Opcode::Pow,
        Opcode::Ran,
        Opcode::Nop,
    ];

    /// Decodes a wire id. Returns `None` for non-negative values (those
    /// are accumulator literals) and for negative ids with no assigned
    /// instruction.
    pub fn from_id(id: i64) -> Option<Self> {
        if (-(Self::COUNT as i64)..=-1).contains(&id) {
            Some(Self::ALL[(-id - 1) as usize])
        } else {
            None
        }
    }

    /// The wire id, always negative.
    pub fn id(self) -> i64 {
        -(self as i64) - 1
    }

    /// Lower-case mnemonic used in logs and diagnostics.
    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Itof => "itof",
            Opcode::Ftoi => "ftoi",
            Opcode::Inc => "inc",
            Opcode::Dec => "dec",
            Opcode::Load => "load",
            Opcode::Save => "save",
            Opcode::Swap => "swap",
            Opcode::Cmp => "cmp",
            Opcode::Label => "label",
            Opcode::Gotoifp => "gotoifp",
            Opcode::Jumpifn => "jumpifn",
            Opcode::Jumphere => "jumphere",
            Opcode::Loop => "loop",
            Opcode::Endloop => "endloop",
            Opcode::Input => "input",
            Opcode::Output => "output",
            Opcode::Add => "add",
            Opcode::Sub => "sub",
            Opcode::Mul => "mul",
            Opcode::Div => "div",
            Opcode::Abs => "abs",
            Opcode::Sign => "sign",
            Opcode::Exp => "exp",
            Opcode::Log => "log",
            Opcode::Sin => "sin",
            Opcode::Pow => "pow",
            Opcode::Ran => "ran",
            Opcode::Nop => "nop",
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_is_inverse_of_from_id() {
        for opcode in Opcode::ALL {
            assert_eq!(Opcode::from_id(opcode.id()), Some(opcode));
        }
    }

    #[test]
    fn test_ids_are_contiguous_and_negative() {
        assert_eq!(Opcode::Itof.id(), -1);
        assert_eq!(Opcode::Cmp.id(), -8);
        assert_eq!(Opcode::Gotoifp.id(), -10);
        assert_eq!(Opcode::Output.id(), -16);
        assert_eq!(Opcode::Nop.id(), -28);
    }

    #[test]
    fn test_from_id_rejects_literals_and_unassigned_ids() {
        assert_eq!(Opcode::from_id(0), None);
        assert_eq!(Opcode::from_id(7), None);
        assert_eq!(Opcode::from_id(-29), None);
        assert_eq!(Opcode::from_id(-1000), None);
        assert_eq!(Opcode::from_id(i64::MIN), None);
    }

    #[test]
    fn test_display_uses_mnemonic() {
        assert_eq!(Opcode::Jumpifn.to_string(), "jumpifn");
        assert_eq!(Opcode::Ran.to_string(), "ran");
    }
}
