//! Bracket matching for the structured control-flow instructions.
//!
//! Both control-flow pairs (`jumpifn`/`jumphere` and `loop`/`endloop`)
//! nest like brackets, so their partners are resolved with one
//! left-to-right scan over the code and a stack of open positions. The
//! resulting tables are built lazily, on the first instruction that needs
//! them, and cached on the [`Machine`](crate::Machine) for the rest of the
//! run. An unmatched bracket is recorded as having no partner; the
//! instruction at that position falls through at run time instead of
//! failing.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::opcode::Opcode;
use crate::program::Program;

/// Maps each `jumpifn` position to its matching `jumphere`.
///
/// Only opening positions get entries. The skip is strictly forward, so a
/// `jumphere` never needs to find its opener; executing one is a no-op.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JumpTable {
    targets: BTreeMap<usize, Option<usize>>,
}

impl JumpTable {
    /// Scans `program` and pairs every `jumpifn` with its `jumphere`.
    /// Innermost pairs match first; a `jumpifn` left open keeps an entry
    /// with no partner, and a stray `jumphere` is ignored.
    pub fn build(program: &Program) -> Self {
        let mut targets = BTreeMap::new();
        let mut open = Vec::new();
        for (position, &value) in program.code().iter().enumerate() {
            match Opcode::from_id(value) {
                Some(Opcode::Jumpifn) => {
                    open.push(position);
                    targets.insert(position, None);
                }
                Some(Opcode::Jumphere) => {
                    if let Some(start) = open.pop() {
                        targets.insert(start, Some(position));
                    }
                }
                _ => {}
            }
        }
        debug!(entries = targets.len(), "jump table built");
        Self { targets }
    }

    /// The `jumphere` position matching the `jumpifn` at `position`, or
    /// `None` when the block is unmatched.
    pub fn target(&self, position: usize) -> Option<usize> {
        self.targets.get(&position).copied().flatten()
    }
}

/// Bidirectional pairing of `loop` and `endloop` positions.
///
/// Both ends get entries: `loop` needs its `endloop` for the zero-count
/// skip, and `endloop` needs its `loop` to jump back to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoopTable {
    partners: BTreeMap<usize, Option<usize>>,
}

impl LoopTable {
    /// Scans `program` and pairs every `loop` with its `endloop`.
    /// Unmatched positions on either side keep an entry with no partner.
    pub fn build(program: &Program) -> Self {
        let mut partners = BTreeMap::new();
        let mut open = Vec::new();
        for (position, &value) in program.code().iter().enumerate() {
            match Opcode::from_id(value) {
                Some(Opcode::Loop) => {
                    open.push(position);
                    partners.insert(position, None);
                }
                Some(Opcode::Endloop) => match open.pop() {
                    Some(start) => {
                        partners.insert(start, Some(position));
                        partners.insert(position, Some(start));
                    }
                    None => {
                        partners.insert(position, None);
                    }
                },
                _ => {}
            }
        }
        debug!(entries = partners.len(), "loop table built");
        Self { partners }
    }

    /// The partner position for the `loop` or `endloop` at `position`, or
    /// `None` when it is unmatched.
    pub fn partner(&self, position: usize) -> Option<usize> {
        self.partners.get(&position).copied().flatten()
    }
}
