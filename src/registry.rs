//! Opcode registry.
//!
//! The spec list below is the single source of truth linking every
//! [`Opcode`] to its handler. On first dispatch it is flattened into a
//! dense array indexed by the opcode discriminant, so the hot path is one
//! bounds-free table lookup.

use std::sync::OnceLock;

use crate::handlers;
use crate::handlers::Handler;
use crate::opcode::Opcode;

/// An opcode paired with the function that executes it.
#[derive(Clone, Copy)]
pub(crate) struct OpcodeSpec {
    pub opcode: Opcode,
    pub handler: Handler,
}

/// Every instruction's specification, in id order.
pub(crate) fn opcode_specs() -> &'static [OpcodeSpec] {
    static SPECS: OnceLock<Vec<OpcodeSpec>> = OnceLock::new();
    SPECS.get_or_init(build_specs)
}

/// The handler for `opcode`, in O(1).
///
/// # Panics
///
/// Panics on first use if the spec list misses an opcode; that is a bug
/// in this module, not a runtime condition.
pub(crate) fn handler_for(opcode: Opcode) -> Handler {
    static HANDLERS: OnceLock<[Handler; Opcode::COUNT]> = OnceLock::new();
    let table = HANDLERS.get_or_init(|| {
        let mut slots: [Option<Handler>; Opcode::COUNT] = [None; Opcode::COUNT];
        for spec in opcode_specs() {
            slots[spec.opcode as usize] = Some(spec.handler);
        }
        std::array::from_fn(|index| {
            slots[index]
                .unwrap_or_else(|| panic!("no handler registered for {}", Opcode::ALL[index]))
        })
    });
    table[opcode as usize]
}

fn build_specs() -> Vec<OpcodeSpec> {
    use Opcode::*;

    macro_rules! op {
        ($opcode:ident, $handler:path) => {
            OpcodeSpec {
                opcode: $opcode,
                handler: $handler,
            }
        };
    }

    vec![
        op!(Itof, handlers::handle_itof),
        op!(Ftoi, handlers::handle_ftoi),
        op!(Inc, handlers::handle_inc),
        op!(Dec, handlers::handle_dec),
        op!(Load, handlers::handle_load),
        op!(Save, handlers::handle_save),
        op!(Swap, handlers::handle_swap),
        op!(Cmp, handlers::handle_cmp),
        op!(Label, handlers::handle_label),
        op!(Gotoifp, handlers::handle_gotoifp),
        op!(Jumpifn, handlers::handle_jumpifn),
        op!(Jumphere, handlers::handle_jumphere),
        op!(Loop, handlers::handle_loop),
        op!(Endloop, handlers::handle_endloop),
        op!(Input, handlers::handle_input),
        op!(Output, handlers::handle_output),
        op!(Add, handlers::handle_add),
        op!(Sub, handlers::handle_sub),
        op!(Mul, handlers::handle_mul),
        op!(Div, handlers::handle_div),
        op!(Abs, handlers::handle_abs),
        op!(Sign, handlers::handle_sign),
        op!(Exp, handlers::handle_exp),
        op!(Log, handlers::handle_log),
        op!(Sin, handlers::handle_sin),
        op!(Pow, handlers::handle_pow),
        op!(Ran, handlers::handle_ran),
        op!(Nop, handlers::handle_nop),
    ]
}
