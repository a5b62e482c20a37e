//! Instruction handlers.
//!
//! Each negative code id maps to one function here; the non-negative
//! "load accumulator" case never reaches a handler because the dispatch
//! loop applies it inline. Handlers receive the whole machine and mutate
//! it in place. Control-flow handlers store their target position in
//! `machine.counter` and rely on the loop's post-increment to land one
//! past the target.
//!
//! Most instructions guard on their operands being set and quietly do
//! nothing otherwise; the few that coerce an unset `F` to zero say so in
//! their docs. None of them can fail, but they share the fallible
//! [`Handler`] signature so the registry can hold them in one table.

use rand::Rng;

use crate::error::Result;
use crate::machine::Machine;

/// Handler shape shared by every instruction.
pub(crate) type Handler = fn(&mut Machine) -> Result<()>;

/// `F = I`. An unset accumulator copies the absence.
pub(crate) fn handle_itof(machine: &mut Machine) -> Result<()> {
    machine.f = machine.i.map(|i| i as f64);
    Ok(())
}

/// `I = round(|F|)`, an unset `F` reading as 0.
pub(crate) fn handle_ftoi(machine: &mut Machine) -> Result<()> {
    machine.i = Some(machine.f.unwrap_or(0.0).abs().round() as i64);
    Ok(())
}

/// `F += 1`, an unset `F` reading as 0.
pub(crate) fn handle_inc(machine: &mut Machine) -> Result<()> {
    machine.f = Some(machine.f.unwrap_or(0.0) + 1.0);
    Ok(())
}

/// `F -= 1`, an unset `F` reading as 0.
pub(crate) fn handle_dec(machine: &mut Machine) -> Result<()> {
    machine.f = Some(machine.f.unwrap_or(0.0) - 1.0);
    Ok(())
}

/// `F = D[I]` when the slot is set; otherwise `F` keeps its value.
pub(crate) fn handle_load(machine: &mut Machine) -> Result<()> {
    if let Some(value) = machine.memory_at_i() {
        machine.f = Some(value);
    }
    Ok(())
}

/// `D[I] = F` when both registers are set.
pub(crate) fn handle_save(machine: &mut Machine) -> Result<()> {
    if let (Some(i), Some(f)) = (machine.i, machine.f) {
        machine.memory.insert(i, f);
    }
    Ok(())
}

/// Exchanges `F` and `D[I]` when both registers and the slot are set.
pub(crate) fn handle_swap(machine: &mut Machine) -> Result<()> {
    if let (Some(i), Some(f), Some(slot)) = (machine.i, machine.f, machine.memory_at_i()) {
        machine.f = Some(slot);
        machine.memory.insert(i, f);
    }
    Ok(())
}

/// `F = 0` when `F` equals `D[I]`, `-1` otherwise. Always writes `F`; a
/// missing operand on either side compares unequal, and so does NaN.
pub(crate) fn handle_cmp(machine: &mut Machine) -> Result<()> {
    let equal = match (machine.f, machine.memory_at_i()) {
        (Some(f), Some(slot)) => f == slot,
        _ => false,
    };
    machine.f = Some(if equal { 0.0 } else { -1.0 });
    Ok(())
}

/// Records the current position under label `I`. The paired `gotoifp`
/// jumps here and the loop's increment then lands one past the label.
pub(crate) fn handle_label(machine: &mut Machine) -> Result<()> {
    if let Some(i) = machine.i {
        machine.labels.insert(i, machine.counter);
    }
    Ok(())
}

/// Jumps to label `I` when `F >= 0`, an unset `F` reading as 0 and
/// passing the test. A label that was never recorded falls through.
pub(crate) fn handle_gotoifp(machine: &mut Machine) -> Result<()> {
    if machine.f.unwrap_or(0.0) >= 0.0 {
        if let Some(target) = machine.i.and_then(|i| machine.labels.get(&i).copied()) {
            machine.counter = target;
        }
    }
    Ok(())
}

/// Skips forward past the matching `jumphere` when `F < 0` (an unset `F`
/// reads as 0 and stays). Builds the jump table on first use; an
/// unmatched block falls through into its body.
pub(crate) fn handle_jumpifn(machine: &mut Machine) -> Result<()> {
    if machine.f.unwrap_or(0.0) < 0.0 {
        let position = machine.counter;
        if let Some(target) = machine.jump_table().target(position) {
            machine.counter = target;
        }
    }
    Ok(())
}

/// Closing marker for `jumpifn`; the work happens at the opening end.
pub(crate) fn handle_jumphere(_machine: &mut Machine) -> Result<()> {
    Ok(())
}

/// Opens a counted loop. With `I == 0` the body is skipped entirely;
/// otherwise the remaining-iteration count for this position becomes `I`,
/// and an unset `I` clears it. Builds the loop table on first use; an
/// unmatched `loop` does nothing at all.
pub(crate) fn handle_loop(machine: &mut Machine) -> Result<()> {
    let position = machine.counter;
    let Some(end) = machine.loop_table().partner(position) else {
        return Ok(());
    };
    match machine.i {
        Some(0) => machine.counter = end,
        Some(count) => {
            machine.loop_counters.insert(position, count);
        }
        None => {
            machine.loop_counters.remove(&position);
        }
    }
    Ok(())
}

/// Closes a counted loop: with more than one iteration left, decrement
/// and jump back to the opener. A no-op when no loop table exists yet,
/// when this `endloop` is unmatched, or on the final iteration.
pub(crate) fn handle_endloop(machine: &mut Machine) -> Result<()> {
    let Some(table) = machine.loop_table.as_ref() else {
        return Ok(());
    };
    let Some(start) = table.partner(machine.counter) else {
        return Ok(());
    };
    if let Some(remaining) = machine.loop_counters.get_mut(&start) {
        if *remaining > 1 {
            *remaining -= 1;
            machine.counter = start;
        }
    }
    Ok(())
}

/// Pops the front of the input queue into `F`. An exhausted queue leaves
/// `F` untouched.
pub(crate) fn handle_input(machine: &mut Machine) -> Result<()> {
    if let Some(value) = machine.input.pop_front() {
        machine.f = Some(value);
    }
    Ok(())
}

/// Appends `F` to the output when set.
pub(crate) fn handle_output(machine: &mut Machine) -> Result<()> {
    if let Some(f) = machine.f {
        machine.output.push(f);
    }
    Ok(())
}

/// Shared body of the binary arithmetic family: `F = op(F, D[I])`, a
/// no-op unless `F` and the slot are both set.
fn binary_op(machine: &mut Machine, op: fn(f64, f64) -> f64) -> Result<()> {
    if let (Some(f), Some(slot)) = (machine.f, machine.memory_at_i()) {
        machine.f = Some(op(f, slot));
    }
    Ok(())
}

/// Shared body of the unary family: `F = op(F)` when `F` is set.
fn unary_op(machine: &mut Machine, op: fn(f64) -> f64) -> Result<()> {
    if let Some(f) = machine.f {
        machine.f = Some(op(f));
    }
    Ok(())
}

/// `F += D[I]`.
pub(crate) fn handle_add(machine: &mut Machine) -> Result<()> {
    binary_op(machine, |f, slot| f + slot)
}

/// `F -= D[I]`.
pub(crate) fn handle_sub(machine: &mut Machine) -> Result<()> {
    binary_op(machine, |f, slot| f - slot)
}

/// `F *= D[I]`.
pub(crate) fn handle_mul(machine: &mut Machine) -> Result<()> {
    binary_op(machine, |f, slot| f * slot)
}

/// `F /= D[I]`. Division by zero follows IEEE 754 and yields an infinity
/// or NaN rather than an error.
pub(crate) fn handle_div(machine: &mut Machine) -> Result<()> {
    binary_op(machine, |f, slot| f / slot)
}

/// `F = |F|`.
pub(crate) fn handle_abs(machine: &mut Machine) -> Result<()> {
    unary_op(machine, f64::abs)
}

/// `F = -F`.
pub(crate) fn handle_sign(machine: &mut Machine) -> Result<()> {
    unary_op(machine, |f| -f)
}

/// `F = e^F`.
pub(crate) fn handle_exp(machine: &mut Machine) -> Result<()> {
    unary_op(machine, f64::exp)
}

/// `F = ln(F)`.
pub(crate) fn handle_log(machine: &mut Machine) -> Result<()> {
    unary_op(machine, f64::ln)
}

/// `F = sin(F)`.
pub(crate) fn handle_sin(machine: &mut Machine) -> Result<()> {
    unary_op(machine, f64::sin)
}

/// `F = F^D[I]`.
pub(crate) fn handle_pow(machine: &mut Machine) -> Result<()> {
    binary_op(machine, f64::powf)
}

/// `F =` uniform random in `[0, 1)`.
pub(crate) fn handle_ran(machine: &mut Machine) -> Result<()> {
    let mut rng = rand::thread_rng();
    machine.f = Some(rng.gen::<f64>());
    Ok(())
}

/// Does nothing, by definition.
pub(crate) fn handle_nop(_machine: &mut Machine) -> Result<()> {
    Ok(())
}
