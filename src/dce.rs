//! # Trivial Dead Code Elimination
//!
//! Iteratively deletes instructions whose result is never consumed within
//! the scope, until a fixpoint is reached. "Used" means appearing in some
//! instruction's argument list — liveness here is pure `args` membership,
//! with no control-flow sensitivity, which makes the pass sound over a whole
//! function's flat instruction list as well as over a single basic block.

use crate::ir::{Function, Instruction, Program};
use std::collections::HashSet;

/// Remove unused-result instructions from a scope until fixpoint
///
/// Each iteration recomputes the used set over the current scope and builds
/// a new filtered sequence; instructions without a destination (prints,
/// stores, branches) are never removed. Terminates in at most `n` iterations
/// for a scope of `n` instructions, since every non-final iteration removes
/// at least one. Returns the number of instructions removed; applying the
/// pass again is a no-op.
pub fn eliminate_dead_code(scope: &mut Vec<Instruction>) -> usize {
    let before = scope.len();

    loop {
        let used: HashSet<&str> = scope
            .iter()
            .flat_map(|instr| instr.args())
            .map(String::as_str)
            .collect();

        let kept: Vec<Instruction> = scope
            .iter()
            .filter(|instr| match instr.dest() {
                Some(dest) => used.contains(dest),
                None => true,
            })
            .cloned()
            .collect();

        if kept.len() == scope.len() {
            break;
        }
        *scope = kept;
    }

    let removed = before - scope.len();
    if removed > 0 {
        tracing::debug!(removed, "dead code elimination reached fixpoint");
    }
    removed
}

/// Run dead code elimination over a function's flat instruction list
///
/// The whole function is one scope: a value defined in one block and
/// consumed in another counts as used, so no live instruction is ever
/// deleted. Returns the number of instructions removed.
pub fn run_function(func: &mut Function) -> usize {
    eliminate_dead_code(&mut func.instrs)
}

/// Run dead code elimination over every function of a program
pub fn run_program(program: &mut Program) -> usize {
    program.functions.iter_mut().map(run_function).sum()
}
