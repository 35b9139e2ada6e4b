//! # Intermediate Representation
//!
//! A flat, JSON-like three-address instruction form: each function is an
//! ordered instruction list, annotated with labels and jump targets. The
//! instruction is a tagged variant (label marker, constant definition,
//! control transfer, generic operation) rather than an object of optional
//! fields, so every field access is statically valid for its variant.
//!
//! ## Key Types
//!
//! - [`Instruction`] - Tagged three-address instruction
//! - [`Literal`] - Constant payload (integer or boolean)
//! - [`TransferOp`] - Terminator opcodes (`jmp`, `br`, `ret`)
//! - [`Function`] / [`Program`] - Analysis units

mod instruction;
mod program;

pub use instruction::{Instruction, Literal, TransferOp};
pub use program::{Function, Program};
