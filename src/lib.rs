//! # Tacopt - Middle-End Analysis for a Flat Three-Address IR
//!
//! The analysis/optimization core of a small compiler middle-end. Functions
//! arrive as flat, JSON-like instruction lists annotated with labels and
//! jump targets; this crate partitions them into basic blocks, derives the
//! control flow graph, and runs two classic local passes:
//!
//! - **Local value numbering** - canonicalizes computed values to flag
//!   syntactically redundant recomputation (pure analysis)
//! - **Trivial dead code elimination** - fixpoint removal of instructions
//!   whose result is never consumed (destructive)
//!
//! Parsing program text, SSA construction, global optimization, and code
//! generation are external collaborators' concerns.
//!
//! ## Quick Start
//!
//! ```rust
//! use tacopt::{cfg, dce, Function, Instruction};
//!
//! # fn main() -> tacopt::Result<()> {
//! let mut func = Function::new(
//!     "main",
//!     vec![
//!         Instruction::constant("a", 1),
//!         Instruction::constant("b", 2),
//!         Instruction::compute("add", "c", &["a", "b"]),
//!         Instruction::effect("print", &["b"]),
//!     ],
//! );
//!
//! // Dead code: `c` is never read, and then neither is `a`.
//! let removed = dce::run_function(&mut func);
//! assert_eq!(removed, 2);
//!
//! // The pruned function is a single block falling off the end.
//! let (blocks, graph) = cfg::function_cfg(&func)?;
//! assert_eq!(blocks.len(), 1);
//! assert!(graph.successors_of("b0").is_empty());
//! # Ok(())
//! # }
//! ```
//!
//! ### Value Numbering
//!
//! ```rust
//! use tacopt::{Instruction, LvnAnalysis};
//!
//! let scope = vec![
//!     Instruction::constant("x", 4),
//!     Instruction::constant("y", 4),
//!     Instruction::compute("add", "z", &["x", "y"]),
//!     Instruction::compute("add", "w", &["x", "y"]),
//! ];
//!
//! let analysis = LvnAnalysis::analyze(&scope);
//! assert!(analysis.is_redundant(3)); // w recomputes z's value
//! assert_eq!(analysis.row_of_var("w"), analysis.row_of_var("z"));
//! ```
//!
//! ## Architecture
//!
//! ```text
//! instruction stream → form_basic_blocks → name_blocks → ControlFlowGraph
//!                       (partition)         (naming)      (successors)
//!
//! instruction scope  → LvnAnalysis::analyze   (diagnostic, non-mutating)
//! instruction scope  → eliminate_dead_code    (destructive, fixpoint)
//! ```
//!
//! Every pass is synchronous, CPU-bound, and per-function; analysis state is
//! constructed fresh per invocation and owned by the caller.
//!
//! ## Error Handling
//!
//! Structural problems — a jump target naming no block, an instruction that
//! is neither label nor operation, a synthetic block name colliding with an
//! explicit label — surface as typed [`Error`] values, never panics. The
//! optimization passes themselves cannot fail on well-formed input:
//! instructions are opaque data to them, and unrecognized opcodes are simply
//! never optimized.

/// Version of the tacopt crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cfg;
pub mod dce;
pub mod error;
pub mod ir;
pub mod lvn;

// Re-export main types
pub use cfg::{form_basic_blocks, name_blocks, BasicBlock, ControlFlowGraph, NamedBlock};
pub use dce::eliminate_dead_code;
pub use error::{Error, Result};
pub use ir::{Function, Instruction, Literal, Program, TransferOp};
pub use lvn::{LvnAnalysis, Operand, ValueRow, ValueTuple};
