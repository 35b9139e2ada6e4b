//! # Local Value Numbering
//!
//! Canonicalizes the values computed within one scope of instructions and
//! flags syntactically redundant recomputation. This is a pure analysis: the
//! scope is never mutated, and the resulting tables are handed to the caller
//! (e.g. a copy-propagation rewrite) to act on.
//!
//! Equivalence is syntactic only — no commutativity or associativity
//! reasoning. Constants keep per-variable identity: each constant definition
//! enters its own table row, and operands of constant origin canonicalize to
//! the defining variable's name rather than a row index.

use crate::cfg::{form_basic_blocks, name_blocks};
use crate::error::Result;
use crate::ir::{Function, Instruction, Literal};
use std::collections::HashMap;

/// Canonicalized operand inside a value tuple
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Operand {
    /// A re-used computed value, identified by its table row index
    Row(usize),
    /// A variable of constant or unknown origin, identified by name
    Var(String),
}

/// Canonical value tuple: structurally comparable value identity
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueTuple {
    /// A literal constant
    Const(Literal),
    /// An operation applied to canonicalized operands
    Op {
        /// Operation code
        op: String,
        /// Canonicalized operands, in argument order
        operands: Vec<Operand>,
    },
}

/// One row of the value table
#[derive(Debug, Clone, PartialEq)]
pub struct ValueRow {
    /// Canonical value tuple
    pub value: ValueTuple,
    /// Variable that first computed this value
    pub var: String,
}

/// Result of running local value numbering over one scope
///
/// State is owned by the caller and constructed fresh per invocation; nothing
/// is shared across scopes or functions.
#[derive(Debug, Clone, Default)]
pub struct LvnAnalysis {
    /// Append-only, insertion-ordered value table
    pub table: Vec<ValueRow>,
    /// Variable name to the row index of its current value
    pub var_to_row: HashMap<String, usize>,
    /// Scope indices of instructions whose value already existed
    pub redundant: Vec<usize>,
}

impl LvnAnalysis {
    /// Number the values of one ordered scope (nominally a basic block)
    ///
    /// Instructions without a destination are skipped. A destination
    /// instruction whose canonicalized tuple already exists is recorded as
    /// redundant and its destination bound to the existing row; no duplicate
    /// row is created. Never fails on well-formed input: unrecognized
    /// opcodes are numbered generically, and an argument with no known
    /// origin in the scope (e.g. a function parameter) canonicalizes to its
    /// own name.
    pub fn analyze(scope: &[Instruction]) -> Self {
        let mut analysis = LvnAnalysis::default();
        // Row lookup for operation tuples. Constant rows are deliberately
        // absent: a constant's identity is its defining variable, so two
        // definitions of the same literal stay distinct rows.
        let mut row_of: HashMap<ValueTuple, usize> = HashMap::new();

        for (idx, instr) in scope.iter().enumerate() {
            match instr {
                Instruction::Constant { dest, value } => {
                    let row = analysis.table.len();
                    analysis.table.push(ValueRow {
                        value: ValueTuple::Const(*value),
                        var: dest.clone(),
                    });
                    analysis.var_to_row.insert(dest.clone(), row);
                }
                Instruction::Compute {
                    op,
                    dest: Some(dest),
                    args,
                } => {
                    let operands = args.iter().map(|arg| analysis.canonicalize(arg)).collect();
                    let tuple = ValueTuple::Op {
                        op: op.clone(),
                        operands,
                    };
                    match row_of.get(&tuple) {
                        Some(&row) => {
                            analysis.var_to_row.insert(dest.clone(), row);
                            analysis.redundant.push(idx);
                        }
                        None => {
                            let row = analysis.table.len();
                            analysis.table.push(ValueRow {
                                value: tuple.clone(),
                                var: dest.clone(),
                            });
                            row_of.insert(tuple, row);
                            analysis.var_to_row.insert(dest.clone(), row);
                        }
                    }
                }
                _ => {}
            }
        }

        tracing::debug!(
            rows = analysis.table.len(),
            redundant = analysis.redundant.len(),
            "local value numbering finished"
        );
        analysis
    }

    /// Whether the instruction at `idx` in the analyzed scope was redundant
    pub fn is_redundant(&self, idx: usize) -> bool {
        self.redundant.contains(&idx)
    }

    /// Row index currently bound to a variable, if any
    pub fn row_of_var(&self, var: &str) -> Option<usize> {
        self.var_to_row.get(var).copied()
    }

    fn canonicalize(&self, arg: &str) -> Operand {
        match self.var_to_row.get(arg) {
            Some(&row) => match self.table[row].value {
                ValueTuple::Const(_) => Operand::Var(arg.to_string()),
                ValueTuple::Op { .. } => Operand::Row(row),
            },
            None => Operand::Var(arg.to_string()),
        }
    }
}

/// Run local value numbering per basic block of a function
///
/// Partitions first, then analyzes each block with fresh state; this is the
/// default scoping, since values do not survive control-flow joins. Returns
/// one `(block name, analysis)` pair per block in source order. Callers that
/// want the relaxed whole-function mode can pass `func.instrs` to
/// [`LvnAnalysis::analyze`] directly.
pub fn analyze_function(func: &Function) -> Result<Vec<(String, LvnAnalysis)>> {
    let blocks = name_blocks(form_basic_blocks(&func.instrs))?;
    Ok(blocks
        .into_iter()
        .map(|block| (block.name, LvnAnalysis::analyze(&block.instrs)))
        .collect())
}
