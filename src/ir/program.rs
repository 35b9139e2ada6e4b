//! Program and function containers

use super::instruction::Instruction;
use serde::{Deserialize, Serialize};

/// One function: the unit of analysis for every pass in this crate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Function {
    /// Function name
    pub name: String,
    /// Ordered instruction list
    #[serde(default)]
    pub instrs: Vec<Instruction>,
}

impl Function {
    /// Create a function from a name and its instruction stream
    pub fn new(name: impl Into<String>, instrs: Vec<Instruction>) -> Self {
        Self {
            name: name.into(),
            instrs,
        }
    }
}

/// A whole program: an ordered list of functions
///
/// The core never analyzes across functions; callers iterate and hand each
/// [`Function`] to the passes independently.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Program {
    /// Functions in source order
    pub functions: Vec<Function>,
}
