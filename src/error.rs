//! Error types for tacopt analyses

use thiserror::Error;

/// Structural errors surfaced by the analysis core
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Instruction that is neither a label marker nor an operation
    ///
    /// **Triggered by:** Deserializing an instruction object that carries no
    /// `label` and no `op` field, or a constant-defining operation missing
    /// its `dest`/`value`
    /// **Prevention:** Validate the wire form upstream; the typed
    /// [`Instruction`](crate::ir::Instruction) enum cannot represent this state
    #[error("Malformed instruction: {reason}")]
    MalformedInstruction {
        /// What was missing or contradictory
        reason: String,
    },

    /// Jump target that names no block in the function
    ///
    /// **Triggered by:** A `jmp`/`br` whose `labels` entry does not match any
    /// block name, which would leave a dangling CFG edge
    #[error("Unknown jump target `{target}` in block `{block}`")]
    UnknownJumpTarget {
        /// Block whose terminator references the missing target
        block: String,
        /// The label that resolved to no block
        target: String,
    },

    /// Synthetic block name colliding with an explicit label
    ///
    /// **Triggered by:** An anonymous block whose generated `b<k>` name is
    /// also used as an explicit label elsewhere in the function
    #[error("Synthetic block name `{name}` collides with an explicit label")]
    BlockNameClash {
        /// The contested name
        name: String,
    },
}

/// Result type for tacopt operations
pub type Result<T> = std::result::Result<T, Error>;
