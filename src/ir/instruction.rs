//! IR instruction definitions

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Literal constant carried by a constant-defining instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    /// 64-bit integer constant
    Int(i64),
    /// Boolean constant
    Bool(bool),
}

impl From<i64> for Literal {
    fn from(v: i64) -> Self {
        Literal::Int(v)
    }
}

impl From<bool> for Literal {
    fn from(v: bool) -> Self {
        Literal::Bool(v)
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int(v) => write!(f, "{}", v),
            Literal::Bool(v) => write!(f, "{}", v),
        }
    }
}

/// Control-transfer opcode
///
/// `call` is deliberately absent: control returns to the following
/// instruction, so it does not end a basic block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransferOp {
    /// Unconditional jump to a single target label
    Jmp,
    /// Conditional branch: true-target first, false-target second
    Br,
    /// Return from the function, with an optional value argument
    Ret,
}

impl TransferOp {
    /// Wire-form opcode string
    pub fn as_str(&self) -> &'static str {
        match self {
            TransferOp::Jmp => "jmp",
            TransferOp::Br => "br",
            TransferOp::Ret => "ret",
        }
    }
}

impl fmt::Display for TransferOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single three-address instruction
///
/// The wire form is an object with optional `op`/`dest`/`args`/`value`/
/// `label`/`labels` fields; in memory the instruction is a tagged variant so
/// every field access is statically valid. The serde bridge goes through the
/// flat field shape and rejects objects that are neither a label nor an
/// operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawInstruction", into = "RawInstruction")]
pub enum Instruction {
    /// Block-entry label marker; has no effect at runtime
    Label {
        /// Label text, also the name of the block it opens
        name: String,
    },

    /// Constant-defining operation: `dest = const value`
    Constant {
        /// Variable the constant is bound to
        dest: String,
        /// The literal value
        value: Literal,
    },

    /// Control transfer ending a basic block
    Transfer {
        /// Which terminator this is
        op: TransferOp,
        /// Argument variables (`br` condition, `ret` value)
        args: Vec<String>,
        /// Ordered jump-target labels (`br`: true-target first)
        labels: Vec<String>,
    },

    /// Any other operation: opaque opcode, optional destination, ordered args
    ///
    /// Unrecognized opcodes are handled generically by every pass; there is
    /// no unknown-operator error class in this core.
    Compute {
        /// Operation code
        op: String,
        /// Variable the result is bound to, if the operation produces one
        dest: Option<String>,
        /// Argument variable names, in order
        args: Vec<String>,
    },
}

impl Instruction {
    /// Create a label marker
    pub fn label(name: impl Into<String>) -> Self {
        Instruction::Label { name: name.into() }
    }

    /// Create a constant-defining instruction
    pub fn constant(dest: impl Into<String>, value: impl Into<Literal>) -> Self {
        Instruction::Constant {
            dest: dest.into(),
            value: value.into(),
        }
    }

    /// Create a destination-producing operation
    pub fn compute(op: impl Into<String>, dest: impl Into<String>, args: &[&str]) -> Self {
        Instruction::Compute {
            op: op.into(),
            dest: Some(dest.into()),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// Create a side-effecting operation with no destination (e.g. `print`)
    pub fn effect(op: impl Into<String>, args: &[&str]) -> Self {
        Instruction::Compute {
            op: op.into(),
            dest: None,
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// Create an unconditional jump
    pub fn jmp(target: impl Into<String>) -> Self {
        Instruction::Transfer {
            op: TransferOp::Jmp,
            args: Vec::new(),
            labels: vec![target.into()],
        }
    }

    /// Create a conditional branch (true-target first)
    pub fn br(cond: impl Into<String>, then_target: impl Into<String>, else_target: impl Into<String>) -> Self {
        Instruction::Transfer {
            op: TransferOp::Br,
            args: vec![cond.into()],
            labels: vec![then_target.into(), else_target.into()],
        }
    }

    /// Create a return, with zero or one value argument
    pub fn ret(args: &[&str]) -> Self {
        Instruction::Transfer {
            op: TransferOp::Ret,
            args: args.iter().map(|a| a.to_string()).collect(),
            labels: Vec::new(),
        }
    }

    /// Whether this instruction is a label marker
    pub fn is_label(&self) -> bool {
        matches!(self, Instruction::Label { .. })
    }

    /// Whether this instruction ends a basic block (`jmp`, `br`, `ret`)
    pub fn is_terminator(&self) -> bool {
        matches!(self, Instruction::Transfer { .. })
    }

    /// Opcode string, `None` for label markers
    pub fn op(&self) -> Option<&str> {
        match self {
            Instruction::Label { .. } => None,
            Instruction::Constant { .. } => Some("const"),
            Instruction::Transfer { op, .. } => Some(op.as_str()),
            Instruction::Compute { op, .. } => Some(op.as_str()),
        }
    }

    /// Destination variable, if the instruction defines one
    pub fn dest(&self) -> Option<&str> {
        match self {
            Instruction::Constant { dest, .. } => Some(dest.as_str()),
            Instruction::Compute { dest, .. } => dest.as_deref(),
            _ => None,
        }
    }

    /// Argument variables consumed by this instruction
    pub fn args(&self) -> &[String] {
        match self {
            Instruction::Transfer { args, .. } | Instruction::Compute { args, .. } => args,
            _ => &[],
        }
    }

    /// Jump-target labels, empty for anything but `jmp`/`br`
    pub fn jump_targets(&self) -> &[String] {
        match self {
            Instruction::Transfer { labels, .. } => labels,
            _ => &[],
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Label { name } => write!(f, ".{}", name),
            Instruction::Constant { dest, value } => write!(f, "{} = const {}", dest, value),
            Instruction::Transfer { op, args, labels } => {
                write!(f, "{}", op)?;
                for arg in args {
                    write!(f, " {}", arg)?;
                }
                for label in labels {
                    write!(f, " .{}", label)?;
                }
                Ok(())
            }
            Instruction::Compute { op, dest, args } => {
                if let Some(dest) = dest {
                    write!(f, "{} = {}", dest, op)?;
                } else {
                    write!(f, "{}", op)?;
                }
                for arg in args {
                    write!(f, " {}", arg)?;
                }
                Ok(())
            }
        }
    }
}

/// Flat wire shape of an instruction: every field optional
///
/// This mirrors the JSON exchange form; [`Instruction`] is bridged through it
/// so malformed objects are rejected at the boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawInstruction {
    #[serde(skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    op: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dest: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    args: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<Literal>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    labels: Vec<String>,
}

impl TryFrom<RawInstruction> for Instruction {
    type Error = Error;

    fn try_from(raw: RawInstruction) -> Result<Self, Error> {
        if let Some(name) = raw.label {
            return Ok(Instruction::Label { name });
        }
        let op = raw.op.ok_or_else(|| Error::MalformedInstruction {
            reason: "carries neither a label nor an op".to_string(),
        })?;
        match op.as_str() {
            "const" => {
                let dest = raw.dest.ok_or_else(|| Error::MalformedInstruction {
                    reason: "const without a dest".to_string(),
                })?;
                let value = raw.value.ok_or_else(|| Error::MalformedInstruction {
                    reason: "const without a value".to_string(),
                })?;
                Ok(Instruction::Constant { dest, value })
            }
            "jmp" => Ok(Instruction::Transfer {
                op: TransferOp::Jmp,
                args: raw.args,
                labels: raw.labels,
            }),
            "br" => Ok(Instruction::Transfer {
                op: TransferOp::Br,
                args: raw.args,
                labels: raw.labels,
            }),
            "ret" => Ok(Instruction::Transfer {
                op: TransferOp::Ret,
                args: raw.args,
                labels: raw.labels,
            }),
            _ => Ok(Instruction::Compute {
                op,
                dest: raw.dest,
                args: raw.args,
            }),
        }
    }
}

impl From<Instruction> for RawInstruction {
    fn from(instr: Instruction) -> Self {
        let empty = RawInstruction {
            label: None,
            op: None,
            dest: None,
            args: Vec::new(),
            value: None,
            labels: Vec::new(),
        };
        match instr {
            Instruction::Label { name } => RawInstruction {
                label: Some(name),
                ..empty
            },
            Instruction::Constant { dest, value } => RawInstruction {
                op: Some("const".to_string()),
                dest: Some(dest),
                value: Some(value),
                ..empty
            },
            Instruction::Transfer { op, args, labels } => RawInstruction {
                op: Some(op.as_str().to_string()),
                args,
                labels,
                ..empty
            },
            Instruction::Compute { op, dest, args } => RawInstruction {
                op: Some(op),
                dest,
                args,
                ..empty
            },
        }
    }
}
