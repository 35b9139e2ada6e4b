//! # Basic Blocks and Control Flow Graph Construction
//!
//! Partitions a function's linear instruction stream into basic blocks,
//! assigns each block a canonical name, and derives the successor mapping
//! between named blocks (explicit jump targets plus implicit fallthrough).

use crate::error::{Error, Result};
use crate::ir::{Function, Instruction, TransferOp};
use std::collections::{HashMap, HashSet};

/// A maximal straight-line instruction run
///
/// At most the first entry is a label marker and at most the last is a
/// terminator. Produced by [`form_basic_blocks`]; consumed (read or
/// destructively pruned) by later passes, never merged or split again.
#[derive(Debug, Clone, PartialEq)]
pub struct BasicBlock {
    /// Instructions in original order
    pub instrs: Vec<Instruction>,
}

/// A basic block after naming, its leading label marker stripped
#[derive(Debug, Clone, PartialEq)]
pub struct NamedBlock {
    /// Block name: the leading label's text, or a synthetic `b<k>`
    pub name: String,
    /// Block body (no label markers)
    pub instrs: Vec<Instruction>,
}

/// Split an instruction stream into basic blocks
///
/// Labels and terminators are the only structural signals: a label closes the
/// current block (if non-empty) and opens a new one; a terminator closes the
/// block it ends. The result is an exact partition of the input — every
/// instruction appears in exactly one block, in original relative order.
pub fn form_basic_blocks(instrs: &[Instruction]) -> Vec<BasicBlock> {
    let mut blocks = Vec::new();
    let mut current: Vec<Instruction> = Vec::new();

    for instr in instrs {
        if instr.is_label() {
            if !current.is_empty() {
                blocks.push(BasicBlock {
                    instrs: std::mem::take(&mut current),
                });
            }
            current.push(instr.clone());
        } else {
            current.push(instr.clone());
            if instr.is_terminator() {
                blocks.push(BasicBlock {
                    instrs: std::mem::take(&mut current),
                });
            }
        }
    }

    // Trailing accumulator; empty when the input ended on a terminator.
    if !current.is_empty() {
        blocks.push(BasicBlock { instrs: current });
    }

    blocks
}

/// Assign each block a unique name, stripping leading label markers
///
/// A block starting with a label is named by that label; anonymous blocks get
/// `b<k>` where `k` counts the blocks already named. A synthetic name that
/// collides with an explicit label elsewhere in the function is rejected.
pub fn name_blocks(blocks: Vec<BasicBlock>) -> Result<Vec<NamedBlock>> {
    let explicit: HashSet<String> = blocks
        .iter()
        .filter_map(|block| match block.instrs.first() {
            Some(Instruction::Label { name }) => Some(name.clone()),
            _ => None,
        })
        .collect();

    let mut named: Vec<NamedBlock> = Vec::with_capacity(blocks.len());
    for block in blocks {
        let mut instrs = block.instrs;
        let name = match instrs.first() {
            Some(Instruction::Label { name }) => {
                let name = name.clone();
                instrs.remove(0);
                name
            }
            _ => {
                let synthetic = format!("b{}", named.len());
                if explicit.contains(&synthetic) {
                    return Err(Error::BlockNameClash { name: synthetic });
                }
                synthetic
            }
        };
        named.push(NamedBlock { name, instrs });
    }

    Ok(named)
}

/// Control flow graph: block name to ordered successor names
///
/// Successor order matters for branches (true-target first, false-target
/// second); block order is kept because implicit fallthrough is defined by
/// source position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ControlFlowGraph {
    /// Successor names keyed by block name
    pub successors: HashMap<String, Vec<String>>,
    /// Block names in source order
    pub block_order: Vec<String>,
}

impl ControlFlowGraph {
    /// Build the successor mapping from named blocks
    ///
    /// Per block with last instruction `L`: `jmp`/`br` take their listed
    /// targets, `ret` and the lexically last block take none, and anything
    /// else falls through to the next block in source order. A jump target
    /// naming no block in the function is a structural error — downstream
    /// dataflow assumes closure, so no dangling edge is ever produced.
    pub fn build(blocks: &[NamedBlock]) -> Result<Self> {
        let known: HashSet<&str> = blocks.iter().map(|b| b.name.as_str()).collect();

        let mut cfg = ControlFlowGraph::default();
        for (i, block) in blocks.iter().enumerate() {
            let successors = match block.instrs.last() {
                Some(Instruction::Transfer {
                    op: TransferOp::Jmp | TransferOp::Br,
                    labels,
                    ..
                }) => {
                    for target in labels {
                        if !known.contains(target.as_str()) {
                            return Err(Error::UnknownJumpTarget {
                                block: block.name.clone(),
                                target: target.clone(),
                            });
                        }
                    }
                    labels.clone()
                }
                Some(Instruction::Transfer {
                    op: TransferOp::Ret,
                    ..
                }) => Vec::new(),
                _ if i + 1 == blocks.len() => Vec::new(),
                // Implicit fallthrough to the next block in source order.
                _ => vec![blocks[i + 1].name.clone()],
            };
            cfg.successors.insert(block.name.clone(), successors);
            cfg.block_order.push(block.name.clone());
        }

        tracing::debug!(blocks = cfg.block_order.len(), "built control flow graph");
        Ok(cfg)
    }

    /// Successors of a block, empty for exit blocks and unknown names
    pub fn successors_of(&self, name: &str) -> &[String] {
        self.successors.get(name).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Partition a function and build its CFG in one step
pub fn function_cfg(func: &Function) -> Result<(Vec<NamedBlock>, ControlFlowGraph)> {
    let blocks = name_blocks(form_basic_blocks(&func.instrs))?;
    let cfg = ControlFlowGraph::build(&blocks)?;
    Ok((blocks, cfg))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flatten(blocks: &[BasicBlock]) -> Vec<Instruction> {
        blocks.iter().flat_map(|b| b.instrs.clone()).collect()
    }

    #[test]
    fn test_empty_stream() {
        assert!(form_basic_blocks(&[]).is_empty());
    }

    #[test]
    fn test_partition_is_exact() {
        let instrs = vec![
            Instruction::constant("x", 1),
            Instruction::label("loop"),
            Instruction::compute("add", "x", &["x", "x"]),
            Instruction::br("c", "loop", "done"),
            Instruction::label("done"),
            Instruction::ret(&[]),
        ];
        let blocks = form_basic_blocks(&instrs);
        assert_eq!(blocks.len(), 3);
        assert_eq!(flatten(&blocks), instrs);
    }

    #[test]
    fn test_terminator_closes_block() {
        let instrs = vec![
            Instruction::constant("x", 1),
            Instruction::jmp("next"),
            Instruction::label("next"),
            Instruction::ret(&[]),
        ];
        let blocks = form_basic_blocks(&instrs);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].instrs.len(), 2);
    }

    #[test]
    fn test_trailing_terminator_leaves_no_empty_block() {
        let instrs = vec![Instruction::constant("x", 1), Instruction::ret(&[])];
        let blocks = form_basic_blocks(&instrs);
        assert_eq!(blocks.len(), 1);
    }

    #[test]
    fn test_labels_only_lead_blocks() {
        let instrs = vec![
            Instruction::compute("id", "a", &["b"]),
            Instruction::label("l1"),
            Instruction::compute("id", "c", &["a"]),
            Instruction::label("l2"),
            Instruction::ret(&[]),
        ];
        for block in form_basic_blocks(&instrs) {
            for (i, instr) in block.instrs.iter().enumerate() {
                if instr.is_label() {
                    assert_eq!(i, 0, "label not at block entry: {}", instr);
                }
            }
        }
    }

    #[test]
    fn test_naming_strips_labels_and_counts_synthetics() {
        let instrs = vec![
            Instruction::constant("x", 1),
            Instruction::jmp("tail"),
            Instruction::label("tail"),
            Instruction::ret(&[]),
        ];
        let named = name_blocks(form_basic_blocks(&instrs)).unwrap();
        assert_eq!(named.len(), 2);
        assert_eq!(named[0].name, "b0");
        assert_eq!(named[1].name, "tail");
        assert!(named[1].instrs.iter().all(|i| !i.is_label()));
    }

    #[test]
    fn test_synthetic_name_clash_is_rejected() {
        // Anonymous first block wants "b0", which is also an explicit label.
        let instrs = vec![
            Instruction::constant("x", 1),
            Instruction::label("b0"),
            Instruction::ret(&[]),
        ];
        let result = name_blocks(form_basic_blocks(&instrs));
        assert_eq!(
            result,
            Err(Error::BlockNameClash {
                name: "b0".to_string()
            })
        );
    }

    #[test]
    fn test_fallthrough_successors() {
        // A: add (no branch), B: label b... falls through, C: ret
        let instrs = vec![
            Instruction::compute("add", "s", &["s", "s"]),
            Instruction::label("middle"),
            Instruction::compute("add", "s", &["s", "s"]),
            Instruction::label("end"),
            Instruction::ret(&[]),
        ];
        let (_, cfg) = function_cfg(&Function::new("main", instrs)).unwrap();
        assert_eq!(cfg.successors_of("b0"), ["middle"]);
        assert_eq!(cfg.successors_of("middle"), ["end"]);
        assert!(cfg.successors_of("end").is_empty());
    }

    #[test]
    fn test_branch_successors_keep_order() {
        let instrs = vec![
            Instruction::br("c", "yes", "no"),
            Instruction::label("yes"),
            Instruction::ret(&[]),
            Instruction::label("no"),
            Instruction::ret(&[]),
        ];
        let (_, cfg) = function_cfg(&Function::new("main", instrs)).unwrap();
        assert_eq!(cfg.successors_of("b0"), ["yes", "no"]);
    }

    #[test]
    fn test_last_block_without_terminator_has_no_successors() {
        let instrs = vec![Instruction::compute("add", "s", &["a", "b"])];
        let (_, cfg) = function_cfg(&Function::new("main", instrs)).unwrap();
        assert!(cfg.successors_of("b0").is_empty());
    }

    #[test]
    fn test_unknown_jump_target_is_a_structural_error() {
        let instrs = vec![Instruction::jmp("nowhere")];
        let result = function_cfg(&Function::new("main", instrs));
        assert_eq!(
            result,
            Err(Error::UnknownJumpTarget {
                block: "b0".to_string(),
                target: "nowhere".to_string()
            })
        );
    }

    #[test]
    fn test_cfg_totality() {
        let instrs = vec![
            Instruction::label("entry"),
            Instruction::br("c", "left", "right"),
            Instruction::label("left"),
            Instruction::jmp("exit"),
            Instruction::label("right"),
            Instruction::jmp("exit"),
            Instruction::label("exit"),
            Instruction::ret(&[]),
        ];
        let (blocks, cfg) = function_cfg(&Function::new("main", instrs)).unwrap();
        let names: HashSet<&str> = blocks.iter().map(|b| b.name.as_str()).collect();
        for succs in cfg.successors.values() {
            for succ in succs {
                assert!(names.contains(succ.as_str()));
            }
        }
    }
}
