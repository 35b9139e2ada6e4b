//! Integration tests for the optimization passes: LVN analysis and trivial
//! dead code elimination, driven through the public API

use tacopt::{dce, lvn, Function, Instruction, LvnAnalysis, Program};

#[test]
fn lvn_redundancy_example() {
    // x = const 4; y = const 4; z = add x y; w = add x y
    let scope = vec![
        Instruction::constant("x", 4),
        Instruction::constant("y", 4),
        Instruction::compute("add", "z", &["x", "y"]),
        Instruction::compute("add", "w", &["x", "y"]),
    ];
    let analysis = LvnAnalysis::analyze(&scope);

    assert_eq!(analysis.table.len(), 3);
    assert_eq!(analysis.row_of_var("w"), analysis.row_of_var("z"));
    assert!(analysis.is_redundant(3));
    assert!(!analysis.is_redundant(2));
}

#[test]
fn lvn_is_fresh_per_invocation() {
    let scope = vec![
        Instruction::constant("x", 4),
        Instruction::compute("add", "z", &["x", "x"]),
    ];
    let first = LvnAnalysis::analyze(&scope);
    let second = LvnAnalysis::analyze(&scope);
    assert_eq!(first.table.len(), second.table.len());
    assert!(second.redundant.is_empty());
}

#[test]
fn lvn_per_block_default_over_function() {
    let func = Function::new(
        "main",
        vec![
            Instruction::label("entry"),
            Instruction::constant("x", 1),
            Instruction::compute("add", "y", &["x", "x"]),
            Instruction::compute("add", "y2", &["x", "x"]),
            Instruction::jmp("next"),
            Instruction::label("next"),
            Instruction::compute("add", "y3", &["x", "x"]),
            Instruction::ret(&[]),
        ],
    );
    let analyses = lvn::analyze_function(&func).unwrap();
    assert_eq!(analyses.len(), 2);

    let (_, entry) = &analyses[0];
    assert_eq!(entry.redundant.len(), 1);

    // y3 is the first add of its own block: not redundant there.
    let (_, next) = &analyses[1];
    assert!(next.redundant.is_empty());
}

#[test]
fn dce_fixpoint_example() {
    // a = const 1; b = const 2; c = add a b; print b
    let mut scope = vec![
        Instruction::constant("a", 1),
        Instruction::constant("b", 2),
        Instruction::compute("add", "c", &["a", "b"]),
        Instruction::effect("print", &["b"]),
    ];
    let removed = dce::eliminate_dead_code(&mut scope);
    assert_eq!(removed, 2);
    assert_eq!(
        scope,
        vec![
            Instruction::constant("b", 2),
            Instruction::effect("print", &["b"]),
        ]
    );

    // Re-running on the result is a no-op.
    assert_eq!(dce::eliminate_dead_code(&mut scope), 0);
}

#[test]
fn dce_result_round_trips_through_json() {
    let json = r#"{
        "functions": [{
            "name": "main",
            "instrs": [
                {"op": "const", "dest": "a", "value": 1},
                {"op": "const", "dest": "b", "value": 2},
                {"op": "add", "dest": "c", "args": ["a", "b"]},
                {"op": "print", "args": ["b"]}
            ]
        }]
    }"#;
    let mut program: Program = serde_json::from_str(json).unwrap();
    dce::run_program(&mut program);

    let out = serde_json::to_value(&program).unwrap();
    assert_eq!(
        out,
        serde_json::json!({
            "functions": [{
                "name": "main",
                "instrs": [
                    {"op": "const", "dest": "b", "value": 2},
                    {"op": "print", "args": ["b"]}
                ]
            }]
        })
    );
}

#[test]
fn dce_then_lvn_pipeline() {
    let mut func = Function::new(
        "main",
        vec![
            Instruction::constant("dead", 0),
            Instruction::constant("x", 4),
            Instruction::compute("mul", "p", &["x", "x"]),
            Instruction::compute("mul", "q", &["x", "x"]),
            Instruction::effect("print", &["p"]),
            Instruction::effect("print", &["q"]),
        ],
    );
    assert_eq!(dce::run_function(&mut func), 1);

    let analyses = lvn::analyze_function(&func).unwrap();
    let (_, block) = &analyses[0];
    // q still recomputes p's value; LVN flags it, a rewrite pass would act.
    assert_eq!(block.redundant.len(), 1);
    assert_eq!(block.row_of_var("q"), block.row_of_var("p"));
}
