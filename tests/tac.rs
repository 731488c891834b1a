//! Emitter-level tests, including the `While` form that the grammar never
//! produces and the structural label/temporary guarantees.

use std::collections::HashSet;

use ell::frontend::ast::{Binop, Exp, Item, Program, Stmt};
use ell::frontend::Node;
use ell::tac::{self, Instr};

fn exp(e: Exp) -> Node<Exp> {
    Node::no_loc(e)
}

fn stmt(s: Stmt) -> Node<Stmt> {
    Node::no_loc(s)
}

#[test]
fn while_lowers_to_a_test_and_backedge() {
    let cond = exp(Exp::Bop(
        Binop::Lt,
        Box::new(exp(Exp::Id("i".into()))),
        Box::new(exp(Exp::Int(3))),
    ));
    let body = stmt(Stmt::Block(vec![stmt(Stmt::Print(exp(Exp::Id(
        "i".into(),
    ))))]));
    let program = Program {
        items: vec![Item::Stmt(stmt(Stmt::While(cond, Box::new(body))))],
    };

    let lines: Vec<String> = tac::lower(&program).iter().map(|i| i.to_string()).collect();
    assert_eq!(
        lines,
        vec![
            "L0:",
            "t0 = i < 3",
            "ifFalse t0 goto L1",
            "print i",
            "goto L0",
            "L1:"
        ]
    );
}

#[test]
fn break_in_while_targets_the_exit_label() {
    let cond = exp(Exp::Int(1));
    let body = stmt(Stmt::Block(vec![stmt(Stmt::Break)]));
    let program = Program {
        items: vec![Item::Stmt(stmt(Stmt::While(cond, Box::new(body))))],
    };

    let code = tac::lower(&program);
    assert!(code.contains(&Instr::Goto("L1".into())));
}

#[test]
fn break_without_a_loop_emits_nothing() {
    let program = Program {
        items: vec![Item::Stmt(stmt(Stmt::Break))],
    };
    assert!(tac::lower(&program).is_empty());
}

const NESTED_SOURCE: &str = "int i; int j; int x; \
    def f(int n) { return n * 2; } \
    for (i = 0; i < 4; i = i + 1) { \
        if (i == 2) { x = f(i); } else { x = i; } \
        for (j = 0; j < i; j = j + 1) { print(j); break; } \
    } \
    print(x);";

#[test]
fn temporaries_are_unique_and_monotonic() {
    let out = ell::compile(NESTED_SOURCE).expect("compilation failed");

    let mut next = 0usize;
    for instr in &out.code {
        let dst = match instr {
            Instr::Bin { dst, .. } | Instr::Call { dst, .. } | Instr::Load { dst, .. } => dst,
            _ => continue,
        };
        assert_eq!(*dst, format!("t{next}"), "temporaries out of order");
        next += 1;
    }
    assert!(next > 0);
}

#[test]
fn labels_are_unique_and_count_from_zero() {
    let out = ell::compile(NESTED_SOURCE).expect("compilation failed");

    let mut defined = HashSet::new();
    for instr in &out.code {
        if let Instr::Label(l) = instr {
            // function entry labels share the namespace but not the counter
            if l.starts_with('L') {
                assert!(defined.insert(l.clone()), "label {l} defined twice");
            }
        }
    }
    for n in 0..defined.len() {
        assert!(defined.contains(&format!("L{n}")), "label L{n} missing");
    }
}

#[test]
fn every_jump_targets_a_defined_label() {
    let out = ell::compile(NESTED_SOURCE).expect("compilation failed");

    let defined: HashSet<&str> = out
        .code
        .iter()
        .filter_map(|i| match i {
            Instr::Label(l) => Some(l.as_str()),
            _ => None,
        })
        .collect();

    for instr in &out.code {
        let target = match instr {
            Instr::Goto(t) => t,
            Instr::IfFalse { target, .. } => target,
            _ => continue,
        };
        assert!(defined.contains(target.as_str()), "jump to undefined {target}");
    }
}
