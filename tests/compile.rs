use ell::{compile, CompileError};

/// Compiles a source snippet and checks the exact TAC listing.
macro_rules! tac_test {
    ($name:ident, $src:expr, $expected:expr) => {
        #[test]
        fn $name() {
            let out = compile($src).expect("compilation failed");
            let lines: Vec<String> = out.code.iter().map(|i| i.to_string()).collect();
            let expected: Vec<String> = $expected.iter().map(|s| s.to_string()).collect();
            assert_eq!(lines, expected);
        }
    };
}

tac_test!(
    decl_with_initializer,
    "int x = 2 + 3;",
    &["t0 = 2 + 3", "x = t0"]
);

tac_test!(
    assign_and_print,
    "int x; x = 5; print(x);",
    &["x = 5", "print x"]
);

tac_test!(
    counted_loop,
    "int i; for (i = 0; i < 3; i = i + 1) { print(i); }",
    &[
        "i = 0",
        "L0:",
        "t0 = i < 3",
        "ifFalse t0 goto L1",
        "print i",
        "t1 = i + 1",
        "i = t1",
        "goto L0",
        "L1:"
    ]
);

tac_test!(
    function_definition_and_call,
    "def f() { return 7; } f();",
    &["f:", "return 7", "t0 = call f, 0"]
);

tac_test!(
    if_with_else,
    "int x; if (1 == 1) { x = 1; } else { x = 2; }",
    &[
        "t0 = 1 == 1",
        "ifFalse t0 goto L0",
        "x = 1",
        "goto L1",
        "L0:",
        "x = 2",
        "L1:"
    ]
);

tac_test!(
    if_without_else_still_gets_both_labels,
    "int x; if (1 < 2) { x = 1; }",
    &[
        "t0 = 1 < 2",
        "ifFalse t0 goto L0",
        "x = 1",
        "goto L1",
        "L0:",
        "L1:"
    ]
);

tac_test!(
    multiplication_binds_tighter_than_addition,
    "int x = 1 + 2 * 3;",
    &["t0 = 2 * 3", "t1 = 1 + t0", "x = t1"]
);

tac_test!(
    addition_is_left_associative,
    "int x = 1 - 2 - 3;",
    &["t0 = 1 - 2", "t1 = t0 - 3", "x = t1"]
);

tac_test!(
    unary_minus_is_zero_minus_operand,
    "int x = -5;",
    &["t0 = 0 - 5", "x = t0"]
);

tac_test!(
    array_stores_and_loads,
    "int a = new int[4]; a[0] = 7; print(a[1]);",
    &["a = 4", "a[0] = 7", "t0 = a[1]", "print t0"]
);

tac_test!(
    parameters_are_passed_in_source_order,
    "def add(int a, int b) { return a + b; } int r = add(2, 3); print(r);",
    &[
        "add:",
        "t0 = a + b",
        "return t0",
        "param 2",
        "param 3",
        "t1 = call add, 2",
        "r = t1",
        "print r"
    ]
);

tac_test!(
    break_jumps_to_the_nearest_loop_exit,
    "int i; int j; \
     for (i = 0; i < 2; i = i + 1) { \
         for (j = 0; j < 2; j = j + 1) { break; } \
         break; \
     }",
    &[
        "i = 0",
        "L0:",
        "t0 = i < 2",
        "ifFalse t0 goto L1",
        "j = 0",
        "L2:",
        "t1 = j < 2",
        "ifFalse t1 goto L3",
        "goto L3",
        "t2 = j + 1",
        "j = t2",
        "goto L2",
        "L3:",
        "goto L1",
        "t3 = i + 1",
        "i = t3",
        "goto L0",
        "L1:"
    ]
);

tac_test!(
    read_statement,
    "int x; read(x); print(x);",
    &["read x", "print x"]
);

tac_test!(
    string_literals_print_quoted,
    "print(\"hi\");",
    &["print \"hi\""]
);

tac_test!(
    float_declaration,
    "float f = 2.5; print(f);",
    &["f = 2.5", "print f"]
);

fn semantic_errors(src: &str) -> Vec<String> {
    match compile(src) {
        Err(CompileError::Semantic(errors)) => errors.iter().map(|e| e.to_string()).collect(),
        Err(other) => panic!("expected semantic errors, got: {other}"),
        Ok(_) => panic!("expected semantic errors, compilation succeeded"),
    }
}

#[test]
fn string_initializer_for_int_is_rejected() {
    let errors = semantic_errors("int x = \"hi\";");
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("line 1"), "{}", errors[0]);
    assert!(errors[0].contains("invalid assignment"), "{}", errors[0]);
}

#[test]
fn break_at_top_level_is_rejected() {
    let errors = semantic_errors("break;");
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("'break' outside of a loop"), "{}", errors[0]);
}

#[test]
fn assignment_to_undeclared_variable_is_rejected() {
    let errors = semantic_errors("x = 5;");
    assert!(errors[0].contains("invalid assignment"), "{}", errors[0]);
}

#[test]
fn redeclaration_is_rejected() {
    let errors = semantic_errors("int x; int x;");
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("already declared"), "{}", errors[0]);
}

#[test]
fn mixed_operand_types_are_rejected() {
    let errors = semantic_errors("int x = 1 + \"one\";");
    assert!(errors[0].contains("incompatible types"), "{}", errors[0]);
}

#[test]
fn non_integer_array_index_is_rejected() {
    let errors = semantic_errors("int a; a[\"k\"] = 1;");
    assert!(errors[0].contains("array index"), "{}", errors[0]);
}

#[test]
fn diagnostics_accumulate_across_statements() {
    let errors = semantic_errors("break; int x = \"hi\";");
    assert_eq!(errors.len(), 2);
}

#[test]
fn well_formed_program_has_no_diagnostics() {
    let out = compile("int i; for (i = 0; i < 3; i = i + 1) { print(i); }");
    assert!(out.is_ok());
}

#[test]
fn function_return_type_is_inferred_from_top_level_return() {
    let out = compile("def f() { return \"s\"; } string v = f(); print(v);")
        .expect("compilation failed");
    let entry = out.symbols.lookup("f").expect("f in symbol table");
    assert_eq!(entry.ty, Some(ell::frontend::ast::Ty::Str));
}

#[test]
fn symbol_table_records_types_and_occurrences() {
    let out = compile("int x; x = 5; print(x);").expect("compilation failed");
    let entry = out.symbols.lookup("x").expect("x in symbol table");
    assert_eq!(entry.ty, Some(ell::frontend::ast::Ty::Int));
    assert_eq!(entry.occurrences, vec![(1, 5), (1, 8), (1, 21)]);
}

#[test]
fn semantic_failure_emits_no_code() {
    match compile("int x = \"hi\";") {
        Err(CompileError::Semantic(_)) => {}
        other => panic!("expected semantic failure, got {:?}", other.is_ok()),
    }
}

#[test]
fn syntax_error_reports_position() {
    let err = compile("int x = ;").unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("syntax error"), "{msg}");
    assert!(msg.contains("line 1"), "{msg}");
}

#[test]
fn lexical_error_aborts_compilation() {
    let err = compile("int x = 1 ! 2;").unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("lexical error"), "{msg}");
}
