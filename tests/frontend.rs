use ell::frontend::ast::{Binop, Exp, Item, Program, Stmt, Ty, Vdecl};
use ell::frontend::lexer::Lexer;
use ell::frontend::parser::ParseError;
use ell::frontend::symbols::SymbolTable;
use ell::frontend::token::{Token, TokenKind};
use ell::frontend::{self, typecheck, Node};

fn lex_all(input: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(input);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token();
        let kind = token.kind;
        tokens.push(token);
        if matches!(kind, TokenKind::Eof | TokenKind::Error) {
            return tokens;
        }
    }
}

#[test]
fn tokens_carry_line_and_column() {
    let tokens = lex_all("int x;\n x = 2;");
    let positions: Vec<(TokenKind, u32, u32)> =
        tokens.iter().map(|t| (t.kind, t.line, t.column)).collect();
    assert_eq!(
        positions,
        vec![
            (TokenKind::KwInt, 1, 1),
            (TokenKind::Ident, 1, 5),
            (TokenKind::Semi, 1, 6),
            (TokenKind::Ident, 2, 2),
            (TokenKind::Eq, 2, 4),
            (TokenKind::IntConst, 2, 6),
            (TokenKind::Semi, 2, 7),
            (TokenKind::Eof, 2, 8),
        ]
    );
}

#[test]
fn two_character_operators_need_one_lookahead() {
    let kinds: Vec<TokenKind> = lex_all("<= >= == != < > =")
        .iter()
        .map(|t| t.kind)
        .collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::LtEq,
            TokenKind::GtEq,
            TokenKind::EqEq,
            TokenKind::BangEq,
            TokenKind::Lt,
            TokenKind::Gt,
            TokenKind::Eq,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn bare_bang_is_a_lexical_error() {
    let tokens = lex_all("1 ! 2");
    let last = tokens.last().unwrap();
    assert_eq!(last.kind, TokenKind::Error);
    assert!(last.lexeme.contains('!'));

    assert!(matches!(
        frontend::parse("int x = 1 ! 2;"),
        Err(ParseError::Lexical { .. })
    ));
}

#[test]
fn unterminated_string_is_a_lexical_error() {
    let tokens = lex_all("\"abc");
    assert_eq!(tokens.last().unwrap().kind, TokenKind::Error);
    assert_eq!(tokens.last().unwrap().lexeme, "unterminated string");
}

#[test]
fn string_lexemes_exclude_the_quotes() {
    let tokens = lex_all("\"hi there\"");
    assert_eq!(tokens[0].kind, TokenKind::StrConst);
    assert_eq!(tokens[0].lexeme, "hi there");
}

#[test]
fn keywords_are_not_identifiers() {
    let kinds: Vec<TokenKind> = lex_all("forx for int_ int")
        .iter()
        .map(|t| t.kind)
        .collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Ident,
            TokenKind::KwFor,
            TokenKind::Ident,
            TokenKind::KwInt,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn floats_need_digits_then_a_dot() {
    let tokens = lex_all("12.5 7. 3");
    assert_eq!(tokens[0].kind, TokenKind::FloatConst);
    assert_eq!(tokens[0].lexeme, "12.5");
    assert_eq!(tokens[1].kind, TokenKind::FloatConst);
    assert_eq!(tokens[1].lexeme, "7.");
    assert_eq!(tokens[2].kind, TokenKind::IntConst);
}

#[test]
fn lexer_records_identifier_occurrences() {
    let mut lexer = Lexer::new("abc + abc * other");
    loop {
        if lexer.next_token().kind == TokenKind::Eof {
            break;
        }
    }
    let symbols = lexer.into_symbols();
    let abc = symbols.lookup("abc").expect("abc recorded");
    assert_eq!(abc.occurrences, vec![(1, 1), (1, 7)]);
    assert_eq!(abc.ty, None);
    assert!(symbols.exists("other"));
}

#[test]
fn scope_exit_forgets_locals() {
    let mut symbols = SymbolTable::new();
    symbols.add_occurrence("global", 1, 1);

    symbols.enter_scope();
    symbols.add_occurrence("local", 2, 3);
    assert!(symbols.defined_in_current_scope("local"));
    assert!(!symbols.defined_in_current_scope("global"));
    assert!(symbols.exists("global"));

    symbols.exit_scope();
    assert!(symbols.lookup("local").is_none());
    assert!(symbols.exists("global"));
}

#[test]
fn global_frame_is_never_popped() {
    let mut symbols = SymbolTable::new();
    symbols.exit_scope();
    symbols.exit_scope();
    symbols.add_occurrence("still_here", 1, 1);
    assert!(symbols.exists("still_here"));
}

#[test]
fn occurrences_attach_to_the_innermost_visible_entry() {
    let mut symbols = SymbolTable::new();
    symbols.add_occurrence("n", 1, 1);
    symbols.enter_scope();
    symbols.add_occurrence("n", 2, 5);
    symbols.exit_scope();
    assert_eq!(
        symbols.lookup("n").unwrap().occurrences,
        vec![(1, 1), (2, 5)]
    );
}

#[test]
fn hand_built_declarations_record_their_line() {
    // A declaration the lexer never saw: the checker itself creates the
    // entry and must stamp it with the declaration's own position.
    let mut program = Program {
        items: vec![Item::Stmt(Node::new(
            Stmt::Decl(Vdecl {
                ty: Ty::Int,
                name: "x".into(),
                init: None,
            }),
            7,
        ))],
    };
    let analysis = typecheck::check(&mut program, SymbolTable::new());
    assert!(analysis.errors.is_empty());

    let entry = analysis.symbols.lookup("x").expect("x declared");
    assert_eq!(entry.ty, Some(Ty::Int));
    assert_eq!(entry.occurrences, vec![(7, 0)]);
}

#[test]
fn unary_minus_parses_as_zero_minus_operand() {
    let (program, _) = frontend::parse("int x = -y;").expect("parse failed");
    let Item::Stmt(stmt) = &program.items[0] else {
        panic!("expected a statement");
    };
    let Stmt::Decl(decl) = &stmt.t else {
        panic!("expected a declaration");
    };
    let expected = Exp::Bop(
        Binop::Sub,
        Box::new(Node::no_loc(Exp::Int(0))),
        Box::new(Node::no_loc(Exp::Id("y".into()))),
    );
    assert_eq!(decl.init.as_ref().unwrap().t, expected);
}

#[test]
fn declaration_type_flows_into_the_node() {
    let (program, _) = frontend::parse("float f;").expect("parse failed");
    let Item::Stmt(stmt) = &program.items[0] else {
        panic!("expected a statement");
    };
    let Stmt::Decl(decl) = &stmt.t else {
        panic!("expected a declaration");
    };
    assert_eq!(decl.ty, Ty::Float);
    assert_eq!(decl.name, "f");
    assert!(decl.init.is_none());
}

#[test]
fn else_branch_is_attached() {
    let (program, _) = frontend::parse("if (1 < 2) { } else { break; }").expect("parse failed");
    let Item::Stmt(stmt) = &program.items[0] else {
        panic!("expected a statement");
    };
    let Stmt::If(_, _, otherwise) = &stmt.t else {
        panic!("expected an if");
    };
    assert!(otherwise.is_some());
}

#[test]
fn functions_collect_parameters_in_order() {
    let (program, _) =
        frontend::parse("def f(int a, float b, string c) { }").expect("parse failed");
    let Item::Func(f) = &program.items[0] else {
        panic!("expected a function");
    };
    let params: Vec<(Ty, &str)> = f.params.iter().map(|p| (p.ty, p.name.as_str())).collect();
    assert_eq!(
        params,
        vec![(Ty::Int, "a"), (Ty::Float, "b"), (Ty::Str, "c")]
    );
}

#[test]
fn empty_input_parses_to_an_empty_program() {
    let (program, _) = frontend::parse("").expect("parse failed");
    assert!(program.items.is_empty());
}

#[test]
fn parsing_is_deterministic() {
    let src = "int i; for (i = 0; i < 3; i = i + 1) { if (i == 1) { print(i); } }";
    let (first, _) = frontend::parse(src).expect("parse failed");
    let (second, _) = frontend::parse(src).expect("parse failed");
    assert_eq!(first, second);
}

#[test]
fn missing_production_is_a_syntax_error() {
    assert!(matches!(
        frontend::parse("int x = ;"),
        Err(ParseError::NoProduction { .. })
    ));
}

#[test]
fn terminal_mismatch_is_a_syntax_error() {
    assert!(matches!(
        frontend::parse("def 1() { }"),
        Err(ParseError::UnexpectedToken { .. })
    ));
}
