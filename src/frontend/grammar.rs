//! The fixed LL(1) parsing table. Each entry maps a (non-terminal, lookahead
//! terminal) pair to the production's right-hand side, with semantic action
//! markers interleaved where the parser must build AST nodes. The grammar is
//! left-factored and free of left recursion; epsilon productions are the
//! empty slice on the appropriate follow-set terminals.
//!
//! Expression stratification, lowest binding first:
//! EXPR -> REL_EXPR -> ADD_EXPR -> MULT_EXPR -> UNARY_EXPR -> PRIMARY

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;

use super::token::TokenKind;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Nt {
    Program,
    DeclList,
    Decl,
    DeclTail,
    TypeSpec,
    Stmt,
    AssignOrCall,
    ElsePart,
    ForInit,
    ForUpdate,
    ReturnExpr,
    Block,
    StmtList,
    Expr,
    RelExpr,
    RelExprTail,
    RelOp,
    AddExpr,
    AddExprTail,
    AddOp,
    MultExpr,
    MultExprTail,
    MultOp,
    UnaryExpr,
    Primary,
    PrimaryTail,
    ParamList,
    ParamListTail,
    ArgList,
    ArgListTail,
}

/// Semantic action markers. `Mark*` push a sentinel delimiting a collection;
/// `Build*` pop finished children and push the node they construct.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    MarkProg,
    MarkBlock,
    MarkDecl,
    MarkParams,
    MarkArgs,
    MarkForInit,
    MarkForUpdate,
    BuildInt,
    BuildFloat,
    BuildStr,
    BuildVar,
    BuildType,
    BuildVarDecl,
    BuildAssign,
    BuildAdd,
    BuildSub,
    BuildMul,
    BuildDiv,
    BuildMod,
    BuildLt,
    BuildGt,
    BuildLe,
    BuildGe,
    BuildEq,
    BuildNeq,
    BuildNeg,
    BuildArrayAccess,
    BuildArrayAssign,
    BuildIf,
    BuildIfElse,
    BuildForInit,
    BuildForUpdate,
    BuildFor,
    BuildReturn,
    BuildBreak,
    BuildPrint,
    BuildRead,
    BuildFuncId,
    BuildParam,
    BuildFunc,
    BuildCall,
    BuildCallStmt,
    BuildBlock,
    BuildProg,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::MarkProg => "#MARK_PROG",
            Action::MarkBlock => "#MARK_BLOCK",
            Action::MarkDecl => "#MARK_DECL",
            Action::MarkParams => "#MARK_PARAMS",
            Action::MarkArgs => "#MARK_ARGS",
            Action::MarkForInit => "#MARK_FOR_INIT",
            Action::MarkForUpdate => "#MARK_FOR_UPDATE",
            Action::BuildInt => "#BUILD_INT",
            Action::BuildFloat => "#BUILD_FLOAT",
            Action::BuildStr => "#BUILD_STRING",
            Action::BuildVar => "#BUILD_VAR",
            Action::BuildType => "#BUILD_TYPE",
            Action::BuildVarDecl => "#BUILD_VARDECL",
            Action::BuildAssign => "#BUILD_ASSIGN",
            Action::BuildAdd => "#BUILD_ADD",
            Action::BuildSub => "#BUILD_SUB",
            Action::BuildMul => "#BUILD_MUL",
            Action::BuildDiv => "#BUILD_DIV",
            Action::BuildMod => "#BUILD_MOD",
            Action::BuildLt => "#BUILD_LT",
            Action::BuildGt => "#BUILD_GT",
            Action::BuildLe => "#BUILD_LE",
            Action::BuildGe => "#BUILD_GE",
            Action::BuildEq => "#BUILD_EQ",
            Action::BuildNeq => "#BUILD_NEQ",
            Action::BuildNeg => "#BUILD_NEG",
            Action::BuildArrayAccess => "#BUILD_ARRAY_ACCESS",
            Action::BuildArrayAssign => "#BUILD_ARRAY_ASSIGN",
            Action::BuildIf => "#BUILD_IF",
            Action::BuildIfElse => "#BUILD_IF_ELSE",
            Action::BuildForInit => "#BUILD_FOR_INIT",
            Action::BuildForUpdate => "#BUILD_FOR_UPDATE",
            Action::BuildFor => "#BUILD_FOR",
            Action::BuildReturn => "#BUILD_RETURN",
            Action::BuildBreak => "#BUILD_BREAK",
            Action::BuildPrint => "#BUILD_PRINT",
            Action::BuildRead => "#BUILD_READ",
            Action::BuildFuncId => "#BUILD_FUNC_ID",
            Action::BuildParam => "#BUILD_PARAM",
            Action::BuildFunc => "#BUILD_FUNC",
            Action::BuildCall => "#BUILD_CALL",
            Action::BuildCallStmt => "#BUILD_CALL_STMT",
            Action::BuildBlock => "#BUILD_BLOCK",
            Action::BuildProg => "#BUILD_PROG",
        };
        write!(f, "{s}")
    }
}

#[derive(Clone, Copy, Debug)]
pub enum Sym {
    T(TokenKind),
    N(Nt),
    A(Action),
}

/// Looks up the production for (non-terminal, lookahead). `None` means the
/// lookahead is not in the non-terminal's predict set: a syntax error.
pub fn production(nt: Nt, look: TokenKind) -> Option<&'static [Sym]> {
    TABLE.get(&(nt, look)).copied()
}

static TABLE: Lazy<HashMap<(Nt, TokenKind), &'static [Sym]>> = Lazy::new(build);

fn build() -> HashMap<(Nt, TokenKind), &'static [Sym]> {
    use Action::*;
    use Nt::*;
    use Sym::{A, N, T};
    use TokenKind as Tk;

    const TYPE_FIRST: &[TokenKind] = &[Tk::KwInt, Tk::KwFloat, Tk::KwString];
    const STMT_FIRST: &[TokenKind] = &[
        Tk::KwIf,
        Tk::KwFor,
        Tk::KwReturn,
        Tk::KwBreak,
        Tk::KwPrint,
        Tk::KwRead,
        Tk::Ident,
        Tk::LBrace,
    ];
    // FIRST(DECL) = FIRST(TYPE_SPEC) ∪ {def} ∪ FIRST(STMT)
    const DECL_FIRST: &[TokenKind] = &[
        Tk::KwInt,
        Tk::KwFloat,
        Tk::KwString,
        Tk::KwDef,
        Tk::KwIf,
        Tk::KwFor,
        Tk::KwReturn,
        Tk::KwBreak,
        Tk::KwPrint,
        Tk::KwRead,
        Tk::Ident,
        Tk::LBrace,
    ];
    const EXPR_FIRST: &[TokenKind] = &[
        Tk::IntConst,
        Tk::FloatConst,
        Tk::StrConst,
        Tk::KwNull,
        Tk::Ident,
        Tk::KwNew,
        Tk::LParen,
        Tk::Dash,
    ];
    const EPS: &[Sym] = &[];

    let mut table: HashMap<(Nt, TokenKind), &'static [Sym]> = HashMap::new();

    {
        let mut set = |nt: Nt, looks: &[TokenKind], rhs: &'static [Sym]| {
            for &look in looks {
                table.insert((nt, look), rhs);
            }
        };

        // PROGRAM -> DECL_LIST
        set(
            Program,
            &[
                Tk::KwInt,
                Tk::KwFloat,
                Tk::KwString,
                Tk::KwDef,
                Tk::KwIf,
                Tk::KwFor,
                Tk::KwReturn,
                Tk::KwBreak,
                Tk::KwPrint,
                Tk::KwRead,
                Tk::Ident,
                Tk::LBrace,
                Tk::Eof,
            ],
            &[A(MarkProg), N(DeclList), A(BuildProg)],
        );

        // DECL_LIST -> DECL DECL_LIST | ε
        set(DeclList, DECL_FIRST, &[N(Decl), N(DeclList)]);
        set(DeclList, &[Tk::Eof, Tk::RBrace], EPS);

        // DECL -> TYPE_SPEC IDENT DECL_TAIL
        set(
            Decl,
            TYPE_FIRST,
            &[
                A(MarkDecl),
                N(TypeSpec),
                A(BuildType),
                T(Tk::Ident),
                A(BuildVar),
                N(DeclTail),
                A(BuildVarDecl),
            ],
        );
        // DECL -> KW_DEF IDENT ( PARAM_LIST ) BLOCK
        set(
            Decl,
            &[Tk::KwDef],
            &[
                T(Tk::KwDef),
                T(Tk::Ident),
                A(BuildFuncId),
                T(Tk::LParen),
                A(MarkParams),
                N(ParamList),
                T(Tk::RParen),
                N(Block),
                A(BuildFunc),
            ],
        );
        // DECL -> STMT
        set(Decl, STMT_FIRST, &[N(Stmt)]);

        // DECL_TAIL -> ; | = EXPR ; | [ EXPR ] ;
        set(DeclTail, &[Tk::Semi], &[T(Tk::Semi)]);
        set(DeclTail, &[Tk::Eq], &[T(Tk::Eq), N(Expr), T(Tk::Semi)]);
        set(
            DeclTail,
            &[Tk::LBracket],
            &[T(Tk::LBracket), N(Expr), T(Tk::RBracket), T(Tk::Semi)],
        );

        // TYPE_SPEC -> int | float | string
        set(TypeSpec, &[Tk::KwInt], &[T(Tk::KwInt)]);
        set(TypeSpec, &[Tk::KwFloat], &[T(Tk::KwFloat)]);
        set(TypeSpec, &[Tk::KwString], &[T(Tk::KwString)]);

        // STMT -> if ( EXPR ) BLOCK ELSE_PART
        set(
            Stmt,
            &[Tk::KwIf],
            &[
                T(Tk::KwIf),
                T(Tk::LParen),
                N(Expr),
                T(Tk::RParen),
                N(Block),
                N(ElsePart),
            ],
        );
        // STMT -> for ( FOR_INIT ; EXPR ; FOR_UPDATE ) BLOCK
        set(
            Stmt,
            &[Tk::KwFor],
            &[
                T(Tk::KwFor),
                T(Tk::LParen),
                A(MarkForInit),
                N(ForInit),
                A(BuildForInit),
                T(Tk::Semi),
                N(Expr),
                T(Tk::Semi),
                A(MarkForUpdate),
                N(ForUpdate),
                A(BuildForUpdate),
                T(Tk::RParen),
                N(Block),
                A(BuildFor),
            ],
        );
        // STMT -> return RETURN_EXPR ;
        set(
            Stmt,
            &[Tk::KwReturn],
            &[T(Tk::KwReturn), N(ReturnExpr), A(BuildReturn), T(Tk::Semi)],
        );
        // STMT -> break ;
        set(
            Stmt,
            &[Tk::KwBreak],
            &[T(Tk::KwBreak), A(BuildBreak), T(Tk::Semi)],
        );
        // STMT -> print ( EXPR ) ;
        set(
            Stmt,
            &[Tk::KwPrint],
            &[
                T(Tk::KwPrint),
                T(Tk::LParen),
                N(Expr),
                T(Tk::RParen),
                A(BuildPrint),
                T(Tk::Semi),
            ],
        );
        // STMT -> read ( IDENT ) ;
        set(
            Stmt,
            &[Tk::KwRead],
            &[
                T(Tk::KwRead),
                T(Tk::LParen),
                T(Tk::Ident),
                T(Tk::RParen),
                A(BuildRead),
                T(Tk::Semi),
            ],
        );
        // STMT -> IDENT ASSIGN_OR_CALL
        set(
            Stmt,
            &[Tk::Ident],
            &[T(Tk::Ident), A(BuildVar), N(AssignOrCall)],
        );
        // STMT -> BLOCK
        set(Stmt, &[Tk::LBrace], &[N(Block)]);

        // ASSIGN_OR_CALL -> [ EXPR ] = EXPR ; | = EXPR ; | ( ARG_LIST ) ;
        set(
            AssignOrCall,
            &[Tk::LBracket],
            &[
                T(Tk::LBracket),
                N(Expr),
                T(Tk::RBracket),
                T(Tk::Eq),
                N(Expr),
                T(Tk::Semi),
                A(BuildArrayAssign),
            ],
        );
        set(
            AssignOrCall,
            &[Tk::Eq],
            &[T(Tk::Eq), N(Expr), A(BuildAssign), T(Tk::Semi)],
        );
        set(
            AssignOrCall,
            &[Tk::LParen],
            &[
                T(Tk::LParen),
                A(MarkArgs),
                N(ArgList),
                T(Tk::RParen),
                A(BuildCall),
                A(BuildCallStmt),
                T(Tk::Semi),
            ],
        );

        // ELSE_PART -> else BLOCK | ε
        // Both alternatives end in an if-builder so the construction has a
        // fixed arity, the same coalescing trick as the for-loop clauses.
        set(
            ElsePart,
            &[Tk::KwElse],
            &[T(Tk::KwElse), N(Block), A(BuildIfElse)],
        );
        set(
            ElsePart,
            &[
                Tk::KwInt,
                Tk::KwFloat,
                Tk::KwString,
                Tk::KwDef,
                Tk::KwIf,
                Tk::KwFor,
                Tk::KwReturn,
                Tk::KwBreak,
                Tk::KwPrint,
                Tk::KwRead,
                Tk::Ident,
                Tk::LBrace,
                Tk::RBrace,
                Tk::Eof,
            ],
            &[A(BuildIf)],
        );

        // FOR_INIT -> TYPE_SPEC IDENT = EXPR | IDENT = EXPR | ε
        set(
            ForInit,
            TYPE_FIRST,
            &[
                A(MarkDecl),
                N(TypeSpec),
                A(BuildType),
                T(Tk::Ident),
                A(BuildVar),
                T(Tk::Eq),
                N(Expr),
                A(BuildVarDecl),
            ],
        );
        set(
            ForInit,
            &[Tk::Ident],
            &[
                T(Tk::Ident),
                A(BuildVar),
                T(Tk::Eq),
                N(Expr),
                A(BuildAssign),
            ],
        );
        set(ForInit, &[Tk::Semi], EPS);

        // FOR_UPDATE -> IDENT = EXPR | ε
        set(
            ForUpdate,
            &[Tk::Ident],
            &[
                T(Tk::Ident),
                A(BuildVar),
                T(Tk::Eq),
                N(Expr),
                A(BuildAssign),
            ],
        );
        set(ForUpdate, &[Tk::RParen], EPS);

        // RETURN_EXPR -> EXPR | ε
        set(ReturnExpr, EXPR_FIRST, &[N(Expr)]);
        set(ReturnExpr, &[Tk::Semi], EPS);

        // BLOCK -> { STMT_LIST }
        set(
            Block,
            &[Tk::LBrace],
            &[
                T(Tk::LBrace),
                A(MarkBlock),
                N(StmtList),
                T(Tk::RBrace),
                A(BuildBlock),
            ],
        );

        // STMT_LIST -> DECL STMT_LIST | ε  (no nested function definitions)
        set(
            StmtList,
            &[
                Tk::KwInt,
                Tk::KwFloat,
                Tk::KwString,
                Tk::KwIf,
                Tk::KwFor,
                Tk::KwReturn,
                Tk::KwBreak,
                Tk::KwPrint,
                Tk::KwRead,
                Tk::Ident,
                Tk::LBrace,
            ],
            &[N(Decl), N(StmtList)],
        );
        set(StmtList, &[Tk::RBrace], EPS);

        // EXPR -> REL_EXPR
        set(Expr, EXPR_FIRST, &[N(RelExpr)]);

        // REL_EXPR -> ADD_EXPR REL_EXPR'
        set(RelExpr, EXPR_FIRST, &[N(AddExpr), N(RelExprTail)]);

        // REL_EXPR' -> REL_OP ADD_EXPR REL_EXPR' | ε
        set(
            RelExprTail,
            &[Tk::Lt],
            &[N(RelOp), N(AddExpr), A(BuildLt), N(RelExprTail)],
        );
        set(
            RelExprTail,
            &[Tk::Gt],
            &[N(RelOp), N(AddExpr), A(BuildGt), N(RelExprTail)],
        );
        set(
            RelExprTail,
            &[Tk::LtEq],
            &[N(RelOp), N(AddExpr), A(BuildLe), N(RelExprTail)],
        );
        set(
            RelExprTail,
            &[Tk::GtEq],
            &[N(RelOp), N(AddExpr), A(BuildGe), N(RelExprTail)],
        );
        set(
            RelExprTail,
            &[Tk::EqEq],
            &[N(RelOp), N(AddExpr), A(BuildEq), N(RelExprTail)],
        );
        set(
            RelExprTail,
            &[Tk::BangEq],
            &[N(RelOp), N(AddExpr), A(BuildNeq), N(RelExprTail)],
        );
        set(
            RelExprTail,
            &[Tk::Semi, Tk::RParen, Tk::RBracket, Tk::Comma],
            EPS,
        );

        // REL_OP -> < | > | <= | >= | == | !=
        set(RelOp, &[Tk::Lt], &[T(Tk::Lt)]);
        set(RelOp, &[Tk::Gt], &[T(Tk::Gt)]);
        set(RelOp, &[Tk::LtEq], &[T(Tk::LtEq)]);
        set(RelOp, &[Tk::GtEq], &[T(Tk::GtEq)]);
        set(RelOp, &[Tk::EqEq], &[T(Tk::EqEq)]);
        set(RelOp, &[Tk::BangEq], &[T(Tk::BangEq)]);

        // ADD_EXPR -> MULT_EXPR ADD_EXPR'
        set(AddExpr, EXPR_FIRST, &[N(MultExpr), N(AddExprTail)]);

        // ADD_EXPR' -> ADD_OP MULT_EXPR ADD_EXPR' | ε
        set(
            AddExprTail,
            &[Tk::Plus],
            &[N(AddOp), N(MultExpr), A(BuildAdd), N(AddExprTail)],
        );
        set(
            AddExprTail,
            &[Tk::Dash],
            &[N(AddOp), N(MultExpr), A(BuildSub), N(AddExprTail)],
        );
        set(
            AddExprTail,
            &[
                Tk::Lt,
                Tk::Gt,
                Tk::LtEq,
                Tk::GtEq,
                Tk::EqEq,
                Tk::BangEq,
                Tk::Semi,
                Tk::RParen,
                Tk::RBracket,
                Tk::Comma,
            ],
            EPS,
        );

        // ADD_OP -> + | -
        set(AddOp, &[Tk::Plus], &[T(Tk::Plus)]);
        set(AddOp, &[Tk::Dash], &[T(Tk::Dash)]);

        // MULT_EXPR -> UNARY_EXPR MULT_EXPR'
        set(MultExpr, EXPR_FIRST, &[N(UnaryExpr), N(MultExprTail)]);

        // MULT_EXPR' -> MULT_OP UNARY_EXPR MULT_EXPR' | ε
        set(
            MultExprTail,
            &[Tk::Star],
            &[N(MultOp), N(UnaryExpr), A(BuildMul), N(MultExprTail)],
        );
        set(
            MultExprTail,
            &[Tk::Slash],
            &[N(MultOp), N(UnaryExpr), A(BuildDiv), N(MultExprTail)],
        );
        set(
            MultExprTail,
            &[Tk::Percent],
            &[N(MultOp), N(UnaryExpr), A(BuildMod), N(MultExprTail)],
        );
        set(
            MultExprTail,
            &[
                Tk::Plus,
                Tk::Dash,
                Tk::Lt,
                Tk::Gt,
                Tk::LtEq,
                Tk::GtEq,
                Tk::EqEq,
                Tk::BangEq,
                Tk::Semi,
                Tk::RParen,
                Tk::RBracket,
                Tk::Comma,
            ],
            EPS,
        );

        // MULT_OP -> * | / | %
        set(MultOp, &[Tk::Star], &[T(Tk::Star)]);
        set(MultOp, &[Tk::Slash], &[T(Tk::Slash)]);
        set(MultOp, &[Tk::Percent], &[T(Tk::Percent)]);

        // UNARY_EXPR -> - UNARY_EXPR | PRIMARY
        set(
            UnaryExpr,
            &[Tk::Dash],
            &[T(Tk::Dash), N(UnaryExpr), A(BuildNeg)],
        );
        set(
            UnaryExpr,
            &[
                Tk::IntConst,
                Tk::FloatConst,
                Tk::StrConst,
                Tk::KwNull,
                Tk::Ident,
                Tk::KwNew,
                Tk::LParen,
            ],
            &[N(Primary)],
        );

        // PRIMARY -> literals | null | IDENT PRIMARY_TAIL
        //          | new TYPE_SPEC [ EXPR ] | ( EXPR )
        set(Primary, &[Tk::IntConst], &[T(Tk::IntConst), A(BuildInt)]);
        set(
            Primary,
            &[Tk::FloatConst],
            &[T(Tk::FloatConst), A(BuildFloat)],
        );
        set(Primary, &[Tk::StrConst], &[T(Tk::StrConst), A(BuildStr)]);
        set(Primary, &[Tk::KwNull], &[T(Tk::KwNull)]);
        set(
            Primary,
            &[Tk::Ident],
            &[T(Tk::Ident), A(BuildVar), N(PrimaryTail)],
        );
        set(
            Primary,
            &[Tk::KwNew],
            &[
                T(Tk::KwNew),
                N(TypeSpec),
                T(Tk::LBracket),
                N(Expr),
                T(Tk::RBracket),
            ],
        );
        set(
            Primary,
            &[Tk::LParen],
            &[T(Tk::LParen), N(Expr), T(Tk::RParen)],
        );

        // PRIMARY_TAIL -> [ EXPR ] | ( ARG_LIST ) | ε
        set(
            PrimaryTail,
            &[Tk::LBracket],
            &[
                T(Tk::LBracket),
                N(Expr),
                T(Tk::RBracket),
                A(BuildArrayAccess),
            ],
        );
        set(
            PrimaryTail,
            &[Tk::LParen],
            &[
                T(Tk::LParen),
                A(MarkArgs),
                N(ArgList),
                T(Tk::RParen),
                A(BuildCall),
            ],
        );
        set(
            PrimaryTail,
            &[
                Tk::Star,
                Tk::Slash,
                Tk::Percent,
                Tk::Plus,
                Tk::Dash,
                Tk::Lt,
                Tk::Gt,
                Tk::LtEq,
                Tk::GtEq,
                Tk::EqEq,
                Tk::BangEq,
                Tk::Semi,
                Tk::RParen,
                Tk::RBracket,
                Tk::Comma,
            ],
            EPS,
        );

        // PARAM_LIST -> TYPE_SPEC IDENT PARAM_LIST' | ε
        set(
            ParamList,
            TYPE_FIRST,
            &[
                N(TypeSpec),
                A(BuildType),
                T(Tk::Ident),
                A(BuildParam),
                N(ParamListTail),
            ],
        );
        set(ParamList, &[Tk::RParen], EPS);

        // PARAM_LIST' -> , TYPE_SPEC IDENT PARAM_LIST' | ε
        set(
            ParamListTail,
            &[Tk::Comma],
            &[
                T(Tk::Comma),
                N(TypeSpec),
                A(BuildType),
                T(Tk::Ident),
                A(BuildParam),
                N(ParamListTail),
            ],
        );
        set(ParamListTail, &[Tk::RParen], EPS);

        // ARG_LIST -> EXPR ARG_LIST' | ε
        set(ArgList, EXPR_FIRST, &[N(Expr), N(ArgListTail)]);
        set(ArgList, &[Tk::RParen], EPS);

        // ARG_LIST' -> , EXPR ARG_LIST' | ε
        set(
            ArgListTail,
            &[Tk::Comma],
            &[T(Tk::Comma), N(Expr), N(ArgListTail)],
        );
        set(ArgListTail, &[Tk::RParen], EPS);
    }

    table
}
