use super::ast::{Exp, Fdef, Item, Program, Stmt, Ty, Vdecl};
use super::symbols::SymbolTable;
use super::Node;

#[derive(Debug, thiserror::Error)]
#[error("line {line}: {message}")]
pub struct TypeError {
    pub message: String,
    pub line: u32,
}

/// Result of the semantic walk: the table with resolved types plus every
/// diagnostic that accumulated. The walk never aborts; a failed
/// sub-expression poisons its parents with `Ty::Error` so one root cause
/// does not cascade into duplicate messages.
pub struct Analysis {
    pub symbols: SymbolTable,
    pub errors: Vec<TypeError>,
}

/// Walks the AST checking names, types and statement contexts. The table is
/// the one seeded by the lexer (every identifier occurrence lives in the
/// global frame); declarations claim those entries by filling in a type.
pub fn check(program: &mut Program, symbols: SymbolTable) -> Analysis {
    let mut checker = Checker {
        symbols,
        errors: Vec::new(),
    };

    // Top-level items run in the global frame; no scope is pushed here.
    for item in &mut program.items {
        match item {
            Item::Stmt(s) => checker.stmt(s, false),
            Item::Func(f) => checker.func(f),
        }
    }

    Analysis {
        symbols: checker.symbols,
        errors: checker.errors,
    }
}

enum Declared {
    Fresh,
    Claimed,
    Conflict,
}

struct Checker {
    symbols: SymbolTable,
    errors: Vec<TypeError>,
}

impl Checker {
    fn error(&mut self, line: u32, message: String) {
        self.errors.push(TypeError { message, line });
    }

    fn stmt(&mut self, stmt: &mut Node<Stmt>, in_loop: bool) {
        let line = stmt.line;
        match &mut stmt.t {
            Stmt::Decl(v) => self.vdecl(v, line),
            Stmt::Assn(name, value) => {
                let value_ty = self.exp(value);
                match self.symbols.lookup(name) {
                    None => {
                        self.error(line, format!("variable '{name}' is not declared"));
                    }
                    Some(entry) => {
                        let declared = entry.ty;
                        if declared != Some(value_ty) && value_ty != Ty::Error {
                            let declared = match declared {
                                Some(ty) => ty.to_string(),
                                None => "-".to_string(),
                            };
                            self.error(
                                line,
                                format!(
                                    "invalid assignment: variable '{name}' has type {declared} but was assigned {value_ty}"
                                ),
                            );
                        }
                    }
                }
            }
            Stmt::IndexAssn(name, index, value) => {
                let index_ty = self.exp(index);
                if index_ty != Ty::Int {
                    self.error(line, "array index must be an integer".to_string());
                    return;
                }
                let element = match self.symbols.lookup(name) {
                    None => {
                        self.error(line, format!("array '{name}' is not declared"));
                        return;
                    }
                    Some(entry) => entry.ty,
                };
                let value_ty = self.exp(value);
                if element != Some(value_ty) && value_ty != Ty::Error {
                    self.error(line, format!("invalid assignment to array '{name}'"));
                }
            }
            Stmt::Call(name, _args) => {
                // Statement calls follow the expression rule: the callee must
                // resolve; arguments and arity are not checked.
                if self.symbols.lookup(name).is_none() {
                    self.error(line, format!("function '{name}' is not declared"));
                }
            }
            Stmt::If(cond, then, otherwise) => {
                self.exp(cond);
                self.stmt(then, in_loop);
                if let Some(otherwise) = otherwise {
                    self.stmt(otherwise, in_loop);
                }
            }
            Stmt::For(init, cond, update, body) => {
                // The loop header gets its own scope for init declarations.
                self.symbols.enter_scope();
                if let Some(init) = init {
                    self.stmt(init, false);
                }
                if let Some(cond) = cond {
                    self.exp(cond);
                }
                if let Some(update) = update {
                    self.stmt(update, true);
                }
                self.stmt(body, true);
                self.symbols.exit_scope();
            }
            Stmt::While(cond, body) => {
                self.exp(cond);
                self.stmt(body, true);
            }
            Stmt::Ret(value, inferred) => {
                *inferred = match value {
                    Some(e) => self.exp(e),
                    None => Ty::Void,
                };
            }
            Stmt::Print(e) => {
                self.exp(e);
            }
            Stmt::Read(name) => {
                if self.symbols.lookup(name).is_none() {
                    self.error(line, format!("variable '{name}' is not declared"));
                }
            }
            Stmt::Break => {
                if !in_loop {
                    self.error(line, "'break' outside of a loop".to_string());
                }
            }
            Stmt::Block(stmts) => {
                self.symbols.enter_scope();
                for s in stmts {
                    self.stmt(s, in_loop);
                }
                self.symbols.exit_scope();
            }
        }
    }

    /// Declarations claim the lexer-created entry when its type is still
    /// empty; a visible entry that already has a type is a redeclaration.
    fn vdecl(&mut self, v: &Vdecl, line: u32) {
        let declared = match self.symbols.lookup_mut(&v.name) {
            Some(entry) if entry.ty.is_none() => {
                entry.ty = Some(v.ty);
                Declared::Claimed
            }
            Some(_) => Declared::Conflict,
            None => Declared::Fresh,
        };

        match declared {
            Declared::Conflict => {
                self.error(line, format!("variable '{}' is already declared", v.name));
                return;
            }
            Declared::Fresh => {
                self.symbols.add_occurrence(&v.name, line, 0);
                if let Some(entry) = self.symbols.lookup_mut(&v.name) {
                    entry.ty = Some(v.ty);
                }
            }
            Declared::Claimed => {}
        }

        if let Some(init) = &v.init {
            let init_ty = self.exp(init);
            if init_ty != v.ty && init_ty != Ty::Error {
                self.error(
                    line,
                    format!(
                        "invalid assignment: variable '{}' has type {} but was initialised with {}",
                        v.name, v.ty, init_ty
                    ),
                );
            }
        }
    }

    fn func(&mut self, f: &mut Node<Fdef>) {
        let Fdef { name, params, body } = &mut f.t;

        // Provisional return type; the body scan below may refine it.
        self.symbols.add_occurrence(name, 0, 0);
        if let Some(entry) = self.symbols.lookup_mut(name) {
            entry.ty = Some(Ty::Int);
        }

        self.symbols.enter_scope();
        for param in params.iter() {
            let line = param.line;
            self.vdecl(&param.t, line);
        }

        self.symbols.enter_scope();
        for stmt in body.iter_mut() {
            self.stmt(stmt, false);
        }
        self.symbols.exit_scope();

        // Return-type inference only looks at the body's immediate
        // statements; returns nested in ifs or loops are not scanned.
        let mut ret_ty = Ty::Int;
        for stmt in body.iter() {
            if let Stmt::Ret(_, inferred) = &stmt.t {
                if *inferred != Ty::Error && *inferred != Ty::Void {
                    ret_ty = *inferred;
                }
            }
        }
        self.symbols.exit_scope();

        if let Some(entry) = self.symbols.lookup_mut(name) {
            entry.ty = Some(ret_ty);
        }
    }

    fn exp(&mut self, e: &Node<Exp>) -> Ty {
        let line = e.line;
        match &e.t {
            Exp::Int(_) => Ty::Int,
            Exp::Float(_) => Ty::Float,
            Exp::Str(_) => Ty::Str,
            Exp::Id(name) => match self.symbols.lookup(name) {
                None => {
                    self.error(line, format!("variable '{name}' is not declared"));
                    Ty::Error
                }
                // An entry with an empty type was created only by the
                // lexical pass: poison quietly, a declaration error
                // elsewhere is the root cause.
                Some(entry) => entry.ty.unwrap_or(Ty::Error),
            },
            Exp::Index(name, index) => {
                let index_ty = self.exp(index);
                if index_ty != Ty::Int {
                    self.error(line, "array index must be an integer".to_string());
                    return Ty::Error;
                }
                match self.symbols.lookup(name) {
                    None => {
                        self.error(line, format!("array '{name}' is not declared"));
                        Ty::Error
                    }
                    Some(entry) => entry.ty.unwrap_or(Ty::Error),
                }
            }
            Exp::Call(name, _args) => match self.symbols.lookup(name) {
                None => {
                    self.error(line, format!("function '{name}' is not declared"));
                    Ty::Error
                }
                Some(entry) => entry.ty.unwrap_or(Ty::Error),
            },
            Exp::Bop(op, left, right) => {
                let left_ty = self.exp(left);
                let right_ty = self.exp(right);
                if left_ty == Ty::Error || right_ty == Ty::Error {
                    return Ty::Error;
                }
                if left_ty == right_ty {
                    return left_ty;
                }
                self.error(
                    line,
                    format!("incompatible types ({left_ty} {op} {right_ty})"),
                );
                Ty::Error
            }
        }
    }
}
