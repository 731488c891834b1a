use crate::frontend::ast::{Exp, Item, Program, Stmt};
use crate::frontend::Node;

use super::Instr;

/// Linearises the AST in source order. No optimisation: every intermediate
/// value gets a fresh temporary and dead temporaries are kept.
pub fn lower(program: &Program) -> Vec<Instr> {
    let mut e = Emitter {
        temps: 0,
        labels: 0,
        code: Vec::new(),
    };

    for item in &program.items {
        match item {
            Item::Stmt(s) => e.stmt(s, None),
            Item::Func(f) => {
                e.code.push(Instr::Label(f.name.clone()));
                for stmt in &f.body {
                    e.stmt(stmt, None);
                }
            }
        }
    }

    e.code
}

struct Emitter {
    temps: usize,
    labels: usize,
    code: Vec<Instr>,
}

impl Emitter {
    fn new_temp(&mut self) -> String {
        let t = format!("t{}", self.temps);
        self.temps += 1;
        t
    }

    fn new_label(&mut self) -> String {
        let l = format!("L{}", self.labels);
        self.labels += 1;
        l
    }

    /// Emits a statement. `loop_exit` is the label just past the innermost
    /// enclosing loop, the target `break` jumps to.
    fn stmt(&mut self, stmt: &Node<Stmt>, loop_exit: Option<&str>) {
        match &stmt.t {
            Stmt::Decl(v) => {
                if let Some(init) = &v.init {
                    let src = self.exp(init);
                    self.code.push(Instr::Assign {
                        dst: v.name.clone(),
                        src,
                    });
                }
            }
            Stmt::Assn(name, value) => {
                let src = self.exp(value);
                self.code.push(Instr::Assign {
                    dst: name.clone(),
                    src,
                });
            }
            Stmt::IndexAssn(name, index, value) => {
                let index = self.exp(index);
                let src = self.exp(value);
                self.code.push(Instr::Store {
                    array: name.clone(),
                    index,
                    src,
                });
            }
            Stmt::Call(name, args) => {
                self.call(name, args);
            }
            Stmt::If(cond, then, otherwise) => {
                let cond = self.exp(cond);
                let l_else = self.new_label();
                let l_end = self.new_label();
                self.code.push(Instr::IfFalse {
                    cond,
                    target: l_else.clone(),
                });
                self.stmt(then, loop_exit);
                self.code.push(Instr::Goto(l_end.clone()));
                self.code.push(Instr::Label(l_else));
                if let Some(otherwise) = otherwise {
                    self.stmt(otherwise, loop_exit);
                }
                self.code.push(Instr::Label(l_end));
            }
            Stmt::For(init, cond, update, body) => {
                if let Some(init) = init {
                    self.stmt(init, loop_exit);
                }
                let l_start = self.new_label();
                let l_end = self.new_label();
                self.code.push(Instr::Label(l_start.clone()));
                if let Some(cond) = cond {
                    let cond = self.exp(cond);
                    self.code.push(Instr::IfFalse {
                        cond,
                        target: l_end.clone(),
                    });
                }
                self.stmt(body, Some(&l_end));
                if let Some(update) = update {
                    self.stmt(update, Some(&l_end));
                }
                self.code.push(Instr::Goto(l_start));
                self.code.push(Instr::Label(l_end));
            }
            Stmt::While(cond, body) => {
                let l_start = self.new_label();
                let l_end = self.new_label();
                self.code.push(Instr::Label(l_start.clone()));
                let cond = self.exp(cond);
                self.code.push(Instr::IfFalse {
                    cond,
                    target: l_end.clone(),
                });
                self.stmt(body, Some(&l_end));
                self.code.push(Instr::Goto(l_start));
                self.code.push(Instr::Label(l_end));
            }
            Stmt::Ret(value, _) => {
                let value = value.as_ref().map(|v| self.exp(v));
                self.code.push(Instr::Ret(value));
            }
            Stmt::Print(e) => {
                let x = self.exp(e);
                self.code.push(Instr::Print(x));
            }
            Stmt::Read(name) => {
                self.code.push(Instr::Read(name.clone()));
            }
            Stmt::Break => match loop_exit {
                Some(target) => self.code.push(Instr::Goto(target.to_string())),
                // the semantic pass rejects this; only reachable on
                // hand-built trees
                None => eprintln!("warning: 'break' with no enclosing loop reached code generation"),
            },
            Stmt::Block(stmts) => {
                for s in stmts {
                    self.stmt(s, loop_exit);
                }
            }
        }
    }

    /// Emits an expression and returns the address holding its value:
    /// literals and variables are their own address, everything else lands
    /// in a fresh temporary.
    fn exp(&mut self, e: &Node<Exp>) -> String {
        match &e.t {
            Exp::Int(value) => value.to_string(),
            Exp::Float(value) => value.to_string(),
            Exp::Str(value) => format!("\"{value}\""),
            Exp::Id(name) => name.clone(),
            Exp::Index(name, index) => {
                let index = self.exp(index);
                let dst = self.new_temp();
                self.code.push(Instr::Load {
                    dst: dst.clone(),
                    array: name.clone(),
                    index,
                });
                dst
            }
            Exp::Call(name, args) => self.call(name, args),
            Exp::Bop(op, left, right) => {
                let lhs = self.exp(left);
                let rhs = self.exp(right);
                let dst = self.new_temp();
                self.code.push(Instr::Bin {
                    dst: dst.clone(),
                    lhs,
                    op: *op,
                    rhs,
                });
                dst
            }
        }
    }

    fn call(&mut self, name: &str, args: &[Node<Exp>]) -> String {
        let addrs: Vec<String> = args.iter().map(|a| self.exp(a)).collect();
        for addr in addrs {
            self.code.push(Instr::Param(addr));
        }
        let dst = self.new_temp();
        self.code.push(Instr::Call {
            dst: dst.clone(),
            func: name.to_string(),
            argc: args.len(),
        });
        dst
    }
}
