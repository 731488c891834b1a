//! Indented tree writer for the AST, one node per line.

use std::io;

use super::ast::{Exp, Fdef, Item, Program, Stmt, Vdecl};
use super::Node;

const INDENT: &str = "  ";

fn do_indent<W: io::Write>(w: &mut W, level: usize) -> io::Result<()> {
    for _ in 0..level {
        write!(w, "{INDENT}")?;
    }
    Ok(())
}

pub fn write<W: io::Write>(w: &mut W, prog: &Program) -> io::Result<()> {
    writeln!(w, "Program")?;
    for item in &prog.items {
        match item {
            Item::Stmt(s) => write_stmt(w, s, 1)?,
            Item::Func(f) => write_fdef(w, f, 1)?,
        }
    }
    Ok(())
}

fn write_fdef<W: io::Write>(w: &mut W, f: &Node<Fdef>, level: usize) -> io::Result<()> {
    do_indent(w, level)?;
    writeln!(w, "FuncDef: {}", f.name)?;
    do_indent(w, level + 1)?;
    writeln!(w, "Params:")?;
    for param in &f.params {
        write_vdecl(w, param, level + 2)?;
    }
    do_indent(w, level + 1)?;
    writeln!(w, "Body:")?;
    for stmt in &f.body {
        write_stmt(w, stmt, level + 2)?;
    }
    Ok(())
}

fn write_vdecl<W: io::Write>(w: &mut W, v: &Vdecl, level: usize) -> io::Result<()> {
    do_indent(w, level)?;
    writeln!(w, "VarDecl: {} {}", v.ty, v.name)?;
    if let Some(init) = &v.init {
        write_exp(w, init, level + 1)?;
    }
    Ok(())
}

fn write_stmt<W: io::Write>(w: &mut W, stmt: &Node<Stmt>, level: usize) -> io::Result<()> {
    match &stmt.t {
        Stmt::Decl(v) => write_vdecl(w, v, level)?,
        Stmt::Assn(name, value) => {
            do_indent(w, level)?;
            writeln!(w, "Assign: {name}")?;
            write_exp(w, value, level + 1)?;
        }
        Stmt::IndexAssn(name, index, value) => {
            do_indent(w, level)?;
            writeln!(w, "ArrayAssign: {name}")?;
            do_indent(w, level + 1)?;
            writeln!(w, "Index:")?;
            write_exp(w, index, level + 2)?;
            do_indent(w, level + 1)?;
            writeln!(w, "Value:")?;
            write_exp(w, value, level + 2)?;
        }
        Stmt::Call(name, args) => {
            do_indent(w, level)?;
            writeln!(w, "Call: {name}")?;
            for arg in args {
                write_exp(w, arg, level + 1)?;
            }
        }
        Stmt::If(cond, then, otherwise) => {
            do_indent(w, level)?;
            writeln!(w, "If")?;
            do_indent(w, level + 1)?;
            writeln!(w, "Condition:")?;
            write_exp(w, cond, level + 2)?;
            do_indent(w, level + 1)?;
            writeln!(w, "Then:")?;
            write_stmt(w, then, level + 2)?;
            if let Some(otherwise) = otherwise {
                do_indent(w, level + 1)?;
                writeln!(w, "Else:")?;
                write_stmt(w, otherwise, level + 2)?;
            }
        }
        Stmt::For(init, cond, update, body) => {
            do_indent(w, level)?;
            writeln!(w, "For")?;
            if let Some(init) = init {
                do_indent(w, level + 1)?;
                writeln!(w, "Init:")?;
                write_stmt(w, init, level + 2)?;
            }
            if let Some(cond) = cond {
                do_indent(w, level + 1)?;
                writeln!(w, "Condition:")?;
                write_exp(w, cond, level + 2)?;
            }
            if let Some(update) = update {
                do_indent(w, level + 1)?;
                writeln!(w, "Update:")?;
                write_stmt(w, update, level + 2)?;
            }
            do_indent(w, level + 1)?;
            writeln!(w, "Body:")?;
            write_stmt(w, body, level + 2)?;
        }
        Stmt::While(cond, body) => {
            do_indent(w, level)?;
            writeln!(w, "While")?;
            do_indent(w, level + 1)?;
            writeln!(w, "Condition:")?;
            write_exp(w, cond, level + 2)?;
            do_indent(w, level + 1)?;
            writeln!(w, "Body:")?;
            write_stmt(w, body, level + 2)?;
        }
        Stmt::Ret(value, _) => {
            do_indent(w, level)?;
            writeln!(w, "Return")?;
            if let Some(value) = value {
                write_exp(w, value, level + 1)?;
            }
        }
        Stmt::Print(e) => {
            do_indent(w, level)?;
            writeln!(w, "Print")?;
            write_exp(w, e, level + 1)?;
        }
        Stmt::Read(name) => {
            do_indent(w, level)?;
            writeln!(w, "Read: {name}")?;
        }
        Stmt::Break => {
            do_indent(w, level)?;
            writeln!(w, "Break")?;
        }
        Stmt::Block(stmts) => {
            do_indent(w, level)?;
            writeln!(w, "{{")?;
            for s in stmts {
                write_stmt(w, s, level + 1)?;
            }
            do_indent(w, level)?;
            writeln!(w, "}}")?;
        }
    }
    Ok(())
}

fn write_exp<W: io::Write>(w: &mut W, e: &Node<Exp>, level: usize) -> io::Result<()> {
    do_indent(w, level)?;
    match &e.t {
        Exp::Int(value) => writeln!(w, "IntLiteral: {value}")?,
        Exp::Float(value) => writeln!(w, "FloatLiteral: {value}")?,
        Exp::Str(value) => writeln!(w, "StringLiteral: {value}")?,
        Exp::Id(name) => writeln!(w, "VarAccess: {name}")?,
        Exp::Index(name, index) => {
            writeln!(w, "ArrayAccess: {name}")?;
            write_exp(w, index, level + 1)?;
        }
        Exp::Call(name, args) => {
            writeln!(w, "FuncCall: {name}")?;
            for arg in args {
                write_exp(w, arg, level + 1)?;
            }
        }
        Exp::Bop(op, left, right) => {
            writeln!(w, "BinaryExpr: {op}")?;
            write_exp(w, left, level + 1)?;
            write_exp(w, right, level + 1)?;
        }
    }
    Ok(())
}
