//! Three-address code: a flat instruction list with virtual temporaries
//! (`t0`, `t1`, ...) and labels (`L0`, `L1`, ...). Each instruction prints
//! as one line; `write` dumps a whole listing.

use std::fmt;
use std::io;

use crate::frontend::ast::Binop;

mod emit;
pub use emit::lower;

#[derive(Clone, Debug, PartialEq)]
pub enum Instr {
    /// dst = src
    Assign { dst: String, src: String },
    /// dst = lhs op rhs
    Bin {
        dst: String,
        lhs: String,
        op: Binop,
        rhs: String,
    },
    /// goto target
    Goto(String),
    /// ifFalse cond goto target
    IfFalse { cond: String, target: String },
    /// target:
    Label(String),
    /// param x, one per actual in source order
    Param(String),
    /// dst = call func, argc
    Call {
        dst: String,
        func: String,
        argc: usize,
    },
    /// return [x]
    Ret(Option<String>),
    /// print x
    Print(String),
    /// read x
    Read(String),
    /// dst = array[index]
    Load {
        dst: String,
        array: String,
        index: String,
    },
    /// array[index] = src
    Store {
        array: String,
        index: String,
        src: String,
    },
}

impl fmt::Display for Instr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instr::Assign { dst, src } => write!(f, "{dst} = {src}"),
            Instr::Bin { dst, lhs, op, rhs } => write!(f, "{dst} = {lhs} {op} {rhs}"),
            Instr::Goto(target) => write!(f, "goto {target}"),
            Instr::IfFalse { cond, target } => write!(f, "ifFalse {cond} goto {target}"),
            Instr::Label(target) => write!(f, "{target}:"),
            Instr::Param(x) => write!(f, "param {x}"),
            Instr::Call { dst, func, argc } => write!(f, "{dst} = call {func}, {argc}"),
            Instr::Ret(None) => write!(f, "return"),
            Instr::Ret(Some(x)) => write!(f, "return {x}"),
            Instr::Print(x) => write!(f, "print {x}"),
            Instr::Read(x) => write!(f, "read {x}"),
            Instr::Load { dst, array, index } => write!(f, "{dst} = {array}[{index}]"),
            Instr::Store { array, index, src } => write!(f, "{array}[{index}] = {src}"),
        }
    }
}

pub fn write<W: io::Write>(w: &mut W, code: &[Instr]) -> io::Result<()> {
    for instr in code {
        writeln!(w, "{instr}")?;
    }
    Ok(())
}
