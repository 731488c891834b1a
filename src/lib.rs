pub mod frontend;
pub mod tac;

use frontend::ast::Program;
use frontend::parser::ParseError;
use frontend::symbols::SymbolTable;
use frontend::typecheck::{self, TypeError};

/// Everything the pipeline produces for a successful compilation.
#[derive(Debug)]
pub struct Compilation {
    pub program: Program,
    pub symbols: SymbolTable,
    pub code: Vec<tac::Instr>,
}

#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("{} semantic error(s)", .0.len())]
    Semantic(Vec<TypeError>),
}

/// Runs the whole pipeline: lex, parse (building the AST through the
/// semantic stack), check, and lower to three-address code. Semantic
/// diagnostics accumulate; if any were produced no code is emitted.
pub fn compile(input: &str) -> Result<Compilation, CompileError> {
    let (mut program, symbols) = frontend::parse(input)?;

    let analysis = typecheck::check(&mut program, symbols);
    if !analysis.errors.is_empty() {
        return Err(CompileError::Semantic(analysis.errors));
    }

    let code = tac::lower(&program);
    Ok(Compilation {
        program,
        symbols: analysis.symbols,
        code,
    })
}
